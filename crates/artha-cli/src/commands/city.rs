//! Location command

use anyhow::Result;
use artha_core::{format_inr, LocationAdjuster};
use serde::Serialize;

use super::{print_json, Output};

#[derive(Serialize)]
struct CityReport {
    location: String,
    insights: artha_core::LocationInsights,
    #[serde(skip_serializing_if = "Option::is_none")]
    peers: Option<artha_core::PeerContext>,
}

pub fn cmd_city(
    location: &str,
    income: Option<f64>,
    profession: Option<&str>,
    output: Output,
) -> Result<()> {
    let adjuster = LocationAdjuster::new();
    let city = adjuster.resolve(location);
    let insights = adjuster.compute_insights(city, income.unwrap_or(0.0));
    let peers = income.map(|income| adjuster.peer_context(city, profession.unwrap_or(""), income));

    if output == Output::Json {
        return print_json(&CityReport {
            location: location.to_string(),
            insights,
            peers,
        });
    }

    println!();
    println!("📍 {} ({}, {})", city.name, city.tier.as_str(), city.region.as_str());
    println!("   Cost multiplier: {:.2}", city.cost_multiplier);
    println!("   Cost of living:  {}/month", format_inr(insights.cost_of_living));

    if income.is_some() {
        println!("   Affordability:   {:.2}x", insights.affordability_ratio);
        println!("   Savings target:  {:.0}%", insights.savings_target_percent);
    }

    if let Some(peers) = peers {
        println!();
        println!("👥 Peers");
        println!(
            "   Expected income: {} ({} to {})",
            format_inr(peers.expected_income),
            format_inr(peers.band_low),
            format_inr(peers.band_high)
        );
        println!("   Your percentile: {:.0}", peers.percentile);
    }

    if !insights.recommendations.is_empty() {
        println!();
        for rec in &insights.recommendations {
            println!("   [{}] {}: {}", rec.priority, rec.title, rec.impact);
        }
    }
    Ok(())
}
