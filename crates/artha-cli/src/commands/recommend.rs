//! Recommendation and config commands

use std::path::Path;

use anyhow::Result;
use artha_core::config::default_config_path;
use artha_core::{
    format_inr, EngineConfig, PersonalizationEngine, RecommendationSet, SpendingAnalysis,
    SpendingInsights,
};
use serde::Serialize;

use super::{load_config, print_json, read_events, read_ledger, read_profile, read_spending, Output};

#[derive(Debug, Serialize)]
pub struct RecommendReport {
    pub recommendations: RecommendationSet,
    /// Present when a monthly ledger was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spending: Option<SpendingAnalysis>,
}

/// Run the full pipeline for one profile
pub fn recommend(
    config: EngineConfig,
    profile: &Path,
    spending: Option<&Path>,
    ledger: Option<&Path>,
    events: Option<&Path>,
) -> Result<RecommendReport> {
    let profile = read_profile(profile)?;
    let mut spending = match spending {
        Some(path) => read_spending(path)?,
        None => SpendingInsights::default(),
    };
    if let Some(path) = ledger {
        spending.monthly_spending = Some(read_ledger(path)?);
    }

    let engine = PersonalizationEngine::new(config);
    if let Some(path) = events {
        for event in read_events(path)? {
            engine.track(&profile.user_id, event);
        }
    }

    let analysis = engine.spending_analysis(&spending);
    if let Some(ref analysis) = analysis {
        tracing::debug!(
            trend = analysis.trend.direction.as_str(),
            volatility = analysis.volatility.band.as_str(),
            "Spending ledger analyzed"
        );
    }

    Ok(RecommendReport {
        recommendations: engine.recommend(&profile, &spending)?,
        spending: analysis,
    })
}

pub fn cmd_recommend(
    config: EngineConfig,
    profile: &Path,
    spending: Option<&Path>,
    ledger: Option<&Path>,
    events: Option<&Path>,
    output: Output,
) -> Result<()> {
    let report = recommend(config, profile, spending, ledger, events)?;
    if output == Output::Json {
        return print_json(&report);
    }

    if let Some(ref spending) = report.spending {
        println!();
        println!("💸 Spending ({} months)", spending.months);
        println!(
            "   Trend {} ({:+.1}%), volatility {}, next month ~{}",
            spending.trend.direction,
            spending.trend.rate_pct,
            spending.volatility.band.as_str(),
            format_inr(spending.next_month.amount)
        );
    }

    let set = &report.recommendations;
    println!();
    println!("✨ Recommendations");
    println!("   ─────────────────────────────────────────────────────────────");
    if set.is_empty() {
        println!("   Nothing to recommend right now.");
        return Ok(());
    }

    for (i, rec) in set.iter().enumerate() {
        let icon = match rec.priority {
            artha_core::Priority::High => "🔴",
            artha_core::Priority::Medium => "🟡",
            artha_core::Priority::Low => "🟢",
        };
        println!();
        println!("   {}. {} {} ({})", i + 1, icon, rec.title, rec.source());
        println!("      {}", rec.description);
        println!("      Impact: {}", rec.impact);
        println!("      Confidence: {:.0}%", rec.confidence * 100.0);
    }
    Ok(())
}

pub fn cmd_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;

    let source = match (path, default_config_path()) {
        (Some(p), _) => p.display().to_string(),
        (None, Some(p)) if p.exists() => p.display().to_string(),
        _ => "built-in defaults".to_string(),
    };

    println!();
    println!("⚙️  Engine Config ({})", source);
    println!(
        "   Income tiers:     mid ≥ {}, high ≥ {}",
        artha_core::format_inr(config.classifier.mid_income_threshold),
        artha_core::format_inr(config.classifier.high_income_threshold)
    );
    println!(
        "   Behavior log:     {} events, {}-day engagement, {}-day trend windows",
        config.behavior.log_capacity,
        config.behavior.engagement_window_days,
        config.behavior.trend_window_days
    );
    println!(
        "   Spending:         ±{}% stable, {}% seasonal, volatility bands {}/{}%",
        config.spending.stability_band_pct,
        config.spending.seasonality_threshold_pct,
        config.spending.low_volatility_pct,
        config.spending.moderate_volatility_pct
    );
    println!(
        "   Recommendations:  max {}, simplify < {}, enhance > {}",
        config.synthesis.max_recommendations,
        config.refine.simplify_below,
        config.refine.enhance_above
    );
    Ok(())
}
