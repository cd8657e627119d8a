//! Behavior and spending analysis command

use std::path::Path;

use anyhow::Result;
use artha_core::{
    format_inr, BehaviorAnalyzer, BehaviorInsights, EngineConfig, LedgerSpendSource,
    SpendSeriesSource, SpendingAnalysis, SpendingAnalyzer, SyntheticSpendSource,
};
use serde::Serialize;

use super::{print_json, read_events, read_ledger, Output};

/// Base monthly spend for the demo series
const SYNTHETIC_BASE: f64 = 50_000.0;
const SYNTHETIC_MONTHS: usize = 12;

#[derive(Serialize)]
pub struct AnalysisReport {
    pub behavior: BehaviorInsights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spending: Option<SpendingAnalysis>,
    /// "ledger" or "synthetic"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spend_source: Option<String>,
}

/// Build the report without printing it
pub fn analyze(
    config: &EngineConfig,
    events: Option<&Path>,
    ledger: Option<&Path>,
    synthetic_seed: Option<u64>,
) -> Result<AnalysisReport> {
    let history = match events {
        Some(path) => read_events(path)?,
        None => Vec::new(),
    };
    let behavior = BehaviorAnalyzer::new(config.behavior.clone()).analyze(&history);

    let source: Option<Box<dyn SpendSeriesSource>> = match (ledger, synthetic_seed) {
        (Some(path), _) => Some(Box::new(LedgerSpendSource::new(read_ledger(path)?))),
        (None, Some(seed)) => {
            tracing::warn!(seed, "Using synthetic demo spend series, not real data");
            Some(Box::new(SyntheticSpendSource::new(
                seed,
                SYNTHETIC_MONTHS,
                SYNTHETIC_BASE,
            )))
        }
        (None, None) => None,
    };

    let analyzer = SpendingAnalyzer::new(config.spending.clone());
    let spending = source.as_deref().map(|s| analyzer.analyze(s));
    let spend_source = source.as_deref().map(|s| s.name().to_string());

    Ok(AnalysisReport {
        behavior,
        spending,
        spend_source,
    })
}

pub fn cmd_analyze(
    config: &EngineConfig,
    events: Option<&Path>,
    ledger: Option<&Path>,
    synthetic_seed: Option<u64>,
    output: Output,
) -> Result<()> {
    let report = analyze(config, events, ledger, synthetic_seed)?;
    if output == Output::Json {
        return print_json(&report);
    }

    let behavior = &report.behavior;
    println!();
    println!("🧭 Behavior");
    if behavior.is_empty() {
        println!("   No behavior events.");
    } else {
        println!("   Events:          {}", behavior.event_count);
        println!(
            "   Engagement:      {} ({} recent events, {:.0}s avg session, {})",
            behavior.engagement.level,
            behavior.engagement.recent_events,
            behavior.engagement.avg_session_secs,
            behavior.engagement.trend
        );
        println!("   Risk tolerance:  {}", behavior.risk_tolerance);
        println!(
            "   Completion:      {:.0}% ({} of {} started)",
            behavior.completion.rate * 100.0,
            behavior.completion.completed,
            behavior.completion.started
        );
        for feature in &behavior.preferred_features {
            println!("   • {} ×{}", feature.feature, feature.count);
        }
    }

    if let (Some(spending), Some(source)) = (&report.spending, &report.spend_source) {
        println!();
        println!("💸 Spending ({} months from {})", spending.months, source);
        println!(
            "   Trend:       {} ({:+.1}%)",
            spending.trend.direction, spending.trend.rate_pct
        );
        println!(
            "   Volatility:  {} ({:.1}%)",
            spending.volatility.band.as_str(),
            spending.volatility.coefficient_pct
        );
        if spending.is_seasonal() {
            println!("   Spikes:      {}", spending.seasonal_months.join(", "));
        }
        println!(
            "   Next month:  {} (confidence {:.0}%)",
            format_inr(spending.next_month.amount),
            spending.next_month.confidence * 100.0
        );
    }
    Ok(())
}
