//! Input file loading (config, profile, spending, events, ledger)

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use artha_core::{BehaviorEvent, EngineConfig, MonthlySpend, SpendingInsights, UserProfile};
use csv::ReaderBuilder;

/// Engine config from an explicit path, else the data-dir override, else defaults
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            EngineConfig::load_from(p)
        }
        None => EngineConfig::load(),
    };
    config.context("Failed to load engine config")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid {} JSON in {}", what, path.display()))
}

pub fn read_profile(path: &Path) -> Result<UserProfile> {
    read_json(path, "profile")
}

pub fn read_spending(path: &Path) -> Result<SpendingInsights> {
    read_json(path, "spending")
}

/// Behavior events, sorted oldest first
pub fn read_events(path: &Path) -> Result<Vec<BehaviorEvent>> {
    let mut events: Vec<BehaviorEvent> = read_json(path, "events")?;
    // Stable, so same-instant events keep file order
    events.sort_by_key(|e| e.timestamp);
    Ok(events)
}

/// Parse a monthly ledger CSV.
///
/// Format: month,total[,category...] with a header row. Extra columns are
/// per-category amounts named by their header.
pub fn parse_ledger<R: std::io::Read>(reader: R) -> Result<Vec<MonthlySpend>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut months = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let row = line + 2;

        let month = record
            .get(0)
            .filter(|m| !m.is_empty())
            .with_context(|| format!("Missing month on line {}", row))?
            .to_string();
        let total = parse_amount(record.get(1).unwrap_or(""))
            .with_context(|| format!("Invalid total on line {}", row))?;

        let mut categories = BTreeMap::new();
        for (name, value) in headers.iter().zip(record.iter()).skip(2) {
            if value.is_empty() {
                continue;
            }
            let amount = parse_amount(value)
                .with_context(|| format!("Invalid {} amount on line {}", name, row))?;
            categories.insert(name.to_string(), amount);
        }

        months.push(MonthlySpend {
            month,
            total,
            categories,
        });
    }

    tracing::debug!("Parsed {} ledger months", months.len());
    Ok(months)
}

/// Amount with optional ₹ sign and digit-group commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '₹' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .with_context(|| format!("Not a number: {:?}", s))
}

pub fn read_ledger(path: &Path) -> Result<Vec<MonthlySpend>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open ledger: {}", path.display()))?;
    parse_ledger(file).with_context(|| format!("Failed to parse ledger: {}", path.display()))
}
