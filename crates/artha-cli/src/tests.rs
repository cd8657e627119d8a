//! CLI command tests

use std::io::Write;
use std::path::PathBuf;

use artha_core::test_utils::{base_time, flow_events};
use artha_core::EngineConfig;
use tempfile::TempDir;

use crate::cli::CalcCommand;
use crate::commands::{self, Output};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

const MUMBAI_PROFILE: &str = r#"{
    "userId": "u-42",
    "monthlyIncome": 125000,
    "riskProfile": "moderate_aggressive",
    "location": "Mumbai, Maharashtra",
    "profession": "Software Engineer"
}"#;

// ========== Input Tests ==========

#[test]
fn test_parse_ledger_with_categories() {
    let csv = "month,total,rent,food\n2025-01,\"₹45,000\",20000,8000\n2025-02,47000,20000,\n";
    let months = commands::parse_ledger(csv.as_bytes()).unwrap();

    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, "2025-01");
    assert_eq!(months[0].total, 45_000.0);
    assert_eq!(months[0].categories["food"], 8_000.0);
    assert!(!months[1].categories.contains_key("food"));
}

#[test]
fn test_parse_ledger_rejects_bad_total() {
    let csv = "month,total\n2025-01,lots\n";
    assert!(commands::parse_ledger(csv.as_bytes()).is_err());
}

#[test]
fn test_read_events_sorts_by_time() {
    let dir = TempDir::new().unwrap();
    let mut events = flow_events("goal_setup", 2, 1);
    events.reverse();
    let path = write_file(&dir, "events.json", &serde_json::to_string(&events).unwrap());

    let loaded = commands::read_events(&path).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded[0].timestamp, base_time());
    assert_eq!(loaded[2].action, "goal_setup_completed");
}

#[test]
fn test_load_config_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "engine.toml", "[synthesis]\nmax_recommendations = 2\n");

    let config = commands::load_config(Some(&path)).unwrap();
    assert_eq!(config.synthesis.max_recommendations, 2);

    let missing = dir.path().join("nope.toml");
    assert!(commands::load_config(Some(&missing)).is_err());
}

// ========== Command Tests ==========

#[test]
fn test_calculators_run() {
    for calculator in [
        CalcCommand::Emergency {
            expenses: 50_000.0,
            months: 6.0,
        },
        CalcCommand::Sip {
            target: 1_000_000.0,
            years: 10.0,
            rate: 12.0,
        },
        CalcCommand::Retirement {
            age: 30,
            retire_at: 60,
            savings: 500_000.0,
            income: 100_000.0,
            inflation: 6.0,
        },
        CalcCommand::Loan {
            income: 100_000.0,
            emis: 0.0,
            rate: 8.5,
            tenure: 20.0,
        },
        CalcCommand::Tax {
            income: 1_200_000.0,
            invested: 50_000.0,
        },
    ] {
        assert!(commands::cmd_calc(calculator, Output::Text).is_ok());
    }
}

#[test]
fn test_city_runs_for_unknown_location() {
    assert!(commands::cmd_city("Atlantis", Some(60_000.0), None, Output::Json).is_ok());
    assert!(commands::cmd_city("Pune", None, None, Output::Text).is_ok());
}

#[test]
fn test_analyze_with_synthetic_series() {
    let report = commands::analyze(&EngineConfig::default(), None, None, Some(3)).unwrap();
    assert!(report.behavior.is_empty());
    assert_eq!(report.spend_source.as_deref(), Some("synthetic"));
    assert_eq!(report.spending.map(|s| s.months), Some(12));
}

#[test]
fn test_analyze_prefers_ledger_over_synthetic() {
    let dir = TempDir::new().unwrap();
    let ledger = write_file(&dir, "ledger.csv", "month,total\n2025-01,100\n2025-02,100\n");

    let report =
        commands::analyze(&EngineConfig::default(), None, Some(&ledger), Some(3)).unwrap();
    assert_eq!(report.spend_source.as_deref(), Some("ledger"));
    assert_eq!(report.spending.map(|s| s.months), Some(2));
}

#[test]
fn test_recommend_mumbai_profile() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(&dir, "profile.json", MUMBAI_PROFILE);
    let spending = write_file(&dir, "spending.json", r#"{"savingsRate": 15}"#);

    let report =
        commands::recommend(EngineConfig::default(), &profile, Some(&spending), None, None)
            .unwrap();
    assert_eq!(report.recommendations.len(), 4);
    assert!(report.recommendations.get("metro_budgeting").is_some());
    assert!(report.spending.is_none());
}

#[test]
fn test_recommend_reports_ledger_spending() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(&dir, "profile.json", MUMBAI_PROFILE);
    let ledger = write_file(
        &dir,
        "ledger.csv",
        "month,total\n2025-01,40000\n2025-02,41000\n2025-03,42000\n",
    );

    let report =
        commands::recommend(EngineConfig::default(), &profile, None, Some(&ledger), None).unwrap();
    let spending = report.spending.as_ref().expect("ledger analysis");
    assert_eq!(spending.months, 3);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["spending"]["months"], 3);
    assert!(json["recommendations"].is_array());
}

#[test]
fn test_recommend_requires_income() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(&dir, "profile.json", r#"{"userId": "u-1", "location": "Pune"}"#);

    let err = commands::recommend(EngineConfig::default(), &profile, None, None, None)
        .unwrap_err();
    assert!(err.to_string().contains("monthly_income"));
}

#[test]
fn test_recommend_respects_configured_max() {
    let dir = TempDir::new().unwrap();
    let profile = write_file(&dir, "profile.json", MUMBAI_PROFILE);
    let mut config = EngineConfig::default();
    config.synthesis.max_recommendations = 2;

    let report = commands::recommend(config, &profile, None, None, None).unwrap();
    assert_eq!(report.recommendations.len(), 2);
}
