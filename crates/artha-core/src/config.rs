//! Engine configuration
//!
//! Thresholds used by the classifier, behavior analyzer, spending analysis,
//! synthesizer and refiner.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/artha/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::recommend::types::DEFAULT_MAX_RECOMMENDATIONS;

/// Upper bound for behavior windows (ten years)
const MAX_WINDOW_DAYS: i64 = 3650;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Income tier thresholds (monthly income)
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub mid_income_threshold: f64,
    pub high_income_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mid_income_threshold: 80_000.0,
            high_income_threshold: 150_000.0,
        }
    }
}

/// Behavior log and engagement settings
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Events kept per user (FIFO eviction past this)
    pub log_capacity: usize,
    /// Trailing window for engagement counts
    pub engagement_window_days: i64,
    /// Window size for the engagement trend comparison
    pub trend_window_days: i64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            log_capacity: 100,
            engagement_window_days: 7,
            trend_window_days: 14,
        }
    }
}

/// Monthly spend series thresholds (all percentages)
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingConfig {
    pub stability_band_pct: f64,
    pub seasonality_threshold_pct: f64,
    pub low_volatility_pct: f64,
    pub moderate_volatility_pct: f64,
}

impl Default for SpendingConfig {
    fn default() -> Self {
        Self {
            stability_band_pct: 5.0,
            seasonality_threshold_pct: 20.0,
            low_volatility_pct: 8.0,
            moderate_volatility_pct: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    pub max_recommendations: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

/// Completion-rate thresholds for adaptive refinement
#[derive(Debug, Clone, PartialEq)]
pub struct RefineConfig {
    pub simplify_below: f64,
    pub enhance_above: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            simplify_below: 0.3,
            enhance_above: 0.8,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub behavior: BehaviorConfig,
    pub spending: SpendingConfig,
    pub synthesis: SynthesisConfig,
    pub refine: RefineConfig,
}

impl EngineConfig {
    /// Load configuration (override file in the data dir first, then embedded defaults)
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path, falling back to embedded defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("artha").join("config").join("engine.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<EngineConfig> {
    let path = match override_path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(ref p) if p.exists() => {
            tracing::debug!(path = %p.display(), "Loading engine config override");
            fs::read_to_string(p)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", p.display(), e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    classifier: Option<RawClassifier>,
    behavior: Option<RawBehavior>,
    spending: Option<RawSpending>,
    synthesis: Option<RawSynthesis>,
    refine: Option<RawRefine>,
}

#[derive(Debug, Deserialize)]
struct RawClassifier {
    mid_income_threshold: Option<f64>,
    high_income_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawBehavior {
    log_capacity: Option<usize>,
    engagement_window_days: Option<i64>,
    trend_window_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawSpending {
    stability_band_pct: Option<f64>,
    seasonality_threshold_pct: Option<f64>,
    low_volatility_pct: Option<f64>,
    moderate_volatility_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSynthesis {
    max_recommendations: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawRefine {
    simplify_below: Option<f64>,
    enhance_above: Option<f64>,
}

fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(c) = raw.classifier {
        if let Some(v) = c.mid_income_threshold {
            config.classifier.mid_income_threshold = v;
        }
        if let Some(v) = c.high_income_threshold {
            config.classifier.high_income_threshold = v;
        }
    }

    if let Some(b) = raw.behavior {
        if let Some(v) = b.log_capacity {
            config.behavior.log_capacity = v;
        }
        if let Some(v) = b.engagement_window_days {
            config.behavior.engagement_window_days = v;
        }
        if let Some(v) = b.trend_window_days {
            config.behavior.trend_window_days = v;
        }
    }

    if let Some(s) = raw.spending {
        if let Some(v) = s.stability_band_pct {
            config.spending.stability_band_pct = v;
        }
        if let Some(v) = s.seasonality_threshold_pct {
            config.spending.seasonality_threshold_pct = v;
        }
        if let Some(v) = s.low_volatility_pct {
            config.spending.low_volatility_pct = v;
        }
        if let Some(v) = s.moderate_volatility_pct {
            config.spending.moderate_volatility_pct = v;
        }
    }

    if let Some(s) = raw.synthesis {
        if let Some(v) = s.max_recommendations {
            config.synthesis.max_recommendations = v;
        }
    }

    if let Some(r) = raw.refine {
        if let Some(v) = r.simplify_below {
            config.refine.simplify_below = v;
        }
        if let Some(v) = r.enhance_above {
            config.refine.enhance_above = v;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<()> {
    let thresholds = [
        ("mid_income_threshold", config.classifier.mid_income_threshold),
        ("high_income_threshold", config.classifier.high_income_threshold),
        ("stability_band_pct", config.spending.stability_band_pct),
        ("seasonality_threshold_pct", config.spending.seasonality_threshold_pct),
        ("low_volatility_pct", config.spending.low_volatility_pct),
        ("moderate_volatility_pct", config.spending.moderate_volatility_pct),
        ("simplify_below", config.refine.simplify_below),
        ("enhance_above", config.refine.enhance_above),
    ];
    if let Some((name, _)) = thresholds.iter().find(|(_, v)| !v.is_finite()) {
        return Err(Error::Config(format!("{} must be a finite number", name)));
    }
    if config.classifier.mid_income_threshold > config.classifier.high_income_threshold {
        return Err(Error::Config(
            "mid_income_threshold must not exceed high_income_threshold".to_string(),
        ));
    }
    if config.behavior.log_capacity == 0 {
        return Err(Error::Config("log_capacity must be at least 1".to_string()));
    }
    let windows = [
        config.behavior.engagement_window_days,
        config.behavior.trend_window_days,
    ];
    if windows.iter().any(|d| !(1..=MAX_WINDOW_DAYS).contains(d)) {
        return Err(Error::Config(format!(
            "behavior windows must be between 1 and {} days",
            MAX_WINDOW_DAYS
        )));
    }
    if config.refine.simplify_below > config.refine.enhance_above {
        return Err(Error::Config(
            "simplify_below must not exceed enhance_above".to_string(),
        ));
    }
    Ok(())
}
