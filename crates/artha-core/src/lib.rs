//! Artha Core Library
//!
//! Personalization and recommendation engine for the Artha personal finance app:
//! - Financial calculators (emergency fund, SIP, retirement, home loan, tax)
//! - Income tier classification with tier-specific recommendations
//! - City cost-of-living adjustment and peer income context
//! - Bounded per-user behavior log and rule-based behavior scoring
//! - Monthly spend trend, volatility and seasonality analysis
//! - Recommendation synthesis, deduplication and adaptive refinement
//! - Layered TOML engine configuration

pub mod behavior;
pub mod calculators;
pub mod config;
pub mod error;
pub mod location;
pub mod models;
pub mod money;
pub mod profile;
pub mod recommend;

/// Event and profile builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use behavior::{
    BehaviorAnalyzer, BehaviorInsights, BehaviorRepository, BehaviorScorer, InMemoryBehaviorLog,
    LedgerSpendSource, RuleBasedScorer, SpendSeriesSource, SpendingAnalysis, SpendingAnalyzer,
    SyntheticSpendSource,
};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use location::{CityRecord, CityTier, LocationAdjuster, LocationInsights, PeerContext, Region};
pub use models::{
    BehaviorEvent, EventContext, MonthlySpend, RiskProfile, RiskTolerance, SpendingInsights,
    UserProfile,
};
pub use money::format_inr;
pub use profile::{IncomeTier, ProfileClassifier, TierInsights};
pub use recommend::{
    AdaptiveRefiner, PersonalizationEngine, Priority, Recommendation, RecommendationSet,
    RecommendationSynthesizer, Source,
};
