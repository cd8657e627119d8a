//! Behavior tracking and analysis
//!
//! Per-user event logs, rule-based behavior scoring, and monthly spend series
//! analysis.

pub mod log;
pub mod scorer;
pub mod spending;
pub mod types;

pub use log::{BehaviorRepository, InMemoryBehaviorLog};
pub use scorer::{BehaviorAnalyzer, BehaviorScorer, RuleBasedScorer};
pub use spending::{
    LedgerSpendSource, SpendPrediction, SpendSeriesSource, SpendTrend, SpendingAnalysis,
    SpendingAnalyzer, SyntheticSpendSource, Volatility, VolatilityBand,
};
pub use types::{
    BehaviorInsights, CompletionStats, Engagement, EngagementLevel, FeaturePreference,
    FlowCompletion, PreferenceStrength, TrendDirection,
};
