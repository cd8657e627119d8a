//! Core types for behavior analysis

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::RiskTolerance;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl EngagementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementLevel::Low => "low",
            EngagementLevel::Medium => "medium",
            EngagementLevel::High => "high",
        }
    }
}

impl fmt::Display for EngagementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a time series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    #[default]
    Stable,
    Decreasing,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Stable => "stable",
            TrendDirection::Decreasing => "decreasing",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub level: EngagementLevel,
    /// Events inside the trailing engagement window
    pub recent_events: usize,
    /// Average session length inside the window
    pub avg_session_secs: f64,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceStrength {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePreference {
    pub feature: String,
    pub count: usize,
    pub strength: PreferenceStrength,
}

/// Started/completed counts for one flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCompletion {
    pub started: usize,
    pub completed: usize,
}

impl FlowCompletion {
    /// Completed over started, capped at 1; `None` when nothing was started
    pub fn rate(&self) -> Option<f64> {
        if self.started == 0 {
            None
        } else {
            Some((self.completed as f64 / self.started as f64).min(1.0))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// 0 when nothing was started
    pub rate: f64,
    pub started: usize,
    pub completed: usize,
    /// Per flow (action prefix or recommendation id)
    pub by_flow: BTreeMap<String, FlowCompletion>,
}

/// Everything derived from a user's behavior log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorInsights {
    pub event_count: usize,
    pub engagement: Engagement,
    pub preferred_features: Vec<FeaturePreference>,
    pub risk_tolerance: RiskTolerance,
    pub completion: CompletionStats,
}

impl BehaviorInsights {
    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    pub fn completion_rate(&self) -> f64 {
        self.completion.rate
    }

    /// Historical completion rate for a recommendation id, if it was ever started
    pub fn completion_rate_for(&self, id: &str) -> Option<f64> {
        self.completion.by_flow.get(id).and_then(FlowCompletion::rate)
    }
}
