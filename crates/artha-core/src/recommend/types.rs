//! Core types for recommendations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::RiskProfile;
use crate::profile::IncomeTier;

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Numeric rank for sorting (higher = more important)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Which signal produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Income,
    Risk,
    Location,
    Behavioral,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Income => "income",
            Source::Risk => "risk",
            Source::Location => "location",
            Source::Behavioral => "behavioral",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Behavior pattern that triggered a behavioral recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorSignal {
    LowEngagement,
    LowCompletion,
    RiskMismatch,
    FeatureAffinity,
}

/// Source-specific payload; its tag is the recommendation's `source`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RecommendationDetail {
    Income {
        tier: IncomeTier,
        savings_rate: f64,
    },
    Risk {
        profile: RiskProfile,
        equity_allocation_pct: f64,
        suggested_monthly_sip: f64,
    },
    Location {
        city: String,
        cost_multiplier: f64,
        affordability_ratio: f64,
    },
    Behavioral {
        signal: BehaviorSignal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature: Option<String>,
    },
}

impl RecommendationDetail {
    pub fn source(&self) -> Source {
        match self {
            RecommendationDetail::Income { .. } => Source::Income,
            RecommendationDetail::Risk { .. } => Source::Risk,
            RecommendationDetail::Location { .. } => Source::Location,
            RecommendationDetail::Behavioral { .. } => Source::Behavioral,
        }
    }
}

/// A prioritized, confidence-scored suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Stable id used for deduplication (e.g. "emergency_fund")
    pub id: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub impact: String,
    /// Always within [0, 1]
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: f64,
    #[serde(flatten)]
    pub detail: RecommendationDetail,
}

impl Recommendation {
    pub fn new(
        id: impl Into<String>,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: impl Into<String>,
        confidence: f64,
        detail: RecommendationDetail,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            title: title.into(),
            description: description.into(),
            impact: impact.into(),
            confidence: clamp_confidence(confidence),
            detail,
        }
    }

    pub fn source(&self) -> Source {
        self.detail.source()
    }

    /// Replace the confidence, keeping it within [0, 1]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

fn deserialize_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_confidence)
}

/// Default cap on recommendations per set
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 4;

/// Ordered, id-unique recommendations handed to the presentation layer
///
/// Deserializing goes through [`RecommendationSet::from_ranked`] with
/// [`DEFAULT_MAX_RECOMMENDATIONS`], so duplicates and overflow are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecommendationSet(Vec<Recommendation>);

impl From<Vec<Recommendation>> for RecommendationSet {
    fn from(ranked: Vec<Recommendation>) -> Self {
        Self::from_ranked(ranked, DEFAULT_MAX_RECOMMENDATIONS)
    }
}

impl<'de> Deserialize<'de> for RecommendationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Recommendation>::deserialize(deserializer).map(Self::from)
    }
}

impl RecommendationSet {
    /// Wrap already-ranked recommendations, dropping later duplicates of an id
    /// and keeping at most `max` entries
    pub fn from_ranked(ranked: Vec<Recommendation>, max: usize) -> Self {
        let mut seen = std::collections::HashSet::new();
        let items = ranked
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .take(max)
            .collect();
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.0.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Recommendation> {
        self.0.iter().find(|r| r.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Recommendation> {
        self.0
    }
}

impl IntoIterator for RecommendationSet {
    type Item = Recommendation;
    type IntoIter = std::vec::IntoIter<Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecommendationSet {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
