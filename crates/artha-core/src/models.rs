//! Input data models: user profile, spending insights and behavior events

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::money::sanitize;

/// Investment risk appetite declared by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    ModerateAggressive,
    Aggressive,
    SophisticatedAggressive,
    VeryAggressive,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::ModerateAggressive => "moderate_aggressive",
            RiskProfile::Aggressive => "aggressive",
            RiskProfile::SophisticatedAggressive => "sophisticated_aggressive",
            RiskProfile::VeryAggressive => "very_aggressive",
        }
    }

    pub fn all() -> &'static [RiskProfile] {
        &[
            RiskProfile::Conservative,
            RiskProfile::Moderate,
            RiskProfile::ModerateAggressive,
            RiskProfile::Aggressive,
            RiskProfile::SophisticatedAggressive,
            RiskProfile::VeryAggressive,
        ]
    }

    /// Parse a profile name, treating anything unrecognized as `moderate`
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(risk_profile = s, "Unrecognized risk profile, using moderate");
            RiskProfile::Moderate
        })
    }

    /// Coarse tolerance bucket, comparable with behavior-inferred tolerance
    pub fn tolerance(&self) -> RiskTolerance {
        match self {
            RiskProfile::Conservative => RiskTolerance::Conservative,
            RiskProfile::Moderate => RiskTolerance::Moderate,
            _ => RiskTolerance::Aggressive,
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskProfile::Conservative),
            "moderate" => Ok(RiskProfile::Moderate),
            "moderate_aggressive" => Ok(RiskProfile::ModerateAggressive),
            "aggressive" => Ok(RiskProfile::Aggressive),
            "sophisticated_aggressive" => Ok(RiskProfile::SophisticatedAggressive),
            "very_aggressive" => Ok(RiskProfile::VeryAggressive),
            _ => Err(format!("Unknown risk profile: {}", s)),
        }
    }
}

impl From<String> for RiskProfile {
    fn from(s: String) -> Self {
        RiskProfile::parse_lenient(&s)
    }
}

/// Three-way risk bucket used for behavior inference and event tagging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's profile as supplied by the identity/profile service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "userId")]
    pub user_id: String,
    /// Required; a profile without it fails validation
    #[serde(default, alias = "monthlyIncome")]
    pub monthly_income: Option<f64>,
    #[serde(default, alias = "riskProfile")]
    pub risk_profile: RiskProfile,
    /// Free text, usually "City, Region"
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub age: Option<u32>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>, monthly_income: f64) -> Self {
        Self {
            user_id: user_id.into(),
            monthly_income: Some(monthly_income),
            risk_profile: RiskProfile::default(),
            location: String::new(),
            profession: String::new(),
            age: None,
        }
    }

    pub fn with_risk_profile(mut self, risk_profile: RiskProfile) -> Self {
        self.risk_profile = risk_profile;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = profession.into();
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// The monthly income, clamped to be non-negative.
    ///
    /// Fails only when the income is missing or not a finite number.
    pub fn validated_income(&self) -> Result<f64> {
        match self.monthly_income {
            Some(income) if income.is_finite() => {
                if income < 0.0 {
                    tracing::warn!(user = %self.user_id, income, "Negative income clamped to 0");
                }
                Ok(sanitize(income))
            }
            Some(_) => Err(Error::Validation(format!(
                "monthly_income for user {} is not a finite number",
                self.user_id
            ))),
            None => Err(Error::Validation(format!(
                "monthly_income is required (user {})",
                self.user_id
            ))),
        }
    }
}

/// One month of aggregated spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpend {
    /// Month label, e.g. "2026-03"
    pub month: String,
    pub total: f64,
    #[serde(default)]
    pub categories: BTreeMap<String, f64>,
}

impl MonthlySpend {
    pub fn new(month: impl Into<String>, total: f64) -> Self {
        Self {
            month: month.into(),
            total,
            categories: BTreeMap::new(),
        }
    }
}

/// Aggregated spending record from the transaction-aggregation service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsights {
    /// Percent of income saved (e.g. 15.0 for 15%)
    #[serde(alias = "savingsRate")]
    pub savings_rate: f64,
    #[serde(default, alias = "monthlySpending")]
    pub monthly_spending: Option<Vec<MonthlySpend>>,
}

impl SpendingInsights {
    pub fn with_savings_rate(savings_rate: f64) -> Self {
        Self {
            savings_rate,
            monthly_spending: None,
        }
    }
}

/// Typed context attached to a behavior event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventContext {
    /// App feature the action happened in (e.g. "sip_calculator")
    pub feature: Option<String>,
    /// Explicit risk tag set by the instrumenting screen
    pub risk_signal: Option<RiskTolerance>,
    /// Time spent on the action, when the screen measures it
    pub duration_secs: Option<f64>,
    /// Recommendation the action was taken on
    pub recommendation_id: Option<String>,
    pub screen: Option<String>,
}

impl EventContext {
    pub fn feature(feature: impl Into<String>) -> Self {
        Self {
            feature: Some(feature.into()),
            ..Default::default()
        }
    }

    pub fn with_risk_signal(mut self, signal: RiskTolerance) -> Self {
        self.risk_signal = Some(signal);
        self
    }

    pub fn with_duration_secs(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn with_recommendation(mut self, id: impl Into<String>) -> Self {
        self.recommendation_id = Some(id.into());
        self
    }
}

const STARTED_SUFFIX: &str = "_started";
const COMPLETED_SUFFIX: &str = "_completed";

/// A single user interaction reported by UI instrumentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub timestamp: DateTime<Utc>,
    /// Action token, e.g. "sip_calculator_started"
    pub action: String,
    #[serde(default)]
    pub context: EventContext,
    pub session_id: String,
}

impl BehaviorEvent {
    /// Create an event stamped with the current time
    pub fn new(action: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self::at(Utc::now(), action, session_id)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        action: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            action: action.into(),
            context: EventContext::default(),
            session_id: session_id.into(),
        }
    }

    pub fn with_context(mut self, context: EventContext) -> Self {
        self.context = context;
        self
    }

    pub fn is_started(&self) -> bool {
        self.action.ends_with(STARTED_SUFFIX)
    }

    pub fn is_completed(&self) -> bool {
        self.action.ends_with(COMPLETED_SUFFIX)
    }

    /// Action with its `_started`/`_completed` suffix removed.
    ///
    /// When the event names a recommendation, that id is used instead so
    /// completion can be tracked per recommendation.
    pub fn flow_key(&self) -> Option<&str> {
        let prefix = self
            .action
            .strip_suffix(STARTED_SUFFIX)
            .or_else(|| self.action.strip_suffix(COMPLETED_SUFFIX))?;
        Some(self.context.recommendation_id.as_deref().unwrap_or(prefix))
    }
}
