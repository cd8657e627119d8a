//! Behavior scoring
//!
//! Each heuristic sits behind [`BehaviorScorer`] so a learned model can replace
//! one of them without touching [`BehaviorAnalyzer`] or its callers.
//! [`RuleBasedScorer`] is the fixed-threshold implementation.
//!
//! Time windows are anchored at the newest event in the history rather than the
//! wall clock, so the same history always scores the same.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};

use super::types::{
    BehaviorInsights, CompletionStats, Engagement, EngagementLevel, FeaturePreference,
    FlowCompletion, PreferenceStrength, TrendDirection,
};
use crate::config::BehaviorConfig;
use crate::models::{BehaviorEvent, RiskTolerance};

const TOP_FEATURES: usize = 5;

const CONSERVATIVE_TOKENS: &[&str] = &[
    "fd",
    "deposit",
    "ppf",
    "debt",
    "insurance",
    "conservative",
];
const AGGRESSIVE_TOKENS: &[&str] = &[
    "stock",
    "stocks",
    "equity",
    "crypto",
    "smallcap",
    "options",
    "aggressive",
];

/// One method per behavioral heuristic. Histories are chronological.
pub trait BehaviorScorer: Send + Sync {
    fn name(&self) -> &str;

    fn engagement(&self, history: &[BehaviorEvent]) -> Engagement;

    fn preferred_features(&self, history: &[BehaviorEvent]) -> Vec<FeaturePreference>;

    fn risk_tolerance(&self, history: &[BehaviorEvent]) -> RiskTolerance;

    fn completion(&self, history: &[BehaviorEvent]) -> CompletionStats;
}

/// Threshold heuristics over counts and windows
///
/// The engagement trend compares event counts in two adjacent time windows of
/// `trend_window_days` each (the latest window against the one before it),
/// not the last N events against the previous N.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedScorer {
    config: BehaviorConfig,
}

impl RuleBasedScorer {
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    fn count_between(
        history: &[BehaviorEvent],
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> usize {
        history
            .iter()
            .filter(|e| e.timestamp > after && e.timestamp <= until)
            .count()
    }
}

fn newest(history: &[BehaviorEvent]) -> Option<DateTime<Utc>> {
    history.iter().map(|e| e.timestamp).max()
}

/// `days` before `anchor`, saturating at the earliest representable instant
fn days_before(anchor: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|d| anchor.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Average per-session time. A session counts the larger of its first-to-last
/// span and the sum of measured durations.
fn avg_session_secs(events: &[&BehaviorEvent]) -> f64 {
    struct Session {
        first: DateTime<Utc>,
        last: DateTime<Utc>,
        measured: f64,
    }

    let mut sessions: HashMap<&str, Session> = HashMap::new();
    for event in events {
        let measured = event
            .context
            .duration_secs
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0);
        let session = sessions.entry(event.session_id.as_str()).or_insert(Session {
            first: event.timestamp,
            last: event.timestamp,
            measured: 0.0,
        });
        session.first = session.first.min(event.timestamp);
        session.last = session.last.max(event.timestamp);
        session.measured += measured;
    }

    if sessions.is_empty() {
        return 0.0;
    }
    let total: f64 = sessions
        .values()
        .map(|s| {
            let span = (s.last - s.first).num_milliseconds() as f64 / 1000.0;
            span.max(s.measured)
        })
        .sum();
    total / sessions.len() as f64
}

fn strength_for(count: usize) -> PreferenceStrength {
    if count >= 10 {
        PreferenceStrength::High
    } else if count >= 5 {
        PreferenceStrength::Medium
    } else {
        PreferenceStrength::Low
    }
}

/// Risk lean of a single event: an explicit tag wins over action tokens
fn risk_lean(event: &BehaviorEvent) -> Option<RiskTolerance> {
    if let Some(signal) = event.context.risk_signal {
        return match signal {
            RiskTolerance::Moderate => None,
            other => Some(other),
        };
    }

    let action = event.action.to_ascii_lowercase();
    let tokens: Vec<&str> = action.split(['_', '-', ' ']).collect();
    let has = |list: &[&str]| tokens.iter().any(|t| list.contains(t));

    match (has(CONSERVATIVE_TOKENS), has(AGGRESSIVE_TOKENS)) {
        (true, false) => Some(RiskTolerance::Conservative),
        (false, true) => Some(RiskTolerance::Aggressive),
        _ => None,
    }
}

impl BehaviorScorer for RuleBasedScorer {
    fn name(&self) -> &str {
        "rule_based"
    }

    fn engagement(&self, history: &[BehaviorEvent]) -> Engagement {
        let Some(anchor) = newest(history) else {
            return Engagement::default();
        };

        let window_start = days_before(anchor, self.config.engagement_window_days);
        let recent: Vec<&BehaviorEvent> = history
            .iter()
            .filter(|e| e.timestamp > window_start)
            .collect();
        let recent_events = recent.len();
        let avg_session_secs = avg_session_secs(&recent);

        let level = if recent_events > 20 && avg_session_secs > 300.0 {
            EngagementLevel::High
        } else if recent_events > 10 && avg_session_secs > 120.0 {
            EngagementLevel::Medium
        } else {
            EngagementLevel::Low
        };

        let days = self.config.trend_window_days;
        let current_start = days_before(anchor, days);
        let current = Self::count_between(history, current_start, anchor);
        let previous = Self::count_between(
            history,
            days_before(anchor, days.saturating_mul(2)),
            current_start,
        );
        let trend = match current.cmp(&previous) {
            std::cmp::Ordering::Greater => TrendDirection::Increasing,
            std::cmp::Ordering::Less => TrendDirection::Decreasing,
            std::cmp::Ordering::Equal => TrendDirection::Stable,
        };

        Engagement {
            level,
            recent_events,
            avg_session_secs,
            trend,
        }
    }

    fn preferred_features(&self, history: &[BehaviorEvent]) -> Vec<FeaturePreference> {
        // Insertion order doubles as the first-seen tie-break
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for feature in history.iter().filter_map(|e| e.context.feature.as_deref()) {
            match counts.iter_mut().find(|(name, _)| *name == feature) {
                Some((_, count)) => *count += 1,
                None => counts.push((feature, 1)),
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(TOP_FEATURES)
            .map(|(feature, count)| FeaturePreference {
                feature: feature.to_string(),
                count,
                strength: strength_for(count),
            })
            .collect()
    }

    fn risk_tolerance(&self, history: &[BehaviorEvent]) -> RiskTolerance {
        let (mut conservative, mut aggressive) = (0usize, 0usize);
        for lean in history.iter().filter_map(risk_lean) {
            match lean {
                RiskTolerance::Conservative => conservative += 1,
                RiskTolerance::Aggressive => aggressive += 1,
                RiskTolerance::Moderate => {}
            }
        }

        if conservative > aggressive * 2 {
            RiskTolerance::Conservative
        } else if aggressive > conservative * 2 {
            RiskTolerance::Aggressive
        } else {
            RiskTolerance::Moderate
        }
    }

    fn completion(&self, history: &[BehaviorEvent]) -> CompletionStats {
        let mut by_flow: BTreeMap<String, FlowCompletion> = BTreeMap::new();
        let (mut started, mut completed) = (0usize, 0usize);

        for event in history {
            let Some(key) = event.flow_key() else {
                continue;
            };
            let flow = by_flow.entry(key.to_string()).or_default();
            if event.is_started() {
                started += 1;
                flow.started += 1;
            } else if event.is_completed() {
                completed += 1;
                flow.completed += 1;
            }
        }

        let rate = FlowCompletion { started, completed }.rate().unwrap_or(0.0);
        CompletionStats {
            rate,
            started,
            completed,
            by_flow,
        }
    }
}

/// Derives [`BehaviorInsights`] from a behavior history
pub struct BehaviorAnalyzer {
    scorer: Box<dyn BehaviorScorer>,
}

impl BehaviorAnalyzer {
    pub fn new(config: BehaviorConfig) -> Self {
        Self::with_scorer(Box::new(RuleBasedScorer::new(config)))
    }

    pub fn with_scorer(scorer: Box<dyn BehaviorScorer>) -> Self {
        Self { scorer }
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Analyze a chronological history. An empty history yields default insights.
    pub fn analyze(&self, history: &[BehaviorEvent]) -> BehaviorInsights {
        if history.is_empty() {
            return BehaviorInsights::default();
        }

        let insights = BehaviorInsights {
            event_count: history.len(),
            engagement: self.scorer.engagement(history),
            preferred_features: self.scorer.preferred_features(history),
            risk_tolerance: self.scorer.risk_tolerance(history),
            completion: self.scorer.completion(history),
        };

        tracing::debug!(
            scorer = self.scorer.name(),
            events = insights.event_count,
            engagement = insights.engagement.level.as_str(),
            risk = insights.risk_tolerance.as_str(),
            completion_rate = insights.completion.rate,
            "Behavior analyzed"
        );
        insights
    }
}

impl Default for BehaviorAnalyzer {
    fn default() -> Self {
        Self::new(BehaviorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventContext;
    use crate::test_utils::{event_at, feature_event, flow_events, MINUTES_PER_DAY};

    #[test]
    fn test_empty_history_is_default() {
        let insights = BehaviorAnalyzer::default().analyze(&[]);
        assert_eq!(insights, BehaviorInsights::default());
        assert_eq!(insights.completion_rate(), 0.0);
        assert_eq!(insights.risk_tolerance, RiskTolerance::Moderate);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_high_engagement() {
        // 25 events over a 10 minute session
        let history: Vec<_> = (0..25)
            .map(|i| event_at("screen_view", i * 25 / 60, "s1"))
            .collect();
        let engagement = RuleBasedScorer::default().engagement(&history);

        assert_eq!(engagement.recent_events, 25);
        assert!(engagement.avg_session_secs > 300.0);
        assert_eq!(engagement.level, EngagementLevel::High);
    }

    #[test]
    fn test_many_short_sessions_are_low_engagement() {
        let history: Vec<_> = (0..30)
            .map(|i| event_at("screen_view", i, &format!("s{}", i)))
            .collect();
        let engagement = RuleBasedScorer::default().engagement(&history);

        assert_eq!(engagement.recent_events, 30);
        assert_eq!(engagement.avg_session_secs, 0.0);
        assert_eq!(engagement.level, EngagementLevel::Low);
    }

    #[test]
    fn test_measured_durations_count_toward_session_time() {
        // Same instant, so the span is zero and only measured time counts
        let history: Vec<_> = (0..12)
            .map(|_| {
                event_at("sip_calculator_used", 0, "s1")
                    .with_context(EventContext::feature("sip").with_duration_secs(20.0))
            })
            .collect();
        let engagement = RuleBasedScorer::default().engagement(&history);

        assert_eq!(engagement.avg_session_secs, 240.0);
        assert_eq!(engagement.level, EngagementLevel::Medium);
    }

    #[test]
    fn test_engagement_window_excludes_old_events() {
        let mut history: Vec<_> = (0..5)
            .map(|i| event_at("old", i - 30 * MINUTES_PER_DAY, "s0"))
            .collect();
        history.push(event_at("new", 0, "s1"));

        let engagement = RuleBasedScorer::default().engagement(&history);
        assert_eq!(engagement.recent_events, 1);
    }

    #[test]
    fn test_engagement_trend() {
        let scorer = RuleBasedScorer::default();
        let older: Vec<_> = (0..6)
            .map(|i| event_at("view", i - 20 * MINUTES_PER_DAY, "s0"))
            .collect();
        let newer: Vec<_> = (0..2).map(|i| event_at("view", i, "s1")).collect();

        let declining: Vec<_> = older.iter().chain(newer.iter()).cloned().collect();
        assert_eq!(scorer.engagement(&declining).trend, TrendDirection::Decreasing);

        let growing: Vec<_> = (0..10).map(|i| event_at("view", i, "s1")).collect();
        assert_eq!(scorer.engagement(&growing).trend, TrendDirection::Increasing);
    }

    #[test]
    fn test_preferred_features_top_five_with_first_seen_ties() {
        let mut history = Vec::new();
        for (feature, count) in [
            ("budget", 2),
            ("sip", 12),
            ("tax", 2),
            ("loan", 6),
            ("goals", 1),
            ("news", 2),
            ("retirement", 1),
        ] {
            for i in 0..count {
                history.push(feature_event(feature, i));
            }
        }

        let features = RuleBasedScorer::default().preferred_features(&history);
        let names: Vec<_> = features.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, vec!["sip", "loan", "budget", "tax", "news"]);
        assert_eq!(features[0].strength, PreferenceStrength::High);
        assert_eq!(features[1].strength, PreferenceStrength::Medium);
        assert_eq!(features[2].strength, PreferenceStrength::Low);
    }

    #[test]
    fn test_risk_inference() {
        let scorer = RuleBasedScorer::default();

        let aggressive: Vec<_> = ["stock_viewed", "crypto_viewed", "equity_fund_opened"]
            .iter()
            .enumerate()
            .map(|(i, a)| event_at(a, i as i64, "s1"))
            .collect();
        assert_eq!(scorer.risk_tolerance(&aggressive), RiskTolerance::Aggressive);

        let mixed: Vec<_> = ["stock_viewed", "fd_calculator_opened", "ppf_viewed"]
            .iter()
            .enumerate()
            .map(|(i, a)| event_at(a, i as i64, "s1"))
            .collect();
        assert_eq!(scorer.risk_tolerance(&mixed), RiskTolerance::Moderate);
    }

    #[test]
    fn test_explicit_risk_signal_beats_action_tokens() {
        let history: Vec<_> = (0..3)
            .map(|i| {
                event_at("stock_viewed", i, "s1").with_context(
                    EventContext::default().with_risk_signal(RiskTolerance::Conservative),
                )
            })
            .collect();
        assert_eq!(
            RuleBasedScorer::default().risk_tolerance(&history),
            RiskTolerance::Conservative
        );
    }

    #[test]
    fn test_completion_rate() {
        let scorer = RuleBasedScorer::default();

        let history = flow_events("goal_setup", 4, 1);
        let stats = scorer.completion(&history);
        assert_eq!(stats.started, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.rate, 0.25);
        assert_eq!(stats.by_flow["goal_setup"].completed, 1);

        let no_starts = vec![event_at("goal_setup_completed", 0, "s1")];
        assert_eq!(scorer.completion(&no_starts).rate, 0.0);

        let over = flow_events("quiz", 1, 3);
        assert_eq!(scorer.completion(&over).rate, 1.0);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let mut history = flow_events("sip_calculator", 3, 2);
        history.extend((0..7).map(|i| feature_event("sip", 10 + i)));

        let analyzer = BehaviorAnalyzer::default();
        assert_eq!(analyzer.analyze(&history), analyzer.analyze(&history));
    }

    struct AlwaysAggressive(RuleBasedScorer);

    impl BehaviorScorer for AlwaysAggressive {
        fn name(&self) -> &str {
            "always_aggressive"
        }

        fn engagement(&self, history: &[BehaviorEvent]) -> Engagement {
            self.0.engagement(history)
        }

        fn preferred_features(&self, history: &[BehaviorEvent]) -> Vec<FeaturePreference> {
            self.0.preferred_features(history)
        }

        fn risk_tolerance(&self, _history: &[BehaviorEvent]) -> RiskTolerance {
            RiskTolerance::Aggressive
        }

        fn completion(&self, history: &[BehaviorEvent]) -> CompletionStats {
            self.0.completion(history)
        }
    }

    #[test]
    fn test_custom_scorer_replaces_one_heuristic() {
        let analyzer =
            BehaviorAnalyzer::with_scorer(Box::new(AlwaysAggressive(RuleBasedScorer::default())));
        let history = flow_events("ppf", 2, 2);
        let insights = analyzer.analyze(&history);

        assert_eq!(analyzer.scorer_name(), "always_aggressive");
        assert_eq!(insights.risk_tolerance, RiskTolerance::Aggressive);
        assert_eq!(insights.completion.rate, 1.0);
    }

    #[test]
    fn test_oversized_windows_saturate_instead_of_overflowing() {
        let scorer = RuleBasedScorer::new(BehaviorConfig {
            engagement_window_days: i64::MAX,
            trend_window_days: 100_000_000,
            ..BehaviorConfig::default()
        });
        let history: Vec<_> = (0..12)
            .map(|i| event_at("screen_view", i * MINUTES_PER_DAY * 40, "s1"))
            .collect();
        let engagement = scorer.engagement(&history);

        assert_eq!(engagement.recent_events, 12);
        assert_eq!(engagement.trend, TrendDirection::Increasing);
    }
}
