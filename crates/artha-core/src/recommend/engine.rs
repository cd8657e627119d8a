//! Personalization Engine - tracking, analysis and recommendation in one place

use crate::behavior::{
    BehaviorAnalyzer, BehaviorInsights, BehaviorRepository, InMemoryBehaviorLog,
    LedgerSpendSource, SpendingAnalysis, SpendingAnalyzer,
};
use crate::config::EngineConfig;
use crate::models::{BehaviorEvent, SpendingInsights, UserProfile};
use crate::Result;

use super::refiner::AdaptiveRefiner;
use super::synthesizer::RecommendationSynthesizer;
use super::types::RecommendationSet;

/// Front door for callers: owns the behavior log and the recommendation pipeline
pub struct PersonalizationEngine {
    config: EngineConfig,
    repository: Box<dyn BehaviorRepository>,
    analyzer: BehaviorAnalyzer,
    spending: SpendingAnalyzer,
    synthesizer: RecommendationSynthesizer,
    refiner: AdaptiveRefiner,
}

impl Default for PersonalizationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PersonalizationEngine {
    /// Engine with an in-memory behavior log sized from the config
    pub fn new(config: EngineConfig) -> Self {
        let repository = Box::new(InMemoryBehaviorLog::new(config.behavior.log_capacity));
        Self::with_repository(config, repository)
    }

    pub fn with_repository(config: EngineConfig, repository: Box<dyn BehaviorRepository>) -> Self {
        Self {
            analyzer: BehaviorAnalyzer::new(config.behavior.clone()),
            spending: SpendingAnalyzer::new(config.spending.clone()),
            synthesizer: RecommendationSynthesizer::new(&config),
            refiner: AdaptiveRefiner::new(config.refine.clone()),
            repository,
            config,
        }
    }

    /// Swap the behavior analyzer, e.g. for one with a custom scorer
    pub fn with_analyzer(mut self, analyzer: BehaviorAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: RecommendationSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &dyn BehaviorRepository {
        self.repository.as_ref()
    }

    /// Record one user action
    pub fn track(&self, user_id: &str, event: BehaviorEvent) {
        tracing::debug!(user = user_id, action = %event.action, "Tracking event");
        self.repository.append(user_id, event);
    }

    pub fn behavior_insights(&self, user_id: &str) -> BehaviorInsights {
        self.analyzer.analyze(&self.repository.get(user_id))
    }

    /// Trend, volatility and seasonality of the ledger in `spending`, if it has one
    pub fn spending_analysis(&self, spending: &SpendingInsights) -> Option<SpendingAnalysis> {
        LedgerSpendSource::from_insights(spending).map(|source| self.spending.analyze(&source))
    }

    /// Ranked, refined recommendations for a user.
    ///
    /// Fails only when the profile is missing a usable monthly income.
    pub fn recommend(
        &self,
        profile: &UserProfile,
        spending: &SpendingInsights,
    ) -> Result<RecommendationSet> {
        let behavior = self.behavior_insights(&profile.user_id);
        let synthesized = self.synthesizer.synthesize(profile, &behavior, spending)?;
        let refined = self.refiner.refine(synthesized, &behavior);

        let set = RecommendationSet::from_ranked(
            refined.into_vec(),
            self.synthesizer.max_recommendations(),
        );
        tracing::info!(
            user = %profile.user_id,
            count = set.len(),
            events = behavior.event_count,
            "Recommendations ready"
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventContext;
    use crate::test_utils::{event_at, flow_events, monthly_series, mumbai_profile};

    #[test]
    fn test_track_and_analyze() {
        let engine = PersonalizationEngine::default();
        for event in flow_events("budget_setup", 2, 1) {
            engine.track("u1", event);
        }

        let insights = engine.behavior_insights("u1");
        assert_eq!(insights.event_count, 3);
        assert_eq!(insights.completion.started, 2);
        assert!(engine.behavior_insights("u2").is_empty());
    }

    #[test]
    fn test_log_capacity_comes_from_config() {
        let mut config = EngineConfig::default();
        config.behavior.log_capacity = 5;
        let engine = PersonalizationEngine::new(config);

        for i in 0..8 {
            engine.track("u1", event_at("view", i, "s1"));
        }
        assert_eq!(engine.repository().len("u1"), 5);
    }

    #[test]
    fn test_spending_analysis_needs_a_ledger() {
        let engine = PersonalizationEngine::default();
        assert!(engine
            .spending_analysis(&SpendingInsights::with_savings_rate(20.0))
            .is_none());

        let spending = SpendingInsights {
            savings_rate: 20.0,
            monthly_spending: Some(monthly_series(&[100.0, 100.0, 100.0, 130.0, 130.0, 130.0])),
        };
        let analysis = engine.spending_analysis(&spending).unwrap();
        assert_eq!(analysis.months, 6);
    }

    #[test]
    fn test_recommend_refines_by_history() {
        let engine = PersonalizationEngine::default();
        let profile = mumbai_profile();
        for i in 0..3 {
            engine.track(
                &profile.user_id,
                event_at("plan_started", i, "s1")
                    .with_context(EventContext::default().with_recommendation("emergency_fund")),
            );
        }

        let set = engine
            .recommend(&profile, &SpendingInsights::with_savings_rate(15.0))
            .unwrap();
        assert!(set.get("simplified_emergency_fund").is_some());
        assert!(set.get("emergency_fund").is_none());
        assert!(set.len() <= 4);
    }
}
