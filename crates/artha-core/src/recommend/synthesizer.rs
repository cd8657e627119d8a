//! Recommendation Synthesizer - merges candidate sources into one ranked set

use crate::behavior::BehaviorInsights;
use crate::config::EngineConfig;
use crate::models::{SpendingInsights, UserProfile};
use crate::Result;

use super::sources::{
    BehavioralSource, IncomeSource, LocationSource, RecommendationSource, RiskSource,
    SynthesisContext,
};
use super::types::{Recommendation, RecommendationSet};

/// Rank candidates and keep the best `max` unique ids.
///
/// The sort is stable: equal-priority candidates keep their source order, and
/// the first occurrence of an id after sorting wins.
pub fn merge(mut candidates: Vec<Recommendation>, max: usize) -> RecommendationSet {
    let total = candidates.len();
    candidates.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    let set = RecommendationSet::from_ranked(candidates, max);

    tracing::debug!(candidates = total, kept = set.len(), max, "Candidates merged");
    set
}

/// Runs the registered sources in order and merges their output
pub struct RecommendationSynthesizer {
    sources: Vec<Box<dyn RecommendationSource>>,
    max_recommendations: usize,
}

impl Default for RecommendationSynthesizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl RecommendationSynthesizer {
    /// Create a synthesizer with the built-in sources: income, risk, location,
    /// then behavioral
    pub fn new(config: &EngineConfig) -> Self {
        let mut synthesizer = Self::empty(config.synthesis.max_recommendations);

        synthesizer.register(Box::new(IncomeSource::new(config.classifier.clone())));
        synthesizer.register(Box::new(RiskSource));
        synthesizer.register(Box::new(LocationSource::default()));
        synthesizer.register(Box::new(BehavioralSource));

        synthesizer
    }

    /// A synthesizer with no sources registered
    pub fn empty(max_recommendations: usize) -> Self {
        Self {
            sources: Vec::new(),
            max_recommendations,
        }
    }

    /// Register a source; it runs after those already registered
    pub fn register(&mut self, source: Box<dyn RecommendationSource>) {
        self.sources.push(source);
    }

    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    /// Fails only when the profile has no usable monthly income
    pub fn synthesize(
        &self,
        profile: &UserProfile,
        behavior: &BehaviorInsights,
        spending: &SpendingInsights,
    ) -> Result<RecommendationSet> {
        let ctx = SynthesisContext {
            profile,
            monthly_income: profile.validated_income()?,
            behavior,
            spending,
        };

        let mut candidates = Vec::new();
        for source in &self.sources {
            let produced = source.candidates(&ctx);
            tracing::debug!(
                source = source.source().as_str(),
                count = produced.len(),
                "Candidates gathered"
            );
            candidates.extend(produced);
        }

        Ok(merge(candidates, self.max_recommendations))
    }
}
