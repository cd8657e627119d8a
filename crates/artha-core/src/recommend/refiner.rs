//! Adaptive refinement of recommendations by historical follow-through

use serde::Serialize;

use crate::behavior::BehaviorInsights;
use crate::config::RefineConfig;

use super::catalog::advanced_option;
use super::types::{Recommendation, RecommendationSet};

const SIMPLIFIED_PREFIX: &str = "simplified_";
const ADVANCED_PREFIX: &str = "advanced_";
const SIMPLIFIED_TITLE_PREFIX: &str = "Start small: ";

/// What the refiner did to one recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Adaptation {
    Simplified,
    Enhanced,
    Unchanged,
}

/// Leading clause of a description, up to the first `,`, `;` or `.`
pub fn first_clause(description: &str) -> String {
    let clause = description
        .split([',', ';', '.'])
        .next()
        .unwrap_or(description)
        .trim();
    if clause.is_empty() {
        description.trim().to_string()
    } else {
        format!("{}.", clause)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdaptiveRefiner {
    config: RefineConfig,
}

impl AdaptiveRefiner {
    pub fn new(config: RefineConfig) -> Self {
        Self { config }
    }

    /// Completion rate to judge `rec` by.
    ///
    /// Uses the rate for that recommendation when the user has started it,
    /// else the overall rate, else `None` when nothing was ever started.
    pub fn completion_rate(&self, rec: &Recommendation, behavior: &BehaviorInsights) -> Option<f64> {
        behavior.completion_rate_for(&rec.id).or_else(|| {
            if behavior.completion.started > 0 {
                Some(behavior.completion.rate)
            } else {
                None
            }
        })
    }

    pub fn adaptation_for(&self, rate: Option<f64>) -> Adaptation {
        match rate {
            Some(rate) if rate < self.config.simplify_below => Adaptation::Simplified,
            Some(rate) if rate > self.config.enhance_above => Adaptation::Enhanced,
            _ => Adaptation::Unchanged,
        }
    }

    pub fn refine_one(&self, rec: Recommendation, adaptation: Adaptation) -> Recommendation {
        match adaptation {
            Adaptation::Unchanged => rec,
            Adaptation::Simplified => {
                let confidence = rec.confidence * 0.8;
                Recommendation {
                    id: format!("{}{}", SIMPLIFIED_PREFIX, rec.id),
                    title: format!("{}{}", SIMPLIFIED_TITLE_PREFIX, rec.title),
                    description: first_clause(&rec.description),
                    ..rec
                }
                .with_confidence(confidence)
            }
            Adaptation::Enhanced => {
                let confidence = (rec.confidence * 1.1).min(1.0);
                let description = format!(
                    "{} {}",
                    rec.description.trim_end(),
                    advanced_option(rec.source())
                );
                Recommendation {
                    id: format!("{}{}", ADVANCED_PREFIX, rec.id),
                    description,
                    ..rec
                }
                .with_confidence(confidence)
            }
        }
    }

    /// Rewrite each recommendation by its completion rate, keeping order
    pub fn refine(&self, set: RecommendationSet, behavior: &BehaviorInsights) -> RecommendationSet {
        let max = set.len();
        let refined = set
            .into_iter()
            .map(|rec| {
                let rate = self.completion_rate(&rec, behavior);
                let adaptation = self.adaptation_for(rate);
                if adaptation != Adaptation::Unchanged {
                    tracing::debug!(
                        id = %rec.id,
                        rate = rate.unwrap_or_default(),
                        ?adaptation,
                        "Recommendation refined"
                    );
                }
                self.refine_one(rec, adaptation)
            })
            .collect();
        RecommendationSet::from_ranked(refined, max)
    }
}
