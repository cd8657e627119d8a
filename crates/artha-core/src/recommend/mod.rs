//! Recommendation pipeline
//!
//! Candidate sources (income, risk, location, behavior) each reason about one
//! signal. The synthesizer ranks and dedupes their output, the refiner adapts
//! it to the user's follow-through, and the engine ties both to the behavior
//! log.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use artha_core::recommend::PersonalizationEngine;
//!
//! let engine = PersonalizationEngine::new(EngineConfig::load()?);
//! engine.track(&profile.user_id, BehaviorEvent::new("sip_calculator_started", session));
//! let recommendations = engine.recommend(&profile, &spending)?;
//! ```

pub mod catalog;
pub mod engine;
pub mod refiner;
pub mod sources;
pub mod synthesizer;
pub mod types;

#[cfg(test)]
mod tests;

pub use catalog::Rule;
pub use engine::PersonalizationEngine;
pub use refiner::{Adaptation, AdaptiveRefiner};
pub use sources::{
    BehavioralSource, IncomeSource, LocationSource, RecommendationSource, RiskSource,
    SynthesisContext,
};
pub use synthesizer::{merge, RecommendationSynthesizer};
pub use types::{
    BehaviorSignal, Priority, Recommendation, RecommendationDetail, RecommendationSet, Source,
};
