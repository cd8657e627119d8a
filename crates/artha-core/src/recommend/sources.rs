//! Candidate recommendation sources
//!
//! Each source reasons about one signal independently. The synthesizer runs
//! them in registration order and merges their candidates.

use crate::behavior::{BehaviorInsights, EngagementLevel, PreferenceStrength};
use crate::config::ClassifierConfig;
use crate::location::LocationAdjuster;
use crate::models::{RiskProfile, RiskTolerance, SpendingInsights, UserProfile};
use crate::money::format_inr;
use crate::profile::ProfileClassifier;

use super::catalog::Rule;
use super::types::{BehaviorSignal, Priority, Recommendation, RecommendationDetail, Source};

/// Share of income assumed investable when sizing risk-profile SIPs
const INVESTABLE_SHARE: f64 = 0.2;

/// Starts needed before a low completion rate is trusted
const MIN_STARTS_FOR_COMPLETION: usize = 3;

/// Inputs shared by every source during one synthesis call
pub struct SynthesisContext<'a> {
    pub profile: &'a UserProfile,
    /// Validated, non-negative monthly income
    pub monthly_income: f64,
    pub behavior: &'a BehaviorInsights,
    pub spending: &'a SpendingInsights,
}

/// A producer of candidate recommendations
pub trait RecommendationSource: Send + Sync {
    /// Source tag carried by every candidate this produces
    fn source(&self) -> Source;

    fn candidates(&self, ctx: &SynthesisContext<'_>) -> Vec<Recommendation>;
}

/// Tier-gated income recommendations
#[derive(Debug, Clone, Default)]
pub struct IncomeSource {
    classifier: ProfileClassifier,
}

impl IncomeSource {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            classifier: ProfileClassifier::new(config),
        }
    }
}

impl RecommendationSource for IncomeSource {
    fn source(&self) -> Source {
        Source::Income
    }

    fn candidates(&self, ctx: &SynthesisContext<'_>) -> Vec<Recommendation> {
        let tier = self.classifier.classify(ctx.monthly_income);
        self.classifier
            .income_recommendations(tier, ctx.profile, ctx.spending.savings_rate)
    }
}

/// Canned allocation per risk profile, sized to the user's income
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskSource;

/// Equity share (percent) of the investable budget for a profile
pub fn equity_allocation_pct(profile: RiskProfile) -> f64 {
    match profile {
        RiskProfile::Conservative => 20.0,
        RiskProfile::Moderate => 40.0,
        RiskProfile::ModerateAggressive => 55.0,
        RiskProfile::Aggressive => 65.0,
        RiskProfile::SophisticatedAggressive => 70.0,
        RiskProfile::VeryAggressive => 80.0,
    }
}

impl RiskSource {
    pub fn recommendations(&self, profile: RiskProfile, monthly_income: f64) -> Vec<Recommendation> {
        let equity_allocation_pct = equity_allocation_pct(profile);
        let suggested_monthly_sip =
            (monthly_income * INVESTABLE_SHARE * equity_allocation_pct / 100.0).round();
        let detail = || RecommendationDetail::Risk {
            profile,
            equity_allocation_pct,
            suggested_monthly_sip,
        };
        let sip_impact = format!(
            "{}/month in equity keeps you at {:.0}% equity for a {} profile",
            format_inr(suggested_monthly_sip),
            equity_allocation_pct,
            profile.as_str().replace('_', " ")
        );
        let satellite = format_inr((suggested_monthly_sip * 0.2).round());

        let (core, second) = match profile {
            RiskProfile::Conservative => (
                Rule::DebtFundLadder.recommend(Priority::Medium, sip_impact, 0.8, detail()),
                Rule::PpfAllocation.recommend(
                    Priority::Low,
                    "PPF contributions up to ₹1,50,000 a year are tax-free at maturity",
                    0.75,
                    detail(),
                ),
            ),
            RiskProfile::Moderate => (
                Rule::BalancedSip.recommend(Priority::Medium, sip_impact, 0.8, detail()),
                Rule::IndexFundCore.recommend(
                    Priority::Low,
                    "Index funds cost under 0.3% a year, a fraction of active fund fees",
                    0.75,
                    detail(),
                ),
            ),
            RiskProfile::ModerateAggressive => (
                Rule::EquityTiltSip.recommend(Priority::Medium, sip_impact, 0.75, detail()),
                Rule::MidcapAllocation.recommend(
                    Priority::Low,
                    format!("A {}/month mid-cap sleeve adds growth without dominating", satellite),
                    0.7,
                    detail(),
                ),
            ),
            RiskProfile::Aggressive => (
                Rule::EquityGrowth.recommend(Priority::Medium, sip_impact, 0.75, detail()),
                Rule::MidcapAllocation.recommend(
                    Priority::Low,
                    format!("A {}/month mid-cap sleeve adds growth without dominating", satellite),
                    0.7,
                    detail(),
                ),
            ),
            RiskProfile::SophisticatedAggressive => (
                Rule::DirectEquity.recommend(Priority::Medium, sip_impact, 0.7, detail()),
                Rule::InternationalDiversification.recommend(
                    Priority::Low,
                    format!("Route {}/month to a US or global index fund", satellite),
                    0.65,
                    detail(),
                ),
            ),
            RiskProfile::VeryAggressive => (
                Rule::HighGrowthEquity.recommend(Priority::Medium, sip_impact, 0.65, detail()),
                Rule::RiskGuardrails.recommend(
                    Priority::Medium,
                    "Limit any single position to 5% so one loss cannot sink the plan",
                    0.8,
                    detail(),
                ),
            ),
        };
        vec![core, second]
    }
}

impl RecommendationSource for RiskSource {
    fn source(&self) -> Source {
        Source::Risk
    }

    fn candidates(&self, ctx: &SynthesisContext<'_>) -> Vec<Recommendation> {
        self.recommendations(ctx.profile.risk_profile, ctx.monthly_income)
    }
}

/// City cost-of-living recommendations
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationSource {
    adjuster: LocationAdjuster,
}

impl RecommendationSource for LocationSource {
    fn source(&self) -> Source {
        Source::Location
    }

    fn candidates(&self, ctx: &SynthesisContext<'_>) -> Vec<Recommendation> {
        let city = self.adjuster.resolve(&ctx.profile.location);
        self.adjuster
            .compute_insights(city, ctx.monthly_income)
            .recommendations
    }
}

/// Nudges derived from observed behavior. Produces nothing without history.
#[derive(Debug, Clone, Copy, Default)]
pub struct BehavioralSource;

impl BehavioralSource {
    pub fn recommendations(
        &self,
        behavior: &BehaviorInsights,
        declared: RiskProfile,
    ) -> Vec<Recommendation> {
        if behavior.is_empty() {
            return Vec::new();
        }
        let detail = |signal, feature: Option<String>| RecommendationDetail::Behavioral {
            signal,
            feature,
        };
        let mut recs = Vec::new();

        let completion = &behavior.completion;
        if completion.started >= MIN_STARTS_FOR_COMPLETION && completion.rate < 0.3 {
            recs.push(Rule::FinishStartedPlans.recommend(
                Priority::Medium,
                format!(
                    "You finished {} of {} plans you started",
                    completion.completed, completion.started
                ),
                0.7,
                detail(BehaviorSignal::LowCompletion, None),
            ));
        }

        let inferred = behavior.risk_tolerance;
        if inferred != RiskTolerance::Moderate && inferred != declared.tolerance() {
            recs.push(Rule::RiskProfileReview.recommend(
                Priority::Medium,
                format!(
                    "Your recent activity looks {}, but your profile says {}",
                    inferred,
                    declared.as_str().replace('_', " ")
                ),
                0.65,
                detail(BehaviorSignal::RiskMismatch, None),
            ));
        }

        if behavior.engagement.level == EngagementLevel::Low {
            recs.push(Rule::QuickWins.recommend(
                Priority::Low,
                format!(
                    "{} actions this week; one small task keeps your plan moving",
                    behavior.engagement.recent_events
                ),
                0.6,
                detail(BehaviorSignal::LowEngagement, None),
            ));
        }

        if let Some(top) = behavior
            .preferred_features
            .first()
            .filter(|f| f.strength == PreferenceStrength::High)
        {
            recs.push(Rule::FeatureDeepDive.recommend(
                Priority::Low,
                format!("You have used {} {} times", top.feature.replace('_', " "), top.count),
                0.6,
                detail(BehaviorSignal::FeatureAffinity, Some(top.feature.clone())),
            ));
        }

        recs
    }
}

impl RecommendationSource for BehavioralSource {
    fn source(&self) -> Source {
        Source::Behavioral
    }

    fn candidates(&self, ctx: &SynthesisContext<'_>) -> Vec<Recommendation> {
        self.recommendations(ctx.behavior, ctx.profile.risk_profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorAnalyzer;
    use crate::test_utils::{feature_event, flow_events, mumbai_profile};

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_every_risk_profile_has_a_canned_set() {
        for profile in RiskProfile::all() {
            let recs = RiskSource.recommendations(*profile, 100_000.0);
            assert_eq!(recs.len(), 2, "{}", profile);
            assert!(recs.iter().all(|r| r.source() == Source::Risk));
            assert_ne!(recs[0].id, recs[1].id);
        }
    }

    #[test]
    fn test_risk_sip_is_sized_to_income() {
        let recs = RiskSource.recommendations(RiskProfile::Moderate, 100_000.0);
        assert_eq!(ids(&recs), vec!["balanced_sip", "index_fund_core"]);
        match &recs[0].detail {
            RecommendationDetail::Risk {
                suggested_monthly_sip,
                equity_allocation_pct,
                ..
            } => {
                assert_eq!(*equity_allocation_pct, 40.0);
                assert_eq!(*suggested_monthly_sip, 8_000.0);
            }
            other => panic!("unexpected detail {:?}", other),
        }
        assert!(recs[0].impact.contains("₹8,000"));
    }

    #[test]
    fn test_location_source_uses_profile_city() {
        let profile = mumbai_profile();
        let behavior = BehaviorInsights::default();
        let spending = SpendingInsights::with_savings_rate(15.0);
        let ctx = SynthesisContext {
            profile: &profile,
            monthly_income: 125_000.0,
            behavior: &behavior,
            spending: &spending,
        };

        let recs = LocationSource::default().candidates(&ctx);
        assert_eq!(ids(&recs), vec!["metro_budgeting", "real_estate_strategy"]);
    }

    #[test]
    fn test_behavioral_source_is_silent_without_history() {
        let recs = BehavioralSource.recommendations(&BehaviorInsights::default(), RiskProfile::Moderate);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_behavioral_source_signals() {
        let mut history = flow_events("goal_setup", 4, 0);
        history.extend((0..10).map(|i| feature_event("sip_calculator", 10 + i)));
        let behavior = BehaviorAnalyzer::default().analyze(&history);

        let recs = BehavioralSource.recommendations(&behavior, RiskProfile::Moderate);
        assert_eq!(ids(&recs), vec!["finish_started_plans", "feature_deep_dive"]);
        assert_eq!(
            recs[1].detail,
            RecommendationDetail::Behavioral {
                signal: BehaviorSignal::FeatureAffinity,
                feature: Some("sip_calculator".to_string()),
            }
        );
    }

    #[test]
    fn test_low_engagement_gets_quick_wins() {
        let history = vec![feature_event("budget", 0)];
        let behavior = BehaviorAnalyzer::default().analyze(&history);

        let recs = BehavioralSource.recommendations(&behavior, RiskProfile::Moderate);
        assert_eq!(ids(&recs), vec!["quick_wins"]);
        assert_eq!(recs[0].priority, Priority::Low);
    }

    #[test]
    fn test_risk_mismatch_needs_a_clear_lean() {
        let mut behavior = BehaviorInsights {
            event_count: 5,
            ..Default::default()
        };
        behavior.engagement.level = EngagementLevel::Medium;

        behavior.risk_tolerance = RiskTolerance::Aggressive;
        let recs = BehavioralSource.recommendations(&behavior, RiskProfile::Conservative);
        assert_eq!(ids(&recs), vec!["risk_profile_review"]);

        let recs = BehavioralSource.recommendations(&behavior, RiskProfile::VeryAggressive);
        assert!(recs.is_empty());

        behavior.risk_tolerance = RiskTolerance::Moderate;
        let recs = BehavioralSource.recommendations(&behavior, RiskProfile::Conservative);
        assert!(recs.is_empty());
    }
}
