//! End-to-end pipeline scenarios

use std::collections::HashSet;

use proptest::prelude::*;

use super::*;
use crate::behavior::{BehaviorAnalyzer, BehaviorInsights};
use crate::location::LocationAdjuster;
use crate::models::{RiskProfile, SpendingInsights, UserProfile};
use crate::test_utils::{feature_event, flow_events, mumbai_profile};

fn synthesize(profile: &UserProfile, savings_rate: f64) -> RecommendationSet {
    RecommendationSynthesizer::default()
        .synthesize(
            profile,
            &BehaviorInsights::default(),
            &SpendingInsights::with_savings_rate(savings_rate),
        )
        .unwrap()
}

#[test]
fn test_mumbai_mid_tier_scenario() {
    let set = synthesize(&mumbai_profile(), 15.0);

    assert_eq!(
        set.ids(),
        vec![
            "emergency_fund",
            "metro_budgeting",
            "tax_optimization",
            "equity_tilt_sip"
        ]
    );
    let priorities: Vec<_> = set.iter().map(|r| r.priority).collect();
    assert_eq!(
        priorities,
        vec![Priority::High, Priority::High, Priority::Medium, Priority::Medium]
    );
    assert_eq!(set.get("metro_budgeting").map(|r| r.source()), Some(Source::Location));
}

#[test]
fn test_unknown_city_and_risk_profile_fall_back() {
    let profile: UserProfile = serde_json::from_value(serde_json::json!({
        "userId": "u1",
        "monthlyIncome": 60000.0,
        "riskProfile": "unheard_of",
        "location": "Shillong"
    }))
    .unwrap();

    let set = synthesize(&profile, 5.0);
    assert!(set.get("balanced_sip").is_some());
    assert!(set.iter().all(|r| r.source() != Source::Location));
}

#[test]
fn test_zero_income_still_recommends() {
    let set = synthesize(&UserProfile::new("u", 0.0), 0.0);
    assert!(!set.is_empty());
    assert_eq!(set.ids()[0], "micro_savings");
}

#[test]
fn test_behavioral_candidates_rank_with_the_rest() {
    let profile = UserProfile::new("u", 200_000.0).with_location("Jaipur");
    let mut history = flow_events("goal_setup", 5, 0);
    history.extend((0..12).map(|i| feature_event("tax_planner", 10 + i)));
    let behavior = BehaviorAnalyzer::default().analyze(&history);

    let set = RecommendationSynthesizer::default()
        .synthesize(&profile, &behavior, &SpendingInsights::with_savings_rate(30.0))
        .unwrap();

    // high tier above its gate: wealth_diversification (M), balanced_sip (M),
    // tier2_advantage (M), finish_started_plans (M)
    assert_eq!(
        set.ids(),
        vec![
            "wealth_diversification",
            "balanced_sip",
            "tier2_advantage",
            "finish_started_plans"
        ]
    );
}

#[test]
fn test_recommendation_serializes_with_source_tag() {
    let set = synthesize(&mumbai_profile(), 15.0);
    let json = serde_json::to_value(&set).unwrap();

    let first = &json[0];
    assert_eq!(first["id"], "emergency_fund");
    assert_eq!(first["source"], "income");
    assert_eq!(first["priority"], "high");
    assert_eq!(first["tier"], "mid");
}

fn any_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

fn any_candidate() -> impl Strategy<Value = Recommendation> {
    (0..Rule::all().len(), any_priority()).prop_map(|(i, priority)| {
        Recommendation::new(
            Rule::all()[i].id(),
            priority,
            "t",
            "d",
            "i",
            0.5,
            RecommendationDetail::Behavioral {
                signal: BehaviorSignal::LowEngagement,
                feature: None,
            },
        )
    })
}

proptest! {
    #[test]
    fn prop_merge_is_bounded_unique_and_ordered(
        candidates in prop::collection::vec(any_candidate(), 0..40)
    ) {
        let set = merge(candidates, 4);

        prop_assert!(set.len() <= 4);
        let unique: HashSet<_> = set.ids().into_iter().collect();
        prop_assert_eq!(unique.len(), set.len());
        let ranks: Vec<_> = set.iter().map(|r| r.priority.rank()).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prop_synthesis_is_bounded_for_any_profile(
        income in -100_000.0f64..1_000_000.0,
        savings_rate in -10.0f64..120.0,
        risk in 0..RiskProfile::all().len(),
        city in 0..LocationAdjuster::new().cities().len() + 1,
    ) {
        let location = LocationAdjuster::new()
            .cities()
            .get(city)
            .map(|c| c.name)
            .unwrap_or("Nowhere");
        let profile = UserProfile::new("u", income)
            .with_risk_profile(RiskProfile::all()[risk])
            .with_location(location);

        let set = synthesize(&profile, savings_rate);
        prop_assert!(set.len() <= 4);
        let unique: HashSet<_> = set.ids().into_iter().collect();
        prop_assert_eq!(unique.len(), set.len());
        prop_assert!(set.iter().all(|r| (0.0..=1.0).contains(&r.confidence)));
    }
}
