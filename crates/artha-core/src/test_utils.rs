//! Builders for tests (enabled under `cfg(test)` or the `test-utils` feature)

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{BehaviorEvent, EventContext, MonthlySpend, RiskProfile, UserProfile};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Fixed reference instant so event windows are reproducible
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Event `offset_minutes` after [`base_time`] (negative for earlier)
pub fn event_at(action: &str, offset_minutes: i64, session: &str) -> BehaviorEvent {
    BehaviorEvent::at(
        base_time() + Duration::minutes(offset_minutes),
        action,
        session,
    )
}

/// A `<feature>_used` event tagged with its feature
pub fn feature_event(feature: &str, offset_minutes: i64) -> BehaviorEvent {
    event_at(&format!("{}_used", feature), offset_minutes, "s1")
        .with_context(EventContext::feature(feature))
}

/// `started` starts of a flow followed by `completed` completions
pub fn flow_events(prefix: &str, started: usize, completed: usize) -> Vec<BehaviorEvent> {
    let starts = (0..started).map(|i| event_at(&format!("{}_started", prefix), i as i64, "s1"));
    let completions = (0..completed).map(|i| {
        event_at(
            &format!("{}_completed", prefix),
            (started + i) as i64,
            "s1",
        )
    });
    starts.chain(completions).collect()
}

/// Monthly totals labelled from 2025-01 onward
pub fn monthly_series(totals: &[f64]) -> Vec<MonthlySpend> {
    totals
        .iter()
        .enumerate()
        .map(|(i, total)| {
            MonthlySpend::new(
                format!("{:04}-{:02}", 2025 + i / 12, i % 12 + 1),
                *total,
            )
        })
        .collect()
}

/// Mid-tier Mumbai professional with a moderate-aggressive profile
pub fn mumbai_profile() -> UserProfile {
    UserProfile::new("user-mumbai", 125_000.0)
        .with_risk_profile(RiskProfile::ModerateAggressive)
        .with_location("Mumbai, Maharashtra")
        .with_profession("Software Engineer")
        .with_age(30)
}
