//! Income tier classification and tier-specific recommendations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculators::{emergency_fund, sip, tax_savings, DEFAULT_EMERGENCY_MONTHS};
use crate::config::ClassifierConfig;
use crate::models::UserProfile;
use crate::money::{format_inr, sanitize};
use crate::recommend::catalog::Rule;
use crate::recommend::types::{Priority, Recommendation, RecommendationDetail};

/// Income classification bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeTier {
    Low,
    Mid,
    High,
}

impl IncomeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeTier::Low => "low",
            IncomeTier::Mid => "mid",
            IncomeTier::High => "high",
        }
    }
}

impl fmt::Display for IncomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Basic,
    Intermediate,
    Advanced,
}

/// Baseline guidance for a tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierInsights {
    pub tier: IncomeTier,
    pub savings_target_percent: f64,
    pub investment_focus: &'static str,
    pub priority_list: &'static [&'static str],
    pub complexity_level: ComplexityLevel,
}

/// Savings rate (percent) below which a tier gets its savings-gap recommendation
fn savings_gate(tier: IncomeTier) -> f64 {
    match tier {
        IncomeTier::Low => 10.0,
        IncomeTier::Mid => 20.0,
        IncomeTier::High => 25.0,
    }
}

/// Classifies users by monthly income and proposes tier-specific actions
#[derive(Debug, Clone, Default)]
pub struct ProfileClassifier {
    config: ClassifierConfig,
}

impl ProfileClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Map monthly income to a tier. Zero, negative and NaN incomes are `Low`.
    pub fn classify(&self, monthly_income: f64) -> IncomeTier {
        if monthly_income >= self.config.high_income_threshold {
            IncomeTier::High
        } else if monthly_income >= self.config.mid_income_threshold {
            IncomeTier::Mid
        } else {
            IncomeTier::Low
        }
    }

    pub fn derive_insights(&self, tier: IncomeTier) -> TierInsights {
        match tier {
            IncomeTier::Low => TierInsights {
                tier,
                savings_target_percent: 10.0,
                investment_focus: "Emergency fund and small recurring savings",
                priority_list: &["emergency_fund", "micro_savings", "insurance"],
                complexity_level: ComplexityLevel::Basic,
            },
            IncomeTier::Mid => TierInsights {
                tier,
                savings_target_percent: 20.0,
                investment_focus: "Balanced growth through SIPs",
                priority_list: &["emergency_fund", "tax_optimization", "sip_start"],
                complexity_level: ComplexityLevel::Intermediate,
            },
            IncomeTier::High => TierInsights {
                tier,
                savings_target_percent: 30.0,
                investment_focus: "Wealth creation and tax efficiency",
                priority_list: &["tax_optimization", "wealth_diversification", "estate_planning"],
                complexity_level: ComplexityLevel::Advanced,
            },
        }
    }

    /// Tier-specific candidates, gated on the observed savings rate (percent)
    pub fn income_recommendations(
        &self,
        tier: IncomeTier,
        profile: &UserProfile,
        observed_savings_rate: f64,
    ) -> Vec<Recommendation> {
        let income = sanitize(profile.monthly_income.unwrap_or(0.0));
        let savings_rate = sanitize(observed_savings_rate).min(100.0);
        let below_gate = savings_rate < savings_gate(tier);
        let detail = || RecommendationDetail::Income { tier, savings_rate };

        let monthly_expenses = income * (1.0 - savings_rate / 100.0);
        let annual_income = income * 12.0;

        let mut recs = Vec::new();

        match tier {
            IncomeTier::High => {
                if below_gate {
                    let tax = tax_savings(annual_income, 0.0);
                    recs.push(Rule::TaxOptimization.recommend(
                        Priority::High,
                        format!(
                            "Save up to {} in tax this year at your {:.0}% bracket",
                            format_inr(tax.tax_savings),
                            tax.bracket_rate_pct
                        ),
                        0.9,
                        detail(),
                    ));
                }
                let target_pct = self.derive_insights(tier).savings_target_percent;
                recs.push(Rule::WealthDiversification.recommend(
                    Priority::Medium,
                    format!(
                        "Investing {}/month ({:.0}% of income) keeps you on a wealth-building track",
                        format_inr(income * target_pct / 100.0),
                        target_pct
                    ),
                    0.75,
                    detail(),
                ));
            }
            IncomeTier::Mid => {
                if below_gate {
                    let fund = emergency_fund(monthly_expenses, DEFAULT_EMERGENCY_MONTHS);
                    recs.push(Rule::EmergencyFund.recommend(
                        Priority::High,
                        format!(
                            "Target {} to cover {:.0} months of expenses",
                            format_inr(fund.target_amount),
                            fund.target_months
                        ),
                        0.85,
                        detail(),
                    ));
                }
                let tax = tax_savings(annual_income, 0.0);
                recs.push(Rule::TaxOptimization.recommend(
                    Priority::Medium,
                    format!(
                        "Save up to {} in tax by using the full 80C limit",
                        format_inr(tax.tax_savings)
                    ),
                    0.8,
                    detail(),
                ));
                let goal = sip(1_000_000.0, 10.0, 12.0);
                recs.push(Rule::SipStart.recommend(
                    Priority::Low,
                    format!(
                        "{}/month at 12% grows to {} in 10 years",
                        format_inr(goal.monthly_sip),
                        format_inr(goal.target_amount)
                    ),
                    0.7,
                    detail(),
                ));
            }
            IncomeTier::Low => {
                let daily = (income * 0.01 / 30.0).max(10.0).round();
                recs.push(Rule::MicroSavings.recommend(
                    Priority::High,
                    format!(
                        "Saving {}/day adds up to {} a year",
                        format_inr(daily),
                        format_inr(daily * 365.0)
                    ),
                    0.8,
                    detail(),
                ));
                if below_gate {
                    let fund = emergency_fund(monthly_expenses, DEFAULT_EMERGENCY_MONTHS);
                    recs.push(Rule::EmergencyFund.recommend(
                        Priority::Medium,
                        format!(
                            "Work toward {} in small steps, starting with one month of expenses",
                            format_inr(fund.target_amount)
                        ),
                        0.75,
                        detail(),
                    ));
                }
            }
        }

        tracing::debug!(
            tier = tier.as_str(),
            savings_rate,
            count = recs.len(),
            "Income recommendations generated"
        );
        recs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_classify_thresholds() {
        let classifier = ProfileClassifier::default();
        assert_eq!(classifier.classify(79_999.0), IncomeTier::Low);
        assert_eq!(classifier.classify(80_000.0), IncomeTier::Mid);
        assert_eq!(classifier.classify(149_999.0), IncomeTier::Mid);
        assert_eq!(classifier.classify(150_000.0), IncomeTier::High);
    }

    #[test]
    fn test_classify_degenerate_income() {
        let classifier = ProfileClassifier::default();
        assert_eq!(classifier.classify(0.0), IncomeTier::Low);
        assert_eq!(classifier.classify(-50_000.0), IncomeTier::Low);
        assert_eq!(classifier.classify(f64::NAN), IncomeTier::Low);
    }

    #[test]
    fn test_classify_custom_thresholds() {
        let classifier = ProfileClassifier::new(ClassifierConfig {
            mid_income_threshold: 50_000.0,
            high_income_threshold: 100_000.0,
        });
        assert_eq!(classifier.classify(60_000.0), IncomeTier::Mid);
        assert_eq!(classifier.classify(100_000.0), IncomeTier::High);
    }

    #[test]
    fn test_derive_insights_targets_increase_with_tier() {
        let classifier = ProfileClassifier::default();
        let low = classifier.derive_insights(IncomeTier::Low);
        let mid = classifier.derive_insights(IncomeTier::Mid);
        let high = classifier.derive_insights(IncomeTier::High);

        assert!(low.savings_target_percent < mid.savings_target_percent);
        assert!(mid.savings_target_percent < high.savings_target_percent);
        assert_eq!(high.complexity_level, ComplexityLevel::Advanced);
    }

    #[test]
    fn test_high_tier_gate() {
        let classifier = ProfileClassifier::default();
        let profile = UserProfile::new("u", 200_000.0);

        let below = classifier.income_recommendations(IncomeTier::High, &profile, 20.0);
        assert_eq!(ids(&below), vec!["tax_optimization", "wealth_diversification"]);
        assert!(below[0].impact.contains("30%"));

        let above = classifier.income_recommendations(IncomeTier::High, &profile, 25.0);
        assert_eq!(ids(&above), vec!["wealth_diversification"]);
    }

    #[test]
    fn test_mid_tier_gate() {
        let classifier = ProfileClassifier::default();
        let profile = UserProfile::new("u", 125_000.0);

        let below = classifier.income_recommendations(IncomeTier::Mid, &profile, 15.0);
        assert_eq!(ids(&below), vec!["emergency_fund", "tax_optimization", "sip_start"]);
        assert_eq!(below[0].priority, Priority::High);
        // 6 months of 85% of 1,25,000
        assert!(below[0].impact.contains("₹6,37,500"));

        let above = classifier.income_recommendations(IncomeTier::Mid, &profile, 20.0);
        assert_eq!(ids(&above), vec!["tax_optimization", "sip_start"]);
    }

    #[test]
    fn test_low_tier_always_has_micro_savings() {
        let classifier = ProfileClassifier::default();
        let profile = UserProfile::new("u", 30_000.0);

        let recs = classifier.income_recommendations(IncomeTier::Low, &profile, 50.0);
        assert_eq!(ids(&recs), vec!["micro_savings"]);

        let recs = classifier.income_recommendations(IncomeTier::Low, &profile, 5.0);
        assert_eq!(ids(&recs), vec!["micro_savings", "emergency_fund"]);
    }

    #[test]
    fn test_income_recommendations_carry_income_detail() {
        let classifier = ProfileClassifier::default();
        let profile = UserProfile::new("u", 90_000.0);
        for rec in classifier.income_recommendations(IncomeTier::Mid, &profile, 0.0) {
            assert_eq!(
                rec.detail,
                RecommendationDetail::Income {
                    tier: IncomeTier::Mid,
                    savings_rate: 0.0
                }
            );
        }
    }
}
