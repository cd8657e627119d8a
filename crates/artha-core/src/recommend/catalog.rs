//! Canonical recommendation rule table
//!
//! One entry per recommendation id. Every source takes its title and copy from
//! here so the same id always reads the same wherever it is produced.
//! Descriptions lead with a standalone first clause; the refiner uses that
//! clause as the simplified form.

use super::types::{Priority, Recommendation, RecommendationDetail, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    // Income
    TaxOptimization,
    EmergencyFund,
    MicroSavings,
    WealthDiversification,
    SipStart,
    // Risk
    DebtFundLadder,
    PpfAllocation,
    BalancedSip,
    IndexFundCore,
    EquityTiltSip,
    MidcapAllocation,
    EquityGrowth,
    DirectEquity,
    InternationalDiversification,
    HighGrowthEquity,
    RiskGuardrails,
    // Location
    MetroBudgeting,
    RealEstateStrategy,
    Tier2Advantage,
    RegionalInvestment,
    // Behavioral
    QuickWins,
    FinishStartedPlans,
    RiskProfileReview,
    FeatureDeepDive,
}

impl Rule {
    pub fn all() -> &'static [Rule] {
        &[
            Rule::TaxOptimization,
            Rule::EmergencyFund,
            Rule::MicroSavings,
            Rule::WealthDiversification,
            Rule::SipStart,
            Rule::DebtFundLadder,
            Rule::PpfAllocation,
            Rule::BalancedSip,
            Rule::IndexFundCore,
            Rule::EquityTiltSip,
            Rule::MidcapAllocation,
            Rule::EquityGrowth,
            Rule::DirectEquity,
            Rule::InternationalDiversification,
            Rule::HighGrowthEquity,
            Rule::RiskGuardrails,
            Rule::MetroBudgeting,
            Rule::RealEstateStrategy,
            Rule::Tier2Advantage,
            Rule::RegionalInvestment,
            Rule::QuickWins,
            Rule::FinishStartedPlans,
            Rule::RiskProfileReview,
            Rule::FeatureDeepDive,
        ]
    }

    /// Stable recommendation id
    pub fn id(&self) -> &'static str {
        match self {
            Rule::TaxOptimization => "tax_optimization",
            Rule::EmergencyFund => "emergency_fund",
            Rule::MicroSavings => "micro_savings",
            Rule::WealthDiversification => "wealth_diversification",
            Rule::SipStart => "sip_start",
            Rule::DebtFundLadder => "debt_fund_ladder",
            Rule::PpfAllocation => "ppf_allocation",
            Rule::BalancedSip => "balanced_sip",
            Rule::IndexFundCore => "index_fund_core",
            Rule::EquityTiltSip => "equity_tilt_sip",
            Rule::MidcapAllocation => "midcap_allocation",
            Rule::EquityGrowth => "equity_growth",
            Rule::DirectEquity => "direct_equity",
            Rule::InternationalDiversification => "international_diversification",
            Rule::HighGrowthEquity => "high_growth_equity",
            Rule::RiskGuardrails => "risk_guardrails",
            Rule::MetroBudgeting => "metro_budgeting",
            Rule::RealEstateStrategy => "real_estate_strategy",
            Rule::Tier2Advantage => "tier2_advantage",
            Rule::RegionalInvestment => "regional_investment",
            Rule::QuickWins => "quick_wins",
            Rule::FinishStartedPlans => "finish_started_plans",
            Rule::RiskProfileReview => "risk_profile_review",
            Rule::FeatureDeepDive => "feature_deep_dive",
        }
    }

    pub fn from_id(id: &str) -> Option<Rule> {
        Rule::all().iter().copied().find(|rule| rule.id() == id)
    }

    pub fn source(&self) -> Source {
        match self {
            Rule::TaxOptimization
            | Rule::EmergencyFund
            | Rule::MicroSavings
            | Rule::WealthDiversification
            | Rule::SipStart => Source::Income,
            Rule::DebtFundLadder
            | Rule::PpfAllocation
            | Rule::BalancedSip
            | Rule::IndexFundCore
            | Rule::EquityTiltSip
            | Rule::MidcapAllocation
            | Rule::EquityGrowth
            | Rule::DirectEquity
            | Rule::InternationalDiversification
            | Rule::HighGrowthEquity
            | Rule::RiskGuardrails => Source::Risk,
            Rule::MetroBudgeting
            | Rule::RealEstateStrategy
            | Rule::Tier2Advantage
            | Rule::RegionalInvestment => Source::Location,
            Rule::QuickWins
            | Rule::FinishStartedPlans
            | Rule::RiskProfileReview
            | Rule::FeatureDeepDive => Source::Behavioral,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rule::TaxOptimization => "Maximize Section 80C",
            Rule::EmergencyFund => "Build an Emergency Fund",
            Rule::MicroSavings => "Start Micro-Savings",
            Rule::WealthDiversification => "Diversify Your Wealth",
            Rule::SipStart => "Start a Monthly SIP",
            Rule::DebtFundLadder => "Ladder Your Debt Funds",
            Rule::PpfAllocation => "Top Up Your PPF",
            Rule::BalancedSip => "Balanced SIP Portfolio",
            Rule::IndexFundCore => "Index Fund Core",
            Rule::EquityTiltSip => "Tilt Toward Equity",
            Rule::MidcapAllocation => "Add a Mid-Cap Sleeve",
            Rule::EquityGrowth => "Equity Growth Allocation",
            Rule::DirectEquity => "Direct Equity Portfolio",
            Rule::InternationalDiversification => "Go International",
            Rule::HighGrowthEquity => "High-Growth Equity",
            Rule::RiskGuardrails => "Set Risk Guardrails",
            Rule::MetroBudgeting => "Metro City Budgeting",
            Rule::RealEstateStrategy => "Rent vs Buy Strategy",
            Rule::Tier2Advantage => "Use Your Tier-2 Advantage",
            Rule::RegionalInvestment => "Regional Investment Options",
            Rule::QuickWins => "Quick Wins",
            Rule::FinishStartedPlans => "Finish What You Started",
            Rule::RiskProfileReview => "Review Your Risk Profile",
            Rule::FeatureDeepDive => "Go Deeper",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::TaxOptimization => {
                "Invest the rest of your 80C limit in ELSS or PPF, before the financial year closes."
            }
            Rule::EmergencyFund => {
                "Build six months of expenses in a liquid fund, then route the surplus into SIPs."
            }
            Rule::MicroSavings => {
                "Save a small fixed amount every day, and raise it as your income grows."
            }
            Rule::WealthDiversification => {
                "Spread investments across asset classes, rebalancing once a year."
            }
            Rule::SipStart => {
                "Automate a monthly SIP on salary day, so investing happens before spending."
            }
            Rule::DebtFundLadder => {
                "Stagger debt fund maturities across years, so cash frees up regularly."
            }
            Rule::PpfAllocation => {
                "Put part of your savings in PPF for tax-free returns, with a 15-year horizon."
            }
            Rule::BalancedSip => {
                "Split your SIP between equity and debt funds, keeping the mix near 50/50."
            }
            Rule::IndexFundCore => {
                "Hold a low-cost Nifty 50 index fund as the core, adding active funds around it."
            }
            Rule::EquityTiltSip => {
                "Keep most of your SIP in diversified equity funds, with debt as a buffer."
            }
            Rule::MidcapAllocation => {
                "Add a mid-cap fund for extra growth, capped at a fifth of your equity."
            }
            Rule::EquityGrowth => {
                "Run an equity-heavy portfolio for long-term growth, reviewing it every quarter."
            }
            Rule::DirectEquity => {
                "Build a direct stock portfolio alongside funds, sizing each position carefully."
            }
            Rule::InternationalDiversification => {
                "Add international equity funds, to hedge against rupee depreciation."
            }
            Rule::HighGrowthEquity => {
                "Target high-growth small and mid caps, accepting deep interim drawdowns."
            }
            Rule::RiskGuardrails => {
                "Cap any single bet at a small share of your portfolio, and keep an emergency buffer outside it."
            }
            Rule::MetroBudgeting => {
                "Budget for metro living costs first, then set savings against what remains."
            }
            Rule::RealEstateStrategy => {
                "Compare renting with buying before committing, since metro property ties up capital."
            }
            Rule::Tier2Advantage => {
                "Invest the gap between your income and local costs, while living costs stay low."
            }
            Rule::RegionalInvestment => {
                "Consider gold and regional real estate, which hold value well in your region."
            }
            Rule::QuickWins => {
                "Try one five-minute money task this week, such as checking a subscription."
            }
            Rule::FinishStartedPlans => {
                "Pick one plan you started and finish it, before opening new ones."
            }
            Rule::RiskProfileReview => {
                "Retake the risk questionnaire, since your activity suggests a different appetite."
            }
            Rule::FeatureDeepDive => {
                "Explore the advanced options of the tool you use most, to get more from it."
            }
        }
    }

    /// Build a recommendation with this rule's canonical id, title and copy
    pub fn recommend(
        &self,
        priority: Priority,
        impact: impl Into<String>,
        confidence: f64,
        detail: RecommendationDetail,
    ) -> Recommendation {
        debug_assert_eq!(detail.source(), self.source());
        Recommendation::new(
            self.id(),
            priority,
            self.title(),
            self.description(),
            impact,
            confidence,
            detail,
        )
    }

    /// Clause appended when a user reliably completes this recommendation
    pub fn advanced_option(&self) -> &'static str {
        advanced_option(self.source())
    }
}

/// Advanced-option clause for any recommendation from `source`
pub fn advanced_option(source: Source) -> &'static str {
    match source {
        Source::Income => "Advanced option: automate a 10% yearly step-up on your contributions.",
        Source::Risk => "Advanced option: rebalance to target weights every six months.",
        Source::Location => "Advanced option: revisit your city budget after each appraisal.",
        Source::Behavioral => "Advanced option: set a monthly review reminder in the app.",
    }
}
