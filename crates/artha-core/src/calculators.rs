//! Financial calculators
//!
//! Pure formulas behind the calculator screens and the impact text of
//! recommendations. Every function is total: negative, NaN and infinite inputs
//! are clamped to 0 and the result is a valid (possibly zero) value.

use serde::{Deserialize, Serialize};

use crate::money::{format_inr, sanitize};

/// Months of expenses an emergency fund should cover by default
pub const DEFAULT_EMERGENCY_MONTHS: f64 = 6.0;
/// Default annual inflation for retirement planning (percent)
pub const DEFAULT_INFLATION_PCT: f64 = 6.0;
/// Expected annual return on retirement savings (percent)
pub const RETIREMENT_RETURN_PCT: f64 = 12.0;
/// Share of current income needed in retirement
pub const RETIREMENT_EXPENSE_RATIO: f64 = 0.7;
/// Corpus multiple of annual expenses (4% withdrawal rule)
pub const CORPUS_MULTIPLE: f64 = 25.0;
/// Share of income that can go to EMIs
pub const MAX_EMI_TO_INCOME: f64 = 0.4;
/// Loan-to-value ratio; the remaining 20% is the down payment
pub const LOAN_TO_VALUE: f64 = 0.8;
/// Section 80C deduction limit
pub const SECTION_80C_LIMIT: f64 = 150_000.0;

/// Annual income upper bounds and marginal rates (percent); income above the
/// last bound is taxed at `TOP_TAX_RATE_PCT`
const TAX_BRACKETS: [(f64, f64); 5] = [
    (300_000.0, 0.0),
    (600_000.0, 5.0),
    (900_000.0, 10.0),
    (1_200_000.0, 15.0),
    (1_500_000.0, 20.0),
];
const TOP_TAX_RATE_PCT: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFundResult {
    pub monthly_expenses: f64,
    pub target_months: f64,
    pub target_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipResult {
    pub target_amount: f64,
    pub years: f64,
    pub annual_return_pct: f64,
    pub months: f64,
    pub monthly_sip: f64,
    pub total_invested: f64,
    pub estimated_gains: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementResult {
    pub years_to_retirement: u32,
    /// Annual expenses in retirement, in retirement-year rupees
    pub inflated_annual_expenses: f64,
    pub required_corpus: f64,
    pub future_value_of_savings: f64,
    pub additional_corpus_needed: f64,
    pub required_monthly_sip: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeLoanResult {
    pub available_emi: f64,
    pub max_loan_amount: f64,
    pub affordable_price: f64,
    pub down_payment: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSavingsResult {
    pub annual_income: f64,
    pub remaining_deduction: f64,
    pub bracket_rate_pct: f64,
    pub tax_savings: f64,
}

/// Emergency fund target: `monthly_expenses × target_months`
pub fn emergency_fund(monthly_expenses: f64, target_months: f64) -> EmergencyFundResult {
    let monthly_expenses = sanitize(monthly_expenses);
    let target_months = sanitize(target_months);

    EmergencyFundResult {
        monthly_expenses,
        target_months,
        target_amount: monthly_expenses * target_months,
    }
}

/// Monthly installment that grows to `target_amount` over `months` at monthly rate `r`.
///
/// Zero months means the whole target is needed now.
fn monthly_installment(target_amount: f64, months: f64, r: f64) -> f64 {
    if months <= 0.0 {
        return target_amount;
    }
    if r == 0.0 {
        return target_amount / months;
    }
    let growth = (1.0 + r).powf(months);
    if !growth.is_finite() {
        return 0.0;
    }
    if growth <= 1.0 {
        // Rate too small to register in f64
        return target_amount / months;
    }
    target_amount * r / (growth - 1.0)
}

/// Future value of a lump sum compounded annually
pub fn future_value(present_value: f64, annual_rate_pct: f64, years: f64) -> f64 {
    sanitize(present_value) * (1.0 + sanitize(annual_rate_pct) / 100.0).powf(sanitize(years))
}

/// Monthly SIP needed to reach `target_amount` in `years` at `annual_return_pct`
pub fn sip(target_amount: f64, years: f64, annual_return_pct: f64) -> SipResult {
    let target_amount = sanitize(target_amount);
    let years = sanitize(years);
    let annual_return_pct = sanitize(annual_return_pct);

    let r = annual_return_pct / 1200.0;
    let months = years * 12.0;
    let monthly_sip = monthly_installment(target_amount, months, r);
    let total_invested = if months > 0.0 {
        monthly_sip * months
    } else {
        monthly_sip
    };

    SipResult {
        target_amount,
        years,
        annual_return_pct,
        months,
        monthly_sip,
        total_invested,
        estimated_gains: (target_amount - total_invested).max(0.0),
    }
}

/// Retirement corpus and the monthly SIP needed to close the gap
pub fn retirement(
    current_age: u32,
    retirement_age: u32,
    current_savings: f64,
    monthly_income: f64,
    inflation_pct: f64,
) -> RetirementResult {
    let years_to_retirement = retirement_age.saturating_sub(current_age);
    let years = years_to_retirement as f64;

    let annual_expenses = sanitize(monthly_income) * 12.0 * RETIREMENT_EXPENSE_RATIO;
    let inflated_annual_expenses =
        sanitize(annual_expenses * (1.0 + sanitize(inflation_pct) / 100.0).powf(years));
    let required_corpus = CORPUS_MULTIPLE * inflated_annual_expenses;

    let future_value_of_savings = future_value(current_savings, RETIREMENT_RETURN_PCT, years);
    let additional_corpus_needed = (required_corpus - future_value_of_savings).max(0.0);
    let required_monthly_sip =
        sip(additional_corpus_needed, years, RETIREMENT_RETURN_PCT).monthly_sip;

    RetirementResult {
        years_to_retirement,
        inflated_annual_expenses,
        required_corpus,
        future_value_of_savings,
        additional_corpus_needed,
        required_monthly_sip,
    }
}

/// Largest loan whose EMI at `rate_pct` over `tenure_years` fits in `emi`
fn max_principal(emi: f64, rate_pct: f64, tenure_years: f64) -> f64 {
    let r = rate_pct / 1200.0;
    let n = tenure_years * 12.0;
    if n <= 0.0 {
        return 0.0;
    }
    if r == 0.0 {
        return emi * n;
    }
    let growth = (1.0 + r).powf(n);
    if !growth.is_finite() {
        // Perpetuity limit
        return emi / r;
    }
    if growth <= 1.0 {
        return emi * n;
    }
    emi * (growth - 1.0) / (r * growth)
}

/// How much house the user can afford with a 20% down payment
pub fn home_loan_affordability(
    monthly_income: f64,
    existing_emis: f64,
    rate_pct: f64,
    tenure_years: f64,
) -> HomeLoanResult {
    let monthly_income = sanitize(monthly_income);
    let existing_emis = sanitize(existing_emis);
    let rate_pct = sanitize(rate_pct);
    let tenure_years = sanitize(tenure_years);

    let available_emi = MAX_EMI_TO_INCOME * monthly_income - existing_emis;

    if available_emi <= 0.0 {
        return HomeLoanResult {
            available_emi: 0.0,
            max_loan_amount: 0.0,
            affordable_price: 0.0,
            down_payment: 0.0,
            recommendations: vec![format!(
                "Reduce existing EMIs by at least {}/month before applying for a home loan",
                format_inr(-available_emi)
            )],
        };
    }

    let max_loan_amount = max_principal(available_emi, rate_pct, tenure_years);
    let affordable_price = max_loan_amount / LOAN_TO_VALUE;
    let down_payment = affordable_price - max_loan_amount;

    let mut recommendations = vec![format!(
        "Keep a down payment of {} (20%) ready",
        format_inr(down_payment)
    )];
    if existing_emis > 0.0 {
        recommendations.push(format!(
            "Closing existing EMIs of {}/month would raise your loan eligibility",
            format_inr(existing_emis)
        ));
    }
    if rate_pct > 9.0 {
        recommendations
            .push("Compare lenders; your rate is above typical home loan rates".to_string());
    }

    HomeLoanResult {
        available_emi,
        max_loan_amount,
        affordable_price,
        down_payment,
        recommendations,
    }
}

/// Marginal tax rate (percent) for an annual income
pub fn marginal_tax_rate(annual_income: f64) -> f64 {
    let annual_income = sanitize(annual_income);
    TAX_BRACKETS
        .iter()
        .find(|(upper, _)| annual_income <= *upper)
        .map(|(_, rate)| *rate)
        .unwrap_or(TOP_TAX_RATE_PCT)
}

/// Tax saved by investing the rest of the Section 80C limit
pub fn tax_savings(annual_income: f64, current_investments: f64) -> TaxSavingsResult {
    let annual_income = sanitize(annual_income);
    let remaining_deduction = (SECTION_80C_LIMIT - sanitize(current_investments)).max(0.0);
    let bracket_rate_pct = marginal_tax_rate(annual_income);

    TaxSavingsResult {
        annual_income,
        remaining_deduction,
        bracket_rate_pct,
        tax_savings: remaining_deduction * bracket_rate_pct / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    /// Balance after `months` end-of-month installments at monthly rate `r`
    fn accumulate(installment: f64, months: f64, r: f64) -> f64 {
        let mut balance = 0.0;
        for _ in 0..(months as u32) {
            balance = balance * (1.0 + r) + installment;
        }
        balance
    }

    #[test]
    fn test_emergency_fund_exact() {
        let result = emergency_fund(50_000.0, 6.0);
        assert_eq!(result.target_amount, 300_000.0);
    }

    #[test]
    fn test_emergency_fund_clamps_negative() {
        let result = emergency_fund(-50_000.0, DEFAULT_EMERGENCY_MONTHS);
        assert_eq!(result.monthly_expenses, 0.0);
        assert_eq!(result.target_amount, 0.0);
    }

    #[test]
    fn test_sip_zero_rate_is_linear() {
        let result = sip(120_000.0, 10.0, 0.0);
        assert_eq!(result.months, 120.0);
        assert_eq!(result.monthly_sip, 1_000.0);
        assert_eq!(result.estimated_gains, 0.0);
    }

    #[test]
    fn test_sip_known_value() {
        // ₹10 lakh in 10 years at 12%
        let result = sip(1_000_000.0, 10.0, 12.0);
        assert!((result.monthly_sip - 4_347.09).abs() < 0.5);
        assert!(result.estimated_gains > 0.0);
    }

    #[test]
    fn test_sip_zero_years_is_lump_sum() {
        let result = sip(50_000.0, 0.0, 12.0);
        assert_eq!(result.monthly_sip, 50_000.0);
        assert_eq!(result.total_invested, 50_000.0);
    }

    #[test]
    fn test_sip_nan_inputs() {
        let result = sip(f64::NAN, f64::NAN, f64::NAN);
        assert_eq!(result.monthly_sip, 0.0);
    }

    #[test]
    fn test_retirement() {
        let result = retirement(30, 60, 500_000.0, 100_000.0, DEFAULT_INFLATION_PCT);

        assert_eq!(result.years_to_retirement, 30);
        let expected_expenses = 100_000.0 * 12.0 * 0.7 * 1.06f64.powi(30);
        assert!((result.inflated_annual_expenses - expected_expenses).abs() < 1e-3);
        assert!((result.required_corpus - 25.0 * expected_expenses).abs() < 1e-1);
        assert!((result.future_value_of_savings - 500_000.0 * 1.12f64.powi(30)).abs() < 1e-1);
        assert!(result.required_monthly_sip > 0.0);
    }

    #[test]
    fn test_retirement_savings_cover_corpus() {
        let result = retirement(50, 60, 1_000_000_000.0, 10_000.0, 6.0);
        assert_eq!(result.additional_corpus_needed, 0.0);
        assert_eq!(result.required_monthly_sip, 0.0);
    }

    #[test]
    fn test_retirement_past_retirement_age() {
        let result = retirement(65, 60, 0.0, 50_000.0, 6.0);
        assert_eq!(result.years_to_retirement, 0);
        // No time left: the whole gap is due now
        assert_eq!(result.required_monthly_sip, result.additional_corpus_needed);
    }

    #[test]
    fn test_home_loan_existing_emis_too_high() {
        let result = home_loan_affordability(125_000.0, 60_000.0, 8.5, 20.0);

        assert_eq!(result.max_loan_amount, 0.0);
        assert_eq!(result.affordable_price, 0.0);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("Reduce existing EMIs") && r.contains("₹10,000")));
    }

    #[test]
    fn test_home_loan_affordability() {
        let result = home_loan_affordability(100_000.0, 0.0, 8.5, 20.0);

        assert_eq!(result.available_emi, 40_000.0);
        // Standard EMI on the computed principal equals the available EMI
        let r = 8.5 / 1200.0;
        let growth = (1.0f64 + r).powf(240.0);
        let emi = result.max_loan_amount * r * growth / (growth - 1.0);
        assert!((emi - 40_000.0).abs() < 1e-6);
        assert!((result.affordable_price * 0.8 - result.max_loan_amount).abs() < 1e-6);
        assert!((result.down_payment - result.affordable_price * 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_home_loan_zero_rate() {
        let result = home_loan_affordability(100_000.0, 10_000.0, 0.0, 10.0);
        assert_eq!(result.max_loan_amount, 30_000.0 * 120.0);
    }

    #[test]
    fn test_tax_brackets() {
        assert_eq!(marginal_tax_rate(250_000.0), 0.0);
        assert_eq!(marginal_tax_rate(300_000.0), 0.0);
        assert_eq!(marginal_tax_rate(300_001.0), 5.0);
        assert_eq!(marginal_tax_rate(750_000.0), 10.0);
        assert_eq!(marginal_tax_rate(1_000_000.0), 15.0);
        assert_eq!(marginal_tax_rate(1_500_000.0), 20.0);
        assert_eq!(marginal_tax_rate(1_500_001.0), 30.0);
    }

    #[test]
    fn test_tax_savings() {
        let result = tax_savings(1_500_000.0, 50_000.0);
        assert_eq!(result.remaining_deduction, 100_000.0);
        assert_eq!(result.tax_savings, 20_000.0);

        let maxed = tax_savings(2_000_000.0, 200_000.0);
        assert_eq!(maxed.remaining_deduction, 0.0);
        assert_eq!(maxed.tax_savings, 0.0);
    }

    proptest! {
        #[test]
        fn prop_sip_reaches_target(
            target in 1_000u32..10_000_000,
            years in 1u32..=30,
            rate_bp in 0u32..=2000,
        ) {
            let target = target as f64;
            let rate = rate_bp as f64 / 100.0;
            let result = sip(target, years as f64, rate);

            let reached = accumulate(result.monthly_sip, result.months, rate / 1200.0);
            prop_assert!((reached - target).abs() <= 1.0, "reached {} for target {}", reached, target);
        }

        #[test]
        fn prop_calculators_are_total(
            a in -1e9f64..1e9,
            b in -1e9f64..1e9,
            c in -1e9f64..1e9,
        ) {
            let fund = emergency_fund(a, b);
            prop_assert!(fund.target_amount.is_finite() && fund.target_amount >= 0.0);

            let plan = sip(a, b, c);
            prop_assert!(plan.monthly_sip.is_finite() && plan.monthly_sip >= 0.0);

            let loan = home_loan_affordability(a, b, c, 20.0);
            prop_assert!(loan.max_loan_amount.is_finite() && loan.max_loan_amount >= 0.0);

            let tax = tax_savings(a, b);
            prop_assert!(tax.tax_savings >= 0.0);
        }
    }
}
