//! Calculator commands

use anyhow::Result;
use artha_core::calculators::{
    emergency_fund, home_loan_affordability, retirement, sip, tax_savings,
};
use artha_core::format_inr;

use super::{print_json, Output};
use crate::cli::CalcCommand;

pub fn cmd_calc(calculator: CalcCommand, output: Output) -> Result<()> {
    match calculator {
        CalcCommand::Emergency { expenses, months } => {
            let result = emergency_fund(expenses, months);
            if output == Output::Json {
                return print_json(&result);
            }
            println!();
            println!("🛟 Emergency Fund");
            println!("   Monthly expenses: {}", format_inr(result.monthly_expenses));
            println!("   Months covered:   {:.0}", result.target_months);
            println!("   Target:           {}", format_inr(result.target_amount));
        }
        CalcCommand::Sip {
            target,
            years,
            rate,
        } => {
            let result = sip(target, years, rate);
            if output == Output::Json {
                return print_json(&result);
            }
            println!();
            println!("📈 SIP Plan");
            println!(
                "   Target:          {} in {:.0} years at {:.1}%",
                format_inr(result.target_amount),
                result.years,
                result.annual_return_pct
            );
            println!("   Monthly SIP:     {}", format_inr(result.monthly_sip));
            println!("   Total invested:  {}", format_inr(result.total_invested));
            println!("   Estimated gains: {}", format_inr(result.estimated_gains));
        }
        CalcCommand::Retirement {
            age,
            retire_at,
            savings,
            income,
            inflation,
        } => {
            let result = retirement(age, retire_at, savings, income, inflation);
            if output == Output::Json {
                return print_json(&result);
            }
            println!();
            println!("🏖️  Retirement");
            println!("   Years to retirement:      {}", result.years_to_retirement);
            println!(
                "   Annual expenses then:     {}",
                format_inr(result.inflated_annual_expenses)
            );
            println!("   Required corpus:          {}", format_inr(result.required_corpus));
            println!(
                "   Savings will grow to:     {}",
                format_inr(result.future_value_of_savings)
            );
            println!(
                "   Gap to close:             {}",
                format_inr(result.additional_corpus_needed)
            );
            println!(
                "   Monthly SIP needed:       {}",
                format_inr(result.required_monthly_sip)
            );
        }
        CalcCommand::Loan {
            income,
            emis,
            rate,
            tenure,
        } => {
            let result = home_loan_affordability(income, emis, rate, tenure);
            if output == Output::Json {
                return print_json(&result);
            }
            println!();
            println!("🏠 Home Loan Affordability");
            println!("   Available EMI:    {}", format_inr(result.available_emi));
            println!("   Max loan:         {}", format_inr(result.max_loan_amount));
            println!("   Affordable price: {}", format_inr(result.affordable_price));
            println!("   Down payment:     {}", format_inr(result.down_payment));
            for tip in &result.recommendations {
                println!("   • {}", tip);
            }
        }
        CalcCommand::Tax { income, invested } => {
            let result = tax_savings(income, invested);
            if output == Output::Json {
                return print_json(&result);
            }
            println!();
            println!("🧾 Section 80C");
            println!("   Annual income:      {}", format_inr(result.annual_income));
            println!("   Bracket:            {:.0}%", result.bracket_rate_pct);
            println!(
                "   Remaining 80C room: {}",
                format_inr(result.remaining_deduction)
            );
            println!("   Tax you could save: {}", format_inr(result.tax_savings));
        }
    }
    Ok(())
}
