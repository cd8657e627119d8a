//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Artha - personalized financial recommendations
#[derive(Parser)]
#[command(name = "artha")]
#[command(about = "Personal finance recommendation engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a financial calculator
    Calc {
        #[command(subcommand)]
        calculator: CalcCommand,
    },

    /// Show cost-of-living and peer context for a location
    City {
        /// Free-text location, e.g. "Pune, Maharashtra"
        location: String,

        /// Monthly income for affordability and peer percentile
        #[arg(long)]
        income: Option<f64>,

        /// Profession for the peer income band
        #[arg(long)]
        profession: Option<String>,
    },

    /// Analyze a behavior log and a monthly spend series
    Analyze {
        /// JSON array of behavior events
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// CSV ledger with month,total columns
        #[arg(short, long)]
        ledger: Option<PathBuf>,

        /// Use a generated demo spend series with this seed (ignored with --ledger)
        #[arg(long)]
        synthetic_seed: Option<u64>,
    },

    /// Produce ranked recommendations for a profile
    Recommend {
        /// JSON user profile
        #[arg(short, long)]
        profile: PathBuf,

        /// JSON spending insights ({ savings_rate, monthly_spending? })
        #[arg(short, long)]
        spending: Option<PathBuf>,

        /// CSV ledger with month,total columns (replaces monthly_spending)
        #[arg(short, long)]
        ledger: Option<PathBuf>,

        /// JSON array of the user's behavior events
        #[arg(short, long)]
        events: Option<PathBuf>,
    },

    /// Show the effective engine configuration
    Config,
}

#[derive(Subcommand)]
pub enum CalcCommand {
    /// Emergency fund target
    Emergency {
        /// Monthly expenses
        #[arg(long)]
        expenses: f64,

        /// Months of expenses to cover
        #[arg(long, default_value = "6")]
        months: f64,
    },

    /// Monthly SIP needed to reach a target
    Sip {
        /// Target amount
        #[arg(long)]
        target: f64,

        /// Investment horizon in years
        #[arg(long)]
        years: f64,

        /// Expected annual return (percent)
        #[arg(long, default_value = "12")]
        rate: f64,
    },

    /// Retirement corpus and required SIP
    Retirement {
        /// Current age
        #[arg(long)]
        age: u32,

        /// Planned retirement age
        #[arg(long, default_value = "60")]
        retire_at: u32,

        /// Current retirement savings
        #[arg(long, default_value = "0")]
        savings: f64,

        /// Monthly income
        #[arg(long)]
        income: f64,

        /// Annual inflation (percent)
        #[arg(long, default_value = "6")]
        inflation: f64,
    },

    /// Home loan affordability
    Loan {
        /// Monthly income
        #[arg(long)]
        income: f64,

        /// Existing monthly EMIs
        #[arg(long, default_value = "0")]
        emis: f64,

        /// Annual interest rate (percent)
        #[arg(long, default_value = "8.5")]
        rate: f64,

        /// Tenure in years
        #[arg(long, default_value = "20")]
        tenure: f64,
    },

    /// Section 80C tax savings
    Tax {
        /// Annual income
        #[arg(long)]
        income: f64,

        /// Amount already invested under 80C
        #[arg(long, default_value = "0")]
        invested: f64,
    },
}
