//! Artha CLI - drive the personalization engine from input files
//!
//! Usage:
//!   artha calc sip --target 1000000 --years 10       Run a financial calculator
//!   artha city "Pune" --income 90000                 Cost-of-living context
//!   artha analyze --events events.json               Behavior and spending analysis
//!   artha recommend --profile profile.json           Ranked recommendations

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let output = if cli.json {
        commands::Output::Json
    } else {
        commands::Output::Text
    };

    match cli.command {
        Commands::Calc { calculator } => commands::cmd_calc(calculator, output),
        Commands::City {
            location,
            income,
            profession,
        } => commands::cmd_city(&location, income, profession.as_deref(), output),
        Commands::Analyze {
            events,
            ledger,
            synthetic_seed,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_analyze(
                &config,
                events.as_deref(),
                ledger.as_deref(),
                synthetic_seed,
                output,
            )
        }
        Commands::Recommend {
            profile,
            spending,
            ledger,
            events,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_recommend(
                config,
                &profile,
                spending.as_deref(),
                ledger.as_deref(),
                events.as_deref(),
                output,
            )
        }
        Commands::Config => commands::cmd_config(cli.config.as_deref()),
    }
}
