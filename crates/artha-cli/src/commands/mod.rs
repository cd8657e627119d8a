//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Behavior log and spend series analysis
//! - `calc` - Financial calculators
//! - `city` - Location cost-of-living and peer context
//! - `input` - Config, JSON and CSV input loading
//! - `recommend` - Full recommendation run and config display

pub mod analyze;
pub mod calc;
pub mod city;
pub mod input;
pub mod recommend;

// Re-export command functions for main.rs
pub use analyze::*;
pub use calc::*;
pub use city::*;
pub use input::*;
pub use recommend::*;

use anyhow::{Context, Result};
use serde::Serialize;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
