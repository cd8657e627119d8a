//! Error types for Artha
//!
//! The engine is total for plausible input: calculators clamp, lookups fall
//! back to documented defaults. Only a profile without a usable monthly income
//! and a broken config file surface as errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
