//! Error types for configuration, financing lookups and quote export.
//!
//! The calculation engines themselves never fail; these cover the edges
//! where user choices meet injected tables, files and the command line.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("unknown bank \"{name}\", available: {available}")]
    UnknownBank { name: String, available: String },

    #[error("bank \"{0}\" offers no installment plans")]
    NoPlans(String),
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    #[error(transparent)]
    Finance(#[from] FinanceError),

    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, QuoteError>;
