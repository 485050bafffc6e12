//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `PtError` as one variant
//! via `#[from]`, so configuration and data errors raised here keep their
//! message all the way up to the sweep driver.

use thiserror::Error;

/// Configuration, selector, and input-data errors.
#[derive(Debug, Error)]
pub enum PtError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown {what} {value:?}: expected one of {expected}")]
    UnknownSelector {
        what:     &'static str,
        value:    String,
        expected: &'static str,
    },

    #[error("{table} missing required columns {missing:?} (available: {available:?})")]
    MissingColumns {
        table:     &'static str,
        missing:   Vec<String>,
        available: Vec<String>,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `pt-*` crates.
pub type PtResult<T> = Result<T, PtError>;

impl PtError {
    /// Build a [`PtError::MissingColumns`] by comparing `required` against the
    /// header row of a table.  Returns `None` when every column is present.
    pub fn check_columns(
        table: &'static str,
        required: &[&str],
        available: &[String],
    ) -> Option<PtError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !available.iter().any(|a| a == *c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            return None;
        }
        Some(PtError::MissingColumns {
            table,
            missing,
            available: available.to_vec(),
        })
    }
}
