//! Error types for the catalog crate.

use thiserror::Error;

/// Errors that can occur when parsing user input into catalog vocabulary
///
/// These cover the two fixed vocabularies the kiosk asks about: mood tags
/// and time budgets. Everything else in this crate is passthrough data and
/// fails at the serde layer instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Input didn't match any mood tag or known alias
    #[error("Unknown mood: {input}")]
    UnknownMood { input: String },

    /// Minute count is not one of the offered time budgets
    #[error("Unsupported time budget: {minutes} minutes (expected 30, 90 or 180)")]
    UnsupportedMinutes { minutes: u32 },

    /// Input matched neither a time budget name nor a minute count
    #[error("Unknown time budget: {input}")]
    UnknownTimeBudget { input: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
