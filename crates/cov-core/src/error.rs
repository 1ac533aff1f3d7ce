//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `From`.

use thiserror::Error;

/// Errors produced by `cov-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid number {value:?}")]
    InvalidNumber { value: String },

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("non-finite coordinate ({lat}, {lon})")]
    NonFiniteCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for `cov-core`.
pub type CoreResult<T> = Result<T, CoreError>;
