//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where configuration validation can fail.

use thiserror::Error;

/// The error type for `ev-core` validation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ev-core`.
pub type CoreResult<T> = Result<T, CoreError>;
