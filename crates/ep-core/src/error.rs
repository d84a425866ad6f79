//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `EpiError` or wrap it as one variant, whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `ep-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EpiError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `ep-*` crates.
pub type EpiResult<T> = Result<T, EpiError>;
