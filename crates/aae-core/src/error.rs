//! Top-level engine error taxonomy.
//!
//! Sub-crates define their own error enums and convert them into `AaeError`
//! via `From` at the `aae-engine` boundary, rather than using `AaeError`
//! directly everywhere — each sub-crate's error type stays meaningful on
//! its own, and the conversion is a single `impl From` block per crate.

use thiserror::Error;

/// Fatal and internal-invariant errors the engine can raise.
///
/// Soft-degrade conditions (anchor unsnappable, empty edge set, …) are
/// *not* represented here — they are not errors at all, but warnings
/// accumulated into `meta.warnings` on an otherwise-valid payload.
#[derive(Debug, Error)]
pub enum AaeError {
    /// The ingested graph would exceed the node/edge caps.
    #[error("Area too large for analysis: {message}")]
    TooLarge { message: String },

    /// A malformed bounding box or OSM element reached the engine.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A logic invariant was violated.
    ///
    /// Reaching this variant means a bug in the engine, not bad input.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AaeError {
    /// Stable machine-readable code the host can match on.
    pub fn code(&self) -> &'static str {
        match self {
            AaeError::TooLarge { .. } => "TOO_LARGE",
            AaeError::InvalidInput { .. } => "INVALID_INPUT",
            AaeError::Internal { .. } => "INTERNAL",
        }
    }

    pub fn too_large(message: impl Into<String>) -> Self {
        AaeError::TooLarge { message: message.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        AaeError::InvalidInput { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AaeError::Internal { message: message.into() }
    }
}

/// Shorthand result type for the engine's public surface.
pub type AaeResult<T> = Result<T, AaeError>;
