//! Error types for content rendering and token handling.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the core units.
///
/// None of these are fatal to a page render: the renderer fails closed and the
/// gate folds token errors into an unauthorized decision.
#[derive(Error, Debug)]
pub enum Error {
    /// The bearer token could not be decoded (bad structure, bad base64,
    /// bad JSON, or a failed signature check when verification is enabled).
    #[error("malformed token: {0}")]
    MalformedToken(#[from] jsonwebtoken::errors::Error),

    /// The HTML sanitizer could not process the input.
    #[error("sanitizer unavailable: {0}")]
    Sanitizer(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
