//! Error types for Pullsar operations.
//!
//! This module defines [`PullsarError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PullsarError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `PullsarError::Other`) for unexpected errors
//! - Per-catalog failures (render/parse) are fatal for that catalog only;
//!   per-repository failures are logged and skipped, never raised to the caller

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Pullsar operations.
#[derive(Debug, Error)]
pub enum PullsarError {
    /// Rendering a catalog image with `opm` failed.
    #[error("Failed to render catalog {image}: {message}")]
    CatalogRender { image: String, message: String },

    /// A rendered catalog JSON document could not be read or parsed.
    #[error("Failed to parse catalog at {path}: {message}")]
    CatalogParse { path: PathBuf, message: String },

    /// The `QUAY_API_TOKENS_JSON` environment variable is not valid JSON.
    #[error("Invalid API token configuration: {message}")]
    TokenConfig { message: String },

    /// A registry or translation-service request failed.
    #[error("API request to {url} failed: {message}")]
    ApiRequest { url: String, message: String },

    /// HTTP transport error wrapper.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Pullsar operations.
pub type Result<T> = std::result::Result<T, PullsarError>;
