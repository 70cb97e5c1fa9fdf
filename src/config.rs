//! Runtime configuration.
//!
//! [`Settings`] carries the API endpoints and credentials used for one
//! process run. Per-organization Quay tokens are read from the
//! `QUAY_API_TOKENS_JSON` environment variable, a JSON object mapping
//! organization name to an OAuth token with Administrator scope:
//!
//! ```sh
//! export QUAY_API_TOKENS_JSON='{"org1":"token1","org2":"token2"}'
//! ```
//!
//! An unset variable is only a warning (public repositories still work);
//! a set-but-malformed variable is a hard error.

use std::collections::HashMap;

use crate::error::{PullsarError, Result};

/// Environment variable holding the Quay org-to-token JSON object.
pub const QUAY_API_TOKENS_ENV: &str = "QUAY_API_TOKENS_JSON";

/// Default Quay API endpoint.
pub const DEFAULT_QUAY_API_BASE_URL: &str = "https://quay.io/api/v1";

/// Default Pyxis API endpoint.
pub const DEFAULT_PYXIS_API_BASE_URL: &str = "https://pyxis.engineering.redhat.com/v1";

/// Registry whose usage logs are the source of truth for pull counts.
pub const PRIMARY_REGISTRY: &str = "quay.io";

/// Mapping from Quay organization name to its API token.
pub type OrgTokenMap = HashMap<String, String>;

/// Configuration for one Pullsar run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the Quay API.
    pub quay_api_base_url: String,
    /// Base URL of the Pyxis API.
    pub pyxis_api_base_url: String,
    /// Registry hosting the repositories whose logs we aggregate.
    pub primary_registry: String,
    /// Per-organization Quay API tokens.
    pub quay_api_tokens: OrgTokenMap,
    /// Scratch file rendered catalogs are written to before parsing.
    pub catalog_json_file: String,
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            quay_api_tokens: load_quay_api_tokens()?,
            ..Self::default()
        })
    }

    /// Replace the token map (primarily for tests and embedding callers).
    pub fn with_tokens(mut self, tokens: OrgTokenMap) -> Self {
        self.quay_api_tokens = tokens;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quay_api_base_url: DEFAULT_QUAY_API_BASE_URL.to_string(),
            pyxis_api_base_url: DEFAULT_PYXIS_API_BASE_URL.to_string(),
            primary_registry: PRIMARY_REGISTRY.to_string(),
            quay_api_tokens: OrgTokenMap::new(),
            catalog_json_file: "operators_catalog.json".to_string(),
        }
    }
}

/// Load the per-organization token map from `QUAY_API_TOKENS_JSON`.
///
/// Returns an empty map (with a warning) when the variable is unset,
/// and an error when it is set but not a valid JSON string-to-string object.
pub fn load_quay_api_tokens() -> Result<OrgTokenMap> {
    let raw = match std::env::var(QUAY_API_TOKENS_ENV) {
        Ok(raw) => raw,
        Err(_) => {
            tracing::warn!(
                "Environment variable {QUAY_API_TOKENS_ENV} is undefined. \
                 To access logs from private repositories, consider defining it, e.g.: \
                 export {QUAY_API_TOKENS_ENV}='{{\"org1\":\"token1\",\"org2\":\"token2\"}}'"
            );
            return Ok(OrgTokenMap::new());
        }
    };

    serde_json::from_str(&raw).map_err(|e| PullsarError::TokenConfig {
        message: format!("{QUAY_API_TOKENS_ENV} is not a valid JSON object: {e}"),
    })
}
