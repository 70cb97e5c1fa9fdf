//! Quay registry client.
//!
//! [`QuayClient`] implements [`RegistryClient`] over the Quay HTTP API using
//! a single blocking session for all requests. It handles the two pagination
//! styles Quay uses:
//!
//! 1. `next_page` continuation token (the `/logs` endpoint)
//! 2. `page` number with a `has_additional` flag (the `/tag` endpoint)
//!
//! Authorization is a per-organization bearer token. A missing token for a
//! repository's organization yields an empty result with a warning rather
//! than an error: public data simply is not fetched without credentials,
//! and the run must go on.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use crate::config::OrgTokenMap;
use crate::error::{PullsarError, Result};
use crate::registry::logs::log_window;
use crate::registry::types::{RawLogRecord, TagRecord};

/// Logical contract of the primary registry consumed by the resolver.
pub trait RegistryClient {
    /// Fetch all tags of a repository, across all pages.
    fn get_tags(&self, repo_path: &str) -> Result<Vec<TagRecord>>;

    /// Fetch raw usage-log records for the last `log_days` completed days,
    /// across all pages.
    fn get_logs(&self, repo_path: &str, log_days: u32) -> Result<Vec<RawLogRecord>>;
}

/// Date format expected by the Quay logs endpoint time parameters.
const QUAY_TIME_PARAM_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Deserialize)]
struct LogsPage {
    #[serde(default)]
    logs: Vec<RawLogRecord>,
    #[serde(default)]
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsPage {
    #[serde(default)]
    tags: Vec<TagRecord>,
    #[serde(default)]
    has_additional: bool,
}

/// Blocking client for the Quay API.
pub struct QuayClient {
    base_url: String,
    api_tokens: OrgTokenMap,
    client: reqwest::blocking::Client,
}

impl QuayClient {
    /// Create a client for the given API base URL and per-org token map.
    pub fn new(base_url: impl Into<String>, api_tokens: OrgTokenMap) -> Self {
        Self {
            base_url: base_url.into(),
            api_tokens,
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Organization part of a `org/repo` repository path.
    fn extract_org(repo_path: &str) -> &str {
        repo_path.split('/').next().unwrap_or(repo_path)
    }

    /// Token for the organization owning `repo_path`, if configured.
    fn token_for(&self, repo_path: &str) -> Option<&str> {
        self.api_tokens
            .get(Self::extract_org(repo_path))
            .map(String::as_str)
    }

    fn fetch_page<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("Fetching {url} with params: {params:?}");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .query(params)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PullsarError::ApiRequest {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        Ok(response.json()?)
    }
}

impl RegistryClient for QuayClient {
    fn get_tags(&self, repo_path: &str) -> Result<Vec<TagRecord>> {
        let Some(token) = self.token_for(repo_path) else {
            tracing::warn!(
                "Quay API token not defined for organization '{}'. Skipping repository {repo_path}...",
                Self::extract_org(repo_path)
            );
            return Ok(Vec::new());
        };

        tracing::info!("Fetching tags for repository: {repo_path}");
        let url = format!("{}/repository/{repo_path}/tag", self.base_url);

        let mut all_tags = Vec::new();
        let mut page: u32 = 1;
        loop {
            let data: TagsPage = self.fetch_page(&url, token, &[("page", page.to_string())])?;
            all_tags.extend(data.tags);

            if !data.has_additional {
                break;
            }
            page += 1;
        }

        tracing::info!("Total tags retrieved for {repo_path}: {}", all_tags.len());
        Ok(all_tags)
    }

    fn get_logs(&self, repo_path: &str, log_days: u32) -> Result<Vec<RawLogRecord>> {
        let Some(token) = self.token_for(repo_path) else {
            tracing::warn!(
                "Quay API token not defined for organization '{}'. Skipping repository {repo_path}...",
                Self::extract_org(repo_path)
            );
            return Ok(Vec::new());
        };

        tracing::info!("Fetching logs for repository: {repo_path}");
        let url = format!("{}/repository/{repo_path}/logs", self.base_url);

        let (start, end) = log_window(Utc::now().date_naive(), log_days);
        let mut params = vec![
            ("starttime", start.format(QUAY_TIME_PARAM_FORMAT).to_string()),
            ("endtime", end.format(QUAY_TIME_PARAM_FORMAT).to_string()),
        ];

        let mut all_logs = Vec::new();
        loop {
            let data: LogsPage = self.fetch_page(&url, token, &params)?;
            tracing::debug!("Retrieved {} log entries from this page.", data.logs.len());
            all_logs.extend(data.logs);

            match data.next_page {
                Some(next_page) => {
                    params.retain(|(name, _)| *name != "next_page");
                    params.push(("next_page", next_page));
                }
                None => break,
            }
        }

        tracing::info!("Total log entries retrieved for {repo_path}: {}", all_logs.len());
        Ok(all_logs)
    }
}
