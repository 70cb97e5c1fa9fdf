//! Pyxis content-metadata client.
//!
//! [`PyxisClient`] implements [`TranslationService`] over the Pyxis HTTP API.
//! Given a repository published on a secondary/proxy registry, Pyxis returns
//! the image records for that repository, each carrying the canonical
//! manifest digest and every equivalent registry/repository location the
//! same content is published under. The cross-registry resolution stage uses
//! these records to rewrite proxy-registry addresses to their primary
//! (Quay) equivalents.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{PullsarError, Result};
use crate::registry::types::ImageRecord;

/// Logical contract of the translation service consumed by the resolver.
pub trait TranslationService {
    /// Fetch all image records for `repo_path` as published on `registry`,
    /// across all pages.
    fn get_images_for_repository(&self, registry: &str, repo_path: &str)
        -> Result<Vec<ImageRecord>>;
}

/// Field projection requested from Pyxis; everything else is dead weight.
const PYXIS_INCLUDE_FIELDS: &str =
    "data.image_id,data.repositories.registry,data.repositories.repository";

const PYXIS_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct ImagesPage {
    #[serde(default)]
    data: Vec<ImageRecord>,
}

/// Percent-encode a repository path for use as a single URL path segment.
///
/// Repository paths contain `org/repo` slashes that must not be treated as
/// path separators by the Pyxis route.
fn encode_repo_path(repo_path: &str) -> String {
    repo_path.replace('/', "%2F")
}

/// Blocking client for the Pyxis API.
pub struct PyxisClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl PyxisClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl TranslationService for PyxisClient {
    fn get_images_for_repository(
        &self,
        registry: &str,
        repo_path: &str,
    ) -> Result<Vec<ImageRecord>> {
        let url = format!(
            "{}/repositories/registry/{registry}/repository/{}/images",
            self.base_url,
            encode_repo_path(repo_path)
        );

        let mut all_images = Vec::new();
        let mut page: u32 = 0;
        loop {
            let params = [
                ("page_size", PYXIS_PAGE_SIZE.to_string()),
                ("page", page.to_string()),
                ("include", PYXIS_INCLUDE_FIELDS.to_string()),
            ];
            tracing::debug!("Fetching Pyxis data from {url} with params: {params:?}");

            let response = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .query(&params)
                .send()?;

            let status = response.status();
            if !status.is_success() {
                return Err(PullsarError::ApiRequest {
                    url: url.clone(),
                    message: format!("HTTP {status}"),
                });
            }

            let data: ImagesPage = response.json()?;
            if data.data.is_empty() {
                break;
            }

            all_images.extend(data.data);
            page += 1;
        }

        tracing::info!(
            "Found {} images in Pyxis for repo {repo_path}",
            all_images.len()
        );
        Ok(all_images)
    }
}
