//! Run-scoped registry response cache.
//!
//! One resolver instance processes many catalogs in a run, and the same
//! repository recurs across catalog versions constantly. [`UsageStatsCache`]
//! memoizes every registry and translation-service response keyed by
//! repository path so each repository is fetched at most once per run,
//! which is the main cost-saving device of the whole pipeline.
//!
//! The cache is owned by its resolver instance and lives exactly as long as
//! it does: no globals, no statics. A fetch that fails upstream is memoized
//! as an empty list; retrying within a run is the client collaborator's
//! business, not ours.

use std::collections::HashMap;

use crate::registry::types::{ImageRecord, PullLogEntry, TagRecord};

/// Memo of registry responses fetched in the current run.
#[derive(Debug, Default)]
pub struct UsageStatsCache {
    pull_logs: HashMap<String, Vec<PullLogEntry>>,
    images: HashMap<String, Vec<ImageRecord>>,
    tags: HashMap<String, Vec<TagRecord>>,
    translated_images: HashMap<String, String>,
}

impl UsageStatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filtered pull-log entries for `repo_path`, fetching on first use.
    pub fn pull_logs_or_fetch(
        &mut self,
        repo_path: &str,
        fetch: impl FnOnce() -> Vec<PullLogEntry>,
    ) -> &[PullLogEntry] {
        self.pull_logs
            .entry(repo_path.to_string())
            .or_insert_with(fetch)
    }

    /// Translation-service image records for `repo_path`, fetching on first use.
    pub fn images_or_fetch(
        &mut self,
        repo_path: &str,
        fetch: impl FnOnce() -> Vec<ImageRecord>,
    ) -> &[ImageRecord] {
        self.images.entry(repo_path.to_string()).or_insert_with(fetch)
    }

    /// Tag-list records for `repo_path`, fetching on first use.
    pub fn tags_or_fetch(
        &mut self,
        repo_path: &str,
        fetch: impl FnOnce() -> Vec<TagRecord>,
    ) -> &[TagRecord] {
        self.tags.entry(repo_path.to_string()).or_insert_with(fetch)
    }

    /// Primary-registry address a non-primary image was previously resolved
    /// to, if any.
    pub fn translated_image(&self, original_image: &str) -> Option<&str> {
        self.translated_images.get(original_image).map(String::as_str)
    }

    /// Record an address translation for reuse later in the run.
    pub fn record_translation(
        &mut self,
        original_image: impl Into<String>,
        resolved_image: impl Into<String>,
    ) {
        self.translated_images
            .insert(original_image.into(), resolved_image.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_fetched_exactly_once_per_repo() {
        let mut cache = UsageStatsCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            cache.tags_or_fetch("acme/repo", || {
                calls += 1;
                vec![TagRecord {
                    name: "v1".into(),
                    manifest_digest: Some("sha256:d1".into()),
                }]
            });
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.tags_or_fetch("acme/repo", Vec::new).len(), 1);
    }

    #[test]
    fn different_repos_fetch_independently() {
        let mut cache = UsageStatsCache::new();
        let mut calls = 0;
        let mut fetch = || {
            calls += 1;
            Vec::new()
        };

        cache.images_or_fetch("acme/a", &mut fetch);
        cache.images_or_fetch("acme/b", &mut fetch);

        assert_eq!(calls, 2);
    }

    #[test]
    fn empty_result_is_memoized_too() {
        // A failed or empty fetch must not be retried within the run.
        let mut cache = UsageStatsCache::new();
        let mut calls = 0;

        cache.pull_logs_or_fetch("acme/repo", || {
            calls += 1;
            Vec::new()
        });
        cache.pull_logs_or_fetch("acme/repo", || {
            calls += 1;
            Vec::new()
        });

        assert_eq!(calls, 1);
    }

    #[test]
    fn records_and_returns_translations() {
        let mut cache = UsageStatsCache::new();
        assert_eq!(cache.translated_image("registry.connect.redhat.com/acme/op:v1"), None);

        cache.record_translation(
            "registry.connect.redhat.com/acme/op:v1",
            "quay.io/acme/op-bundle@sha256:d1",
        );

        assert_eq!(
            cache.translated_image("registry.connect.redhat.com/acme/op:v1"),
            Some("quay.io/acme/op-bundle@sha256:d1")
        );
    }
}
