//! Pull-count aggregation.
//!
//! The final stage: walk the digest-complete primary map, fetch each
//! repository's usage logs for the lookback window, and attribute every pull
//! event to a bundle version. A digest reference must match exactly; a tag
//! reference goes through tag-equivalence. Events matching neither belong to
//! versions outside this catalog snapshot (retired tags, unrelated images)
//! and are silently dropped.

use crate::catalog::CatalogIndex;
use crate::registry::types::LogReference;
use crate::registry::{filter_pull_logs, RegistryClient};
use crate::resolver::cache::UsageStatsCache;
use crate::resolver::matching::LocalIdentityMaps;

/// Tally per-day pull counts for every bundle in the primary map.
///
/// Counts accumulate: aggregating twice adds, never resets.
pub fn aggregate_pull_counts<R: RegistryClient>(
    index: &mut CatalogIndex,
    cache: &mut UsageStatsCache,
    registry: &R,
    log_days: u32,
) {
    let primary: Vec<(String, Vec<usize>)> = index
        .primary()
        .iter()
        .map(|(path, ids)| (path.clone(), ids.clone()))
        .collect();

    for (repo_path, ids) in primary {
        let entries = cache
            .pull_logs_or_fetch(&repo_path, || {
                match registry.get_logs(&repo_path, log_days) {
                    Ok(records) => filter_pull_logs(&records),
                    Err(e) => {
                        tracing::warn!(
                            "Log fetch failed for repository {repo_path}: {e}. Skipping..."
                        );
                        Vec::new()
                    }
                }
            })
            .to_vec();

        if entries.is_empty() {
            tracing::info!("No logs found for repository path: {repo_path}");
            continue;
        }

        let local = LocalIdentityMaps::build(index, &ids);

        for entry in &entries {
            let matched = match &entry.reference {
                LogReference::Digest(digest) => local.match_digest(digest),
                LogReference::Tag(tag) => local.match_tag(tag),
            };
            if let Some(id) = matched {
                index.bundle_mut(id).record_pull(entry.date);
            }
        }
    }
}
