//! Digest backfill.
//!
//! Catalogs routinely reference bundle images by tag only. Pull logs, on the
//! other hand, mostly carry manifest digests. This stage closes the gap: for
//! every primary-registry bundle lacking a digest, it fetches the
//! repository's tag listing and fills the digest in by tag-equivalence
//! match, rewriting the bundle's address to embed the digest.

use crate::catalog::CatalogIndex;
use crate::registry::RegistryClient;
use crate::resolver::cache::UsageStatsCache;
use crate::resolver::matching::LocalIdentityMaps;

/// Fill in missing digests for every repository in the missing-digest map.
pub fn backfill_digests<R: RegistryClient>(
    index: &mut CatalogIndex,
    cache: &mut UsageStatsCache,
    registry: &R,
) {
    let missing: Vec<(String, Vec<usize>)> = index
        .missing_digest()
        .iter()
        .map(|(path, ids)| (path.clone(), ids.clone()))
        .collect();

    for (repo_path, ids) in missing {
        let tag_records = cache
            .tags_or_fetch(&repo_path, || match registry.get_tags(&repo_path) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        "Tag listing failed for repository {repo_path}: {e}. Skipping..."
                    );
                    Vec::new()
                }
            })
            .to_vec();

        let local = LocalIdentityMaps::build(index, &ids);

        for record in &tag_records {
            let Some(digest) = record.manifest_digest.as_deref() else {
                continue;
            };
            if let Some(id) = local.match_tag(&record.name) {
                index.bundle_mut(id).apply_digest(digest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleIdentity;
    use crate::error::{PullsarError, Result};
    use crate::registry::types::{RawLogRecord, TagRecord};
    use std::cell::Cell;
    use std::collections::HashMap;

    struct FakeRegistry {
        tags: HashMap<String, Vec<TagRecord>>,
        fail: bool,
        tag_calls: Cell<usize>,
    }

    impl FakeRegistry {
        fn with_tags(repo_path: &str, tags: Vec<TagRecord>) -> Self {
            let mut map = HashMap::new();
            map.insert(repo_path.to_string(), tags);
            Self {
                tags: map,
                fail: false,
                tag_calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                tags: HashMap::new(),
                fail: true,
                tag_calls: Cell::new(0),
            }
        }
    }

    impl RegistryClient for FakeRegistry {
        fn get_tags(&self, repo_path: &str) -> Result<Vec<TagRecord>> {
            self.tag_calls.set(self.tag_calls.get() + 1);
            if self.fail {
                return Err(PullsarError::ApiRequest {
                    url: format!("fake://{repo_path}/tag"),
                    message: "HTTP 500".into(),
                });
            }
            Ok(self.tags.get(repo_path).cloned().unwrap_or_default())
        }

        fn get_logs(&self, _repo_path: &str, _log_days: u32) -> Result<Vec<RawLogRecord>> {
            Ok(Vec::new())
        }
    }

    fn tag(name: &str, digest: &str) -> TagRecord {
        TagRecord {
            name: name.to_string(),
            manifest_digest: Some(digest.to_string()),
        }
    }

    fn tagged_index(name: &str, image: &str) -> CatalogIndex {
        CatalogIndex::from_bundles(vec![BundleIdentity::new(name, "pkg", image)], "quay.io")
    }

    #[test]
    fn fills_digest_and_rewrites_image() {
        let mut index = tagged_index("op.v3", "quay.io/acme/op-bundle:v3");
        let mut cache = UsageStatsCache::new();
        let registry = FakeRegistry::with_tags("acme/op-bundle", vec![tag("3", "sha256:dX")]);

        backfill_digests(&mut index, &mut cache, &registry);

        let bundle = index.bundle(index.primary()["acme/op-bundle"][0]);
        // "3" matched "v3" through the v-prefix toggle.
        assert_eq!(bundle.digest(), Some("sha256:dX"));
        assert_eq!(bundle.image(), "quay.io/acme/op-bundle@sha256:dX");
    }

    #[test]
    fn unrelated_tags_leave_bundle_untouched() {
        let mut index = tagged_index("op.v3", "quay.io/acme/op-bundle:v3");
        let mut cache = UsageStatsCache::new();
        let registry =
            FakeRegistry::with_tags("acme/op-bundle", vec![tag("latest", "sha256:dL")]);

        backfill_digests(&mut index, &mut cache, &registry);

        let bundle = index.bundle(index.primary()["acme/op-bundle"][0]);
        assert_eq!(bundle.digest(), None);
        assert_eq!(bundle.image(), "quay.io/acme/op-bundle:v3");
    }

    #[test]
    fn rerun_with_same_response_is_idempotent() {
        let mut index = tagged_index("op.v3", "quay.io/acme/op-bundle:v3");
        let mut cache = UsageStatsCache::new();
        let registry = FakeRegistry::with_tags("acme/op-bundle", vec![tag("v3", "sha256:dX")]);

        backfill_digests(&mut index, &mut cache, &registry);
        let image_after_first = index
            .bundle(index.primary()["acme/op-bundle"][0])
            .image()
            .to_string();

        backfill_digests(&mut index, &mut cache, &registry);

        let bundle = index.bundle(index.primary()["acme/op-bundle"][0]);
        assert_eq!(bundle.image(), image_after_first);
        assert_eq!(bundle.digest(), Some("sha256:dX"));
    }

    #[test]
    fn tag_fetch_happens_once_per_repo_per_run() {
        let mut index = tagged_index("op.v3", "quay.io/acme/op-bundle:v3");
        let mut cache = UsageStatsCache::new();
        let registry = FakeRegistry::with_tags("acme/op-bundle", vec![tag("v3", "sha256:dX")]);

        backfill_digests(&mut index, &mut cache, &registry);
        backfill_digests(&mut index, &mut cache, &registry);

        assert_eq!(registry.tag_calls.get(), 1);
    }

    #[test]
    fn registry_failure_is_non_fatal() {
        let mut index = tagged_index("op.v3", "quay.io/acme/op-bundle:v3");
        let mut cache = UsageStatsCache::new();
        let registry = FakeRegistry::failing();

        backfill_digests(&mut index, &mut cache, &registry);

        let bundle = index.bundle(index.primary()["acme/op-bundle"][0]);
        assert_eq!(bundle.digest(), None);
    }

    #[test]
    fn records_without_digest_are_ignored() {
        let mut index = tagged_index("op.v3", "quay.io/acme/op-bundle:v3");
        let mut cache = UsageStatsCache::new();
        let registry = FakeRegistry::with_tags(
            "acme/op-bundle",
            vec![TagRecord {
                name: "v3".into(),
                manifest_digest: None,
            }],
        );

        backfill_digests(&mut index, &mut cache, &registry);

        let bundle = index.bundle(index.primary()["acme/op-bundle"][0]);
        assert_eq!(bundle.digest(), None);
    }
}
