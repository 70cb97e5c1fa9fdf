//! Catalog index.
//!
//! [`CatalogIndex`] owns every bundle parsed from one catalog and splits them
//! into three repository maps keyed by repository path:
//!
//! - `primary`: bundles whose image address is on the primary registry
//! - `missing_digest`: the subset of primary bundles lacking a manifest digest
//! - `non_primary`: bundles hosted on a secondary/proxy registry
//!
//! Membership is non-exclusive: a primary bundle without a digest appears in
//! both the primary and missing-digest maps. Because several maps can refer
//! to the same bundle and later stages mutate bundles through any of them,
//! the maps hold ids into a shared bundle arena rather than bundle values.

use std::collections::BTreeMap;

use crate::bundle::BundleIdentity;

/// Index of a bundle in the catalog arena.
pub type BundleId = usize;

/// Mapping from repository path (`org/repo`) to the bundles stored there.
pub type RepositoryMap = BTreeMap<String, Vec<BundleId>>;

/// All bundles of one catalog, split by repository path and registry.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    bundles: Vec<BundleIdentity>,
    primary: RepositoryMap,
    missing_digest: RepositoryMap,
    non_primary: RepositoryMap,
}

impl CatalogIndex {
    /// Build the index from a flat parsed bundle list.
    ///
    /// Bundles whose image address did not yield a repository path are
    /// dropped; there is no registry to ask about them.
    pub fn from_bundles(bundles: Vec<BundleIdentity>, primary_registry: &str) -> Self {
        let mut index = Self {
            bundles,
            ..Self::default()
        };

        for id in 0..index.bundles.len() {
            let bundle = &index.bundles[id];
            let Some(repo_path) = bundle.repo_path() else {
                tracing::debug!(
                    "Bundle {} has no repository path (image: {}). Skipping...",
                    bundle.name(),
                    bundle.image()
                );
                continue;
            };

            if bundle.registry() == Some(primary_registry) {
                index.primary.entry(repo_path.clone()).or_default().push(id);
                if bundle.digest().is_none() {
                    index.missing_digest.entry(repo_path).or_default().push(id);
                }
            } else {
                index.non_primary.entry(repo_path).or_default().push(id);
            }
        }

        index
    }

    /// Number of bundles in the arena, including unmapped ones.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether the arena holds no bundles at all.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Access a bundle by id.
    pub fn bundle(&self, id: BundleId) -> &BundleIdentity {
        &self.bundles[id]
    }

    /// Mutably access a bundle by id.
    pub fn bundle_mut(&mut self, id: BundleId) -> &mut BundleIdentity {
        &mut self.bundles[id]
    }

    /// Repository map of primary-registry bundles.
    pub fn primary(&self) -> &RepositoryMap {
        &self.primary
    }

    /// Repository map of primary-registry bundles lacking a digest.
    pub fn missing_digest(&self) -> &RepositoryMap {
        &self.missing_digest
    }

    /// Repository map of bundles hosted outside the primary registry.
    pub fn non_primary(&self) -> &RepositoryMap {
        &self.non_primary
    }

    /// Append a newly constructed bundle to the primary map under
    /// `repo_path`, returning its id.
    ///
    /// Used by cross-registry resolution to merge translated identities in;
    /// the bundle enters the arena and the primary map only.
    pub fn push_primary(&mut self, repo_path: impl Into<String>, bundle: BundleIdentity) -> BundleId {
        let id = self.bundles.len();
        self.bundles.push(bundle);
        self.primary.entry(repo_path.into()).or_default().push(id);
        id
    }

    /// Ids of the bundles stored under `repo_path` in the primary map.
    pub fn primary_bundles(&self, repo_path: &str) -> &[BundleId] {
        self.primary.get(repo_path).map(Vec::as_slice).unwrap_or(&[])
    }
}
