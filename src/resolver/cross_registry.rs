//! Cross-registry resolution.
//!
//! Bundles whose image address points at a secondary/proxy registry (e.g.
//! `registry.connect.redhat.com`) have no usage logs of their own; the
//! content is actually served from the primary registry under a different
//! repository. This stage asks the translation service for the image records
//! of each non-primary repository, matches them to local bundles by content
//! digest, and merges a newly constructed primary-registry identity into the
//! primary map for every match. The original non-primary identity is left
//! untouched.
//!
//! Translation-service failures and empty responses are non-fatal: those
//! bundles simply stay unresolved for this run.

use std::collections::HashSet;

use crate::bundle::BundleIdentity;
use crate::catalog::CatalogIndex;
use crate::registry::types::ImageRecord;
use crate::registry::TranslationService;
use crate::resolver::cache::UsageStatsCache;
use crate::resolver::matching::LocalIdentityMaps;

/// Translate every non-primary bundle the service knows about and merge the
/// results into the primary map.
pub fn resolve_non_primary<T: TranslationService>(
    index: &mut CatalogIndex,
    cache: &mut UsageStatsCache,
    translator: &T,
    primary_registry: &str,
) {
    let non_primary: Vec<(String, Vec<usize>)> = index
        .non_primary()
        .iter()
        .map(|(path, ids)| (path.clone(), ids.clone()))
        .collect();

    for (repo_path, ids) in non_primary {
        // Addresses translated earlier in the run skip the service entirely.
        let mut pending = Vec::new();
        for id in ids {
            let original_image = index.bundle(id).image().to_string();
            match cache.translated_image(&original_image) {
                Some(resolved) => {
                    let resolved = resolved.to_string();
                    merge_translated(index, id, &resolved);
                }
                None => pending.push(id),
            }
        }
        if pending.is_empty() {
            continue;
        }

        let Some(registry) = index.bundle(pending[0]).registry().map(str::to_string) else {
            continue;
        };

        let records: Vec<ImageRecord> = cache
            .images_or_fetch(&repo_path, || {
                match translator.get_images_for_repository(&registry, &repo_path) {
                    Ok(records) => records,
                    Err(e) => {
                        tracing::warn!(
                            "Translation lookup failed for repository {repo_path}: {e}. Skipping..."
                        );
                        Vec::new()
                    }
                }
            })
            .to_vec();

        if records.is_empty() {
            tracing::debug!("No translation records for repository {repo_path}");
            continue;
        }

        let local = LocalIdentityMaps::build(index, &pending);
        let mut resolved_ids = HashSet::new();

        for record in &records {
            let Some(digest) = record.image_id.as_deref() else {
                continue;
            };
            let Some(id) = local.match_digest(digest) else {
                continue;
            };
            if !resolved_ids.insert(id) {
                continue;
            }

            // First primary-registry location wins; responses listing several
            // primary locations for one digest are not disambiguated further.
            let primary_location = record.repositories.iter().find_map(|location| {
                match (location.registry.as_deref(), location.repository.as_deref()) {
                    (Some(reg), Some(repo)) if reg == primary_registry => Some(repo),
                    _ => None,
                }
            });
            let Some(resolved_repo) = primary_location else {
                continue;
            };

            let resolved_image = format!("{primary_registry}/{resolved_repo}@{digest}");
            let original_image = index.bundle(id).image().to_string();
            merge_translated(index, id, &resolved_image);
            cache.record_translation(original_image, resolved_image);
        }
    }
}

/// Construct the primary-registry twin of `id` and append it to the primary
/// map. The source bundle is read, never mutated.
fn merge_translated(index: &mut CatalogIndex, id: usize, resolved_image: &str) {
    let source = index.bundle(id);
    let translated =
        BundleIdentity::new(source.name(), source.package(), resolved_image);

    let Some(repo_path) = translated.repo_path() else {
        tracing::warn!(
            "Resolved image {resolved_image} has no repository path. Skipping bundle {}...",
            source.name()
        );
        return;
    };

    tracing::debug!(
        "Resolved {} -> {resolved_image} for bundle {}",
        source.image(),
        source.name()
    );
    index.push_primary(repo_path, translated);
}
