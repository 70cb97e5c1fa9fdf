//! Tag-equivalence matching and local identity maps.
//!
//! Catalogs and registries frequently alias the same version with and
//! without a leading `v` (`v1.2.3` vs `1.2.3`). [`equivalent_tag`] unifies
//! the two spellings so pulls of either count toward one bundle. The rule is
//! deliberately narrow: exact match first, then a single `v`-prefix toggle.
//! Tags differing in any other way (`1.0` vs `1.0.0`) are never considered
//! equivalent; this is not semver comparison. Alternative matching policies
//! belong here, behind this one seam.

use std::collections::HashMap;

use crate::catalog::{BundleId, CatalogIndex};

/// Find the key in `tag_map` that `tag` refers to, if any.
///
/// Exact match wins; otherwise the `v` prefix is toggled (stripped when
/// present, prepended when absent) and looked up once more. Returns the key
/// actually present in the map so callers can index with it directly.
pub fn equivalent_tag<'a, V>(tag: &str, tag_map: &'a HashMap<String, V>) -> Option<&'a str> {
    if let Some((key, _)) = tag_map.get_key_value(tag) {
        return Some(key.as_str());
    }

    let toggled = match tag.strip_prefix('v') {
        Some(stripped) => stripped.to_string(),
        None => format!("v{tag}"),
    };
    tag_map.get_key_value(toggled.as_str()).map(|(key, _)| key.as_str())
}

/// Tag and digest lookup maps over the bundles of one repository.
///
/// A bundle carrying both a tag and a digest appears in both maps. When two
/// bundles in the same repository share a tag or digest, the later one in
/// the input list wins; catalogs can legitimately alias versions, and
/// last-write-wins insertion preserves that precedence.
#[derive(Debug, Default)]
pub struct LocalIdentityMaps {
    pub by_tag: HashMap<String, BundleId>,
    pub by_digest: HashMap<String, BundleId>,
}

impl LocalIdentityMaps {
    /// Build both maps from the bundles identified by `ids`.
    pub fn build(index: &CatalogIndex, ids: &[BundleId]) -> Self {
        let mut maps = Self::default();
        for &id in ids {
            let bundle = index.bundle(id);
            if let Some(tag) = bundle.tag() {
                maps.by_tag.insert(tag.to_string(), id);
            }
            if let Some(digest) = bundle.digest() {
                maps.by_digest.insert(digest.to_string(), id);
            }
        }
        maps
    }

    /// Bundle referred to by `tag` under the equivalence rule.
    pub fn match_tag(&self, tag: &str) -> Option<BundleId> {
        equivalent_tag(tag, &self.by_tag).map(|key| self.by_tag[key])
    }

    /// Bundle carrying exactly `digest`.
    pub fn match_digest(&self, digest: &str) -> Option<BundleId> {
        self.by_digest.get(digest).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleIdentity;

    fn tag_map(tags: &[&str]) -> HashMap<String, ()> {
        tags.iter().map(|t| (t.to_string(), ())).collect()
    }

    #[test]
    fn exact_match_wins() {
        let map = tag_map(&["v1.0", "1.0"]);
        // Both spellings exist; the candidate's own spelling is returned,
        // never silently merged with the other.
        assert_eq!(equivalent_tag("v1.0", &map), Some("v1.0"));
        assert_eq!(equivalent_tag("1.0", &map), Some("1.0"));
    }

    #[test]
    fn strips_v_prefix_when_bare_key_exists() {
        let map = tag_map(&["1.0"]);
        assert_eq!(equivalent_tag("v1.0", &map), Some("1.0"));
    }

    #[test]
    fn prepends_v_prefix_when_prefixed_key_exists() {
        let map = tag_map(&["v1.0"]);
        assert_eq!(equivalent_tag("1.0", &map), Some("v1.0"));
    }

    #[test]
    fn no_deeper_normalization() {
        let map = tag_map(&["v1.0"]);
        // Single-step fold only: no semver-style padding.
        assert_eq!(equivalent_tag("1.0.0", &map), None);
        assert_eq!(equivalent_tag("v1", &map), None);
    }

    #[test]
    fn no_match_on_empty_map() {
        let map: HashMap<String, ()> = HashMap::new();
        assert_eq!(equivalent_tag("v1.0", &map), None);
    }

    fn index_of(bundles: Vec<BundleIdentity>) -> CatalogIndex {
        CatalogIndex::from_bundles(bundles, "quay.io")
    }

    #[test]
    fn builds_tag_and_digest_maps() {
        let index = index_of(vec![
            BundleIdentity::new("a.v1", "a", "quay.io/acme/r:v1"),
            BundleIdentity::new("b.v2", "b", "quay.io/acme/r@sha256:d1"),
        ]);
        let ids = index.primary()["acme/r"].clone();
        let maps = LocalIdentityMaps::build(&index, &ids);

        // A(tag=v1, no digest), B(tag=v2 from name, digest=d1).
        assert_eq!(maps.by_tag.len(), 2);
        assert_eq!(maps.by_digest.len(), 1);
        assert_eq!(index.bundle(maps.by_tag["v1"]).name(), "a.v1");
        assert_eq!(index.bundle(maps.by_digest["sha256:d1"]).name(), "b.v2");
    }

    #[test]
    fn shared_tag_last_write_wins() {
        let index = index_of(vec![
            BundleIdentity::new("first.v1", "a", "quay.io/acme/r:v1"),
            BundleIdentity::new("second.v1", "a", "quay.io/acme/r:v1"),
        ]);
        let ids = index.primary()["acme/r"].clone();
        let maps = LocalIdentityMaps::build(&index, &ids);

        assert_eq!(index.bundle(maps.by_tag["v1"]).name(), "second.v1");
    }

    #[test]
    fn match_tag_applies_equivalence() {
        let index = index_of(vec![BundleIdentity::new("a.v1.0", "a", "quay.io/acme/r:v1.0")]);
        let ids = index.primary()["acme/r"].clone();
        let maps = LocalIdentityMaps::build(&index, &ids);

        let id = maps.match_tag("1.0").unwrap();
        assert_eq!(index.bundle(id).name(), "a.v1.0");
        assert_eq!(maps.match_tag("1.0.0"), None);
    }
}
