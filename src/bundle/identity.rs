//! Operator bundle identity.
//!
//! [`BundleIdentity`] models one `olm.bundle` entry from a rendered catalog:
//! its name, package, and image address, plus the address parts derived from
//! the image (registry, organization, repository, tag, digest) and the
//! per-day pull counts filled in by the aggregation stage.
//!
//! The derived parts are recomputed whenever the address changes, so they can
//! never drift from the `image` string. All address mutation goes through
//! [`BundleIdentity::rewrite_image`] / [`BundleIdentity::apply_digest`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

/// Address parts extracted from an image pull spec.
///
/// Expected format: `registry/org/repo@digest` or `registry/org/repo:tag`.
/// Every field is `None` when the input does not match that shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageParts {
    pub registry: Option<String>,
    pub org: Option<String>,
    pub repo: Option<String>,
    pub digest: Option<String>,
    pub tag: Option<String>,
}

/// Parse an image pull spec into its address parts.
pub fn parse_image_reference(image: &str) -> ImageParts {
    let mut parts = ImageParts::default();

    let segments: Vec<&str> = image.split('/').collect();
    if segments.len() != 3 {
        return parts;
    }

    let (registry, org, repo_with_ref) = (segments[0], segments[1], segments[2]);

    let repo = if let Some((repo, digest)) = repo_with_ref.split_once('@') {
        parts.digest = Some(digest.to_string());
        repo
    } else if let Some((repo, tag)) = repo_with_ref.split_once(':') {
        parts.tag = Some(tag.to_string());
        repo
    } else {
        return parts;
    };

    parts.registry = Some(registry.to_string());
    parts.org = Some(org.to_string());
    parts.repo = Some(repo.to_string());
    parts
}

/// Extract the version tag from a bundle name.
///
/// Bundle names follow `<package>.<version-tag>` (e.g. `etcd-operator.v0.9.4`);
/// the tag is everything after the first dot. Returns `None` for names
/// without a dot.
pub fn version_tag(name: &str) -> Option<&str> {
    name.split_once('.').map(|(_, tag)| tag)
}

/// Per-day pull counts, keyed by calendar date.
pub type PullCountMap = BTreeMap<NaiveDate, u64>;

/// One versioned operator bundle from a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleIdentity {
    name: String,
    package: String,
    image: String,
    registry: Option<String>,
    org: Option<String>,
    repo: Option<String>,
    tag: Option<String>,
    digest: Option<String>,
    pull_count: PullCountMap,
}

impl BundleIdentity {
    /// Create a bundle identity from catalog entry attributes.
    ///
    /// The version tag is taken from the bundle name; when the name carries
    /// no tag, the image address tag (if any) is used instead, so a bundle is
    /// always identified by at least one of tag/digest whenever its address
    /// carries a reference at all.
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let image = image.into();
        let parts = parse_image_reference(&image);
        let tag = version_tag(&name).map(str::to_string).or(parts.tag);

        Self {
            name,
            package: package.into(),
            image,
            registry: parts.registry,
            org: parts.org,
            repo: parts.repo,
            tag,
            digest: parts.digest,
            pull_count: PullCountMap::new(),
        }
    }

    /// The bundle name, including the version tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package this bundle version belongs to.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The full image pull spec.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// The registry host of the image address, e.g. `quay.io`.
    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    /// The organization part of the image address.
    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    /// The repository part of the image address.
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// The version tag of the bundle.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The manifest digest of the bundle image.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The repository path (`org/repo`) of the image address.
    ///
    /// Derived purely from the address; present whenever both the
    /// organization and repository parts parsed out of it.
    pub fn repo_path(&self) -> Option<String> {
        match (&self.org, &self.repo) {
            (Some(org), Some(repo)) => Some(format!("{org}/{repo}")),
            _ => None,
        }
    }

    /// Pull counts recorded per date so far.
    pub fn pull_count(&self) -> &PullCountMap {
        &self.pull_count
    }

    /// Record one pull on the given date. Accumulates, never overwrites.
    pub fn record_pull(&mut self, date: NaiveDate) {
        *self.pull_count.entry(date).or_insert(0) += 1;
    }

    /// Replace the image address and recompute every derived part.
    ///
    /// The version tag from the bundle name is kept; an address-derived tag
    /// only fills in when the name carries none.
    pub fn rewrite_image(&mut self, image: impl Into<String>) {
        self.image = image.into();
        let parts = parse_image_reference(&self.image);
        self.registry = parts.registry;
        self.org = parts.org;
        self.repo = parts.repo;
        self.digest = parts.digest;
        if self.tag.is_none() {
            self.tag = parts.tag;
        }
    }

    /// Set the manifest digest discovered for this bundle, rewriting the
    /// image address to embed it (`:tag` suffix becomes `@digest`).
    ///
    /// Idempotent: applying a digest equal to the current one leaves both
    /// the digest and the address string untouched.
    pub fn apply_digest(&mut self, digest: &str) {
        if self.digest.as_deref() == Some(digest) {
            return;
        }

        match (&self.registry, &self.org, &self.repo) {
            (Some(registry), Some(org), Some(repo)) => {
                let image = format!("{registry}/{org}/{repo}@{digest}");
                self.rewrite_image(image);
            }
            _ => {
                // Address never parsed; keep it as-is but record the digest.
                self.digest = Some(digest.to_string());
            }
        }
    }
}

impl fmt::Display for BundleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Package: {}", self.package)?;
        writeln!(f, "Image: {}", self.image)?;
        writeln!(f, "    Registry: {}", display_opt(&self.registry))?;
        writeln!(f, "    Org: {}", display_opt(&self.org))?;
        writeln!(f, "    Repo: {}", display_opt(&self.repo))?;
        writeln!(f, "    Tag: {}", display_opt(&self.tag))?;
        writeln!(f, "    Digest: {}", display_opt(&self.digest))?;
        write!(f, "    Pull Count: {{")?;
        for (i, (date, count)) in self.pull_count.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", date.format("%m/%d/%Y"), count)?;
        }
        write!(f, "}}")
    }
}

fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}
