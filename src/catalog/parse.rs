//! Rendered catalog parsing.
//!
//! `opm render` emits a stream of concatenated JSON documents, one per
//! catalog object. Parsing walks that stream, keeps the `olm.bundle`
//! objects that carry the three required attributes (name, package, image),
//! and turns each into a [`BundleIdentity`]. Items missing attributes are
//! skipped with a warning; a syntactically broken stream aborts the catalog.

use std::path::Path;

use serde::Deserialize;

use crate::bundle::BundleIdentity;
use crate::error::{PullsarError, Result};

/// Schema discriminator of bundle objects in a rendered catalog.
const BUNDLE_SCHEMA: &str = "olm.bundle";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogObject {
    schema: Option<String>,
    name: Option<String>,
    package: Option<String>,
    image: Option<String>,
}

/// Parse a rendered catalog document into its bundle list.
pub fn parse_catalog_json(content: &str) -> std::result::Result<Vec<BundleIdentity>, String> {
    let mut bundles = Vec::new();

    let stream = serde_json::Deserializer::from_str(content).into_iter::<CatalogObject>();
    for (item_num, object) in stream.enumerate() {
        let object = object.map_err(|e| format!("invalid JSON in catalog stream: {e}"))?;

        if object.schema.as_deref() != Some(BUNDLE_SCHEMA) {
            continue;
        }

        match (object.name, object.package, object.image) {
            (Some(name), Some(package), Some(image)) => {
                bundles.push(BundleIdentity::new(name, package, image));
            }
            _ => {
                tracing::warn!(
                    "Bundle object {} is missing some of the attributes \
                     (expected: name, package, image). Skipping item...",
                    item_num + 1
                );
            }
        }
    }

    Ok(bundles)
}

/// Read and parse a rendered catalog JSON file.
pub fn parse_catalog_file(path: &Path) -> Result<Vec<BundleIdentity>> {
    let content = std::fs::read_to_string(path).map_err(|e| PullsarError::CatalogParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let bundles = parse_catalog_json(&content).map_err(|message| PullsarError::CatalogParse {
        path: path.to_path_buf(),
        message,
    })?;

    tracing::info!(
        "Successfully identified {} operator bundles in {}",
        bundles.len(),
        path.display()
    );
    Ok(bundles)
}
