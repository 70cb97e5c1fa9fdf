//! Catalog rendering, parsing, and indexing.
//!
//! - [`render`] - `opm render` invocation
//! - [`parse`] - Rendered-JSON-to-bundle-list parsing
//! - [`index`] - Repository maps built from the parsed bundle list

pub mod index;
pub mod parse;
pub mod render;

use std::path::PathBuf;

pub use index::{BundleId, CatalogIndex, RepositoryMap};
pub use parse::{parse_catalog_file, parse_catalog_json};
pub use render::render_catalog;

/// Input for one catalog-processing run: a catalog image to render, or a
/// pre-rendered JSON document on disk.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// Catalog image pullspec, rendered with `opm` before parsing.
    Image(String),
    /// Path to an already rendered catalog JSON file.
    RenderedFile(PathBuf),
}

impl CatalogSource {
    /// Human-readable identifier of the catalog, for log lines.
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Image(image) => image.clone(),
            CatalogSource::RenderedFile(path) => path.display().to_string(),
        }
    }
}

/// Split a catalog image pullspec into its catalog name and OCP version.
///
/// Expected format `<catalog-name>:<ocp-version>`, e.g.
/// `registry.redhat.io/redhat/redhat-operator-index:v4.18`. Downstream
/// persistence keys bundle appearances on this pair.
pub fn extract_catalog_attributes(catalog_image: &str) -> Option<(String, String)> {
    let (name, version) = catalog_image.rsplit_once(':')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name.to_string(), version.to_string()))
}
