//! Run orchestration.
//!
//! [`UsageStatsResolver`] owns the registry clients and the run-scoped cache,
//! and drives the four stages for each catalog in strict sequence:
//!
//! 1. Index the parsed bundles into repository maps
//! 2. Resolve non-primary-registry bundles into the primary map
//! 3. Backfill missing digests
//! 4. Aggregate pull counts
//!
//! A render or parse failure aborts the catalog with an empty result; every
//! later stage is fault-tolerant per repository and never aborts the run.
//! One resolver instance is meant to process many catalogs, reusing its
//! cache across all of them.

use std::path::{Path, PathBuf};

use crate::catalog::{
    extract_catalog_attributes, parse_catalog_file, render_catalog, CatalogIndex, CatalogSource,
};
use crate::config::Settings;
use crate::registry::{PyxisClient, QuayClient, RegistryClient, TranslationService};
use crate::report;
use crate::resolver::aggregate::aggregate_pull_counts;
use crate::resolver::backfill::backfill_digests;
use crate::resolver::cache::UsageStatsCache;
use crate::resolver::cross_registry::resolve_non_primary;

/// Result of processing one catalog.
#[derive(Debug)]
pub struct CatalogStats {
    /// Catalog name and OCP version, when extractable from the image pullspec.
    pub catalog: Option<(String, String)>,
    /// The populated primary repository map and its bundles.
    pub index: CatalogIndex,
}

/// The usage-stats resolution engine.
pub struct UsageStatsResolver<R, T> {
    settings: Settings,
    registry: R,
    translator: T,
    cache: UsageStatsCache,
}

impl UsageStatsResolver<QuayClient, PyxisClient> {
    /// Build a resolver with the production Quay and Pyxis clients.
    pub fn from_settings(settings: Settings) -> Self {
        let registry = QuayClient::new(
            settings.quay_api_base_url.clone(),
            settings.quay_api_tokens.clone(),
        );
        let translator = PyxisClient::new(settings.pyxis_api_base_url.clone());
        Self::new(settings, registry, translator)
    }
}

impl<R: RegistryClient, T: TranslationService> UsageStatsResolver<R, T> {
    /// Build a resolver over arbitrary collaborator implementations.
    pub fn new(settings: Settings, registry: R, translator: T) -> Self {
        Self {
            settings,
            registry,
            translator,
            cache: UsageStatsCache::new(),
        }
    }

    /// Process one catalog and return its populated primary map.
    ///
    /// Render and parse failures are fatal for this catalog only: they are
    /// logged and an empty result is returned so the caller can move to the
    /// next catalog. Per-repository registry failures inside the stages are
    /// logged and skipped.
    pub fn resolve(&mut self, source: &CatalogSource, log_days: u32) -> CatalogStats {
        let catalog = match source {
            CatalogSource::Image(image) => extract_catalog_attributes(image),
            CatalogSource::RenderedFile(_) => None,
        };

        let rendered = match self.rendered_path(source) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("{e}");
                tracing::info!("Skipping catalog {}...", source.describe());
                return CatalogStats {
                    catalog,
                    index: CatalogIndex::default(),
                };
            }
        };

        let bundles = match parse_catalog_file(&rendered) {
            Ok(bundles) => bundles,
            Err(e) => {
                tracing::error!("{e}");
                tracing::info!("Skipping catalog {}...", source.describe());
                return CatalogStats {
                    catalog,
                    index: CatalogIndex::default(),
                };
            }
        };

        let mut index = CatalogIndex::from_bundles(bundles, &self.settings.primary_registry);

        tracing::info!("Resolving bundles hosted outside {}...", self.settings.primary_registry);
        resolve_non_primary(
            &mut index,
            &mut self.cache,
            &self.translator,
            &self.settings.primary_registry,
        );

        tracing::info!("Looking up missing manifest digests if any...");
        backfill_digests(&mut index, &mut self.cache, &self.registry);

        tracing::info!("Operator bundles and their usage stats:");
        aggregate_pull_counts(&mut index, &mut self.cache, &self.registry, log_days);

        tracing::info!("Operators pulled at least once in the last {log_days} days:");
        print!("{}", report::render_usage_stats(&index));

        CatalogStats { catalog, index }
    }

    fn rendered_path(&self, source: &CatalogSource) -> crate::error::Result<PathBuf> {
        match source {
            CatalogSource::Image(image) => {
                let output = Path::new(&self.settings.catalog_json_file).to_path_buf();
                render_catalog(image, &output)?;
                Ok(output)
            }
            CatalogSource::RenderedFile(path) => Ok(path.clone()),
        }
    }
}
