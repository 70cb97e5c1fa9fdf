//! The usage-stats resolution engine.
//!
//! - [`matching`] - Tag-equivalence rule and local identity maps
//! - [`cache`] - Run-scoped memo of registry responses
//! - [`cross_registry`] - Non-primary-registry bundle translation
//! - [`backfill`] - Missing-digest lookup via tag listings
//! - [`aggregate`] - Pull-event attribution and per-day tallies
//! - [`engine`] - Stage orchestration across catalogs

pub mod aggregate;
pub mod backfill;
pub mod cache;
pub mod cross_registry;
pub mod engine;
pub mod matching;

pub use aggregate::aggregate_pull_counts;
pub use backfill::backfill_digests;
pub use cache::UsageStatsCache;
pub use cross_registry::resolve_non_primary;
pub use engine::{CatalogStats, UsageStatsResolver};
pub use matching::{equivalent_tag, LocalIdentityMaps};
