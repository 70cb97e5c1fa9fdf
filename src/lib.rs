//! Pullsar - pull-count usage statistics for OLM operator bundles.
//!
//! Pullsar scans operator catalogs for bundles, reconciles each bundle's
//! identity against the Quay registry API (and the Pyxis API for images
//! distributed through a proxy registry), and tallies per-day pull counts
//! per bundle version.
//!
//! # Modules
//!
//! - [`bundle`] - Operator bundle identity and pull-count model
//! - [`catalog`] - Catalog rendering, parsing, and repository indexing
//! - [`cli`] - Command-line interface
//! - [`config`] - Runtime settings and API credentials
//! - [`error`] - Error types and result aliases
//! - [`registry`] - Quay and Pyxis HTTP clients and log filtering
//! - [`report`] - Human-readable stats dump
//! - [`resolver`] - The usage-stats resolution engine
//!
//! # Example
//!
//! ```
//! use pullsar::bundle::BundleIdentity;
//!
//! let bundle = BundleIdentity::new(
//!     "etcd-operator.v0.9.4",
//!     "etcd",
//!     "quay.io/acme/etcd-bundle:v0.9.4",
//! );
//! assert_eq!(bundle.tag(), Some("v0.9.4"));
//! assert_eq!(bundle.repo_path().as_deref(), Some("acme/etcd-bundle"));
//! ```

pub mod bundle;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod report;
pub mod resolver;

pub use error::{PullsarError, Result};
