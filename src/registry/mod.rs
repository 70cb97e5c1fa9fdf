//! Registry and translation-service clients.
//!
//! - [`types`] - Wire records shared by the clients
//! - [`quay`] - Quay registry client (tags, usage logs)
//! - [`pyxis`] - Pyxis translation-service client (cross-registry image records)
//! - [`logs`] - Raw usage-log filtering into attributable pull events

pub mod logs;
pub mod pyxis;
pub mod quay;
pub mod types;

pub use logs::{extract_date, filter_pull_logs, log_window};
pub use pyxis::{PyxisClient, TranslationService};
pub use quay::{QuayClient, RegistryClient};
pub use types::{
    ImageLocation, ImageRecord, LogMetadata, LogReference, PullLogEntry, RawLogRecord, TagRecord,
};
