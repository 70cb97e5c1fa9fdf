//! Wire records shared by the registry and translation-service clients.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One tag entry from the Quay tag listing.
///
/// The listing carries more attributes than these; only the tag name and its
/// manifest digest matter for digest backfill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagRecord {
    pub name: String,
    #[serde(default)]
    pub manifest_digest: Option<String>,
}

/// Metadata attached to a raw Quay usage-log record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogMetadata {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub manifest_digest: Option<String>,
}

/// One raw, heterogeneous usage-log record from the Quay logs endpoint.
///
/// Records of kinds other than `pull_repo`, or lacking a datetime or a
/// version reference, are dropped during filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawLogRecord {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub metadata: Option<LogMetadata>,
}

/// The version reference a pull event carries: exactly one of tag or digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogReference {
    Tag(String),
    Digest(String),
}

/// One attributed pull event, produced by filtering raw log records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullLogEntry {
    pub date: NaiveDate,
    pub reference: LogReference,
}

/// An equivalent location of an image, from a Pyxis image record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageLocation {
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

/// One image record from the Pyxis repository-images endpoint.
///
/// `image_id` is the canonical manifest digest; `repositories` lists every
/// registry/repository pair the same content is published under.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub repositories: Vec<ImageLocation>,
}
