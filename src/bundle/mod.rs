//! Operator bundle model.
//!
//! - [`identity`] - Bundle identity, image address parsing, pull counts

pub mod identity;

pub use identity::{parse_image_reference, version_tag, BundleIdentity, ImageParts, PullCountMap};
