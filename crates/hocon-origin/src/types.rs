//! Core types for origin tracking

use serde::{Deserialize, Serialize};

/// The kind of source a value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginType {
    /// Free-form description (programmatic values, merges of unrelated sources)
    #[default]
    Generic,
    /// A file on disk
    File,
    /// A resource bundled with the application
    Resource,
    /// A remote document
    Url,
}
