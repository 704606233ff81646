//! Error code catalog and lookup.
//!
//! This module provides access to the centralized error catalog, which maps
//! error codes (like "H-1-1") to their metadata (subsystem, title, message template).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "resolve", "read")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default message template
    pub message_template: String,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, loaded lazily from JSON embedded at compile time.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid. This can only happen if the
/// catalog file in this crate is edited incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON")
});

/// Look up error code information.
///
/// Returns `None` if the error code is not found in the catalog.
///
/// # Example
///
/// ```
/// use hocon_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("H-1-2").unwrap();
/// assert_eq!(info.title, "Substitution Cycle");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

/// Get the subsystem name for an error code.
///
/// ```
/// use hocon_error_reporting::catalog::get_subsystem;
///
/// assert_eq!(get_subsystem("H-0-1"), Some("internal"));
/// ```
pub fn get_subsystem(code: &str) -> Option<&str> {
    ERROR_CATALOG.get(code).map(|info| info.subsystem.as_str())
}
