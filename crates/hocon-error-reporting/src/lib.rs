//! Error reporting and diagnostic messages for configuration resolution.
//!
//! This crate provides a structured approach to error reporting, following
//! tidyverse-style message guidelines: a short title, a problem statement,
//! bulleted details, and optional hints.
//!
//! # Architecture
//!
//! - [`DiagnosticMessage`]: The main error message structure
//! - [`DetailItem`]: Detail bullets, either a cause or context
//! - [`DiagnosticMessageBuilder`]: Builder encoding the message structure
//! - [`catalog`]: Stable error codes (`H-<subsystem>-<number>`) and their metadata
//!
//! Every diagnostic may point at the [`hocon_origin::Origin`] of the value it
//! concerns.
//!
//! # Example
//!
//! ```
//! use hocon_error_reporting::DiagnosticMessageBuilder;
//! use hocon_origin::Origin;
//!
//! let error = DiagnosticMessageBuilder::error("Undefined substitution")
//!     .with_code("H-1-1")
//!     .problem("`${db.host}` is not set")
//!     .with_location(Origin::new_file("app.conf").with_line_number(4))
//!     .add_hint("Did you mean `${?db.host}`?")
//!     .build();
//!
//! assert!(error.to_text().contains("[H-1-1]"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticMessage};
