//! Provenance tracking for configuration values
//!
//! Every node of a configuration tree carries an [`Origin`] describing where it
//! came from (a file, a resource, a URL, or a free-form description) and on
//! which lines. Origins never affect value equality; they exist so that
//! diagnostics can point back at the text that produced a problem.
//!
//! When values from several places are merged, their origins are combined
//! with [`Origin::merge_origins`].
//!
//! # Example
//!
//! ```rust
//! use hocon_origin::Origin;
//!
//! let a = Origin::new_file("application.conf").with_line_number(3);
//! let b = Origin::new_file("application.conf").with_line_number(7);
//!
//! let merged = Origin::merge_origins([&a, &b]);
//! assert_eq!(merged.description(), "application.conf: 3-7");
//! ```

pub mod origin;
pub mod types;

pub use origin::{MERGE_OF_PREFIX, Origin};
pub use types::OriginType;
