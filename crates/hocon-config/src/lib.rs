//! HOCON configuration values, fallback merging and substitution resolution.
//!
//! This crate is the engine behind a HOCON configuration library: it holds
//! parsed configuration trees, merges layers of them with fallback
//! semantics, and resolves `${path}` substitutions.
//!
//! # Key Features
//!
//! - **Origins everywhere**: every value records where it was defined, and
//!   merged values record everything they were merged from
//! - **Deferred merging**: merging never resolves anything; values that
//!   depend on substitutions are kept as delayed merges until resolution
//! - **Self-references**: `path = ${path} [3]` sees the lower-priority
//!   value of `path` instead of being reported as a cycle
//! - **Structured errors**: every failure converts into a
//!   [`DiagnosticMessage`] with a stable code
//!
//! # Architecture
//!
//! - [`ConfigValue`]: a value and its [`Origin`]
//! - [`ConfigValue::with_fallback`] and [`merge`]: layer merging
//! - [`resolve`] and [`resolve_at`]: substitution resolution
//! - [`Config`] and [`ConfigCursor`]: reading resolved values
//!
//! # Example
//!
//! ```
//! use hocon_config::{Config, ConfigValue, Path};
//! use hocon_origin::Origin;
//! use indexmap::IndexMap;
//!
//! let origin = Origin::new_file("app.conf");
//! let mut entries = IndexMap::new();
//! entries.insert("host".to_string(), ConfigValue::string("db.local", origin.clone()));
//! entries.insert(
//!     "url".to_string(),
//!     ConfigValue::concatenation(
//!         vec![
//!             ConfigValue::string("postgres://", origin.clone()),
//!             ConfigValue::reference(Path::parse("host").unwrap(), false, origin.clone()),
//!         ],
//!         origin.clone(),
//!     )
//!     .unwrap(),
//! );
//!
//! let config = Config::new(ConfigValue::object(entries, origin)).unwrap().resolve().unwrap();
//! assert_eq!(config.get_string("url").unwrap(), "postgres://db.local");
//! ```

mod config;
mod convert;
mod cursor;
mod error;
mod merge;
mod number;
mod object;
mod path;
mod resolve;
mod substitution;
mod types;

pub use config::Config;

pub use convert::config_value_from_json;

pub use cursor::ConfigCursor;

pub use error::ConfigError;

pub use merge::merge;

pub use number::{ConfigNumber, NumberValue};

pub use object::{ConfigList, ConfigObject};

pub use path::Path;

pub use resolve::{ResolveOptions, resolve, resolve_at, resolve_with_diagnostics};

pub use substitution::{
    ConfigConcatenation, ConfigDelayedMerge, ConfigReference, SubstitutionExpression,
};

pub use types::{ConfigString, ConfigValue, ConfigValueKind, ValueType};

// Re-export for convenience
pub use hocon_error_reporting::DiagnosticMessage;
pub use hocon_origin::Origin;
