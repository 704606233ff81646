//! The `Config` handle: an immutable object tree with dotted-path getters.

use crate::convert::config_value_from_json;
use crate::cursor::ConfigCursor;
use crate::error::ConfigError;
use crate::object::{ConfigList, ConfigObject};
use crate::path::Path;
use crate::resolve::{ResolveOptions, resolve};
use crate::types::{ConfigValue, ConfigValueKind};
use hocon_origin::Origin;
use std::sync::Arc;

/// An immutable configuration whose root is an object.
///
/// Cloning is cheap, and merging or resolving returns a new `Config`,
/// sharing the tree when nothing changed.
///
/// ```
/// use hocon_config::Config;
/// use hocon_origin::Origin;
/// use serde_json::json;
///
/// let app = Config::from_json(&json!({"port": 9000}), &Origin::new_file("app.json")).unwrap();
/// let defaults = Config::from_json(
///     &json!({"port": 80, "host": "localhost"}),
///     &Origin::new_resource("reference.json"),
/// )
/// .unwrap();
///
/// let config = app.with_fallback(&defaults).resolve().unwrap();
/// assert_eq!(config.get_i64("port").unwrap(), 9000);
/// assert_eq!(config.get_string("host").unwrap(), "localhost");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    root: Arc<ConfigValue>,
}

impl Config {
    /// Wrap a tree. Fails unless the root is an object.
    pub fn new(root: ConfigValue) -> Result<Self, ConfigError> {
        match root.value {
            ConfigValueKind::Object(_) => Ok(Self { root: Arc::new(root) }),
            _ => Err(ConfigError::WrongType {
                path: None,
                message: format!(
                    "the root of a configuration must be an object, not {}",
                    root.type_name()
                ),
                origin: root.origin,
            }),
        }
    }

    pub fn empty(origin: Origin) -> Self {
        Self {
            root: Arc::new(ConfigValue::from_object(ConfigObject::empty(), origin)),
        }
    }

    pub fn from_json(json: &serde_json::Value, origin: &Origin) -> Result<Self, ConfigError> {
        Self::new(config_value_from_json(json, origin))
    }

    pub fn root(&self) -> &ConfigValue {
        &self.root
    }

    pub fn origin(&self) -> &Origin {
        &self.root.origin
    }

    pub fn is_resolved(&self) -> bool {
        self.root.is_resolved()
    }

    /// This configuration with `fallback` underneath it.
    pub fn with_fallback(&self, fallback: &Config) -> Config {
        let merged = (*self.root).clone().with_fallback((*fallback.root).clone());
        Config {
            root: Arc::new(merged),
        }
    }

    pub fn resolve(&self) -> Result<Config, ConfigError> {
        self.resolve_with(&ResolveOptions::default())
    }

    pub fn resolve_with(&self, options: &ResolveOptions) -> Result<Config, ConfigError> {
        if self.is_resolved() {
            return Ok(self.clone());
        }
        Ok(Config {
            root: Arc::new(resolve(&self.root, options)?),
        })
    }

    pub fn cursor(&self) -> ConfigCursor<'_> {
        ConfigCursor::new(&self.root)
    }

    fn cursor_at(&self, path: &str) -> Result<ConfigCursor<'_>, ConfigError> {
        let path = Path::parse(path)?;
        Ok(self.cursor().at_path(&path))
    }

    /// Whether a non-null value is set at the dotted `path`.
    pub fn has_path(&self, path: &str) -> Result<bool, ConfigError> {
        Ok(self.cursor_at(path)?.exists())
    }

    pub fn get_value(&self, path: &str) -> Result<&ConfigValue, ConfigError> {
        self.cursor_at(path)?.value()
    }

    pub fn get_string(&self, path: &str) -> Result<&str, ConfigError> {
        self.cursor_at(path)?.as_str()
    }

    pub fn get_i64(&self, path: &str) -> Result<i64, ConfigError> {
        self.cursor_at(path)?.as_i64()
    }

    pub fn get_f64(&self, path: &str) -> Result<f64, ConfigError> {
        self.cursor_at(path)?.as_f64()
    }

    pub fn get_bool(&self, path: &str) -> Result<bool, ConfigError> {
        self.cursor_at(path)?.as_bool()
    }

    pub fn get_list(&self, path: &str) -> Result<&ConfigList, ConfigError> {
        self.cursor_at(path)?.as_list()
    }

    pub fn get_object(&self, path: &str) -> Result<&ConfigObject, ConfigError> {
        self.cursor_at(path)?.as_object()
    }

    pub fn to_json(&self) -> Result<serde_json::Value, ConfigError> {
        self.root.to_json()
    }
}
