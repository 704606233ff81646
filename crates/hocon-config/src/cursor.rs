//! Cursor-based reading of a configuration tree.
//!
//! A cursor is a root plus a path. Navigation never fails; lookups happen
//! when a value is requested, and report exactly what went wrong.
//!
//! ```
//! use hocon_config::{ConfigCursor, config_value_from_json};
//! use hocon_origin::Origin;
//! use serde_json::json;
//!
//! let root = config_value_from_json(&json!({"server": {"port": 8080}}), &Origin::default());
//! let port = ConfigCursor::new(&root).at("server").at("port").as_i64().unwrap();
//! assert_eq!(port, 8080);
//! ```

use crate::error::ConfigError;
use crate::object::{ConfigList, ConfigObject};
use crate::path::Path;
use crate::types::{ConfigValue, ConfigValueKind, ValueType};

/// A position in a configuration tree.
///
/// The cursor is lightweight: it borrows the root and stores a path.
#[derive(Debug, Clone)]
pub struct ConfigCursor<'a> {
    root: &'a ConfigValue,
    path: Vec<String>,
}

impl<'a> ConfigCursor<'a> {
    pub fn new(root: &'a ConfigValue) -> Self {
        Self {
            root,
            path: Vec::new(),
        }
    }

    /// Navigate to a child key.
    pub fn at(&self, key: &str) -> ConfigCursor<'a> {
        let mut path = self.path.clone();
        path.push(key.to_string());
        ConfigCursor { root: self.root, path }
    }

    /// Navigate along a path (multiple keys at once).
    pub fn at_path(&self, path: &Path) -> ConfigCursor<'a> {
        let mut new_path = self.path.clone();
        new_path.extend(path.elements().iter().cloned());
        ConfigCursor {
            root: self.root,
            path: new_path,
        }
    }

    /// Get the current path, empty at the root.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    fn path_prefix(&self, len: usize) -> Option<Path> {
        if len == 0 {
            None
        } else {
            Some(Path::from_slice(&self.path[..len]))
        }
    }

    /// The value at this position.
    pub fn value(&self) -> Result<&'a ConfigValue, ConfigError> {
        if self.path.iter().any(String::is_empty) {
            return Err(ConfigError::BadPath {
                input: self.path.join("."),
                reason: "path elements may not be empty".to_string(),
            });
        }

        let mut current = self.root;
        for (depth, key) in self.path.iter().enumerate() {
            current = match &current.value {
                ConfigValueKind::Object(object) => match object.get(key) {
                    Some(child) => child,
                    None => {
                        return Err(ConfigError::Missing {
                            path: Path::from_slice(&self.path[..=depth]),
                        });
                    }
                },
                _ if current.is_unmergeable() => {
                    return Err(ConfigError::NotResolved {
                        path: self.path_prefix(depth),
                        origin: current.origin.clone(),
                    });
                }
                _ => {
                    return Err(ConfigError::WrongType {
                        path: self.path_prefix(depth),
                        message: format!(
                            "{} has type {} rather than object",
                            self.path_prefix(depth)
                                .map_or_else(|| "the root".to_string(), |p| format!("'{}'", p)),
                            current.type_name()
                        ),
                        origin: current.origin.clone(),
                    });
                }
            };
        }

        if current.is_unmergeable() {
            return Err(ConfigError::NotResolved {
                path: self.path_prefix(self.path.len()),
                origin: current.origin.clone(),
            });
        }
        Ok(current)
    }

    /// Whether a non-null value is set here.
    pub fn exists(&self) -> bool {
        self.value().is_ok_and(|value| !value.is_null())
    }

    /// Keys of the object at this position, or nothing if it is not an object.
    pub fn keys(&self) -> Vec<String> {
        match self.value() {
            Ok(value) => value
                .as_object()
                .map(|object| object.keys().map(str::to_string).collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    pub fn is_null(&self) -> Result<bool, ConfigError> {
        self.value().map(ConfigValue::is_null)
    }

    fn wrong_type(&self, value: &ConfigValue, expected: ValueType) -> ConfigError {
        let path = self.path_prefix(self.path.len());
        let place = path
            .as_ref()
            .map_or_else(|| "the root".to_string(), |p| format!("'{}'", p));
        ConfigError::WrongType {
            path,
            message: format!("{} has type {} rather than {}", place, value.type_name(), expected),
            origin: value.origin.clone(),
        }
    }

    pub fn as_str(&self) -> Result<&'a str, ConfigError> {
        let value = self.value()?;
        value.as_str().ok_or_else(|| self.wrong_type(value, ValueType::String))
    }

    /// The number here as an integer. Whole floats are accepted.
    pub fn as_i64(&self) -> Result<i64, ConfigError> {
        let value = self.value()?;
        value
            .as_number()
            .and_then(|number| number.as_i64())
            .ok_or_else(|| self.wrong_type(value, ValueType::Number))
    }

    pub fn as_f64(&self) -> Result<f64, ConfigError> {
        let value = self.value()?;
        value
            .as_number()
            .map(|number| number.as_f64())
            .ok_or_else(|| self.wrong_type(value, ValueType::Number))
    }

    pub fn as_bool(&self) -> Result<bool, ConfigError> {
        let value = self.value()?;
        value.as_bool().ok_or_else(|| self.wrong_type(value, ValueType::Boolean))
    }

    pub fn as_list(&self) -> Result<&'a ConfigList, ConfigError> {
        let value = self.value()?;
        value.as_list().ok_or_else(|| self.wrong_type(value, ValueType::List))
    }

    pub fn as_object(&self) -> Result<&'a ConfigObject, ConfigError> {
        let value = self.value()?;
        value.as_object().ok_or_else(|| self.wrong_type(value, ValueType::Object))
    }
}
