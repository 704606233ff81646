//! Conversion between JSON and `ConfigValue`.
//!
//! JSON is a subset of HOCON, so any JSON document converts to a resolved
//! configuration tree. Going the other way requires a resolved tree.

use crate::error::ConfigError;
use crate::number::{ConfigNumber, NumberValue};
use crate::path::Path;
use crate::types::{ConfigValue, ConfigValueKind};
use hocon_origin::Origin;
use serde_json::{Map, Number, Value};

/// Convert a JSON value to a `ConfigValue`.
///
/// Every value gets `origin`. Numbers keep their JSON text for string
/// concatenation; strings are quoted.
pub fn config_value_from_json(json: &Value, origin: &Origin) -> ConfigValue {
    match json {
        Value::Null => ConfigValue::null(origin.clone()),
        Value::Bool(b) => ConfigValue::boolean(*b, origin.clone()),
        Value::Number(n) => number_from_json(n, origin),
        Value::String(s) => ConfigValue::string(s.clone(), origin.clone()),
        Value::Array(items) => ConfigValue::list(
            items.iter().map(|item| config_value_from_json(item, origin)).collect(),
            origin.clone(),
        ),
        Value::Object(map) => ConfigValue::object(
            map.iter()
                .map(|(key, value)| (key.clone(), config_value_from_json(value, origin)))
                .collect(),
            origin.clone(),
        ),
    }
}

fn number_from_json(n: &Number, origin: &Origin) -> ConfigValue {
    let text = Some(n.to_string());
    match n.as_i64() {
        Some(int) => ConfigValue::new(
            ConfigValueKind::Number(ConfigNumber::from_i64(int, text)),
            origin.clone(),
        ),
        None => ConfigValue::number(n.as_f64().unwrap_or(f64::NAN), text, origin.clone()),
    }
}

impl ConfigValue {
    /// Convert a resolved value to JSON.
    ///
    /// Fails with [`ConfigError::NotResolved`] if any substitution remains.
    /// Non-finite floats become `null`.
    pub fn to_json(&self) -> Result<Value, ConfigError> {
        to_json_at(self, None)
    }
}

fn to_json_at(value: &ConfigValue, path: Option<&Path>) -> Result<Value, ConfigError> {
    match &value.value {
        ConfigValueKind::Null => Ok(Value::Null),
        ConfigValueKind::Boolean(b) => Ok(Value::Bool(*b)),
        ConfigValueKind::Number(n) => Ok(match n.value() {
            NumberValue::Int(int) => Value::from(int),
            NumberValue::Float(float) => Number::from_f64(float).map_or(Value::Null, Value::Number),
        }),
        ConfigValueKind::String(s) => Ok(Value::String(s.value.clone())),
        ConfigValueKind::List(list) => list
            .iter()
            .map(|item| to_json_at(item, path))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        ConfigValueKind::Object(object) => {
            let mut map = Map::new();
            for (key, child) in object.iter() {
                let child_path = match path {
                    Some(path) => path.child(key.as_str()),
                    None => Path::new_key(key.as_str()),
                };
                map.insert(key.clone(), to_json_at(child, child_path.ok().as_ref())?);
            }
            Ok(Value::Object(map))
        }
        ConfigValueKind::Reference(_)
        | ConfigValueKind::Concatenation(_)
        | ConfigValueKind::DelayedMerge(_)
        | ConfigValueKind::DelayedMergeObject(_) => Err(ConfigError::NotResolved {
            path: path.cloned(),
            origin: value.origin.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let origin = Origin::new_file("app.json");
        let value = config_value_from_json(
            &json!({"name": "svc", "port": 8080, "ratio": 0.5, "tags": ["a"], "extra": null}),
            &origin,
        );

        let object = value.as_object().unwrap();
        assert_eq!(object.get("name").and_then(ConfigValue::as_str), Some("svc"));
        let port = object.get("port").and_then(ConfigValue::as_number).unwrap();
        assert_eq!(port.as_i64(), Some(8080));
        assert_eq!(port.original_text(), Some("8080"));
        assert!(object.get("extra").unwrap().is_null());
        assert_eq!(object.get("tags").and_then(ConfigValue::as_list).map(|l| l.len()), Some(1));
        assert_eq!(object.get("ratio").unwrap().origin, origin);
        assert!(value.is_resolved());
    }

    #[test]
    fn test_to_json() {
        let source = json!({"a": {"b": [1, 2.5, "x", true, null]}});
        let value = config_value_from_json(&source, &Origin::default());
        assert_eq!(value.to_json().unwrap(), source);
    }

    #[test]
    fn test_to_json_requires_resolution() {
        let origin = Origin::new_simple("test");
        let inner = ConfigValue::reference(Path::parse("x").unwrap(), false, origin.clone());
        let mut entries = indexmap::IndexMap::new();
        entries.insert("a".to_string(), inner);
        let value = ConfigValue::object(entries, origin);

        match value.to_json().unwrap_err() {
            ConfigError::NotResolved { path, .. } => {
                assert_eq!(path, Some(Path::parse("a").unwrap()))
            }
            other => panic!("expected NotResolved, got {:?}", other),
        }
    }
}
