//! Core type definitions for configuration values.

use crate::number::ConfigNumber;
use crate::object::{ConfigList, ConfigObject};
use crate::path::Path;
use crate::substitution::{
    ConfigConcatenation, ConfigDelayedMerge, ConfigReference, SubstitutionExpression,
};
use hocon_origin::Origin;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The type of a concrete configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Object,
    List,
    Number,
    Boolean,
    Null,
    String,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Object => "object",
            ValueType::List => "list",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
            ValueType::String => "string",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A string value.
///
/// Unquoted strings matter only for concatenation: unquoted whitespace
/// between objects or lists is dropped.
#[derive(Debug, Clone)]
pub struct ConfigString {
    pub value: String,
    pub quoted: bool,
}

impl ConfigString {
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }

    pub fn unquoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    pub(crate) fn is_ignorable_whitespace(&self) -> bool {
        !self.quoted && self.value.chars().all(char::is_whitespace)
    }
}

impl PartialEq for ConfigString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ConfigString {}

impl Hash for ConfigString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

/// A configuration value together with where it came from.
///
/// Equality and hashing look only at the value; origins never affect them.
#[derive(Debug, Clone)]
pub struct ConfigValue {
    /// The underlying value
    pub value: ConfigValueKind,

    /// Where this value was defined
    pub origin: Origin,
}

/// The kind of configuration value.
///
/// The last four variants are *unmergeable*: they stand for values that are
/// only known after substitutions are resolved, so merging into them is
/// deferred until then.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigValueKind {
    Null,
    Boolean(bool),
    Number(ConfigNumber),
    String(ConfigString),
    Object(ConfigObject),
    List(ConfigList),

    /// A `${path}` or `${?path}` substitution.
    Reference(ConfigReference),

    /// Adjacent pieces (`${a} ${b}`, `"x" ${y}`) joined after resolution.
    Concatenation(ConfigConcatenation),

    /// A stack of layers, highest priority first, whose top is not an object.
    DelayedMerge(ConfigDelayedMerge),

    /// A stack of layers whose top is an object, so it is known to resolve
    /// to an object.
    DelayedMergeObject(ConfigDelayedMerge),
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ConfigValue {}

impl Hash for ConfigValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl ConfigValue {
    pub fn new(value: ConfigValueKind, origin: Origin) -> Self {
        Self { value, origin }
    }

    pub fn null(origin: Origin) -> Self {
        Self::new(ConfigValueKind::Null, origin)
    }

    pub fn boolean(value: bool, origin: Origin) -> Self {
        Self::new(ConfigValueKind::Boolean(value), origin)
    }

    pub fn int(value: i64, origin: Origin) -> Self {
        Self::new(ConfigValueKind::Number(ConfigNumber::from_i64(value, None)), origin)
    }

    pub fn float(value: f64, origin: Origin) -> Self {
        Self::new(ConfigValueKind::Number(ConfigNumber::from_f64(value, None)), origin)
    }

    /// A number in its narrowest representation, remembering its source text.
    pub fn number(value: f64, original_text: Option<String>, origin: Origin) -> Self {
        Self::new(
            ConfigValueKind::Number(ConfigNumber::new_number(value, original_text)),
            origin,
        )
    }

    /// A quoted string.
    pub fn string(value: impl Into<String>, origin: Origin) -> Self {
        Self::new(ConfigValueKind::String(ConfigString::quoted(value)), origin)
    }

    pub fn unquoted_string(value: impl Into<String>, origin: Origin) -> Self {
        Self::new(ConfigValueKind::String(ConfigString::unquoted(value)), origin)
    }

    pub fn object(entries: IndexMap<String, ConfigValue>, origin: Origin) -> Self {
        Self::from_object(ConfigObject::new(entries), origin)
    }

    pub fn from_object(object: ConfigObject, origin: Origin) -> Self {
        Self::new(ConfigValueKind::Object(object), origin)
    }

    pub fn list(items: Vec<ConfigValue>, origin: Origin) -> Self {
        Self::new(ConfigValueKind::List(ConfigList::new(items)), origin)
    }

    pub fn reference(path: Path, optional: bool, origin: Origin) -> Self {
        let expr = SubstitutionExpression::new(path, optional);
        Self::new(ConfigValueKind::Reference(ConfigReference::new(expr)), origin)
    }

    /// Join pieces into a concatenation.
    ///
    /// Nested concatenations are flattened, a single piece is returned as it
    /// is, and no pieces at all give `None`.
    pub fn concatenation(pieces: Vec<ConfigValue>, origin: Origin) -> Option<ConfigValue> {
        let mut concat = ConfigConcatenation::new(pieces);
        match concat.pieces().len() {
            0 => None,
            1 => concat.take_pieces().pop(),
            _ => Some(Self::new(ConfigValueKind::Concatenation(concat), origin)),
        }
    }

    /// Stack layers, highest priority first, into a delayed merge.
    ///
    /// Nested stacks are flattened and a single layer is returned as it is.
    /// The result is a [`ConfigValueKind::DelayedMergeObject`] when the top
    /// layer is an object.
    pub fn delayed_merge(stack: Vec<ConfigValue>, origin: Origin) -> Option<ConfigValue> {
        let mut merge = ConfigDelayedMerge::new(stack);
        let top_is_object = match merge.stack().first() {
            None => return None,
            Some(top) => matches!(top.value, ConfigValueKind::Object(_)),
        };
        if merge.stack().len() == 1 {
            return merge.take_stack().pop();
        }
        let value = if top_is_object {
            ConfigValueKind::DelayedMergeObject(merge)
        } else {
            ConfigValueKind::DelayedMerge(merge)
        };
        Some(Self::new(value, origin))
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// The concrete type, or `None` for values that still need resolving.
    pub fn value_type(&self) -> Option<ValueType> {
        match &self.value {
            ConfigValueKind::Null => Some(ValueType::Null),
            ConfigValueKind::Boolean(_) => Some(ValueType::Boolean),
            ConfigValueKind::Number(_) => Some(ValueType::Number),
            ConfigValueKind::String(_) => Some(ValueType::String),
            ConfigValueKind::Object(_) => Some(ValueType::Object),
            ConfigValueKind::List(_) => Some(ValueType::List),
            ConfigValueKind::Reference(_)
            | ConfigValueKind::Concatenation(_)
            | ConfigValueKind::DelayedMerge(_)
            | ConfigValueKind::DelayedMergeObject(_) => None,
        }
    }

    /// Short name of the value's kind, for messages.
    pub fn type_name(&self) -> &'static str {
        match &self.value {
            ConfigValueKind::Reference(_) => "substitution",
            ConfigValueKind::Concatenation(_) => "concatenation",
            ConfigValueKind::DelayedMerge(_) => "delayed merge",
            ConfigValueKind::DelayedMergeObject(_) => "delayed object merge",
            _ => self.value_type().map_or("value", ValueType::name),
        }
    }

    /// Whether no substitutions remain anywhere in this value.
    pub fn is_resolved(&self) -> bool {
        match &self.value {
            ConfigValueKind::Null
            | ConfigValueKind::Boolean(_)
            | ConfigValueKind::Number(_)
            | ConfigValueKind::String(_) => true,
            ConfigValueKind::Object(object) => object.is_resolved(),
            ConfigValueKind::List(list) => list.is_resolved(),
            ConfigValueKind::Reference(_)
            | ConfigValueKind::Concatenation(_)
            | ConfigValueKind::DelayedMerge(_)
            | ConfigValueKind::DelayedMergeObject(_) => false,
        }
    }

    /// Whether merging into this value has to wait for resolution.
    pub fn is_unmergeable(&self) -> bool {
        matches!(
            self.value,
            ConfigValueKind::Reference(_)
                | ConfigValueKind::Concatenation(_)
                | ConfigValueKind::DelayedMerge(_)
                | ConfigValueKind::DelayedMergeObject(_)
        )
    }

    /// Whether lower-priority layers can no longer affect this value.
    pub fn ignores_fallbacks(&self) -> bool {
        match &self.value {
            ConfigValueKind::Null
            | ConfigValueKind::Boolean(_)
            | ConfigValueKind::Number(_)
            | ConfigValueKind::String(_) => true,
            ConfigValueKind::Object(object) => object.ignores_fallbacks(),
            ConfigValueKind::List(list) => list.is_resolved(),
            ConfigValueKind::Reference(_) | ConfigValueKind::Concatenation(_) => false,
            ConfigValueKind::DelayedMerge(merge) | ConfigValueKind::DelayedMergeObject(merge) => {
                merge.stack().last().is_some_and(ConfigValue::ignores_fallbacks)
            }
        }
    }

    /// Rewrite every reference inside this value as if the value were
    /// moved under `prefix`.
    ///
    /// A reference `${a}` relativized to `x.y` looks up `x.y.a`, falling back
    /// to `a` when that is not set.
    pub fn relativized(&self, prefix: &Path) -> ConfigValue {
        let value = match &self.value {
            ConfigValueKind::Object(object) => ConfigValueKind::Object(
                ConfigObject::new(
                    object
                        .iter()
                        .map(|(key, child)| (key.clone(), child.relativized(prefix)))
                        .collect(),
                )
                .with_ignores_fallbacks(object.ignores_fallbacks()),
            ),
            ConfigValueKind::List(list) => ConfigValueKind::List(ConfigList::new(
                list.iter().map(|item| item.relativized(prefix)).collect(),
            )),
            ConfigValueKind::Reference(reference) => {
                ConfigValueKind::Reference(reference.relativized(prefix))
            }
            ConfigValueKind::Concatenation(concat) => {
                ConfigValueKind::Concatenation(ConfigConcatenation::new(
                    concat.pieces().iter().map(|piece| piece.relativized(prefix)).collect(),
                ))
            }
            ConfigValueKind::DelayedMerge(merge) => {
                ConfigValueKind::DelayedMerge(ConfigDelayedMerge::new(
                    merge.stack().iter().map(|layer| layer.relativized(prefix)).collect(),
                ))
            }
            ConfigValueKind::DelayedMergeObject(merge) => {
                ConfigValueKind::DelayedMergeObject(ConfigDelayedMerge::new(
                    merge.stack().iter().map(|layer| layer.relativized(prefix)).collect(),
                ))
            }
            scalar => scalar.clone(),
        };
        ConfigValue::new(value, self.origin.clone())
    }

    /// Text of a scalar when concatenated into a string.
    pub fn transform_to_string(&self) -> Option<String> {
        match &self.value {
            ConfigValueKind::Null => Some("null".to_string()),
            ConfigValueKind::Boolean(value) => Some(value.to_string()),
            ConfigValueKind::Number(number) => Some(number.transform_to_string()),
            ConfigValueKind::String(string) => Some(string.value.clone()),
            _ => None,
        }
    }

    pub(crate) fn is_ignorable_whitespace(&self) -> bool {
        matches!(&self.value, ConfigValueKind::String(s) if s.is_ignorable_whitespace())
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, ConfigValueKind::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            ConfigValueKind::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&ConfigNumber> {
        match &self.value {
            ConfigValueKind::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            ConfigValueKind::String(string) => Some(&string.value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ConfigObject> {
        match &self.value {
            ConfigValueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ConfigList> {
        match &self.value {
            ConfigValueKind::List(list) => Some(list),
            _ => None,
        }
    }
}
