//! Object and list containers.

use crate::path::Path;
use crate::types::{ConfigValue, ConfigValueKind};
use indexmap::IndexMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An ordered map of keys to values.
///
/// Key order is kept for display and iteration but does not take part in
/// equality. Whether the object still contains substitutions is computed
/// once, when it is built.
#[derive(Debug, Clone)]
pub struct ConfigObject {
    entries: IndexMap<String, ConfigValue>,
    resolved: bool,
    ignores_fallbacks: bool,
}

impl ConfigObject {
    pub fn new(entries: IndexMap<String, ConfigValue>) -> Self {
        let resolved = entries.values().all(ConfigValue::is_resolved);
        Self {
            entries,
            resolved,
            ignores_fallbacks: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &IndexMap<String, ConfigValue> {
        &self.entries
    }

    pub fn into_entries(self) -> IndexMap<String, ConfigValue> {
        self.entries
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Set once the object has been merged over a non-object: nothing
    /// underneath can contribute keys any more.
    pub fn ignores_fallbacks(&self) -> bool {
        self.ignores_fallbacks
    }

    pub fn with_fallbacks_ignored(self) -> Self {
        self.with_ignores_fallbacks(true)
    }

    pub(crate) fn with_ignores_fallbacks(mut self, ignores_fallbacks: bool) -> Self {
        self.ignores_fallbacks = ignores_fallbacks;
        self
    }

    /// A copy with `key` set to `value`, keeping the position of an
    /// existing key.
    pub fn with_value(self, key: impl Into<String>, value: ConfigValue) -> Self {
        let ignores_fallbacks = self.ignores_fallbacks;
        let mut entries = self.entries;
        entries.insert(key.into(), value);
        Self::new(entries).with_ignores_fallbacks(ignores_fallbacks)
    }

    pub fn without_key(self, key: &str) -> Self {
        let ignores_fallbacks = self.ignores_fallbacks;
        let mut entries = self.entries;
        entries.shift_remove(key);
        Self::new(entries).with_ignores_fallbacks(ignores_fallbacks)
    }

    /// Walk nested objects along `path` without resolving anything.
    pub fn peek_path(&self, path: &Path) -> Option<&ConfigValue> {
        let (first, rest) = path.elements().split_first()?;
        let mut current = self.entries.get(first)?;
        for key in rest {
            current = match &current.value {
                ConfigValueKind::Object(object) => object.entries.get(key)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl Default for ConfigObject {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ConfigObject {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ConfigObject {}

impl Hash for ConfigObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // order-insensitive, to agree with equality
        let combined = self.entries.iter().fold(0u64, |acc, (key, value)| {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            value.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        self.entries.len().hash(state);
        combined.hash(state);
    }
}

/// An ordered sequence of values.
#[derive(Debug, Clone)]
pub struct ConfigList {
    items: Vec<ConfigValue>,
    resolved: bool,
}

impl ConfigList {
    pub fn new(items: Vec<ConfigValue>) -> Self {
        let resolved = items.iter().all(ConfigValue::is_resolved);
        Self { items, resolved }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn items(&self) -> &[ConfigValue] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ConfigValue> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigValue> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<ConfigValue> {
        self.items
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// This list followed by `other`.
    pub fn concat(self, other: ConfigList) -> ConfigList {
        let mut items = self.items;
        items.extend(other.items);
        ConfigList::new(items)
    }
}

impl Default for ConfigList {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ConfigList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ConfigList {}

impl Hash for ConfigList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}
