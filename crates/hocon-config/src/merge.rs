//! Fallback merging.
//!
//! `a.with_fallback(b)` combines two values with `a` taking priority:
//!
//! - Values that ignore fallbacks (scalars, resolved lists, objects that
//!   were already merged over a non-object) win outright.
//! - Two objects merge key by key, recursively.
//! - An object over a concrete non-object hides it.
//! - Anything involving an unresolved value is kept as a delayed merge,
//!   to be finished during resolution.
//!
//! Merging never fails and never resolves substitutions.

use crate::object::ConfigObject;
use crate::path::Path;
use crate::types::{ConfigValue, ConfigValueKind};
use hocon_origin::Origin;
use indexmap::IndexMap;

/// Merge layers given highest priority first.
///
/// Returns `None` when there are no layers. `path` is only used for logging.
pub fn merge<I>(path: Option<&Path>, layers: I) -> Option<ConfigValue>
where
    I: IntoIterator<Item = ConfigValue>,
{
    let mut layers = layers.into_iter();
    let first = layers.next()?;
    let merged = layers.fold(first, ConfigValue::with_fallback);

    if let Some(path) = path {
        tracing::trace!(path = %path, kind = merged.type_name(), "merged layers");
    }
    Some(merged)
}

impl ConfigValue {
    /// Merge `fallback` underneath this value.
    pub fn with_fallback(self, fallback: ConfigValue) -> ConfigValue {
        if self.ignores_fallbacks() {
            return self;
        }

        match self.value {
            ConfigValueKind::Object(object) => merge_object(object, self.origin, fallback),
            ConfigValueKind::DelayedMerge(stack) | ConfigValueKind::DelayedMergeObject(stack) => {
                delay(stack.into_stack(), fallback)
            }
            // references, concatenations and unresolved lists
            value => delay(vec![ConfigValue::new(value, self.origin)], fallback),
        }
    }
}

fn merge_object(object: ConfigObject, origin: Origin, fallback: ConfigValue) -> ConfigValue {
    match fallback.value {
        ConfigValueKind::Object(other) => merge_objects(object, origin, other, fallback.origin),
        value => {
            let fallback = ConfigValue::new(value, fallback.origin);
            if fallback.is_unmergeable() {
                delay(vec![ConfigValue::from_object(object, origin)], fallback)
            } else {
                ConfigValue::from_object(object.with_fallbacks_ignored(), origin)
            }
        }
    }
}

fn merge_objects(
    top: ConfigObject,
    top_origin: Origin,
    fallback: ConfigObject,
    fallback_origin: Origin,
) -> ConfigValue {
    let ignores_fallbacks = fallback.ignores_fallbacks();
    let mut under = fallback.into_entries();
    let mut entries = IndexMap::with_capacity(top.len() + under.len());

    for (key, value) in top.into_entries() {
        let merged = match under.shift_remove(&key) {
            Some(lower) => value.with_fallback(lower),
            None => value,
        };
        entries.insert(key, merged);
    }
    entries.extend(under);

    let origin = Origin::merge_origins([&top_origin, &fallback_origin]);
    ConfigValue::from_object(
        ConfigObject::new(entries).with_ignores_fallbacks(ignores_fallbacks),
        origin,
    )
}

fn delay(mut stack: Vec<ConfigValue>, fallback: ConfigValue) -> ConfigValue {
    stack.push(fallback);
    let origin = Origin::merge_origins(stack.iter().map(|layer| &layer.origin));
    match ConfigValue::delayed_merge(stack, origin) {
        Some(merged) => merged,
        // the stack holds at least the fallback
        None => ConfigValue::null(Origin::default()),
    }
}
