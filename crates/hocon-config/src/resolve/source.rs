//! Looking up substitution targets from the root of the tree.
//!
//! A lookup walks from the root one key at a time. Unresolved containers on
//! the way are peeked at first, and resolved only when the key cannot be
//! found without doing so. Overlays for a prefix replace the value there by
//! the layers below the one currently being resolved.

use super::Resolver;
use super::context::NodeKey;
use crate::error::ConfigError;
use crate::path::Path;
use crate::substitution::ConfigDelayedMerge;
use crate::types::{ConfigValue, ConfigValueKind};
use hocon_origin::Origin;
use std::borrow::Cow;
use std::collections::HashMap;

/// The tree being resolved, plus results already computed for it.
#[derive(Debug)]
pub(crate) struct ResolveSource<'a> {
    root: &'a ConfigValue,
    memo: HashMap<NodeKey, Option<ConfigValue>>,
    hits: usize,
}

impl<'a> ResolveSource<'a> {
    pub fn new(root: &'a ConfigValue) -> Self {
        Self {
            root,
            memo: HashMap::new(),
            hits: 0,
        }
    }

    pub fn root(&self) -> &'a ConfigValue {
        self.root
    }

    /// The result already computed for `key`, counting the hit.
    pub fn memoized(&mut self, key: &NodeKey) -> Option<Option<ConfigValue>> {
        let found = self.memo.get(key).cloned();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    pub fn memoize(&mut self, key: NodeKey, result: Option<ConfigValue>) {
        self.memo.insert(key, result);
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn memo_hits(&self) -> usize {
        self.hits
    }
}

enum Peek<T> {
    Found(T),
    NotFound,
    /// The container has to be resolved before the key can be looked up.
    NeedsResolve,
}

impl<T> Peek<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Peek<U> {
        match self {
            Peek::Found(value) => Peek::Found(f(value)),
            Peek::NotFound => Peek::NotFound,
            Peek::NeedsResolve => Peek::NeedsResolve,
        }
    }
}

fn peek_child<'v>(value: &'v ConfigValue, key: &str) -> Peek<&'v ConfigValue> {
    match &value.value {
        ConfigValueKind::Object(object) => object.get(key).map_or(Peek::NotFound, Peek::Found),
        ConfigValueKind::Reference(_)
        | ConfigValueKind::Concatenation(_)
        | ConfigValueKind::DelayedMerge(_)
        | ConfigValueKind::DelayedMergeObject(_) => Peek::NeedsResolve,
        _ => Peek::NotFound,
    }
}

fn peek_cow<'a>(node: &Cow<'a, ConfigValue>, key: &str) -> Peek<Cow<'a, ConfigValue>> {
    match node {
        Cow::Borrowed(value) => {
            let value: &'a ConfigValue = *value;
            peek_child(value, key).map(Cow::Borrowed)
        }
        Cow::Owned(value) => peek_child(value, key).map(|child| Cow::Owned(child.clone())),
    }
}

/// The layers of `value` from `skip` on. A plain value is a single layer.
fn remainder(value: &ConfigValue, skip: usize) -> Option<ConfigValue> {
    match &value.value {
        ConfigValueKind::DelayedMerge(merge) | ConfigValueKind::DelayedMergeObject(merge) => {
            let rest: Vec<ConfigValue> = merge.stack().iter().skip(skip).cloned().collect();
            let origin = Origin::merge_origins(rest.iter().map(|layer| &layer.origin));
            ConfigValue::delayed_merge(rest, origin)
        }
        _ if skip == 0 => Some(value.clone()),
        _ => None,
    }
}

impl<'a> Resolver<'a> {
    /// Resolve the value at `target`, as seen from the root.
    ///
    /// `Ok(None)` means nothing is set there.
    pub(crate) fn lookup(&mut self, target: &Path) -> Result<Option<ConfigValue>, ConfigError> {
        let previous = self.context.restrict(Some(target.clone()));
        let result = self.walk(target);
        self.context.restrict(previous);
        result
    }

    fn walk(&mut self, target: &Path) -> Result<Option<ConfigValue>, ConfigError> {
        let elements = target.elements();
        let mut node: Cow<'a, ConfigValue> = Cow::Borrowed(self.source.root());

        for (depth, key) in elements.iter().enumerate() {
            let child = match self.child_of(&node, target, depth, key)? {
                Some(child) => child,
                None => return Ok(None),
            };

            let here = target.prefix(depth + 1);
            let child = match self.context.overlay_skip(&here) {
                Some(skip) => match remainder(&child, skip) {
                    Some(rest) => Cow::Owned(rest),
                    None => return Ok(None),
                },
                None => child,
            };

            if depth + 1 == elements.len() {
                return self.resolve_value(&child, Some(&here));
            }
            node = child;
        }

        Ok(None)
    }

    /// The unresolved child `key` of `node`, which sits at the first `depth`
    /// elements of `target`.
    fn child_of(
        &mut self,
        node: &Cow<'a, ConfigValue>,
        target: &Path,
        depth: usize,
        key: &str,
    ) -> Result<Option<Cow<'a, ConfigValue>>, ConfigError> {
        match peek_cow(node, key) {
            Peek::Found(child) => return Ok(Some(child)),
            Peek::NotFound => return Ok(None),
            Peek::NeedsResolve => {}
        }
        // the root is always an object, so depth > 0 here
        if depth == 0 {
            return Ok(None);
        }

        let node_path = target.prefix(depth);
        if let ConfigValueKind::DelayedMergeObject(merge) = &node.value {
            return Ok(self.merged_child(merge, &node_path, key)?.map(Cow::Owned));
        }

        tracing::trace!(path = %node_path, key = %key, "resolving container to look up key");
        let Some(resolved) = self.resolve_value(node, Some(&node_path))? else {
            return Ok(None);
        };
        Ok(match peek_child(&resolved, key) {
            Peek::Found(child) => Some(Cow::Owned(child.clone())),
            Peek::NotFound | Peek::NeedsResolve => None,
        })
    }

    /// The value `key` takes in the delayed object merge at `at`.
    ///
    /// Only the layers that cannot be looked into are resolved, so siblings
    /// of `key` are left alone. Layers below one whose `key` ignores
    /// fallbacks are never touched.
    fn merged_child(
        &mut self,
        merge: &ConfigDelayedMerge,
        at: &Path,
        key: &str,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        let base = self.context.overlay_skip(at).unwrap_or(0);
        let mut layers = Vec::new();

        for (index, layer) in merge.stack().iter().enumerate() {
            let layer: Cow<'_, ConfigValue> = if layer.is_unmergeable() {
                tracing::trace!(
                    path = %at,
                    key = %key,
                    layer = index,
                    "resolving layer to look up key"
                );
                self.context.push_overlay(at.clone(), base + index + 1);
                let resolved = self.resolve_value(layer, None);
                self.context.pop_overlay();
                match resolved? {
                    Some(resolved) => Cow::Owned(resolved),
                    None => continue,
                }
            } else {
                Cow::Borrowed(layer)
            };

            let ConfigValueKind::Object(object) = &layer.value else {
                // hidden by the objects above it
                break;
            };
            if let Some(child) = object.get(key) {
                layers.push(child.clone());
                if child.ignores_fallbacks() {
                    break;
                }
            }
            if object.ignores_fallbacks() {
                break;
            }
        }

        Ok(layers.into_iter().reduce(ConfigValue::with_fallback))
    }
}
