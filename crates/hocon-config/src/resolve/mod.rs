//! Substitution resolution.
//!
//! Resolution replaces every `${path}` in a tree with the value found at
//! `path`, finishes delayed merges, and joins concatenations, producing a
//! tree with no unresolved values left in it.
//!
//! # Self-references
//!
//! A field may refer to its own path when a lower-priority layer gives it a
//! value: in
//!
//! ```text
//! path = [1, 2]
//! path = ${path} [3]
//! ```
//!
//! the merged `path` is a delayed merge of `${path} [3]` over `[1, 2]`, and
//! `${path}` resolves against `[1, 2]` only. Without such a layer the
//! reference is a cycle.
//!
//! # Example
//!
//! ```
//! use hocon_config::{ConfigValue, Path, ResolveOptions, resolve};
//! use hocon_origin::Origin;
//! use indexmap::IndexMap;
//!
//! let origin = Origin::new_simple("example");
//! let mut entries = IndexMap::new();
//! entries.insert("a".to_string(), ConfigValue::int(5, origin.clone()));
//! entries.insert(
//!     "b".to_string(),
//!     ConfigValue::reference(Path::parse("a").unwrap(), false, origin.clone()),
//! );
//! let root = ConfigValue::object(entries, origin);
//!
//! let resolved = resolve(&root, &ResolveOptions::default()).unwrap();
//! let b = resolved.as_object().unwrap().get("b").unwrap();
//! assert_eq!(b.as_number().and_then(|n| n.as_i64()), Some(5));
//! ```

mod concat;
mod context;
mod source;

pub use context::ResolveOptions;

use crate::error::{ConfigError, render_chain};
use crate::object::{ConfigList, ConfigObject};
use crate::path::Path;
use crate::substitution::{ConfigDelayedMerge, ConfigReference};
use crate::types::{ConfigValue, ConfigValueKind};
use context::ResolveContext;
use hocon_error_reporting::DiagnosticMessage;
use hocon_origin::Origin;
use indexmap::IndexMap;
use source::ResolveSource;

/// Resolve all substitutions in `root`, which must be an object.
///
/// An already resolved tree is returned as it is.
pub fn resolve(root: &ConfigValue, options: &ResolveOptions) -> Result<ConfigValue, ConfigError> {
    let object = root_object(root)?;
    if object.is_resolved() {
        tracing::debug!("configuration is already resolved");
        return Ok(root.clone());
    }

    tracing::debug!(
        keys = object.len(),
        allow_unresolved = options.allow_unresolved,
        "resolving substitutions"
    );
    let mut resolver = Resolver::new(root, options);
    let resolved = resolver.resolve_object(object, &root.origin, Scope::Root)?;
    tracing::debug!(
        memoized = resolver.source.memo_len(),
        memo_hits = resolver.source.memo_hits(),
        "resolution complete"
    );
    Ok(resolved)
}

/// Resolve only what is needed to produce the value at `path`.
///
/// `Ok(None)` means nothing is set there. The rest of the tree is not
/// resolved, and substitutions elsewhere that would fail are not reported.
pub fn resolve_at(
    root: &ConfigValue,
    path: &Path,
    options: &ResolveOptions,
) -> Result<Option<ConfigValue>, ConfigError> {
    root_object(root)?;
    tracing::debug!(path = %path, "resolving single path");
    Resolver::new(root, options).lookup(path)
}

/// Like [`resolve`], but reports a failure as a diagnostic.
pub fn resolve_with_diagnostics(
    root: &ConfigValue,
    options: &ResolveOptions,
    diagnostics: &mut Vec<DiagnosticMessage>,
) -> Option<ConfigValue> {
    match resolve(root, options) {
        Ok(resolved) => Some(resolved),
        Err(error) => {
            tracing::debug!(code = error.code(), "resolution failed");
            diagnostics.push(error.to_diagnostic());
            None
        }
    }
}

fn root_object(root: &ConfigValue) -> Result<&ConfigObject, ConfigError> {
    match &root.value {
        ConfigValueKind::Object(object) => Ok(object),
        _ => Err(ConfigError::WrongType {
            path: None,
            message: format!(
                "the root of a configuration must be an object, not {}",
                root.type_name()
            ),
            origin: root.origin.clone(),
        }),
    }
}

/// Where an object sits, which decides whether its children can be looked
/// up by path.
#[derive(Debug, Clone, Copy)]
enum Scope<'p> {
    Root,
    At(&'p Path),
    /// Inside a list, a concatenation or a merge layer: not addressable.
    Detached,
}

impl Scope<'_> {
    /// The path of child `key`. An empty key has none, so its value is
    /// resolved as if detached.
    fn child(&self, key: &str) -> Option<Path> {
        match self {
            Scope::Root => Path::new_key(key).ok(),
            Scope::At(path) => path.child(key).ok(),
            Scope::Detached => None,
        }
    }
}

pub(crate) struct Resolver<'a> {
    source: ResolveSource<'a>,
    context: ResolveContext<'a>,
}

impl<'a> Resolver<'a> {
    fn new(root: &'a ConfigValue, options: &'a ResolveOptions) -> Self {
        Self {
            source: ResolveSource::new(root),
            context: ResolveContext::new(options),
        }
    }

    /// Resolve `value`, found at `at` when it is addressable.
    ///
    /// `Ok(None)` means the value vanished (an unset optional substitution).
    pub(crate) fn resolve_value(
        &mut self,
        value: &ConfigValue,
        at: Option<&Path>,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        if value.is_resolved() {
            return Ok(Some(value.clone()));
        }
        let Some(path) = at else {
            return self.resolve_kind(value, None);
        };

        let key = self.context.node_key(path);
        if let Some(chain) = self.context.cycle_through(&key) {
            tracing::debug!(chain = %render_chain(&chain), "substitution cycle");
            return Err(ConfigError::CycleDetected {
                chain,
                origin: value.origin.clone(),
            });
        }
        if let Some(result) = self.source.memoized(&key) {
            tracing::trace!(path = %path, "memoized");
            return Ok(result);
        }

        self.context.push_trace(key.clone());
        let result = self.resolve_kind(value, Some(path));
        self.context.pop_trace();

        let result = result?;
        self.source.memoize(key, result.clone());
        Ok(result)
    }

    fn resolve_kind(
        &mut self,
        value: &ConfigValue,
        at: Option<&Path>,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        self.context.enter(at)?;
        let result = match &value.value {
            ConfigValueKind::Object(object) => {
                let scope = at.map_or(Scope::Detached, Scope::At);
                self.resolve_object(object, &value.origin, scope).map(Some)
            }
            ConfigValueKind::List(list) => self.resolve_list(list, &value.origin).map(Some),
            ConfigValueKind::Reference(reference) => self.resolve_reference(reference, value),
            ConfigValueKind::Concatenation(concat) => {
                self.resolve_concatenation(concat, &value.origin, at)
            }
            ConfigValueKind::DelayedMerge(merge)
            | ConfigValueKind::DelayedMergeObject(merge) => self.resolve_delayed_merge(merge, at),
            ConfigValueKind::Null
            | ConfigValueKind::Boolean(_)
            | ConfigValueKind::Number(_)
            | ConfigValueKind::String(_) => Ok(Some(value.clone())),
        };
        self.context.leave();
        result
    }

    fn resolve_object(
        &mut self,
        object: &ConfigObject,
        origin: &Origin,
        scope: Scope<'_>,
    ) -> Result<ConfigValue, ConfigError> {
        if object.is_resolved() {
            return Ok(ConfigValue::from_object(object.clone(), origin.clone()));
        }

        let mut entries = IndexMap::with_capacity(object.len());
        for (key, child) in object.iter() {
            let child_path = scope.child(key);
            if let Some(resolved) = self.resolve_value(child, child_path.as_ref())? {
                entries.insert(key.clone(), resolved);
            }
        }

        let resolved =
            ConfigObject::new(entries).with_ignores_fallbacks(object.ignores_fallbacks());
        Ok(ConfigValue::from_object(resolved, origin.clone()))
    }

    fn resolve_list(
        &mut self,
        list: &ConfigList,
        origin: &Origin,
    ) -> Result<ConfigValue, ConfigError> {
        let mut items = Vec::with_capacity(list.len());
        for item in list.iter() {
            if let Some(resolved) = self.resolve_value(item, None)? {
                items.push(resolved);
            }
        }
        Ok(ConfigValue::list(items, origin.clone()))
    }

    fn resolve_reference(
        &mut self,
        reference: &ConfigReference,
        value: &ConfigValue,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        let expr = reference.expr();
        let found = match self.lookup_reference(reference) {
            Ok(found) => found,
            Err(ConfigError::CycleDetected { chain, .. }) if expr.optional => {
                tracing::debug!(
                    substitution = %expr,
                    chain = %render_chain(&chain),
                    "optional substitution is part of a cycle, treating it as unset"
                );
                return Ok(None);
            }
            Err(error) => return Err(error),
        };

        match found {
            Some(found) => Ok(Some(found)),
            None if expr.optional => {
                tracing::trace!(substitution = %expr, "optional substitution is unset");
                Ok(None)
            }
            None if self.context.options().allow_unresolved => {
                tracing::debug!(substitution = %expr, "leaving undefined substitution in place");
                Ok(Some(value.clone()))
            }
            None => Err(ConfigError::UndefinedSubstitution {
                expr: expr.clone(),
                origin: value.origin.clone(),
                trace: self.context.trace_paths(),
            }),
        }
    }

    fn lookup_reference(
        &mut self,
        reference: &ConfigReference,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        let path = &reference.expr().path;
        let found = self.lookup(path)?;
        if found.is_some() || reference.prefix_length() == 0 {
            return Ok(found);
        }
        match path.subpath(reference.prefix_length()) {
            Some(unprefixed) => {
                tracing::trace!(
                    path = %path,
                    fallback = %unprefixed,
                    "retrying relativized substitution"
                );
                self.lookup(&unprefixed)
            }
            None => Ok(None),
        }
    }

    /// Merge the layers of a delayed merge once each is resolved.
    ///
    /// While an unresolved layer of the merge at `at` is being resolved,
    /// lookups of `at` see only the layers below it.
    fn resolve_delayed_merge(
        &mut self,
        merge: &ConfigDelayedMerge,
        at: Option<&Path>,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        let base = at.and_then(|path| self.context.overlay_skip(path)).unwrap_or(0);
        let mut merged: Option<ConfigValue> = None;

        for (index, layer) in merge.stack().iter().enumerate() {
            if merged.as_ref().is_some_and(ConfigValue::ignores_fallbacks) {
                let skipped = merge.stack().len() - index;
                tracing::trace!(skipped, "remaining layers are hidden");
                break;
            }

            let sees_lower_layers =
                layer.is_unmergeable() || matches!(layer.value, ConfigValueKind::List(_));
            let resolved = match at {
                Some(path) if sees_lower_layers => {
                    self.context.push_overlay(path.clone(), base + index + 1);
                    let resolved = self.resolve_value(layer, None);
                    self.context.pop_overlay();
                    resolved?
                }
                _ => self.resolve_value(layer, None)?,
            };

            if let Some(resolved) = resolved {
                merged = Some(match merged {
                    Some(above) => above.with_fallback(resolved),
                    None => resolved,
                });
            }
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Origin::new_simple("test")
    }

    fn int(i: i64) -> ConfigValue {
        ConfigValue::int(i, origin())
    }

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    fn reference(p: &str) -> ConfigValue {
        ConfigValue::reference(path(p), false, origin())
    }

    fn obj(entries: Vec<(&str, ConfigValue)>) -> ConfigValue {
        let map: IndexMap<String, ConfigValue> =
            entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        ConfigValue::object(map, origin())
    }

    fn get<'v>(value: &'v ConfigValue, p: &str) -> Option<&'v ConfigValue> {
        value.as_object().and_then(|o| o.peek_path(&path(p)))
    }

    #[test]
    fn test_simple_reference() {
        let root = obj(vec![("a", int(5)), ("b", reference("a"))]);
        let resolved = resolve(&root, &ResolveOptions::default()).unwrap();
        assert_eq!(get(&resolved, "b"), Some(&int(5)));
        assert!(resolved.is_resolved());
    }

    #[test]
    fn test_chained_and_nested_references() {
        let root = obj(vec![
            ("a", obj(vec![("b", reference("c.d"))])),
            ("c", obj(vec![("d", reference("e"))])),
            ("e", int(9)),
        ]);
        let resolved = resolve(&root, &ResolveOptions::default()).unwrap();
        assert_eq!(get(&resolved, "a.b"), Some(&int(9)));
        assert_eq!(get(&resolved, "c.d"), Some(&int(9)));
    }

    #[test]
    fn test_reference_to_object_resolves_inside_it() {
        let root = obj(vec![
            ("x", int(1)),
            ("o", obj(vec![("y", reference("x"))])),
            ("copy", reference("o")),
        ]);
        let resolved = resolve(&root, &ResolveOptions::default()).unwrap();
        assert_eq!(get(&resolved, "copy.y"), Some(&int(1)));
    }

    #[test]
    fn test_empty_key_is_resolved_without_path() {
        let root = obj(vec![("", obj(vec![("b", reference("a"))])), ("a", int(1))]);
        let resolved = resolve(&root, &ResolveOptions::default()).unwrap();
        let empty = resolved.as_object().and_then(|o| o.get("")).unwrap();
        assert_eq!(empty.as_object().and_then(|o| o.get("b")), Some(&int(1)));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = resolve(&int(1), &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::WrongType { .. }));
    }

    #[test]
    fn test_already_resolved_is_unchanged() {
        let root = obj(vec![("a", int(1))]);
        assert_eq!(resolve(&root, &ResolveOptions::default()).unwrap(), root);
    }

    #[test]
    fn test_self_reference_cycle() {
        let root = obj(vec![("a", reference("a"))]);
        let err = resolve(&root, &ResolveOptions::default()).unwrap_err();
        match err {
            ConfigError::CycleDetected { chain, .. } => {
                assert_eq!(chain, vec![path("a"), path("a")])
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_delayed_merge_sees_lower_layer() {
        let merged = reference("a").with_fallback(int(3));
        let root = obj(vec![("a", merged)]);
        let resolved = resolve(&root, &ResolveOptions::default()).unwrap();
        assert_eq!(get(&resolved, "a"), Some(&int(3)));
    }

    #[test]
    fn test_nesting_limit() {
        let root = obj(vec![
            ("a", obj(vec![("b", obj(vec![("c", reference("x"))]))])),
            ("x", int(1)),
        ]);
        let options = ResolveOptions::new().with_max_depth(2);
        let err = resolve(&root, &options).unwrap_err();
        assert!(matches!(err, ConfigError::NestingTooDeep { max_depth: 2, .. }));

        assert!(resolve(&root, &ResolveOptions::default()).is_ok());
    }

    #[test]
    fn test_shared_target_is_resolved_once() {
        // k0 = x, k1 = ${k0}${k0}, ..., k20 = ${k19}${k19}
        let mut entries = vec![("k0".to_string(), ConfigValue::string("x", origin()))];
        for i in 1..=20 {
            let previous = format!("k{}", i - 1);
            let pieces = vec![reference(&previous), reference(&previous)];
            let concat = ConfigValue::concatenation(pieces, origin()).unwrap();
            entries.push((format!("k{}", i), concat));
        }
        let root = ConfigValue::object(entries.into_iter().collect(), origin());
        let object = root.as_object().unwrap();

        let options = ResolveOptions::default();
        let mut resolver = Resolver::new(&root, &options);
        let resolved = resolver.resolve_object(object, &root.origin, Scope::Root).unwrap();

        // every k1..k19 is computed once and then read back by both
        // references of the next key
        assert_eq!(resolver.source.memo_len(), 20);
        assert_eq!(resolver.source.memo_hits(), 38);
        let k20 = get(&resolved, "k20").and_then(ConfigValue::as_str).unwrap();
        assert_eq!(k20.len(), 1 << 20);
    }

    #[test]
    fn test_resolve_with_diagnostics() {
        let root = obj(vec![("a", reference("missing"))]);
        let mut diagnostics = Vec::new();
        let options = ResolveOptions::default();
        assert!(resolve_with_diagnostics(&root, &options, &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some("H-1-1"));
    }
}
