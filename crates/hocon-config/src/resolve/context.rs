//! Per-pass resolution state: options, the trace of paths being resolved,
//! and the overlays that make self-references see earlier layers.

use crate::error::ConfigError;
use crate::path::Path;

/// Options controlling a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Leave undefined required substitutions in place instead of failing.
    pub allow_unresolved: bool,

    /// Maximum nesting depth before failing with
    /// [`ConfigError::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            allow_unresolved: false,
            max_depth: 256,
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_unresolved(mut self, allow_unresolved: bool) -> Self {
        self.allow_unresolved = allow_unresolved;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// While layer `skip - 1` of the delayed merge at `path` is being resolved,
/// lookups of `path` only see the layers from `skip` on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Overlay {
    pub path: Path,
    pub skip: usize,
}

/// Identity of a node during resolution.
///
/// The same path seen through different overlays is a different value, so
/// both the cycle trace and the memo are keyed on the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    pub path: Path,
    pub overlays: Vec<Overlay>,
}

#[derive(Debug)]
pub(crate) struct ResolveContext<'a> {
    options: &'a ResolveOptions,
    trace: Vec<NodeKey>,
    overlays: Vec<Overlay>,
    restriction: Option<Path>,
    depth: usize,
}

impl<'a> ResolveContext<'a> {
    pub fn new(options: &'a ResolveOptions) -> Self {
        Self {
            options,
            trace: Vec::new(),
            overlays: Vec::new(),
            restriction: None,
            depth: 0,
        }
    }

    pub fn options(&self) -> &'a ResolveOptions {
        self.options
    }

    pub fn node_key(&self, path: &Path) -> NodeKey {
        NodeKey {
            path: path.clone(),
            overlays: self.overlays.clone(),
        }
    }

    /// If `key` is already being resolved, the cycle it closes.
    pub fn cycle_through(&self, key: &NodeKey) -> Option<Vec<Path>> {
        let start = self.trace.iter().position(|entry| entry == key)?;
        let mut chain: Vec<Path> =
            self.trace[start..].iter().map(|entry| entry.path.clone()).collect();
        chain.push(key.path.clone());
        Some(chain)
    }

    pub fn push_trace(&mut self, key: NodeKey) {
        self.trace.push(key);
    }

    pub fn pop_trace(&mut self) {
        self.trace.pop();
    }

    pub fn trace_paths(&self) -> Vec<Path> {
        self.trace.iter().map(|entry| entry.path.clone()).collect()
    }

    /// The innermost overlay for `path`.
    pub fn overlay_skip(&self, path: &Path) -> Option<usize> {
        self.overlays
            .iter()
            .rev()
            .find(|overlay| &overlay.path == path)
            .map(|overlay| overlay.skip)
    }

    pub fn push_overlay(&mut self, path: Path, skip: usize) {
        self.overlays.push(Overlay { path, skip });
    }

    pub fn pop_overlay(&mut self) {
        self.overlays.pop();
    }

    /// Restrict the pass to a lookup of `path`, returning the previous
    /// restriction so it can be put back.
    pub fn restrict(&mut self, path: Option<Path>) -> Option<Path> {
        std::mem::replace(&mut self.restriction, path)
    }

    pub fn restriction(&self) -> Option<&Path> {
        self.restriction.as_ref()
    }

    /// Enter one level of nesting; pair every successful call with
    /// [`ResolveContext::leave`].
    pub fn enter(&mut self, at: Option<&Path>) -> Result<(), ConfigError> {
        if self.depth >= self.options.max_depth {
            return Err(ConfigError::NestingTooDeep {
                max_depth: self.options.max_depth,
                path: at.or(self.restriction()).cloned(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
