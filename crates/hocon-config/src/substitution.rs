//! Values that stand in for something only known after resolution.

use crate::path::Path;
use crate::types::{ConfigValue, ConfigValueKind};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The `${path}` or `${?path}` written in a substitution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubstitutionExpression {
    pub path: Path,
    /// `${?path}`: an unset target makes the substitution vanish instead of
    /// failing.
    pub optional: bool,
}

impl SubstitutionExpression {
    pub fn new(path: Path, optional: bool) -> Self {
        Self { path, optional }
    }

    pub fn with_path(&self, path: Path) -> Self {
        Self {
            path,
            optional: self.optional,
        }
    }
}

impl fmt::Display for SubstitutionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "${{?{}}}", self.path)
        } else {
            write!(f, "${{{}}}", self.path)
        }
    }
}

/// A substitution in value position.
///
/// `prefix_length` counts the leading elements of the path that were added
/// by [`ConfigValue::relativized`]; when the full path is unset the
/// reference retries without them.
#[derive(Debug, Clone)]
pub struct ConfigReference {
    expr: SubstitutionExpression,
    prefix_length: usize,
}

impl ConfigReference {
    pub fn new(expr: SubstitutionExpression) -> Self {
        Self {
            expr,
            prefix_length: 0,
        }
    }

    pub fn expr(&self) -> &SubstitutionExpression {
        &self.expr
    }

    pub fn prefix_length(&self) -> usize {
        self.prefix_length
    }

    pub fn relativized(&self, prefix: &Path) -> Self {
        Self {
            expr: self.expr.with_path(self.expr.path.prepend(prefix)),
            prefix_length: self.prefix_length + prefix.length(),
        }
    }
}

impl PartialEq for ConfigReference {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl Eq for ConfigReference {}

impl Hash for ConfigReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expr.hash(state);
    }
}

impl fmt::Display for ConfigReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

/// Adjacent values joined into one after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigConcatenation {
    pieces: Vec<ConfigValue>,
}

impl ConfigConcatenation {
    /// Build from pieces, splicing nested concatenations in place.
    pub fn new(pieces: Vec<ConfigValue>) -> Self {
        let mut flat = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece.value {
                ConfigValueKind::Concatenation(inner) => flat.extend(inner.pieces),
                _ => flat.push(piece),
            }
        }
        Self { pieces: flat }
    }

    pub fn pieces(&self) -> &[ConfigValue] {
        &self.pieces
    }

    pub(crate) fn take_pieces(&mut self) -> Vec<ConfigValue> {
        std::mem::take(&mut self.pieces)
    }
}

/// Layers waiting to be merged once resolved, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigDelayedMerge {
    stack: Vec<ConfigValue>,
}

impl ConfigDelayedMerge {
    /// Build from layers, splicing nested stacks in place.
    pub fn new(stack: Vec<ConfigValue>) -> Self {
        let mut flat = Vec::with_capacity(stack.len());
        for layer in stack {
            match layer.value {
                ConfigValueKind::DelayedMerge(inner)
                | ConfigValueKind::DelayedMergeObject(inner) => flat.extend(inner.stack),
                _ => flat.push(layer),
            }
        }
        Self { stack: flat }
    }

    pub fn stack(&self) -> &[ConfigValue] {
        &self.stack
    }

    pub fn into_stack(self) -> Vec<ConfigValue> {
        self.stack
    }

    pub(crate) fn take_stack(&mut self) -> Vec<ConfigValue> {
        std::mem::take(&mut self.stack)
    }
}
