//! Errors raised while merging, resolving and reading configuration.

use crate::path::Path;
use crate::substitution::SubstitutionExpression;
use hocon_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use hocon_origin::Origin;
use thiserror::Error;

/// Errors that can occur during configuration operations.
///
/// Every resolution failure aborts the whole pass; there is no partially
/// resolved result.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required substitution names a path that is not set.
    #[error("{origin}: Could not resolve substitution to a value: {expr}")]
    UndefinedSubstitution {
        /// The substitution that could not be satisfied
        expr: SubstitutionExpression,
        /// Origin of the reference
        origin: Origin,
        /// Paths that were being resolved when the substitution was reached
        trace: Vec<Path>,
    },

    /// A chain of substitutions leads back to a path that is still being resolved.
    #[error("{origin}: Substitution cycle: {}", render_chain(chain))]
    CycleDetected {
        /// The paths of the cycle, starting and ending with the same path
        chain: Vec<Path>,
        /// Origin of the value that closed the cycle
        origin: Origin,
    },

    /// Values of incompatible types were combined or requested.
    #[error("{origin}: {message}")]
    WrongType {
        /// Where the problem occurred, when the value is addressable
        path: Option<Path>,
        /// What was wrong
        message: String,
        /// Origin of the offending value
        origin: Origin,
    },

    /// A value was read before its substitutions were resolved.
    #[error(
        "{origin}: {} has not been resolved, call resolve() before reading it",
        describe_path(path.as_ref())
    )]
    NotResolved {
        /// The unresolved location
        path: Option<Path>,
        /// Origin of the unresolved value
        origin: Origin,
    },

    /// Resolution recursed deeper than [`crate::ResolveOptions::max_depth`].
    #[error(
        "Config nesting too deep (max depth: {max_depth}) at path: {}",
        describe_path(path.as_ref())
    )]
    NestingTooDeep {
        /// Maximum allowed depth
        max_depth: usize,
        /// Path where the limit was exceeded
        path: Option<Path>,
    },

    /// No value is set at the requested path.
    #[error("No configuration setting found for key '{path}'")]
    Missing {
        /// The requested path
        path: Path,
    },

    /// A path expression could not be parsed.
    #[error("Invalid path expression '{input}': {reason}")]
    BadPath {
        /// The text that was parsed
        input: String,
        /// Why it was rejected
        reason: String,
    },
}

pub(crate) fn render_chain(chain: &[Path]) -> String {
    chain
        .iter()
        .map(Path::render)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn describe_path(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("'{}'", path),
        None => "the value".to_string(),
    }
}

impl ConfigError {
    /// Origin of the value the error is about, when there is one.
    pub fn origin(&self) -> Option<&Origin> {
        match self {
            ConfigError::UndefinedSubstitution { origin, .. }
            | ConfigError::CycleDetected { origin, .. }
            | ConfigError::WrongType { origin, .. }
            | ConfigError::NotResolved { origin, .. } => Some(origin),
            ConfigError::NestingTooDeep { .. }
            | ConfigError::Missing { .. }
            | ConfigError::BadPath { .. } => None,
        }
    }

    /// The catalog code of this error (see `hocon_error_reporting::catalog`).
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::UndefinedSubstitution { .. } => "H-1-1",
            ConfigError::CycleDetected { .. } => "H-1-2",
            ConfigError::WrongType { .. } => "H-1-3",
            ConfigError::NotResolved { .. } => "H-1-4",
            ConfigError::NestingTooDeep { .. } => "H-1-5",
            ConfigError::Missing { .. } => "H-2-1",
            ConfigError::BadPath { .. } => "H-2-2",
        }
    }

    /// Convert into a structured diagnostic.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = match self {
            ConfigError::UndefinedSubstitution { expr, trace, .. } => {
                let mut builder = DiagnosticMessageBuilder::error("Undefined substitution")
                    .problem(format!("`{}` refers to `{}`, which is not set", expr, expr.path));
                if !trace.is_empty() {
                    builder =
                        builder.add_info(format!("While resolving `{}`", render_chain(trace)));
                }
                builder.add_hint(format!("Use `${{?{}}}` if the setting is optional?", expr.path))
            }
            ConfigError::CycleDetected { chain, .. } => {
                let start = chain.first().map(Path::render).unwrap_or_default();
                DiagnosticMessageBuilder::error("Substitution cycle")
                    .problem(format!("`{}` depends on its own value", start))
                    .add_detail(format!("`{}`", render_chain(chain)))
                    .add_hint(format!(
                        "Set `{}` in a lower-priority layer so the reference has a fallback?",
                        start
                    ))
            }
            ConfigError::WrongType { path, message, .. } => {
                let builder =
                    DiagnosticMessageBuilder::error("Wrong value type").problem(message.clone());
                match path {
                    Some(path) => builder.add_info(format!("At `{}`", path)),
                    None => builder,
                }
            }
            ConfigError::NotResolved { .. } => {
                DiagnosticMessageBuilder::error("Configuration not resolved")
                    .problem(self.to_string())
                    .add_hint("Call `resolve()` before reading values?")
            }
            ConfigError::NestingTooDeep { .. } => {
                DiagnosticMessageBuilder::error("Nesting too deep").problem(self.to_string())
            }
            ConfigError::Missing { path } => DiagnosticMessageBuilder::error("Missing setting")
                .problem(format!("No value is set at `{}`", path)),
            ConfigError::BadPath { input, reason } => {
                DiagnosticMessageBuilder::error("Invalid path")
                    .problem(format!("`{}` is not a valid path: {}", input, reason))
            }
        };

        let builder = builder.with_code(self.code());
        match self.origin() {
            Some(origin) => builder.with_location(origin.clone()).build(),
            None => builder.build(),
        }
    }
}
