//! Builder API for diagnostic messages.
//!
//! The builder encodes the tidyverse message structure: a title, one problem
//! statement, a handful of details, and hints phrased as questions.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticMessage};
use hocon_origin::Origin;

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use hocon_error_reporting::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Undefined substitution")
///     .problem("`${db.host}` refers to `db.host`, which is not set")
///     .add_hint("Use `${?db.host}` if the setting is optional?")
///     .build();
///
/// assert_eq!(msg.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    /// Start an error message.
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::error(title),
        }
    }

    /// Set the catalog error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    /// Set the problem statement. A later call replaces an earlier one.
    pub fn problem(mut self, problem: impl Into<String>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    fn push_detail(mut self, kind: DetailKind, text: String) -> Self {
        self.message.details.push(DetailItem { kind, text });
        self
    }

    /// Add an error detail (✖).
    pub fn add_detail(self, detail: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Error, detail.into())
    }

    /// Add an info detail (ℹ).
    pub fn add_info(self, info: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Info, info.into())
    }

    /// Add a hint. Hints should end with a question mark.
    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    /// Attach the origin of the value the message is about.
    pub fn with_location(mut self, location: Origin) -> Self {
        self.message.location = Some(location);
        self
    }

    /// Finish the message.
    pub fn build(self) -> DiagnosticMessage {
        self.message
    }
}
