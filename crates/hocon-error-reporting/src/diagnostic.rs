//! The diagnostic record produced when resolution fails.
//!
//! Text fields use backticks around paths and substitution expressions, so a
//! front end may treat them as markdown.

use hocon_origin::Origin;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Whether a detail line names a cause or adds context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Part of what went wrong, such as the links of a cycle.
    Error,
    /// Where the resolver was when it failed.
    Info,
}

impl DetailKind {
    fn bullet(self) -> char {
        match self {
            DetailKind::Error => '✖',
            DetailKind::Info => 'ℹ',
        }
    }
}

/// One bulleted line under the problem statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub text: String,
}

/// An error report: a catalog code, a short title, one problem statement,
/// bulleted details and hints phrased as questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Catalog code such as `H-1-2`; see [`crate::catalog`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    pub problem: Option<String>,
    pub details: Vec<DetailItem>,
    pub hints: Vec<String>,
    /// Origin of the value the report is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Origin>,
}

impl DiagnosticMessage {
    /// An error report with nothing but a title.
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Catalog title for this message's code, if the code is known.
    pub fn catalog_title(&self) -> Option<&str> {
        self.code
            .as_deref()
            .and_then(crate::catalog::get_error_info)
            .map(|info| info.title.as_str())
    }

    /// Render as terminal text.
    ///
    /// ```text
    /// Error [H-1-2]: Substitution cycle
    ///   --> app.conf: 2
    /// `a` depends on its own value
    /// ✖ `a -> b -> a`
    /// ? Set `a` in a lower-priority layer ...?
    /// ```
    ///
    /// ```
    /// use hocon_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Missing setting")
    ///     .problem("No value is set at `db.port`")
    ///     .build();
    /// assert_eq!(msg.to_text(), "Error: Missing setting\nNo value is set at `db.port`");
    /// ```
    pub fn to_text(&self) -> String {
        let mut out = match &self.code {
            Some(code) => format!("Error [{}]: {}", code, self.title),
            None => format!("Error: {}", self.title),
        };
        if let Some(location) = &self.location {
            out.push_str(&format!("\n  --> {}", location));
        }
        if let Some(problem) = &self.problem {
            out.push('\n');
            out.push_str(problem);
        }
        for detail in &self.details {
            out.push_str(&format!("\n{} {}", detail.kind.bullet(), detail.text));
        }
        for hint in &self.hints {
            out.push_str(&format!("\n? {}", hint));
        }
        out
    }

    /// Render as JSON. Empty sections are left out.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = json!({ "kind": "error", "title": self.title });
        if let Some(code) = &self.code {
            obj["code"] = json!(code);
        }
        if let Some(problem) = &self.problem {
            obj["problem"] = json!(problem);
        }
        if !self.details.is_empty() {
            obj["details"] = json!(self.details);
        }
        if !self.hints.is_empty() {
            obj["hints"] = json!(self.hints);
        }
        if let Some(location) = &self.location {
            obj["location"] = json!(location);
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DiagnosticMessageBuilder;

    #[test]
    fn test_catalog_title() {
        let msg = DiagnosticMessage::error("cycle").with_code("H-1-2");
        assert_eq!(msg.catalog_title(), Some("Substitution Cycle"));

        let unknown = DiagnosticMessage::error("x").with_code("H-999-999");
        assert_eq!(unknown.catalog_title(), None);
        assert_eq!(DiagnosticMessage::error("x").catalog_title(), None);
    }

    #[test]
    fn test_to_text_title_only() {
        assert_eq!(DiagnosticMessage::error("Bad").to_text(), "Error: Bad");
        assert_eq!(
            DiagnosticMessage::error("Bad").with_code("H-1-1").to_text(),
            "Error [H-1-1]: Bad"
        );
    }

    #[test]
    fn test_to_text_full_message() {
        let msg = DiagnosticMessageBuilder::error("Substitution cycle")
            .with_code("H-1-2")
            .with_location(Origin::new_file("app.conf").with_line_number(2))
            .problem("`a` depends on its own value")
            .add_detail("`a -> b -> a`")
            .add_info("While resolving `c`")
            .add_hint("Did you mean `${?a}`?")
            .build();

        insta::assert_snapshot!(msg.to_text(), @r"
        Error [H-1-2]: Substitution cycle
          --> app.conf: 2
        `a` depends on its own value
        ✖ `a -> b -> a`
        ℹ While resolving `c`
        ? Did you mean `${?a}`?
        ");
    }

    #[test]
    fn test_to_json() {
        let msg = DiagnosticMessageBuilder::error("Wrong value type")
            .with_code("H-1-3")
            .problem("Cannot concatenate an object with a list")
            .add_info("At `a.b`")
            .add_hint("Wrap the object in a list?")
            .with_location(Origin::new_file("app.conf"))
            .build();
        let json = msg.to_json();

        assert_eq!(json["kind"], "error");
        assert_eq!(json["code"], "H-1-3");
        assert_eq!(json["problem"], "Cannot concatenate an object with a list");
        assert_eq!(json["details"][0]["kind"], "info");
        assert_eq!(json["details"][0]["text"], "At `a.b`");
        assert_eq!(json["hints"][0], "Wrap the object in a list?");
        assert_eq!(json["location"]["origin_type"], "file");
    }

    #[test]
    fn test_to_json_leaves_out_empty_sections() {
        let json = DiagnosticMessage::error("No location").to_json();
        assert_eq!(json["title"], "No location");
        assert!(json.get("code").is_none());
        assert!(json.get("problem").is_none());
        assert!(json.get("details").is_none());
        assert!(json.get("hints").is_none());
        assert!(json.get("location").is_none());
    }
}
