//! Origin of a configuration value

use crate::types::OriginType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix used in the description of an origin combining unrelated sources.
pub const MERGE_OF_PREFIX: &str = "merge of ";

/// Where a configuration value came from.
///
/// Two origins are equal when all of their fields are equal. Values holding
/// an origin ignore it in their own equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    /// Source description without line information (a file name, a URL, ...)
    pub description: String,
    /// What kind of source this is
    pub origin_type: OriginType,
    /// First line (1-based) covered by the value, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Last line (1-based) covered by the value, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line_number: Option<u32>,
    /// Comments attached to the value in its source text
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub comments: Vec<String>,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::new_simple("empty config")
    }
}

impl Origin {
    fn new(description: impl Into<String>, origin_type: OriginType) -> Self {
        Origin {
            description: description.into(),
            origin_type,
            line_number: None,
            end_line_number: None,
            comments: Vec::new(),
        }
    }

    /// Create an origin with a free-form description.
    pub fn new_simple(description: impl Into<String>) -> Self {
        Origin::new(description, OriginType::Generic)
    }

    /// Create an origin for a file on disk.
    pub fn new_file(path: impl Into<String>) -> Self {
        Origin::new(path, OriginType::File)
    }

    /// Create an origin for a bundled resource.
    pub fn new_resource(name: impl Into<String>) -> Self {
        Origin::new(name, OriginType::Resource)
    }

    /// Create an origin for a remote document.
    pub fn new_url(url: impl Into<String>) -> Self {
        Origin::new(url, OriginType::Url)
    }

    /// Return a copy covering exactly one line.
    pub fn with_line_number(mut self, line: u32) -> Self {
        self.line_number = Some(line);
        self.end_line_number = Some(line);
        self
    }

    /// Return a copy covering the lines `start..=end`.
    pub fn with_line_range(mut self, start: u32, end: u32) -> Self {
        self.line_number = Some(start);
        self.end_line_number = Some(end.max(start));
        self
    }

    /// Return a copy carrying the given comments.
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// Human-readable description including line information,
    /// e.g. `application.conf: 3` or `application.conf: 3-7`.
    pub fn description(&self) -> String {
        match (self.line_number, self.end_line_number) {
            (Some(start), Some(end)) if end > start => {
                format!("{}: {}-{}", self.description, start, end)
            }
            (Some(start), _) => format!("{}: {}", self.description, start),
            (None, _) => self.description.clone(),
        }
    }

    /// Combine the origins of values that were merged together.
    ///
    /// Origins sharing a description collapse into one origin spanning all of
    /// their lines. Unrelated origins produce a `merge of a,b` description.
    /// An empty input yields the default origin.
    pub fn merge_origins<'a, I>(origins: I) -> Origin
    where
        I: IntoIterator<Item = &'a Origin>,
    {
        let mut iter = origins.into_iter();
        let Some(first) = iter.next() else {
            return Origin::default();
        };
        iter.fold(first.clone(), |merged, next| merge_two(&merged, next))
    }
}

fn strip_merge_prefix(description: &str) -> &str {
    description
        .strip_prefix(MERGE_OF_PREFIX)
        .unwrap_or(description)
}

fn merge_two(a: &Origin, b: &Origin) -> Origin {
    let origin_type = if a.origin_type == b.origin_type {
        a.origin_type
    } else {
        OriginType::Generic
    };

    let a_desc = strip_merge_prefix(&a.description);
    let b_desc = strip_merge_prefix(&b.description);

    let (description, line_number, end_line_number) = if a_desc == b_desc {
        let start = match (a.line_number, b.line_number) {
            (Some(x), Some(y)) => Some(x.min(y)),
            (x, y) => x.or(y),
        };
        let end = match (a.end_line_number, b.end_line_number) {
            (Some(x), Some(y)) => Some(x.max(y)),
            (x, y) => x.or(y),
        };
        (a_desc.to_string(), start, end)
    } else {
        let a_full = a.description();
        let b_full = b.description();
        (
            format!(
                "{}{},{}",
                MERGE_OF_PREFIX,
                strip_merge_prefix(&a_full),
                strip_merge_prefix(&b_full)
            ),
            None,
            None,
        )
    };

    let comments = if a.comments == b.comments {
        a.comments.clone()
    } else {
        a.comments.iter().chain(&b.comments).cloned().collect()
    };

    Origin {
        description,
        origin_type,
        line_number,
        end_line_number,
        comments,
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
