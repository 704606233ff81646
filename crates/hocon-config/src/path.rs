//! Paths into a configuration tree.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Characters that must be quoted to appear in a path element.
const FORBIDDEN_UNQUOTED: &str = "$\"{}[]:=,+#`^?!@*&\\";

/// A non-empty sequence of keys addressing a location in a configuration tree.
///
/// Paths render in HOCON syntax: elements are joined with `.`, and an
/// element is quoted when it contains anything other than letters, digits,
/// `-` and `_`.
///
/// ```
/// use hocon_config::Path;
///
/// let path = Path::parse(r#"server."host.name".port"#).unwrap();
/// assert_eq!(path.elements(), ["server", "host.name", "port"]);
/// assert_eq!(path.to_string(), r#"server."host.name".port"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    elements: Vec<String>,
}

impl Path {
    /// Build a path from its elements.
    ///
    /// Fails when there are no elements or when an element is empty.
    pub fn from_elements<I, S>(elements: I) -> Result<Path, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        if elements.is_empty() {
            return Err(ConfigError::BadPath {
                input: String::new(),
                reason: "a path needs at least one element".to_string(),
            });
        }
        if elements.iter().any(String::is_empty) {
            return Err(ConfigError::BadPath {
                input: elements.join("."),
                reason: "path elements may not be empty".to_string(),
            });
        }
        Ok(Path { elements })
    }

    /// A single-element path. The key is taken as-is, as object keys are,
    /// but may not be empty.
    pub fn new_key(key: impl Into<String>) -> Result<Path, ConfigError> {
        Path::from_elements([key.into()])
    }

    /// Parse a path expression such as `a.b."c.d"`.
    ///
    /// Unquoted text is split on `.` and trimmed at the element ends; quoted
    /// text follows JSON string syntax and is taken verbatim.
    pub fn parse(input: &str) -> Result<Path, ConfigError> {
        let bad = |reason: String| ConfigError::BadPath {
            input: input.to_string(),
            reason,
        };

        if input.trim().is_empty() {
            return Err(bad("path expression is empty".to_string()));
        }

        let mut elements = Vec::new();
        let mut pieces: Vec<Piece> = Vec::new();
        let mut unquoted = String::new();
        let mut chars = input.char_indices();

        while let Some((start, c)) = chars.next() {
            match c {
                '.' => {
                    flush_unquoted(&mut unquoted, &mut pieces);
                    elements.push(finish_element(std::mem::take(&mut pieces)).map_err(bad)?);
                }
                '"' => {
                    flush_unquoted(&mut unquoted, &mut pieces);
                    let mut escaped = false;
                    let mut end = None;
                    for (index, c) in chars.by_ref() {
                        if escaped {
                            escaped = false;
                        } else if c == '\\' {
                            escaped = true;
                        } else if c == '"' {
                            end = Some(index);
                            break;
                        }
                    }
                    let end = end.ok_or_else(|| bad("unterminated quoted element".to_string()))?;
                    let text: String = serde_json::from_str(&input[start..=end])
                        .map_err(|e| bad(format!("invalid quoted element: {}", e)))?;
                    pieces.push(Piece::Quoted(text));
                }
                c if FORBIDDEN_UNQUOTED.contains(c) => {
                    return Err(bad(format!("'{}' is not allowed outside quotes", c)));
                }
                c => unquoted.push(c),
            }
        }

        flush_unquoted(&mut unquoted, &mut pieces);
        elements.push(finish_element(pieces).map_err(bad)?);
        Ok(Path { elements })
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn first(&self) -> &str {
        &self.elements[0]
    }

    pub fn last(&self) -> &str {
        &self.elements[self.elements.len() - 1]
    }

    /// Number of elements, always at least one.
    pub fn length(&self) -> usize {
        self.elements.len()
    }

    /// Everything after the first element.
    pub fn remainder(&self) -> Option<Path> {
        self.subpath(1)
    }

    /// Everything before the last element.
    pub fn parent(&self) -> Option<Path> {
        if self.elements.len() > 1 {
            Some(self.prefix(self.elements.len() - 1))
        } else {
            None
        }
    }

    /// This path extended by `key`, which may not be empty.
    pub fn child(&self, key: impl Into<String>) -> Result<Path, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::BadPath {
                input: format!("{}.\"\"", self.render()),
                reason: "path elements may not be empty".to_string(),
            });
        }
        let mut elements = self.elements.clone();
        elements.push(key);
        Ok(Path { elements })
    }

    /// `prefix` followed by this path.
    pub fn prepend(&self, prefix: &Path) -> Path {
        let mut elements = prefix.elements.clone();
        elements.extend(self.elements.iter().cloned());
        Path { elements }
    }

    /// The path with its first `from` elements removed, if any remain.
    pub fn subpath(&self, from: usize) -> Option<Path> {
        if from < self.elements.len() {
            Some(Path {
                elements: self.elements[from..].to_vec(),
            })
        } else {
            None
        }
    }

    /// A path over elements already known to be non-empty.
    pub(crate) fn from_slice(elements: &[String]) -> Path {
        Path {
            elements: elements.to_vec(),
        }
    }

    /// The first `len` elements. `len` must be between 1 and the path length.
    pub(crate) fn prefix(&self, len: usize) -> Path {
        Path {
            elements: self.elements[..len].to_vec(),
        }
    }

    pub fn starts_with(&self, other: &Path) -> bool {
        self.elements.starts_with(&other.elements)
    }

    /// Render in HOCON syntax, quoting elements where needed.
    pub fn render(&self) -> String {
        self.elements
            .iter()
            .map(|element| render_element(element))
            .collect::<Vec<_>>()
            .join(".")
    }
}

enum Piece {
    Quoted(String),
    Unquoted(String),
}

fn flush_unquoted(unquoted: &mut String, pieces: &mut Vec<Piece>) {
    if !unquoted.is_empty() {
        pieces.push(Piece::Unquoted(std::mem::take(unquoted)));
    }
}

fn finish_element(mut pieces: Vec<Piece>) -> Result<String, String> {
    // whitespace is only significant between pieces, never at the ends
    if let Some(Piece::Unquoted(text)) = pieces.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Piece::Unquoted(text)) = pieces.last_mut() {
        *text = text.trim_end().to_string();
    }

    let element: String = pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Quoted(text) | Piece::Unquoted(text) => text,
        })
        .collect();

    if element.is_empty() {
        Err("path has an empty element".to_string())
    } else {
        Ok(element)
    }
}

fn render_element(element: &str) -> String {
    let bare = !element.is_empty()
        && element
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if bare {
        element.to_string()
    } else {
        serde_json::Value::String(element.to_string()).to_string()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl FromStr for Path {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}
