//! Canonical path addressing for JSON documents
//!
//! Every location in a loaded document is named by a dot-joined sequence of
//! object keys and array indices, with indices written as bare integers:
//! `users.0.name` is the `name` member of the first element of the `users`
//! array. The empty string names the document root.

use std::fmt;

use serde_json::Value;

use crate::error::{BrowseError, Result};

/// One step in a path: an object member or an array element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member access by key
    Key(String),
    /// Array element access by position
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// A parsed path from the document root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Create a path from segments
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The empty path, naming the document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Final segment, if any
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// A new path extending this one by `segment`
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// True when `prefix`'s segments lead this path's
    pub fn starts_with(&self, prefix: &JsonPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Parse a dot-joined path string.
    ///
    /// A token is classified as an array index iff it is a canonical
    /// non-negative integer: ASCII digits only, no leading zero unless the
    /// token is exactly `0`, and small enough to fit `usize`. Every other
    /// token is an object key. An object whose key happens to be such an
    /// integer therefore renders identically to an array index and cannot be
    /// told apart in textual form; this ambiguity is inherent to the
    /// addressing scheme and is left as is.
    ///
    /// The empty string parses to the root path. An empty token, as in
    /// `a..b` or a leading/trailing dot, is a syntax error.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for token in input.split('.') {
            if token.is_empty() {
                return Err(BrowseError::PathSyntax(format!(
                    "empty segment in '{input}'"
                )));
            }
            segments.push(match parse_index(token) {
                Some(idx) => Segment::Index(idx),
                None => Segment::Key(token.to_string()),
            });
        }
        Ok(Self { segments })
    }

    /// Walk the path from `root`, returning the value it names.
    ///
    /// Fails as soon as a segment cannot be applied: a key on anything but
    /// an object with that member, an index on anything but an array long
    /// enough. The root path resolves to `root` itself.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key)?,
                (Segment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Like [`resolve`](Self::resolve), but on failure reports the longest
    /// leading portion of the path that did resolve.
    pub fn resolve_partial<'a>(
        &self,
        root: &'a Value,
    ) -> std::result::Result<&'a Value, JsonPath> {
        let mut current = root;
        for (pos, segment) in self.segments.iter().enumerate() {
            let next = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key),
                (Segment::Index(idx), Value::Array(arr)) => arr.get(*idx),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Err(JsonPath::new(self.segments[..pos].to_vec())),
            }
        }
        Ok(current)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Enumerate the immediate children of a value: object entries in insertion
/// order, array elements in index order, nothing for scalars.
pub fn children(value: &Value) -> Vec<(Segment, &Value)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| (Segment::Key(key.clone()), child))
            .collect(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(idx, child)| (Segment::Index(idx), child))
            .collect(),
        _ => Vec::new(),
    }
}

/// Classification of a JSON value for display and navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// JSON null
    Null,
    /// JSON boolean
    Bool,
    /// JSON number
    Number,
    /// JSON string
    String,
    /// JSON object
    Object,
    /// JSON array
    Array,
}

impl ValueKind {
    /// Classify a value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Containers can be expanded further; leaves cannot
    pub fn is_container(self) -> bool {
        matches!(self, ValueKind::Object | ValueKind::Array)
    }

    /// Short display name for the kind
    pub fn label(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        }
    }
}

fn parse_index(token: &str) -> Option<usize> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "users": [
                {"name": "Alice", "admin": true},
                {"name": "Bob", "admin": false}
            ],
            "count": 2,
            "note": null
        })
    }

    #[test]
    fn test_parse_classifies_tokens() {
        let path = JsonPath::parse("users.0.name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("users".to_string()),
                Segment::Index(0),
                Segment::Key("name".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(JsonPath::parse("").unwrap().is_root());
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(JsonPath::parse("a..b").is_err());
        assert!(JsonPath::parse(".a").is_err());
        assert!(JsonPath::parse("a.").is_err());
    }

    #[test]
    fn test_leading_zero_and_overflow_are_keys() {
        let path = JsonPath::parse("01").unwrap();
        assert_eq!(path.segments(), &[Segment::Key("01".to_string())]);

        let big = "9".repeat(40);
        let path = JsonPath::parse(&big).unwrap();
        assert_eq!(path.segments(), &[Segment::Key(big.clone())]);
        assert_eq!(path.to_string(), big);
    }

    #[test]
    fn test_render_parse_roundtrip() {
        for text in ["users", "users.0", "users.0.name", "a.0.b.10.c"] {
            let path = JsonPath::parse(text).unwrap();
            assert_eq!(path.to_string(), text);
        }
    }

    #[test]
    fn test_resolve_walks_document() {
        let doc = sample();
        let path = JsonPath::parse("users.1.name").unwrap();
        assert_eq!(path.resolve(&doc), Some(&json!("Bob")));
        assert_eq!(JsonPath::root().resolve(&doc), Some(&doc));
    }

    #[test]
    fn test_resolve_fails_on_wrong_container() {
        let doc = sample();
        // index into an object
        assert!(JsonPath::parse("0").unwrap().resolve(&doc).is_none());
        // key into an array
        assert!(JsonPath::parse("users.name").unwrap().resolve(&doc).is_none());
        // out of range
        assert!(JsonPath::parse("users.5").unwrap().resolve(&doc).is_none());
        // missing key
        assert!(JsonPath::parse("absent").unwrap().resolve(&doc).is_none());
    }

    #[test]
    fn test_resolve_partial_reports_longest_prefix() {
        let doc = sample();
        let path = JsonPath::parse("users.0.missing.deep").unwrap();
        let valid = path.resolve_partial(&doc).unwrap_err();
        assert_eq!(valid.to_string(), "users.0");

        let path = JsonPath::parse("absent").unwrap();
        let valid = path.resolve_partial(&doc).unwrap_err();
        assert!(valid.is_root());
    }

    #[test]
    fn test_children_order_and_leaves() {
        let doc = sample();
        let keys: Vec<String> = children(&doc)
            .iter()
            .map(|(seg, _)| seg.to_string())
            .collect();
        assert_eq!(keys, ["users", "count", "note"]);

        let arr = JsonPath::parse("users").unwrap();
        let indices: Vec<String> = children(arr.resolve(&doc).unwrap())
            .iter()
            .map(|(seg, _)| seg.to_string())
            .collect();
        assert_eq!(indices, ["0", "1"]);

        assert!(children(&json!("leaf")).is_empty());
        assert!(children(&json!(null)).is_empty());
    }

    #[test]
    fn test_starts_with() {
        let path = JsonPath::parse("users.0.name").unwrap();
        assert!(path.starts_with(&JsonPath::root()));
        assert!(path.starts_with(&JsonPath::parse("users.0").unwrap()));
        assert!(!path.starts_with(&JsonPath::parse("users.1").unwrap()));
        assert!(!JsonPath::parse("users").unwrap().starts_with(&path));
    }

    #[test]
    fn test_kind_classification() {
        assert!(ValueKind::of(&json!({})).is_container());
        assert!(ValueKind::of(&json!([])).is_container());
        assert!(!ValueKind::of(&json!("s")).is_container());
        assert_eq!(ValueKind::of(&json!(true)).label(), "boolean");
        assert_eq!(ValueKind::of(&json!(null)).label(), "null");
    }
}
