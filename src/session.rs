//! Session-scoped state: the loaded document, its path index, and the
//! search results saved so far
//!
//! One value of [`SessionState`] lives for the whole process and is passed
//! by reference into every operation. Nothing here survives exit.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::{BrowseError, Result};
use crate::index::PathIndex;

/// One value-search hit: where it matched and what the value rendered as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Canonical path of the matching leaf
    pub path: String,
    /// Final segment of the path
    pub tag: String,
    /// String rendering of the matched scalar
    pub value: String,
}

/// Ordered matches produced by one value search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    /// Search term that produced the set
    pub term: String,
    /// Matches in document traversal order
    pub matches: Vec<SearchMatch>,
}

/// Process-wide state for one browsing session
#[derive(Debug)]
pub struct SessionState {
    document: Arc<Value>,
    index: Arc<PathIndex>,
    source_name: String,
    current: Option<ResultSet>,
    saved: Vec<(String, ResultSet)>,
}

impl SessionState {
    /// Index a parsed document and wrap it in a fresh session.
    pub fn new(document: Value, source_name: impl Into<String>) -> Self {
        let index = PathIndex::build(&document);
        let source_name = source_name.into();
        info!(source = %source_name, paths = index.len(), "document loaded");
        Self {
            document: Arc::new(document),
            index: Arc::new(index),
            source_name,
            current: None,
            saved: Vec::new(),
        }
    }

    /// Read and parse a JSON file, then index it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BrowseError::DocumentLoad {
            path: path.display().to_string(),
            source,
        })?;
        let document: Value = serde_json::from_str(&text)?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("json");
        Ok(Self::new(document, name))
    }

    /// The immutable document root
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The path index built at load time
    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    /// Shared handle to the index, for the completion helper
    pub fn index_handle(&self) -> Arc<PathIndex> {
        Arc::clone(&self.index)
    }

    /// Name of the loaded document, shown in the prompt
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The unnamed result set from the most recent value search
    pub fn current(&self) -> Option<&ResultSet> {
        self.current.as_ref()
    }

    /// Replace the unnamed result set.
    pub fn set_current(&mut self, set: ResultSet) {
        self.current = Some(set);
    }

    /// Every saved result set, oldest first
    pub fn saved(&self) -> &[(String, ResultSet)] {
        &self.saved
    }

    /// Copy the current result set under the next generated label.
    /// Returns the label and match count, or `None` when nothing has been
    /// searched yet. The current set stays in place, so saving twice stores
    /// two copies under successive labels.
    pub fn save_current(&mut self) -> Option<(String, usize)> {
        let set = self.current.clone()?;
        let label = format!("result-{}", self.saved.len() + 1);
        let count = set.matches.len();
        self.saved.push((label.clone(), set));
        Some((label, count))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn match_for(path: &str) -> SearchMatch {
        SearchMatch {
            path: path.to_string(),
            tag: path.rsplit('.').next().unwrap_or(path).to_string(),
            value: "x".to_string(),
        }
    }

    #[test]
    fn test_save_without_search_is_none() {
        let mut state = SessionState::new(json!({"a": 1}), "test");
        assert!(state.save_current().is_none());
        assert!(state.saved().is_empty());
    }

    #[test]
    fn test_labels_count_up_from_one() {
        let mut state = SessionState::new(json!({"a": 1}), "test");
        state.set_current(ResultSet {
            term: "x".to_string(),
            matches: vec![match_for("a")],
        });
        assert_eq!(state.save_current(), Some(("result-1".to_string(), 1)));
        assert_eq!(state.save_current(), Some(("result-2".to_string(), 1)));
        let labels: Vec<&str> = state.saved().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["result-1", "result-2"]);
    }

    #[test]
    fn test_new_search_replaces_current_but_not_saved() {
        let mut state = SessionState::new(json!({"a": 1}), "test");
        state.set_current(ResultSet {
            term: "first".to_string(),
            matches: vec![match_for("a"), match_for("b")],
        });
        state.save_current().unwrap();
        state.set_current(ResultSet {
            term: "second".to_string(),
            matches: vec![],
        });
        assert_eq!(state.current().unwrap().term, "second");
        assert_eq!(state.saved()[0].1.term, "first");
        assert_eq!(state.saved()[0].1.matches.len(), 2);
    }

    #[test]
    fn test_from_file_loads_and_names() {
        let mut file = tempfile::Builder::new()
            .prefix("orders")
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(file, "{}", json!({"orders": [1, 2, 3]})).unwrap();

        let state = SessionState::from_file(file.path()).unwrap();
        assert_eq!(state.index().len(), 4);
        assert!(state.source_name().starts_with("orders"));
    }

    #[test]
    fn test_from_file_reports_parse_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"a\": [1, 2,]}}").unwrap();

        match SessionState::from_file(file.path()) {
            Err(BrowseError::DocumentParse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected DocumentParse, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_from_file_missing_is_load_error() {
        let err = SessionState::from_file(Path::new("/nonexistent/missing.json")).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, BrowseError::DocumentLoad { .. }));
    }
}
