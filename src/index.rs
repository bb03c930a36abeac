//! Precomputed index of every path in a loaded document
//!
//! Built once by a single depth-first walk right after the document is
//! parsed, then read-only for the rest of the session. Every query the
//! browser answers is a scan over this one flat collection.

use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use crate::path::{children, JsonPath, ValueKind};

/// One indexed node: a path plus display metadata
#[derive(Debug, Clone)]
pub struct PathEntry {
    /// Parsed path from the document root
    pub path: JsonPath,
    /// Canonical rendering of `path`, computed once at build time
    pub text: String,
    /// Number of segments in `path`
    pub depth: usize,
    /// Classification of the value at this path
    pub kind: ValueKind,
    /// Number of immediate children; 0 for leaves
    pub child_count: usize,
}

/// Flat collection of every reachable path, in depth-first document order
/// (parent before child, children in document order). The root itself is
/// not an entry; its children are the depth-1 entries.
#[derive(Debug, Default)]
pub struct PathIndex {
    entries: Vec<PathEntry>,
}

impl PathIndex {
    /// Walk the document once and record an entry per reachable node.
    pub fn build(document: &Value) -> Self {
        let started = Instant::now();
        let mut entries = Vec::new();
        collect(document, &JsonPath::root(), &mut entries);
        debug!(
            entries = entries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "path index built"
        );
        Self { entries }
    }

    /// All entries in traversal order
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    /// Number of indexed paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the document has no children at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct children of `prefix`, in document order. Empty for leaves
    /// and for paths not present in the document.
    pub fn child_entries(&self, prefix: &JsonPath) -> Vec<&PathEntry> {
        let want = prefix.depth() + 1;
        self.entries
            .iter()
            .filter(|entry| entry.depth == want && entry.path.starts_with(prefix))
            .collect()
    }

    /// Descendants of `prefix` at most `levels` below it, in traversal order.
    pub fn entries_up_to_depth(&self, prefix: &JsonPath, levels: usize) -> Vec<&PathEntry> {
        let floor = prefix.depth();
        let ceiling = floor + levels;
        self.entries
            .iter()
            .filter(|entry| {
                entry.depth > floor && entry.depth <= ceiling && entry.path.starts_with(prefix)
            })
            .collect()
    }

    /// Entries whose rendered text contains `pattern` as a substring,
    /// case-folded unless `case_sensitive`.
    pub fn filter_text(&self, pattern: &str, case_sensitive: bool) -> Vec<&PathEntry> {
        if case_sensitive {
            self.entries
                .iter()
                .filter(|entry| entry.text.contains(pattern))
                .collect()
        } else {
            let needle = pattern.to_lowercase();
            self.entries
                .iter()
                .filter(|entry| entry.text.to_lowercase().contains(&needle))
                .collect()
        }
    }
}

fn collect(value: &Value, path: &JsonPath, entries: &mut Vec<PathEntry>) {
    for (segment, child) in children(value) {
        let child_path = path.child(segment);
        entries.push(PathEntry {
            text: child_path.to_string(),
            depth: child_path.depth(),
            kind: ValueKind::of(child),
            child_count: child_count(child),
            path: child_path.clone(),
        });
        collect(child, &child_path, entries);
    }
}

fn child_count(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        Value::Array(arr) => arr.len(),
        _ => 0,
    }
}
