//! Query operations over the loaded document
//!
//! Each operation takes the session state and produces a [`Response`], the
//! semantic result that the output layer turns into styled text. Expansion
//! and filtering read the path index; value search resolves each indexed
//! leaf against the document; printing resolves one path.

use serde_json::Value;
use tracing::debug;

use crate::error::{BrowseError, Result};
use crate::index::PathEntry;
use crate::path::{JsonPath, ValueKind};
use crate::session::{ResultSet, SearchMatch, SessionState};

/// One row of a path listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Rendered path
    pub text: String,
    /// True when the node can be expanded further
    pub container: bool,
    /// Size or kind note shown after the path
    pub annotation: String,
}

/// Semantic result of one executed request
#[derive(Debug, PartialEq)]
pub enum Response {
    /// Path listing from an expansion or filter
    Listing {
        /// Rows in traversal order
        rows: Vec<ListingRow>,
        /// Filter word to highlight inside each path, if any
        highlight: Option<String>,
    },
    /// Value-search hits
    Matches {
        /// The searched term
        term: String,
        /// Hits in traversal order
        matches: Vec<SearchMatch>,
    },
    /// Receipt for a saved result set
    Saved {
        /// Generated label
        label: String,
        /// Number of matches in the saved set
        count: usize,
    },
    /// Every result set saved this session
    SavedList(
        /// Label and set pairs, oldest first
        Vec<(String, ResultSet)>,
    ),
    /// A value to pretty-print
    Value {
        /// Path the value was found at
        path: String,
        /// The value itself
        value: Value,
    },
    /// Help banner
    Help,
    /// Session end
    Bye,
    /// Informational note
    Note(String),
}

/// List the immediate children of the document root.
pub fn expand_top(state: &SessionState) -> Response {
    listing(state.index().child_entries(&JsonPath::root()), None)
}

/// List every reachable path, depth-first.
pub fn expand_all(state: &SessionState) -> Response {
    listing(state.index().entries().iter().collect(), None)
}

/// List every descendant of the root down to `levels`.
pub fn expand_depth(state: &SessionState, levels: usize) -> Response {
    listing(
        state.index().entries_up_to_depth(&JsonPath::root(), levels),
        None,
    )
}

/// List the immediate children of the node at `raw`.
pub fn expand_prefix(state: &SessionState, raw: &str) -> Result<Response> {
    let path = JsonPath::parse(raw)?;
    let value = resolve_or_not_found(state.document(), &path)?;
    if !ValueKind::of(value).is_container() {
        return Ok(Response::Note(format!(
            "'{raw}' is a {} leaf; nothing to expand",
            ValueKind::of(value).label()
        )));
    }
    Ok(listing(state.index().child_entries(&path), None))
}

/// Filter rendered paths by substring.
pub fn filter_paths(state: &SessionState, word: &str, case_sensitive: bool) -> Response {
    let hits = state.index().filter_text(word, case_sensitive);
    debug!(word, case_sensitive, hits = hits.len(), "path filter");
    listing(hits, Some(word.to_string()))
}

/// Search scalar values for `term`, case-insensitively, replacing the
/// session's current result set. Containers never match; only the string
/// rendering of each leaf is examined.
pub fn search_values(state: &mut SessionState, term: &str) -> Response {
    let needle = term.to_lowercase();
    let mut matches = Vec::new();
    for entry in state.index().entries() {
        if entry.kind.is_container() {
            continue;
        }
        let Some(value) = entry.path.resolve(state.document()) else {
            continue;
        };
        let text = scalar_text(value);
        if text.to_lowercase().contains(&needle) {
            matches.push(SearchMatch {
                path: entry.text.clone(),
                tag: entry
                    .path
                    .last()
                    .map(|segment| segment.to_string())
                    .unwrap_or_default(),
                value: text,
            });
        }
    }
    debug!(term, matches = matches.len(), "value search");
    state.set_current(ResultSet {
        term: term.to_string(),
        matches: matches.clone(),
    });
    Response::Matches {
        term: term.to_string(),
        matches,
    }
}

/// Save the current result set under the next generated label.
pub fn save_results(state: &mut SessionState) -> Response {
    match state.save_current() {
        Some((label, count)) => Response::Saved { label, count },
        None => Response::Note("nothing to save; run /k first".to_string()),
    }
}

/// List every result set saved this session.
pub fn list_saved(state: &SessionState) -> Response {
    Response::SavedList(state.saved().to_vec())
}

/// Resolve `raw` and return its value for pretty-printing.
pub fn print_value(state: &SessionState, raw: &str) -> Result<Response> {
    let path = JsonPath::parse(raw)?;
    let value = resolve_or_not_found(state.document(), &path)?;
    Ok(Response::Value {
        path: display_path(&path),
        value: value.clone(),
    })
}

/// Bare path input: list children of a container, print a leaf's value.
pub fn inspect(state: &SessionState, raw: &str) -> Result<Response> {
    let path = JsonPath::parse(raw)?;
    let value = resolve_or_not_found(state.document(), &path)?;
    if ValueKind::of(value).is_container() {
        Ok(listing(state.index().child_entries(&path), None))
    } else {
        Ok(Response::Value {
            path: display_path(&path),
            value: value.clone(),
        })
    }
}

fn listing(entries: Vec<&PathEntry>, highlight: Option<String>) -> Response {
    Response::Listing {
        rows: entries
            .into_iter()
            .map(|entry| ListingRow {
                text: entry.text.clone(),
                container: entry.kind.is_container(),
                annotation: annotate(entry),
            })
            .collect(),
        highlight,
    }
}

/// Short display note for an entry: container size or leaf kind
fn annotate(entry: &PathEntry) -> String {
    match entry.kind {
        ValueKind::Object => {
            if entry.child_count == 0 {
                format!("{{}} {} keys", entry.child_count)
            } else {
                format!("{{…}} {} keys", entry.child_count)
            }
        }
        ValueKind::Array => {
            if entry.child_count == 0 {
                format!("[] {} items", entry.child_count)
            } else {
                format!("[…] {} items", entry.child_count)
            }
        }
        kind => kind.label().to_string(),
    }
}

/// String rendering of a scalar for search matching and match display:
/// string content without quotes, everything else in canonical JSON form.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn resolve_or_not_found<'a>(document: &'a Value, path: &JsonPath) -> Result<&'a Value> {
    path.resolve_partial(document)
        .map_err(|valid| BrowseError::PathNotFound {
            path: path.to_string(),
            valid_prefix: display_path(&valid),
        })
}

fn display_path(path: &JsonPath) -> String {
    if path.is_root() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}
