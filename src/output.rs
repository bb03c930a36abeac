//! Rendering of query responses into styled terminal text
//!
//! The query engine emits semantic results; this module maps them onto the
//! session palette: paths blue, values cyan/yellow, matches red, errors
//! red, notes yellow, annotations dimmed.

use colored::Colorize;
use serde_json::Value;

use crate::commands::CommandRegistry;
use crate::error::BrowseError;
use crate::query::{ListingRow, Response};
use crate::session::{ResultSet, SearchMatch};

/// Render a response as the text the user sees.
pub fn render(response: &Response) -> String {
    match response {
        Response::Listing { rows, highlight } => render_listing(rows, highlight.as_deref()),
        Response::Matches { term, matches } => render_matches(term, matches),
        Response::Saved { label, count } => format!(
            "{}",
            format!("Saved {count} matches as '{label}'").green()
        ),
        Response::SavedList(sets) => render_saved(sets),
        Response::Value { path, value } => render_value(path, value),
        Response::Help => render_help(),
        Response::Bye => format!("{}", "Exiting.".yellow()),
        Response::Note(text) => format!("{}", text.yellow()),
    }
}

/// Render a recoverable error.
pub fn render_error(err: &BrowseError) -> String {
    format!("{}", err.to_string().red())
}

fn render_listing(rows: &[ListingRow], highlight: Option<&str>) -> String {
    if rows.is_empty() {
        return format!("{}", "No matching results.".red());
    }
    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let path = match highlight {
            Some(word) => highlight_term(&row.text, word, |s| s.blue().to_string()),
            None if row.container => format!("{}", row.text.blue().bold()),
            None => format!("{}", row.text.blue()),
        };
        lines.push(format!("{path}  {}", row.annotation.dimmed()));
    }
    lines.join("\n")
}

fn render_matches(term: &str, matches: &[SearchMatch]) -> String {
    if matches.is_empty() {
        return format!("{}", format!("No matches for '{term}'.").red());
    }
    let mut blocks = Vec::with_capacity(matches.len());
    for hit in matches {
        blocks.push(format!(
            "{} {}\n{} {}\n{} {}",
            "Path:".blue(),
            hit.path.blue(),
            "Tag:".green(),
            hit.tag.green(),
            "Value:".yellow(),
            highlight_term(&hit.value, term, |s| s.yellow().to_string()),
        ));
    }
    blocks.join("\n\n")
}

fn render_saved(sets: &[(String, ResultSet)]) -> String {
    if sets.is_empty() {
        return format!("{}", "No saved search results in this session.".red());
    }
    let mut lines = Vec::new();
    for (label, set) in sets {
        lines.push(format!(
            "{} {}",
            label.green().bold(),
            format!("('{}', {} matches)", set.term, set.matches.len()).dimmed()
        ));
        for hit in &set.matches {
            lines.push(format!(
                "  {} {} {}",
                hit.path.blue(),
                format!("[{}]", hit.tag).green(),
                hit.value.yellow()
            ));
        }
    }
    lines.join("\n")
}

fn render_value(path: &str, value: &Value) -> String {
    if let Some(text) = scalar_line(value) {
        // A leaf fits on the header line
        return format!("{} {text}", format!("{path}:").blue().bold());
    }
    format!(
        "{}\n{}",
        format!("{path}:").blue().bold(),
        format_tree(value, 1)
    )
}

/// Indented tree rendering: one line per node, object keys and array
/// indices labeling each line, indentation growing with nesting depth.
fn format_tree(value: &Value, indent: usize) -> String {
    let pad = "    ".repeat(indent);
    match value {
        Value::Object(map) if map.is_empty() => format!("{pad}{}", "{}".dimmed()),
        Value::Array(arr) if arr.is_empty() => format!("{pad}{}", "[]".dimmed()),
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| branch(&pad, key, child, indent))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(idx, child)| branch(&pad, &idx.to_string(), child, indent))
            .collect::<Vec<_>>()
            .join("\n"),
        leaf => format!("{pad}{}", scalar(leaf)),
    }
}

fn branch(pad: &str, label: &str, child: &Value, indent: usize) -> String {
    match scalar_line(child) {
        Some(text) => format!("{pad}{} {text}", format!("{label}:").blue()),
        None => format!(
            "{pad}{}\n{}",
            format!("{label}:").blue(),
            format_tree(child, indent + 1)
        ),
    }
}

/// Single-line rendering for leaves and empty containers, `None` when the
/// value needs its own indented block.
fn scalar_line(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) if map.is_empty() => Some(format!("{}", "{}".dimmed())),
        Value::Array(arr) if arr.is_empty() => Some(format!("{}", "[]".dimmed())),
        Value::Object(_) | Value::Array(_) => None,
        leaf => Some(scalar(leaf)),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => format!("{}", "null".dimmed()),
        Value::Bool(b) => format!("{}", b.to_string().cyan()),
        Value::Number(n) => format!("{}", n.to_string().cyan()),
        Value::String(s) => format!("{}", format!("\"{s}\"").yellow()),
        _ => String::new(),
    }
}

/// Color every case-insensitive occurrence of `term` red, styling the rest
/// of the text with `base`.
///
/// Case folding can change byte lengths (`İ` folds to two characters, `ẞ`
/// to a shorter one), so the fold is built character by character with a
/// map from each folded byte back to the span of the original character
/// that produced it. Matches found in the folded text are widened to those
/// spans, keeping every slice on a char boundary.
fn highlight_term(text: &str, term: &str, base: impl Fn(&str) -> String) -> String {
    if term.is_empty() {
        return base(text);
    }
    let folded_term = term.to_lowercase();

    let mut folded = String::with_capacity(text.len());
    let mut spans = Vec::with_capacity(text.len());
    for (at, ch) in text.char_indices() {
        let end = at + ch.len_utf8();
        for low in ch.to_lowercase() {
            folded.push(low);
            for _ in 0..low.len_utf8() {
                spans.push((at, end));
            }
        }
    }

    let mut out = String::new();
    let mut cursor = 0;
    let mut search = 0;
    while let Some(found) = folded[search..].find(&folded_term) {
        let folded_start = search + found;
        let folded_end = folded_start + folded_term.len();
        let (start, _) = spans[folded_start];
        let (_, end) = spans[folded_end - 1];
        if start > cursor {
            out.push_str(&base(&text[cursor..start]));
        }
        if end > cursor {
            out.push_str(&format!("{}", text[cursor.max(start)..end].red()));
            cursor = end;
        }
        search = folded_end;
    }
    if cursor < text.len() {
        out.push_str(&base(&text[cursor..]));
    }
    out
}

fn render_help() -> String {
    let registry = CommandRegistry::new();
    let mut lines = vec!["Available commands:".to_string()];
    for info in registry.all() {
        lines.push(format!("  {:<10} {}", info.usage, info.summary));
    }
    lines.push(String::new());
    lines.push("PREFIX?    lists the children of PREFIX; ?.? expands two levels.".to_string());
    lines.push("A bare path lists its children, or prints the value of a leaf.".to_string());
    lines.push("Use TAB to complete paths and commands.".to_string());
    format!("{}", lines.join("\n").yellow())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_listing_rows_and_empty() {
        plain();
        let rows = vec![
            ListingRow {
                text: "users".to_string(),
                container: true,
                annotation: "[…] 2 items".to_string(),
            },
            ListingRow {
                text: "count".to_string(),
                container: false,
                annotation: "number".to_string(),
            },
        ];
        let text = render(&Response::Listing {
            rows,
            highlight: None,
        });
        assert_eq!(text, "users  […] 2 items\ncount  number");

        let empty = render(&Response::Listing {
            rows: vec![],
            highlight: None,
        });
        assert_eq!(empty, "No matching results.");
    }

    #[test]
    fn test_value_tree_labels_keys_and_indices() {
        plain();
        let text = render(&Response::Value {
            path: "users".to_string(),
            value: json!([{"name": "Alice"}, 2]),
        });
        assert_eq!(
            text,
            "users:\n    0:\n        name: \"Alice\"\n    1: 2"
        );
    }

    #[test]
    fn test_leaf_value_renders_inline() {
        plain();
        let text = render(&Response::Value {
            path: "users.0.name".to_string(),
            value: json!("Alice"),
        });
        assert_eq!(text, "users.0.name: \"Alice\"");
    }

    #[test]
    fn test_highlight_preserves_original_case() {
        plain();
        let text = highlight_term("UserName", "username", |s| s.to_string());
        assert_eq!(text, "UserName");

        let partial = highlight_term("a.name.b", "name", |s| s.to_string());
        assert_eq!(partial, "a.name.b");
    }

    #[test]
    fn test_highlight_when_folding_changes_byte_lengths() {
        plain();
        // İ folds one byte longer, ẞ one byte shorter; offsets into the
        // folded text no longer line up with the original
        let text = highlight_term("İẞ", "ẞ", |s| s.to_string());
        assert_eq!(text, "İẞ");

        let text = highlight_term("aİẞb", "aİ", |s| s.to_string());
        assert_eq!(text, "aİẞb");

        // a match inside one folded character widens to that character
        let text = highlight_term("İx", "i", |s| s.to_string());
        assert_eq!(text, "İx");
    }

    #[test]
    fn test_match_block_layout() {
        plain();
        let text = render(&Response::Matches {
            term: "err".to_string(),
            matches: vec![SearchMatch {
                path: "a.b".to_string(),
                tag: "b".to_string(),
                value: "error".to_string(),
            }],
        });
        assert_eq!(text, "Path: a.b\nTag: b\nValue: error");
    }

    #[test]
    fn test_help_lists_every_command() {
        plain();
        let text = render(&Response::Help);
        for name in ["/f", "/F", "/k", "/ks", "/kl", "/p", "/h", "??", "%"] {
            assert!(text.contains(name), "help is missing {name}");
        }
    }
}
