//! Tab completion over commands and paths
//!
//! The engine itself is one pure function over the input buffer and an
//! index snapshot; the [`BrowseHelper`] at the bottom wires it into
//! rustyline.

use std::sync::Arc;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::commands::CommandRegistry;
use crate::index::PathIndex;
use crate::path::JsonPath;

/// Outcome of one completion event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matched; leave the buffer alone
    NoMatch,
    /// Exactly one candidate; replaces the buffer
    Single(String),
    /// Several candidates share a common lead
    Ambiguous {
        /// Longest common prefix among the candidates
        prefix: String,
        /// Every matching candidate, in index or table order
        candidates: Vec<String>,
    },
}

/// Propose completions for `buffer`.
///
/// An empty buffer, or one opening with a command character (`/`, `?`,
/// `%`), completes against the command vocabulary. Anything else is taken
/// as a partial path: the text up to the last `.` names the parent, and
/// the remainder filters the parent's children by their final segment.
pub fn complete(buffer: &str, index: &PathIndex, registry: &CommandRegistry) -> Completion {
    let candidates = if buffer.is_empty() || buffer.starts_with(['/', '?', '%']) {
        registry
            .get_completions(buffer)
            .iter()
            .map(|info| info.name.to_string())
            .collect()
    } else {
        path_candidates(buffer, index)
    };

    match candidates.len() {
        0 => Completion::NoMatch,
        1 => Completion::Single(candidates.into_iter().next().unwrap_or_default()),
        _ => Completion::Ambiguous {
            prefix: longest_common_prefix(&candidates),
            candidates,
        },
    }
}

/// Full rendered paths of every child of the buffer's parent whose final
/// segment starts with the partial last token.
fn path_candidates(buffer: &str, index: &PathIndex) -> Vec<String> {
    let (parent_text, partial) = match buffer.rfind('.') {
        Some(dot) => (&buffer[..dot], &buffer[dot + 1..]),
        None => ("", buffer),
    };
    let Ok(parent) = JsonPath::parse(parent_text) else {
        return Vec::new();
    };
    index
        .child_entries(&parent)
        .into_iter()
        .filter(|entry| {
            entry
                .path
                .last()
                .is_some_and(|segment| segment.to_string().starts_with(partial))
        })
        .map(|entry| entry.text.clone())
        .collect()
}

fn longest_common_prefix(candidates: &[String]) -> String {
    let Some(first) = candidates.first() else {
        return String::new();
    };
    let mut prefix = first.clone();
    for other in &candidates[1..] {
        let shared = prefix
            .chars()
            .zip(other.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let end = prefix
            .char_indices()
            .nth(shared)
            .map(|(at, _)| at)
            .unwrap_or(prefix.len());
        prefix.truncate(end);
    }
    prefix
}

/// Helper for rustyline with tab completion over commands and paths
pub struct BrowseHelper {
    index: Arc<PathIndex>,
    registry: CommandRegistry,
}

impl BrowseHelper {
    /// Bind the helper to a snapshot of the path index.
    pub fn new(index: Arc<PathIndex>) -> Self {
        Self {
            index,
            registry: CommandRegistry::new(),
        }
    }

    fn pair_for(&self, candidate: String) -> Pair {
        // Command candidates show their help text next to the name
        let display = match self.registry.get_command(&candidate) {
            Some(info) => format!("{:<4} {}", info.name, info.summary.yellow()),
            None => candidate.clone(),
        };
        Pair {
            display,
            replacement: candidate,
        }
    }
}

impl Completer for BrowseHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let buffer = &line[..pos];
        let pairs = match complete(buffer, &self.index, &self.registry) {
            Completion::NoMatch => Vec::new(),
            Completion::Single(candidate) => vec![self.pair_for(candidate)],
            Completion::Ambiguous { candidates, .. } => candidates
                .into_iter()
                .map(|candidate| self.pair_for(candidate))
                .collect(),
        };
        // Candidates are full replacements, so completion starts at column 0
        Ok((0, pairs))
    }
}

impl Hinter for BrowseHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }

        // Ghost-text the rest of a unique completion
        if let Completion::Single(full) = complete(line, &self.index, &self.registry) {
            if full.len() > line.len() && full.starts_with(line) {
                return Some(full[line.len()..].to_string());
            }
        }

        // After a complete command word, remind what it does
        if line.ends_with(' ') {
            if let Some(info) = self.registry.get_command(line.trim_end()) {
                return Some(format!(" # {}", info.summary));
            }
        }

        None
    }
}

impl Highlighter for BrowseHelper {}

impl Validator for BrowseHelper {}

impl Helper for BrowseHelper {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup(doc: serde_json::Value) -> (PathIndex, CommandRegistry) {
        (PathIndex::build(&doc), CommandRegistry::new())
    }

    #[test]
    fn test_single_path_candidate() {
        let (index, registry) = setup(json!({"users": [1, 2]}));
        assert_eq!(
            complete("us", &index, &registry),
            Completion::Single("users".to_string())
        );
    }

    #[test]
    fn test_ambiguous_reports_common_prefix() {
        let (index, registry) = setup(json!({"users": [], "uid": 1}));
        match complete("u", &index, &registry) {
            Completion::Ambiguous { prefix, candidates } => {
                assert_eq!(prefix, "u");
                assert_eq!(candidates, ["users", "uid"]);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_path_completion() {
        let (index, registry) = setup(json!({"users": [{"name": "a", "nick": "b"}]}));
        assert_eq!(
            complete("users.0.na", &index, &registry),
            Completion::Single("users.0.name".to_string())
        );
        match complete("users.0.n", &index, &registry) {
            Completion::Ambiguous { prefix, candidates } => {
                assert_eq!(prefix, "users.0.n");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_command_completion() {
        let (index, registry) = setup(json!({}));
        match complete("/k", &index, &registry) {
            Completion::Ambiguous { prefix, candidates } => {
                assert_eq!(prefix, "/k");
                assert_eq!(candidates, ["/k", "/ks", "/kl"]);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
        assert_eq!(
            complete("/p", &index, &registry),
            Completion::Single("/p".to_string())
        );
    }

    #[test]
    fn test_empty_buffer_offers_every_command() {
        let (index, registry) = setup(json!({"a": 1}));
        match complete("", &index, &registry) {
            Completion::Ambiguous { candidates, .. } => {
                assert_eq!(candidates.len(), registry.all().len());
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match_cases() {
        let (index, registry) = setup(json!({"users": []}));
        assert_eq!(complete("zzz", &index, &registry), Completion::NoMatch);
        // parent path does not resolve
        assert_eq!(
            complete("ghost.x", &index, &registry),
            Completion::NoMatch
        );
        // malformed parent
        assert_eq!(
            complete("a..b.c", &index, &registry),
            Completion::NoMatch
        );
    }

    #[test]
    fn test_completion_is_read_only() {
        let (index, registry) = setup(json!({"users": [1]}));
        let before = index.len();
        let _ = complete("users.", &index, &registry);
        let _ = complete("/k", &index, &registry);
        assert_eq!(index.len(), before);
    }
}
