//! Interactive session loop: classify input, dispatch, render
//!
//! One line of input per cycle. Classification precedence: the exit token,
//! then the expansion forms, then slash commands, then a trailing-`?`
//! prefix expansion, and finally a bare path. Nothing a user types can end
//! the loop except `%` or end of input.

use std::path::PathBuf;
use std::process::ExitCode;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{Config, EditMode, Editor};
use tracing::debug;

use crate::commands::CommandRegistry;
use crate::complete::BrowseHelper;
use crate::error::{BrowseError, Result};
use crate::output;
use crate::query::{self, Response};
use crate::session::SessionState;

/// One classified line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `%`
    Exit,
    /// `/h`
    Help,
    /// `?`
    ExpandTop,
    /// `??`
    ExpandAll,
    /// `?.?` and longer chains; the payload is the number of levels
    ExpandDepth(usize),
    /// `PREFIX?`
    ExpandPrefix(String),
    /// `/f WORD` and `/F WORD`
    Filter {
        /// Substring to match against rendered paths
        word: String,
        /// True for `/F`
        case_sensitive: bool,
    },
    /// `/k TERM`
    Search(String),
    /// `/ks`
    Save,
    /// `/kl`
    ListSaved,
    /// `/p PATH`
    Print(String),
    /// Anything else: a bare path
    Inspect(String),
}

/// Classify one trimmed, non-empty input line.
pub fn classify(line: &str) -> Result<Request> {
    if line == "%" {
        return Ok(Request::Exit);
    }
    if line == "?" {
        return Ok(Request::ExpandTop);
    }
    if line == "??" {
        return Ok(Request::ExpandAll);
    }
    if let Some(levels) = question_chain(line) {
        return Ok(Request::ExpandDepth(levels));
    }
    if line.starts_with('/') {
        return classify_command(line);
    }
    if let Some(prefix) = line.strip_suffix('?') {
        return Ok(Request::ExpandPrefix(prefix.to_string()));
    }
    Ok(Request::Inspect(line.to_string()))
}

/// `?.?`, `?.?.?`, … — every dot-separated token is `?`; the level count
/// is the number of tokens. Bare `?` and `??` are handled before this.
fn question_chain(line: &str) -> Option<usize> {
    if !line.contains('.') {
        return None;
    }
    let mut levels = 0;
    for token in line.split('.') {
        if token != "?" {
            return None;
        }
        levels += 1;
    }
    Some(levels)
}

fn classify_command(line: &str) -> Result<Request> {
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let registry = CommandRegistry::new();
    let Some(info) = registry.get_command(name) else {
        return Err(BrowseError::UnknownCommand(name.to_string()));
    };
    if info.takes_arg == arg.is_empty() {
        return Err(BrowseError::WrongArity {
            cmd: name.to_string(),
            usage: info.usage.to_string(),
        });
    }
    Ok(match name {
        "/h" => Request::Help,
        "/f" => Request::Filter {
            word: arg.to_string(),
            case_sensitive: false,
        },
        "/F" => Request::Filter {
            word: arg.to_string(),
            case_sensitive: true,
        },
        "/k" => Request::Search(arg.to_string()),
        "/ks" => Request::Save,
        "/kl" => Request::ListSaved,
        "/p" => Request::Print(arg.to_string()),
        other => return Err(BrowseError::UnknownCommand(other.to_string())),
    })
}

/// Route a classified request to the query engine.
pub fn execute(state: &mut SessionState, request: Request) -> Result<Response> {
    debug!(?request, "dispatch");
    Ok(match request {
        Request::Exit => Response::Bye,
        Request::Help => Response::Help,
        Request::ExpandTop => query::expand_top(state),
        Request::ExpandAll => query::expand_all(state),
        Request::ExpandDepth(levels) => query::expand_depth(state, levels),
        Request::ExpandPrefix(prefix) => query::expand_prefix(state, &prefix)?,
        Request::Filter {
            word,
            case_sensitive,
        } => query::filter_paths(state, &word, case_sensitive),
        Request::Search(term) => query::search_values(state, &term),
        Request::Save => query::save_results(state),
        Request::ListSaved => query::list_saved(state),
        Request::Print(path) => query::print_value(state, &path)?,
        Request::Inspect(path) => query::inspect(state, &path)?,
    })
}

/// Classify, execute, and print one line. Returns `false` once the session
/// should end; errors are rendered and never propagate.
pub fn run_line(state: &mut SessionState, line: &str) -> bool {
    match classify(line).and_then(|request| execute(state, request)) {
        Ok(Response::Bye) => {
            println!("{}", output::render(&Response::Bye));
            false
        }
        Ok(response) => {
            println!("{}", output::render(&response));
            true
        }
        Err(err) => {
            println!("{}", output::render_error(&err));
            true
        }
    }
}

/// Interactive REPL over one loaded document
pub struct Repl {
    state: SessionState,
    editor: Editor<BrowseHelper, FileHistory>,
}

impl Repl {
    /// Create a REPL over `state` with completion bound to its index.
    pub fn new(state: SessionState) -> rustyline::Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .edit_mode(EditMode::Emacs)
            .build();

        let helper = BrowseHelper::new(state.index_handle());
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(helper));
        let _ = editor.load_history(&history_path());

        Ok(Self { state, editor })
    }

    /// Run the loop until `%` or end of input.
    pub fn run(&mut self) -> ExitCode {
        println!(
            "Browsing {} ({} paths)",
            self.state.source_name().cyan(),
            self.state.index().len().to_string().cyan()
        );
        println!("{}", output::render(&Response::Help));
        println!();

        let prompt = format!("jaybro:{}> ", self.state.source_name());

        loop {
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);
                    if !run_line(&mut self.state, line) {
                        self.save_history();
                        return ExitCode::SUCCESS;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    self.save_history();
                    return ExitCode::SUCCESS;
                }
                Err(e) => {
                    eprintln!("{}: {}", "Readline error".red(), e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    fn save_history(&mut self) {
        let _ = self.editor.save_history(&history_path());
    }
}

fn history_path() -> PathBuf {
    home_dir()
        .map(|p| p.join(".jaybro_history"))
        .unwrap_or_else(|| ".jaybro_history".into())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
