//! jaybro - Interactive terminal browser for JSON documents
//!
//! Loads one JSON document, indexes every path in it, then drops into an
//! interactive session with tab completion. Without a terminal it runs in
//! batch or one-shot mode instead.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{self, BufRead, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use jaybro::{repl, BrowseError, Repl, SessionState};

/// jaybro - Interactive terminal browser for JSON documents
#[derive(Parser, Debug)]
#[command(name = "jaybro")]
#[command(author, version, about = "Interactive terminal browser for JSON documents")]
struct Args {
    /// Path to the JSON file to browse (omit to read the document from a
    /// pipe; with piped input, a first argument that is not an existing
    /// file is taken as a command instead)
    json_file: Option<PathBuf>,

    /// Log level when RUST_LOG is unset: trace, debug, info, warn, error
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Commands to execute (non-interactive mode)
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let mut args = Args::parse();
    reroute_command_word(&mut args, atty::is(atty::Stream::Stdin));

    if args.no_color {
        colored::control::set_override(false);
    }
    init_logging(&args.log_level);

    let mut state = match load_document(&args) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}: {}", "Startup failed".red(), e);
            return ExitCode::FAILURE;
        }
    };

    // Non-interactive mode: execute one command line and exit
    if !args.command.is_empty() {
        let line = args.command.join(" ");
        repl::run_line(&mut state, line.trim());
        return ExitCode::SUCCESS;
    }

    if atty::is(atty::Stream::Stdin) {
        // Interactive REPL mode
        let mut session = match Repl::new(state) {
            Ok(session) => session,
            Err(e) => {
                eprintln!("{}: {}", "Failed to initialize REPL".red(), e);
                return ExitCode::FAILURE;
            }
        };
        session.run()
    } else {
        // Pipe/batch mode: read command lines from stdin
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(cmd_line) => {
                    let cmd_line = cmd_line.trim();
                    if cmd_line.is_empty() || cmd_line.starts_with('#') {
                        continue;
                    }
                    if !repl::run_line(&mut state, cmd_line) {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}", "Read error".red(), e);
                    return ExitCode::FAILURE;
                }
            }
        }
        ExitCode::SUCCESS
    }
}

/// When the document arrives on a pipe, the file positional would swallow
/// the first one-shot command word (`echo '{}' | jaybro "?"`). A first
/// argument that cannot be a file in that situation is a command.
fn reroute_command_word(args: &mut Args, stdin_is_tty: bool) {
    let Some(ref file) = args.json_file else {
        return;
    };
    if !stdin_is_tty && !file.exists() {
        args.command.insert(0, file.display().to_string());
        args.json_file = None;
    }
}

/// The document comes from the file argument when given, else from piped
/// stdin. With neither, there is nothing to browse.
fn load_document(args: &Args) -> jaybro::Result<SessionState> {
    if let Some(ref file) = args.json_file {
        return SessionState::from_file(file);
    }
    if !atty::is(atty::Stream::Stdin) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| BrowseError::DocumentLoad {
                path: "stdin".to_string(),
                source,
            })?;
        let document = serde_json::from_str(&text)?;
        return Ok(SessionState::new(document, "stdin"));
    }
    Err(BrowseError::DocumentLoad {
        path: "stdin".to_string(),
        source: io::Error::new(
            io::ErrorKind::InvalidInput,
            "no JSON file provided and no piped input detected",
        ),
    })
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so they never interleave with browse output
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
