//! # jaybro
//!
//! An interactive terminal browser for JSON documents. A document is loaded
//! and indexed once; every value in it gets a canonical dotted path
//! (`users.0.name`), and the session lets you expand, filter, and search
//! that address space with tab completion over paths and commands.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`path`] | Path model: segments, parsing, rendering, resolution |
//! | [`index`] | Flat index of every path, built once at load |
//! | [`query`] | Expansion, filtering, value search, save/list, print |
//! | [`session`] | Session state: document, index, saved result sets |
//! | [`commands`] | Fixed command vocabulary |
//! | [`complete`] | Completion engine and rustyline helper |
//! | [`repl`] | Input classification, dispatch, interactive loop |
//! | [`output`] | Styled rendering of query responses |
//! | [`error`] | Error types |

pub mod commands;
pub mod complete;
pub mod error;
pub mod index;
pub mod output;
pub mod path;
pub mod query;
pub mod repl;
pub mod session;

pub use complete::{complete, Completion};
pub use error::{BrowseError, Result};
pub use index::{PathEntry, PathIndex};
pub use path::{JsonPath, Segment, ValueKind};
pub use query::Response;
pub use repl::{classify, execute, Repl, Request};
pub use session::{ResultSet, SearchMatch, SessionState};
