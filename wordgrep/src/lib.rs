//! Multi-threaded, recursive whole-word text search.
//!
//! Given a start directory and a list of search terms, the library walks
//! the directory tree and reports every line containing at least one term
//! as a standalone word (searching for `the` does not match `theme`).
//! Each file is searched by its own worker, with a counting [`Limiter`]
//! bounding how many run at once.
//!
//! ```no_run
//! use std::io;
//! use wordgrep::{search, MatchWriter, SearchConfig};
//!
//! fn main() -> wordgrep::SearchResult<()> {
//!     let config = SearchConfig {
//!         terms: vec!["the".to_string(), "cat".to_string()],
//!         ..SearchConfig::default()
//!     };
//!     let sink = MatchWriter::new(io::stdout());
//!     let summary = search(&config, &sink)?;
//!     eprintln!("{} matching lines", summary.lines_matched);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod limiter;
pub mod matcher;
pub mod results;
pub mod search;
pub mod searcher;
pub mod walker;

pub use config::{CaseMode, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use limiter::{Limiter, SlotGuard};
pub use matcher::WordMatcher;
pub use results::{MatchRecord, MatchWriter, RunStats, Summary};
pub use search::search;
pub use searcher::FileTask;
pub use walker::{classify, EntryKind};
