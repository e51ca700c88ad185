//! histnav - persistent command, search and browsing history with completion
//!
//! This library provides:
//! - A history store that appends entries per history type, loads them
//!   deduplicated and capped, and compacts the backing files under a lock
//! - Candidate list building and term filtering for interactive completion
//! - A cyclic navigator that steps a selection through completion candidates
//!
//! # Example
//!
//! ```no_run
//! use histnav::completion::{self, Direction, Navigator, Selection};
//! use histnav::history::{HistoryConfig, HistoryFiles, HistoryStore, HistoryType};
//!
//! let files = HistoryFiles::in_dir(std::path::Path::new("/tmp/histnav"));
//! let store = HistoryStore::new(HistoryConfig::new(2000, files));
//!
//! store.add(HistoryType::Url, "https://www.rust-lang.org", Some("Rust")).unwrap();
//!
//! let all = completion::candidates(&store, HistoryType::Url);
//! let visible: Vec<_> = completion::filter(&all, "rust").into_iter().cloned().collect();
//!
//! let mut nav = Navigator::new();
//! nav.start(visible, "rust", |selection: Selection<'_, _>| {
//!     println!("{:?}", selection);
//! }, Direction::Forward);
//! nav.next(Direction::Forward);
//!
//! // compact on shutdown
//! store.cleanup();
//! ```

pub mod app;
pub mod completion;
pub mod config;
pub mod error;
pub mod history;
pub mod utils;

// Re-export commonly used types
pub use completion::{Direction, Navigator, Selection};
pub use config::Config;
pub use error::HistoryError;
pub use history::{CandidateList, Entry, HistoryConfig, HistoryFiles, HistoryStore, HistoryType};
