//! Durable command, search and browsing history.
//!
//! Each history type lives in its own append-only text file. Reads fold the
//! file into a deduplicated list capped at the configured maximum, and
//! `HistoryStore::cleanup` compacts every file to that folded form.

mod entry;
mod file_store;
mod store;

#[cfg(test)]
mod tests;

pub use entry::{Entry, HistoryType};
pub use file_store::{FileStore, LocalFileStore};
pub use store::{HistoryConfig, HistoryFiles, HistoryStore, InputKind};

/// Ordered entries handed to completion, at most `history_max` long.
pub type CandidateList = Vec<Entry>;
