//! Persistent, deduplicated history per history type.
//!
//! New records are appended as they come and may repeat. Reading a file
//! collapses repeats (first occurrence wins, oldest to newest) and caps the
//! result at `history_max`; `cleanup` writes that collapsed form back.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::error::{HistoryError, Result};

use super::CandidateList;
use super::entry::{Entry, HistoryType, format_record};
use super::file_store::{FileStore, LocalFileStore};

/// Explicit mapping from history type to its backing file.
#[derive(Clone, Debug, Default)]
pub struct HistoryFiles {
    paths: HashMap<HistoryType, PathBuf>,
}

impl HistoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default layout: `command`, `search` and `history` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new()
            .with(HistoryType::Command, dir.join("command"))
            .with(HistoryType::Search, dir.join("search"))
            .with(HistoryType::Url, dir.join("history"))
    }

    pub fn with(mut self, ty: HistoryType, path: impl Into<PathBuf>) -> Self {
        self.insert(ty, path);
        self
    }

    pub fn insert(&mut self, ty: HistoryType, path: impl Into<PathBuf>) {
        self.paths.insert(ty, path.into());
    }

    pub fn get(&self, ty: HistoryType) -> Option<&Path> {
        self.paths.get(&ty).map(PathBuf::as_path)
    }
}

/// Everything the store needs to know, built once by the caller.
#[derive(Clone, Debug)]
pub struct HistoryConfig {
    /// Maximum number of distinct entries kept per type.
    /// Zero or negative disables history writes altogether.
    pub history_max: i64,
    pub files: HistoryFiles,
}

impl HistoryConfig {
    pub fn new(history_max: i64, files: HistoryFiles) -> Self {
        Self { history_max, files }
    }

    /// The entry cap, or `None` when history is disabled.
    pub fn capacity(&self) -> Option<usize> {
        if self.history_max <= 0 {
            return None;
        }
        Some(usize::try_from(self.history_max).unwrap_or(usize::MAX))
    }
}

/// The input mode a history lookup is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Command,
    SearchForward,
    SearchBackward,
    Open,
}

impl InputKind {
    /// The history backing inline stepping for this input mode, if any.
    pub fn history_type(self) -> Option<HistoryType> {
        match self {
            InputKind::Command => Some(HistoryType::Command),
            InputKind::SearchForward | InputKind::SearchBackward => Some(HistoryType::Search),
            InputKind::Open => None,
        }
    }
}

impl FromStr for InputKind {
    type Err = HistoryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "command" => Ok(InputKind::Command),
            "search" | "search-forward" => Ok(InputKind::SearchForward),
            "search-backward" => Ok(InputKind::SearchBackward),
            "open" => Ok(InputKind::Open),
            other => Err(HistoryError::UnknownInputKind(other.to_string())),
        }
    }
}

pub struct HistoryStore<S: FileStore = LocalFileStore> {
    config: HistoryConfig,
    files: S,
}

impl HistoryStore<LocalFileStore> {
    pub fn new(config: HistoryConfig) -> Self {
        Self::with_file_store(config, LocalFileStore)
    }
}

impl<S: FileStore> HistoryStore<S> {
    pub fn with_file_store(config: HistoryConfig, files: S) -> Self {
        Self { config, files }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.capacity().is_some()
    }

    /// Append a record to the end of the history file for `ty`.
    ///
    /// Records are not checked against existing ones here; repeats are folded
    /// on the next load or cleanup. Does nothing while history is disabled.
    pub fn add(&self, ty: HistoryType, value: &str, additional: Option<&str>) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        if value.is_empty() {
            debug!("Ignoring empty {} history value", ty);
            return Ok(());
        }
        let Some(path) = self.config.files.get(ty) else {
            debug!("No file configured for {} history", ty);
            return Ok(());
        };

        let mut record = format_record(value, additional);
        record.push('\n');
        self.files
            .append(path, &record)
            .map_err(|e| HistoryError::io(path, e))?;
        debug!("Appended {} history entry to {}", ty, path.display());
        Ok(())
    }

    /// Deduplicated, capped entries for `ty`, oldest first.
    /// An unreadable or missing file reads as empty history.
    pub fn load(&self, ty: HistoryType) -> CandidateList {
        match self.read_entries(ty) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read {} history: {}", ty, e);
                Vec::new()
            }
        }
    }

    /// Rewrite every history file to its deduplicated, capped form.
    ///
    /// Each file is read and rewritten under one exclusive lock. A type whose
    /// file cannot be opened is skipped and keeps its current content; the
    /// remaining types are still compacted.
    pub fn cleanup(&self) {
        let Some(cap) = self.config.capacity() else {
            return;
        };

        for ty in HistoryType::ALL {
            let Some(path) = self.config.files.get(ty) else {
                continue;
            };

            let mut kept = 0;
            let result = self.files.compact_locked(path, &mut |content| {
                let entries = unique_entries(content, cap);
                kept = entries.len();
                render_entries(&entries)
            });

            match result {
                Ok(()) => info!("Compacted {} history to {} entries", ty, kept),
                Err(e) => warn!("Skipping cleanup of {}: {}", path.display(), e),
            }
        }
    }

    /// Values of `ty` starting with `query`, for stepping through history
    /// inline.
    ///
    /// The first element is always `query` itself so stepping past the
    /// oldest match lands back on what was typed. Matches follow newest
    /// first. Only command and search history take part; `Url` yields an
    /// empty list.
    pub fn get_list(&self, ty: HistoryType, query: &str) -> Vec<String> {
        if ty == HistoryType::Url {
            return Vec::new();
        }

        let mut list = vec![query.to_string()];
        list.extend(
            self.load(ty)
                .into_iter()
                .rev()
                .filter(|entry| entry.primary.starts_with(query))
                .map(|entry| entry.primary),
        );
        list
    }

    /// `get_list` for the history belonging to an input mode.
    pub fn get_list_for_input(&self, kind: InputKind, query: &str) -> Vec<String> {
        match kind.history_type() {
            Some(ty) => self.get_list(ty, query),
            None => Vec::new(),
        }
    }

    fn read_entries(&self, ty: HistoryType) -> io::Result<CandidateList> {
        let Some(cap) = self.config.capacity() else {
            return Ok(Vec::new());
        };
        let Some(path) = self.config.files.get(ty) else {
            return Ok(Vec::new());
        };
        let content = self.files.read_to_string(path)?;
        Ok(unique_entries(&content, cap))
    }
}

fn render_entries(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let mut line = entry.to_line();
            line.push('\n');
            line
        })
        .collect()
}

/// Collapse repeated primaries, keeping the first occurrence, and stop once
/// `cap` distinct entries were collected.
fn unique_entries(content: &str, cap: usize) -> CandidateList {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for entry in content.lines().filter_map(Entry::parse_line) {
        if entries.len() >= cap {
            break;
        }
        if seen.insert(entry.primary.clone()) {
            entries.push(entry);
        }
    }

    entries
}
