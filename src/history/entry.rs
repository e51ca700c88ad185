//! History records and their on-disk line format.
//!
//! Each history file holds one record per line: the primary value, optionally
//! followed by a tab and a secondary label. Values are written verbatim, so a
//! tab or newline inside a value breaks the record on the next load.
//!
//! Parsing trims each whole line, so leading and trailing whitespace of a
//! record does not survive a load. A value added as `"  ls "` is read back as
//! `ls`, and cleanup writes it back in that trimmed form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// The kinds of history kept side by side, each in its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryType {
    Command,
    Search,
    Url,
}

impl HistoryType {
    /// All history types, in cleanup order.
    pub const ALL: [HistoryType; 3] = [HistoryType::Command, HistoryType::Search, HistoryType::Url];

    pub fn name(self) -> &'static str {
        match self {
            HistoryType::Command => "command",
            HistoryType::Search => "search",
            HistoryType::Url => "url",
        }
    }
}

impl fmt::Display for HistoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HistoryType {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "command" => Ok(HistoryType::Command),
            "search" => Ok(HistoryType::Search),
            "url" => Ok(HistoryType::Url),
            other => Err(HistoryError::UnknownHistoryType(other.to_string())),
        }
    }
}

/// A single history record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// URI, command text or search term.
    pub primary: String,
    /// Optional label, e.g. a page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl Entry {
    pub fn new(primary: impl Into<String>, secondary: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary,
        }
    }

    /// Parse one line of a history file.
    /// Blank lines yield `None`; a line without a tab has no secondary.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (primary, secondary) = match line.split_once('\t') {
            Some((primary, secondary)) => (primary, Some(secondary)),
            None => (line, None),
        };

        Some(Self {
            primary: primary.to_string(),
            secondary: secondary.filter(|s| !s.is_empty()).map(str::to_string),
        })
    }

    /// Render the record without the trailing newline.
    pub fn to_line(&self) -> String {
        format_record(&self.primary, self.secondary.as_deref())
    }
}

pub(crate) fn format_record(primary: &str, secondary: Option<&str>) -> String {
    match secondary {
        Some(secondary) => format!("{}\t{}", primary, secondary),
        None => primary.to_string(),
    }
}
