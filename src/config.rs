//! Runtime configuration.
//!
//! Values come from `<config_dir>/histnav/config.toml` when present and can
//! be overridden with `HISTNAV_HISTORY_MAX` and `HISTNAV_DIR`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use crate::history::{HistoryConfig, HistoryFiles};

pub const DEFAULT_HISTORY_MAX: i64 = 2000;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub history_max: Option<i64>,
    pub dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Distinct entries kept per history type; `<= 0` turns history off.
    pub history_max: i64,
    /// Directory holding the history files.
    pub dir: PathBuf,
}

impl Config {
    pub fn from_env_and_file() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) if path.exists() => Some(Self::read_file(&path)?),
            _ => None,
        };
        Self::resolve(file, |key| env::var(key).ok())
    }

    pub fn read_file(path: &Path) -> Result<ConfigFile> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse config file: {}", path.display()))
    }

    /// Merge defaults, the config file and environment lookups, in that order.
    pub fn resolve(file: Option<ConfigFile>, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let mut history_max = file.history_max.unwrap_or(DEFAULT_HISTORY_MAX);
        let mut dir = file.dir.unwrap_or_else(Self::default_dir);

        if let Some(raw) = var("HISTNAV_HISTORY_MAX") {
            history_max = raw
                .trim()
                .parse()
                .with_context(|| format!("HISTNAV_HISTORY_MAX is not an integer: {:?}", raw))?;
        }
        if let Some(raw) = var("HISTNAV_DIR").filter(|d| !d.is_empty()) {
            dir = PathBuf::from(raw);
        }

        Ok(Config { history_max, dir })
    }

    pub fn history_files(&self) -> HistoryFiles {
        HistoryFiles::in_dir(&self.dir)
    }

    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig::new(self.history_max, self.history_files())
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("histnav").join("config.toml"))
    }

    fn default_dir() -> PathBuf {
        BaseDirs::new()
            .map(|base| base.data_dir().join("histnav"))
            .unwrap_or_else(|| PathBuf::from(".histnav"))
    }
}
