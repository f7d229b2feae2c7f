//! Database configuration loaded from TOML.
//!
//! ```toml
//! path = "app.db"
//! journal_mode = "wal"
//! foreign_keys = true
//! busy_timeout_ms = 5000
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::Result;

const MEMORY_PATH: &str = ":memory:";

/// SQLite journal modes accepted by `PRAGMA journal_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
            JournalMode::Off => "OFF",
        }
    }
}

/// How to open a [`crate::Database`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:` for a private in-memory database.
    pub path: PathBuf,

    /// Journal mode applied after opening. Left untouched when unset.
    pub journal_mode: Option<JournalMode>,

    /// Enables or disables foreign key enforcement.
    pub foreign_keys: Option<bool>,

    /// How long to wait on a locked database, in milliseconds.
    pub busy_timeout_ms: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            journal_mode: None,
            foreign_keys: None,
            busy_timeout_ms: None,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a file-backed database with default pragmas.
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn is_memory(&self) -> bool {
        self.path == Path::new(MEMORY_PATH)
    }
}
