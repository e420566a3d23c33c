//! Persisted mode and phase-override state.
//!
//! The session persists an optional `{mode, phase}` pair through an
//! injected key-value store. Reads happen once at session start and writes
//! happen on every mode/override change. Storage failures are never
//! surfaced: the session swallows them and proceeds as if no state were
//! persisted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::prefs::ScheduleMode;
use crate::schedule::Phase;

/// Optional persisted `{mode, phase-override}` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub mode: Option<ScheduleMode>,
    pub phase: Option<Phase>,
}

/// Key-value persistence collaborator.
///
/// Implementations may fail freely; callers treat every failure as "no
/// persisted state".
pub trait StateStore: Send {
    fn load(&self, key: &str) -> Result<Option<PersistedState>>;
    fn save(&self, key: &str, state: &PersistedState) -> Result<()>;
    fn clear(&self, key: &str) -> Result<()>;
}

/// Store for persistence-disabled sessions: never holds anything.
#[derive(Debug, Default)]
pub struct NoopStore;

impl StateStore for NoopStore {
    fn load(&self, _key: &str) -> Result<Option<PersistedState>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _state: &PersistedState) -> Result<()> {
        Ok(())
    }

    fn clear(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// JSON file store under the user's state directory, one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `$XDG_STATE_HOME/circadia` (falling back to the
    /// data directory when the platform has no state directory).
    pub fn new() -> Result<Self> {
        let base = dirs::state_dir()
            .or_else(dirs::data_dir)
            .context("Could not determine a state directory for persisted preferences")?;
        Ok(Self {
            dir: base.join("circadia"),
        })
    }

    /// Store rooted at an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<PersistedState>> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read state from {}", path.display()));
            }
        };
        let state = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt persisted state in {}", path.display()))?;
        Ok(Some(state))
    }

    fn save(&self, key: &str, state: &PersistedState) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state directory {}", self.dir.display()))?;
        let path = self.path_for(key);
        let raw = serde_json::to_string(state).context("Failed to serialize persisted state")?;
        std::fs::write(&path, raw)
            .with_context(|| format!("Failed to write state to {}", path.display()))
    }

    fn clear(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove state at {}", path.display()))
            }
        }
    }
}

/// In-memory store for tests and embedders without a filesystem.
#[cfg(any(test, feature = "testing-support"))]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, PersistedState>>,
}

#[cfg(any(test, feature = "testing-support"))]
impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<PersistedState>> {
        Ok(self.entries.lock().unwrap().get(key).copied())
    }

    fn save(&self, key: &str, state: &PersistedState) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), *state);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
