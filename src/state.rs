//! Watch cursor persistence
//!
//! The monitor remembers the highest response row it has handled in a small
//! JSON file, so restarts neither reprocess old rows nor miss new ones.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "watch_state.json";

/// Monitoring cursor. `last_processed_row` = 2 means nothing has been
/// handled yet (rows 1-2 are header/prior content).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchState {
    pub last_processed_row: u32,
}

impl Default for WatchState {
    fn default() -> Self {
        Self {
            last_processed_row: 2,
        }
    }
}

impl WatchState {
    pub fn path(state_dir: &Path) -> PathBuf {
        state_dir.join(STATE_FILE)
    }

    /// Load the cursor, falling back to the default when no file exists yet.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = Self::path(state_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let state = serde_json::from_str(&raw)?;
        Ok(state)
    }

    /// Persist the cursor, creating the state directory if needed.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(state_dir)?;
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::path(state_dir), raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cursor_is_header_boundary() {
        assert_eq!(WatchState::default().last_processed_row, 2);
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = WatchState::load(dir.path()).unwrap();
        assert_eq!(state, WatchState::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let state = WatchState {
            last_processed_row: 17,
        };

        state.save(dir.path()).unwrap();
        assert_eq!(WatchState::load(dir.path()).unwrap(), state);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("state");

        WatchState::default().save(&nested).unwrap();
        assert!(WatchState::path(&nested).exists());
    }
}
