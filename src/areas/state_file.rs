//! Whole-state persistence
//!
//! The repository state lives in `.bitlet/state.json`. A command takes an
//! exclusive lock on `.bitlet/LOCK`, loads the state, and on success writes
//! it back through a temporary file that is renamed over the old one, so a
//! crash never leaves a half-written state behind.

use crate::areas::state::RepositoryState;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use fake::rand;
use file_guard::{FileGuard, Lock};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const STATE_FILE_NAME: &str = "state.json";
pub const LOCK_FILE_NAME: &str = "LOCK";

#[derive(Debug)]
pub struct StateFile {
    /// Path to the repository directory (typically `.bitlet`)
    path: Box<Path>,
}

impl StateFile {
    pub fn new(path: Box<Path>) -> Self {
        StateFile { path }
    }

    pub fn state_path(&self) -> PathBuf {
        self.path.join(STATE_FILE_NAME)
    }

    /// Hold the repository lock until the guard is dropped
    pub fn lock(&self) -> anyhow::Result<FileGuard<Box<File>>> {
        let lock_path = self.path.join(LOCK_FILE_NAME);
        let lock_file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("Unable to open lock file {}", lock_path.display()))?;

        file_guard::lock(Box::new(lock_file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("Unable to lock {}", lock_path.display()))
    }

    pub fn load(&self) -> Result<RepositoryState> {
        let state_path = self.state_path();
        if !state_path.is_file() {
            return Err(RepositoryError::NotInitialized);
        }

        let content = std::fs::read(&state_path)
            .with_context(|| format!("Unable to read {}", state_path.display()))?;
        let state = serde_json::from_slice::<RepositoryState>(&content)
            .map_err(|error| RepositoryError::CorruptState(error.to_string()))?;
        state.validate()?;

        tracing::debug!(path = %state_path.display(), "loaded repository state");

        Ok(state)
    }

    pub fn save(&self, state: &RepositoryState) -> Result<()> {
        let state_path = self.state_path();
        let temp_path = self.path.join(Self::generate_temp_name());

        let content = serde_json::to_vec_pretty(state).context("Unable to serialize state")?;
        let mut temp_file = File::create(&temp_path)
            .with_context(|| format!("Unable to create {}", temp_path.display()))?;
        temp_file.write_all(&content)?;
        temp_file.sync_all()?;

        std::fs::rename(&temp_path, &state_path).with_context(|| {
            format!(
                "Unable to move {} to {}",
                temp_path.display(),
                state_path.display()
            )
        })?;

        tracing::debug!(path = %state_path.display(), "saved repository state");

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-state-{}", rand::random::<u32>())
    }
}
