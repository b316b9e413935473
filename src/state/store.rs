use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::schema::WalletState;
use crate::error::AppResult;

/// JSON file holding the persisted [`WalletState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    state_path: PathBuf,
}

impl StateStore {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    /// Load the wallet state, or the default state if nothing is stored yet.
    pub fn load(&self) -> AppResult<WalletState> {
        match fs::read_to_string(&self.state_path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.state_path.display(), "No stored wallet state");
                Ok(WalletState::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the wallet state.
    ///
    /// Writes a temporary sibling and renames it over the target, so a crash
    /// never leaves a half-written record.
    pub fn save(&self, state: &WalletState) -> AppResult<()> {
        if let Some(dir) = self.state_path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let data = serde_json::to_string_pretty(state)?;
        let tmp_path = self.state_path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.state_path)?;

        debug!(path = %self.state_path.display(), "Wallet state saved");
        Ok(())
    }

    /// Delete the stored record. Missing files are not an error.
    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.state_path) {
            Ok(()) => {
                info!(path = %self.state_path.display(), "Wallet state deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self) -> bool {
        self.state_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.state_path
    }
}
