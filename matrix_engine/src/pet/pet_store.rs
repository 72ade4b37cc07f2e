/// PetStore - loads, throttles and atomically writes the pet state file

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::{engine_debug, engine_info};
use super::pet_state::{PetState, PET_STATE_SIZE};

pub const DEFAULT_PET_STATE_PATH: &str = "matrix_cat.data";

/// Minimum time between periodic saves
pub const SAVE_THRESHOLD_SECS: f64 = 100.0;

/// Current wall-clock time as unix seconds
pub fn unix_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[derive(Debug)]
pub struct PetStore {
    path: PathBuf,
    state: PetState,
    last_save: f64,
}

impl PetStore {
    /// Load the state file, creating it with defaults when missing
    ///
    /// A short file keeps the defaults for every field it does not fully
    /// contain.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file exists but cannot be read, or if a
    /// missing file cannot be created.
    pub fn load(path: impl Into<PathBuf>, now: f64) -> Result<Self> {
        let path = path.into();
        let mut store = Self {
            path,
            state: PetState::new(now),
            last_save: now,
        };

        match fs::read(&store.path) {
            Ok(bytes) => {
                let applied = store.state.apply_bytes(&bytes);
                if applied < PET_STATE_SIZE {
                    engine_info!("matrix::PetStore",
                        "Pet state '{}' is short ({} bytes), keeping defaults for the rest",
                        store.path.display(), bytes.len());
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                engine_info!("matrix::PetStore",
                    "No pet state at '{}', writing defaults", store.path.display());
                store.save(now)?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PetState {
        &mut self.state
    }

    pub fn save_due(&self, now: f64) -> bool {
        now - self.last_save >= SAVE_THRESHOLD_SECS
    }

    /// Save if the threshold has elapsed since the last save
    pub fn save_if_due(&mut self, now: f64) -> Result<bool> {
        if !self.save_due(now) {
            return Ok(false);
        }
        self.save(now)?;
        Ok(true)
    }

    /// Write the state to a temporary sibling, then rename it over the file
    pub fn save(&mut self, now: f64) -> Result<()> {
        self.state.last_update = now;

        let mut tmp_name = OsString::from(self.path.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, self.state.to_bytes())?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            // Best effort; the rename error is what matters
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        self.last_save = now;
        engine_debug!("matrix::PetStore", "Saved pet state to '{}'", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "pet_store_tests.rs"]
mod tests;
