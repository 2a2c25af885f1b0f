//! Local client state: the session id and the login flag, kept in a small
//! JSON file next to wherever the CLI runs.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] io::Error),
    #[error("store encode: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStore {
    pub session_id: String,
    #[serde(default)]
    pub authenticated: bool,
}

impl ClientStore {
    fn fresh() -> Self {
        Self { session_id: Uuid::new_v4().to_string(), authenticated: false }
    }

    /// Load the store at `path`, or create and persist a fresh one.
    ///
    /// A missing file, unreadable JSON or an empty session id all start a new
    /// session; the session id is otherwise reused unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if the new
    /// store cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self, StoreError> {
        let existing = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<Self>(&raw).ok(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        match existing {
            Some(store) if !store.session_id.trim().is_empty() => Ok(store),
            _ => {
                let store = Self::fresh();
                store.save(path)?;
                Ok(store)
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
