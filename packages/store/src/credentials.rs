//! Session credentials: store coordinates plus the bearer token.
//!
//! These are session configuration, never part of the persisted document
//! (locating the document must not require the document). They persist
//! client-side across sessions; an invalid stored credential only
//! surfaces as a failed first load, at which point the caller discards
//! the file and asks the user again.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub owner: String,
    pub repo: String,
    pub token: String,
}

impl Credentials {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        }
    }

    /// Load previously saved credentials; `None` when none were saved.
    pub fn load(path: &Path) -> Result<Option<Self>, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let creds = serde_json::from_str(&json)
                    .map_err(|e: serde_json::Error| StoreError::Decode(e.to_string()))?;
                Ok(Some(creds))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Forget stored credentials, e.g. after an auth failure on first load.
    pub fn discard(path: &Path) -> Result<(), StoreError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
