//! In-memory store with the same compare-and-swap contract as the real
//! one. Backs the optimistic-concurrency tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use mosaic_document::SiteDocument;

use crate::client::{DocumentStore, VersionToken};
use crate::errors::StoreError;

#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, StoredFile>>,
}

struct StoredFile {
    json: String,
    sha: String,
}

fn content_sha(json: &str) -> String {
    let mut hasher = DefaultHasher::new();
    json.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an initial document at `path`, returning its version token.
    pub fn seed(
        &self,
        path: &str,
        document: &SiteDocument,
    ) -> Result<VersionToken, StoreError> {
        let json = document.to_json()?;
        let sha = content_sha(&json);
        self.files
            .lock()
            .expect("memory store poisoned")
            .insert(path.to_string(), StoredFile { json, sha: sha.clone() });
        Ok(VersionToken(sha))
    }

    /// The raw persisted JSON, for asserting that a rejected write did
    /// not mutate the store.
    pub fn raw(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .expect("memory store poisoned")
            .get(path)
            .map(|f| f.json.clone())
    }
}

impl DocumentStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<(SiteDocument, VersionToken), StoreError> {
        let files = self.files.lock().expect("memory store poisoned");
        let file = files
            .get(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        let document = SiteDocument::from_json(&file.json)?;
        Ok((document, VersionToken(file.sha.clone())))
    }

    async fn write(
        &self,
        path: &str,
        document: &SiteDocument,
        token: &VersionToken,
    ) -> Result<VersionToken, StoreError> {
        let mut files = self.files.lock().expect("memory store poisoned");
        let file = files
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        if file.sha != token.0 {
            return Err(StoreError::Conflict(format!(
                "{path} was updated by another writer"
            )));
        }

        file.json = document.to_json()?;
        file.sha = content_sha(&file.json);
        Ok(VersionToken(file.sha.clone()))
    }
}
