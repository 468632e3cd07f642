use mosaic_document::SiteDocument;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Opaque version token: the store's content hash for the document file.
///
/// Carried from `read` to the next `write` for optimistic concurrency;
/// never inspected, never synthesized by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionToken(pub(crate) String);

impl VersionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for VersionToken {
    fn from(sha: String) -> Self {
        Self(sha)
    }
}

impl From<&str> for VersionToken {
    fn from(sha: &str) -> Self {
        Self(sha.to_string())
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document store abstraction.
///
/// `read` fetches and decodes the whole document plus its current version
/// token. `write` submits the whole mutated document conditioned on the
/// token still matching; a stale token fails with
/// [`StoreError::Conflict`] and the caller must re-read before retrying.
pub trait DocumentStore {
    fn read(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<(SiteDocument, VersionToken), StoreError>> + Send;

    fn write(
        &self,
        path: &str,
        document: &SiteDocument,
        token: &VersionToken,
    ) -> impl std::future::Future<Output = Result<VersionToken, StoreError>> + Send;
}
