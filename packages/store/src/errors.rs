//! Store error taxonomy.
//!
//! Callers rely on the distinctions: `NotFound`/`Auth`/`Network` come out
//! of a read, `Conflict` out of a write with a stale token. None of these
//! are retried automatically.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("authentication rejected by the store")]
    Auth,

    #[error("stale version token: {0}")]
    Conflict(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("store error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("payload decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Document(#[from] mosaic_document::DocumentError),

    #[error("credential storage error: {0}")]
    Credentials(#[from] std::io::Error),
}
