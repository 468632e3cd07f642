//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("document error: {0}")]
    Document(#[from] mosaic_document::DocumentError),

    #[error("validation error: {0}")]
    Validation(#[from] mosaic_document::ValidationError),

    #[error("mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("store error: {0}")]
    Store(#[from] mosaic_store::StoreError),

    #[error("no document is loaded")]
    NotLoaded,

    #[error("unknown element: {0}")]
    UnknownElement(String),

    #[error("no element is selected")]
    NothingSelected,
}
