//! # Mosaic Editor
//!
//! The editing half of the system: an [`EditorSession`] owns the
//! in-memory [`mosaic_document::SiteDocument`], the current selection,
//! the canvas mirror, and the last-known version token.
//!
//! All document changes flow through typed [`Mutation`]s, which validate
//! before applying and report the reconciliation the canvas owes:
//! structural changes rebuild, field-level changes patch the affected
//! node. The inspector form is generated from typed field descriptors per
//! element type. Saving runs the strictly user-triggered
//! `Idle → Saving → outcome → Idle` cycle against a
//! [`mosaic_store::DocumentStore`] under optimistic concurrency.

mod canvas;
mod errors;
mod inspector;
mod mutations;
mod save;
mod session;

pub use canvas::{CanvasColumn, CanvasNode, CanvasTree};
pub use errors::EditorError;
pub use inspector::{fields_for, value_of, FieldDescriptor, InputKind};
pub use mutations::{
    ColumnOrder, ContentField, FieldKey, FieldValue, Mutation, MutationError, Reconcile,
};
pub use save::{SaveOutcome, SaveState};
pub use session::EditorSession;
