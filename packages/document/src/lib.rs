//! # Mosaic Document
//!
//! The persisted site document and its invariants.
//!
//! A [`SiteDocument`] is the single root JSON structure describing a whole
//! site: global settings, a three-section layout (header / main / footer),
//! and a flat pool of content elements referenced by id from the main
//! section's columns.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Edit → Render → Save
//!   ↓      ↓       ↓       ↓       ↓
//! Store  JSON   Mutations Tree   Store
//! ```
//!
//! The document is loaded wholesale, mutated in memory by the editor, and
//! written back wholesale. The renderer never mutates it.

mod element;
mod error;
mod model;
mod validate;

pub use element::{ButtonAction, Element, ElementContent, ElementKind};
pub use error::DocumentError;
pub use model::{
    Background, Column, GlobalSettings, Layout, MainSection, SectionChrome, SectionKind,
    SiteDocument, StyleMap, ViewMode,
};
pub use validate::ValidationError;

/// Current persisted schema version.
///
/// None of the legacy documents carried a version field, so absence is
/// treated as version 1. Documents written by a newer shape are rejected
/// at parse time instead of being silently misread.
pub const SCHEMA_VERSION: u32 = 1;
