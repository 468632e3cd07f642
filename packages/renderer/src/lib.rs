//! # Mosaic Renderer
//!
//! Read-only materialization of a [`mosaic_document::SiteDocument`].
//!
//! The renderer is a leaf with no editor affordances: content is live
//! (iframes load their real `src`, buttons carry real navigation targets,
//! modal triggers reference real overlays). It walks the document and
//! produces a [`PageTree`], which [`html::render_html`] turns into a
//! standalone page.
//!
//! If the document itself fails to load, callers substitute
//! [`html::error_page`]; the renderer has no recovery of its own.

pub mod html;
mod renderer;
mod tree;

pub use renderer::{render, render_element};
pub use tree::{PageNode, PageTree};
