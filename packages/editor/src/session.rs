//! # Editor Session
//!
//! One editing session owns the in-memory document, the selection, the
//! canvas mirror, and the last-known version token. There are no module
//! globals: everything the editor tracks lives on [`EditorSession`], and
//! the document is mutated only through [`Mutation`]s so the canvas can
//! always be reconciled from the effect they report.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use mosaic_document::{
    Background, Column, Element, ElementKind, SectionKind, SiteDocument, ViewMode,
};
use mosaic_store::{DocumentStore, VersionToken};
use tracing::debug;

use crate::canvas::CanvasTree;
use crate::errors::EditorError;
use crate::inspector::{self, FieldDescriptor};
use crate::mutations::{ColumnOrder, FieldKey, FieldValue, Mutation, Reconcile};
use crate::save::SaveState;

pub struct EditorSession {
    pub(crate) document: SiteDocument,
    pub(crate) selected: Option<String>,
    pub(crate) token: Option<VersionToken>,
    pub(crate) canvas: CanvasTree,
    pub(crate) save_state: SaveState,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A fresh, unauthenticated session with nothing loaded.
    pub fn new() -> Self {
        let document = SiteDocument::empty();
        let canvas = CanvasTree::build(&document, None);
        Self {
            document,
            selected: None,
            token: None,
            canvas,
            save_state: SaveState::Idle,
        }
    }

    /// Start from an already-parsed document (offline preview, tests).
    pub fn with_document(document: SiteDocument) -> Self {
        let canvas = CanvasTree::build(&document, None);
        Self {
            document,
            selected: None,
            token: None,
            canvas,
            save_state: SaveState::Idle,
        }
    }

    /// Load the document from the store, adopting its version token.
    /// Any failure leaves the session as it was.
    pub async fn load<S: DocumentStore>(
        &mut self,
        store: &S,
        path: &str,
    ) -> Result<(), EditorError> {
        let (document, token) = store.read(path).await?;
        document.validate()?;
        debug!(%path, %token, "document loaded");

        self.document = document;
        self.token = Some(token);
        self.selected = None;
        self.canvas = CanvasTree::build(&self.document, None);
        Ok(())
    }

    pub fn document(&self) -> &SiteDocument {
        &self.document
    }

    pub fn canvas(&self) -> &CanvasTree {
        &self.canvas
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn token(&self) -> Option<&VersionToken> {
        self.token.as_ref()
    }

    /// Width preset the canvas viewport should use.
    pub fn canvas_width(&self) -> &'static str {
        self.document.global_settings.default_view_mode.canvas_width()
    }

    /// Apply one mutation and reconcile the canvas per its effect.
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let effect = mutation.apply(&mut self.document)?;
        debug!(?effect, "mutation applied");

        match effect {
            Reconcile::Rebuild => {
                // Drop the selection if the mutation removed its target.
                if let Some(id) = &self.selected {
                    if self.document.find_element(id).is_none() {
                        self.selected = None;
                    }
                }
                self.canvas = CanvasTree::build(&self.document, self.selected.as_deref());
            }
            Reconcile::PatchElement(id) => self.canvas.patch_element(&self.document, &id),
            Reconcile::PatchSection(kind) => self.canvas.patch_section(&self.document, kind),
            Reconcile::PatchColumn(id) => self.canvas.patch_column(&self.document, &id),
            Reconcile::None => {}
        }
        Ok(())
    }

    /// Select an element, returning its inspector field set.
    pub fn select(&mut self, element_id: &str) -> Result<Vec<FieldDescriptor>, EditorError> {
        let el = self
            .document
            .find_element(element_id)
            .ok_or_else(|| EditorError::UnknownElement(element_id.to_string()))?;
        let fields = inspector::fields_for(el);
        self.selected = Some(element_id.to_string());
        self.canvas.set_selection(Some(element_id));
        Ok(fields)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.canvas.set_selection(None);
    }

    /// Inspector field set for the current selection.
    pub fn inspector(&self) -> Result<Vec<FieldDescriptor>, EditorError> {
        let id = self.selected.as_ref().ok_or(EditorError::NothingSelected)?;
        let el = self
            .document
            .find_element(id)
            .ok_or_else(|| EditorError::UnknownElement(id.clone()))?;
        Ok(inspector::fields_for(el))
    }

    /// Edit one field of the selected element. Returns `true` when the
    /// edit changed the field set itself (button action switch), which
    /// means the inspector must be re-rendered.
    pub fn edit(&mut self, field: FieldKey, value: FieldValue) -> Result<bool, EditorError> {
        let element_id = self
            .selected
            .clone()
            .ok_or(EditorError::NothingSelected)?;
        let refresh = inspector::changes_field_set(&field);
        self.apply(Mutation::SetField {
            element_id,
            field,
            value,
        })?;
        Ok(refresh)
    }

    /// Add a new element of `kind` and select it. Fails when the layout
    /// has no columns yet.
    pub fn add_element(&mut self, kind: ElementKind) -> Result<String, EditorError> {
        let element = Element::new(kind);
        let id = element.id.clone();
        self.apply(Mutation::InsertElement { element })?;
        self.select(&id)?;
        Ok(id)
    }

    /// Remove the selected element. Destructive; callers confirm with the
    /// user before calling.
    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        let element_id = self
            .selected
            .clone()
            .ok_or(EditorError::NothingSelected)?;
        self.apply(Mutation::RemoveElement { element_id })
    }

    pub fn add_column(&mut self, width: impl Into<String>) -> Result<String, EditorError> {
        let column = Column::new(fresh_column_id(), width);
        let id = column.id.clone();
        self.apply(Mutation::AddColumn { column })?;
        Ok(id)
    }

    /// Remove a column and its elements. Destructive; callers confirm
    /// with the user before calling.
    pub fn delete_column(&mut self, column_id: &str) -> Result<(), EditorError> {
        self.apply(Mutation::RemoveColumn {
            column_id: column_id.to_string(),
        })
    }

    pub fn set_column_width(
        &mut self,
        column_id: &str,
        width: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::SetColumnWidth {
            column_id: column_id.to_string(),
            width: width.into(),
        })
    }

    /// Write the order read off the canvas on drop back into the
    /// document. The one place where the screen, not the document, is
    /// ground truth.
    pub fn reorder(&mut self, order: Vec<ColumnOrder>) -> Result<(), EditorError> {
        self.apply(Mutation::SyncOrder { order })
    }

    /// Commit a resize-drag release: width and height land in the style
    /// map in one step.
    pub fn commit_resize(
        &mut self,
        element_id: &str,
        width: impl Into<String>,
        height: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::SetField {
            element_id: element_id.to_string(),
            field: FieldKey::Style("width".to_string()),
            value: FieldValue::Text(width.into()),
        })?;
        self.apply(Mutation::SetField {
            element_id: element_id.to_string(),
            field: FieldKey::Style("height".to_string()),
            value: FieldValue::Text(height.into()),
        })
    }

    pub fn set_section_content(
        &mut self,
        section: SectionKind,
        content: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::SetSectionContent {
            section,
            content: content.into(),
        })
    }

    pub fn set_section_background(
        &mut self,
        section: SectionKind,
        background: Option<Background>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::SetSectionBackground {
            section,
            background,
        })
    }

    pub fn set_section_style(
        &mut self,
        section: SectionKind,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::SetSectionStyle {
            section,
            property: property.into(),
            value: value.into(),
        })
    }

    pub fn set_global_title(&mut self, title: impl Into<String>) -> Result<(), EditorError> {
        self.apply(Mutation::SetGlobalTitle {
            title: title.into(),
        })
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<(), EditorError> {
        self.apply(Mutation::SetViewMode { mode })
    }
}

static COLUMN_COUNTER: AtomicU64 = AtomicU64::new(0);

fn fresh_column_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let n = COLUMN_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("col-{millis}-{n}")
}
