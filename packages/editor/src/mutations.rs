//! # Document Mutations
//!
//! Semantic operations on a loaded [`SiteDocument`].
//!
//! Every mutation validates its structural constraints before touching the
//! document, so a failed mutation leaves the document exactly as it was.
//! Applying returns the [`Reconcile`] effect the canvas needs: structural
//! changes (insert/remove/reorder) require a rebuild, field-level changes
//! patch only the affected node.
//!
//! `SyncOrder` is the one inverted-direction path: the on-screen order is
//! treated as ground truth and written back into the document. It is
//! validated as a strict permutation of the current references so the DOM
//! can never invent or drop an element.

use mosaic_document::{
    Background, ButtonAction, Column, Element, ElementContent, SectionKind, SiteDocument, ViewMode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed path to one editable field of an element. Replaces the legacy
/// `data-key` / `data-content-key` / `data-style-key` string dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKey {
    /// Editor-only display label.
    Title,
    /// Public-page visibility flag.
    Visible,
    /// A field of the type-specific content payload.
    Content(ContentField),
    /// A css property in the element's style map.
    Style(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentField {
    Html,
    Url,
    Text,
    Action,
    Link,
    ModalContent,
}

/// Value carried by a [`Mutation::SetField`]. Text inputs and selects
/// deliver strings; the visibility checkbox delivers a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Toggle(bool),
}

/// One column's element order, as read off the canvas on drop or at save
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOrder {
    pub column_id: String,
    pub elements: Vec<String>,
}

/// Reconciliation the canvas owes after a successful apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    /// Structural change: regenerate the whole canvas from the document.
    Rebuild,
    /// Field-level change on one element: replace only its wrapper.
    PatchElement(String),
    /// Chrome change on one section.
    PatchSection(SectionKind),
    /// Width change on one column.
    PatchColumn(String),
    /// Nothing on the canvas depends on this.
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Add a freshly built element, referencing it from the head of the
    /// first column.
    InsertElement { element: Element },

    /// Remove an element from the pool and from every column.
    RemoveElement { element_id: String },

    AddColumn { column: Column },

    /// Remove a column and cascade-delete its elements from the pool;
    /// an element orphaned by a column delete would be unreachable from
    /// the UI.
    RemoveColumn { column_id: String },

    MoveColumn { column_id: String, index: usize },

    /// Rewrite column and element order from the canvas (DOM → document).
    SyncOrder { order: Vec<ColumnOrder> },

    SetField {
        element_id: String,
        field: FieldKey,
        value: FieldValue,
    },

    /// Header/footer authored HTML.
    SetSectionContent {
        section: SectionKind,
        content: String,
    },

    /// Replacing the whole enum value on a type switch is what keeps the
    /// old type's payload from lingering in the document.
    SetSectionBackground {
        section: SectionKind,
        background: Option<Background>,
    },

    SetSectionStyle {
        section: SectionKind,
        property: String,
        value: String,
    },

    SetColumnWidth { column_id: String, width: String },

    SetGlobalTitle { title: String },

    SetViewMode { mode: ViewMode },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("duplicate element id: {0}")]
    DuplicateElement(String),

    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    #[error("add a column before adding elements")]
    NoColumns,

    #[error("field {field:?} does not apply to element {element_id}")]
    FieldMismatch { element_id: String, field: FieldKey },

    #[error("canvas order is not a permutation of the document: {0}")]
    InvalidOrder(String),

    #[error("section {0:?} has no editable content")]
    SectionHasNoContent(SectionKind),
}

impl Mutation {
    /// Apply to the document with validation. A failed apply is a no-op.
    pub fn apply(&self, doc: &mut SiteDocument) -> Result<Reconcile, MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::InsertElement { element } => {
                doc.elements.push(element.clone());
                doc.layout.main.columns[0]
                    .elements
                    .insert(0, element.id.clone());
                Ok(Reconcile::Rebuild)
            }

            Mutation::RemoveElement { element_id } => {
                doc.elements.retain(|el| el.id != *element_id);
                for col in &mut doc.layout.main.columns {
                    col.elements.retain(|id| id != element_id);
                }
                Ok(Reconcile::Rebuild)
            }

            Mutation::AddColumn { column } => {
                doc.layout.main.columns.push(column.clone());
                Ok(Reconcile::Rebuild)
            }

            Mutation::RemoveColumn { column_id } => {
                let removed = doc
                    .layout
                    .main
                    .columns
                    .iter()
                    .position(|c| c.id == *column_id)
                    .map(|i| doc.layout.main.columns.remove(i))
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                doc.elements.retain(|el| !removed.elements.contains(&el.id));
                Ok(Reconcile::Rebuild)
            }

            Mutation::MoveColumn { column_id, index } => {
                let from = doc
                    .layout
                    .main
                    .columns
                    .iter()
                    .position(|c| c.id == *column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                let column = doc.layout.main.columns.remove(from);
                let to = (*index).min(doc.layout.main.columns.len());
                doc.layout.main.columns.insert(to, column);
                Ok(Reconcile::Rebuild)
            }

            Mutation::SyncOrder { order } => {
                let old_widths: Vec<(String, String)> = doc
                    .layout
                    .main
                    .columns
                    .iter()
                    .map(|c| (c.id.clone(), c.width.clone()))
                    .collect();
                doc.layout.main.columns = order
                    .iter()
                    .map(|co| {
                        let width = old_widths
                            .iter()
                            .find(|(id, _)| *id == co.column_id)
                            .map(|(_, w)| w.clone())
                            .unwrap_or_else(|| "1fr".to_string());
                        Column {
                            id: co.column_id.clone(),
                            width,
                            elements: co.elements.clone(),
                        }
                    })
                    .collect();
                Ok(Reconcile::Rebuild)
            }

            Mutation::SetField {
                element_id,
                field,
                value,
            } => {
                Self::apply_set_field(doc, element_id, field, value)?;
                Ok(Reconcile::PatchElement(element_id.clone()))
            }

            Mutation::SetSectionContent { section, content } => {
                let chrome = doc
                    .section_chrome_mut(*section)
                    .ok_or(MutationError::SectionHasNoContent(*section))?;
                chrome.content = content.clone();
                Ok(Reconcile::PatchSection(*section))
            }

            Mutation::SetSectionBackground {
                section,
                background,
            } => {
                match section {
                    SectionKind::Header => doc.layout.header.background = background.clone(),
                    SectionKind::Main => doc.layout.main.background = background.clone(),
                    SectionKind::Footer => doc.layout.footer.background = background.clone(),
                }
                Ok(Reconcile::PatchSection(*section))
            }

            Mutation::SetSectionStyle {
                section,
                property,
                value,
            } => {
                let chrome = doc
                    .section_chrome_mut(*section)
                    .ok_or(MutationError::SectionHasNoContent(*section))?;
                if value.is_empty() {
                    chrome.styles.remove(property);
                } else {
                    chrome.styles.insert(property.clone(), value.clone());
                }
                Ok(Reconcile::PatchSection(*section))
            }

            Mutation::SetColumnWidth { column_id, width } => {
                let column = doc
                    .find_column_mut(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                column.width = width.clone();
                Ok(Reconcile::PatchColumn(column_id.clone()))
            }

            Mutation::SetGlobalTitle { title } => {
                doc.global_settings.page_title = title.clone();
                Ok(Reconcile::None)
            }

            Mutation::SetViewMode { mode } => {
                doc.global_settings.default_view_mode = *mode;
                Ok(Reconcile::None)
            }
        }
    }

    fn apply_set_field(
        doc: &mut SiteDocument,
        element_id: &str,
        field: &FieldKey,
        value: &FieldValue,
    ) -> Result<(), MutationError> {
        let mismatch = || MutationError::FieldMismatch {
            element_id: element_id.to_string(),
            field: field.clone(),
        };
        let el = doc
            .find_element_mut(element_id)
            .ok_or_else(|| MutationError::ElementNotFound(element_id.to_string()))?;

        match (field, value) {
            (FieldKey::Title, FieldValue::Text(v)) => el.admin_title = v.clone(),

            (FieldKey::Visible, FieldValue::Toggle(b)) => el.visible = *b,

            (FieldKey::Style(property), FieldValue::Text(v)) => {
                // Clearing the input removes the property.
                if v.is_empty() {
                    el.style.remove(property);
                } else {
                    el.style.insert(property.clone(), v.clone());
                }
            }

            (FieldKey::Content(cf), FieldValue::Text(v)) => match (cf, &mut el.content) {
                (ContentField::Html, ElementContent::Text { html }) => *html = v.clone(),

                (
                    ContentField::Url,
                    ElementContent::Photo { url }
                    | ElementContent::Video { url }
                    | ElementContent::Reels { url }
                    | ElementContent::Embed { url },
                ) => *url = v.clone(),

                (ContentField::Text, ElementContent::Button { text, .. }) => *text = v.clone(),

                (ContentField::Action, ElementContent::Button { action, .. }) => {
                    *action = parse_action(v).ok_or_else(mismatch)?;
                }

                (ContentField::Link, ElementContent::Button { link, .. }) => {
                    *link = if v.is_empty() { None } else { Some(v.clone()) };
                }

                (ContentField::ModalContent, ElementContent::Button { modal_content, .. }) => {
                    *modal_content = if v.is_empty() { None } else { Some(v.clone()) };
                }

                _ => return Err(mismatch()),
            },

            _ => return Err(mismatch()),
        }

        Ok(())
    }

    /// Validate without applying.
    pub fn validate(&self, doc: &SiteDocument) -> Result<(), MutationError> {
        match self {
            Mutation::InsertElement { element } => {
                if doc.layout.main.columns.is_empty() {
                    return Err(MutationError::NoColumns);
                }
                if doc.find_element(&element.id).is_some() {
                    return Err(MutationError::DuplicateElement(element.id.clone()));
                }
                Ok(())
            }

            Mutation::RemoveElement { element_id } => {
                doc.find_element(element_id)
                    .ok_or_else(|| MutationError::ElementNotFound(element_id.clone()))?;
                Ok(())
            }

            Mutation::AddColumn { column } => {
                if doc.find_column(&column.id).is_some() {
                    return Err(MutationError::DuplicateColumn(column.id.clone()));
                }
                Ok(())
            }

            Mutation::RemoveColumn { column_id }
            | Mutation::MoveColumn { column_id, .. }
            | Mutation::SetColumnWidth { column_id, .. } => {
                doc.find_column(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                Ok(())
            }

            Mutation::SyncOrder { order } => Self::validate_order(doc, order),

            Mutation::SetField {
                element_id,
                field,
                value,
            } => {
                let el = doc
                    .find_element(element_id)
                    .ok_or_else(|| MutationError::ElementNotFound(element_id.clone()))?;
                if field_applies(el, field, value) {
                    Ok(())
                } else {
                    Err(MutationError::FieldMismatch {
                        element_id: element_id.clone(),
                        field: field.clone(),
                    })
                }
            }

            Mutation::SetSectionContent { section, .. }
            | Mutation::SetSectionStyle { section, .. } => {
                if *section == SectionKind::Main {
                    return Err(MutationError::SectionHasNoContent(*section));
                }
                Ok(())
            }

            Mutation::SetSectionBackground { .. }
            | Mutation::SetGlobalTitle { .. }
            | Mutation::SetViewMode { .. } => Ok(()),
        }
    }

    /// A proposed order is legal only if it names every current column
    /// exactly once and carries exactly the element references the
    /// columns currently hold.
    fn validate_order(doc: &SiteDocument, order: &[ColumnOrder]) -> Result<(), MutationError> {
        use std::collections::HashSet;

        let current_columns: HashSet<&str> = doc
            .layout
            .main
            .columns
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        let mut seen_columns = HashSet::new();
        for co in order {
            if !current_columns.contains(co.column_id.as_str()) {
                return Err(MutationError::InvalidOrder(format!(
                    "unknown column {}",
                    co.column_id
                )));
            }
            if !seen_columns.insert(co.column_id.as_str()) {
                return Err(MutationError::InvalidOrder(format!(
                    "column {} listed twice",
                    co.column_id
                )));
            }
        }
        if seen_columns.len() != current_columns.len() {
            return Err(MutationError::InvalidOrder(
                "a column is missing from the order".to_string(),
            ));
        }

        let current_refs: HashSet<&str> = doc
            .layout
            .main
            .columns
            .iter()
            .flat_map(|c| c.elements.iter().map(String::as_str))
            .collect();
        let mut seen_refs = HashSet::new();
        for id in order.iter().flat_map(|co| co.elements.iter()) {
            if !current_refs.contains(id.as_str()) {
                return Err(MutationError::InvalidOrder(format!("unknown element {id}")));
            }
            if !seen_refs.insert(id.as_str()) {
                return Err(MutationError::InvalidOrder(format!(
                    "element {id} listed twice"
                )));
            }
        }
        if seen_refs.len() != current_refs.len() {
            return Err(MutationError::InvalidOrder(
                "an element is missing from the order".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_action(value: &str) -> Option<ButtonAction> {
    match value {
        "openLink" => Some(ButtonAction::OpenLink),
        "openModal" => Some(ButtonAction::OpenModal),
        _ => None,
    }
}

fn field_applies(el: &Element, field: &FieldKey, value: &FieldValue) -> bool {
    match (field, value) {
        (FieldKey::Title, FieldValue::Text(_)) => true,
        (FieldKey::Visible, FieldValue::Toggle(_)) => true,
        (FieldKey::Style(_), FieldValue::Text(_)) => true,
        (FieldKey::Content(cf), FieldValue::Text(v)) => match (cf, &el.content) {
            (ContentField::Html, ElementContent::Text { .. }) => true,
            (
                ContentField::Url,
                ElementContent::Photo { .. }
                | ElementContent::Video { .. }
                | ElementContent::Reels { .. }
                | ElementContent::Embed { .. },
            ) => true,
            (ContentField::Action, ElementContent::Button { .. }) => parse_action(v).is_some(),
            (
                ContentField::Text | ContentField::Link | ContentField::ModalContent,
                ElementContent::Button { .. },
            ) => true,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_document::{Element, ElementKind};

    fn doc_with_columns(n: usize) -> SiteDocument {
        let mut doc = SiteDocument::empty();
        for i in 0..n {
            doc.layout
                .main
                .columns
                .push(Column::new(format!("col-{i}"), "1fr"));
        }
        doc
    }

    fn insert(doc: &mut SiteDocument, kind: ElementKind) -> String {
        let element = Element::new(kind);
        let id = element.id.clone();
        Mutation::InsertElement { element }.apply(doc).unwrap();
        id
    }

    #[test]
    fn insert_requires_a_column() {
        let mut doc = SiteDocument::empty();
        let err = Mutation::InsertElement {
            element: Element::new(ElementKind::Photo),
        }
        .apply(&mut doc)
        .unwrap_err();
        assert_eq!(err, MutationError::NoColumns);
        assert!(doc.elements.is_empty());
    }

    #[test]
    fn insert_prepends_to_first_column() {
        let mut doc = doc_with_columns(2);
        let first = insert(&mut doc, ElementKind::TextBlock);
        let second = insert(&mut doc, ElementKind::Photo);

        assert_eq!(doc.layout.main.columns[0].elements, vec![second, first]);
        assert!(doc.layout.main.columns[1].elements.is_empty());
    }

    #[test]
    fn remove_element_purges_every_reference() {
        let mut doc = doc_with_columns(1);
        let id = insert(&mut doc, ElementKind::Button);

        Mutation::RemoveElement {
            element_id: id.clone(),
        }
        .apply(&mut doc)
        .unwrap();

        assert!(doc.find_element(&id).is_none());
        assert!(doc
            .layout
            .main
            .columns
            .iter()
            .all(|c| !c.elements.contains(&id)));
        doc.validate().unwrap();
    }

    #[test]
    fn remove_column_cascades_to_elements() {
        let mut doc = doc_with_columns(2);
        let id = insert(&mut doc, ElementKind::Photo);

        Mutation::RemoveColumn {
            column_id: "col-0".to_string(),
        }
        .apply(&mut doc)
        .unwrap();

        assert_eq!(doc.layout.main.columns.len(), 1);
        assert!(doc.find_element(&id).is_none());
    }

    #[test]
    fn sync_order_moves_element_across_columns() {
        let mut doc = doc_with_columns(2);
        let id = insert(&mut doc, ElementKind::TextBlock);

        Mutation::SyncOrder {
            order: vec![
                ColumnOrder {
                    column_id: "col-0".to_string(),
                    elements: vec![],
                },
                ColumnOrder {
                    column_id: "col-1".to_string(),
                    elements: vec![id.clone()],
                },
            ],
        }
        .apply(&mut doc)
        .unwrap();

        assert!(doc.layout.main.columns[0].elements.is_empty());
        assert_eq!(doc.layout.main.columns[1].elements, vec![id]);
    }

    #[test]
    fn sync_order_rejects_dropped_elements() {
        let mut doc = doc_with_columns(1);
        insert(&mut doc, ElementKind::TextBlock);
        let before = doc.clone();

        let err = Mutation::SyncOrder {
            order: vec![ColumnOrder {
                column_id: "col-0".to_string(),
                elements: vec![],
            }],
        }
        .apply(&mut doc)
        .unwrap_err();

        assert!(matches!(err, MutationError::InvalidOrder(_)));
        assert_eq!(doc, before);
    }

    #[test]
    fn sync_order_rejects_invented_elements() {
        let mut doc = doc_with_columns(1);
        let err = Mutation::SyncOrder {
            order: vec![ColumnOrder {
                column_id: "col-0".to_string(),
                elements: vec!["el-made-up".to_string()],
            }],
        }
        .apply(&mut doc)
        .unwrap_err();
        assert!(matches!(err, MutationError::InvalidOrder(_)));
    }

    #[test]
    fn set_field_rejects_wrong_payload() {
        let mut doc = doc_with_columns(1);
        let id = insert(&mut doc, ElementKind::Photo);

        let err = Mutation::SetField {
            element_id: id,
            field: FieldKey::Content(ContentField::Html),
            value: FieldValue::Text("<p>nope</p>".to_string()),
        }
        .apply(&mut doc)
        .unwrap_err();
        assert!(matches!(err, MutationError::FieldMismatch { .. }));
    }

    #[test]
    fn button_action_switch_is_lossy_but_preserving() {
        let mut doc = doc_with_columns(1);
        let id = insert(&mut doc, ElementKind::Button);

        Mutation::SetField {
            element_id: id.clone(),
            field: FieldKey::Content(ContentField::Link),
            value: FieldValue::Text("https://example.com".to_string()),
        }
        .apply(&mut doc)
        .unwrap();

        Mutation::SetField {
            element_id: id.clone(),
            field: FieldKey::Content(ContentField::Action),
            value: FieldValue::Text("openModal".to_string()),
        }
        .apply(&mut doc)
        .unwrap();

        // The stale link stays in the document, just never shown while
        // the action is openModal.
        let el = doc.find_element(&id).unwrap();
        match &el.content {
            ElementContent::Button { action, link, .. } => {
                assert_eq!(*action, ButtonAction::OpenModal);
                assert_eq!(link.as_deref(), Some("https://example.com"));
            }
            _ => panic!("expected a button"),
        }
    }

    #[test]
    fn section_background_switch_replaces_whole_value() {
        let mut doc = doc_with_columns(1);
        Mutation::SetSectionBackground {
            section: SectionKind::Header,
            background: Some(Background::Color {
                value: "#202020".to_string(),
            }),
        }
        .apply(&mut doc)
        .unwrap();

        Mutation::SetSectionBackground {
            section: SectionKind::Header,
            background: Some(Background::Image {
                value: "https://x/y.png".to_string(),
            }),
        }
        .apply(&mut doc)
        .unwrap();

        assert_eq!(
            doc.layout.header.background,
            Some(Background::Image {
                value: "https://x/y.png".to_string()
            })
        );
    }

    #[test]
    fn style_clear_removes_the_property() {
        let mut doc = doc_with_columns(1);
        let id = insert(&mut doc, ElementKind::Button);

        Mutation::SetField {
            element_id: id.clone(),
            field: FieldKey::Style("padding".to_string()),
            value: FieldValue::Text(String::new()),
        }
        .apply(&mut doc)
        .unwrap();

        assert!(doc.find_element(&id).unwrap().style.get("padding").is_none());
    }

    #[test]
    fn main_section_has_no_content() {
        let mut doc = doc_with_columns(1);
        let err = Mutation::SetSectionContent {
            section: SectionKind::Main,
            content: "<h1>no</h1>".to_string(),
        }
        .apply(&mut doc)
        .unwrap_err();
        assert_eq!(err, MutationError::SectionHasNoContent(SectionKind::Main));
    }

    #[test]
    fn mutation_roundtrips_through_json() {
        let mutation = Mutation::SetField {
            element_id: "el-1".to_string(),
            field: FieldKey::Style("backgroundColor".to_string()),
            value: FieldValue::Text("#fff".to_string()),
        };
        let json = serde_json::to_string(&mutation).unwrap();
        let back: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(mutation, back);
    }
}
