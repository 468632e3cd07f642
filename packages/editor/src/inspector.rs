//! # Inspector Field Descriptors
//!
//! The inspector form is generated from a typed descriptor table per
//! element type rather than string property paths: each descriptor pairs
//! a [`FieldKey`] with its label and input kind, and the form wires every
//! input straight to a `SetField` mutation.
//!
//! A button's field set is a two-state machine keyed on its action:
//! `openLink` shows the link field, `openModal` shows the modal-HTML
//! field, mutually exclusive. Switching the action changes the descriptor
//! set, so the inspector itself must be re-rendered on that edit. The
//! hidden field's stale value stays in the document but is never shown
//! until switched back.

use mosaic_document::{ButtonAction, Element, ElementContent};

use crate::mutations::{ContentField, FieldKey, FieldValue};

/// How one field is presented and edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Color,
    Checkbox,
    Select(&'static [&'static str]),
}

/// One row of the inspector form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub label: &'static str,
    pub input: InputKind,
}

impl FieldDescriptor {
    fn new(key: FieldKey, label: &'static str, input: InputKind) -> Self {
        Self { key, label, input }
    }
}

/// Style rows offered for every element type.
const STYLE_FIELDS: &[(&str, &str, bool)] = &[
    ("width", "Width", false),
    ("height", "Height", false),
    ("backgroundColor", "Background color", true),
    ("color", "Text color", true),
    ("padding", "Padding", false),
    ("borderRadius", "Corner radius", false),
    ("boxShadow", "Shadow", false),
];

/// Descriptor table for one element, in form order: general fields,
/// type-specific content fields, style fields.
pub fn fields_for(el: &Element) -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::new(FieldKey::Title, "Title", InputKind::Text),
        FieldDescriptor::new(FieldKey::Visible, "Visible", InputKind::Checkbox),
    ];

    match &el.content {
        ElementContent::Text { .. } => {
            fields.push(FieldDescriptor::new(
                FieldKey::Content(ContentField::Html),
                "HTML",
                InputKind::TextArea,
            ));
        }

        ElementContent::Photo { .. }
        | ElementContent::Video { .. }
        | ElementContent::Reels { .. }
        | ElementContent::Embed { .. } => {
            fields.push(FieldDescriptor::new(
                FieldKey::Content(ContentField::Url),
                "URL",
                InputKind::Text,
            ));
        }

        ElementContent::Button { action, .. } => {
            fields.push(FieldDescriptor::new(
                FieldKey::Content(ContentField::Text),
                "Text",
                InputKind::Text,
            ));
            fields.push(FieldDescriptor::new(
                FieldKey::Content(ContentField::Action),
                "Action",
                InputKind::Select(&["openLink", "openModal"]),
            ));
            match action {
                ButtonAction::OpenLink => fields.push(FieldDescriptor::new(
                    FieldKey::Content(ContentField::Link),
                    "Link URL",
                    InputKind::Text,
                )),
                ButtonAction::OpenModal => fields.push(FieldDescriptor::new(
                    FieldKey::Content(ContentField::ModalContent),
                    "Modal HTML",
                    InputKind::TextArea,
                )),
            }
        }
    }

    for (property, label, is_color) in STYLE_FIELDS {
        let input = if *is_color {
            InputKind::Color
        } else {
            InputKind::Text
        };
        fields.push(FieldDescriptor::new(
            FieldKey::Style((*property).to_string()),
            label,
            input,
        ));
    }

    fields
}

/// Current value for one field, used to prefill its input. `None` when
/// the key does not apply to this element.
pub fn value_of(el: &Element, key: &FieldKey) -> Option<FieldValue> {
    match key {
        FieldKey::Title => Some(FieldValue::Text(el.admin_title.clone())),
        FieldKey::Visible => Some(FieldValue::Toggle(el.visible)),
        FieldKey::Style(property) => Some(FieldValue::Text(
            el.style.get(property).cloned().unwrap_or_default(),
        )),
        FieldKey::Content(cf) => match (cf, &el.content) {
            (ContentField::Html, ElementContent::Text { html }) => {
                Some(FieldValue::Text(html.clone()))
            }
            (
                ContentField::Url,
                ElementContent::Photo { url }
                | ElementContent::Video { url }
                | ElementContent::Reels { url }
                | ElementContent::Embed { url },
            ) => Some(FieldValue::Text(url.clone())),
            (ContentField::Text, ElementContent::Button { text, .. }) => {
                Some(FieldValue::Text(text.clone()))
            }
            (ContentField::Action, ElementContent::Button { action, .. }) => {
                Some(FieldValue::Text(
                    match action {
                        ButtonAction::OpenLink => "openLink",
                        ButtonAction::OpenModal => "openModal",
                    }
                    .to_string(),
                ))
            }
            (ContentField::Link, ElementContent::Button { link, .. }) => {
                Some(FieldValue::Text(link.clone().unwrap_or_default()))
            }
            (ContentField::ModalContent, ElementContent::Button { modal_content, .. }) => {
                Some(FieldValue::Text(modal_content.clone().unwrap_or_default()))
            }
            _ => None,
        },
    }
}

/// Whether editing `key` changes the descriptor set itself, forcing an
/// inspector re-render.
pub fn changes_field_set(key: &FieldKey) -> bool {
    matches!(key, FieldKey::Content(ContentField::Action))
}
