use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::StyleMap;

/// One content block.
///
/// The `type` discriminator and the `content` payload are carried together
/// by [`ElementContent`], so a block's type and its payload cannot drift
/// apart. A block's type is immutable after creation; changing type means
/// delete + recreate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique across the document for its whole lifetime.
    pub id: String,

    /// Editor-only display label; never rendered on the public page.
    #[serde(default)]
    pub admin_title: String,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(flatten)]
    pub content: ElementContent,

    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub style: StyleMap,
}

fn default_visible() -> bool {
    true
}

/// Typed payload per block type.
///
/// Serializes as the legacy wire shape: a `type` tag string next to a
/// `content` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum ElementContent {
    #[serde(rename = "textBlock")]
    Text { html: String },

    #[serde(rename = "photo")]
    Photo { url: String },

    #[serde(rename = "videoBlock")]
    Video { url: String },

    #[serde(rename = "reels")]
    Reels { url: String },

    #[serde(rename = "externalBlock")]
    Embed { url: String },

    #[serde(rename = "button")]
    #[serde(rename_all = "camelCase")]
    Button {
        text: String,
        action: ButtonAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        modal_content: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonAction {
    OpenLink,
    OpenModal,
}

/// Block type selector, as exposed on the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    TextBlock,
    Photo,
    VideoBlock,
    Reels,
    ExternalBlock,
    Button,
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::TextBlock => "Text block",
            ElementKind::Photo => "Photo",
            ElementKind::VideoBlock => "Video",
            ElementKind::Reels => "Reels",
            ElementKind::ExternalBlock => "Embed",
            ElementKind::Button => "Button",
        }
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Timestamp-based element id. The counter suffix keeps ids unique when
/// several elements are created within one millisecond.
fn fresh_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("el-{millis}-{n}")
}

impl Element {
    /// Build a new block with type-appropriate default content and styles.
    pub fn new(kind: ElementKind) -> Self {
        let (content, style) = match kind {
            ElementKind::TextBlock => (
                ElementContent::Text {
                    html: "<p>New text block.</p>".to_string(),
                },
                style_of(&[("padding", "15px"), ("backgroundColor", "#ffffff")]),
            ),
            ElementKind::Photo => (
                ElementContent::Photo {
                    url: "https://via.placeholder.com/600x400.png".to_string(),
                },
                style_of(&[("width", "100%"), ("height", "250px"), ("objectFit", "cover")]),
            ),
            ElementKind::VideoBlock => (
                ElementContent::Video { url: String::new() },
                style_of(&[("width", "100%"), ("height", "315px")]),
            ),
            ElementKind::Reels => (
                ElementContent::Reels { url: String::new() },
                style_of(&[("width", "100%"), ("height", "450px")]),
            ),
            ElementKind::ExternalBlock => (
                ElementContent::Embed { url: String::new() },
                style_of(&[
                    ("width", "100%"),
                    ("height", "200px"),
                    ("border", "1px solid #ccc"),
                ]),
            ),
            ElementKind::Button => (
                ElementContent::Button {
                    text: "Button".to_string(),
                    action: ButtonAction::OpenLink,
                    link: None,
                    modal_content: None,
                },
                style_of(&[
                    ("padding", "15px"),
                    ("backgroundColor", "#3498db"),
                    ("color", "#ffffff"),
                    ("border", "none"),
                    ("cursor", "pointer"),
                ]),
            ),
        };

        Self {
            id: fresh_id(),
            admin_title: format!("New {}", kind.label().to_lowercase()),
            visible: true,
            content,
            style,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self.content {
            ElementContent::Text { .. } => ElementKind::TextBlock,
            ElementContent::Photo { .. } => ElementKind::Photo,
            ElementContent::Video { .. } => ElementKind::VideoBlock,
            ElementContent::Reels { .. } => ElementKind::Reels,
            ElementContent::Embed { .. } => ElementKind::ExternalBlock,
            ElementContent::Button { .. } => ElementKind::Button,
        }
    }
}

fn style_of(pairs: &[(&str, &str)]) -> StyleMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_serializes_with_legacy_tag_strings() {
        let el = Element {
            id: "el-1".to_string(),
            admin_title: "Intro".to_string(),
            visible: true,
            content: ElementContent::Text {
                html: "<p>hi</p>".to_string(),
            },
            style: StyleMap::new(),
        };

        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "textBlock");
        assert_eq!(json["content"]["html"], "<p>hi</p>");
        assert_eq!(json["adminTitle"], "Intro");
    }

    #[test]
    fn button_roundtrips_with_inactive_field_preserved() {
        let el = Element {
            id: "el-2".to_string(),
            admin_title: String::new(),
            visible: true,
            content: ElementContent::Button {
                text: "Go".to_string(),
                action: ButtonAction::OpenModal,
                // Stale link is kept in the document, just never shown
                // while the action is openModal.
                link: Some("https://example.com".to_string()),
                modal_content: Some("<p>hello</p>".to_string()),
            },
            style: StyleMap::new(),
        };

        let json = serde_json::to_string(&el).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(el, back);
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = Element::new(ElementKind::Photo);
        let b = Element::new(ElementKind::Photo);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn defaults_match_block_type() {
        let btn = Element::new(ElementKind::Button);
        assert_eq!(btn.kind(), ElementKind::Button);
        assert!(btn.visible);
        assert_eq!(btn.style.get("cursor").map(String::as_str), Some("pointer"));
    }
}
