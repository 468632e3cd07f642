use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::DocumentError;
use crate::SCHEMA_VERSION;

/// Free-form css property → value map.
///
/// Ordered so that serialization is deterministic.
pub type StyleMap = BTreeMap<String, String>;

/// The root persisted entity describing a whole site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    pub global_settings: GlobalSettings,

    pub layout: Layout,

    /// Flat pool of content elements, unique by id. Entries not referenced
    /// by any column are orphans: never rendered, still persisted.
    #[serde(default)]
    pub elements: Vec<Element>,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    #[serde(default)]
    pub page_title: String,

    #[serde(default)]
    pub default_view_mode: ViewMode,
}

/// Preview viewport presets offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl ViewMode {
    /// Canvas width used when previewing in this mode.
    pub fn canvas_width(&self) -> &'static str {
        match self {
            ViewMode::Desktop => "100%",
            ViewMode::Tablet => "768px",
            ViewMode::Mobile => "375px",
        }
    }
}

/// The three structural page regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub header: SectionChrome,
    pub main: MainSection,
    pub footer: SectionChrome,
}

/// Identifies one of the three layout sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Main,
    Footer,
}

/// Header/footer region: authored HTML plus optional chrome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionChrome {
    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: StyleMap,
}

/// The main region: an ordered run of columns holding element references.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MainSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,

    #[serde(default)]
    pub columns: Vec<Column>,
}

/// A flex/grid region within the main section.
///
/// `width` is any css basis ("1fr", "33%", "300px"); the widths of a
/// column run need not sum to anything in particular, the browser
/// normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub width: String,

    /// Ordered element ids. Every id must resolve into
    /// [`SiteDocument::elements`].
    #[serde(default)]
    pub elements: Vec<String>,
}

impl Column {
    pub fn new(id: impl Into<String>, width: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: width.into(),
            elements: Vec::new(),
        }
    }
}

/// Section background. The enum shape guarantees that exactly one payload
/// key exists per type: switching type cannot leave a stale opposite
/// value behind.
///
/// Legacy documents spell the image payload `url` and the color payload
/// `color` in places; aliases accept both and writing canonicalizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Color {
        #[serde(alias = "color")]
        value: String,
    },
    Image {
        #[serde(alias = "url")]
        value: String,
    },
    Video {
        url: String,
    },
}

impl SiteDocument {
    /// An empty document: three bare sections, no columns, no elements.
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            global_settings: GlobalSettings {
                page_title: String::new(),
                default_view_mode: ViewMode::Desktop,
            },
            layout: Layout {
                header: SectionChrome::default(),
                main: MainSection::default(),
                footer: SectionChrome::default(),
            },
            elements: Vec::new(),
        }
    }

    /// Parse a persisted document.
    ///
    /// Rejects documents written by a newer schema; a missing version
    /// field means version 1.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: SiteDocument = serde_json::from_str(json)?;
        if doc.schema_version > SCHEMA_VERSION {
            return Err(DocumentError::UnsupportedSchema {
                found: doc.schema_version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(doc)
    }

    /// Serialize with stable, human-diffable formatting.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn find_element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn find_element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    pub fn find_column(&self, id: &str) -> Option<&Column> {
        self.layout.main.columns.iter().find(|col| col.id == id)
    }

    pub fn find_column_mut(&mut self, id: &str) -> Option<&mut Column> {
        self.layout.main.columns.iter_mut().find(|col| col.id == id)
    }

    pub fn section_chrome(&self, kind: SectionKind) -> Option<&SectionChrome> {
        match kind {
            SectionKind::Header => Some(&self.layout.header),
            SectionKind::Footer => Some(&self.layout.footer),
            SectionKind::Main => None,
        }
    }

    pub fn section_chrome_mut(&mut self, kind: SectionKind) -> Option<&mut SectionChrome> {
        match kind {
            SectionKind::Header => Some(&mut self.layout.header),
            SectionKind::Footer => Some(&mut self.layout.footer),
            SectionKind::Main => None,
        }
    }

    /// Elements present in the pool but referenced by no column.
    pub fn orphaned_elements(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|el| {
                !self
                    .layout
                    .main
                    .columns
                    .iter()
                    .any(|col| col.elements.iter().any(|id| *id == el.id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_serializes_with_canonical_keys() {
        let bg = Background::Image {
            value: "https://x/y.png".to_string(),
        };
        let json = serde_json::to_string(&bg).unwrap();
        assert_eq!(json, r#"{"type":"image","value":"https://x/y.png"}"#);
    }

    #[test]
    fn background_accepts_legacy_url_key() {
        let bg: Background =
            serde_json::from_str(r#"{"type":"image","url":"https://x/y.png"}"#).unwrap();
        assert_eq!(
            bg,
            Background::Image {
                value: "https://x/y.png".to_string()
            }
        );
    }

    #[test]
    fn missing_schema_version_defaults_to_one() {
        let json = r#"{
            "globalSettings": { "pageTitle": "Site", "defaultViewMode": "desktop" },
            "layout": {
                "header": { "content": "" },
                "main": { "columns": [] },
                "footer": { "content": "" }
            },
            "elements": []
        }"#;
        let doc = SiteDocument::from_json(json).unwrap();
        assert_eq!(doc.schema_version, 1);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut doc = SiteDocument::empty();
        doc.schema_version = SCHEMA_VERSION + 1;
        let json = doc.to_json().unwrap();
        let err = SiteDocument::from_json(&json).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedSchema { .. }));
    }

    #[test]
    fn full_document_roundtrips_field_for_field() {
        use crate::element::{ButtonAction, Element, ElementContent};

        let mut doc = SiteDocument::empty();
        doc.global_settings.page_title = "Round trip".to_string();
        doc.global_settings.default_view_mode = ViewMode::Tablet;
        doc.layout.header.content = "<h1>Welcome</h1>".to_string();
        doc.layout.header.background = Some(Background::Image {
            value: "https://x/hero.png".to_string(),
        });
        doc.layout
            .header
            .styles
            .insert("padding".to_string(), "40px".to_string());
        doc.layout.main.background = Some(Background::Color {
            value: "#f5f5f5".to_string(),
        });
        doc.layout.footer.background = Some(Background::Video {
            url: "https://x/loop.mp4".to_string(),
        });

        let mut button = Element::new(crate::element::ElementKind::Button);
        button.content = ElementContent::Button {
            text: "Go".to_string(),
            action: ButtonAction::OpenModal,
            link: Some("https://example.com".to_string()),
            modal_content: Some("<p>hi</p>".to_string()),
        };
        let mut text = Element::new(crate::element::ElementKind::TextBlock);
        text.visible = false;

        let mut left = Column::new("col-left", "1fr");
        left.elements.push(button.id.clone());
        let mut right = Column::new("col-right", "2fr");
        right.elements.push(text.id.clone());
        doc.layout.main.columns = vec![left, right];
        doc.elements = vec![button, text];

        let json = doc.to_json().unwrap();
        let back = SiteDocument::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn view_mode_widths_match_toolbar_presets() {
        assert_eq!(ViewMode::Desktop.canvas_width(), "100%");
        assert_eq!(ViewMode::Tablet.canvas_width(), "768px");
        assert_eq!(ViewMode::Mobile.canvas_width(), "375px");
    }
}
