//! # Canvas Reconciliation
//!
//! The canvas is the editable on-screen mirror of the document. It walks
//! the same structure as the public renderer, but every element is wrapped
//! in an editor shell: a selection marker, a stable `data-element-id`
//! hook for drag and resize, and a sandboxed preview (iframes get a
//! restricted sandbox and forward no pointer events, buttons are inert),
//! so clicking anywhere on the shell selects the wrapper instead of
//! interacting with the embedded content.
//!
//! Reconciliation strategy: structural mutations rebuild the whole tree
//! via [`CanvasTree::build`]; field-level mutations go through
//! [`CanvasTree::patch_element`] / [`patch_section`](CanvasTree::patch_section),
//! which replace only the affected node and re-apply the selection marker
//! the replacement loses. The document is always the source of truth; the
//! canvas is disposable and re-derivable from it, and an incrementally
//! patched tree must stay equal to a fresh rebuild.

use mosaic_document::{
    Background, Column, Element, ElementContent, SectionChrome, SectionKind, SiteDocument,
};
use mosaic_renderer::PageNode;

use crate::mutations::ColumnOrder;

/// Editable mirror of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTree {
    pub header: PageNode,
    pub main_background: Option<Background>,
    pub columns: Vec<CanvasColumn>,
    pub footer: PageNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasColumn {
    pub id: String,
    pub width: String,
    pub elements: Vec<CanvasNode>,
}

/// One element wrapper on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasNode {
    pub element_id: String,
    pub selected: bool,
    wrapper: PageNode,
}

impl CanvasNode {
    fn new(el: &Element, selected: bool) -> Self {
        Self {
            element_id: el.id.clone(),
            selected,
            wrapper: admin_wrapper(el),
        }
    }
}

impl CanvasTree {
    /// Full rebuild from the document. Always correct; loses no document
    /// state because there is none outside the document.
    pub fn build(doc: &SiteDocument, selected: Option<&str>) -> Self {
        let columns = doc
            .layout
            .main
            .columns
            .iter()
            .map(|col| build_column(doc, col, selected))
            .collect();

        Self {
            header: section_node(&doc.layout.header, "header"),
            main_background: doc.layout.main.background.clone(),
            columns,
            footer: section_node(&doc.layout.footer, "footer"),
        }
    }

    /// Targeted patch: replace only the wrapper for `element_id`,
    /// keeping its selection marker. Quietly a no-op if the element is
    /// not on the canvas (structural changes go through `build`).
    pub fn patch_element(&mut self, doc: &SiteDocument, element_id: &str) {
        let Some(el) = doc.find_element(element_id) else {
            return;
        };
        for col in &mut self.columns {
            for node in &mut col.elements {
                if node.element_id == element_id {
                    let selected = node.selected;
                    *node = CanvasNode::new(el, selected);
                    return;
                }
            }
        }
    }

    /// Targeted patch for section chrome and backgrounds.
    pub fn patch_section(&mut self, doc: &SiteDocument, kind: SectionKind) {
        match kind {
            SectionKind::Header => self.header = section_node(&doc.layout.header, "header"),
            SectionKind::Footer => self.footer = section_node(&doc.layout.footer, "footer"),
            SectionKind::Main => self.main_background = doc.layout.main.background.clone(),
        }
    }

    /// Targeted patch for a column's width.
    pub fn patch_column(&mut self, doc: &SiteDocument, column_id: &str) {
        let Some(column) = doc.find_column(column_id) else {
            return;
        };
        if let Some(col) = self.columns.iter_mut().find(|c| c.id == column_id) {
            col.width = column.width.clone();
        }
    }

    /// Move the selection marker; `None` clears it.
    pub fn set_selection(&mut self, selected: Option<&str>) {
        for col in &mut self.columns {
            for node in &mut col.elements {
                node.selected = selected == Some(node.element_id.as_str());
            }
        }
    }

    pub fn find(&self, element_id: &str) -> Option<&CanvasNode> {
        self.columns
            .iter()
            .flat_map(|c| c.elements.iter())
            .find(|n| n.element_id == element_id)
    }

    /// Current column and element order, the input to a `SyncOrder`
    /// mutation at drop or save time.
    pub fn order(&self) -> Vec<ColumnOrder> {
        self.columns
            .iter()
            .map(|col| ColumnOrder {
                column_id: col.id.clone(),
                elements: col.elements.iter().map(|n| n.element_id.clone()).collect(),
            })
            .collect()
    }

    /// Compose the presentation nodes the editor page shows. Selection
    /// is applied here so moving it never touches the cached wrappers.
    pub fn to_nodes(&self) -> Vec<PageNode> {
        let mut main = PageNode::element("main")
            .with_attr("id", "element-container")
            .with_style("display", "flex");
        main = apply_background(main, self.main_background.as_ref());

        for col in &self.columns {
            let mut column_node = PageNode::element("div")
                .with_attr("class", "layout-column sortable-column")
                .with_attr("data-column-id", col.id.clone())
                .with_style("flexBasis", col.width.clone());
            for node in &col.elements {
                let mut wrapper = node.wrapper.clone();
                if node.selected {
                    mark_selected(&mut wrapper);
                }
                column_node = column_node.with_child(wrapper);
            }
            main = main.with_child(column_node);
        }

        vec![self.header.clone(), main, self.footer.clone()]
    }
}

fn build_column(doc: &SiteDocument, column: &Column, selected: Option<&str>) -> CanvasColumn {
    let elements = column
        .elements
        .iter()
        .filter_map(|id| doc.find_element(id))
        .map(|el| CanvasNode::new(el, selected == Some(el.id.as_str())))
        .collect();

    CanvasColumn {
        id: column.id.clone(),
        width: column.width.clone(),
        elements,
    }
}

fn section_node(section: &SectionChrome, tag: &str) -> PageNode {
    let node = PageNode::element(tag)
        .with_attr("id", format!("canvas-{tag}"))
        .with_styles(section.styles.clone())
        .with_child(PageNode::raw(section.content.clone()));
    apply_background(node, section.background.as_ref())
}

/// The editor shell around one element: id hook, element styles, dimmed
/// when hidden from the public page, sandboxed preview inside.
fn admin_wrapper(el: &Element) -> PageNode {
    let mut wrapper = PageNode::element("div")
        .with_attr("class", format!("admin-element-wrapper type-{}", type_tag(el)))
        .with_attr("data-element-id", el.id.clone())
        .with_styles(el.style.clone());

    if !el.visible {
        wrapper = wrapper.with_style("opacity", "0.4");
    }

    wrapper
        .with_child(
            PageNode::element("div").with_attr("class", "admin-element-overlay"),
        )
        .with_child(sandboxed_preview(el))
}

/// Element preview with no live behavior: embedded frames are sandboxed
/// and forward no pointer events, buttons are inert.
fn sandboxed_preview(el: &Element) -> PageNode {
    match &el.content {
        ElementContent::Text { html } => PageNode::raw(html.clone()),

        ElementContent::Photo { url } => PageNode::element("img")
            .with_attr("src", url.clone())
            .with_attr("alt", el.admin_title.clone()),

        ElementContent::Video { url }
        | ElementContent::Reels { url }
        | ElementContent::Embed { url } => PageNode::element("iframe")
            .with_attr("src", url.clone())
            .with_attr("frameborder", "0")
            .with_attr("sandbox", "allow-scripts")
            .with_style("pointerEvents", "none"),

        ElementContent::Button { text, .. } => PageNode::element("button")
            .with_style("pointerEvents", "none")
            .with_child(PageNode::text(text.clone())),
    }
}

fn apply_background(node: PageNode, background: Option<&Background>) -> PageNode {
    match background {
        None => node,
        Some(Background::Color { value }) => node
            .with_style("backgroundColor", value.clone())
            .with_style("backgroundImage", "none"),
        Some(Background::Image { value }) => node
            .with_style("backgroundImage", format!("url('{value}')"))
            .with_style("backgroundSize", "cover")
            .with_style("backgroundPosition", "center")
            .with_style("backgroundColor", "transparent"),
        Some(Background::Video { url }) => node.with_child(
            PageNode::element("video")
                .with_attr("class", "section-background-video")
                .with_attr("src", url.clone())
                .with_attr("autoplay", "")
                .with_attr("muted", "")
                .with_attr("loop", ""),
        ),
    }
}

fn mark_selected(wrapper: &mut PageNode) {
    if let PageNode::Element { attributes, .. } = wrapper {
        let class = attributes.entry("class".to_string()).or_default();
        class.push_str(" selected");
    }
}

fn type_tag(el: &Element) -> &'static str {
    match el.content {
        ElementContent::Text { .. } => "textBlock",
        ElementContent::Photo { .. } => "photo",
        ElementContent::Video { .. } => "videoBlock",
        ElementContent::Reels { .. } => "reels",
        ElementContent::Embed { .. } => "externalBlock",
        ElementContent::Button { .. } => "button",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_document::{Column, Element, ElementKind};

    fn doc_with_elements(kinds: &[ElementKind]) -> (SiteDocument, Vec<String>) {
        let mut doc = SiteDocument::empty();
        let mut col = Column::new("col-1", "1fr");
        let mut ids = Vec::new();
        for kind in kinds {
            let el = Element::new(*kind);
            ids.push(el.id.clone());
            col.elements.push(el.id.clone());
            doc.elements.push(el);
        }
        doc.layout.main.columns.push(col);
        (doc, ids)
    }

    #[test]
    fn patched_tree_equals_rebuild() {
        let (mut doc, ids) = doc_with_elements(&[ElementKind::TextBlock, ElementKind::Photo]);
        let mut canvas = CanvasTree::build(&doc, Some(&ids[0]));

        doc.find_element_mut(&ids[0])
            .unwrap()
            .style
            .insert("width".to_string(), "300px".to_string());
        canvas.patch_element(&doc, &ids[0]);

        assert_eq!(canvas, CanvasTree::build(&doc, Some(&ids[0])));
    }

    #[test]
    fn patch_preserves_selection_marker() {
        let (mut doc, ids) = doc_with_elements(&[ElementKind::Button]);
        let mut canvas = CanvasTree::build(&doc, Some(&ids[0]));

        if let ElementContent::Button { text, .. } =
            &mut doc.find_element_mut(&ids[0]).unwrap().content
        {
            *text = "Buy".to_string();
        }
        canvas.patch_element(&doc, &ids[0]);

        assert!(canvas.find(&ids[0]).unwrap().selected);
        let nodes = canvas.to_nodes();
        let column = &nodes[1].children()[0];
        assert!(column.children()[0]
            .attr("class")
            .unwrap()
            .ends_with("selected"));
    }

    #[test]
    fn embedded_frames_are_sandboxed_and_inert() {
        let (doc, _ids) = doc_with_elements(&[ElementKind::VideoBlock]);
        let canvas = CanvasTree::build(&doc, None);

        let nodes = canvas.to_nodes();
        let wrapper = &nodes[1].children()[0].children()[0];
        let iframe = &wrapper.children()[1];
        assert_eq!(iframe.attr("sandbox"), Some("allow-scripts"));
        assert_eq!(iframe.style("pointerEvents"), Some("none"));
    }

    #[test]
    fn hidden_elements_stay_on_canvas_dimmed() {
        let (mut doc, ids) = doc_with_elements(&[ElementKind::Photo]);
        doc.find_element_mut(&ids[0]).unwrap().visible = false;

        let canvas = CanvasTree::build(&doc, None);
        assert!(canvas.find(&ids[0]).is_some());

        let nodes = canvas.to_nodes();
        let wrapper = &nodes[1].children()[0].children()[0];
        assert_eq!(wrapper.style("opacity"), Some("0.4"));
    }

    #[test]
    fn order_reports_canvas_state() {
        let (doc, ids) = doc_with_elements(&[ElementKind::TextBlock, ElementKind::Button]);
        let canvas = CanvasTree::build(&doc, None);

        let order = canvas.order();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].column_id, "col-1");
        assert_eq!(order[0].elements, ids);
    }

    #[test]
    fn section_patch_tracks_background_switch() {
        let (mut doc, _) = doc_with_elements(&[]);
        let mut canvas = CanvasTree::build(&doc, None);

        doc.layout.header.background = Some(Background::Image {
            value: "https://x/y.png".to_string(),
        });
        canvas.patch_section(&doc, SectionKind::Header);

        assert_eq!(canvas, CanvasTree::build(&doc, None));
        assert_eq!(
            canvas.header.style("backgroundImage"),
            Some("url('https://x/y.png')")
        );
        assert_eq!(canvas.header.style("backgroundColor"), Some("transparent"));
    }
}
