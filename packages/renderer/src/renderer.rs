//! Document → presentation tree.
//!
//! `render` is a pure function of the document: re-invoking it with an
//! unchanged document produces a structurally identical tree. It never
//! mutates the document.

use mosaic_document::{
    Background, ButtonAction, Column, Element, ElementContent, SectionChrome, SiteDocument,
};

use crate::tree::{PageNode, PageTree};

/// Render the public presentation tree for a document.
///
/// Traversal order: header, main (columns in array order, elements in
/// column order), footer, then one modal overlay per modal button.
/// Ids that resolve to no element and elements with `visible = false`
/// are skipped silently.
pub fn render(doc: &SiteDocument) -> PageTree {
    let mut tree = PageTree::new(doc.global_settings.page_title.clone());

    tree.add_node(render_chrome_section("header", &doc.layout.header));
    tree.add_node(render_main(doc));
    tree.add_node(render_chrome_section("footer", &doc.layout.footer));

    for el in visible_elements(doc) {
        if let ElementContent::Button {
            action: ButtonAction::OpenModal,
            modal_content,
            ..
        } = &el.content
        {
            tree.add_node(render_modal_overlay(el, modal_content.as_deref()));
        }
    }

    tree
}

fn render_chrome_section(tag: &str, section: &SectionChrome) -> PageNode {
    let mut node = PageNode::element(tag)
        .with_attr("id", format!("page-{tag}"))
        .with_styles(section.styles.clone())
        .with_child(PageNode::raw(section.content.clone()));
    node = apply_background(node, section.background.as_ref());
    node
}

fn render_main(doc: &SiteDocument) -> PageNode {
    let mut main = PageNode::element("main")
        .with_attr("id", "element-container")
        .with_style("display", "flex");
    main = apply_background(main, doc.layout.main.background.as_ref());

    for column in &doc.layout.main.columns {
        main = main.with_child(render_column(doc, column));
    }
    main
}

fn render_column(doc: &SiteDocument, column: &Column) -> PageNode {
    let mut node = PageNode::element("div")
        .with_attr("class", "layout-column")
        .with_attr("data-column-id", column.id.clone())
        .with_style("flexBasis", column.width.clone());

    for id in &column.elements {
        let Some(el) = doc.find_element(id) else {
            continue;
        };
        if !el.visible {
            continue;
        }
        node = node.with_child(render_element(el));
    }
    node
}

/// One content block → one wrapper node with live content.
pub fn render_element(el: &Element) -> PageNode {
    let wrapper = PageNode::element("div")
        .with_attr("class", format!("element-wrapper type-{}", kind_tag(el)))
        .with_attr("id", el.id.clone())
        .with_styles(el.style.clone());

    wrapper.with_child(render_content(el))
}

fn render_content(el: &Element) -> PageNode {
    match &el.content {
        ElementContent::Text { html } => PageNode::raw(html.clone()),

        ElementContent::Photo { url } => PageNode::element("img")
            .with_attr("src", url.clone())
            .with_attr("alt", el.admin_title.clone())
            .with_attr("loading", "lazy"),

        ElementContent::Video { url }
        | ElementContent::Reels { url }
        | ElementContent::Embed { url } => PageNode::element("iframe")
            .with_attr("src", url.clone())
            .with_attr("frameborder", "0")
            .with_attr("allowfullscreen", "")
            .with_attr("loading", "lazy"),

        ElementContent::Button {
            text,
            action,
            link,
            ..
        } => match action {
            // A real navigation target, not an editor affordance.
            ButtonAction::OpenLink => PageNode::element("a")
                .with_attr("class", "element-button")
                .with_attr("href", link.clone().unwrap_or_default())
                .with_attr("target", "_blank")
                .with_attr("rel", "noopener")
                .with_child(PageNode::text(text.clone())),

            ButtonAction::OpenModal => PageNode::element("button")
                .with_attr("class", "element-button modal-trigger")
                .with_attr("data-action", "openModal")
                .with_attr("data-modal-target", format!("modal-{}", el.id))
                .with_child(PageNode::text(text.clone())),
        },
    }
}

fn render_modal_overlay(el: &Element, modal_content: Option<&str>) -> PageNode {
    PageNode::element("div")
        .with_attr("class", "modal-overlay")
        .with_attr("id", format!("modal-{}", el.id))
        .with_child(
            PageNode::element("div")
                .with_attr("class", "modal-body")
                .with_child(PageNode::raw(
                    modal_content.unwrap_or("<p>No content.</p>").to_string(),
                )),
        )
}

/// Backgrounds resolve independently per section: color → a direct style
/// property, image → a layered cover, video → a layered media node.
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

fn visible_elements(doc: &SiteDocument) -> impl Iterator<Item = &Element> {
    doc.layout
        .main
        .columns
        .iter()
        .flat_map(|col| col.elements.iter())
        .filter_map(|id| doc.find_element(id))
        .filter(|el| el.visible)
}

fn kind_tag(el: &Element) -> &'static str {
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

    fn doc_with_one_element(el: Element) -> SiteDocument {
        let mut doc = SiteDocument::empty();
        let mut col = Column::new("col-1", "1fr");
        col.elements.push(el.id.clone());
        doc.layout.main.columns.push(col);
        doc.elements.push(el);
        doc
    }

    #[test]
    fn render_is_pure() {
        let doc = doc_with_one_element(Element::new(ElementKind::TextBlock));
        assert_eq!(render(&doc), render(&doc));
    }

    #[test]
    fn hidden_elements_are_skipped() {
        let mut el = Element::new(ElementKind::Photo);
        el.visible = false;
        let id = el.id.clone();
        let doc = doc_with_one_element(el);

        let tree = render(&doc);
        assert!(tree.find_by_id(&id).is_none());
    }

    #[test]
    fn unresolved_ids_are_skipped_silently() {
        let mut doc = SiteDocument::empty();
        let mut col = Column::new("col-1", "1fr");
        col.elements.push("el-gone".to_string());
        doc.layout.main.columns.push(col);

        let tree = render(&doc);
        let main = &tree.nodes[1];
        assert_eq!(main.children()[0].children().len(), 0);
    }

    #[test]
    fn open_link_button_renders_navigation_target() {
        let mut el = Element::new(ElementKind::Button);
        if let ElementContent::Button { link, .. } = &mut el.content {
            *link = Some("https://example.com".to_string());
        }
        let id = el.id.clone();
        let doc = doc_with_one_element(el);

        let tree = render(&doc);
        let wrapper = tree.find_by_id(&id).unwrap();
        let anchor = &wrapper.children()[0];
        assert_eq!(anchor.attr("href"), Some("https://example.com"));
    }

    #[test]
    fn image_background_clears_color() {
        let mut doc = SiteDocument::empty();
        doc.layout.header.background = Some(Background::Image {
            value: "https://x/y.png".to_string(),
        });

        let tree = render(&doc);
        let header = &tree.nodes[0];
        assert_eq!(
            header.style("backgroundImage"),
            Some("url('https://x/y.png')")
        );
        assert_eq!(header.style("backgroundColor"), Some("transparent"));
    }

    #[test]
    fn modal_button_emits_overlay() {
        let mut el = Element::new(ElementKind::Button);
        if let ElementContent::Button {
            action,
            modal_content,
            ..
        } = &mut el.content
        {
            *action = ButtonAction::OpenModal;
            *modal_content = Some("<p>hi</p>".to_string());
        }
        let id = el.id.clone();
        let doc = doc_with_one_element(el);

        let tree = render(&doc);
        assert!(tree.find_by_id(&format!("modal-{id}")).is_some());
    }
}
