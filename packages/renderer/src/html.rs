//! Presentation tree → HTML string.

use crate::tree::{PageNode, PageTree};

/// Options for HTML emission
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: EmitOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: EmitOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Emit a full standalone page for a rendered tree.
pub fn render_html(tree: &PageTree, options: EmitOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    emit_head(tree, &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();
    for node in &tree.nodes {
        emit_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

/// Static error page substituted by the caller when the document cannot
/// be loaded. Not recoverable, not retried.
pub fn error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"UTF-8\">\n    <title>Error</title>\n  </head>\n  <body>\n    <h1 style=\"text-align: center; margin-top: 50px;\">Failed to load the site</h1>\n    <p style=\"text-align: center;\">{}</p>\n  </body>\n</html>\n",
        escape_html(message)
    )
}

fn emit_head(tree: &PageTree, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(&tree.title)));

    ctx.dedent();
    ctx.add_line("</head>");
}

fn emit_node(node: &PageNode, ctx: &mut Context) {
    match node {
        PageNode::Element {
            tag,
            attributes,
            styles,
            children,
        } => emit_element(tag, attributes, styles, children, ctx),

        PageNode::Text { content } => {
            ctx.add_line(&escape_html(content));
        }

        // Authored HTML passes through unescaped.
        PageNode::Raw { html } => {
            ctx.add_line(html);
        }
    }
}

fn emit_element(
    tag: &str,
    attributes: &std::collections::BTreeMap<String, String>,
    styles: &std::collections::BTreeMap<String, String>,
    children: &[PageNode],
    ctx: &mut Context,
) {
    if ctx.options.pretty {
        ctx.add_indent();
    }
    ctx.add(&format!("<{tag}"));

    for (name, value) in attributes {
        if value.is_empty() {
            ctx.add(&format!(" {name}"));
        } else {
            ctx.add(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
    }

    if !styles.is_empty() {
        ctx.add(" style=\"");
        for (key, value) in styles {
            ctx.add(&format!("{}: {}; ", css_key(key), value));
        }
        ctx.add("\"");
    }

    if children.is_empty() && is_self_closing(tag) {
        ctx.add(" />");
        if ctx.options.pretty {
            ctx.add("\n");
        }
        return;
    }

    ctx.add(">");
    if ctx.options.pretty {
        ctx.add("\n");
    }
    ctx.indent();

    for child in children {
        emit_node(child, ctx);
    }

    ctx.dedent();
    ctx.add_line(&format!("</{tag}>"));
}

/// camelCase style keys (the document's spelling) → css property names.
fn css_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_key_converts_camel_case() {
        assert_eq!(css_key("backgroundColor"), "background-color");
        assert_eq!(css_key("width"), "width");
        assert_eq!(css_key("borderRadius"), "border-radius");
    }

    #[test]
    fn emits_title_and_styles() {
        let mut tree = PageTree::new("My <Site>");
        tree.add_node(
            PageNode::element("div")
                .with_attr("id", "a")
                .with_style("backgroundColor", "#fff"),
        );

        let html = render_html(&tree, EmitOptions::default());
        assert!(html.contains("<title>My &lt;Site&gt;</title>"));
        assert!(html.contains("background-color: #fff;"));
    }

    #[test]
    fn raw_nodes_pass_through_unescaped() {
        let mut tree = PageTree::new("t");
        tree.add_node(PageNode::raw("<h1>Hello</h1>"));

        let html = render_html(&tree, EmitOptions::default());
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn boolean_attributes_render_bare() {
        let mut tree = PageTree::new("t");
        tree.add_node(
            PageNode::element("iframe")
                .with_attr("allowfullscreen", "")
                .with_attr("src", "https://x"),
        );

        let html = render_html(&tree, EmitOptions::default());
        assert!(html.contains("<iframe allowfullscreen src=\"https://x\">"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = error_page("boom <script>");
        assert!(html.contains("boom &lt;script&gt;"));
    }
}
