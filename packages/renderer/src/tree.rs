use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Presentation-tree node.
///
/// `Raw` carries authored HTML (section content, text blocks) through to
/// emission unescaped; everything else is escaped on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageNode {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<PageNode>,
    },

    Text {
        content: String,
    },

    Raw {
        html: String,
    },
}

impl PageNode {
    pub fn element(tag: impl Into<String>) -> Self {
        PageNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        PageNode::Text {
            content: content.into(),
        }
    }

    pub fn raw(html: impl Into<String>) -> Self {
        PageNode::Raw { html: html.into() }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let PageNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let PageNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_styles<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if let PageNode::Element { ref mut styles, .. } = self {
            for (k, v) in pairs {
                styles.insert(k.into(), v.into());
            }
        }
        self
    }

    pub fn with_child(mut self, child: PageNode) -> Self {
        if let PageNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<PageNode>) -> Self {
        if let PageNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Attribute lookup, `None` for non-element nodes.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            PageNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        match self {
            PageNode::Element { styles, .. } => styles.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[PageNode] {
        match self {
            PageNode::Element { children, .. } => children,
            _ => &[],
        }
    }
}

/// Complete presentation tree for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTree {
    pub title: String,
    pub nodes: Vec<PageNode>,
}

impl PageTree {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: PageNode) {
        self.nodes.push(node);
    }

    /// Depth-first search for an element node whose `id` attribute matches.
    pub fn find_by_id(&self, id: &str) -> Option<&PageNode> {
        fn walk<'a>(node: &'a PageNode, id: &str) -> Option<&'a PageNode> {
            if node.attr("id") == Some(id) {
                return Some(node);
            }
            node.children().iter().find_map(|c| walk(c, id))
        }
        self.nodes.iter().find_map(|n| walk(n, id))
    }
}
