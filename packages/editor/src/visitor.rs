//! Read-only traversal of a document.
//!
//! External consumers (code generation, layer panels, the CLI outline) walk
//! the tree through [`Visitor`]. Override a `visit_*` method to act on a node
//! and call the matching `walk_*` function to keep descending.

use std::fmt::Write;

use crate::document::Document;
use crate::node::{Node, NodeId};

pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &Document) {
        walk_document(self, doc);
    }

    fn visit_page(&mut self, doc: &Document, page: NodeId) {
        walk_children(self, doc, page, 1);
    }

    fn visit_node(&mut self, doc: &Document, node: NodeId, depth: usize) {
        walk_children(self, doc, node, depth + 1);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    for &page in doc.pages() {
        visitor.visit_page(doc, page);
    }
}

pub fn walk_children<V: Visitor>(visitor: &mut V, doc: &Document, parent: NodeId, depth: usize) {
    for &child in doc.children(parent) {
        visitor.visit_node(doc, child, depth);
    }
}

/// Indented text rendering of every registered page
#[derive(Debug, Default)]
pub struct OutlineRenderer {
    out: String,
}

impl OutlineRenderer {
    pub fn render(doc: &Document) -> String {
        let mut renderer = Self::default();
        renderer.visit_document(doc);
        renderer.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{}{}", "  ".repeat(depth), text);
    }
}

impl Visitor for OutlineRenderer {
    fn visit_page(&mut self, doc: &Document, page: NodeId) {
        if let Some(state) = doc.page_state(page) {
            let size = state.dimensions.get();
            let origin = state.coordinates.get();
            let text = format!(
                "Page \"{}\" {}x{} @ {},{}",
                state.label.get(),
                size.width,
                size.height,
                origin.x,
                origin.y
            );
            self.line(0, &text);
        }
        walk_children(self, doc, page, 1);
    }

    fn visit_node(&mut self, doc: &Document, node: NodeId, depth: usize) {
        let text = describe(&doc[node]);
        self.line(depth, &text);
        walk_children(self, doc, node, depth + 1);
    }
}

fn describe(node: &Node) -> String {
    if node.props().is_empty() {
        return node.node_name().to_string();
    }

    let props: Vec<String> = node
        .props()
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    format!("{} [{}]", node.node_name(), props.join(", "))
}
