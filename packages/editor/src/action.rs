//! # Actions
//!
//! Reversible records of one user-level change.
//!
//! ## Design
//!
//! - A command mutates the document once, then records the matching action
//! - An action stores the minimal old/new diff, never a snapshot
//! - `undo` and `redo` replay the diff; they assume history calls them in
//!   strict push/undo/redo order
//! - A gesture touching several targets is still a single action
//!
//! ## Selection
//!
//! `RemoveNode::redo` clears the whole selection. Every other replay that can
//! detach nodes (including an insert under a detached parent) prunes the
//! selection down to attached nodes.

use serde_json::Value;
use tracing::debug;

use crate::document::{Detached, Document};
use crate::node::{NodeId, Point, Size};

/// One side of a property change. `value: None` means the key is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct PropEntry {
    pub key: String,
    pub value: Option<Value>,
}

impl PropEntry {
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddPage {
        page: NodeId,
    },

    RemovePage {
        page: NodeId,
    },

    /// Nodes moved under `new_parent`. `moved` keeps each node's old
    /// position in the order the nodes were detached.
    InsertNode {
        moved: Vec<Detached>,
        new_parent: NodeId,
        new_next_sibling: Option<NodeId>,
    },

    /// Nodes detached in order. An `old_parent` of `None` marks a page.
    RemoveNode {
        removed: Vec<Detached>,
    },

    PageResize {
        page: NodeId,
        old_size: Size,
        new_size: Size,
    },

    PageMove {
        pages: Vec<NodeId>,
        delta: Point,
    },

    PropChange {
        node: NodeId,
        old_prop: PropEntry,
        new_prop: PropEntry,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddPage { .. } => "AddPage",
            Action::RemovePage { .. } => "RemovePage",
            Action::InsertNode { .. } => "InsertNode",
            Action::RemoveNode { .. } => "RemoveNode",
            Action::PageResize { .. } => "PageResize",
            Action::PageMove { .. } => "PageMove",
            Action::PropChange { .. } => "PropChange",
        }
    }

    pub fn undo(&self, doc: &mut Document) {
        match self {
            Action::AddPage { page } => {
                Self::unregister_page(doc, *page);
            }

            Action::RemovePage { page } => {
                Self::register_page(doc, *page);
            }

            Action::InsertNode { moved, .. } => {
                for entry in moved.iter().rev() {
                    match entry.old_parent {
                        Some(parent) => {
                            doc.attach(parent, &[entry.node], entry.old_next_sibling);
                        }
                        None => {
                            doc.detach(entry.node);
                        }
                    }
                }
                doc.prune_selection();
            }

            Action::RemoveNode { removed } => {
                for entry in removed.iter().rev() {
                    Self::restore(doc, entry);
                }
            }

            Action::PageResize { page, old_size, .. } => {
                Self::resize(doc, *page, *old_size);
            }

            Action::PageMove { pages, delta } => {
                Self::translate(doc, pages, |coordinates| coordinates - *delta);
            }

            Action::PropChange { node, old_prop, .. } => {
                Self::assign(doc, *node, old_prop);
            }
        }
    }

    pub fn redo(&self, doc: &mut Document) {
        match self {
            Action::AddPage { page } => {
                Self::register_page(doc, *page);
            }

            Action::RemovePage { page } => {
                Self::unregister_page(doc, *page);
            }

            Action::InsertNode {
                moved,
                new_parent,
                new_next_sibling,
            } => {
                let nodes: Vec<NodeId> = moved.iter().map(|entry| entry.node).collect();
                doc.attach(*new_parent, &nodes, *new_next_sibling);
                doc.prune_selection();
            }

            Action::RemoveNode { removed } => {
                for entry in removed {
                    doc.detach(entry.node);
                }
                doc.selection_mut().clear();
            }

            Action::PageResize { page, new_size, .. } => {
                Self::resize(doc, *page, *new_size);
            }

            Action::PageMove { pages, delta } => {
                Self::translate(doc, pages, |coordinates| coordinates + *delta);
            }

            Action::PropChange { node, new_prop, .. } => {
                Self::assign(doc, *node, new_prop);
            }
        }
    }

    fn register_page(doc: &mut Document, page: NodeId) {
        if let Err(err) = doc.add_page(page) {
            debug!(%page, %err, "skipping page registration");
        }
    }

    fn unregister_page(doc: &mut Document, page: NodeId) {
        if let Err(err) = doc.remove_page(page) {
            debug!(%page, %err, "skipping page removal");
        }
        doc.prune_selection();
    }

    fn restore(doc: &mut Document, entry: &Detached) {
        match entry.old_parent {
            Some(parent) => {
                doc.attach(parent, &[entry.node], entry.old_next_sibling);
            }
            None => {
                if let Err(err) = doc.insert_page_before(entry.node, entry.old_next_sibling) {
                    debug!(
                        node = %entry.node,
                        %err,
                        "removed node was not a page, leaving detached"
                    );
                }
            }
        }
    }

    fn resize(doc: &mut Document, page: NodeId, size: Size) {
        match doc.page_state_mut(page) {
            Some(state) => state.dimensions.set(size),
            None => debug!(%page, "resize target is not a page"),
        }
    }

    fn translate(doc: &mut Document, pages: &[NodeId], shift: impl Fn(Point) -> Point) {
        for &page in pages {
            match doc.page_state_mut(page) {
                Some(state) => {
                    let moved = shift(*state.coordinates.get());
                    state.coordinates.set(moved);
                }
                None => debug!(%page, "move target is not a page"),
            }
        }
    }

    fn assign(doc: &mut Document, node: NodeId, prop: &PropEntry) {
        match doc.get_mut(node) {
            Some(target) => target.props_mut().assign(&prop.key, prop.value.clone()),
            None => debug!(%node, key = %prop.key, "property target not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeDefinition, DEFAULT_PAGE_LABEL};
    use serde_json::json;

    fn page_at(doc: &mut Document, x: f64, y: f64) -> NodeId {
        let page = doc.create_page(DEFAULT_PAGE_LABEL, Size::new(720.0, 640.0), Point::new(x, y));
        doc.add_page(page).unwrap();
        page
    }

    fn coordinates(doc: &Document, page: NodeId) -> Point {
        *doc.page_state(page).unwrap().coordinates.get()
    }

    #[test]
    fn test_page_move_batch() {
        let mut doc = Document::new();
        let p1 = page_at(&mut doc, 0.0, 0.0);
        let p2 = page_at(&mut doc, 100.0, 0.0);

        let action = Action::PageMove {
            pages: vec![p1, p2],
            delta: Point::new(10.0, 5.0),
        };

        action.redo(&mut doc);
        assert_eq!(coordinates(&doc, p1), Point::new(10.0, 5.0));
        assert_eq!(coordinates(&doc, p2), Point::new(110.0, 5.0));

        action.undo(&mut doc);
        assert_eq!(coordinates(&doc, p1), Point::new(0.0, 0.0));
        assert_eq!(coordinates(&doc, p2), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_page_resize() {
        let mut doc = Document::new();
        let page = page_at(&mut doc, 0.0, 0.0);
        let action = Action::PageResize {
            page,
            old_size: Size::new(720.0, 640.0),
            new_size: Size::new(1024.0, 768.0),
        };

        action.redo(&mut doc);
        assert_eq!(*doc.page_state(page).unwrap().dimensions.get(), Size::new(1024.0, 768.0));

        action.undo(&mut doc);
        assert_eq!(*doc.page_state(page).unwrap().dimensions.get(), Size::new(720.0, 640.0));
    }

    #[test]
    fn test_prop_change_restores_absent_key() {
        let mut doc = Document::new();
        doc.register_definition(NodeDefinition::new("Box"));
        let node = doc.create_node("Box").unwrap();
        doc[node].props_mut().set("color", json!("red"));

        let action = Action::PropChange {
            node,
            old_prop: PropEntry::new("color", None),
            new_prop: PropEntry::new("color", Some(json!("red"))),
        };

        action.undo(&mut doc);
        assert!(!doc[node].props().contains_key("color"));

        action.redo(&mut doc);
        assert_eq!(doc[node].props().get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_remove_node_redo_clears_whole_selection() {
        let mut doc = Document::new();
        doc.register_definition(NodeDefinition::new("Box"));
        let page = page_at(&mut doc, 0.0, 0.0);
        let a = doc.create_node("Box").unwrap();
        let b = doc.create_node("Box").unwrap();
        doc.insert_before(page, &[a, b], None).unwrap();
        doc.selection_mut().set([a, b]);

        let removed = vec![doc.remove(a).unwrap()];
        let action = Action::RemoveNode { removed };
        action.undo(&mut doc);
        assert_eq!(doc.children(page), &[a, b]);

        action.redo(&mut doc);
        assert_eq!(doc.children(page), &[b]);
        assert!(doc.selection().is_empty());
    }

    #[test]
    fn test_remove_page_undo_appends() {
        let mut doc = Document::new();
        let p1 = page_at(&mut doc, 0.0, 0.0);
        let p2 = page_at(&mut doc, 0.0, 0.0);
        doc.remove_page(p1).unwrap();

        let action = Action::RemovePage { page: p1 };
        action.undo(&mut doc);
        assert_eq!(doc.pages(), &[p2, p1]);

        action.redo(&mut doc);
        assert_eq!(doc.pages(), &[p2]);
    }

    #[test]
    fn test_add_page_undo_prunes_selection() {
        let mut doc = Document::new();
        let page = page_at(&mut doc, 0.0, 0.0);
        doc.selection_mut().set([page]);

        let action = Action::AddPage { page };
        action.undo(&mut doc);

        assert!(doc.pages().is_empty());
        assert!(doc.selection().is_empty());
    }
}
