//! # Document
//!
//! Node arena, page registry and selection of one studio document.
//!
//! ## Structure
//!
//! ```text
//! pages:  [Page1, Page2]          registry order, pages have no parent
//!           │
//!           └─ children: [A, B]   ownership edges, parent is a lookup handle
//!                         │
//!                         └─ children: [C]
//! ```
//!
//! Nodes are allocated once and never freed while the document lives.
//! Removing a node only detaches it, so undo can reattach the same node.
//!
//! ## Positions
//!
//! A position is recorded as `(parent, next_sibling)` instead of an index.
//! The sibling is resolved when the position is used; if it is no longer a
//! child of that parent the node is appended instead.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use tracing::debug;

use crate::errors::{EditorError, EditorResult, InsertionError};
use crate::node::{Node, NodeDefinition, NodeId, PageState, Point, Size};
use crate::selection::Selection;

/// Where a node sat before it was detached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detached {
    pub node: NodeId,
    /// `None` for pages and for nodes that were already detached
    pub old_parent: Option<NodeId>,
    /// Next sibling (or next page) at the time of detaching
    pub old_next_sibling: Option<NodeId>,
}

#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    pages: Vec<NodeId>,
    selection: Selection,
    definitions: HashMap<String, NodeDefinition>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node definition, replacing any with the same name
    pub fn register_definition(&mut self, definition: NodeDefinition) {
        self.definitions
            .insert(definition.node_name.clone(), definition);
    }

    pub fn definition(&self, node_name: &str) -> Option<&NodeDefinition> {
        self.definitions.get(node_name)
    }

    /// Create a detached element node from a registered definition
    pub fn create_node(&mut self, node_name: &str) -> EditorResult<NodeId> {
        let definition = self
            .definitions
            .get(node_name)
            .ok_or_else(|| EditorError::UnknownDefinition(node_name.to_string()))?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::element(id, definition));
        Ok(id)
    }

    /// Create a page that is not yet part of the registry
    pub fn create_page(
        &mut self,
        label: impl Into<String>,
        dimensions: Size,
        coordinates: Point,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::page(id, PageState::new(label, dimensions, coordinates)));
        id
    }

    /// Deep copy of a subtree. The copy is detached and gets fresh ids.
    pub fn clone_subtree(&mut self, id: NodeId) -> EditorResult<NodeId> {
        self.ensure_exists(id)?;

        let copy = NodeId(self.nodes.len());
        let node = self.nodes[id.0].duplicate(copy);
        self.nodes.push(node);

        let children = self.nodes[id.0].children.clone();
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            self.nodes[child_copy.0].parent = Some(copy);
            self.nodes[copy.0].children.push(child_copy);
        }

        Ok(copy)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Every node ever created, attached or not
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered pages, in order
    pub fn pages(&self) -> &[NodeId] {
        &self.pages
    }

    pub fn is_page(&self, id: NodeId) -> bool {
        self.get(id).map_or(false, Node::is_page)
    }

    pub fn is_registered_page(&self, id: NodeId) -> bool {
        self.pages.contains(&id)
    }

    pub fn page_state(&self, id: NodeId) -> Option<&PageState> {
        self.get(id).and_then(Node::page_state)
    }

    pub fn page_state_mut(&mut self, id: NodeId) -> Option<&mut PageState> {
        self.get_mut(id).and_then(Node::page_state_mut)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    /// Following sibling under the same parent, or the following page for
    /// registered pages
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings: &[NodeId] = match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &self.pages,
        };
        let position = siblings.iter().position(|sibling| *sibling == id)?;
        siblings.get(position + 1).copied()
    }

    /// Parent chain, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.parent(id),
        }
    }

    /// All nodes below `id` in pre-order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// True if `ancestor` is `id` itself or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        ancestor == id || self.ancestors(id).any(|node| node == ancestor)
    }

    /// Topmost node of the chain containing `id`
    pub fn root(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Enclosing page. A page is its own owner page.
    pub fn owner_page(&self, id: NodeId) -> Option<NodeId> {
        let root = self.root(id);
        self.is_page(root).then_some(root)
    }

    /// True if `id` is a registered page or hangs below one
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_registered_page(self.root(id))
    }

    pub fn is_droppable(&self, id: NodeId) -> bool {
        self.get(id).map_or(false, Node::is_droppable)
    }

    /// Check that `nodes` can be inserted under `parent` without mutating
    pub fn validate_insertion(&self, parent: NodeId, nodes: &[NodeId]) -> EditorResult<()> {
        self.ensure_exists(parent)?;
        if !self.is_droppable(parent) {
            return Err(InsertionError::NotDroppable(parent).into());
        }

        for (index, &node) in nodes.iter().enumerate() {
            self.ensure_exists(node)?;

            if self.is_page(node) {
                return Err(InsertionError::PageAsChild(node).into());
            }

            if nodes[..index].contains(&node) {
                return Err(InsertionError::DuplicateNode(node).into());
            }

            if self.is_ancestor_or_self(node, parent) {
                return Err(InsertionError::Cycle {
                    node,
                    target: parent,
                }
                .into());
            }
        }

        Ok(())
    }

    /// Insert `nodes` as children of `parent`, right before `reference`.
    ///
    /// With no reference, or one that is not a child of `parent`, the nodes
    /// are appended. Each node is detached from its old position first, in
    /// order; the returned records describe those old positions.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        nodes: &[NodeId],
        reference: Option<NodeId>,
    ) -> EditorResult<Vec<Detached>> {
        self.validate_insertion(parent, nodes)?;
        Ok(self.attach(parent, nodes, reference))
    }

    /// Detach `id` from its parent, or from the registry if it is a page
    pub fn remove(&mut self, id: NodeId) -> EditorResult<Detached> {
        self.ensure_exists(id)?;
        Ok(self.detach(id))
    }

    /// Append a page to the registry. Already registered pages stay put.
    pub fn add_page(&mut self, page: NodeId) -> EditorResult<()> {
        self.ensure_page(page)?;
        if !self.is_registered_page(page) {
            self.pages.push(page);
        }
        Ok(())
    }

    /// Take a page out of the registry, returning its former index
    pub fn remove_page(&mut self, page: NodeId) -> EditorResult<Option<usize>> {
        self.ensure_page(page)?;
        let position = self.pages.iter().position(|id| *id == page);
        if let Some(position) = position {
            self.pages.remove(position);
        }
        Ok(position)
    }

    /// Register `page` right before `next_page`, or last if `next_page` is
    /// absent or not registered
    pub fn insert_page_before(
        &mut self,
        page: NodeId,
        next_page: Option<NodeId>,
    ) -> EditorResult<()> {
        self.ensure_page(page)?;
        self.pages.retain(|id| *id != page);

        let index = match next_page {
            Some(next) => match self.pages.iter().position(|id| *id == next) {
                Some(index) => index,
                None => {
                    debug!(%page, %next, "next page is no longer registered, appending");
                    self.pages.len()
                }
            },
            None => self.pages.len(),
        };
        self.pages.insert(index, page);
        Ok(())
    }

    /// Recompute a page's cache of unselectable direct children
    pub fn refresh_unselectable_nodes(&mut self, page: NodeId) -> EditorResult<()> {
        self.ensure_page(page)?;
        let unselectable: Vec<NodeId> = self
            .children(page)
            .iter()
            .copied()
            .filter(|child| self.nodes[child.0].is_unselectable())
            .collect();

        if let Some(state) = self.page_state_mut(page) {
            state.unselectable_nodes.set(unselectable);
        }
        Ok(())
    }

    /// Drop selected nodes that are no longer attached
    pub fn prune_selection(&mut self) {
        let nodes = &self.nodes;
        let pages = &self.pages;
        self.selection.retain(|id| {
            let mut root = id;
            while let Some(parent) = nodes.get(root.0).and_then(Node::parent) {
                root = parent;
            }
            pages.contains(&root)
        });
    }

    /// First sibling from `reference` onwards that is not one of `moving`.
    ///
    /// Inserting a node before itself would otherwise lose its anchor once it
    /// is detached.
    pub fn resolve_anchor(
        &self,
        parent: NodeId,
        reference: NodeId,
        moving: &[NodeId],
    ) -> Option<NodeId> {
        let mut candidate = Some(reference);
        while let Some(node) = candidate {
            if !moving.contains(&node) {
                return Some(node);
            }
            candidate = if self.parent(node) == Some(parent) {
                self.next_sibling(node)
            } else {
                None
            };
        }
        None
    }

    /// Unchecked insert used by validated commands and history replay
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        nodes: &[NodeId],
        reference: Option<NodeId>,
    ) -> Vec<Detached> {
        let anchor = reference.and_then(|reference| self.resolve_anchor(parent, reference, nodes));
        let detached: Vec<Detached> = nodes.iter().map(|&node| self.detach(node)).collect();

        let children = &self.nodes[parent.0].children;
        let index = match anchor {
            Some(anchor) => match children.iter().position(|child| *child == anchor) {
                Some(index) => index,
                None => {
                    debug!(%parent, %anchor, "next sibling is no longer a child, appending");
                    children.len()
                }
            },
            None => children.len(),
        };

        for (offset, &node) in nodes.iter().enumerate() {
            self.nodes[parent.0].children.insert(index + offset, node);
            self.nodes[node.0].parent = Some(parent);
        }

        debug!(%parent, count = nodes.len(), index, "attached nodes");
        detached
    }

    pub(crate) fn detach(&mut self, id: NodeId) -> Detached {
        match self.nodes[id.0].parent {
            Some(parent) => {
                let siblings = &mut self.nodes[parent.0].children;
                let old_next_sibling = match siblings.iter().position(|child| *child == id) {
                    Some(position) => {
                        siblings.remove(position);
                        siblings.get(position).copied()
                    }
                    None => None,
                };
                self.nodes[id.0].parent = None;

                Detached {
                    node: id,
                    old_parent: Some(parent),
                    old_next_sibling,
                }
            }
            None => {
                let old_next_sibling = match self.pages.iter().position(|page| *page == id) {
                    Some(position) => {
                        self.pages.remove(position);
                        self.pages.get(position).copied()
                    }
                    None => None,
                };

                Detached {
                    node: id,
                    old_parent: None,
                    old_next_sibling,
                }
            }
        }
    }

    fn ensure_exists(&self, id: NodeId) -> EditorResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(EditorError::NodeNotFound(id))
        }
    }

    fn ensure_page(&self, id: NodeId) -> EditorResult<()> {
        self.ensure_exists(id)?;
        if self.is_page(id) {
            Ok(())
        } else {
            Err(EditorError::NotAPage(id))
        }
    }
}

/// # Panics
///
/// Panics if `id` does not belong to this document.
impl Index<NodeId> for Document {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Document {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}
