//! # Selection
//!
//! Reactive, ordered set of selected nodes.
//!
//! Gesture handlers read and write it freely. The document keeps it
//! consistent with the tree: removing nodes clears it, and any other path
//! that detaches nodes prunes them out.

use crate::node::NodeId;
use crate::store::{Atom, SubscriptionId};

#[derive(Debug, Default)]
pub struct Selection {
    nodes: Atom<Vec<NodeId>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &[NodeId] {
        self.nodes.get()
    }

    /// Replace the selection. Repeated ids keep their first position.
    pub fn set(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        let mut unique: Vec<NodeId> = Vec::new();
        for node in nodes {
            if !unique.contains(&node) {
                unique.push(node);
            }
        }
        self.nodes.set(unique);
    }

    pub fn clear(&mut self) {
        self.nodes.set(Vec::new());
    }

    /// Keep only the nodes matching `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        let kept: Vec<NodeId> = self.get().iter().copied().filter(|id| keep(*id)).collect();
        self.nodes.set(kept);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get().contains(&node)
    }

    pub fn len(&self) -> usize {
        self.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Vec<NodeId>) + 'static) -> SubscriptionId {
        self.nodes.subscribe(listener)
    }

    pub fn listen(&mut self, listener: impl FnMut(&Vec<NodeId>) + 'static) -> SubscriptionId {
        self.nodes.listen(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.nodes.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_set_drops_duplicates() {
        let mut selection = Selection::new();
        selection.set([NodeId(2), NodeId(1), NodeId(2)]);

        assert_eq!(selection.get(), &[NodeId(2), NodeId(1)]);
        assert!(selection.contains(NodeId(1)));
    }

    #[test]
    fn test_clear_notifies_once() {
        let calls = Rc::new(RefCell::new(0));
        let mut selection = Selection::new();
        selection.set([NodeId(1)]);

        let counter = calls.clone();
        selection.listen(move |_| *counter.borrow_mut() += 1);
        selection.clear();
        selection.clear();

        assert!(selection.is_empty());
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_retain_filters_in_order() {
        let mut selection = Selection::new();
        selection.set([NodeId(1), NodeId(2), NodeId(3)]);
        selection.retain(|id| id != NodeId(2));

        assert_eq!(selection.get(), &[NodeId(1), NodeId(3)]);
    }
}
