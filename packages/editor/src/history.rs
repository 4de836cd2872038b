//! # Undo/Redo History
//!
//! Tracks applied actions and replays them backwards or forwards.
//!
//! ## Design
//!
//! - One linear list of actions plus a cursor
//! - Actions before the cursor are applied (undoable), the rest are redoable
//! - Pushing discards everything at or after the cursor
//! - Actions are pushed *after* the command already applied them
//! - Undo/redo at either end is a silent no-op
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//! let mut doc = Document::new();
//!
//! // A command mutated `doc`, now record it
//! history.push(action);
//!
//! history.undo(&mut doc);
//! history.redo(&mut doc);
//! ```

use tracing::{debug, instrument};

use crate::action::Action;
use crate::document::Document;

/// Unlimited; trimming is opt-in through `with_max_levels`
pub const DEFAULT_MAX_LEVELS: usize = 0;

#[derive(Debug)]
pub struct History {
    actions: Vec<Action>,

    /// Number of applied actions; `actions[cursor..]` can be redone
    cursor: usize,

    /// Maximum number of kept actions (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Create a history that keeps every action
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            actions: Vec::new(),
            cursor: 0,
            max_levels,
        }
    }

    /// Record an action that has already been applied
    pub fn push(&mut self, action: Action) {
        self.actions.truncate(self.cursor);
        debug!(action = action.name(), cursor = self.cursor, "recording action");
        self.actions.push(action);

        if self.max_levels > 0 && self.actions.len() > self.max_levels {
            let overflow = self.actions.len() - self.max_levels;
            self.actions.drain(..overflow);
        }

        self.cursor = self.actions.len();
    }

    /// Revert the most recent applied action. Returns `false` if there was
    /// nothing to undo.
    #[instrument(skip_all, fields(cursor = self.cursor))]
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        if self.cursor == 0 {
            return false;
        }

        self.cursor -= 1;
        let action = &self.actions[self.cursor];
        debug!(action = action.name(), "undo");
        action.undo(doc);
        true
    }

    /// Reapply the next undone action. Returns `false` if there was nothing
    /// to redo.
    #[instrument(skip_all, fields(cursor = self.cursor))]
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(action) = self.actions.get(self.cursor) else {
            return false;
        };

        debug!(action = action.name(), "redo");
        action.redo(doc);
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.actions.len()
    }

    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    pub fn redo_levels(&self) -> usize {
        self.actions.len() - self.cursor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.cursor = 0;
    }

    /// Name of the action the next undo would revert
    pub fn undo_name(&self) -> Option<&'static str> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.actions.get(index))
            .map(Action::name)
    }

    /// Name of the action the next redo would reapply
    pub fn redo_name(&self) -> Option<&'static str> {
        self.actions.get(self.cursor).map(Action::name)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PropEntry;
    use crate::node::{NodeDefinition, NodeId};
    use serde_json::json;

    fn setup() -> (Document, NodeId) {
        let mut doc = Document::new();
        doc.register_definition(NodeDefinition::new("Text").leaf());
        let node = doc.create_node("Text").unwrap();
        (doc, node)
    }

    /// Apply a text change the way a command would and record it
    fn set_text(history: &mut History, doc: &mut Document, node: NodeId, text: &str) {
        let old = doc[node].props().get("text").cloned();
        doc[node].props_mut().set("text", json!(text));
        history.push(Action::PropChange {
            node,
            old_prop: PropEntry::new("text", old),
            new_prop: PropEntry::new("text", Some(json!(text))),
        });
    }

    fn text(doc: &Document, node: NodeId) -> Option<&serde_json::Value> {
        doc[node].props().get("text")
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_undo_redo() {
        let (mut doc, node) = setup();
        let mut history = History::new();

        set_text(&mut history, &mut doc, node, "Hello");
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.undo_name(), Some("PropChange"));

        assert!(history.undo(&mut doc));
        assert_eq!(text(&doc, node), None);
        assert_eq!(history.redo_levels(), 1);

        assert!(history.redo(&mut doc));
        assert_eq!(text(&doc, node), Some(&json!("Hello")));
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let (mut doc, node) = setup();
        let mut history = History::new();

        assert!(!history.undo(&mut doc));
        assert!(!history.redo(&mut doc));

        set_text(&mut history, &mut doc, node, "Hello");
        assert!(!history.redo(&mut doc));
        assert!(history.undo(&mut doc));
        assert!(!history.undo(&mut doc));
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_push_truncates_redo() {
        let (mut doc, node) = setup();
        let mut history = History::new();

        set_text(&mut history, &mut doc, node, "one");
        set_text(&mut history, &mut doc, node, "two");
        set_text(&mut history, &mut doc, node, "three");
        history.undo(&mut doc);
        history.undo(&mut doc);
        assert_eq!(history.redo_levels(), 2);

        set_text(&mut history, &mut doc, node, "branch");
        assert_eq!(history.redo_levels(), 0);
        assert_eq!(history.len(), 2);
        assert!(!history.redo(&mut doc));
        assert_eq!(text(&doc, node), Some(&json!("branch")));

        history.undo(&mut doc);
        assert_eq!(text(&doc, node), Some(&json!("one")));
    }

    #[test]
    fn test_max_levels_enforced() {
        let (mut doc, node) = setup();
        let mut history = History::with_max_levels(2);

        for i in 0..3 {
            set_text(&mut history, &mut doc, node, &format!("Text {}", i));
        }

        assert_eq!(history.undo_levels(), 2);
        assert!(history.undo(&mut doc));
        assert!(history.undo(&mut doc));
        assert!(!history.undo(&mut doc));
        assert_eq!(text(&doc, node), Some(&json!("Text 0")));
    }

    #[test]
    fn test_default_history_is_unlimited() {
        let (mut doc, node) = setup();
        let mut history = History::new();

        for i in 0..150 {
            set_text(&mut history, &mut doc, node, &format!("Text {}", i));
        }
        assert_eq!(history.undo_levels(), 150);

        while history.undo(&mut doc) {}
        assert_eq!(text(&doc, node), None);
    }

    #[test]
    fn test_clear() {
        let (mut doc, node) = setup();
        let mut history = History::new();
        set_text(&mut history, &mut doc, node, "Hello");

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.undo_name(), None);
        assert_eq!(history.redo_name(), None);
    }
}
