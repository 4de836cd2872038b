//! # Edit Session
//!
//! The state bundle every command works on: the document, its history, the
//! editor configuration and the clipboard.
//!
//! There is no global state. Gesture handlers hold an `EditSession` and pass
//! it to the functions in [`commands`](crate::commands).

use tracing::info;

use crate::action::Action;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::history::History;
use crate::node::NodeId;

#[derive(Debug)]
pub struct EditSession {
    document: Document,
    history: History,
    config: EditorConfig,

    /// Nodes copied by `commands::copy_nodes`
    pub(crate) clipboard: Vec<NodeId>,
}

impl EditSession {
    /// Empty document and history
    pub fn new(config: EditorConfig) -> Self {
        Self {
            document: Document::new(),
            history: History::with_max_levels(config.max_history_levels),
            config,
            clipboard: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access. Changes made here bypass history.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &[NodeId] {
        &self.clipboard
    }

    pub fn selection(&self) -> &[NodeId] {
        self.document.selection().get()
    }

    pub fn select(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        self.document.selection_mut().set(nodes);
    }

    /// Record an action the caller has already applied
    pub fn record(&mut self, action: Action) {
        info!(action = action.name(), "applied");
        self.history.push(action);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
