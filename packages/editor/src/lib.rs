//! # Studio Editor
//!
//! Document-mutation core of the studio visual editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ gestures: drag-drop, shortcuts, panels      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ commands: validate → mutate → record        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ EditSession                                 │
//! │  - Document: node arena, pages, selection   │
//! │  - History: actions + cursor                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ observers: reactive stores, Visitor         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Every change is an action**: commands mutate once, then record it
//! 2. **One gesture, one undo step**: multi-target edits share one action
//! 3. **Nodes outlive removal**: detached nodes keep their id for undo
//! 4. **Positions by sibling**: `(parent, next_sibling)`, resolved late
//! 5. **Selection follows the tree**: removals clear it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use studio_editor::{commands, EditSession, NodeDefinition};
//!
//! let mut session = EditSession::default();
//! session.document_mut().register_definition(NodeDefinition::new("Box"));
//!
//! let page = commands::add_page(&mut session)?;
//! let node = session.document_mut().create_node("Box")?;
//! commands::insert_nodes(&mut session, page, &[node], None)?;
//!
//! session.undo();
//! session.redo();
//! ```

mod action;
mod config;
mod document;
mod errors;
mod history;
mod node;
mod selection;
mod session;
mod store;

pub mod commands;
pub mod visitor;

pub use action::{Action, PropEntry};
pub use config::EditorConfig;
pub use document::{Ancestors, Detached, Document};
pub use errors::{EditorError, EditorResult, InsertionError};
pub use history::{History, DEFAULT_MAX_LEVELS};
pub use node::{
    Node, NodeDefinition, NodeId, NodeKind, PageState, Point, PropDefinition, PropFormat,
    PropOption, Size, DEFAULT_PAGE_LABEL, PAGE_NODE_NAME,
};
pub use selection::Selection;
pub use session::EditSession;
pub use store::{Atom, PropStore, SubscriptionId};
pub use visitor::{OutlineRenderer, Visitor};
