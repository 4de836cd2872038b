//! Edit scripts: JSON files describing a sequence of editor gestures.
//!
//! Nodes and pages are referred to by aliases bound with `"as"` when they
//! are created, e.g.
//!
//! ```json
//! {
//!   "definitions": [{ "nodeName": "Box" }],
//!   "steps": [
//!     { "op": "addPage", "as": "home" },
//!     { "op": "create", "node": "Box", "as": "card" },
//!     { "op": "insert", "target": "home", "nodes": ["card"] },
//!     { "op": "undo" }
//!   ]
//! }
//! ```

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use studio_editor::{commands, EditSession, NodeDefinition, NodeId, Point, Size};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Definitions registered on top of the project ones
    #[serde(default)]
    pub definitions: Vec<NodeDefinition>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    AddPage {
        #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
    RemovePage {
        page: String,
    },
    Create {
        node: String,
        #[serde(rename = "as")]
        alias: String,
    },
    Insert {
        target: String,
        nodes: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        before: Option<String>,
    },
    Remove {
        nodes: Vec<String>,
    },
    Resize {
        page: String,
        width: f64,
        height: f64,
    },
    Move {
        pages: Vec<String>,
        dx: f64,
        dy: f64,
    },
    SetProp {
        node: String,
        key: String,
        value: Value,
    },
    Select {
        nodes: Vec<String>,
    },
    SelectAll,
    ClearSelection,
    Copy,
    Paste {
        #[serde(rename = "as", default, skip_serializing_if = "Vec::is_empty")]
        aliases: Vec<String>,
    },
    Undo,
    Redo,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::AddPage { .. } => "addPage",
            Step::RemovePage { .. } => "removePage",
            Step::Create { .. } => "create",
            Step::Insert { .. } => "insert",
            Step::Remove { .. } => "remove",
            Step::Resize { .. } => "resize",
            Step::Move { .. } => "move",
            Step::SetProp { .. } => "setProp",
            Step::Select { .. } => "select",
            Step::SelectAll => "selectAll",
            Step::ClearSelection => "clearSelection",
            Step::Copy => "copy",
            Step::Paste { .. } => "paste",
            Step::Undo => "undo",
            Step::Redo => "redo",
        }
    }
}

/// Executes script steps against a session, tracking aliases
pub struct ScriptRunner {
    session: EditSession,
    aliases: HashMap<String, NodeId>,
}

impl ScriptRunner {
    pub fn new(session: EditSession) -> Self {
        Self {
            session,
            aliases: HashMap::new(),
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Register the script definitions, then run every step in order
    pub fn run(&mut self, script: &Script) -> Result<()> {
        for definition in &script.definitions {
            self.session
                .document_mut()
                .register_definition(definition.clone());
        }

        for (index, step) in script.steps.iter().enumerate() {
            self.step(step)
                .with_context(|| format!("step {} ({}) failed", index + 1, step.name()))?;
        }
        Ok(())
    }

    pub fn step(&mut self, step: &Step) -> Result<()> {
        debug!(op = step.name(), "running step");

        match step {
            Step::AddPage { alias } => {
                let page = commands::add_page(&mut self.session)?;
                if let Some(alias) = alias {
                    self.bind(alias, page);
                }
            }
            Step::RemovePage { page } => {
                let page = self.resolve(page)?;
                commands::remove_page(&mut self.session, page)?;
            }
            Step::Create { node, alias } => {
                let id = self.session.document_mut().create_node(node)?;
                self.bind(alias, id);
            }
            Step::Insert {
                target,
                nodes,
                before,
            } => {
                let target = self.resolve(target)?;
                let nodes = self.resolve_all(nodes)?;
                let before = before.as_deref().map(|alias| self.resolve(alias)).transpose()?;
                commands::insert_nodes(&mut self.session, target, &nodes, before)?;
            }
            Step::Remove { nodes } => {
                let nodes = self.resolve_all(nodes)?;
                commands::remove_nodes(&mut self.session, &nodes)?;
            }
            Step::Resize {
                page,
                width,
                height,
            } => {
                let page = self.resolve(page)?;
                commands::resize_page(&mut self.session, page, Size::new(*width, *height))?;
            }
            Step::Move { pages, dx, dy } => {
                let pages = self.resolve_all(pages)?;
                commands::move_pages(&mut self.session, &pages, Point::new(*dx, *dy))?;
            }
            Step::SetProp { node, key, value } => {
                let node = self.resolve(node)?;
                commands::set_prop(&mut self.session, node, key, value.clone())?;
            }
            Step::Select { nodes } => {
                let nodes = self.resolve_all(nodes)?;
                self.session.select(nodes);
            }
            Step::SelectAll => commands::select_all(&mut self.session),
            Step::ClearSelection => commands::clear_selection(&mut self.session),
            Step::Copy => {
                commands::copy_nodes(&mut self.session);
            }
            Step::Paste { aliases } => {
                let copies = commands::paste_nodes(&mut self.session)?;
                if aliases.len() > copies.len() {
                    bail!(
                        "paste produced {} nodes but {} aliases were given",
                        copies.len(),
                        aliases.len()
                    );
                }
                for (alias, copy) in aliases.iter().zip(copies) {
                    self.bind(alias, copy);
                }
            }
            Step::Undo => {
                if !self.session.undo() {
                    debug!("nothing to undo");
                }
            }
            Step::Redo => {
                if !self.session.redo() {
                    debug!("nothing to redo");
                }
            }
        }
        Ok(())
    }

    fn bind(&mut self, alias: &str, id: NodeId) {
        if let Some(previous) = self.aliases.insert(alias.to_string(), id) {
            debug!(alias, %previous, %id, "alias rebound");
        }
    }

    fn resolve(&self, alias: &str) -> Result<NodeId> {
        self.aliases
            .get(alias)
            .copied()
            .ok_or_else(|| anyhow!("unknown alias `{}`", alias))
    }

    fn resolve_all(&self, aliases: &[String]) -> Result<Vec<NodeId>> {
        aliases.iter().map(|alias| self.resolve(alias)).collect()
    }
}
