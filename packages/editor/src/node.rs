//! # Nodes
//!
//! Node data stored in the document arena, plus the definitions nodes are
//! created from.
//!
//! Nodes never own each other directly. A node lists its children by
//! [`NodeId`] and keeps its parent as a plain handle used for lookups only, so
//! the ownership edges of the tree are the `children` lists alone.

use crate::store::{Atom, PropStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Sub};

/// Node name used by every page
pub const PAGE_NODE_NAME: &str = "Page";

pub const DEFAULT_PAGE_LABEL: &str = "New Page";

/// Handle to a node in a [`Document`](crate::Document) arena.
///
/// Ids are never reused while the document lives, so an id captured by an
/// action keeps pointing at the same node after it is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Value format a property editor should offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropFormat {
    String,
    Number,
    Boolean,
    Object,
    Options { options: Vec<PropOption> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropOption {
    Plain(String),
    Labeled { value: String, label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDefinition {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub format: PropFormat,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropDefinition {
    pub fn new(key: impl Into<String>, format: PropFormat) -> Self {
        Self {
            key: key.into(),
            label: None,
            format,
            required: false,
            default: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Blueprint of an element node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub node_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Leaf nodes cannot have children
    #[serde(default)]
    pub leaf: bool,
    #[serde(default)]
    pub unselectable: bool,
    #[serde(default)]
    pub props: Vec<PropDefinition>,
}

impl NodeDefinition {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            display_name: None,
            leaf: false,
            unselectable: false,
            props: Vec::new(),
        }
    }

    pub fn leaf(mut self) -> Self {
        self.leaf = true;
        self
    }

    pub fn unselectable(mut self) -> Self {
        self.unselectable = true;
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_prop(mut self, prop: PropDefinition) -> Self {
        self.props.push(prop);
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.node_name)
    }

    /// Initial property values for a freshly created node
    pub fn default_props(&self) -> BTreeMap<String, Value> {
        self.props
            .iter()
            .filter_map(|prop| {
                prop.default
                    .clone()
                    .map(|value| (prop.key.clone(), value))
            })
            .collect()
    }
}

/// Page geometry and editor-facing state
#[derive(Debug)]
pub struct PageState {
    pub dimensions: Atom<Size>,
    pub coordinates: Atom<Point>,
    pub label: Atom<String>,
    /// Direct children that are unselectable, see
    /// [`Document::refresh_unselectable_nodes`](crate::Document::refresh_unselectable_nodes)
    pub unselectable_nodes: Atom<Vec<NodeId>>,
}

impl PageState {
    pub fn new(label: impl Into<String>, dimensions: Size, coordinates: Point) -> Self {
        Self {
            dimensions: Atom::new(dimensions),
            coordinates: Atom::new(coordinates),
            label: Atom::new(label.into()),
            unselectable_nodes: Atom::new(Vec::new()),
        }
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Element { leaf: bool, unselectable: bool },
    Page(Box<PageState>),
}

#[derive(Debug)]
pub struct Node {
    id: NodeId,
    node_name: String,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    props: PropStore,
}

impl Node {
    pub(crate) fn element(id: NodeId, definition: &NodeDefinition) -> Self {
        Self {
            id,
            node_name: definition.node_name.clone(),
            kind: NodeKind::Element {
                leaf: definition.leaf,
                unselectable: definition.unselectable,
            },
            parent: None,
            children: Vec::new(),
            props: PropStore::from_values(definition.default_props()),
        }
    }

    pub(crate) fn page(id: NodeId, state: PageState) -> Self {
        Self {
            id,
            node_name: PAGE_NODE_NAME.to_string(),
            kind: NodeKind::Page(Box::new(state)),
            parent: None,
            children: Vec::new(),
            props: PropStore::new(),
        }
    }

    /// Copy of this node's own data (no relationships, no listeners)
    pub(crate) fn duplicate(&self, id: NodeId) -> Self {
        let kind = match &self.kind {
            NodeKind::Element { leaf, unselectable } => NodeKind::Element {
                leaf: *leaf,
                unselectable: *unselectable,
            },
            NodeKind::Page(state) => NodeKind::Page(Box::new(PageState::new(
                state.label.get().clone(),
                *state.dimensions.get(),
                *state.coordinates.get(),
            ))),
        };

        Self {
            id,
            node_name: self.node_name.clone(),
            kind,
            parent: None,
            children: Vec::new(),
            props: PropStore::from_values(self.props.values().clone()),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn props(&self) -> &PropStore {
        &self.props
    }

    /// Direct access to the property store. Writes made here are not
    /// recorded in history; use [`commands::set_prop`](crate::commands::set_prop)
    /// for undoable edits.
    pub fn props_mut(&mut self) -> &mut PropStore {
        &mut self.props
    }

    pub fn is_page(&self) -> bool {
        matches!(self.kind, NodeKind::Page(_))
    }

    pub fn page_state(&self) -> Option<&PageState> {
        match &self.kind {
            NodeKind::Page(state) => Some(&**state),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn page_state_mut(&mut self) -> Option<&mut PageState> {
        match &mut self.kind {
            NodeKind::Page(state) => Some(&mut **state),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn is_droppable(&self) -> bool {
        match self.kind {
            NodeKind::Element { leaf, .. } => !leaf,
            NodeKind::Page(_) => true,
        }
    }

    pub fn is_unselectable(&self) -> bool {
        match self.kind {
            NodeKind::Element { unselectable, .. } => unselectable,
            NodeKind::Page(_) => false,
        }
    }

    pub fn is_selectable(&self) -> bool {
        !self.is_unselectable()
    }

    pub fn is_draggable(&self) -> bool {
        !self.is_page()
    }
}
