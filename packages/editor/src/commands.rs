//! # Commands
//!
//! Entry points for gesture handlers (drag-and-drop, shortcuts, property
//! panels, the component drawer).
//!
//! Every command follows the same shape:
//!
//! 1. Validate. On failure nothing is mutated and nothing is recorded
//! 2. Mutate the document once
//! 3. Record exactly one action describing the change
//!
//! Commands that turn out to change nothing record nothing.

use serde_json::Value;
use tracing::info;

use crate::action::{Action, PropEntry};
use crate::document::Detached;
use crate::errors::{EditorError, EditorResult};
use crate::node::{NodeId, Point, Size};
use crate::session::EditSession;

/// Insert `nodes` under `target`, before `reference` (append when `None`).
///
/// All nodes land in one `InsertNode` action, whatever their old parents.
pub fn insert_nodes(
    session: &mut EditSession,
    target: NodeId,
    nodes: &[NodeId],
    reference: Option<NodeId>,
) -> EditorResult<()> {
    if nodes.is_empty() {
        return Ok(());
    }

    let doc = session.document_mut();
    let anchor = reference.and_then(|reference| doc.resolve_anchor(target, reference, nodes));
    let moved = doc.insert_before(target, nodes, anchor)?;
    // The target may itself be detached
    doc.prune_selection();

    info!(%target, count = nodes.len(), "inserted nodes");
    session.record(Action::InsertNode {
        moved,
        new_parent: target,
        new_next_sibling: anchor,
    });
    Ok(())
}

/// Detach `nodes` (pages included) and clear the selection.
///
/// Nodes whose ancestor is also listed travel with that ancestor; nodes that
/// are already detached are skipped.
pub fn remove_nodes(session: &mut EditSession, nodes: &[NodeId]) -> EditorResult<()> {
    let doc = session.document();
    if let Some(missing) = nodes.iter().copied().find(|node| !doc.contains(*node)) {
        return Err(EditorError::NodeNotFound(missing));
    }

    let mut targets: Vec<NodeId> = Vec::new();
    for &node in nodes {
        let detached = doc.parent(node).is_none() && !doc.is_registered_page(node);
        let covered = nodes
            .iter()
            .any(|other| *other != node && doc.is_ancestor_or_self(*other, node));
        if !detached && !covered && !targets.contains(&node) {
            targets.push(node);
        }
    }

    if targets.is_empty() {
        return Ok(());
    }

    let doc = session.document_mut();
    let removed: Vec<Detached> = targets.iter().map(|&node| doc.detach(node)).collect();
    doc.selection_mut().clear();

    info!(count = removed.len(), "removed nodes");
    session.record(Action::RemoveNode { removed });
    Ok(())
}

/// Create a page with the configured defaults, to the right of the last page
pub fn add_page(session: &mut EditSession) -> EditorResult<NodeId> {
    let config = session.config().clone();
    let doc = session.document_mut();

    let coordinates = doc
        .pages()
        .last()
        .and_then(|last| doc.page_state(*last))
        .map(|state| {
            let origin = *state.coordinates.get();
            let size = *state.dimensions.get();
            Point::new(origin.x + size.width + config.page_gap, origin.y)
        })
        .unwrap_or_default();

    let page = doc.create_page(
        config.default_page_label,
        config.default_page_size,
        coordinates,
    );
    doc.add_page(page)?;

    info!(%page, "added page");
    session.record(Action::AddPage { page });
    Ok(page)
}

/// Take a page out of the registry.
///
/// Undo re-registers the page at the end of the registry, not at its old
/// index. Use [`remove_nodes`] to restore the exact page order on undo.
pub fn remove_page(session: &mut EditSession, page: NodeId) -> EditorResult<()> {
    let doc = session.document_mut();
    if doc.remove_page(page)?.is_none() {
        return Ok(());
    }
    doc.prune_selection();

    info!(%page, "removed page");
    session.record(Action::RemovePage { page });
    Ok(())
}

pub fn resize_page(session: &mut EditSession, page: NodeId, size: Size) -> EditorResult<()> {
    let state = session
        .document_mut()
        .page_state_mut(page)
        .ok_or(EditorError::NotAPage(page))?;

    let old_size = *state.dimensions.get();
    if old_size == size {
        return Ok(());
    }
    state.dimensions.set(size);

    session.record(Action::PageResize {
        page,
        old_size,
        new_size: size,
    });
    Ok(())
}

/// Translate every page in `pages` by `delta` as one undo step
pub fn move_pages(session: &mut EditSession, pages: &[NodeId], delta: Point) -> EditorResult<()> {
    let doc = session.document_mut();
    if let Some(invalid) = pages.iter().copied().find(|page| !doc.is_page(*page)) {
        return Err(EditorError::NotAPage(invalid));
    }

    let mut unique: Vec<NodeId> = Vec::new();
    for &page in pages {
        if !unique.contains(&page) {
            unique.push(page);
        }
    }

    if unique.is_empty() || delta.is_zero() {
        return Ok(());
    }

    for &page in &unique {
        if let Some(state) = doc.page_state_mut(page) {
            let moved = *state.coordinates.get() + delta;
            state.coordinates.set(moved);
        }
    }

    session.record(Action::PageMove {
        pages: unique,
        delta,
    });
    Ok(())
}

/// Undoable property edit
pub fn set_prop(
    session: &mut EditSession,
    node: NodeId,
    key: &str,
    value: Value,
) -> EditorResult<()> {
    let target = session
        .document_mut()
        .get_mut(node)
        .ok_or(EditorError::NodeNotFound(node))?;

    let old_value = target.props().get(key).cloned();
    if old_value.as_ref() == Some(&value) {
        return Ok(());
    }
    target.props_mut().set(key, value.clone());

    session.record(Action::PropChange {
        node,
        old_prop: PropEntry::new(key, old_value),
        new_prop: PropEntry::new(key, Some(value)),
    });
    Ok(())
}

/// Select every page when nothing is selected, otherwise descend one level
pub fn select_all(session: &mut EditSession) {
    let doc = session.document();
    let next: Vec<NodeId> = if doc.selection().is_empty() {
        doc.pages().to_vec()
    } else {
        doc.selection()
            .get()
            .iter()
            .flat_map(|node| doc.children(*node).iter().copied())
            .collect()
    };
    session.select(next);
}

pub fn clear_selection(session: &mut EditSession) {
    session.document_mut().selection_mut().clear();
}

/// Insert `node` as the last child of the single selected node.
///
/// Returns `false` without doing anything unless exactly one droppable node
/// is selected.
pub fn insert_into_selection(session: &mut EditSession, node: NodeId) -> EditorResult<bool> {
    let Some(target) = single_droppable_selection(session) else {
        return Ok(false);
    };
    insert_nodes(session, target, &[node], None)?;
    Ok(true)
}

/// Remember the selected non-page nodes for `paste_nodes`
pub fn copy_nodes(session: &mut EditSession) -> usize {
    let doc = session.document();
    let copied: Vec<NodeId> = doc
        .selection()
        .get()
        .iter()
        .copied()
        .filter(|node| !doc.is_page(*node))
        .collect();

    session.clipboard = copied;
    session.clipboard.len()
}

/// Insert copies of the clipboard under the single selected droppable node.
///
/// Returns the new copies, or nothing when there is no valid target.
pub fn paste_nodes(session: &mut EditSession) -> EditorResult<Vec<NodeId>> {
    if session.clipboard.is_empty() {
        return Ok(Vec::new());
    }
    let Some(target) = single_droppable_selection(session) else {
        return Ok(Vec::new());
    };

    let sources = session.clipboard.clone();
    let doc = session.document_mut();
    let copies = sources
        .iter()
        .map(|source| doc.clone_subtree(*source))
        .collect::<EditorResult<Vec<_>>>()?;

    insert_nodes(session, target, &copies, None)?;
    Ok(copies)
}

fn single_droppable_selection(session: &EditSession) -> Option<NodeId> {
    match session.selection() {
        [only] if session.document().is_droppable(*only) => Some(*only),
        _ => None,
    }
}
