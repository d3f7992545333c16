//! Structural edit commands on a `GraphDocument`.
//!
//! Every structural change records an undo step before or right after it
//! mutates the graph. Commands are no-ops on stale ids and, when the
//! configuration enforces it, while the document is read-only.

use super::clipboard::Clipboard;
use super::document::{DragGesture, GraphDocument};
use super::undo::{UndoHistory, UndoRecord};
use crate::document::codec;
use crate::document::graph::NodeId;
use crate::document::node::{Breakpoint, NodeKind, NodeType, Position};
use tracing::{debug, instrument, warn};

const DELETE_CHILDREN_LABEL: &str = "Delete children";
const MOVE_LABEL: &str = "Moved node(s)";

impl<H: UndoHistory, C: Clipboard> GraphDocument<H, C> {
    /// Appends a new node of `child_type` as the last child of `parent`.
    ///
    /// The new node is placed `child_spacing` below its parent. Returns `None`
    /// when the parent cannot take another child.
    #[instrument(level = "debug", skip(self, child_type), fields(child = %child_type.name))]
    pub fn create_child(&mut self, parent: NodeId, child_type: &NodeType) -> Option<NodeId> {
        if self.edits_locked() {
            return None;
        }
        let parent_node = self.graph.get(parent)?;
        if !parent_node.kind().accepts_child(parent_node.child_count()) {
            debug!(kind = %parent_node.kind(), "parent does not accept another child");
            return None;
        }

        let mut child = child_type.instantiate();
        child.data.position =
            parent_node.position() + Position::new(0.0, self.config.child_spacing);
        let index = parent_node.child_count();

        let id = self.graph.insert_subtree(parent, index, &child)?;
        let path = self.graph.path_of(id)?;
        self.history.record(UndoRecord::node_created(path, child));
        Some(id)
    }

    /// Deletes `node` and its subtree. The master root cannot be deleted.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&mut self, node: NodeId) -> bool {
        if self.edits_locked() {
            return false;
        }
        let Some(parent) = self.graph.get(node).and_then(|n| n.parent()) else {
            debug!("not deleting the master root or a stale node");
            return false;
        };
        let (Some(parent_path), Some(index), Some(snapshot)) = (
            self.graph.path_of(parent),
            self.graph.child_index(node),
            self.graph.snapshot(node),
        ) else {
            return false;
        };

        self.history
            .record(UndoRecord::node_deleted(parent_path, index, snapshot));
        self.graph.remove_subtree(node);
        self.forget_dead_nodes();
        true
    }

    /// Deletes every child of `node` as one undo step. Returns how many
    /// children were removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_all_children(&mut self, node: NodeId) -> usize {
        if self.edits_locked() || self.graph.child_count(node) == 0 {
            return 0;
        }
        let Some(parent_path) = self.graph.path_of(node) else {
            return 0;
        };

        self.history.begin_group(DELETE_CHILDREN_LABEL);
        let mut removed = 0;
        // Always take the first child; undo replays in reverse and reinserts
        // at the front, which puts them back in order.
        while let Some(child) = self.graph.get(node).and_then(|n| n.child(0)) {
            let Some(snapshot) = self.graph.snapshot(child) else {
                break;
            };
            self.history.record(UndoRecord::child_deleted(
                parent_path.clone(),
                0,
                removed,
                snapshot,
            ));
            self.graph.remove_subtree(child);
            removed += 1;
        }
        self.history.end_group();

        self.forget_dead_nodes();
        removed
    }

    // ----- dragging -----

    /// Starts moving the selection with `anchor` under the pointer.
    ///
    /// Ignored unless `anchor` is selected. Opens an undo group that stays
    /// open until `end_drag`.
    pub fn begin_drag(&mut self, anchor: NodeId, pointer: Position) -> bool {
        if self.edits_locked() || !self.selection.contains(anchor) {
            return false;
        }

        self.history.begin_group(MOVE_LABEL);
        let mut origins = Vec::with_capacity(self.selection.len());
        for node in self.selection.iter() {
            let (Some(path), Some(entry)) = (self.graph.path_of(node), self.graph.get(node)) else {
                continue;
            };
            self.history
                .record(UndoRecord::node_moved(path, entry.position(), entry.title()));
            origins.push((node, entry.position()));
        }
        debug!(nodes = origins.len(), "drag started");

        self.drag = Some(DragGesture {
            anchor,
            start: pointer,
            origins,
        });
        true
    }

    /// Moves every dragged node by the pointer's offset from the drag start.
    pub fn drag(&mut self, anchor: NodeId, pointer: Position) -> bool {
        let Some(gesture) = self.drag.as_ref().filter(|g| g.anchor == anchor) else {
            return false;
        };
        let delta = pointer - gesture.start;
        for &(node, origin) in &gesture.origins {
            if let Some(entry) = self.graph.get_mut(node) {
                entry.set_position(origin + delta);
            }
        }
        true
    }

    /// Finishes the drag and closes its undo group.
    pub fn end_drag(&mut self, anchor: NodeId) -> bool {
        match self.drag.take() {
            Some(gesture) if gesture.anchor == anchor => {
                self.history.end_group();
                true
            }
            other => {
                self.drag = other;
                false
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // ----- clipboard -----

    pub fn can_copy(&self, node: NodeId) -> bool {
        self.graph.contains(node)
    }

    /// Serializes the subtree rooted at `node` into the clipboard.
    #[instrument(level = "debug", skip(self))]
    pub fn copy(&mut self, node: NodeId) -> bool {
        let Some(snapshot) = self.graph.snapshot(node) else {
            return false;
        };
        match codec::serialize_node(&snapshot) {
            Ok(payload) => {
                self.clipboard.set_contents(payload);
                true
            }
            Err(err) => {
                warn!(%err, "failed to serialize node for the clipboard");
                false
            }
        }
    }

    /// Whether the clipboard content may be pasted under `destination`.
    pub fn can_paste(&self, destination: NodeId) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        let Some(node) = self.graph.get(destination) else {
            return false;
        };
        match node.kind() {
            NodeKind::NodeGroup => {
                self.focus.is_working_root(destination) && node.child_count() == 0
            }
            NodeKind::Decorator => node.child_count() == 0,
            NodeKind::Composite => true,
            NodeKind::Root | NodeKind::Leaf => false,
        }
    }

    /// Pastes the clipboard subtree as the last child of `destination` and
    /// selects it. A payload that does not parse is dropped with a warning.
    #[instrument(level = "debug", skip(self))]
    pub fn paste(&mut self, destination: NodeId) -> Option<NodeId> {
        if self.edits_locked() || !self.can_paste(destination) {
            return None;
        }
        let payload = self.clipboard.contents()?;
        let node = match codec::deserialize_node(&payload) {
            Ok(node) => node,
            Err(err) => {
                warn!(%err, "clipboard does not hold a node");
                return None;
            }
        };
        if node.data.kind == NodeKind::Root {
            debug!("refusing to paste a root node");
            return None;
        }

        let index = self.graph.child_count(destination);
        let id = self.graph.insert_subtree(destination, index, &node)?;
        self.selection.select_subtree(&mut self.graph, id);

        let path = self.graph.path_of(id)?;
        let title = format!("Pasted {}", node.data.title);
        self.history
            .record(UndoRecord::node_created(path, node).with_title(title));
        Some(id)
    }

    // ----- breakpoints -----

    /// Sets the breakpoint of a single node. Not undoable.
    pub fn set_breakpoint(&mut self, node: NodeId, breakpoint: Breakpoint) -> bool {
        match self.graph.get_mut(node) {
            Some(entry) => {
                entry.set_breakpoint(breakpoint);
                true
            }
            None => false,
        }
    }

    /// Sets the breakpoint of the node at `address`.
    pub fn set_breakpoint_at(&mut self, address: &str, breakpoint: Breakpoint) -> bool {
        match self.node_at_address(address) {
            Some(node) => self.set_breakpoint(node, breakpoint),
            None => false,
        }
    }

    /// Clears every breakpoint in the tree. Not undoable.
    pub fn delete_all_breakpoints(&mut self) {
        let Some(root) = self.graph.root() else {
            return;
        };
        for node in self.graph.preorder(root) {
            if let Some(entry) = self.graph.get_mut(node) {
                entry.set_breakpoint(Breakpoint::None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::BehaviourTree;

    fn doc_with_sequence() -> (GraphDocument, NodeId) {
        let mut doc: GraphDocument = GraphDocument::default();
        doc.bind(&BehaviourTree::empty());
        let root = doc.master_root().unwrap();
        let seq = doc
            .create_child(root, &NodeType::new(NodeKind::Composite, "Sequence"))
            .unwrap();
        (doc, seq)
    }

    #[test]
    fn test_new_child_is_placed_below_parent() {
        let (doc, seq) = doc_with_sequence();
        let root = doc.master_root().unwrap();
        let offset = doc.node(seq).unwrap().position() - doc.node(root).unwrap().position();
        assert_eq!(offset, Position::new(0.0, doc.config().child_spacing));
    }

    #[test]
    fn test_root_accepts_single_child() {
        let (mut doc, _) = doc_with_sequence();
        let root = doc.master_root().unwrap();
        assert!(doc
            .create_child(root, &NodeType::new(NodeKind::Leaf, "Wait"))
            .is_none());
    }

    #[test]
    fn test_drag_requires_selected_anchor() {
        let (mut doc, seq) = doc_with_sequence();
        assert!(!doc.begin_drag(seq, Position::new(0.0, 0.0)));
        assert!(!doc.history().is_group_open());
        assert!(!doc.end_drag(seq));
    }
}
