//! Editing-depth stack.
//!
//! Entering a node group pushes it; the top of the stack is the working root
//! that scopes editing and top-level paste. The master root always stays at
//! the bottom, so popping never empties the stack.

use crate::document::graph::{Graph, NodeId};
use crate::document::node::NodeKind;

#[derive(Debug, Default)]
pub struct FocusStack {
    stack: Vec<NodeId>,
}

impl FocusStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts the stack at `master_root`.
    pub fn reset(&mut self, master_root: NodeId) {
        self.stack.clear();
        self.stack.push(master_root);
    }

    /// Empties the stack; only used when the document unbinds.
    pub(crate) fn clear(&mut self) {
        self.stack.clear();
    }

    pub(crate) fn push(&mut self, node: NodeId) {
        self.stack.push(node);
    }

    /// Pops the working root unless only the master root is left.
    ///
    /// # Returns
    ///
    /// The popped node, or `None` when the stack is at its floor.
    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    pub fn working_root(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    /// 0 at the master root.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    pub fn is_working_root(&self, node: NodeId) -> bool {
        self.working_root() == Some(node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.stack.contains(&node)
    }

    /// Bottom to top.
    pub fn entries(&self) -> &[NodeId] {
        &self.stack
    }

    /// Cuts the stack below the first entry that no longer exists.
    ///
    /// Entries form a root-to-leaf chain, so everything above a deleted entry
    /// was deleted with it. The bottom entry is always kept.
    ///
    /// # Arguments
    ///
    /// * `graph` - The graph the entries are checked against
    pub(crate) fn truncate_to_live(&mut self, graph: &Graph) {
        if let Some(dead) = self.stack.iter().position(|&node| !graph.contains(node)) {
            self.stack.truncate(dead.max(1));
        }
    }
}

/// Kinds `enter_group` (undoable) accepts.
pub fn can_enter_undoable(kind: NodeKind) -> bool {
    kind == NodeKind::NodeGroup
}

/// Kinds `increase_editing_depth` (silent) accepts.
pub fn can_enter_silently(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::NodeGroup | NodeKind::Root)
}
