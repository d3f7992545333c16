//! Undo records and the in-memory undo history.
//!
//! Edit commands describe every structural change as an `UndoRecord` and hand
//! it to an `UndoHistory`. Records reference nodes by root-to-node path rather
//! than by id, because undoing a deletion recreates wrapper nodes with fresh
//! ids while the positions stay meaningful.
//!
//! # Architecture
//!
//! - `UndoRecord`: one reversible change plus a display title
//! - `Transaction`: records reverted and reapplied as a single step
//! - `UndoHistory`: the write-only surface edit commands talk to
//! - `ReplayHistory`: a history that can also undo/redo against an `UndoTarget`
//! - `UndoTree`: branching in-memory history; redo follows the newest branch
//!
//! ```text
//!     0 (bound)
//!     |
//!     1 (Created Wait)
//!    / \
//!   2   3 (undo, then a different edit: 2 stays reachable as a branch)
//! ```

use crate::document::node::{BehaviourNode, Position};
use std::collections::HashMap;
use std::time::SystemTime;
use tracing::{debug, warn};

/// The document operations a record needs in order to revert or reapply itself.
pub trait UndoTarget {
    /// Attaches a copy of `node` under the node at `parent`, at `index`.
    fn insert_node(&mut self, parent: &[usize], index: usize, node: &BehaviourNode) -> bool;
    /// Detaches and frees the node at `path`, returning what was removed.
    fn remove_node(&mut self, path: &[usize]) -> Option<BehaviourNode>;
    fn node_position(&self, path: &[usize]) -> Option<Position>;
    fn set_node_position(&mut self, path: &[usize], position: Position) -> bool;
    /// Makes the node at `path` the working root.
    fn push_focus(&mut self, path: &[usize]) -> bool;
    fn pop_focus(&mut self) -> bool;
}

/// What a record changes.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    /// A subtree was attached at `path`.
    NodeCreated {
        path: Vec<usize>,
        snapshot: BehaviourNode,
    },
    /// A subtree was detached from `parent` at `index`.
    ///
    /// `ordinal` numbers the removals of a multi-delete (0, 1, 2, ...). It is
    /// a label only: reinsertion always uses `index`.
    NodeDeleted {
        parent: Vec<usize>,
        index: usize,
        ordinal: Option<usize>,
        snapshot: BehaviourNode,
    },
    /// The node at `path` was moved away from `position`.
    NodeMoved { path: Vec<usize>, position: Position },
    /// The node at `path` became the working root.
    GroupPushed { path: Vec<usize> },
    /// The node at `path` stopped being the working root.
    GroupPopped { path: Vec<usize> },
}

/// A single reversible change.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoRecord {
    title: String,
    action: UndoAction,
}

impl UndoRecord {
    pub fn new(title: impl Into<String>, action: UndoAction) -> Self {
        Self {
            title: title.into(),
            action,
        }
    }

    pub fn node_created(path: Vec<usize>, snapshot: BehaviourNode) -> Self {
        let title = format!("Created {}", snapshot.data.title);
        Self::new(title, UndoAction::NodeCreated { path, snapshot })
    }

    pub fn node_deleted(parent: Vec<usize>, index: usize, snapshot: BehaviourNode) -> Self {
        let title = format!("Deleted {}", snapshot.data.title);
        Self::new(
            title,
            UndoAction::NodeDeleted {
                parent,
                index,
                ordinal: None,
                snapshot,
            },
        )
    }

    /// Deletion of one child during a multi-delete.
    pub fn child_deleted(
        parent: Vec<usize>,
        index: usize,
        ordinal: usize,
        snapshot: BehaviourNode,
    ) -> Self {
        let title = format!("Deleted {}", snapshot.data.title);
        Self::new(
            title,
            UndoAction::NodeDeleted {
                parent,
                index,
                ordinal: Some(ordinal),
                snapshot,
            },
        )
    }

    pub fn node_moved(path: Vec<usize>, position: Position, title: &str) -> Self {
        Self::new(
            format!("Moved {}", title),
            UndoAction::NodeMoved { path, position },
        )
    }

    pub fn group_pushed(path: Vec<usize>, title: &str) -> Self {
        Self::new(format!("Entered {}", title), UndoAction::GroupPushed { path })
    }

    pub fn group_popped(path: Vec<usize>, title: &str) -> Self {
        Self::new(format!("Exited {}", title), UndoAction::GroupPopped { path })
    }

    /// Replaces the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn action(&self) -> &UndoAction {
        &self.action
    }

    /// Reverts the change. Records keep whatever state they need to redo.
    pub fn undo(&mut self, target: &mut dyn UndoTarget) {
        match &mut self.action {
            UndoAction::NodeCreated { path, snapshot } => {
                if let Some(removed) = target.remove_node(path) {
                    *snapshot = removed;
                }
            }
            UndoAction::NodeDeleted {
                parent,
                index,
                snapshot,
                ..
            } => {
                target.insert_node(parent, *index, snapshot);
            }
            UndoAction::NodeMoved { path, position } => swap_position(target, path, position),
            UndoAction::GroupPushed { .. } => {
                target.pop_focus();
            }
            UndoAction::GroupPopped { path } => {
                target.push_focus(path);
            }
        }
    }

    /// Reapplies a change previously reverted with `undo`.
    pub fn redo(&mut self, target: &mut dyn UndoTarget) {
        match &mut self.action {
            UndoAction::NodeCreated { path, snapshot } => {
                if let Some((index, parent)) = path.split_last() {
                    target.insert_node(parent, *index, snapshot);
                }
            }
            UndoAction::NodeDeleted {
                parent,
                index,
                snapshot,
                ..
            } => {
                let mut path = parent.clone();
                path.push(*index);
                if let Some(removed) = target.remove_node(&path) {
                    *snapshot = removed;
                }
            }
            UndoAction::NodeMoved { path, position } => swap_position(target, path, position),
            UndoAction::GroupPushed { path } => {
                target.push_focus(path);
            }
            UndoAction::GroupPopped { .. } => {
                target.pop_focus();
            }
        }
    }
}

fn swap_position(target: &mut dyn UndoTarget, path: &[usize], stored: &mut Position) {
    if let Some(current) = target.node_position(path) {
        target.set_node_position(path, *stored);
        *stored = current;
    }
}

/// Records that are undone and redone together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    label: String,
    records: Vec<UndoRecord>,
}

impl Transaction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            records: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reverts every record, newest first.
    pub fn undo(&mut self, target: &mut dyn UndoTarget) {
        for record in self.records.iter_mut().rev() {
            record.undo(target);
        }
    }

    /// Reapplies every record, oldest first.
    pub fn redo(&mut self, target: &mut dyn UndoTarget) {
        for record in self.records.iter_mut() {
            record.redo(target);
        }
    }
}

/// Receiver of undo records. Edit commands only ever write to it.
///
/// `begin_group`/`end_group` bracket one user gesture. Nested brackets merge
/// into the outermost one.
pub trait UndoHistory {
    fn record(&mut self, record: UndoRecord);
    fn begin_group(&mut self, label: &str);
    fn end_group(&mut self);
    /// Forgets all history, e.g. when a new tree is bound.
    fn clear(&mut self);
}

/// An undo history that can replay what it recorded.
pub trait ReplayHistory: UndoHistory {
    /// Reverts the most recent transaction. Returns false if there is none.
    fn undo(&mut self, target: &mut dyn UndoTarget) -> bool;
    /// Reapplies the most recently undone transaction.
    fn redo(&mut self, target: &mut dyn UndoTarget) -> bool;
}

/// A node in the undo tree.
///
/// The root node stands for the state right after binding and carries an
/// empty transaction; every other node carries the transaction that led to it.
#[derive(Debug, Clone)]
pub struct UndoNode {
    pub transaction: Transaction,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub timestamp: SystemTime,
    pub seq: u64,
}

impl UndoNode {
    fn new(transaction: Transaction, parent: Option<usize>, seq: u64) -> Self {
        Self {
            transaction,
            parent,
            children: Vec::new(),
            timestamp: SystemTime::now(),
            seq,
        }
    }
}

/// Branching undo history.
///
/// Undoing then making a new edit keeps the undone future as a sibling
/// branch; redo always follows the newest branch. The number of undoable
/// steps behind the current state is capped at `limit` (0 means unlimited).
#[derive(Debug)]
pub struct UndoTree {
    nodes: Vec<UndoNode>,
    current: usize,
    next_seq: u64,
    limit: usize,
    open: Option<Transaction>,
    depth: usize,
}

impl Default for UndoTree {
    fn default() -> Self {
        Self::new(crate::config::Config::default().undo_limit)
    }
}

impl UndoTree {
    pub fn new(limit: usize) -> Self {
        Self {
            nodes: vec![UndoNode::new(Transaction::default(), None, 0)],
            current: 0,
            next_seq: 1,
            limit,
            open: None,
            depth: 0,
        }
    }

    /// Index of the current node.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn nodes(&self) -> &[UndoNode] {
        &self.nodes
    }

    pub fn can_undo(&self) -> bool {
        self.nodes[self.current].parent.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.nodes[self.current].children.is_empty()
    }

    /// Returns true while a `begin_group` bracket is open.
    pub fn is_group_open(&self) -> bool {
        self.open.is_some()
    }

    /// The transaction the next `undo` would revert.
    pub fn current_transaction(&self) -> Option<&Transaction> {
        let node = &self.nodes[self.current];
        node.parent.map(|_| &node.transaction)
    }

    /// Label of the next undo step, for menus.
    pub fn undo_label(&self) -> Option<&str> {
        self.current_transaction().map(Transaction::label)
    }

    fn commit(&mut self, transaction: Transaction) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let new_index = self.nodes.len();
        self.nodes[self.current].children.push(new_index);
        self.nodes
            .push(UndoNode::new(transaction, Some(self.current), seq));
        self.current = new_index;

        self.prune();
    }

    /// Drops the oldest history once the current state is more than `limit`
    /// steps away from the root.
    fn prune(&mut self) {
        if self.limit == 0 {
            return;
        }

        let mut chain = vec![self.current];
        while let Some(parent) = self.nodes[chain[chain.len() - 1]].parent {
            chain.push(parent);
        }
        if chain.len() - 1 <= self.limit {
            return;
        }
        let new_root = chain[self.limit];

        // Breadth-first over the surviving subtree gives the new layout
        let mut order = vec![new_root];
        let mut cursor = 0;
        while cursor < order.len() {
            order.extend(self.nodes[order[cursor]].children.iter().copied());
            cursor += 1;
        }
        let remap: HashMap<usize, usize> = order
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let mut old_nodes: Vec<Option<UndoNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        self.nodes = order
            .iter()
            .filter_map(|&old| old_nodes[old].take())
            .map(|mut node| {
                node.parent = node.parent.and_then(|p| remap.get(&p).copied());
                node.children = node
                    .children
                    .iter()
                    .filter_map(|c| remap.get(c).copied())
                    .collect();
                node
            })
            .collect();
        if let Some(root) = self.nodes.first_mut() {
            root.transaction = Transaction::default();
        }
        self.current = remap.get(&self.current).copied().unwrap_or(0);
        debug!(kept = self.nodes.len(), "pruned undo history");
    }
}

impl UndoHistory for UndoTree {
    fn record(&mut self, record: UndoRecord) {
        match self.open.as_mut() {
            Some(open) => open.records.push(record),
            None => {
                let mut transaction = Transaction::new(record.title());
                transaction.records.push(record);
                self.commit(transaction);
            }
        }
    }

    fn begin_group(&mut self, label: &str) {
        self.depth += 1;
        if self.open.is_none() {
            self.open = Some(Transaction::new(label));
        }
    }

    fn end_group(&mut self) {
        if self.depth == 0 {
            warn!("end_group without begin_group");
            return;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return;
        }
        match self.open.take() {
            Some(transaction) if !transaction.is_empty() => self.commit(transaction),
            _ => debug!("dropping empty undo group"),
        }
    }

    fn clear(&mut self) {
        *self = Self::new(self.limit);
    }
}

impl ReplayHistory for UndoTree {
    fn undo(&mut self, target: &mut dyn UndoTarget) -> bool {
        let Some(parent) = self.nodes[self.current].parent else {
            return false;
        };
        self.nodes[self.current].transaction.undo(target);
        self.current = parent;
        true
    }

    fn redo(&mut self, target: &mut dyn UndoTarget) -> bool {
        let newest = self.nodes[self.current]
            .children
            .iter()
            .max_by_key(|&&child| self.nodes[child].seq)
            .copied();
        let Some(child) = newest else {
            return false;
        };
        self.nodes[child].transaction.redo(target);
        self.current = child;
        true
    }
}
