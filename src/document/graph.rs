//! Arena-backed editor graph.
//!
//! A `Graph` wraps a `BehaviourNode` tree into `GraphNode`s stored in a
//! generational arena. Ownership flows strictly from parent to children
//! through the `children` id lists; the `parent` id is a navigation link only.
//! Removing a subtree frees its arena slots, so ids of deleted nodes never
//! resolve again and callers holding them see `None` instead of a dangling
//! node.
//!
//! # Example
//!
//! ```
//! use btquill::document::graph::Graph;
//! use btquill::document::node::{NodeKind, NodeType};
//!
//! let root = NodeType::new(NodeKind::Root, "Root")
//!     .instantiate()
//!     .with_child(NodeType::new(NodeKind::Leaf, "Idle").instantiate());
//! let graph = Graph::from_tree(&root);
//!
//! let leaf = graph.node_at_path(&[0]).unwrap();
//! assert_eq!(graph.path_of(leaf), Some(vec![0]));
//! assert_eq!(graph.get(leaf).unwrap().title(), "Idle");
//! ```

use super::node::{BehaviourNode, Breakpoint, NodeData, NodeKind, Position};
use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

/// Stable handle of a node inside a `Graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

/// Editor wrapper around one behavior-tree node.
#[derive(Debug, Clone)]
pub struct GraphNode {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    selected: bool,
}

impl GraphNode {
    fn new(data: NodeData, parent: Option<NodeId>) -> Self {
        Self {
            data,
            parent,
            children: Vec::new(),
            selected: false,
        }
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.data.breakpoint
    }

    pub fn position(&self) -> Position {
        self.data.position
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in execution order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    /// Whether the node currently shows as selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.data.breakpoint = breakpoint;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.data.position = position;
    }
}

/// The wrapped tree of one bound behavior tree.
#[derive(Debug, Default)]
pub struct Graph {
    arena: Arena<GraphNode>,
    root: Option<NodeId>,
}

impl Graph {
    /// Creates an empty graph with no master root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `root` and all of its descendants.
    #[instrument(level = "debug", skip(root), fields(nodes = root.subtree_len()))]
    pub fn from_tree(root: &BehaviourNode) -> Self {
        let mut graph = Self::new();
        let id = graph.wrap(root, None);
        graph.root = Some(id);
        graph
    }

    /// Replaces the wrapped tree with `root`, reusing the arena so ids from
    /// the previous tree stay stale.
    pub(crate) fn rebind(&mut self, root: &BehaviourNode) {
        self.clear();
        let id = self.wrap(root, None);
        self.root = Some(id);
    }

    /// Frees every node.
    pub(crate) fn clear(&mut self) {
        if let Some(root) = self.root {
            self.remove_subtree(root);
        }
    }

    fn wrap(&mut self, node: &BehaviourNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.arena.insert(GraphNode::new(node.data.clone(), parent)));
        for child in &node.children {
            let child_id = self.wrap(child, Some(id));
            if let Some(entry) = self.arena.get_mut(id.0) {
                entry.children.push(child_id);
            }
        }
        id
    }

    /// The master root: the only node without a parent.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&GraphNode> {
        self.arena.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.arena.get_mut(id.0)
    }

    /// Returns whether `id` still designates a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(GraphNode::kind)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, GraphNode::child_count)
    }

    /// Position of `id` among its siblings, `None` for the root or a stale id.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.get(id)?.parent?;
        self.get(parent)?.children.iter().position(|&c| c == id)
    }

    /// Root-to-node child indices. The master root has an empty path.
    ///
    /// # Returns
    ///
    /// `None` if `id` is stale or no longer hangs below the master root.
    pub fn path_of(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        loop {
            let node = self.get(current)?;
            match node.parent {
                Some(parent) => {
                    path.push(self.child_index(current)?);
                    current = parent;
                }
                None => break,
            }
        }
        if Some(current) != self.root {
            return None;
        }
        path.reverse();
        Some(path)
    }

    /// Descends from the master root following `path`.
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root?;
        for &index in path {
            current = self.get(current)?.child(index)?;
        }
        Some(current)
    }

    /// Wraps `node` and attaches it under `parent`.
    ///
    /// # Arguments
    ///
    /// * `parent` - Node that receives the subtree
    /// * `index` - Position among the parent's children, clamped to the child count
    /// * `node` - Domain subtree to wrap; every descendant gets a fresh id
    ///
    /// # Returns
    ///
    /// The id of the new subtree root, or `None` if `parent` is stale.
    #[instrument(level = "trace", skip(self, node), fields(title = %node.data.title))]
    pub(crate) fn insert_subtree(
        &mut self,
        parent: NodeId,
        index: usize,
        node: &BehaviourNode,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.wrap(node, Some(parent));
        let siblings = &mut self.get_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        trace!(index, "attached subtree");
        Some(id)
    }

    /// Detaches `id` from its parent and frees the whole subtree.
    ///
    /// Freed slots get a new generation, so every id in the subtree stops
    /// resolving. Removing the master root leaves the graph unbound.
    ///
    /// # Returns
    ///
    /// An owned snapshot of what was removed, or `None` if `id` is stale.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Option<BehaviourNode> {
        let snapshot = self.snapshot(id)?;
        if let Some(parent) = self.get(id).and_then(|n| n.parent) {
            if let Some(parent) = self.get_mut(parent) {
                parent.children.retain(|&c| c != id);
            }
        }
        for doomed in self.preorder(id) {
            self.arena.remove(doomed.0);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        Some(snapshot)
    }

    /// Copies the subtree rooted at `id` back into domain form.
    pub fn snapshot(&self, id: NodeId) -> Option<BehaviourNode> {
        let node = self.get(id)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.snapshot(child))
            .collect();
        Some(BehaviourNode {
            data: node.data.clone(),
            children,
        })
    }

    /// Ids of the subtree rooted at `id`, depth-first pre-order.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        PreorderIter::new(self, id).collect()
    }
}

/// Depth-first, pre-order walk over a subtree.
pub struct PreorderIter<'a> {
    graph: &'a Graph,
    stack: Vec<NodeId>,
}

impl<'a> PreorderIter<'a> {
    pub fn new(graph: &'a Graph, start: NodeId) -> Self {
        let stack = if graph.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { graph, stack }
    }
}

impl Iterator for PreorderIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.graph.get(current) {
            // Reverse so the leftmost child is visited first
            self.stack.extend(node.children.iter().rev());
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::NodeType;

    fn sample() -> BehaviourNode {
        NodeType::new(NodeKind::Root, "Root").instantiate().with_child(
            NodeType::new(NodeKind::Composite, "Sequence")
                .instantiate()
                .with_child(NodeType::new(NodeKind::Leaf, "A").instantiate())
                .with_child(NodeType::new(NodeKind::Leaf, "B").instantiate()),
        )
    }

    fn title(graph: &Graph, id: NodeId) -> String {
        graph.get(id).unwrap().title().to_string()
    }

    #[test]
    fn test_from_tree_links_parents() {
        let graph = Graph::from_tree(&sample());
        let root = graph.root().unwrap();
        let seq = graph.node_at_path(&[0]).unwrap();
        let b = graph.node_at_path(&[0, 1]).unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.get(root).unwrap().parent(), None);
        assert_eq!(graph.get(seq).unwrap().parent(), Some(root));
        assert_eq!(graph.get(b).unwrap().parent(), Some(seq));
        assert_eq!(graph.child_index(b), Some(1));
        assert_eq!(graph.child_index(root), None);
    }

    #[test]
    fn test_preorder_visits_left_to_right() {
        let graph = Graph::from_tree(&sample());
        let titles: Vec<_> = graph
            .preorder(graph.root().unwrap())
            .into_iter()
            .map(|id| title(&graph, id))
            .collect();
        assert_eq!(titles, vec!["Root", "Sequence", "A", "B"]);
    }

    #[test]
    fn test_remove_subtree_frees_ids() {
        let mut graph = Graph::from_tree(&sample());
        let seq = graph.node_at_path(&[0]).unwrap();
        let a = graph.node_at_path(&[0, 0]).unwrap();

        let removed = graph.remove_subtree(seq).unwrap();

        assert_eq!(removed.subtree_len(), 3);
        assert!(!graph.contains(seq));
        assert!(!graph.contains(a));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.child_count(graph.root().unwrap()), 0);
        assert!(graph.path_of(a).is_none());
    }

    #[test]
    fn test_insert_subtree_clamps_index() {
        let mut graph = Graph::from_tree(&sample());
        let seq = graph.node_at_path(&[0]).unwrap();
        let c = NodeType::new(NodeKind::Leaf, "C").instantiate();

        let id = graph.insert_subtree(seq, 99, &c).unwrap();

        assert_eq!(graph.path_of(id), Some(vec![0, 2]));
        assert_eq!(graph.get(id).unwrap().parent(), Some(seq));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let tree = sample();
        let graph = Graph::from_tree(&tree);
        assert_eq!(graph.snapshot(graph.root().unwrap()), Some(tree));
    }
}
