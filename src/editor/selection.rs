//! Multi-node selection and box selection.
//!
//! `SelectionSet` keeps the selected nodes in selection order and applies the
//! modifier-key policy when a node is clicked. Selecting or deselecting a node
//! also flips its `selected` flag, which is what the renderer reads.
//!
//! `BoxSelection` owns the rubber-band rectangle lifecycle. Which nodes the
//! rectangle touches is decided by whoever knows node bounds; they report hits
//! back through `select_node` with `box_active` set.

use super::input::{Canvas, Modifiers, Point, Rect};
use crate::document::graph::{Graph, NodeId};
use crate::document::node::NodeKind;
use indexmap::IndexSet;
use tracing::trace;

/// Everything the selection policy looks at besides the node itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectIntent {
    pub modifiers: Modifiers,
    /// A box selection is being drawn.
    pub box_active: bool,
}

impl SelectIntent {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            modifiers: Modifiers::SHIFT,
            box_active: false,
        }
    }

    pub fn ctrl() -> Self {
        Self {
            modifiers: Modifiers::CTRL,
            box_active: false,
        }
    }

    pub fn boxed() -> Self {
        Self {
            modifiers: Modifiers::NONE,
            box_active: true,
        }
    }

    /// Decides what clicking a node of `kind` does.
    pub fn policy(self, kind: NodeKind) -> SelectPolicy {
        if self.modifiers.shift && kind.is_branch() {
            SelectPolicy::Branch
        } else if self.modifiers.ctrl || self.box_active {
            SelectPolicy::Add
        } else {
            SelectPolicy::Replace
        }
    }
}

/// Outcome of the selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPolicy {
    /// Replace the selection with the node and its whole subtree.
    Branch,
    /// Add the node, keeping everything already selected.
    Add,
    /// Replace the selection with just the node.
    Replace,
}

/// The set of selected nodes, in selection order.
#[derive(Debug, Default)]
pub struct SelectionSet {
    nodes: IndexSet<NodeId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Selected nodes in the order they were selected.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.iter().collect()
    }

    /// Applies the click policy for `node`. Stale ids are ignored.
    pub fn select_node(&mut self, graph: &mut Graph, node: NodeId, intent: SelectIntent) {
        let Some(kind) = graph.kind(node) else {
            return;
        };
        match intent.policy(kind) {
            SelectPolicy::Branch => self.select_subtree(graph, node),
            SelectPolicy::Add => self.add(graph, node),
            SelectPolicy::Replace => {
                self.clear(graph);
                self.add(graph, node);
            }
        }
    }

    /// Removes `node` from the selection if it is selected.
    pub fn deselect(&mut self, graph: &mut Graph, node: NodeId) {
        if self.nodes.shift_remove(&node) {
            if let Some(entry) = graph.get_mut(node) {
                entry.set_selected(false);
            }
            trace!(?node, "deselected");
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self, graph: &mut Graph) {
        for node in self.nodes.drain(..) {
            if let Some(entry) = graph.get_mut(node) {
                entry.set_selected(false);
            }
        }
    }

    /// Replaces the selection with `root` and its descendants, pre-order.
    /// A stale `root` leaves the selection untouched.
    pub fn select_subtree(&mut self, graph: &mut Graph, root: NodeId) {
        if !graph.contains(root) {
            return;
        }
        self.clear(graph);
        for node in graph.preorder(root) {
            self.add(graph, node);
        }
    }

    /// Drops nodes that no longer exist, e.g. after a delete or an undo.
    pub fn prune(&mut self, graph: &Graph) {
        self.nodes.retain(|&node| graph.contains(node));
    }

    fn add(&mut self, graph: &mut Graph, node: NodeId) {
        let Some(entry) = graph.get_mut(node) else {
            return;
        };
        if self.nodes.insert(node) {
            entry.set_selected(true);
            trace!(?node, "selected");
        }
    }
}

/// Rubber-band selection state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BoxSelection {
    #[default]
    Idle,
    /// The primary button went down on empty canvas.
    Armed { start: Point },
    /// The pointer moved while armed; the rectangle is live.
    Drawing { start: Point, current: Point },
}

impl BoxSelection {
    /// Primary press inside the editable area.
    pub fn press(&mut self, position: Point) {
        *self = BoxSelection::Armed { start: position };
    }

    /// Pointer drag. Only has an effect once armed.
    pub fn drag(&mut self, position: Point) {
        match *self {
            BoxSelection::Armed { start } | BoxSelection::Drawing { start, .. } => {
                *self = BoxSelection::Drawing {
                    start,
                    current: position,
                };
            }
            BoxSelection::Idle => {}
        }
    }

    /// Button release: ends drawing and disarms.
    pub fn release(&mut self) {
        *self = BoxSelection::Idle;
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, BoxSelection::Drawing { .. })
    }

    /// The live rectangle in document space, `None` unless drawing.
    pub fn rect(&self, canvas: &dyn Canvas) -> Option<Rect> {
        match *self {
            BoxSelection::Drawing { start, current } => Some(Rect::from_corners(
                canvas.screen_to_document(start),
                canvas.screen_to_document(current),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::input::IdentityCanvas;

    #[test]
    fn test_policy_table() {
        assert_eq!(
            SelectIntent::shift().policy(NodeKind::Composite),
            SelectPolicy::Branch
        );
        assert_eq!(
            SelectIntent::shift().policy(NodeKind::Decorator),
            SelectPolicy::Branch
        );
        // Shift on a leaf falls through to a plain click
        assert_eq!(
            SelectIntent::shift().policy(NodeKind::Leaf),
            SelectPolicy::Replace
        );
        assert_eq!(SelectIntent::ctrl().policy(NodeKind::Leaf), SelectPolicy::Add);
        assert_eq!(
            SelectIntent::boxed().policy(NodeKind::Composite),
            SelectPolicy::Add
        );
        assert_eq!(
            SelectIntent::plain().policy(NodeKind::Composite),
            SelectPolicy::Replace
        );

        let shift_in_box = SelectIntent {
            modifiers: Modifiers::SHIFT,
            box_active: true,
        };
        assert_eq!(shift_in_box.policy(NodeKind::Leaf), SelectPolicy::Add);
    }

    #[test]
    fn test_box_selection_lifecycle() {
        let canvas = IdentityCanvas;
        let mut selection = BoxSelection::default();
        assert_eq!(selection.rect(&canvas), None);

        // Dragging before any press does nothing
        selection.drag(Point::new(3.0, 3.0));
        assert_eq!(selection, BoxSelection::Idle);

        selection.press(Point::new(10.0, 20.0));
        assert_eq!(selection.rect(&canvas), None);

        selection.drag(Point::new(4.0, 30.0));
        assert!(selection.is_drawing());
        assert_eq!(
            selection.rect(&canvas),
            Some(Rect::new(4.0, 20.0, 6.0, 10.0))
        );

        selection.release();
        assert_eq!(selection.rect(&canvas), None);
    }
}
