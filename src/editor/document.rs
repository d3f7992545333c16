//! The graph document: one bound behavior tree plus its editing state.
//!
//! `GraphDocument` is the entry point the editor host talks to. It owns the
//! wrapped tree, the selection, the focus stack and the transient pointer
//! state, and it forwards undo records to the injected `UndoHistory`. The
//! mutating commands live in `commands.rs`.
//!
//! # Example
//!
//! ```
//! use btquill::document::node::{BehaviourTree, NodeKind, NodeType};
//! use btquill::editor::document::GraphDocument;
//! use btquill::editor::input::Modifiers;
//!
//! let mut doc: GraphDocument = GraphDocument::default();
//! doc.bind(&BehaviourTree::empty());
//!
//! let root = doc.master_root().unwrap();
//! let seq = doc
//!     .create_child(root, &NodeType::new(NodeKind::Composite, "Sequence"))
//!     .unwrap();
//! doc.select_node(seq, Modifiers::NONE);
//!
//! assert_eq!(doc.selected(), vec![seq]);
//! assert_eq!(doc.address_of(seq).unwrap().as_str(), "AA==");
//! assert!(doc.undo());
//! assert!(doc.selected().is_empty());
//! ```

use super::clipboard::{self, Clipboard, MemoryClipboard};
use super::focus::{self, FocusStack};
use super::input::{
    Canvas, Modifiers, PointerButton, PointerEvent, PointerPhase, PointerResponse, Rect,
};
use super::selection::{BoxSelection, SelectIntent, SelectionSet};
use super::undo::{ReplayHistory, UndoHistory, UndoRecord, UndoTarget, UndoTree};
use crate::config::Config;
use crate::document::address::{self, NodeAddress};
use crate::document::graph::{Graph, GraphNode, NodeId};
use crate::document::node::{BehaviourNode, BehaviourTree, Position};
use tracing::{debug, instrument};

/// An in-progress node drag.
#[derive(Debug, Clone)]
pub(crate) struct DragGesture {
    pub(crate) anchor: NodeId,
    pub(crate) start: Position,
    pub(crate) origins: Vec<(NodeId, Position)>,
}

/// Editing model for one behavior tree.
pub struct GraphDocument<H = UndoTree, C = MemoryClipboard> {
    pub(crate) graph: Graph,
    pub(crate) focus: FocusStack,
    pub(crate) selection: SelectionSet,
    box_selection: BoxSelection,
    selection_box: Option<Rect>,
    pub(crate) drag: Option<DragGesture>,
    tree_read_only: bool,
    running: bool,
    pub(crate) history: H,
    pub(crate) clipboard: C,
    pub(crate) config: Config,
}

impl Default for GraphDocument<UndoTree, MemoryClipboard> {
    fn default() -> Self {
        Self::new(UndoTree::default(), MemoryClipboard::new())
    }
}

impl GraphDocument<UndoTree, Box<dyn Clipboard>> {
    /// Builds a document with the history and clipboard `config` asks for.
    pub fn from_config(config: Config) -> Self {
        let history = UndoTree::new(config.undo_limit);
        let clipboard = clipboard::from_config(&config);
        Self::with_config(config, history, clipboard)
    }
}

impl<H: UndoHistory, C: Clipboard> GraphDocument<H, C> {
    /// Creates an unbound document with the default configuration.
    pub fn new(history: H, clipboard: C) -> Self {
        Self::with_config(Config::default(), history, clipboard)
    }

    pub fn with_config(config: Config, history: H, clipboard: C) -> Self {
        Self {
            graph: Graph::new(),
            focus: FocusStack::new(),
            selection: SelectionSet::new(),
            box_selection: BoxSelection::Idle,
            selection_box: None,
            drag: None,
            tree_read_only: false,
            running: false,
            history,
            clipboard,
            config,
        }
    }

    // ----- lifecycle -----

    /// Binds the document to `tree`, replacing whatever was bound before.
    ///
    /// Selection and focus restart at the new master root and the undo
    /// history is cleared.
    #[instrument(level = "debug", skip(self, tree), fields(read_only = tree.read_only))]
    pub fn bind(&mut self, tree: &BehaviourTree) {
        self.reset_transient_state();
        self.graph.rebind(&tree.root);
        if let Some(root) = self.graph.root() {
            self.focus.reset(root);
        }
        self.tree_read_only = tree.read_only;
        self.history.clear();
    }

    /// Drops the bound tree.
    pub fn unbind(&mut self) {
        self.reset_transient_state();
        self.graph.clear();
        self.focus.clear();
        self.tree_read_only = false;
        self.history.clear();
        debug!("document unbound");
    }

    fn reset_transient_state(&mut self) {
        if self.drag.take().is_some() {
            self.history.end_group();
        }
        self.selection = SelectionSet::new();
        self.box_selection = BoxSelection::Idle;
        self.selection_box = None;
    }

    pub fn is_bound(&self) -> bool {
        self.graph.root().is_some()
    }

    /// Exports the current state of the tree.
    pub fn to_tree(&self) -> Option<BehaviourTree> {
        let root = self.graph.snapshot(self.graph.root()?)?;
        Some(BehaviourTree {
            root,
            read_only: self.tree_read_only,
        })
    }

    // ----- accessors -----

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.graph.get(id)
    }

    /// Snapshot of the subtree rooted at `id`.
    pub fn snapshot(&self, id: NodeId) -> Option<BehaviourNode> {
        self.graph.snapshot(id)
    }

    pub fn master_root(&self) -> Option<NodeId> {
        self.graph.root()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// True when the bound tree is read-only or the tree is running.
    pub fn read_only(&self) -> bool {
        self.tree_read_only || self.running
    }

    /// Tells the document whether the tree is currently executing.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn read_only_enforced(&self) -> bool {
        self.config.enforce_read_only && self.read_only()
    }

    /// True when structural edits must be rejected: the document is
    /// read-only, or a drag gesture holds the undo group open.
    pub(crate) fn edits_locked(&self) -> bool {
        if self.read_only_enforced() {
            debug!("edit rejected: document is read-only");
            return true;
        }
        if self.drag.is_some() {
            debug!("edit rejected: drag in progress");
            return true;
        }
        false
    }

    /// Records a focus change unless the history could never replay it.
    fn record_focus(&mut self, record: UndoRecord) {
        if self.read_only_enforced() {
            return;
        }
        self.history.record(record);
    }

    // ----- selection -----

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Selected nodes in selection order.
    pub fn selected(&self) -> Vec<NodeId> {
        self.selection.to_vec()
    }

    pub fn is_selected(&self, node: NodeId) -> bool {
        self.selection.contains(node)
    }

    /// A node was clicked (or touched by the selection box).
    pub fn select_node(&mut self, node: NodeId, modifiers: Modifiers) {
        let intent = SelectIntent {
            modifiers,
            box_active: self.box_selection.is_drawing(),
        };
        self.selection.select_node(&mut self.graph, node, intent);
    }

    pub fn deselect_node(&mut self, node: NodeId) {
        self.selection.deselect(&mut self.graph, node);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.graph);
    }

    /// Selects `root` and all of its descendants.
    pub fn select_branch(&mut self, root: NodeId) {
        self.selection.select_subtree(&mut self.graph, root);
    }

    /// Selects the whole working root subtree.
    pub fn select_entire_graph(&mut self) {
        if let Some(root) = self.focus.working_root() {
            self.selection.select_subtree(&mut self.graph, root);
        }
    }

    // ----- box selection -----

    /// Feeds a pointer event that landed on empty canvas.
    ///
    /// `area` is the editable area in screen space; `canvas` converts the
    /// selection rectangle into document space.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        area: Rect,
        canvas: &dyn Canvas,
    ) -> PointerResponse {
        let inside = area.contains(event.position);
        match (event.phase, event.button) {
            (PointerPhase::Press, PointerButton::Primary) if inside => {
                self.clear_selection();
                self.box_selection.press(event.position);
                PointerResponse::Consumed
            }
            (PointerPhase::Drag, PointerButton::Primary) if inside => {
                self.box_selection.drag(event.position);
                self.selection_box = self.box_selection.rect(canvas);
                PointerResponse::Consumed
            }
            (PointerPhase::Release, button) => {
                self.box_selection.release();
                self.selection_box = None;
                match button {
                    PointerButton::Primary if inside => PointerResponse::Consumed,
                    PointerButton::Secondary if inside => {
                        PointerResponse::ContextMenu(event.position)
                    }
                    _ => PointerResponse::Ignored,
                }
            }
            _ => PointerResponse::Ignored,
        }
    }

    /// The live selection rectangle in document space.
    pub fn selection_box(&self) -> Option<Rect> {
        self.selection_box
    }

    // ----- focus -----

    pub fn working_root(&self) -> Option<NodeId> {
        self.focus.working_root()
    }

    pub fn depth(&self) -> usize {
        self.focus.depth()
    }

    pub fn is_working_root(&self, node: NodeId) -> bool {
        self.focus.is_working_root(node)
    }

    /// Enters a node group as an undoable step.
    ///
    /// Focus still moves while the document is read-only, but no undo step
    /// is recorded then.
    pub fn enter_group(&mut self, node: NodeId) -> bool {
        let Some(entry) = self.graph.get(node) else {
            return false;
        };
        if !focus::can_enter_undoable(entry.kind()) {
            return false;
        }
        let Some(path) = self.graph.path_of(node) else {
            return false;
        };
        let record = UndoRecord::group_pushed(path, entry.title());
        self.record_focus(record);
        self.focus.push(node);
        true
    }

    /// Drills into a group or root without recording undo.
    pub fn increase_editing_depth(&mut self, node: NodeId) -> bool {
        match self.graph.kind(node) {
            Some(kind) if focus::can_enter_silently(kind) => {
                self.focus.push(node);
                true
            }
            _ => false,
        }
    }

    /// Leaves the working root as an undoable step. Read-only documents move
    /// focus without recording it.
    pub fn exit_group(&mut self) -> bool {
        let Some(popped) = self.focus.pop() else {
            return false;
        };
        if let (Some(path), Some(entry)) = (self.graph.path_of(popped), self.graph.get(popped)) {
            let record = UndoRecord::group_popped(path, entry.title());
            self.record_focus(record);
        }
        true
    }

    /// Leaves the working root without recording undo.
    pub fn decrease_editing_depth(&mut self) -> bool {
        self.focus.pop().is_some()
    }

    // ----- addresses -----

    pub fn address_of(&self, node: NodeId) -> Option<NodeAddress> {
        address::encode(&self.graph, node)
    }

    pub fn node_at_address(&self, address: &str) -> Option<NodeId> {
        address::decode(address, &self.graph)
    }

    /// Restores the selection and focus invariants after nodes disappeared.
    pub(crate) fn forget_dead_nodes(&mut self) {
        self.selection.prune(&self.graph);
        self.focus.truncate_to_live(&self.graph);
        if let Some(drag) = self.drag.as_mut() {
            let graph = &self.graph;
            drag.origins.retain(|(node, _)| graph.contains(*node));
        }
    }
}

impl<H: ReplayHistory, C: Clipboard> GraphDocument<H, C> {
    /// Reverts the most recent undo transaction.
    pub fn undo(&mut self) -> bool {
        if self.edits_locked() {
            return false;
        }
        let mut replay = Replay {
            graph: &mut self.graph,
            focus: &mut self.focus,
        };
        let undone = self.history.undo(&mut replay);
        self.forget_dead_nodes();
        undone
    }

    /// Reapplies the most recently undone transaction.
    pub fn redo(&mut self) -> bool {
        if self.edits_locked() {
            return false;
        }
        let mut replay = Replay {
            graph: &mut self.graph,
            focus: &mut self.focus,
        };
        let redone = self.history.redo(&mut replay);
        self.forget_dead_nodes();
        redone
    }
}

/// Applies replayed records to the graph and focus stack.
struct Replay<'a> {
    graph: &'a mut Graph,
    focus: &'a mut FocusStack,
}

impl UndoTarget for Replay<'_> {
    fn insert_node(&mut self, parent: &[usize], index: usize, node: &BehaviourNode) -> bool {
        self.graph
            .node_at_path(parent)
            .and_then(|parent| self.graph.insert_subtree(parent, index, node))
            .is_some()
    }

    fn remove_node(&mut self, path: &[usize]) -> Option<BehaviourNode> {
        if path.is_empty() {
            return None;
        }
        let node = self.graph.node_at_path(path)?;
        let removed = self.graph.remove_subtree(node);
        self.focus.truncate_to_live(self.graph);
        removed
    }

    fn node_position(&self, path: &[usize]) -> Option<Position> {
        let node = self.graph.node_at_path(path)?;
        self.graph.get(node).map(GraphNode::position)
    }

    fn set_node_position(&mut self, path: &[usize], position: Position) -> bool {
        match self
            .graph
            .node_at_path(path)
            .and_then(|node| self.graph.get_mut(node))
        {
            Some(node) => {
                node.set_position(position);
                true
            }
            None => false,
        }
    }

    fn push_focus(&mut self, path: &[usize]) -> bool {
        match self.graph.node_at_path(path) {
            Some(node) => {
                self.focus.push(node);
                true
            }
            None => false,
        }
    }

    fn pop_focus(&mut self) -> bool {
        self.focus.pop().is_some()
    }
}
