//! Behavior-tree domain nodes.
//!
//! This module provides the owned, serializable representation of a behavior
//! tree: the node kinds the editor distinguishes, breakpoint markers, canvas
//! positions and the `BehaviourNode` tree itself. A `GraphDocument` wraps a
//! `BehaviourTree` into an arena of editor nodes when it is bound, and can
//! export the current state back into this form at any time.
//!
//! # Example
//!
//! ```
//! use btquill::document::node::{BehaviourNode, NodeKind, NodeType};
//!
//! let mut sequence = NodeType::new(NodeKind::Composite, "Sequence").instantiate();
//! sequence.children.push(NodeType::new(NodeKind::Leaf, "Wait").instantiate());
//!
//! assert_eq!(sequence.subtree_len(), 2);
//! assert!(sequence.data.kind.accepts_child(sequence.children.len()));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// The closed set of node kinds the editor distinguishes.
///
/// Selection, focus and paste policies are pure functions over this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The tree's entry point. Holds at most one child.
    Root,
    /// A node with any number of ordered children (sequence, selector, ...).
    Composite,
    /// A node wrapping exactly one child.
    Decorator,
    /// A collapsible group that can be entered to scope editing to its subtree.
    NodeGroup,
    /// A terminal action or condition.
    Leaf,
}

impl NodeKind {
    /// Returns whether a node of this kind accepts another child when it
    /// already has `child_count` children.
    ///
    /// Composites are variadic; roots, decorators and groups hold a single
    /// child; leaves hold none.
    pub fn accepts_child(self, child_count: usize) -> bool {
        match self {
            NodeKind::Composite => true,
            NodeKind::Root | NodeKind::Decorator | NodeKind::NodeGroup => child_count == 0,
            NodeKind::Leaf => false,
        }
    }

    /// Returns true for kinds whose subtree is selected by shift-click.
    pub fn is_branch(self) -> bool {
        matches!(self, NodeKind::Composite | NodeKind::Decorator)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Root => "root",
            NodeKind::Composite => "composite",
            NodeKind::Decorator => "decorator",
            NodeKind::NodeGroup => "group",
            NodeKind::Leaf => "leaf",
        };
        write!(f, "{}", name)
    }
}

/// Debugger breakpoint marker attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    #[default]
    None,
    Enabled,
    Disabled,
}

/// A point on the editor canvas, in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The payload of a single node, without its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Name of the node type, e.g. "Sequence" or "MoveTo".
    #[serde(rename = "type")]
    pub type_name: String,
    /// Display title shown on the canvas and in undo labels.
    pub title: String,
    #[serde(default)]
    pub breakpoint: Breakpoint,
    #[serde(default)]
    pub position: Position,
}

/// An owned behavior-tree node together with its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourNode {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BehaviourNode>,
}

impl BehaviourNode {
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    /// Appends `child` and returns self, for building fixtures.
    pub fn with_child(mut self, child: BehaviourNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including this node.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(BehaviourNode::subtree_len)
            .sum::<usize>()
    }
}

/// A node type the domain layer knows how to instantiate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeType {
    pub kind: NodeKind,
    pub name: String,
}

impl NodeType {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Creates a fresh, childless node of this type titled after the type name.
    pub fn instantiate(&self) -> BehaviourNode {
        BehaviourNode::new(NodeData {
            kind: self.kind,
            type_name: self.name.clone(),
            title: self.name.clone(),
            breakpoint: Breakpoint::None,
            position: Position::default(),
        })
    }
}

/// A complete behavior tree asset as seen by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourTree {
    pub root: BehaviourNode,
    /// Set when the asset must not be edited (e.g. it is an instance).
    #[serde(default)]
    pub read_only: bool,
}

impl BehaviourTree {
    pub fn new(root: BehaviourNode) -> Self {
        Self {
            root,
            read_only: false,
        }
    }

    /// Creates a tree consisting of a single root node.
    pub fn empty() -> Self {
        Self::new(NodeType::new(NodeKind::Root, "Root").instantiate())
    }
}
