//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use btquill::document::graph::NodeId;
use btquill::document::node::{BehaviourNode, BehaviourTree, NodeKind, NodeType};
use btquill::editor::GraphDocument;

pub fn node(kind: NodeKind, name: &str) -> BehaviourNode {
    NodeType::new(kind, name).instantiate()
}

/// ```text
/// Root
/// └── Selector            [0]
///     ├── Sequence        [0, 0]
///     │   ├── Wait        [0, 0, 0]
///     │   └── MoveTo      [0, 0, 1]
///     ├── Inverter        [0, 1]
///     └── Group           [0, 2]
/// ```
pub fn sample_tree() -> BehaviourTree {
    let sequence = node(NodeKind::Composite, "Sequence")
        .with_child(node(NodeKind::Leaf, "Wait"))
        .with_child(node(NodeKind::Leaf, "MoveTo"));
    let selector = node(NodeKind::Composite, "Selector")
        .with_child(sequence)
        .with_child(node(NodeKind::Decorator, "Inverter"))
        .with_child(node(NodeKind::NodeGroup, "Group"));
    BehaviourTree::new(node(NodeKind::Root, "Root").with_child(selector))
}

pub fn sample_document() -> GraphDocument {
    let mut doc = GraphDocument::default();
    doc.bind(&sample_tree());
    doc
}

/// Looks up a node by its root-to-node index path.
pub fn at(doc: &GraphDocument, path: &[usize]) -> NodeId {
    doc.graph()
        .node_at_path(path)
        .unwrap_or_else(|| panic!("no node at {:?}", path))
}

pub fn title(doc: &GraphDocument, node: NodeId) -> String {
    doc.node(node).unwrap().title().to_string()
}

pub fn child_titles(doc: &GraphDocument, node: NodeId) -> Vec<String> {
    doc.node(node)
        .unwrap()
        .children()
        .iter()
        .map(|&child| title(doc, child))
        .collect()
}

pub fn selected_titles(doc: &GraphDocument) -> Vec<String> {
    doc.selected()
        .into_iter()
        .map(|node| title(doc, node))
        .collect()
}
