//! Clipboard payload format for copied subtrees.
//!
//! Copied nodes travel through the clipboard as YAML text, so a payload can
//! be pasted into another document or inspected by hand.

use super::node::BehaviourNode;
use anyhow::{Context, Result};

/// Serializes a subtree into a clipboard payload.
pub fn serialize_node(node: &BehaviourNode) -> Result<String> {
    serde_yaml::to_string(node).context("Failed to serialize node")
}

/// Parses a clipboard payload back into a subtree.
pub fn deserialize_node(payload: &str) -> Result<BehaviourNode> {
    serde_yaml::from_str(payload).context("Clipboard does not contain a behavior-tree node")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::{Breakpoint, NodeKind, NodeType, Position};

    #[test]
    fn test_payload_keeps_structure_and_editor_state() {
        let mut leaf = NodeType::new(NodeKind::Leaf, "Attack").instantiate();
        leaf.data.breakpoint = Breakpoint::Enabled;
        leaf.data.position = Position::new(12.0, 40.5);
        let node = NodeType::new(NodeKind::Decorator, "Repeat")
            .instantiate()
            .with_child(leaf);

        let payload = serialize_node(&node).unwrap();
        assert!(payload.contains("type: Repeat"));

        let parsed = deserialize_node(&payload).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_rejects_foreign_text() {
        assert!(deserialize_node("just some text").is_err());
        assert!(deserialize_node("kind: spaceship\ntype: X\ntitle: X\n").is_err());
    }
}
