mod common;

use btquill::document::node::{Breakpoint, NodeKind, NodeType, Position};
use btquill::editor::input::Modifiers;
use common::{at, child_titles, sample_document, title};

#[test]
fn test_create_child_appends_last() {
    let mut doc = sample_document();
    let selector = at(&doc, &[0]);

    let wait = doc
        .create_child(selector, &NodeType::new(NodeKind::Leaf, "Wait"))
        .unwrap();

    assert_eq!(
        child_titles(&doc, selector),
        vec!["Sequence", "Inverter", "Group", "Wait"]
    );
    assert_eq!(doc.node(wait).unwrap().parent(), Some(selector));
    assert_eq!(doc.history().undo_label(), Some("Created Wait"));

    assert!(doc.undo());
    assert!(doc.node(wait).is_none());
    assert_eq!(child_titles(&doc, selector).len(), 3);
}

#[test]
fn test_create_child_respects_capacity() {
    let mut doc = sample_document();
    let wait_type = NodeType::new(NodeKind::Leaf, "Wait");
    let inverter = at(&doc, &[0, 1]);
    let group = at(&doc, &[0, 2]);

    assert!(doc.create_child(at(&doc, &[0, 0, 0]), &wait_type).is_none());
    assert!(doc.create_child(doc.master_root().unwrap(), &wait_type).is_none());

    assert!(doc.create_child(inverter, &wait_type).is_some());
    assert!(doc.create_child(inverter, &wait_type).is_none());
    assert!(doc.create_child(group, &wait_type).is_some());
    assert!(doc.create_child(group, &wait_type).is_none());
}

#[test]
fn test_delete_node_and_undo() {
    let mut doc = sample_document();
    let selector = at(&doc, &[0]);
    let sequence = at(&doc, &[0, 0]);
    let before = doc.graph().len();

    assert!(doc.delete_node(sequence));
    assert_eq!(doc.graph().len(), before - 3);
    assert_eq!(child_titles(&doc, selector), vec!["Inverter", "Group"]);
    assert_eq!(doc.history().undo_label(), Some("Deleted Sequence"));

    assert!(doc.undo());
    assert_eq!(doc.graph().len(), before);
    assert_eq!(
        child_titles(&doc, selector),
        vec!["Sequence", "Inverter", "Group"]
    );
    assert_eq!(child_titles(&doc, at(&doc, &[0, 0])), vec!["Wait", "MoveTo"]);

    assert!(doc.redo());
    assert_eq!(child_titles(&doc, selector), vec!["Inverter", "Group"]);
}

#[test]
fn test_master_root_cannot_be_deleted() {
    let mut doc = sample_document();
    let root = doc.master_root().unwrap();

    assert!(!doc.delete_node(root));
    assert_eq!(doc.master_root(), Some(root));
    assert!(!doc.history().can_undo());
}

#[test]
fn test_delete_all_children_round_trip() {
    let mut doc = sample_document();
    let selector = at(&doc, &[0]);
    let before = doc.to_tree().unwrap();

    assert_eq!(doc.delete_all_children(selector), 3);
    assert!(child_titles(&doc, selector).is_empty());
    assert_eq!(doc.graph().len(), 2);
    assert_eq!(doc.history().undo_label(), Some("Delete children"));

    assert!(doc.undo());
    assert_eq!(doc.to_tree().unwrap(), before);
    assert!(!doc.history().can_undo());

    assert!(doc.redo());
    assert!(child_titles(&doc, selector).is_empty());
    assert!(doc.undo());
    assert_eq!(doc.to_tree().unwrap(), before);
}

#[test]
fn test_delete_all_children_of_leaf_is_noop() {
    let mut doc = sample_document();
    assert_eq!(doc.delete_all_children(at(&doc, &[0, 0, 0])), 0);
    assert!(!doc.history().can_undo());
}

#[test]
fn test_drag_moves_selection_as_one_step() {
    let mut doc = sample_document();
    let sequence = at(&doc, &[0, 0]);
    let inverter = at(&doc, &[0, 1]);
    doc.select_node(sequence, Modifiers::NONE);
    doc.select_node(inverter, Modifiers::CTRL);
    let seq_start = doc.node(sequence).unwrap().position();
    let inv_start = doc.node(inverter).unwrap().position();

    assert!(doc.begin_drag(sequence, Position::new(100.0, 100.0)));
    assert!(doc.is_dragging());
    assert!(doc.drag(sequence, Position::new(110.0, 105.0)));
    assert!(doc.drag(sequence, Position::new(120.0, 110.0)));
    assert!(doc.end_drag(sequence));

    let delta = Position::new(20.0, 10.0);
    assert_eq!(doc.node(sequence).unwrap().position(), seq_start + delta);
    assert_eq!(doc.node(inverter).unwrap().position(), inv_start + delta);
    assert_eq!(doc.history().undo_label(), Some("Moved node(s)"));
    assert_eq!(doc.history().current_transaction().unwrap().len(), 2);

    assert!(doc.undo());
    assert_eq!(doc.node(sequence).unwrap().position(), seq_start);
    assert_eq!(doc.node(inverter).unwrap().position(), inv_start);
    assert!(!doc.history().can_undo());

    assert!(doc.redo());
    assert_eq!(doc.node(inverter).unwrap().position(), inv_start + delta);
}

#[test]
fn test_drag_on_unselected_anchor_is_ignored() {
    let mut doc = sample_document();
    let sequence = at(&doc, &[0, 0]);
    let inverter = at(&doc, &[0, 1]);
    doc.select_node(inverter, Modifiers::NONE);
    let start = doc.node(sequence).unwrap().position();

    assert!(!doc.begin_drag(sequence, Position::new(0.0, 0.0)));
    assert!(!doc.drag(sequence, Position::new(50.0, 50.0)));
    assert!(!doc.end_drag(sequence));

    assert_eq!(doc.node(sequence).unwrap().position(), start);
    assert!(!doc.history().is_group_open());
    assert!(!doc.history().can_undo());
}

#[test]
fn test_undo_is_blocked_mid_drag() {
    let mut doc = sample_document();
    let sequence = at(&doc, &[0, 0]);
    doc.select_node(sequence, Modifiers::NONE);

    doc.begin_drag(sequence, Position::new(0.0, 0.0));
    assert!(!doc.undo());
    doc.end_drag(sequence);
    assert!(doc.undo());
}

#[test]
fn test_structural_edits_are_rejected_mid_drag() {
    let mut doc = sample_document();
    let selector = at(&doc, &[0]);
    let sequence = at(&doc, &[0, 0]);
    doc.select_node(sequence, Modifiers::NONE);
    assert!(doc.copy(at(&doc, &[0, 0, 0])));

    assert!(doc.begin_drag(sequence, Position::new(0.0, 0.0)));
    assert!(doc
        .create_child(selector, &NodeType::new(NodeKind::Leaf, "Idle"))
        .is_none());
    assert!(!doc.delete_node(at(&doc, &[0, 1])));
    assert_eq!(doc.delete_all_children(sequence), 0);
    assert!(doc.paste(selector).is_none());
    assert!(doc.end_drag(sequence));

    // Only the move was recorded
    assert_eq!(doc.history().undo_label(), Some("Moved node(s)"));
    assert_eq!(doc.history().current_transaction().unwrap().len(), 1);
    assert_eq!(
        child_titles(&doc, selector),
        vec!["Sequence", "Inverter", "Group"]
    );
    assert!(doc.create_child(selector, &NodeType::new(NodeKind::Leaf, "Idle")).is_some());
}

#[test]
fn test_delete_all_breakpoints() {
    let mut doc = sample_document();
    let wait = at(&doc, &[0, 0, 0]);
    let address = doc.address_of(at(&doc, &[0, 1])).unwrap();

    assert!(doc.set_breakpoint(wait, Breakpoint::Enabled));
    assert!(doc.set_breakpoint_at(address.as_str(), Breakpoint::Disabled));
    assert!(!doc.set_breakpoint_at("%%%", Breakpoint::Enabled));
    assert_eq!(doc.node(wait).unwrap().breakpoint(), Breakpoint::Enabled);

    doc.delete_all_breakpoints();

    let root = doc.master_root().unwrap();
    for id in doc.graph().preorder(root) {
        assert_eq!(doc.node(id).unwrap().breakpoint(), Breakpoint::None);
    }
    assert!(!doc.history().can_undo());
}

#[test]
fn test_commands_ignore_stale_ids() {
    let mut doc = sample_document();
    let sequence = at(&doc, &[0, 0]);
    let wait = at(&doc, &[0, 0, 0]);
    assert!(doc.delete_node(sequence));
    let steps = doc.history().len();

    assert!(doc
        .create_child(sequence, &NodeType::new(NodeKind::Leaf, "Wait"))
        .is_none());
    assert!(!doc.delete_node(wait));
    assert_eq!(doc.delete_all_children(sequence), 0);
    assert!(!doc.copy(wait));
    assert!(!doc.set_breakpoint(wait, Breakpoint::Enabled));
    assert!(!doc.enter_group(wait));
    assert_eq!(doc.history().len(), steps);
    assert_eq!(title(&doc, at(&doc, &[0, 0])), "Inverter");
}
