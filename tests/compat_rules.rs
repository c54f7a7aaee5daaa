// tests/compat_rules.rs

use patter::choreo::compat::{flow_allows, hand_allows, transition_allows};
use patter::model::{DanceLevel, FlowDirection, Hand, Module};

fn base_module(id: &str) -> Module {
    Module {
        id: id.to_string(),
        name: id.to_string(),
        level: DanceLevel::NO,
        start_formation: "S".to_string(),
        end_formation: "S".to_string(),
        start_hand_belle: Hand::Any,
        start_hand_beau: Hand::Any,
        end_hand_belle: Hand::Any,
        end_hand_beau: Hand::Any,
        start_flow_belle: FlowDirection::Forward,
        start_flow_beau: FlowDirection::Forward,
        end_flow_belle: FlowDirection::None,
        end_flow_beau: FlowDirection::None,
        difficulty: 1,
        sequence: Vec::new(),
        notes: None,
        collection: "test".to_string(),
    }
}

#[test]
fn same_hand_twice_is_a_violation() {
    assert!(!hand_allows(Hand::Left, Hand::Left));
    assert!(!hand_allows(Hand::Right, Hand::Right));
}

#[test]
fn different_hands_are_fine() {
    assert!(hand_allows(Hand::Left, Hand::Right));
    assert!(hand_allows(Hand::Right, Hand::Left));
    assert!(hand_allows(Hand::Left, Hand::Any));
    assert!(hand_allows(Hand::Right, Hand::Both));
}

#[test]
fn unrestricted_hands_allow_everything() {
    for next in [Hand::Any, Hand::Left, Hand::Right, Hand::Both] {
        assert!(hand_allows(Hand::Any, next));
        assert!(hand_allows(Hand::Both, next));
    }
}

#[test]
fn reversing_flow_is_bad() {
    assert!(!flow_allows(FlowDirection::Forward, FlowDirection::Back));
    assert!(!flow_allows(FlowDirection::Left, FlowDirection::Right));
    assert!(!flow_allows(FlowDirection::Right, FlowDirection::Left));
}

#[test]
fn backward_flow_tolerates_a_forward_start() {
    // Dancers rock-step forward out of backward flow, so this one reversal
    // is allowed.
    assert!(flow_allows(FlowDirection::Back, FlowDirection::Forward));
}

#[test]
fn continuing_or_no_flow_is_fine() {
    for next in [
        FlowDirection::None,
        FlowDirection::Forward,
        FlowDirection::Back,
        FlowDirection::Left,
        FlowDirection::Right,
    ] {
        assert!(flow_allows(FlowDirection::None, next));
    }
    assert!(flow_allows(FlowDirection::Forward, FlowDirection::Forward));
    assert!(flow_allows(FlowDirection::Left, FlowDirection::Left));
}

#[test]
fn transition_checks_both_roles() {
    let mut prev = base_module("prev");
    let mut next = base_module("next");
    assert!(transition_allows(&prev, &next));

    // A violation on the belle track alone blocks the transition.
    prev.end_hand_belle = Hand::Right;
    next.start_hand_belle = Hand::Right;
    assert!(!transition_allows(&prev, &next));

    next.start_hand_belle = Hand::Left;
    assert!(transition_allows(&prev, &next));

    // A flow violation on the beau track alone blocks it too.
    prev.end_flow_beau = FlowDirection::Forward;
    next.start_flow_beau = FlowDirection::Back;
    assert!(!transition_allows(&prev, &next));
}
