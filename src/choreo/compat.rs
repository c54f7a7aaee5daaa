// src/choreo/compat.rs

//! Hand and flow compatibility between consecutive modules.
//!
//! These are pure functions. A module-to-module transition is legal only
//! when both dancer roles (belle, beau) pass both the hand and the flow
//! check.

use crate::model::{FlowDirection, Hand, Module};

/// May a role start the next module on `next_start`, given it ended the
/// previous module on `prev_end`?
pub fn hand_allows(prev_end: Hand, next_start: Hand) -> bool {
    prev_end.violation() != Some(next_start)
}

/// May a role start the next module flowing `next_start`, given the
/// previous module left it flowing `prev_end`?
pub fn flow_allows(prev_end: FlowDirection, next_start: FlowDirection) -> bool {
    prev_end.bad_successor() != Some(next_start)
}

/// May `next` follow `prev`?
pub fn transition_allows(prev: &Module, next: &Module) -> bool {
    hand_allows(prev.end_hand_belle, next.start_hand_belle)
        && hand_allows(prev.end_hand_beau, next.start_hand_beau)
        && flow_allows(prev.end_flow_belle, next.start_flow_belle)
        && flow_allows(prev.end_flow_beau, next.start_flow_beau)
}
