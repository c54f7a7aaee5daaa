// src/model/flow.rs

//! Which way the dancers are moving.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body flow of one dancer role at a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    #[default]
    None,
    Forward,
    Back,
    Left,
    Right,
}

impl FlowDirection {
    /// If a role *ended* the previous module flowing this way, which flow
    /// would be bad for the next module to *start* with?
    ///
    /// Reversing direction is the bad transition. Ending in backward flow
    /// has no bad successor: in practice someone ends up rock-stepping
    /// forward out of it anyway.
    pub fn bad_successor(self) -> Option<FlowDirection> {
        match self {
            FlowDirection::Forward => Some(FlowDirection::Back),
            FlowDirection::Left => Some(FlowDirection::Right),
            FlowDirection::Right => Some(FlowDirection::Left),
            FlowDirection::None | FlowDirection::Back => None,
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FlowDirection::None => "None",
            FlowDirection::Forward => "Forward",
            FlowDirection::Back => "Back",
            FlowDirection::Left => "Left",
            FlowDirection::Right => "Right",
        };
        f.write_str(text)
    }
}
