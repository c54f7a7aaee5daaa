// src/model/hand.rs

//! Which hand a dancer has free or last used.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hand a role needs at the start of a module, or last used at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    /// No particular hand, or either will do.
    #[default]
    Any,
    Left,
    Right,
    Both,
}

impl Hand {
    /// If a role *ended* the previous module on this hand, which hand may
    /// the next module *not* start that role on?
    ///
    /// Using the same hand twice in a row is the violation; `any` and
    /// `both` carry no restriction.
    pub fn violation(self) -> Option<Hand> {
        match self {
            Hand::Left => Some(Hand::Left),
            Hand::Right => Some(Hand::Right),
            Hand::Any | Hand::Both => None,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Hand::Any => "None/Either",
            Hand::Left => "Left",
            Hand::Right => "Right",
            Hand::Both => "Both",
        };
        f.write_str(text)
    }
}
