// src/model/level.rs

//! CallerLab dance levels and difficulty flavors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// CallerLab dance level, ordered lowest to highest.
///
/// `NO` marks custom material outside the standard lists and sorts below
/// everything, so a custom module is always admitted by a level cap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum DanceLevel {
    /// No level / custom.
    #[default]
    NO,
    B1,
    B2,
    MS,
    PL,
    A1,
    A2,
}

impl fmt::Display for DanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DanceLevel::NO => "Custom",
            DanceLevel::B1 => "Basic 1",
            DanceLevel::B2 => "Basic 2",
            DanceLevel::MS => "Mainstream",
            DanceLevel::PL => "Plus",
            DanceLevel::A1 => "Advanced 1",
            DanceLevel::A2 => "Advanced 2",
        };
        f.write_str(text)
    }
}

/// Difficulty "flavor" of a module. 0 means unset; authored modules use
/// [`DIFFICULTY_MIN`]..=[`DIFFICULTY_MAX`].
pub type Difficulty = u8;

pub const DIFFICULTY_MIN: Difficulty = 1;
pub const DIFFICULTY_MAX: Difficulty = 4;

/// Display name for a difficulty flavor.
pub fn difficulty_name(value: Difficulty) -> &'static str {
    match value {
        0 => "Unset",
        1 => "Plain",
        2 => "Vanilla",
        3 => "Pepper",
        4 => "Tabasco",
        _ => "Unknown",
    }
}
