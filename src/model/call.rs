// src/model/call.rs

use serde::{Deserialize, Serialize};

use crate::model::{CallId, DanceLevel, FamilyId};

/// A Family is a grouping of related calls.
///
/// In the CallerLab definitions documents the numbered lists are families;
/// the calls inside carry the concrete designators ("Heads Right and Left
/// Thru", "Centers Right and Left Thru", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,

    /// Full name of the family. Ex: Right and Left Thru
    pub name: String,

    #[serde(default)]
    pub level: DanceLevel,
}

/// A Call is one command given to the dancers during a dance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub id: CallId,

    /// The command to speak. Ex: Heads Right and Left Thru
    pub command: String,

    /// How many beats of music this call requires to be danced.
    pub beats: u32,

    /// The family this call is a member of (id reference).
    pub family: FamilyId,
}
