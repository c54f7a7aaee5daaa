// src/model/formation.rs

use serde::{Deserialize, Serialize};

use crate::model::{DanceLevel, FormationId};

/// Reserved id of the squared set: the home formation, and the only legal
/// state when no module is active.
pub const SQUARED_SET_ID: &str = "S";

/// A Formation defines where each dancer stands and which way they face.
///
/// The scheduler does not care what a formation looks like; formations are
/// opaque compatibility keys used to match modules end-to-start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub id: FormationId,

    /// Name given to this formation. Ex: Sashayed Facing Lines
    pub name: String,

    /// Short abbreviation of the formation name. Ex: SS
    #[serde(rename = "abbr")]
    pub abbreviation: String,

    /// CallerLab dance level this formation first appears at.
    #[serde(default)]
    pub level: DanceLevel,
}
