// src/model/collection.rs

use serde::{Deserialize, Serialize};

use crate::model::{Call, CollectionId, DanceLevel, Difficulty, Family, Formation, ModuleSpec};

/// One collection file: the unit of loading and sharing. All formations,
/// families, calls and modules live in collections.
///
/// ```json
/// {
///   "id": "basics",
///   "name": "Basic patter",
///   "difficulty": 2,
///   "level": "MS",
///   "formations": [{ "id": "S", "name": "Squared Set", "abbr": "SS" }],
///   "families": [{ "id": "f1", "name": "Square Thru" }],
///   "calls": [{ "id": "c1", "command": "Heads Square Thru 4", "beats": 10, "family": "f1" }],
///   "modules": [ ... ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFile {
    pub id: CollectionId,

    /// Display name of this collection.
    pub name: String,

    /// Name of the person who created this collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Highest difficulty flavor in this collection.
    #[serde(default = "default_collection_difficulty")]
    pub difficulty: Difficulty,

    /// Highest CallerLab dance level in this collection.
    #[serde(default)]
    pub level: DanceLevel,

    #[serde(default)]
    pub formations: Vec<Formation>,

    #[serde(default)]
    pub families: Vec<Family>,

    #[serde(default)]
    pub calls: Vec<Call>,

    #[serde(default)]
    pub modules: Vec<ModuleSpec>,

    /// Copyright license.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

fn default_collection_difficulty() -> Difficulty {
    1
}
