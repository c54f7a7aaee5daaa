// src/model/module.rs

//! Modules: reusable fragments of choreography with defined entry and exit
//! state. A dance is built by stringing compatible modules together.

use std::sync::{Arc, LazyLock};

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{
    Call, CallId, CollectionId, DanceLevel, Difficulty, FlowDirection, FormationId, Hand, ModuleId,
    SQUARED_SET_ID,
};

/// Leading "(option one/option two)" alternative in an alt command.
static OPTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((.+)/(.+)\)").expect("option prefix regex"));

/// One step of a module's sequence, as stored in a collection file.
///
/// `call` is an id reference; the catalog resolves it while linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencedItemSpec {
    pub call: CallId,

    /// Alternative command text for the call, for more directional calling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_command: Option<String>,

    /// If true, this call is performed by part of the square at the same
    /// time as the others do the next call in the sequence.
    #[serde(default, rename = "concurrent")]
    pub concurrent_with_next: bool,
}

/// One step of a module's sequence with the call reference resolved.
#[derive(Debug, Clone)]
pub struct SequencedItem {
    pub call: Arc<Call>,
    pub alt_command: Option<String>,
    pub concurrent_with_next: bool,
}

impl SequencedItem {
    /// Resolve the display text for this item, drawing from `rng` when the
    /// alt command starts with an "(a/b)" option pair.
    ///
    /// Resolution happens once per emission; the emitted call owns the
    /// resolved string, so the dancers hear the same choice for as long as
    /// the call is on display.
    pub fn resolve_display_text(&self, rng: &mut impl Rng) -> String {
        match &self.alt_command {
            Some(alt) => substitute_option_prefix(alt, rng),
            None => {
                let mut text = self.call.command.clone();
                if self.concurrent_with_next {
                    text.push_str(" and...");
                }
                text
            }
        }
    }
}

/// If `command` starts with the pattern "(option1/option2)", select one of
/// the options at random and splice it in front of the rest of the text.
/// Anything else passes through untouched.
pub fn substitute_option_prefix(command: &str, rng: &mut impl Rng) -> String {
    let Some(caps) = OPTION_PREFIX.captures(command) else {
        return command.to_string();
    };

    let whole = caps.get(0).map_or("", |m| m.as_str());
    let pick = if rng.random_bool(0.5) {
        &caps[1]
    } else {
        &caps[2]
    };
    format!("{}{}", pick, &command[whole.len()..])
}

/// A module as stored in a collection file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    pub id: ModuleId,

    /// Some descriptive name.
    pub name: String,

    /// CallerLab dance level.
    #[serde(default)]
    pub level: DanceLevel,

    /// The formation this module may be called from.
    pub start_formation: FormationId,

    /// The formation the square is in when this module completes.
    pub end_formation: FormationId,

    /// Which hand the belle dancers need free at the start.
    #[serde(default)]
    pub start_hand_belle: Hand,

    /// Which hand the beau dancers need free at the start.
    #[serde(default)]
    pub start_hand_beau: Hand,

    /// Which hand the belle dancers last used at the end.
    #[serde(default)]
    pub end_hand_belle: Hand,

    /// Which hand the beau dancers last used at the end.
    #[serde(default)]
    pub end_hand_beau: Hand,

    /// Belle flow direction this module may start with.
    #[serde(default = "default_start_flow")]
    pub start_flow_belle: FlowDirection,

    /// Beau flow direction this module may start with.
    #[serde(default = "default_start_flow")]
    pub start_flow_beau: FlowDirection,

    /// Belle flow direction when the module completes.
    #[serde(default)]
    pub end_flow_belle: FlowDirection,

    /// Beau flow direction when the module completes.
    #[serde(default)]
    pub end_flow_beau: FlowDirection,

    /// Difficulty flavor.
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,

    /// The sequence of calls making up the module.
    #[serde(default)]
    pub sequence: Vec<SequencedItemSpec>,

    /// Author notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_start_flow() -> FlowDirection {
    FlowDirection::Forward
}

fn default_difficulty() -> Difficulty {
    1
}

/// A module with every reference resolved, as served by the catalog.
///
/// Catalog data is immutable and shared; transient scheduler state (the
/// used-this-tip flag, substitution choices) lives in the engine instead.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub level: DanceLevel,
    pub start_formation: FormationId,
    pub end_formation: FormationId,
    pub start_hand_belle: Hand,
    pub start_hand_beau: Hand,
    pub end_hand_belle: Hand,
    pub end_hand_beau: Hand,
    pub start_flow_belle: FlowDirection,
    pub start_flow_beau: FlowDirection,
    pub end_flow_belle: FlowDirection,
    pub end_flow_beau: FlowDirection,
    pub difficulty: Difficulty,
    pub sequence: Vec<SequencedItem>,
    pub notes: Option<String>,

    /// The collection this module was loaded from.
    pub collection: CollectionId,
}

impl Module {
    /// Does this module return the square to home?
    pub fn resolves(&self) -> bool {
        self.end_formation == SQUARED_SET_ID
    }
}
