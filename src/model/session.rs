// src/model/session.rs

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{PatterError, Result};
use crate::model::{CollectionId, DanceLevel, Difficulty, FamilyId};

/// Criteria and tempo for one dance session.
///
/// Loaded from a TOML file; every field is optional and keeps its default
/// when omitted:
///
/// ```toml
/// name = "Thursday class"
/// level = "PL"
/// bpm = 128.0
/// continuation_probability = 60
/// max_difficulty = 2
/// target_difficulty = 2.0
/// enabled_collections = []
/// enabled_families = []
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DanceSession {
    /// Display name for the session.
    pub name: Option<String>,

    /// Collections enabled for selection; empty means all.
    pub enabled_collections: HashSet<CollectionId>,

    /// Families enabled for selection; empty means all.
    pub enabled_families: HashSet<FamilyId>,

    /// Maximum CallerLab dance level modules may use.
    pub level: DanceLevel,

    /// Beats per minute at which to emit choreography.
    pub bpm: f64,

    /// Probability driver for growing the module stack vs resolving.
    /// 0 = end as soon as possible, 100 = always go deeper.
    pub continuation_probability: u32,

    /// Maximum difficulty flavor modules may use.
    pub max_difficulty: Difficulty,

    /// Desired average difficulty across the tip.
    pub target_difficulty: f64,
}

impl Default for DanceSession {
    fn default() -> Self {
        Self {
            name: None,
            enabled_collections: HashSet::new(),
            enabled_families: HashSet::new(),
            level: DanceLevel::PL,
            bpm: 128.0,
            continuation_probability: 50,
            max_difficulty: 2,
            target_difficulty: 2.0,
        }
    }
}

impl DanceSession {
    /// Load a session from a TOML file and sanity-check it.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let session: DanceSession = toml::from_str(&contents)?;
        session.validate()?;
        Ok(session)
    }

    /// Check value ranges the type system can't.
    pub fn validate(&self) -> Result<()> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(PatterError::SessionError(format!(
                "bpm must be a positive number (got {})",
                self.bpm
            )));
        }

        if self.continuation_probability > 100 {
            return Err(PatterError::SessionError(format!(
                "continuation_probability must be 0-100 (got {})",
                self.continuation_probability
            )));
        }

        Ok(())
    }

    /// Beat period in milliseconds at the session tempo.
    pub fn beat_millis(&self) -> f64 {
        60_000.0 / self.bpm
    }

    /// Effective steering target: the target difficulty capped by the max.
    pub fn effective_target_difficulty(&self) -> f64 {
        self.target_difficulty.min(self.max_difficulty as f64)
    }
}
