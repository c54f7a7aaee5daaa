// src/engine/mod.rs

//! The choreography engine.
//!
//! The pure state machine lives in [`core`]; the async/timer shell is
//! implemented in [`runtime`]. This module defines the types flowing
//! between them and out to the host:
//!
//! - [`EngineCommand`]s go in,
//! - [`CoreEffect`]s come out of the core in emission order,
//! - [`EngineNotice`]s are advisories for the user, never errors.

pub mod core;
pub mod runtime;

use std::fmt;

use crate::model::{DanceSession, FormationId, ModuleId};

pub use self::core::{Choreographer, CoreStep};
pub use runtime::{EngineHandle, EngineRuntime};

/// One emitted call, with display text fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedCall {
    /// The module this call belongs to.
    pub module: ModuleId,

    /// Resolved display text (alt-command substitution already applied).
    pub command: String,

    /// Beats of music this call takes to dance.
    pub beats: u32,

    /// Part of the square dances this call during the next one.
    pub concurrent_with_next: bool,
}

/// The past, present and future of the tip's call sequence.
///
/// `future` is the call the caller announces ahead of the beat; `now` is
/// what the dancers are currently dancing; `past` is the full history of
/// the tip.
#[derive(Debug, Clone, Default)]
pub struct CallTemporality {
    pub past: Vec<SequencedCall>,
    pub now: Option<SequencedCall>,
    pub future: Option<SequencedCall>,
}

impl CallTemporality {
    /// Shift the temporality forward by one emission. `None` flushes the
    /// pipeline: the machine winds down toward a pause.
    pub fn add(&mut self, next: Option<SequencedCall>) {
        if let Some(now) = self.now.take() {
            self.past.push(now);
        }

        self.now = self.future.take();
        self.future = next;
    }
}

/// Read-only snapshot of one module stack frame, for display.
#[derive(Debug, Clone)]
pub struct StackFrameView {
    pub module: ModuleId,
    pub module_name: String,

    /// Position in the module's sequence; `None` until the first call.
    pub seq_pos: Option<usize>,

    /// How the module was selected.
    pub explanation: Option<String>,
}

/// Advisory notices surfaced by the engine.
///
/// None of these are errors: the engine keeps running (or pauses itself)
/// and the host decides how loudly to tell the user.
#[derive(Debug, Clone)]
pub enum EngineNotice {
    /// No module starts from the formation the dance has reached. The
    /// machine pauses itself; more content is needed.
    ContentGap {
        formation: FormationId,
        abbreviation: String,
    },

    /// Selection had to accept a module that violates hand or flow
    /// compatibility.
    FlowOrHandViolation { module: ModuleId },

    /// Selection took longer than about half a beat interval.
    PerformanceDegradation { elapsed_ms: u64 },
}

impl fmt::Display for EngineNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineNotice::ContentGap { abbreviation, .. } => {
                write!(f, "No module found that starts from formation {abbreviation}!")
            }
            EngineNotice::FlowOrHandViolation { .. } => {
                write!(f, "Bad flow or hand use in next module.")
            }
            EngineNotice::PerformanceDegradation { elapsed_ms } => {
                write!(f, "Module search took {elapsed_ms} ms; performance warning.")
            }
        }
    }
}

/// Outward effect of one core operation, in emission order.
#[derive(Debug, Clone)]
pub enum CoreEffect {
    /// The call temporality changed.
    Calls(CallTemporality),

    /// The module stack changed.
    Stack(Vec<StackFrameView>),

    /// The running flag changed.
    Running(bool),

    /// An advisory for the user.
    Notice(EngineNotice),
}

/// Commands the host sends to the engine runtime.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    BeginTip,
    EndTip,

    /// Practice-loop a single module. Follow with `Resume` or `Step`.
    PlayModule(ModuleId),

    Pause,
    Resume,

    /// Advance one call without starting the pacer.
    Step,

    /// Rebuild the candidate pool after criteria or content changes.
    ActivateCriteria,

    /// Replace the session criteria (follow with `ActivateCriteria`).
    UseDanceSession(DanceSession),
}
