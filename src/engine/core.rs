// src/engine/core.rs

//! Pure choreographer state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! operation calls and produces [`CoreStep`]s:
//! - an ordered list of outward effects (call/stack/run-state snapshots,
//!   advisory notices)
//! - a pacing request telling the shell how many beats to wait before the
//!   next tick, if any
//!
//! The async/timer shell (`engine::runtime::EngineRuntime`) is responsible
//! for channels, deadlines and sleeping. The core has **no** Tokio types
//! and performs no IO, so the whole dance semantics are testable without a
//! runtime. Given the same catalog, session and seed, the same dance comes
//! out.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::choreo::{SelectOutcome, Selector};
use crate::engine::{CallTemporality, CoreEffect, EngineNotice, SequencedCall, StackFrameView};
use crate::model::{DanceLevel, DanceSession, Difficulty, FormationId, Module, SQUARED_SET_ID};

/// An entry in the stack of active modules.
#[derive(Debug)]
struct StackFrame {
    module: Arc<Module>,

    /// Index into the module's sequence; `None` until the module starts.
    seq_pos: Option<usize>,

    /// Message explaining how the module was selected.
    explanation: Option<String>,
}

impl StackFrame {
    fn new(module: Arc<Module>, explanation: Option<String>) -> Self {
        Self {
            module,
            seq_pos: None,
            explanation,
        }
    }

    fn view(&self) -> StackFrameView {
        StackFrameView {
            module: self.module.id.clone(),
            module_name: self.module.name.clone(),
            seq_pos: self.seq_pos,
            explanation: self.explanation.clone(),
        }
    }
}

/// Result of one core operation: outward effects in emission order, plus
/// how many beats to wait before the next tick (`None` = do not schedule).
#[derive(Debug, Clone, Default)]
pub struct CoreStep {
    pub effects: Vec<CoreEffect>,
    pub wait_beats: Option<u32>,
}

impl CoreStep {
    fn effects(effects: Vec<CoreEffect>) -> Self {
        Self {
            effects,
            wait_beats: None,
        }
    }
}

/// The choreography scheduler core.
///
/// Owns the module stack, the call temporality, the candidate selector,
/// the session criteria and the single seeded PRNG. See
/// [`EngineRuntime`](crate::engine::EngineRuntime) for the paced async
/// shell around it.
#[derive(Debug)]
pub struct Choreographer {
    catalog: Arc<Catalog>,
    session: DanceSession,
    selector: Selector,
    stack: Vec<StackFrame>,
    calls: CallTemporality,
    rng: SmallRng,

    /// Has `begin_tip` been called and not `end_tip`?
    have_active_tip: bool,

    /// Is the generator running?
    running: bool,

    /// A pause is initiated, but the call pipeline is still draining.
    pausing: bool,

    /// Practice-looping a single module, not dancing a tip.
    single_module: bool,
}

impl Choreographer {
    pub fn new(catalog: Arc<Catalog>, session: DanceSession, seed: u64) -> Self {
        Self {
            catalog,
            session,
            selector: Selector::new(),
            stack: Vec::new(),
            calls: CallTemporality::default(),
            rng: SmallRng::seed_from_u64(seed),
            have_active_tip: false,
            running: false,
            pausing: false,
            single_module: false,
        }
    }

    // ---- session criteria ----

    pub fn session(&self) -> &DanceSession {
        &self.session
    }

    /// Beats per minute at which to emit choreography.
    pub fn bpm(&self) -> f64 {
        self.session.bpm
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.session.bpm = bpm;
    }

    /// Probability driver for continuing to grow the module stack vs
    /// resolving. 0 = end ASAP, 100 = always go deeper.
    pub fn continuation_probability(&self) -> u32 {
        self.session.continuation_probability
    }

    pub fn set_continuation_probability(&mut self, value: u32) {
        self.session.continuation_probability = value;
    }

    /// Maximum dance level that may be used when selecting modules.
    pub fn max_dance_level(&self) -> DanceLevel {
        self.session.level
    }

    pub fn set_max_dance_level(&mut self, level: DanceLevel) {
        self.session.level = level;
    }

    /// Maximum difficulty level that may be used when selecting modules.
    pub fn max_difficulty(&self) -> Difficulty {
        self.session.max_difficulty
    }

    pub fn set_max_difficulty(&mut self, value: Difficulty) {
        self.session.max_difficulty = value;
    }

    /// Desired average difficulty.
    pub fn target_difficulty(&self) -> f64 {
        self.session.target_difficulty
    }

    pub fn set_target_difficulty(&mut self, value: f64) {
        self.session.target_difficulty = value;
    }

    /// Replace the whole criteria set.
    /// (Must call `activate_criteria` some time after this.)
    pub fn use_dance_session(&mut self, session: DanceSession) {
        self.session = session;
    }

    // ---- state queries ----

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn have_active_tip(&self) -> bool {
        self.have_active_tip
    }

    /// Are modules available to dance?
    pub fn have_choreography(&self) -> bool {
        self.selector.have_candidates() || (self.single_module && !self.stack.is_empty())
    }

    /// Average difficulty danced so far this tip.
    pub fn average_difficulty(&self) -> Option<f64> {
        self.selector.average_difficulty()
    }

    /// Read-only snapshot of the module stack.
    pub fn stack_view(&self) -> Vec<StackFrameView> {
        self.stack.iter().map(StackFrame::view).collect()
    }

    /// Read-only snapshot of the call temporality.
    pub fn calls(&self) -> &CallTemporality {
        &self.calls
    }

    // ---- operations ----

    /// Activate any modifications to module selection criteria by
    /// rebuilding the candidate pool. Returns how many modules were
    /// admitted. Never invoked implicitly by selection.
    pub fn activate_criteria(&mut self) -> usize {
        self.selector.activate_criteria(&self.catalog, &self.session)
    }

    /// Start a fresh tip: reset the difficulty average and per-tip usage,
    /// clear the stack and call list.
    pub fn begin_tip(&mut self) -> CoreStep {
        self.selector.begin_tip();
        self.single_module = false;
        self.calls = CallTemporality::default();
        self.stack.clear();
        self.have_active_tip = true;

        CoreStep::effects(vec![
            CoreEffect::Calls(self.calls.clone()),
            CoreEffect::Stack(Vec::new()),
        ])
    }

    /// Stop and clear the active tip.
    pub fn end_tip(&mut self) -> CoreStep {
        let mut effects = self.pause().effects;

        self.calls = CallTemporality::default();
        self.stack.clear();
        self.single_module = false;
        self.have_active_tip = false;

        effects.push(CoreEffect::Calls(self.calls.clone()));
        effects.push(CoreEffect::Stack(Vec::new()));
        CoreStep::effects(effects)
    }

    /// Practice-loop one specific module: end any running tip, begin a new
    /// one in single-module mode and push the module unstarted. Emission
    /// begins on the next `resume` or `step`.
    pub fn play_module(&mut self, module: Arc<Module>) -> CoreStep {
        let mut effects = Vec::new();
        if self.running {
            effects.extend(self.end_tip().effects);
        }
        effects.extend(self.begin_tip().effects);

        self.single_module = true;
        self.stack.push(StackFrame::new(module, None));

        CoreStep::effects(effects)
    }

    /// Look up a module by id and practice-loop it. Unknown ids are logged
    /// and ignored.
    pub fn play_module_id(&mut self, id: &str) -> CoreStep {
        match self.catalog.module(id) {
            Some(module) => {
                let module = Arc::clone(module);
                self.play_module(module)
            }
            None => {
                warn!(module = %id, "play requested for unknown module; ignoring");
                CoreStep::default()
            }
        }
    }

    /// Stop generating output immediately.
    pub fn pause(&mut self) -> CoreStep {
        self.running = false;
        self.pausing = false;
        CoreStep::effects(vec![CoreEffect::Running(false)])
    }

    /// Resume generating output.
    ///
    /// The shell schedules one beat of lead-in and then performs a `step`
    /// immediately.
    pub fn resume(&mut self) -> CoreStep {
        self.pausing = false;
        self.running = true;
        CoreStep::effects(vec![CoreEffect::Running(true)])
    }

    /// The single-tick transition: emit the next call, or drain the call
    /// pipeline while pausing.
    pub fn step(&mut self) -> CoreStep {
        let mut effects = Vec::new();

        if self.pausing {
            // Wind down: push nothing through so now/future drain out.
            self.calls.add(None);
            effects.push(CoreEffect::Calls(self.calls.clone()));

            if self.calls.now.is_none() {
                effects.extend(self.pause().effects);
            }
        } else if !self.advance(&mut effects) {
            // Selection failed; the machine paused itself and no tick may
            // be scheduled.
            return CoreStep::effects(effects);
        }

        let wait_beats = if self.running {
            Some(self.calls.now.as_ref().map(|c| c.beats).unwrap_or(1))
        } else {
            None
        };

        CoreStep { effects, wait_beats }
    }

    /// Emit the next call of the tip. Returns `false` when selection failed
    /// and the machine paused itself.
    fn advance(&mut self, effects: &mut Vec<CoreEffect>) -> bool {
        // An empty stack means we're waiting at a squared set.
        if self.stack.is_empty()
            && !self.select_and_push(SQUARED_SET_ID.to_string(), None, effects)
        {
            return false;
        }

        let Some(frame) = self.stack.last_mut() else {
            return false;
        };

        let started_new_module = frame.seq_pos.is_none();
        let pos = match frame.seq_pos {
            None => 0,
            Some(pos) => pos + 1,
        };
        frame.seq_pos = Some(pos);

        let module = Arc::clone(&frame.module);
        let Some(item) = module.sequence.get(pos) else {
            // Cannot happen: frames pop on their last call and empty
            // sequences are rejected at load.
            warn!(module = %module.name, pos, "sequence position out of range");
            return false;
        };

        let emitted = SequencedCall {
            module: module.id.clone(),
            command: item.resolve_display_text(&mut self.rng),
            beats: item.call.beats,
            concurrent_with_next: item.concurrent_with_next,
        };
        debug!(module = %module.name, pos, command = %emitted.command, "emitting call");

        self.calls.add(Some(emitted));
        effects.push(CoreEffect::Calls(self.calls.clone()));

        if started_new_module {
            self.selector.mark_used(&module.id);
            // Delayed until after the call event: the call that begins the
            // module has just been pushed into the future slot.
            effects.push(CoreEffect::Stack(self.stack_view()));
        }

        // Was that the last call in the module?
        if pos == module.sequence.len() - 1 {
            self.stack.pop();

            if self.single_module {
                // Loop the module for another practice pass, then drain.
                self.stack.push(StackFrame::new(module, None));
                self.pausing = true;
            } else if self.stack.is_empty() && module.resolves() {
                // The tip unwound at home; drain and pause.
                self.pausing = true;
            } else if !self.select_and_push(
                module.end_formation.clone(),
                Some(module.as_ref()),
                effects,
            ) {
                return false;
            }
        }

        true
    }

    /// Ask the selector for a module starting at `formation` and push it.
    /// On a content gap: surface the notice, pause, return `false`.
    fn select_and_push(
        &mut self,
        formation: FormationId,
        prev: Option<&Module>,
        effects: &mut Vec<CoreEffect>,
    ) -> bool {
        match self
            .selector
            .select_next(&formation, prev, &self.session, &mut self.rng)
        {
            SelectOutcome::Selected(selection) => {
                if selection.violates_flow_or_hands {
                    effects.push(CoreEffect::Notice(EngineNotice::FlowOrHandViolation {
                        module: selection.module.id.clone(),
                    }));
                }
                if selection.slow {
                    effects.push(CoreEffect::Notice(EngineNotice::PerformanceDegradation {
                        elapsed_ms: selection.elapsed_ms,
                    }));
                }

                self.stack
                    .push(StackFrame::new(selection.module, Some(selection.explanation)));
                true
            }
            SelectOutcome::NoCandidates => {
                let abbreviation = self
                    .catalog
                    .formation(&formation)
                    .map(|f| f.abbreviation.clone())
                    .unwrap_or_else(|| formation.clone());

                effects.push(CoreEffect::Notice(EngineNotice::ContentGap {
                    formation,
                    abbreviation,
                }));
                effects.extend(self.pause().effects);
                false
            }
        }
    }
}
