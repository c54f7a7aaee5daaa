// src/choreo/selector.rs

//! Five-pass candidate selection.
//!
//! Given the current formation and the module just danced, the selector
//! shuffles the eligible candidates once and then walks five strictly
//! additive relaxation passes over them, returning the first survivor:
//!
//! 1. Perfect match: resolution intent, difficulty steering, no repeats,
//!    hand/flow compatibility.
//! 2. Near match: drop the resolution intent.
//! 3. Difficulty drifted: also drop the difficulty steering.
//! 4. Previously used: also drop the no-repeats filter. Skipped entirely
//!    when there is no previous module.
//! 5. Last resort: take anything. With a previous module present this
//!    means bad flow or hand use, which is surfaced as a warning.
//!
//! Because pass 5 accepts unconditionally, selection is total for any
//! non-empty candidate list; only a missing or empty pool entry fails.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::choreo::compat;
use crate::choreo::difficulty::RunningAverage;
use crate::choreo::pool::CandidatePool;
use crate::model::{DanceSession, Module, ModuleId};

/// How much the selection had to relax before a candidate survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SelectionPass {
    /// Resolution intent, difficulty, repetition and hand/flow all matched.
    PerfectMatch,
    /// Resolution intent dropped.
    NearMatch,
    /// Difficulty steering dropped.
    DifficultyDrifted,
    /// Already danced this tip.
    PreviouslyUsed,
    /// Nothing acceptable remained; hand/flow may be violated.
    LastResort,
}

impl SelectionPass {
    /// 1-based pass number, for explanations and logs.
    pub fn number(self) -> u8 {
        match self {
            SelectionPass::PerfectMatch => 1,
            SelectionPass::NearMatch => 2,
            SelectionPass::DifficultyDrifted => 3,
            SelectionPass::PreviouslyUsed => 4,
            SelectionPass::LastResort => 5,
        }
    }

    /// Short human description used in selection explanations.
    pub fn label(self) -> &'static str {
        match self {
            SelectionPass::PerfectMatch => "Perfect match.",
            SelectionPass::NearMatch => "Near match.",
            SelectionPass::DifficultyDrifted => "Difficulty drifted.",
            SelectionPass::PreviouslyUsed => "Previously used.",
            SelectionPass::LastResort => "Bad flow or hand use.",
        }
    }
}

/// A successful selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub module: Arc<Module>,

    /// Human-readable account of how the module was found.
    pub explanation: String,

    /// Which relaxation pass accepted the module.
    pub pass: SelectionPass,

    /// Search time in milliseconds.
    pub elapsed_ms: u64,

    /// Pass 5 was reached even though a previous module constrained hands
    /// and flow.
    pub violates_flow_or_hands: bool,

    /// The search overran the soft budget of half a beat interval.
    pub slow: bool,
}

/// Result of asking for the next module.
#[derive(Debug, Clone)]
pub enum SelectOutcome {
    Selected(Selection),
    /// No candidate starts at the required formation: a content gap the
    /// caller must surface to the user, not an error.
    NoCandidates,
}

/// Stateful candidate selector: owns the pool, the used-this-tip set and
/// the running difficulty average. The PRNG stays with the engine and is
/// passed in per call.
#[derive(Debug, Default)]
pub struct Selector {
    pool: CandidatePool,
    used_this_tip: HashSet<ModuleId>,
    avg_difficulty: RunningAverage,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the candidate pool under the session criteria and forget
    /// per-tip usage. Returns how many modules were admitted.
    pub fn activate_criteria(&mut self, catalog: &Catalog, session: &DanceSession) -> usize {
        self.used_this_tip.clear();
        self.pool.rebuild(catalog, session)
    }

    /// Reset per-tip state (difficulty average, usage flags).
    pub fn begin_tip(&mut self) {
        self.avg_difficulty.reset();
        self.used_this_tip.clear();
    }

    /// Mark a module as danced this tip.
    pub fn mark_used(&mut self, id: &str) {
        self.used_this_tip.insert(id.to_string());
    }

    /// Does the pool hold any candidates at all?
    pub fn have_candidates(&self) -> bool {
        !self.pool.is_empty()
    }

    /// Average difficulty danced so far this tip.
    pub fn average_difficulty(&self) -> Option<f64> {
        self.avg_difficulty.current()
    }

    /// Search for the next module to dance from `formation_id`, flowing out
    /// of `prev` when present.
    pub fn select_next(
        &mut self,
        formation_id: &str,
        prev: Option<&Module>,
        session: &DanceSession,
        rng: &mut SmallRng,
    ) -> SelectOutcome {
        let started = Instant::now();

        // One weighted coin flip decides whether this module should resolve
        // the square back home or keep the tip going.
        let draw: u32 = rng.random_range(0..=100);
        let do_resolve = draw > session.continuation_probability;
        debug!(
            continuation_probability = session.continuation_probability,
            resolve = do_resolve,
            "drew resolution intent"
        );

        let candidates = match self.pool.candidates(formation_id) {
            Some(list) if !list.is_empty() => list,
            _ => {
                warn!(formation = %formation_id, "no module starts from this formation");
                return SelectOutcome::NoCandidates;
            }
        };

        // Shuffle a copy so that every pass walks the same random order.
        let mut shuffled: Vec<Arc<Module>> = candidates.to_vec();
        shuffled.shuffle(rng);

        let target = session.effective_target_difficulty();
        let current_avg = self.avg_difficulty.current();

        const RELAXATIONS: [SelectionPass; 4] = [
            SelectionPass::PerfectMatch,
            SelectionPass::NearMatch,
            SelectionPass::DifficultyDrifted,
            SelectionPass::PreviouslyUsed,
        ];

        let (module, pass) = 'search: {
            for pass in RELAXATIONS {
                // With no previous module the hand/flow filter is vacuous,
                // so this pass cannot accept anything pass 3 did not.
                if pass == SelectionPass::PreviouslyUsed && prev.is_none() {
                    continue;
                }

                for module in &shuffled {
                    if self.accepts(module, pass, do_resolve, current_avg, target, prev) {
                        break 'search (Arc::clone(module), pass);
                    }
                }
            }

            // Pass 5 accepts the first remaining candidate unconditionally.
            (Arc::clone(&shuffled[0]), SelectionPass::LastResort)
        };

        let mut violates_flow_or_hands = false;
        if pass == SelectionPass::LastResort {
            if let Some(prev) = prev {
                violates_flow_or_hands = true;
                warn!(
                    formation = %formation_id,
                    beau_hand = %prev.end_hand_beau,
                    beau_flow = %prev.end_flow_beau,
                    belle_hand = %prev.end_hand_belle,
                    belle_flow = %prev.end_flow_belle,
                    "no compatible module; accepting one with bad flow or hand use"
                );
            }
        }

        self.avg_difficulty.add(f64::from(module.difficulty));

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let slow = elapsed_ms as f64 > session.beat_millis() / 2.0;

        let avg = self.avg_difficulty.current().unwrap_or(0.0);
        let explanation = format!(
            "Found module in {} ms on attempt #{}, avg difficulty {:.1}. {}",
            elapsed_ms,
            pass.number(),
            avg,
            pass.label()
        );
        info!(module = %module.name, "{}", explanation);

        SelectOutcome::Selected(Selection {
            module,
            explanation,
            pass,
            elapsed_ms,
            violates_flow_or_hands,
            slow,
        })
    }

    /// Does `module` survive the filters active in `pass`?
    fn accepts(
        &self,
        module: &Module,
        pass: SelectionPass,
        do_resolve: bool,
        current_avg: Option<f64>,
        target: f64,
        prev: Option<&Module>,
    ) -> bool {
        // Pass 1: the module's resolution must match the drawn intent.
        if pass == SelectionPass::PerfectMatch && module.resolves() != do_resolve {
            return false;
        }

        // Passes 1-2: difficulty steering.
        if pass <= SelectionPass::NearMatch
            && !self.difficulty_acceptable(f64::from(module.difficulty), current_avg, target)
        {
            return false;
        }

        // Passes 1-3: no repeats within a tip.
        if pass <= SelectionPass::DifficultyDrifted && self.used_this_tip.contains(&module.id) {
            debug!(module = %module.name, "skipping module already danced this tip");
            return false;
        }

        // Passes 1-4: hand and flow compatibility with the previous module.
        if pass <= SelectionPass::PreviouslyUsed {
            if let Some(prev) = prev {
                if !compat::transition_allows(prev, module) {
                    return false;
                }
            }
        }

        true
    }

    /// Difficulty filter for the strict passes: accepts when there is no
    /// data yet, when the module moves the average toward the target, or
    /// when the hypothetical new average lands within 0.5 of it.
    fn difficulty_acceptable(&self, difficulty: f64, current_avg: Option<f64>, target: f64) -> bool {
        let Some(current) = current_avg else {
            return true;
        };

        (current < target && difficulty >= current)
            || (current > target && difficulty <= current)
            || (self.avg_difficulty.hypothetical(difficulty) - target).abs() < 0.5
    }
}
