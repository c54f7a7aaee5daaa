// src/choreo/mod.rs

//! Module-to-module choreography logic.
//!
//! - [`compat`] holds the pure hand/flow compatibility rules.
//! - [`difficulty`] tracks the running average difficulty of a tip.
//! - [`pool`] is the criteria-filtered index of candidate modules.
//! - [`selector`] picks the next module through five relaxation passes.

pub mod compat;
pub mod difficulty;
pub mod pool;
pub mod selector;

pub use difficulty::RunningAverage;
pub use pool::CandidatePool;
pub use selector::{SelectOutcome, Selection, SelectionPass, Selector};
