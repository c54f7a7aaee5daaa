// src/choreo/pool.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::model::{DanceSession, FormationId, Module};

/// Criteria-filtered index of candidate modules, keyed by start formation.
///
/// The pool is rebuilt wholesale by [`CandidatePool::rebuild`] whenever the
/// session criteria or the loaded content change; selection never rebuilds
/// it implicitly.
#[derive(Debug, Default)]
pub struct CandidatePool {
    by_start_formation: HashMap<FormationId, Vec<Arc<Module>>>,
}

impl CandidatePool {
    /// Rebuild from the catalog under the session criteria. Returns how
    /// many modules were admitted.
    pub fn rebuild(&mut self, catalog: &Catalog, session: &DanceSession) -> usize {
        let started = Instant::now();
        self.by_start_formation.clear();

        debug!(
            enabled_collections = session.enabled_collections.len(),
            enabled_families = session.enabled_families.len(),
            max_level = %session.level,
            max_difficulty = session.max_difficulty,
            "rebuilding candidate pool"
        );

        let filter_collections = !session.enabled_collections.is_empty();
        let filter_families = !session.enabled_families.is_empty();

        let mut admitted = 0usize;
        for module in catalog.modules() {
            if filter_collections && !session.enabled_collections.contains(&module.collection) {
                continue;
            }

            if module.level > session.level {
                continue;
            }

            if module.difficulty > session.max_difficulty {
                continue;
            }

            if filter_families
                && module
                    .sequence
                    .iter()
                    .any(|item| !session.enabled_families.contains(&item.call.family))
            {
                continue;
            }

            self.by_start_formation
                .entry(module.start_formation.clone())
                .or_default()
                .push(Arc::clone(module));
            admitted += 1;
        }

        info!(
            modules = admitted,
            formations = self.by_start_formation.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "candidate pool rebuilt"
        );

        admitted
    }

    /// Candidates starting at the given formation, if an entry exists.
    pub fn candidates(&self, formation_id: &str) -> Option<&[Arc<Module>]> {
        self.by_start_formation.get(formation_id).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.by_start_formation.is_empty()
    }
}
