// src/catalog/mod.rs

//! Collection loading and the module catalog.
//!
//! - [`loader`] reads collection JSON files from disk.
//! - [`validate`] links id references and rejects broken content.
//! - [`Catalog`] is the read-only, linked index the scheduler consumes.

pub mod loader;
pub mod validate;

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::model::{
    Call, CallId, CollectionFile, CollectionId, Family, FamilyId, Formation, FormationId, Module,
    ModuleId,
};

/// Read-only, linked index over every loaded collection.
///
/// The scheduler never mutates catalog data; its transient per-module state
/// (used-this-tip, substitution choices) lives in the engine.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) formations: HashMap<FormationId, Arc<Formation>>,
    pub(crate) families: HashMap<FamilyId, Arc<Family>>,
    pub(crate) calls: HashMap<CallId, Arc<Call>>,
    pub(crate) modules: HashMap<ModuleId, Arc<Module>>,
    /// Module ids in load order, for stable iteration and display.
    pub(crate) module_order: Vec<ModuleId>,
    pub(crate) collections: Vec<CollectionSummary>,
}

/// Name and content counts of one loaded collection, for diagnostics.
#[derive(Debug, Clone)]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
    pub formations: usize,
    pub families: usize,
    pub calls: usize,
    pub modules: usize,
}

impl Catalog {
    /// Link and validate a set of collection files into a catalog.
    pub fn from_collections(collections: Vec<CollectionFile>) -> Result<Self> {
        validate::link_collections(collections)
    }

    pub fn formation(&self, id: &str) -> Option<&Arc<Formation>> {
        self.formations.get(id)
    }

    pub fn family(&self, id: &str) -> Option<&Arc<Family>> {
        self.families.get(id)
    }

    pub fn call(&self, id: &str) -> Option<&Arc<Call>> {
        self.calls.get(id)
    }

    pub fn module(&self, id: &str) -> Option<&Arc<Module>> {
        self.modules.get(id)
    }

    /// Iterate all modules in load order.
    pub fn modules(&self) -> impl Iterator<Item = &Arc<Module>> {
        self.module_order.iter().filter_map(|id| self.modules.get(id))
    }

    /// All modules whose start formation is `formation_id`.
    pub fn modules_starting_at<'a>(
        &'a self,
        formation_id: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Module>> {
        self.modules().filter(move |m| m.start_formation == formation_id)
    }

    pub fn collections(&self) -> &[CollectionSummary] {
        &self.collections
    }

    pub fn module_count(&self) -> usize {
        self.module_order.len()
    }

    pub fn formation_count(&self) -> usize {
        self.formations.len()
    }
}
