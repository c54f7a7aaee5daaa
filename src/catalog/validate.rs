// src/catalog/validate.rs

//! Cross-reference validation and linking of collection files.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{Catalog, CollectionSummary};
use crate::errors::{PatterError, Result};
use crate::model::{CollectionFile, Module, ModuleSpec, SQUARED_SET_ID, SequencedItem};

/// Link a set of collection files into a [`Catalog`].
pub(crate) fn link_collections(collections: Vec<CollectionFile>) -> Result<Catalog> {
    let mut catalog = Catalog::default();

    // First pass: index formations, families and calls, so module sequences
    // can be linked against the full set regardless of load order.
    for collection in &collections {
        for formation in &collection.formations {
            insert_unique(
                &mut catalog.formations,
                formation.id.clone(),
                Arc::new(formation.clone()),
                "formation",
            )?;
        }

        for family in &collection.families {
            insert_unique(
                &mut catalog.families,
                family.id.clone(),
                Arc::new(family.clone()),
                "family",
            )?;
        }

        for call in &collection.calls {
            insert_unique(
                &mut catalog.calls,
                call.id.clone(),
                Arc::new(call.clone()),
                "call",
            )?;
        }
    }

    // Family references need the complete index.
    for call in catalog.calls.values() {
        if !catalog.families.contains_key(&call.family) {
            return Err(PatterError::UnknownFamily(format!(
                "call '{}' references family '{}'",
                call.id, call.family
            )));
        }
    }

    // Second pass: link modules.
    for collection in &collections {
        for spec in &collection.modules {
            let module = link_module(&catalog, spec, &collection.id)?;
            let id = module.id.clone();
            insert_unique(&mut catalog.modules, id.clone(), Arc::new(module), "module")?;
            catalog.module_order.push(id);
        }

        catalog.collections.push(CollectionSummary {
            id: collection.id.clone(),
            name: collection.name.clone(),
            formations: collection.formations.len(),
            families: collection.families.len(),
            calls: collection.calls.len(),
            modules: collection.modules.len(),
        });
    }

    if !catalog.formations.contains_key(SQUARED_SET_ID) {
        warn!(
            "no squared-set formation (id '{}') in the loaded collections; tips cannot start",
            SQUARED_SET_ID
        );
    }

    debug!(
        formations = catalog.formations.len(),
        families = catalog.families.len(),
        calls = catalog.calls.len(),
        modules = catalog.module_order.len(),
        "linked collections into catalog"
    );

    Ok(catalog)
}

fn insert_unique<T>(
    map: &mut HashMap<String, T>,
    id: String,
    value: T,
    kind: &str,
) -> Result<()> {
    if map.insert(id.clone(), value).is_some() {
        return Err(PatterError::CollectionError(format!(
            "duplicate {kind} id '{id}'"
        )));
    }
    Ok(())
}

fn link_module(catalog: &Catalog, spec: &ModuleSpec, collection: &str) -> Result<Module> {
    for formation_id in [&spec.start_formation, &spec.end_formation] {
        if !catalog.formations.contains_key(formation_id.as_str()) {
            return Err(PatterError::UnknownFormation(format!(
                "module '{}' references formation '{}'",
                spec.id, formation_id
            )));
        }
    }

    if spec.sequence.is_empty() {
        return Err(PatterError::CollectionError(format!(
            "module '{}' has an empty sequence",
            spec.id
        )));
    }

    let mut sequence = Vec::with_capacity(spec.sequence.len());
    for item in &spec.sequence {
        let call = catalog.calls.get(&item.call).ok_or_else(|| {
            PatterError::UnknownCall(format!(
                "module '{}' references call '{}'",
                spec.id, item.call
            ))
        })?;

        sequence.push(SequencedItem {
            call: Arc::clone(call),
            alt_command: item.alt_command.clone(),
            concurrent_with_next: item.concurrent_with_next,
        });
    }

    Ok(Module {
        id: spec.id.clone(),
        name: spec.name.clone(),
        level: spec.level,
        start_formation: spec.start_formation.clone(),
        end_formation: spec.end_formation.clone(),
        start_hand_belle: spec.start_hand_belle,
        start_hand_beau: spec.start_hand_beau,
        end_hand_belle: spec.end_hand_belle,
        end_hand_beau: spec.end_hand_beau,
        start_flow_belle: spec.start_flow_belle,
        start_flow_beau: spec.start_flow_beau,
        end_flow_belle: spec.end_flow_belle,
        end_flow_beau: spec.end_flow_beau,
        difficulty: spec.difficulty,
        sequence,
        notes: spec.notes.clone(),
        collection: collection.to_string(),
    })
}
