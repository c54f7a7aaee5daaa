#![allow(dead_code)]

use patter::catalog::Catalog;
use patter::model::{
    Call, CollectionFile, DanceLevel, Difficulty, Family, FlowDirection, Formation, Hand,
    ModuleSpec, SQUARED_SET_ID, SequencedItemSpec,
};

/// Builder for a `CollectionFile` to simplify test setup.
pub struct CollectionBuilder {
    collection: CollectionFile,
}

impl CollectionBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            collection: CollectionFile {
                id: id.to_string(),
                name: format!("Collection {id}"),
                author: None,
                description: None,
                difficulty: 1,
                level: DanceLevel::NO,
                formations: Vec::new(),
                families: Vec::new(),
                calls: Vec::new(),
                modules: Vec::new(),
                license: None,
            },
        }
    }

    pub fn formation(mut self, id: &str, abbreviation: &str, name: &str) -> Self {
        self.collection.formations.push(Formation {
            id: id.to_string(),
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            level: DanceLevel::NO,
        });
        self
    }

    /// The squared-set home formation most tests need.
    pub fn squared_set(self) -> Self {
        self.formation(SQUARED_SET_ID, "SS", "Squared Set")
    }

    pub fn family(mut self, id: &str, name: &str) -> Self {
        self.collection.families.push(Family {
            id: id.to_string(),
            name: name.to_string(),
            level: DanceLevel::NO,
        });
        self
    }

    pub fn call(mut self, id: &str, command: &str, beats: u32, family: &str) -> Self {
        self.collection.calls.push(Call {
            id: id.to_string(),
            command: command.to_string(),
            beats,
            family: family.to_string(),
        });
        self
    }

    pub fn module(mut self, module: ModuleSpec) -> Self {
        self.collection.modules.push(module);
        self
    }

    pub fn build(self) -> CollectionFile {
        self.collection
    }

    /// Link this single collection into a catalog.
    pub fn build_catalog(self) -> Catalog {
        Catalog::from_collections(vec![self.collection])
            .expect("Failed to build valid catalog from builder")
    }
}

/// Builder for a `ModuleSpec`.
pub struct ModuleBuilder {
    module: ModuleSpec,
}

impl ModuleBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            module: ModuleSpec {
                id: id.to_string(),
                name: name.to_string(),
                level: DanceLevel::NO,
                start_formation: SQUARED_SET_ID.to_string(),
                end_formation: SQUARED_SET_ID.to_string(),
                start_hand_belle: Hand::Any,
                start_hand_beau: Hand::Any,
                end_hand_belle: Hand::Any,
                end_hand_beau: Hand::Any,
                start_flow_belle: FlowDirection::Forward,
                start_flow_beau: FlowDirection::Forward,
                end_flow_belle: FlowDirection::None,
                end_flow_beau: FlowDirection::None,
                difficulty: 1,
                sequence: Vec::new(),
                notes: None,
            },
        }
    }

    pub fn from_formation(mut self, id: &str) -> Self {
        self.module.start_formation = id.to_string();
        self
    }

    pub fn to_formation(mut self, id: &str) -> Self {
        self.module.end_formation = id.to_string();
        self
    }

    pub fn level(mut self, level: DanceLevel) -> Self {
        self.module.level = level;
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.module.difficulty = difficulty;
        self
    }

    pub fn call(mut self, call_id: &str) -> Self {
        self.module.sequence.push(SequencedItemSpec {
            call: call_id.to_string(),
            alt_command: None,
            concurrent_with_next: false,
        });
        self
    }

    pub fn alt_call(mut self, call_id: &str, alt_command: &str) -> Self {
        self.module.sequence.push(SequencedItemSpec {
            call: call_id.to_string(),
            alt_command: Some(alt_command.to_string()),
            concurrent_with_next: false,
        });
        self
    }

    pub fn concurrent_call(mut self, call_id: &str) -> Self {
        self.module.sequence.push(SequencedItemSpec {
            call: call_id.to_string(),
            alt_command: None,
            concurrent_with_next: true,
        });
        self
    }

    pub fn start_hands(mut self, belle: Hand, beau: Hand) -> Self {
        self.module.start_hand_belle = belle;
        self.module.start_hand_beau = beau;
        self
    }

    pub fn end_hands(mut self, belle: Hand, beau: Hand) -> Self {
        self.module.end_hand_belle = belle;
        self.module.end_hand_beau = beau;
        self
    }

    pub fn start_flows(mut self, belle: FlowDirection, beau: FlowDirection) -> Self {
        self.module.start_flow_belle = belle;
        self.module.start_flow_beau = beau;
        self
    }

    pub fn end_flows(mut self, belle: FlowDirection, beau: FlowDirection) -> Self {
        self.module.end_flow_belle = belle;
        self.module.end_flow_beau = beau;
        self
    }

    pub fn build(self) -> ModuleSpec {
        self.module
    }
}
