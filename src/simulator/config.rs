//! Simulation configuration.

use crate::core::constants::STARTING_MANA;
use crate::resources::{Resource, ResourceLedger};
use std::collections::BTreeMap;

/// Configuration for a simulation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Mana the pass starts with
    pub starting_mana: f64,

    /// Resources other than mana the pass starts with (a mana entry here wins)
    pub starting_resources: BTreeMap<Resource, f64>,

    /// Random seed for soulstone drops (None = expected value)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_mana: STARTING_MANA,
            starting_resources: BTreeMap::new(),
            seed: None,
        }
    }
}

impl SimConfig {
    /// Roll soulstone drops with a fixed seed so passes are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Start from a different mana pool, e.g. to check a plan after a mana boost.
    pub fn with_mana(mut self, mana: f64) -> Self {
        self.starting_mana = mana;
        self
    }

    pub fn with_resource(mut self, resource: Resource, value: f64) -> Self {
        self.starting_resources.insert(resource, value);
        self
    }

    /// The ledger a pass starts from.
    pub fn starting_ledger(&self) -> ResourceLedger {
        let mut ledger = ResourceLedger::empty();
        ledger.set(Resource::Mana, self.starting_mana);
        for (resource, value) in &self.starting_resources {
            ledger.set(*resource, *value);
        }
        ledger
    }
}
