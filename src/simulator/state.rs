use crate::character::{Stat, StatExperience};
use crate::core::Progression;
use crate::host::Host;
use crate::resources::ResourceLedger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable state of one simulation pass. Created fresh for every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub stats: StatExperience,
    pub resources: ResourceLedger,
    /// Keyed by loop action name.
    pub progress: BTreeMap<String, Progression>,
}

impl SimState {
    /// Stats seeded from the host, resources from `resources`.
    pub fn new(host: &dyn Host, resources: ResourceLedger) -> Self {
        let mut stats = StatExperience::new();
        for stat in Stat::ALL {
            stats.set(stat, host.stat_experience(stat));
        }
        Self {
            stats,
            resources,
            progress: BTreeMap::new(),
        }
    }

    pub fn progression(&self, action: &str) -> Option<&Progression> {
        self.progress.get(action)
    }
}
