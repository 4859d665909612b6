//! The in-simulation resource ledger.
//!
//! Every resource an action can touch is declared up front in [`Resource`];
//! the ledger holds one value per variant and all of them start at zero.

use crate::core::constants::STARTING_MANA;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const NUM_RESOURCES: usize = 17;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Mana,
    Gold,
    Reputation,
    Soulstones,
    Herbs,
    Hide,
    Potions,
    Glasses,
    Supplies,
    Team,
    Armor,
    Discount,
    Adventures,
    Crafts,
    Blood,
    Pickaxe,
    Tournament,
}

impl Resource {
    pub const ALL: [Resource; NUM_RESOURCES] = [
        Resource::Mana,
        Resource::Gold,
        Resource::Reputation,
        Resource::Soulstones,
        Resource::Herbs,
        Resource::Hide,
        Resource::Potions,
        Resource::Glasses,
        Resource::Supplies,
        Resource::Team,
        Resource::Armor,
        Resource::Discount,
        Resource::Adventures,
        Resource::Crafts,
        Resource::Blood,
        Resource::Pickaxe,
        Resource::Tournament,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Mana => "mana",
            Resource::Gold => "gold",
            Resource::Reputation => "reputation",
            Resource::Soulstones => "soulstones",
            Resource::Herbs => "herbs",
            Resource::Hide => "hide",
            Resource::Potions => "potions",
            Resource::Glasses => "glasses",
            Resource::Supplies => "supplies",
            Resource::Team => "team",
            Resource::Armor => "armor",
            Resource::Discount => "discount",
            Resource::Adventures => "adventures",
            Resource::Crafts => "crafts",
            Resource::Blood => "blood",
            Resource::Pickaxe => "pickaxe",
            Resource::Tournament => "tournament",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signed quantity per [`Resource`].
///
/// Serializes as a map of the non-zero entries; missing entries deserialize
/// as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Resource, f64>", into = "BTreeMap<Resource, f64>")]
pub struct ResourceLedger {
    values: [f64; NUM_RESOURCES],
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::empty()
    }
}

impl ResourceLedger {
    /// A ledger with every resource at zero, mana included.
    pub fn empty() -> Self {
        Self {
            values: [0.0; NUM_RESOURCES],
        }
    }

    /// The ledger a fresh simulation pass starts from.
    pub fn starting() -> Self {
        let mut ledger = Self::empty();
        ledger.set(Resource::Mana, STARTING_MANA);
        ledger
    }

    pub fn get(&self, resource: Resource) -> f64 {
        self.values[resource.index()]
    }

    pub fn set(&mut self, resource: Resource, value: f64) {
        self.values[resource.index()] = value;
    }

    pub fn add(&mut self, resource: Resource, amount: f64) {
        self.values[resource.index()] += amount;
    }

    pub fn mana(&self) -> f64 {
        self.get(Resource::Mana)
    }

    /// Resources with a non-zero value, in declaration order.
    pub fn non_zero(&self) -> impl Iterator<Item = (Resource, f64)> + '_ {
        Resource::ALL
            .iter()
            .map(|r| (*r, self.get(*r)))
            .filter(|(_, v)| *v != 0.0)
    }
}

impl From<BTreeMap<Resource, f64>> for ResourceLedger {
    fn from(map: BTreeMap<Resource, f64>) -> Self {
        let mut ledger = Self::empty();
        for (resource, value) in map {
            ledger.set(resource, value);
        }
        ledger
    }
}

impl From<ResourceLedger> for BTreeMap<Resource, f64> {
    fn from(ledger: ResourceLedger) -> Self {
        ledger.non_zero().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_defaults_to_zero() {
        let ledger = ResourceLedger::empty();
        for resource in Resource::ALL {
            assert_eq!(ledger.get(resource), 0.0);
        }
    }

    #[test]
    fn test_starting_ledger_has_only_mana() {
        let ledger = ResourceLedger::starting();
        assert_eq!(ledger.mana(), 250.0);
        assert_eq!(ledger.non_zero().count(), 1);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, resource) in Resource::ALL.iter().enumerate() {
            assert_eq!(resource.index(), i);
        }
    }

    #[test]
    fn test_add_can_go_negative() {
        let mut ledger = ResourceLedger::empty();
        ledger.add(Resource::Gold, -10.0);
        assert_eq!(ledger.get(Resource::Gold), -10.0);
    }

    #[test]
    fn test_json_map_omits_zero_entries() {
        let mut ledger = ResourceLedger::empty();
        ledger.set(Resource::Gold, 12.0);
        ledger.set(Resource::Team, 2.0);
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"gold":12.0,"team":2.0}"#);

        let parsed: ResourceLedger = serde_json::from_str(r#"{"mana": 5, "herbs": 3}"#).unwrap();
        assert_eq!(parsed.mana(), 5.0);
        assert_eq!(parsed.get(Resource::Herbs), 3.0);
        assert_eq!(parsed.get(Resource::Gold), 0.0);
    }
}
