//! Read-only queries the simulation makes against the running game.

use crate::character::{Skill, Stat};
use crate::core::balance;
use serde::{Deserialize, Serialize};

/// Guild standing; only the bonus multiplier matters to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuildRank {
    pub bonus: f64,
}

impl Default for GuildRank {
    fn default() -> Self {
        Self { bonus: 1.0 }
    }
}

/// Gold rewards that scale with the host's progress in a town.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldCost {
    Locks,
    ShortQuests,
    LongQuests,
}

/// One floor of a dungeon table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DungeonFloor {
    /// Chance of a soulstone dropping when the floor is cleared.
    pub ss_chance: f64,
    /// Times the floor has been cleared across all loops.
    pub completed: u64,
}

/// Everything the simulation needs from the game it is predicting.
///
/// Implementations must answer consistently for the duration of a pass; the
/// engine never mutates host state.
pub trait Host {
    /// Experience a stat has when the pass starts.
    fn stat_experience(&self, stat: Stat) -> f64;

    fn level_from_experience(&self, experience: f64) -> f64 {
        balance::level_from_experience(experience)
    }

    /// Multiplier applied to all experience earned for `stat` (talents, soulstones).
    fn experience_bonus_multiplier(&self, stat: Stat) -> f64;

    fn skill_level(&self, skill: Skill) -> f64;

    fn craft_guild_rank(&self) -> GuildRank;

    fn adventure_guild_rank(&self) -> GuildRank;

    fn gold_cost(&self, kind: GoldCost) -> f64;

    /// Floors of dungeon `dungeon`; empty when the dungeon is unknown.
    fn dungeon_floors(&self, dungeon: usize) -> &[DungeonFloor];

    /// Loops of `action` completed before this pass. Read once per action per pass.
    fn loop_historical_total(&self, action: &str) -> u64;
}
