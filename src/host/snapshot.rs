//! A plain-data [`Host`] loaded from JSON.

use super::types::{DungeonFloor, GoldCost, GuildRank, Host};
use crate::character::{Skill, Stat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to parse host snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read host snapshot from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldCosts {
    pub locks: f64,
    pub short_quests: f64,
    pub long_quests: f64,
}

impl Default for GoldCosts {
    fn default() -> Self {
        Self {
            locks: 10.0,
            short_quests: 20.0,
            long_quests: 30.0,
        }
    }
}

/// Host inputs captured at one point in time.
///
/// Missing stats and skills read as zero, missing bonus multipliers as one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSnapshot {
    pub stat_experience: BTreeMap<Stat, f64>,
    pub experience_bonus: BTreeMap<Stat, f64>,
    pub skills: BTreeMap<Skill, f64>,
    pub craft_guild: GuildRank,
    pub adventure_guild: GuildRank,
    pub gold_costs: GoldCosts,
    pub dungeons: Vec<Vec<DungeonFloor>>,
    pub loop_totals: BTreeMap<String, u64>,
}

impl Default for HostSnapshot {
    fn default() -> Self {
        Self::fresh_game()
    }
}

impl HostSnapshot {
    /// A brand new save: no experience, no skills, both dungeons untouched.
    pub fn fresh_game() -> Self {
        let small_dungeon = vec![
            DungeonFloor {
                ss_chance: 1.0,
                completed: 0,
            };
            7
        ];
        let large_dungeon = vec![
            DungeonFloor {
                ss_chance: 1.0,
                completed: 0,
            };
            7
        ];
        Self {
            stat_experience: BTreeMap::new(),
            experience_bonus: BTreeMap::new(),
            skills: BTreeMap::new(),
            craft_guild: GuildRank::default(),
            adventure_guild: GuildRank::default(),
            gold_costs: GoldCosts::default(),
            dungeons: vec![small_dungeon, large_dungeon],
            loop_totals: BTreeMap::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let contents = fs::read_to_string(path).map_err(|source| HostError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn with_skill(mut self, skill: Skill, level: f64) -> Self {
        self.skills.insert(skill, level);
        self
    }

    pub fn with_stat_experience(mut self, stat: Stat, experience: f64) -> Self {
        self.stat_experience.insert(stat, experience);
        self
    }

    pub fn with_loop_total(mut self, action: &str, total: u64) -> Self {
        self.loop_totals.insert(action.to_string(), total);
        self
    }
}

impl Host for HostSnapshot {
    fn stat_experience(&self, stat: Stat) -> f64 {
        self.stat_experience.get(&stat).copied().unwrap_or(0.0)
    }

    fn experience_bonus_multiplier(&self, stat: Stat) -> f64 {
        self.experience_bonus
            .get(&stat)
            .copied()
            .unwrap_or(1.0)
            .max(0.0)
    }

    fn skill_level(&self, skill: Skill) -> f64 {
        self.skills.get(&skill).copied().unwrap_or(0.0)
    }

    fn craft_guild_rank(&self) -> GuildRank {
        self.craft_guild
    }

    fn adventure_guild_rank(&self) -> GuildRank {
        self.adventure_guild
    }

    fn gold_cost(&self, kind: GoldCost) -> f64 {
        match kind {
            GoldCost::Locks => self.gold_costs.locks,
            GoldCost::ShortQuests => self.gold_costs.short_quests,
            GoldCost::LongQuests => self.gold_costs.long_quests,
        }
    }

    fn dungeon_floors(&self, dungeon: usize) -> &[DungeonFloor] {
        self.dungeons
            .get(dungeon)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn loop_historical_total(&self, action: &str) -> u64 {
        self.loop_totals.get(action).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_game_defaults() {
        let host = HostSnapshot::fresh_game();
        assert_eq!(host.stat_experience(Stat::Speed), 0.0);
        assert_eq!(host.experience_bonus_multiplier(Stat::Speed), 1.0);
        assert_eq!(host.skill_level(Skill::Combat), 0.0);
        assert_eq!(host.craft_guild_rank().bonus, 1.0);
        assert_eq!(host.gold_cost(GoldCost::Locks), 10.0);
        assert_eq!(host.dungeon_floors(0).len(), 7);
        assert_eq!(host.dungeon_floors(1).len(), 7);
        assert!(host.dungeon_floors(5).is_empty());
        assert_eq!(host.loop_historical_total("Fight Monsters"), 0);
    }

    #[test]
    fn test_default_level_curve() {
        let host = HostSnapshot::fresh_game();
        assert_eq!(host.level_from_experience(0.0), 0.0);
        assert_eq!(host.level_from_experience(100.0), 1.0);
        assert_eq!(host.level_from_experience(300.0), 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let host = HostSnapshot::from_json_str(
            r#"{
                "skills": {"Combat": 12},
                "stat_experience": {"Strength": 500},
                "loop_totals": {"Heal The Sick": 4}
            }"#,
        )
        .unwrap();
        assert_eq!(host.skill_level(Skill::Combat), 12.0);
        assert_eq!(host.stat_experience(Stat::Strength), 500.0);
        assert_eq!(host.loop_historical_total("Heal The Sick"), 4);
        assert_eq!(host.gold_cost(GoldCost::LongQuests), 30.0);
        assert_eq!(host.dungeon_floors(0).len(), 7);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = HostSnapshot::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, HostError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = HostSnapshot::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, HostError::Read { .. }));
    }

    #[test]
    fn test_builders() {
        let host = HostSnapshot::fresh_game()
            .with_skill(Skill::Magic, 30.0)
            .with_stat_experience(Stat::Charisma, 250.0)
            .with_loop_total("Fight Monsters", 9);
        assert_eq!(host.skill_level(Skill::Magic), 30.0);
        assert_eq!(host.stat_experience(Stat::Charisma), 250.0);
        assert_eq!(host.loop_historical_total("Fight Monsters"), 9);
    }
}
