use serde::{Deserialize, Serialize};

pub const NUM_STATS: usize = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stat {
    Dexterity,
    Strength,
    Constitution,
    Speed,
    Perception,
    Charisma,
    Intelligence,
    Luck,
    Soul,
}

impl Stat {
    /// All stats in display order.
    pub const ALL: [Stat; NUM_STATS] = [
        Stat::Dexterity,
        Stat::Strength,
        Stat::Constitution,
        Stat::Speed,
        Stat::Perception,
        Stat::Charisma,
        Stat::Intelligence,
        Stat::Luck,
        Stat::Soul,
    ];

    pub fn abbrev(&self) -> &'static str {
        match self {
            Stat::Dexterity => "Dex",
            Stat::Strength => "Str",
            Stat::Constitution => "Con",
            Stat::Speed => "Spd",
            Stat::Perception => "Per",
            Stat::Charisma => "Cha",
            Stat::Intelligence => "Int",
            Stat::Luck => "Luck",
            Stat::Soul => "Soul",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Stat::Dexterity => 0,
            Stat::Strength => 1,
            Stat::Constitution => 2,
            Stat::Speed => 3,
            Stat::Perception => 4,
            Stat::Charisma => 5,
            Stat::Intelligence => 6,
            Stat::Luck => 7,
            Stat::Soul => 8,
        }
    }
}

/// Accumulated experience per stat for one simulation pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct StatExperience {
    values: [f64; NUM_STATS],
}

impl StatExperience {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self.values[stat.index()]
    }

    pub fn set(&mut self, stat: Stat, experience: f64) {
        self.values[stat.index()] = experience.max(0.0);
    }

    /// Adds experience. Negative gains are ignored so the table never decreases.
    pub fn gain(&mut self, stat: Stat, amount: f64) {
        if amount > 0.0 {
            self.values[stat.index()] += amount;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::ALL.iter().map(|stat| (*stat, self.get(*stat)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_zeroed() {
        let table = StatExperience::new();
        for stat in Stat::ALL {
            assert_eq!(table.get(stat), 0.0);
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, stat) in Stat::ALL.iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
    }

    #[test]
    fn test_gain_accumulates() {
        let mut table = StatExperience::new();
        table.gain(Stat::Speed, 12.5);
        table.gain(Stat::Speed, 7.5);
        assert_eq!(table.get(Stat::Speed), 20.0);
        assert_eq!(table.get(Stat::Strength), 0.0);
    }

    #[test]
    fn test_gain_never_decreases() {
        let mut table = StatExperience::new();
        table.set(Stat::Luck, 40.0);
        table.gain(Stat::Luck, -15.0);
        assert_eq!(table.get(Stat::Luck), 40.0);
    }

    #[test]
    fn test_set_clamps_negative_to_zero() {
        let mut table = StatExperience::new();
        table.set(Stat::Soul, -3.0);
        assert_eq!(table.get(Stat::Soul), 0.0);
    }

    #[test]
    fn test_abbrev() {
        assert_eq!(Stat::Dexterity.abbrev(), "Dex");
        assert_eq!(Stat::Perception.abbrev(), "Per");
        assert_eq!(Stat::Soul.abbrev(), "Soul");
    }

    #[test]
    fn test_stat_keys_serialize_by_name() {
        let mut weights = std::collections::BTreeMap::new();
        weights.insert(Stat::Speed, 0.6);
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"Speed":0.6}"#);
    }
}
