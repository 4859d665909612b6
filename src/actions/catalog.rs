use super::formulas::{LoopCost, LoopMax, LoopTick, ManaCost, ResourceOp};
use super::types::{ActionDef, ActionKind, LoopDescriptor, LoopEffects};
use crate::character::Stat;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BUILTIN_ACTIONS: &str = include_str!("data/builtin_actions.json");

/// Catalog file format understood by this build.
pub const CATALOG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse action catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(
        "unsupported action catalog version {found} (expected {expected})",
        expected = CATALOG_VERSION
    )]
    UnsupportedVersion { found: u32 },
    #[error("failed to read action catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("action with an empty name")]
    EmptyName,
    #[error("duplicate action '{name}'")]
    Duplicate { name: String },
    #[error("action '{action}' has invalid weight {weight} for {stat:?}")]
    InvalidWeight {
        action: String,
        stat: Stat,
        weight: f64,
    },
    #[error("action '{action}' has an invalid mana cost")]
    InvalidManaCost { action: String },
    #[error("action '{action}' declares segments but no loop")]
    MissingLoop { action: String },
    #[error("loop action '{action}' is missing its {formula} formula")]
    MissingLoopFormula {
        action: String,
        formula: &'static str,
    },
    #[error("loop action '{action}' needs a positive segment count")]
    InvalidSegments { action: String },
    #[error("loop action '{action}' has no loop stats")]
    EmptyLoopStats { action: String },
    #[error("loop action '{action}' cannot also carry a top-level effect")]
    EffectOnLoop { action: String },
    #[error("loop action '{action}' has an invalid cost formula: {reason}")]
    InvalidCostFormula { action: String, reason: String },
}

fn current_version() -> u32 {
    CATALOG_VERSION
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default = "current_version")]
    version: u32,
    actions: Vec<ActionSpec>,
}

/// An action as written in a catalog file, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    pub name: String,
    #[serde(default)]
    pub stats: BTreeMap<Stat, f64>,
    #[serde(default = "default_exp_mult")]
    pub exp_mult: f64,
    pub mana_cost: ManaCost,
    pub segments: Option<u32>,
    pub effect: Option<Vec<ResourceOp>>,
    #[serde(rename = "loop")]
    pub loop_spec: Option<LoopSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoopSpec {
    #[serde(default)]
    pub loop_stats: Vec<Stat>,
    pub cost: Option<LoopCost>,
    pub tick: Option<LoopTick>,
    pub max: Option<LoopMax>,
    #[serde(default)]
    pub effect: LoopEffects,
}

fn default_exp_mult() -> f64 {
    1.0
}

impl ActionSpec {
    /// Validates the entry into the tagged form the engine runs.
    pub fn into_action(self) -> Result<ActionDef, CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        for (stat, weight) in &self.stats {
            if !(weight.is_finite() && *weight >= 0.0) {
                return Err(CatalogError::InvalidWeight {
                    action: self.name.clone(),
                    stat: *stat,
                    weight: *weight,
                });
            }
        }
        let cost_ok = match &self.mana_cost {
            ManaCost::Fixed(cost) => cost.is_finite() && *cost >= 0.0,
            ManaCost::SkillDiscounted { base, .. } => base.is_finite() && *base >= 0.0,
        };
        if !cost_ok || !self.exp_mult.is_finite() {
            return Err(CatalogError::InvalidManaCost { action: self.name });
        }

        let kind = match (self.segments, self.effect, self.loop_spec) {
            (_, Some(_), Some(_)) => {
                return Err(CatalogError::EffectOnLoop { action: self.name });
            }
            (Some(_), _, None) => return Err(CatalogError::MissingLoop { action: self.name }),
            (None, _, Some(_)) | (Some(0), _, Some(_)) => {
                return Err(CatalogError::InvalidSegments { action: self.name });
            }
            (Some(segments), None, Some(spec)) => {
                ActionKind::Loop(spec.into_descriptor(&self.name, segments)?)
            }
            (None, Some(effect), None) => ActionKind::ResourceEffect(effect),
            (None, None, None) => ActionKind::Simple,
        };

        Ok(ActionDef {
            name: self.name,
            stats: self.stats,
            exp_mult: self.exp_mult,
            mana_cost: self.mana_cost,
            kind,
        })
    }
}

impl LoopSpec {
    fn into_descriptor(self, action: &str, segments: u32) -> Result<LoopDescriptor, CatalogError> {
        let cost = self.cost.ok_or_else(|| CatalogError::MissingLoopFormula {
            action: action.to_string(),
            formula: "cost",
        })?;
        let tick = self.tick.ok_or_else(|| CatalogError::MissingLoopFormula {
            action: action.to_string(),
            formula: "tick",
        })?;
        if self.loop_stats.is_empty() {
            return Err(CatalogError::EmptyLoopStats {
                action: action.to_string(),
            });
        }
        cost.check()
            .map_err(|reason| CatalogError::InvalidCostFormula {
                action: action.to_string(),
                reason,
            })?;
        Ok(LoopDescriptor {
            segments,
            loop_stats: self.loop_stats,
            cost,
            tick,
            max: self.max,
            effect: self.effect,
        })
    }
}

/// Validated, name-indexed set of actions.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<ActionDef>,
    index: HashMap<String, usize>,
}

impl ActionCatalog {
    /// The actions shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Self::from_json_str(BUILTIN_ACTIONS)?;
        tracing::info!(actions = catalog.len(), "loaded builtin action catalog");
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        if file.version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: file.version,
            });
        }
        Self::from_specs(file.actions)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!(actions = catalog.len(), path = ?path, "loaded action catalog");
        Ok(catalog)
    }

    pub fn from_specs(specs: impl IntoIterator<Item = ActionSpec>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for spec in specs {
            catalog.insert(spec.into_action()?)?;
        }
        Ok(catalog)
    }

    fn insert(&mut self, action: ActionDef) -> Result<(), CatalogError> {
        if self.index.contains_key(&action.name) {
            return Err(CatalogError::Duplicate { name: action.name });
        }
        self.index.insert(action.name.clone(), self.actions.len());
        self.actions.push(action);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ActionDef> {
        self.index.get(name).map(|&i| &self.actions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionDef> {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::formulas::Quantity;
    use crate::resources::Resource;

    fn catalog_json(actions: &str) -> String {
        format!(r#"{{"version": 1, "actions": [{actions}]}}"#)
    }

    const LOOP_BODY: &str = r#"
        "loop_stats": ["Strength"],
        "cost": {"fibonacci_per_loop": {"offset": 2, "scale": 5000}},
        "tick": {"power": {"skill": "Magic"}, "history": {"loop_total": 100}}
    "#;

    #[test]
    fn test_builtin_catalog_validates() {
        let catalog = ActionCatalog::builtin().unwrap();
        assert!(catalog.len() >= 40);
        assert!(catalog.contains("Wander"));
        assert!(catalog.get("Heal The Sick").unwrap().is_loop());
        assert_eq!(catalog.get("Small Dungeon").unwrap().segments(), Some(7));
        assert!(catalog.get("Buy Mana").unwrap().effect().is_some());
        assert_eq!(catalog.get("Meet People").unwrap().kind, ActionKind::Simple);
    }

    #[test]
    fn test_catalog_keeps_file_order() {
        let catalog = ActionCatalog::builtin().unwrap();
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.name, "Wander");
    }

    #[test]
    fn test_simple_and_effect_kinds() {
        let json = catalog_json(
            r#"
            {"name": "Meditate", "stats": {"Soul": 1.0}, "mana_cost": 100},
            {"name": "Buy Mana", "stats": {"Charisma": 0.7}, "mana_cost": 100,
             "effect": [{"add": ["mana", {"product": [{"resource": "gold"}, {"const": 50}]}]},
                        {"set": ["gold", {"const": 0}]}]}
            "#,
        );
        let catalog = ActionCatalog::from_json_str(&json).unwrap();
        assert_eq!(catalog.get("Meditate").unwrap().kind, ActionKind::Simple);
        assert_eq!(catalog.get("Meditate").unwrap().exp_mult, 1.0);
        let effect = catalog.get("Buy Mana").unwrap().effect().unwrap();
        assert_eq!(
            effect[1],
            ResourceOp::Set(Resource::Gold, Quantity::Const(0.0))
        );
    }

    #[test]
    fn test_segments_without_loop_is_rejected() {
        let json = catalog_json(r#"{"name": "Broken", "mana_cost": 100, "segments": 3}"#);
        let err = ActionCatalog::from_json_str(&json).unwrap_err();
        assert!(matches!(err, CatalogError::MissingLoop { ref action } if action == "Broken"));
    }

    #[test]
    fn test_loop_without_cost_is_rejected() {
        let json = catalog_json(
            r#"{"name": "Broken", "mana_cost": 100, "segments": 3,
                "loop": {"loop_stats": ["Strength"],
                         "tick": {"power": {"const": 1}, "history": {"loop_total": 100}}}}"#,
        );
        let err = ActionCatalog::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingLoopFormula { formula: "cost", .. }
        ));
    }

    #[test]
    fn test_loop_without_tick_is_rejected() {
        let json = catalog_json(
            r#"{"name": "Broken", "mana_cost": 100, "segments": 3,
                "loop": {"loop_stats": ["Strength"],
                         "cost": {"geometric_per_segment": {"base": 1.2, "scale": 100}}}}"#,
        );
        let err = ActionCatalog::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingLoopFormula { formula: "tick", .. }
        ));
    }

    #[test]
    fn test_loop_segment_count_checks() {
        let no_segments = catalog_json(&format!(
            r#"{{"name": "Broken", "mana_cost": 100, "loop": {{{LOOP_BODY}}}}}"#
        ));
        assert!(matches!(
            ActionCatalog::from_json_str(&no_segments).unwrap_err(),
            CatalogError::InvalidSegments { .. }
        ));

        let zero_segments = catalog_json(&format!(
            r#"{{"name": "Broken", "mana_cost": 100, "segments": 0, "loop": {{{LOOP_BODY}}}}}"#
        ));
        assert!(matches!(
            ActionCatalog::from_json_str(&zero_segments).unwrap_err(),
            CatalogError::InvalidSegments { .. }
        ));
    }

    #[test]
    fn test_loop_with_top_level_effect_is_rejected() {
        let json = catalog_json(&format!(
            r#"{{"name": "Broken", "mana_cost": 100, "segments": 3,
                "effect": [{{"add": ["gold", {{"const": 1}}]}}],
                "loop": {{{LOOP_BODY}}}}}"#
        ));
        assert!(matches!(
            ActionCatalog::from_json_str(&json).unwrap_err(),
            CatalogError::EffectOnLoop { .. }
        ));
    }

    #[test]
    fn test_loop_without_stats_is_rejected() {
        let json = catalog_json(
            r#"{"name": "Broken", "mana_cost": 100, "segments": 3,
                "loop": {"cost": {"fibonacci_per_loop": {"offset": 2, "scale": 5000}},
                         "tick": {"power": {"const": 1}, "history": {"loop_total": 100}}}}"#,
        );
        assert!(matches!(
            ActionCatalog::from_json_str(&json).unwrap_err(),
            CatalogError::EmptyLoopStats { .. }
        ));
    }

    #[test]
    fn test_shrinking_cost_is_rejected() {
        let json = catalog_json(
            r#"{"name": "Broken", "mana_cost": 100, "segments": 3,
                "loop": {"loop_stats": ["Strength"],
                         "cost": {"geometric_per_loop": {"base": 0.5, "scale": 5000}},
                         "tick": {"power": {"const": 1}, "history": {"loop_total": 100}}}}"#,
        );
        assert!(matches!(
            ActionCatalog::from_json_str(&json).unwrap_err(),
            CatalogError::InvalidCostFormula { .. }
        ));
    }

    #[test]
    fn test_catalog_version_is_checked() {
        let future = r#"{"version": 2, "actions": [{"name": "Wander", "mana_cost": 250}]}"#;
        assert!(matches!(
            ActionCatalog::from_json_str(future).unwrap_err(),
            CatalogError::UnsupportedVersion { found: 2 }
        ));

        let unversioned = r#"{"actions": [{"name": "Wander", "mana_cost": 250}]}"#;
        assert_eq!(ActionCatalog::from_json_str(unversioned).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_and_invalid_entries() {
        let duplicate = catalog_json(
            r#"{"name": "Wander", "mana_cost": 250}, {"name": "Wander", "mana_cost": 250}"#,
        );
        assert!(matches!(
            ActionCatalog::from_json_str(&duplicate).unwrap_err(),
            CatalogError::Duplicate { ref name } if name == "Wander"
        ));

        let negative_weight =
            catalog_json(r#"{"name": "Odd", "stats": {"Luck": -1}, "mana_cost": 250}"#);
        assert!(matches!(
            ActionCatalog::from_json_str(&negative_weight).unwrap_err(),
            CatalogError::InvalidWeight {
                stat: Stat::Luck,
                ..
            }
        ));

        let empty_name = catalog_json(r#"{"name": "  ", "mana_cost": 250}"#);
        assert!(matches!(
            ActionCatalog::from_json_str(&empty_name).unwrap_err(),
            CatalogError::EmptyName
        ));

        let negative_cost = catalog_json(r#"{"name": "Odd", "mana_cost": -5}"#);
        assert!(matches!(
            ActionCatalog::from_json_str(&negative_cost).unwrap_err(),
            CatalogError::InvalidManaCost { .. }
        ));
    }

    #[test]
    fn test_unknown_fields_and_bad_json_are_parse_errors() {
        let typo = catalog_json(r#"{"name": "Wander", "mana_cost": 250, "segmnts": 3}"#);
        assert!(matches!(
            ActionCatalog::from_json_str(&typo).unwrap_err(),
            CatalogError::Parse(_)
        ));
        assert!(matches!(
            ActionCatalog::from_json_str("[").unwrap_err(),
            CatalogError::Parse(_)
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = ActionCatalog::from_file(Path::new("/no/such/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
