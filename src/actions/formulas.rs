//! Formula data interpreted by the simulation.
//!
//! Actions never carry code. Costs, loop progress and resource effects are
//! described with the small typed vocabulary in this module and evaluated
//! against a [`Scope`] and the current ledger.

use crate::character::{Skill, Stat, StatExperience};
use crate::core::balance::{ceil_eps, fibonacci, floor_eps, precision3};
use crate::core::constants::{
    ARMOR_COMBAT_DIVISOR, DUNGEON_SOULSTONE_BASE, LEVEL_PERCENT_DIVISOR, PYROMANCY_COMBAT_WEIGHT,
    TEAM_COMBAT_DIVISOR,
};
use crate::core::Progression;
use crate::host::{GoldCost, Host};
use crate::resources::{Resource, ResourceLedger};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Read-only context a formula is evaluated in.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub host: &'a dyn Host,
    /// Progression of the loop action being evaluated, if any.
    pub progression: Option<&'a Progression>,
    pub segments: u32,
    /// Present when soulstone drops should be rolled instead of averaged.
    pub rng: Option<&'a RefCell<ChaCha8Rng>>,
}

impl<'a> Scope<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        Self {
            host,
            progression: None,
            segments: 0,
            rng: None,
        }
    }

    pub fn with_progression(mut self, progression: &'a Progression, segments: u32) -> Self {
        self.progression = Some(progression);
        self.segments = segments;
        self
    }

    pub fn with_rng(mut self, rng: Option<&'a RefCell<ChaCha8Rng>>) -> Self {
        self.rng = rng;
        self
    }
}

// =============================================================================
// QUANTITIES & EFFECTS
// =============================================================================

/// A number computed from host queries and the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Const(f64),
    Resource(Resource),
    Skill(Skill),
    GoldCost(GoldCost),
    CraftGuildBonus,
    AdventureGuildBonus,
    SelfCombat,
    TeamCombat,
    /// Soulstones for the dungeon floor the current loop just cleared.
    DungeonSoulstones(usize),
    Sum(Vec<Quantity>),
    Product(Vec<Quantity>),
    Max(Vec<Quantity>),
}

impl Quantity {
    pub fn evaluate(&self, scope: &Scope<'_>, resources: &ResourceLedger) -> f64 {
        match self {
            Quantity::Const(value) => *value,
            Quantity::Resource(resource) => resources.get(*resource),
            Quantity::Skill(skill) => scope.host.skill_level(*skill),
            Quantity::GoldCost(kind) => scope.host.gold_cost(*kind),
            Quantity::CraftGuildBonus => scope.host.craft_guild_rank().bonus,
            Quantity::AdventureGuildBonus => scope.host.adventure_guild_rank().bonus,
            Quantity::SelfCombat => self_combat(scope.host, resources),
            Quantity::TeamCombat => team_combat(scope.host, resources),
            Quantity::DungeonSoulstones(dungeon) => dungeon_soulstones(scope, *dungeon),
            Quantity::Sum(terms) => terms.iter().map(|q| q.evaluate(scope, resources)).sum(),
            Quantity::Product(factors) => factors
                .iter()
                .map(|q| q.evaluate(scope, resources))
                .product(),
            Quantity::Max(options) => options
                .iter()
                .map(|q| q.evaluate(scope, resources))
                .reduce(f64::max)
                .unwrap_or(0.0),
        }
    }
}

/// Combat strength of the player alone.
pub fn self_combat(host: &dyn Host, resources: &ResourceLedger) -> f64 {
    let skill = host.skill_level(Skill::Combat)
        + host.skill_level(Skill::Pyromancy) * PYROMANCY_COMBAT_WEIGHT;
    let armor = resources.get(Resource::Armor) * host.craft_guild_rank().bonus;
    skill * (1.0 + armor / ARMOR_COMBAT_DIVISOR)
}

/// Combat strength contributed by hired team members.
pub fn team_combat(host: &dyn Host, resources: &ResourceLedger) -> f64 {
    resources.get(Resource::Team) * host.skill_level(Skill::Combat) / TEAM_COMBAT_DIVISOR
        * host.adventure_guild_rank().bonus
}

fn dungeon_soulstones(scope: &Scope<'_>, dungeon: usize) -> f64 {
    let Some(progression) = scope.progression else {
        return 0.0;
    };
    if scope.segments == 0 {
        return 0.0;
    }
    let loops = floor_eps(progression.completed as f64 / scope.segments as f64) as usize;
    let Some(cleared) = loops.checked_sub(1) else {
        return 0.0;
    };
    let Some(floor) = scope.host.dungeon_floors(dungeon).get(cleared) else {
        return 0.0;
    };
    let reward = DUNGEON_SOULSTONE_BASE.powi(dungeon as i32);
    match scope.rng {
        Some(rng) => {
            if rng.borrow_mut().gen::<f64>() < floor.ss_chance {
                reward
            } else {
                0.0
            }
        }
        None => floor.ss_chance * reward,
    }
}

/// One change to the ledger. Operations in an effect apply in order, so a
/// later operation sees the result of an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceOp {
    Add(Resource, Quantity),
    Subtract(Resource, Quantity),
    Set(Resource, Quantity),
}

impl ResourceOp {
    pub fn apply(&self, scope: &Scope<'_>, resources: &mut ResourceLedger) {
        match self {
            ResourceOp::Add(resource, amount) => {
                let value = amount.evaluate(scope, resources);
                resources.add(*resource, value);
            }
            ResourceOp::Subtract(resource, amount) => {
                let value = amount.evaluate(scope, resources);
                resources.add(*resource, -value);
            }
            ResourceOp::Set(resource, amount) => {
                let value = amount.evaluate(scope, resources);
                resources.set(*resource, value);
            }
        }
    }
}

/// Applies every operation of an effect in order.
pub fn apply_effect(ops: &[ResourceOp], scope: &Scope<'_>, resources: &mut ResourceLedger) {
    for op in ops {
        op.apply(scope, resources);
    }
}

// =============================================================================
// MANA COST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManaCost {
    Fixed(f64),
    /// `ceil(base / (1 + skill / 100))`
    SkillDiscounted { base: f64, skill: Skill },
}

impl ManaCost {
    pub fn evaluate(&self, host: &dyn Host) -> f64 {
        match self {
            ManaCost::Fixed(cost) => *cost,
            ManaCost::SkillDiscounted { base, skill } => {
                ceil_eps(base / (1.0 + host.skill_level(*skill) / LEVEL_PERCENT_DIVISOR))
            }
        }
    }
}

// =============================================================================
// LOOP FORMULAS
// =============================================================================

/// Cost of one segment of a loop action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopCost {
    /// `fib(offset + floor((completed + segment) / segments)) * scale`
    FibonacciPerLoop { offset: u64, scale: f64 },
    /// `fib(floor(completed + segment - completed / divisor)) * scale`
    FibonacciPerSegment { divisor: f64, scale: f64 },
    /// `precision3(base ^ floor((completed + segment) / segments)) * scale`
    GeometricPerLoop { base: f64, scale: f64 },
    /// `precision3(base ^ (completed + segment)) * scale`
    GeometricPerSegment { base: f64, scale: f64 },
}

impl LoopCost {
    pub fn segment_cost(&self, progression: &Progression, segments: u32, segment: u64) -> f64 {
        let position = progression.absolute_segment(segment) as f64;
        let per_loop = floor_eps(position / segments.max(1) as f64);
        match *self {
            LoopCost::FibonacciPerLoop { offset, scale } => {
                fibonacci(offset + per_loop as u64) * scale
            }
            LoopCost::FibonacciPerSegment { divisor, scale } => {
                let n = floor_eps(position - progression.completed as f64 / divisor).max(0.0);
                fibonacci(n as u64) * scale
            }
            LoopCost::GeometricPerLoop { base, scale } => precision3(base.powf(per_loop)) * scale,
            LoopCost::GeometricPerSegment { base, scale } => precision3(base.powf(position)) * scale,
        }
    }

    /// Rejects parameters that make segment costs non-positive or keep them
    /// from growing. A cost that never grows lets one large tick cross an
    /// unbounded number of segments.
    pub fn check(&self) -> Result<(), String> {
        let scale = match *self {
            LoopCost::FibonacciPerLoop { scale, .. } => scale,
            LoopCost::FibonacciPerSegment { divisor, scale } => {
                if !(divisor.is_finite() && divisor > 1.0) {
                    return Err(format!("divisor must be greater than 1, got {divisor}"));
                }
                scale
            }
            LoopCost::GeometricPerLoop { base, scale }
            | LoopCost::GeometricPerSegment { base, scale } => {
                if !(base.is_finite() && base > 1.0) {
                    return Err(format!("base must be greater than 1, got {base}"));
                }
                scale
            }
        };
        if !(scale.is_finite() && scale > 0.0) {
            return Err(format!("scale must be positive, got {scale}"));
        }
        Ok(())
    }
}

/// How a loop's past completions speed up its progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScaling {
    /// `sqrt(1 + total / divisor)`
    LoopTotal(f64),
    /// `sqrt(1 + floor.completed / divisor)` for the floor in progress; no
    /// progress at all once past the last floor.
    DungeonFloor { dungeon: usize, divisor: f64 },
}

/// Nominal progress a loop segment makes per full action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopTick {
    pub power: Quantity,
    pub history: HistoryScaling,
}

impl LoopTick {
    pub fn segment_progress(
        &self,
        scope: &Scope<'_>,
        resources: &ResourceLedger,
        progression: &Progression,
        stat_level: f64,
    ) -> f64 {
        let history = match self.history {
            HistoryScaling::LoopTotal(divisor) => (1.0 + progression.total as f64 / divisor).sqrt(),
            HistoryScaling::DungeonFloor { dungeon, divisor } => {
                let floor =
                    floor_eps(progression.completed as f64 / scope.segments.max(1) as f64) as usize;
                match scope.host.dungeon_floors(dungeon).get(floor) {
                    Some(floor) => (1.0 + floor.completed as f64 / divisor).sqrt(),
                    None => return 0.0,
                }
            }
        };
        self.power.evaluate(scope, resources) * (1.0 + stat_level / LEVEL_PERCENT_DIVISOR) * history
    }
}

/// Upper bound on loops per pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMax {
    Fixed(u64),
    DungeonFloors(usize),
}

impl LoopMax {
    pub fn loops(&self, host: &dyn Host) -> u64 {
        match self {
            LoopMax::Fixed(loops) => *loops,
            LoopMax::DungeonFloors(dungeon) => host.dungeon_floors(*dungeon).len() as u64,
        }
    }
}

/// Level of the stat driving `segment`.
pub fn rotating_stat_level(
    host: &dyn Host,
    stats: &StatExperience,
    loop_stats: &[Stat],
    position: u64,
) -> f64 {
    if loop_stats.is_empty() {
        return 0.0;
    }
    let stat = loop_stats[(position % loop_stats.len() as u64) as usize];
    host.level_from_experience(stats.get(stat))
}
