//! Validated action definitions.

use super::formulas::{LoopCost, LoopMax, LoopTick, ManaCost, ResourceOp};
use crate::character::Stat;
use crate::host::Host;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource effects of a loop action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopEffects {
    /// Applied once per segment boundary crossed.
    pub segment: Vec<ResourceOp>,
    /// Applied once per full loop, before that boundary's segment effect.
    #[serde(rename = "loop")]
    pub full_loop: Vec<ResourceOp>,
}

/// Everything the engine needs to drive a multi-segment action.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopDescriptor {
    pub segments: u32,
    /// Stat whose level boosts each segment, cycling by absolute segment index.
    pub loop_stats: Vec<Stat>,
    pub cost: LoopCost,
    pub tick: LoopTick,
    pub max: Option<LoopMax>,
    pub effect: LoopEffects,
}

impl LoopDescriptor {
    /// Segment index the loop may not advance past, if bounded.
    pub fn max_segments(&self, host: &dyn Host) -> Option<u64> {
        self.max
            .as_ref()
            .map(|max| max.loops(host) * self.segments as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Trains stats and costs mana, nothing else.
    Simple,
    /// Applies an effect once per completed run.
    ResourceEffect(Vec<ResourceOp>),
    Loop(LoopDescriptor),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionDef {
    pub name: String,
    /// Share of the mana cost attributed to each stat.
    pub stats: BTreeMap<Stat, f64>,
    pub exp_mult: f64,
    pub mana_cost: ManaCost,
    pub kind: ActionKind,
}

impl ActionDef {
    pub fn mana_cost(&self, host: &dyn Host) -> f64 {
        self.mana_cost.evaluate(host)
    }

    pub fn is_loop(&self) -> bool {
        matches!(self.kind, ActionKind::Loop(_))
    }

    pub fn loop_descriptor(&self) -> Option<&LoopDescriptor> {
        match &self.kind {
            ActionKind::Loop(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    pub fn segments(&self) -> Option<u32> {
        self.loop_descriptor().map(|descriptor| descriptor.segments)
    }

    /// Top-level effect applied after each run.
    pub fn effect(&self) -> Option<&[ResourceOp]> {
        match &self.kind {
            ActionKind::ResourceEffect(ops) => Some(ops),
            _ => None,
        }
    }
}
