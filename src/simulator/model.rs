//! Per-action tick and experience math.

use crate::actions::ActionDef;
use crate::character::StatExperience;
use crate::core::balance::ceil_eps;
use crate::core::constants::LEVEL_PERCENT_DIVISOR;
use crate::host::Host;

/// One catalog entry plus the tick count of its latest run.
#[derive(Debug, Clone)]
pub struct PredictionModel<'a> {
    action: &'a ActionDef,
    ticks: u64,
}

impl<'a> PredictionModel<'a> {
    pub fn new(action: &'a ActionDef) -> Self {
        Self { action, ticks: 0 }
    }

    pub fn action(&self) -> &'a ActionDef {
        self.action
    }

    /// Recomputes how many ticks one run takes with the current stats.
    ///
    /// Higher stat levels shorten the run: each weighted stat contributes
    /// `weight / (1 + level / 100)` of the mana cost.
    pub fn update_ticks(&mut self, stats: &StatExperience, host: &dyn Host) -> u64 {
        let cost = self.action.mana_cost(host);
        let weighted: f64 = self
            .action
            .stats
            .iter()
            .map(|(stat, weight)| {
                let level = host.level_from_experience(stats.get(*stat));
                weight / (1.0 + level / LEVEL_PERCENT_DIVISOR)
            })
            .sum();
        self.ticks = ceil_eps(cost * weighted).max(0.0) as u64;
        self.ticks
    }

    /// Tick count of the latest run, 0 before [`update_ticks`](Self::update_ticks).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Share of the mana cost each tick represents.
    pub fn mana_per_tick(&self, host: &dyn Host) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.action.mana_cost(host) / self.ticks as f64
    }

    /// Experience for one tick. Over a full run every stat gains
    /// `weight * exp_mult * mana_cost * bonus`.
    pub fn exp(&self, stats: &mut StatExperience, host: &dyn Host) {
        let per_tick = self.mana_per_tick(host);
        for (stat, weight) in &self.action.stats {
            let gain =
                weight * self.action.exp_mult * per_tick * host.experience_bonus_multiplier(*stat);
            stats.gain(*stat, gain);
        }
    }
}
