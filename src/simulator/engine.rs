//! Forward simulation of a planned action list.
//!
//! A pass walks the plan in order. Every entry runs its action `count` times;
//! every run spends one mana per tick, trains stats each tick, advances loop
//! progress and finally applies the action's own effect. Validity is judged
//! on the ledger recorded after each entry, so a run may dip below zero mana
//! and recover before the entry ends. The pass never touches host state:
//! everything it mutates lives in a fresh [`SimState`].

use super::config::SimConfig;
use super::model::PredictionModel;
use super::plan::PlannedAction;
use super::report::{Prediction, PredictionRow};
use super::state::SimState;
use crate::actions::formulas::{apply_effect, rotating_stat_level};
use crate::actions::{ActionCatalog, Scope};
use crate::core::Progression;
use crate::host::Host;
use crate::resources::{Resource, ResourceLedger};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

/// Runs plans against one catalog and host.
pub struct SimulationEngine<'a> {
    catalog: &'a ActionCatalog,
    host: &'a dyn Host,
    config: SimConfig,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(catalog: &'a ActionCatalog, host: &'a dyn Host) -> Self {
        Self {
            catalog,
            host,
            config: SimConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Simulates `plan` from a fresh state. Host inputs are re-read on every call.
    pub fn simulate(&self, plan: &[PlannedAction]) -> Prediction {
        let mut pass = Pass::new(self.host, &self.config);
        let mut rows = Vec::with_capacity(plan.len());
        let mut total_mana = 0u64;

        for entry in plan {
            let Some(action) = self.catalog.get(&entry.name) else {
                debug!(action = %entry.name, "skipping unknown action");
                continue;
            };

            if action.is_loop() {
                pass.progression_for(&action.name);
            }

            let mut model = PredictionModel::new(action);
            let mut mana_spent = 0u64;
            for _ in 0..entry.count {
                mana_spent += pass.run(&mut model);
            }
            total_mana += mana_spent;
            observe_mana(&mut pass.valid, &pass.state.resources, &action.name);

            let row = PredictionRow {
                action: action.name.clone(),
                count: entry.count,
                mana_spent,
                ticks: model.ticks(),
                resources: pass.state.resources.clone(),
                progression: pass.state.progression(&action.name).copied(),
                valid: pass.valid,
            };
            debug!(
                action = %row.action,
                count = row.count,
                mana_spent = row.mana_spent,
                mana_left = row.resources.mana(),
                valid = row.valid,
                "entry simulated"
            );
            rows.push(row);
        }

        info!(
            entries = rows.len(),
            total_mana,
            valid = pass.valid,
            "simulation pass complete"
        );

        Prediction {
            rows,
            total_mana,
            valid: pass.valid,
            final_state: pass.state,
        }
    }
}

/// Simulates `plan` once with `config`.
pub fn predict(
    plan: &[PlannedAction],
    catalog: &ActionCatalog,
    host: &dyn Host,
    config: &SimConfig,
) -> Prediction {
    SimulationEngine::new(catalog, host)
        .with_config(config.clone())
        .simulate(plan)
}

/// State owned by a single pass.
struct Pass<'h> {
    host: &'h dyn Host,
    state: SimState,
    rng: Option<RefCell<ChaCha8Rng>>,
    valid: bool,
}

impl<'h> Pass<'h> {
    fn new(host: &'h dyn Host, config: &SimConfig) -> Self {
        Self {
            host,
            state: SimState::new(host, config.starting_ledger()),
            rng: config
                .seed
                .map(|seed| RefCell::new(ChaCha8Rng::seed_from_u64(seed))),
            valid: true,
        }
    }

    fn progression_for(&mut self, action: &str) -> &mut Progression {
        progression_entry(&mut self.state.progress, self.host, action)
    }

    /// One run of the model's action. Returns the mana spent.
    fn run(&mut self, model: &mut PredictionModel<'_>) -> u64 {
        let action = model.action();
        let ticks = model.update_ticks(&self.state.stats, self.host);
        trace!(action = %action.name, ticks, "run");

        let mut spent = 0u64;
        for _ in 0..ticks {
            self.state.resources.add(Resource::Mana, -1.0);
            spent += 1;
            if !self.tick(model) {
                trace!(action = %action.name, spent, "run stopped early");
                break;
            }
        }

        if let Some(effect) = action.effect() {
            let scope = Scope::new(self.host).with_rng(self.rng.as_ref());
            apply_effect(effect, &scope, &mut self.state.resources);
        }
        spent
    }

    /// Returns whether the run should keep ticking.
    fn tick(&mut self, model: &PredictionModel<'_>) -> bool {
        let host = self.host;
        model.exp(&mut self.state.stats, host);

        let action = model.action();
        let Some(descriptor) = action.loop_descriptor() else {
            return true;
        };

        let segments = descriptor.segments;
        let per_loop = segments as u64;
        let max_segments = descriptor.max_segments(host);
        let mana_share = model.mana_per_tick(host);

        let SimState {
            stats,
            resources,
            progress,
        } = &mut self.state;
        let rng = self.rng.as_ref();
        let progression = progression_entry(progress, host, &action.name);
        let below_max = |progression: &Progression, segment: u64| {
            max_segments.map_or(true, |max| progression.absolute_segment(segment) < max)
        };

        let mut segment = 0u64;
        let mut running = progression.progress;
        loop {
            let cost = descriptor.cost.segment_cost(progression, segments, segment);
            if running < cost {
                break;
            }
            running -= cost;
            segment += 1;
        }

        let stat_level = rotating_stat_level(
            host,
            stats,
            &descriptor.loop_stats,
            progression.absolute_segment(segment),
        );
        let scope = Scope::new(host)
            .with_progression(progression, segments)
            .with_rng(rng);
        let gained = descriptor
            .tick
            .segment_progress(&scope, resources, progression, stat_level)
            * mana_share;
        // A non-finite gain would never let the segment walk terminate.
        let additional = if gained.is_finite() { gained } else { 0.0 };
        progression.progress += additional;
        running += additional;

        while below_max(&*progression, segment) {
            let cost = descriptor.cost.segment_cost(progression, segments, segment);
            if running < cost {
                break;
            }
            running -= cost;
            segment += 1;
            if segment >= per_loop {
                progression.complete_loop(segments);
                segment -= per_loop;
                let scope = Scope::new(host)
                    .with_progression(progression, segments)
                    .with_rng(rng);
                apply_effect(&descriptor.effect.full_loop, &scope, resources);
                trace!(
                    action = %action.name,
                    total = progression.total,
                    completed = progression.completed,
                    "loop completed"
                );
            }
            let scope = Scope::new(host)
                .with_progression(progression, segments)
                .with_rng(rng);
            apply_effect(&descriptor.effect.segment, &scope, resources);
        }

        additional != 0.0 && below_max(&*progression, segment)
    }
}

/// The progression record for `action`, seeding it from the host's history
/// the first time the action is referenced in a pass.
fn progression_entry<'p>(
    progress: &'p mut BTreeMap<String, Progression>,
    host: &dyn Host,
    action: &str,
) -> &'p mut Progression {
    progress
        .entry(action.to_string())
        .or_insert_with(|| Progression::seeded(host.loop_historical_total(action)))
}

/// Latches `valid` to false the first time an entry ends with negative mana.
fn observe_mana(valid: &mut bool, resources: &ResourceLedger, action: &str) {
    if *valid && resources.mana() < 0.0 {
        *valid = false;
        warn!(
            action,
            mana = resources.mana(),
            "plan runs out of mana; later entries are not reachable"
        );
    }
}
