//! Forward simulation of planned action lists.
//!
//! Given a plan, the simulator predicts:
//! - Mana spent and left after every entry
//! - Stat experience gained along the way
//! - Loop progress and the resources loops hand out
//! - Whether the plan is reachable with the mana available
//!
//! The engine only reads the game through the [`Host`](crate::host::Host)
//! trait, so the same plan can be replayed against any snapshot.

mod config;
mod engine;
mod model;
mod plan;
mod report;
mod state;

pub use config::SimConfig;
pub use engine::{predict, SimulationEngine};
pub use model::PredictionModel;
pub use plan::{parse_plan, PlanParseError, PlannedAction};
pub use report::{Prediction, PredictionRow};
pub use state::SimState;
