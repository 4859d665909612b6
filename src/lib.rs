//! Loop Predictor - forward simulation for idle loop games
//!
//! This crate predicts what a planned list of actions does to mana, resources,
//! stat experience and loop progress, without touching the running game.

pub mod actions;
pub mod build_info;
pub mod character;
pub mod core;
pub mod host;
pub mod resources;
pub mod simulator;

pub use actions::{ActionCatalog, CatalogError};
pub use host::{Host, HostSnapshot};
pub use simulator::{predict, Prediction, PlannedAction, SimConfig, SimulationEngine};
