//! Collaborators injected into the simulation.

pub mod snapshot;
pub mod types;

pub use snapshot::{GoldCosts, HostError, HostSnapshot};
pub use types::{DungeonFloor, GoldCost, GuildRank, Host};
