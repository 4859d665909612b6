//! Currencies, materials and counters tracked through a simulation pass.

pub mod ledger;

pub use ledger::{Resource, ResourceLedger, NUM_RESOURCES};
