//! Shared constants, numeric helpers and progression state.

pub mod balance;
pub mod constants;
pub mod progression;

pub use progression::Progression;
