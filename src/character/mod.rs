//! Stats trained by actions and skills read from the host.

pub mod skills;
pub mod stats;

pub use skills::Skill;
pub use stats::{Stat, StatExperience, NUM_STATS};
