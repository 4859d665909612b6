use serde::{Deserialize, Serialize};

/// Skills read from the host. The simulation never trains them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Skill {
    Combat,
    Magic,
    Practical,
    Alchemy,
    Crafting,
    Dark,
    Chronomancy,
    Pyromancy,
    Restoration,
    Spatiomancy,
    Mercantilism,
    Divine,
}
