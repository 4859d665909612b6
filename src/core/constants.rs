// Rounding
pub const EPSILON: f64 = 1e-6;

// Ledger defaults
pub const STARTING_MANA: f64 = 250.0;

// Tick and timing (1 mana = 1 tick, 50 ticks per second at 1x speed)
pub const TICKS_PER_SECOND: f64 = 50.0;

// Stat and skill levels
pub const LEVEL_PERCENT_DIVISOR: f64 = 100.0;
pub const LEVEL_CURVE_SCALE: f64 = 100.0;

// Combat
pub const PYROMANCY_COMBAT_WEIGHT: f64 = 5.0;
pub const ARMOR_COMBAT_DIVISOR: f64 = 5.0;
pub const TEAM_COMBAT_DIVISOR: f64 = 2.0;

// Dungeons
pub const DUNGEON_SOULSTONE_BASE: f64 = 10.0;
