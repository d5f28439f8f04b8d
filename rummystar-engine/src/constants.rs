//! Domain constants for scoring rules and session defaults.

/// Highest per-player score accepted in a normal round.
pub const MAX_SCORE_DEFAULT: i32 = 80;

/// Highest per-player score accepted when the round is a double (rummy) hand.
pub const MAX_SCORE_DOUBLE_ROUND: i32 = 160;

/// Default elimination threshold.
pub const DEFAULT_OUT_LIMIT: i32 = 220;

/// Default entry-prohibition threshold.
pub const DEFAULT_COMPEL_POINT: i32 = 196;

/// Default per-play deduction unit.
pub const DEFAULT_SCOOT_POINT: i32 = 25;

/// Schema tag written into exported snapshots.
pub const SCHEMA_VERSION: &str = "v17.0.0";

/// Key under which the whole-session snapshot is persisted.
pub const STORAGE_KEY: &str = "rummyStarSession";

/// Protected roster seeded into a fresh session.
pub const DEFAULT_ROSTER: [&str; 7] = [
    "Rajesh", "Vinod", "Shine", "Keerthy", "Ratheesh", "Shiju", "Kilu",
];
