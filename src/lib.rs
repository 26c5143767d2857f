//! Lane Runner - simulation core for a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner motion, obstacles, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `highscores`: In-memory leaderboard of finished runs
//!
//! Rendering, audio and input polling live outside this crate. The core
//! emits [`sim::GameEvent`]s and [`sim::SessionSnapshot`]s for them and never
//! reads anything back.

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Engine constants that are not part of the tunable balance
pub mod consts {
    /// Fixed timestep used by the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Slack when deciding whether the runner stands on the ground
    pub const GROUNDED_EPSILON: f32 = 0.001;

    /// Minimum gap kept between spawn interval min and max (seconds)
    pub const SPAWN_INTERVAL_MARGIN: f32 = 0.12;
    /// Minimum gap kept between spawn distance min and max (world units)
    pub const SPAWN_DISTANCE_MARGIN: f32 = 10.0;
}

/// Linear interpolation from `a` to `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Coerce a frame delta or speed into a usable non-negative value.
///
/// NaN, infinities and negatives all become 0 so one bad frame can't poison
/// the accumulated state.
#[inline]
pub fn sanitize_delta(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Uniform draw in `[min, max)` from a unit sample `u` in `[0, 1)`
#[inline]
pub fn range_from_unit(min: f32, max: f32, u: f32) -> f32 {
    min + u * (max - min)
}
