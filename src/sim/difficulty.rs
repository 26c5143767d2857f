//! Difficulty curve
//!
//! Pure function of score: every `score_per_level` points the runner speeds up
//! and obstacles arrive sooner and closer, each clamped to a floor.

use serde::{Deserialize, Serialize};

use crate::tuning::{DifficultyTuning, SpawnCurve};

/// Inclusive-exclusive draw bounds `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit sample in `[0, 1)` onto the range
    #[inline]
    pub fn sample(&self, u: f32) -> f32 {
        crate::range_from_unit(self.min, self.max, u)
    }
}

/// Derived pacing for the current level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    pub level: u32,
    pub forward_speed: f32,
    /// Seconds between spawns
    pub spawn_interval: SpawnRange,
    /// Distance ahead of the runner for new obstacles
    pub spawn_distance: SpawnRange,
}

impl DifficultyParams {
    /// Level-0 values
    pub fn base(tuning: &DifficultyTuning) -> Self {
        Self {
            level: 0,
            forward_speed: tuning.base_forward_speed,
            spawn_interval: SpawnRange::new(tuning.spawn_interval.min, tuning.spawn_interval.max),
            spawn_distance: SpawnRange::new(tuning.spawn_distance.min, tuning.spawn_distance.max),
        }
    }
}

/// Level for a score (always 0 when the curve is disabled)
pub fn level_for_score(score: u64, tuning: &DifficultyTuning) -> u32 {
    if !tuning.enabled || tuning.score_per_level == 0 {
        return 0;
    }
    (score / tuning.score_per_level).min(u64::from(u32::MAX)) as u32
}

/// Compute speed and spawn bounds for a score
pub fn params_for_score(score: u64, tuning: &DifficultyTuning) -> DifficultyParams {
    if !tuning.enabled {
        return DifficultyParams::base(tuning);
    }

    let level = level_for_score(score, tuning);

    let steps = level as f32;
    let forward_speed =
        (tuning.base_forward_speed + steps * tuning.speed_per_level).min(tuning.max_forward_speed);

    DifficultyParams {
        level,
        forward_speed,
        spawn_interval: tighten(&tuning.spawn_interval, steps),
        spawn_distance: tighten(&tuning.spawn_distance, steps),
    }
}

/// Shrink both bounds by `steps` levels, floor them, then keep max >= min + margin
fn tighten(curve: &SpawnCurve, steps: f32) -> SpawnRange {
    let min = (curve.min - steps * curve.min_per_level).max(curve.min_floor);
    let max = (curve.max - steps * curve.max_per_level).max(curve.max_floor);
    SpawnRange::new(min, max.max(min + curve.margin))
}
