//! Data-driven game balance
//!
//! Every number the simulation uses lives here so alternate balance sets can
//! be loaded from JSON instead of forking the engine. `Tuning::default()` is
//! the full game (difficulty curve + three obstacle kinds); `Tuning::simple()`
//! is the fixed-parameter variant.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::input::KeyMapping;
use crate::sim::obstacle::ObstacleKind;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Player body, lanes and movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    /// Lateral offset of each lane, left to right
    pub lanes: Vec<f32>,
    /// Lane index the runner starts every run in
    pub start_lane: usize,
    /// Unscaled body size (width, height, depth)
    pub size: Vec3,
    /// Rate of the exponential approach toward the target lane (1/s)
    pub lane_lerp_speed: f32,
    /// Vertical acceleration (negative = down)
    pub gravity: f32,
    /// Upward velocity applied on jump
    pub jump_velocity: f32,
    /// Vertical scale while ducking
    pub duck_scale_y: f32,
    /// Seconds a duck lasts
    pub duck_duration: f32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            lanes: vec![-2.0, 0.0, 2.0],
            start_lane: 1,
            size: Vec3::new(1.0, 2.0, 1.0),
            lane_lerp_speed: 14.0,
            gravity: -35.0,
            jump_velocity: 13.0,
            duck_scale_y: 0.45,
            duck_duration: 0.45,
        }
    }
}

impl RunnerTuning {
    /// Resting y for the full-height body
    #[inline]
    pub fn grounded_y(&self) -> f32 {
        self.size.y / 2.0
    }

    #[inline]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Lateral offset of a lane (clamped into range)
    pub fn lane_x(&self, lane: usize) -> f32 {
        let last = self.lanes.len().saturating_sub(1);
        self.lanes.get(lane.min(last)).copied().unwrap_or(0.0)
    }
}

/// A (min, max) pair that tightens with level toward floor values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCurve {
    pub min: f32,
    pub max: f32,
    pub min_floor: f32,
    pub max_floor: f32,
    pub min_per_level: f32,
    pub max_per_level: f32,
    /// Smallest allowed gap between the derived min and max
    pub margin: f32,
}

/// Speed and spawn pacing as a function of level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// When false every parameter stays at its base value
    pub enabled: bool,
    pub base_forward_speed: f32,
    pub max_forward_speed: f32,
    pub speed_per_level: f32,
    /// Score needed per difficulty level
    pub score_per_level: u64,
    /// Seconds between spawns
    pub spawn_interval: SpawnCurve,
    /// Distance ahead of the runner at which obstacles appear
    pub spawn_distance: SpawnCurve,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            base_forward_speed: 14.0,
            max_forward_speed: 24.0,
            speed_per_level: 0.8,
            score_per_level: 120,
            spawn_interval: SpawnCurve {
                min: 0.8,
                max: 1.6,
                min_floor: 0.44,
                max_floor: 0.95,
                min_per_level: 0.025,
                max_per_level: 0.04,
                margin: crate::consts::SPAWN_INTERVAL_MARGIN,
            },
            spawn_distance: SpawnCurve {
                min: 60.0,
                max: 100.0,
                min_floor: 36.0,
                max_floor: 68.0,
                min_per_level: 1.5,
                max_per_level: 2.5,
                margin: crate::consts::SPAWN_DISTANCE_MARGIN,
            },
        }
    }
}

/// Vertical placement rule for an obstacle kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Placement {
    /// Resting on the ground (y = height / 2)
    Ground,
    /// Hanging in a band above the ground; must be ducked under
    Head { y_min: f32, y_max: f32 },
}

/// Spawn table entry for one obstacle kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    /// Relative spawn weight (need not sum to 1 across kinds)
    pub weight: f32,
    pub width: f32,
    pub height_min: f32,
    pub height_max: f32,
    pub depth: f32,
    pub placement: Placement,
    /// Display colour (0xRRGGBB), passed through to the renderer
    pub color: u32,
    /// Emissive colour (0xRRGGBB)
    pub emissive: u32,
}

/// Complete balance set for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub runner: RunnerTuning,
    pub difficulty: DifficultyTuning,
    pub obstacles: Vec<ObstacleSpec>,
    /// Score points per world unit travelled
    pub points_per_meter: f64,
    /// Obstacles further than this behind the runner are retired
    pub cleanup_distance: f32,
    pub key_mapping: KeyMapping,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            runner: RunnerTuning::default(),
            difficulty: DifficultyTuning::default(),
            obstacles: default_obstacles(),
            points_per_meter: 1.0,
            cleanup_distance: 25.0,
            key_mapping: KeyMapping::Standard,
        }
    }
}

fn default_obstacles() -> Vec<ObstacleSpec> {
    vec![
        ObstacleSpec {
            kind: ObstacleKind::Block,
            weight: 0.45,
            width: 1.2,
            height_min: 1.6,
            height_max: 2.4,
            depth: 1.2,
            placement: Placement::Ground,
            color: 0x4c2ce1,
            emissive: 0x1b286e,
        },
        ObstacleSpec {
            kind: ObstacleKind::Low,
            weight: 0.3,
            width: 1.5,
            height_min: 0.65,
            height_max: 1.05,
            depth: 1.4,
            placement: Placement::Ground,
            color: 0x263ec2,
            emissive: 0x12256a,
        },
        ObstacleSpec {
            kind: ObstacleKind::High,
            weight: 0.25,
            width: 1.6,
            height_min: 0.75,
            height_max: 1.1,
            depth: 1.4,
            placement: Placement::Head {
                y_min: 1.95,
                y_max: 2.15,
            },
            color: 0x6e4dff,
            emissive: 0x2d1e78,
        },
    ]
}

impl Tuning {
    /// Fixed-parameter variant: constant speed and pacing, plain blocks only
    pub fn simple() -> Self {
        let mut tuning = Self::default();
        tuning.difficulty.enabled = false;
        tuning.obstacles.truncate(1);
        tuning.obstacles[0].weight = 1.0;
        tuning
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let runner = &self.runner;
        if runner.lanes.is_empty() {
            return Err(invalid("at least one lane is required"));
        }
        if runner.start_lane >= runner.lanes.len() {
            return Err(invalid(format!(
                "start lane {} out of range for {} lanes",
                runner.start_lane,
                runner.lanes.len()
            )));
        }
        if !positive(runner.size.x) || !positive(runner.size.y) || !positive(runner.size.z) {
            return Err(invalid("runner size must be positive"));
        }
        if !(runner.gravity.is_finite() && runner.gravity < 0.0) {
            return Err(invalid("gravity must pull down (< 0)"));
        }
        if !positive(runner.jump_velocity) {
            return Err(invalid("jump_velocity must be > 0"));
        }
        if !positive(runner.duck_scale_y) || runner.duck_scale_y > 1.0 {
            return Err(invalid("duck_scale_y must be in (0, 1]"));
        }

        if self.obstacles.is_empty() {
            return Err(invalid("at least one obstacle kind is required"));
        }
        for spec in &self.obstacles {
            if !non_negative(spec.weight) {
                return Err(invalid(format!("{:?}: weight must be >= 0", spec.kind)));
            }
            if !positive(spec.width) || !positive(spec.depth) || !positive(spec.height_min) {
                return Err(invalid(format!("{:?}: dimensions must be positive", spec.kind)));
            }
            if spec.height_min > spec.height_max {
                return Err(invalid(format!("{:?}: height_min > height_max", spec.kind)));
            }
            if let Placement::Head { y_min, y_max } = spec.placement {
                if y_min > y_max {
                    return Err(invalid(format!("{:?}: head y_min > y_max", spec.kind)));
                }
            }
        }
        let total_weight: f32 = self.obstacles.iter().map(|s| s.weight).sum();
        if !positive(total_weight) {
            return Err(invalid("obstacle weights must not all be zero"));
        }

        if self.difficulty.score_per_level == 0 {
            return Err(invalid("score_per_level must be > 0"));
        }
        if !(self.points_per_meter.is_finite() && self.points_per_meter >= 0.0) {
            return Err(invalid("points_per_meter must be >= 0"));
        }
        if !non_negative(self.cleanup_distance) {
            return Err(invalid("cleanup_distance must be >= 0"));
        }
        Ok(())
    }
}

#[inline]
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[inline]
fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn invalid(msg: impl Into<String>) -> TuningError {
    TuningError::Invalid(msg.into())
}
