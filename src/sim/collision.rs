//! Axis-aligned box collision between the runner and obstacles

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::runner::Runner;
use crate::tuning::RunnerTuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box of `size` centered on `center`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Inclusive overlap on all three axes (touching faces count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Runner hitbox, shrunk vertically while ducking
pub fn runner_bounds(runner: &Runner, tuning: &RunnerTuning) -> Aabb {
    Aabb::from_center_size(runner.pos, runner.size(tuning))
}

pub fn obstacle_bounds(obstacle: &Obstacle) -> Aabb {
    Aabb::from_center_size(obstacle.pos, obstacle.size)
}

/// First obstacle (in spawn order) touching the runner
pub fn check_all<'a>(
    runner: &Runner,
    tuning: &RunnerTuning,
    obstacles: &'a [Obstacle],
) -> Option<&'a Obstacle> {
    let bounds = runner_bounds(runner, tuning);
    obstacles
        .iter()
        .find(|obstacle| bounds.intersects(&obstacle_bounds(obstacle)))
}
