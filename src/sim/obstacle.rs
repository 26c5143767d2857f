//! Obstacle spawning and retirement
//!
//! Obstacles live in world space: once placed their position never changes,
//! the runner moves past them. The field spawns one obstacle each time its
//! timer crosses a freshly drawn interval and drops anything that has fallen
//! more than the cleanup distance behind the runner.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyParams, SpawnRange};
use crate::range_from_unit;
use crate::tuning::{ObstacleSpec, Placement, Tuning};

/// Obstacle shape/placement variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Tall ground block, dodge sideways
    Block,
    /// Short ground block, jump over
    Low,
    /// Overhead bar, duck under
    High,
}

/// A live obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub lane: usize,
    /// Box center
    pub pos: Vec3,
    /// Width, height, depth
    pub size: Vec3,
    pub color: u32,
    pub emissive: u32,
}

/// What a single field tick changed
#[derive(Debug, Clone, Default)]
pub struct FieldUpdate {
    pub spawned: Option<Obstacle>,
    pub retired: Vec<u32>,
}

/// Weighted pick from the spawn table.
///
/// `u` is a unit sample in `[0, 1)`. Walks the table subtracting weights from
/// `u * total` until the remainder is non-positive; if rounding leaves it
/// positive past the last entry the first entry is used.
pub fn pick_kind(specs: &[ObstacleSpec], u: f32) -> Option<&ObstacleSpec> {
    let total: f32 = specs.iter().map(|s| s.weight).sum();
    let mut pick = u * total;
    for spec in specs {
        pick -= spec.weight;
        if pick <= 0.0 {
            return Some(spec);
        }
    }
    specs.first()
}

/// Owns every live obstacle plus the spawn timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    spawn_timer: f32,
    next_spawn_in: f32,
    next_id: u32,
}

impl ObstacleField {
    /// Empty field with the first spawn drawn from `interval`
    pub fn new<R: Rng>(rng: &mut R, interval: SpawnRange) -> Self {
        Self {
            obstacles: Vec::new(),
            spawn_timer: 0.0,
            next_spawn_in: interval.sample(rng.random()),
            next_id: 1,
        }
    }

    /// Live obstacles in spawn order
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Place one obstacle ahead of the runner
    pub fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        runner_z: f32,
        distance: SpawnRange,
        tuning: &Tuning,
    ) -> Option<&Obstacle> {
        let lanes = &tuning.runner.lanes;
        if lanes.is_empty() {
            return None;
        }

        let lane = rng.random_range(0..lanes.len());
        let spec = pick_kind(&tuning.obstacles, rng.random())?;
        let height = range_from_unit(spec.height_min, spec.height_max, rng.random());
        let z = runner_z + distance.sample(rng.random());
        let y = match spec.placement {
            Placement::Ground => height / 2.0,
            Placement::Head { y_min, y_max } => range_from_unit(y_min, y_max, rng.random()),
        };

        let obstacle = Obstacle {
            id: self.next_id,
            kind: spec.kind,
            lane,
            pos: Vec3::new(lanes[lane], y, z),
            size: Vec3::new(spec.width, height, spec.depth),
            color: spec.color,
            emissive: spec.emissive,
        };
        self.next_id += 1;

        log::debug!(
            "Spawned obstacle {} ({:?}) lane={} z={:.1}",
            obstacle.id,
            obstacle.kind,
            obstacle.lane,
            obstacle.pos.z
        );
        self.obstacles.push(obstacle);
        self.obstacles.last()
    }

    /// Advance the spawn timer and drop obstacles left behind
    pub fn tick<R: Rng>(
        &mut self,
        rng: &mut R,
        dt: f32,
        runner_z: f32,
        params: &DifficultyParams,
        tuning: &Tuning,
    ) -> FieldUpdate {
        let mut update = FieldUpdate::default();

        self.spawn_timer += dt;
        if self.spawn_timer >= self.next_spawn_in {
            self.spawn_timer = 0.0;
            self.next_spawn_in = params.spawn_interval.sample(rng.random());
            update.spawned = self
                .spawn(rng, runner_z, params.spawn_distance, tuning)
                .cloned();
        }

        update.retired = self.retire_behind(runner_z, tuning.cleanup_distance);
        update
    }

    /// Remove every obstacle more than `cleanup_distance` behind `runner_z`
    pub fn retire_behind(&mut self, runner_z: f32, cleanup_distance: f32) -> Vec<u32> {
        let mut retired = Vec::new();
        self.obstacles.retain(|obstacle| {
            let behind = runner_z - obstacle.pos.z > cleanup_distance;
            if behind {
                log::trace!("Retired obstacle {}", obstacle.id);
                retired.push(obstacle.id);
            }
            !behind
        });
        retired
    }

    /// Drop every live obstacle, returning their ids
    pub fn clear_all(&mut self) -> Vec<u32> {
        self.obstacles.drain(..).map(|obstacle| obstacle.id).collect()
    }

    /// Empty the field and restart spawn timing for a new run
    pub fn reset<R: Rng>(&mut self, rng: &mut R, interval: SpawnRange) -> Vec<u32> {
        let retired = self.clear_all();
        self.spawn_timer = 0.0;
        self.next_spawn_in = interval.sample(rng.random());
        retired
    }
}
