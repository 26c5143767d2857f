//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded (or injected) RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod input;
pub mod obstacle;
pub mod runner;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{Aabb, check_all};
pub use difficulty::{DifficultyParams, SpawnRange, level_for_score, params_for_score};
pub use input::{InputEvent, KeyMapping};
pub use obstacle::{FieldUpdate, Obstacle, ObstacleField, ObstacleKind};
pub use runner::{LaneDirection, Runner, Stance};
pub use score::ScoreState;
pub use state::{GameEvent, RunPhase, RunSession, RunnerView, SessionSnapshot};
pub use tick::{TickInput, autopilot_events, tick};
