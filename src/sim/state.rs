//! Run session: owns every piece of gameplay state
//!
//! One session per player. The caller drives it with `step(dt)` once per
//! frame and feeds input in between; the render side drains [`GameEvent`]s
//! and reads [`SessionSnapshot`]s but never writes back.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision;
use super::difficulty::{DifficultyParams, params_for_score};
use super::input::InputEvent;
use super::obstacle::{Obstacle, ObstacleField};
use super::runner::{LaneDirection, Runner, Stance};
use super::score::ScoreState;
use crate::highscores::{HighScores, RunRecord};
use crate::sanitize_delta;
use crate::tuning::{Tuning, TuningError};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Run ended on a collision; waiting for a reset
    Ended,
}

/// Notifications for the render/UI side, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { run: u32 },
    /// Create a visual proxy for this obstacle
    ObstacleSpawned(Obstacle),
    /// Release the proxy for this obstacle
    ObstacleRetired { id: u32 },
    LevelUp { level: u32 },
    Collision { obstacle_id: u32 },
    /// `rank` is the leaderboard position (1-based), None if it missed the board
    RunEnded {
        score: u64,
        best: u64,
        rank: Option<usize>,
    },
}

/// Runner pose for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerView {
    pub pos: Vec3,
    pub scale: Vec3,
    pub lane: usize,
    pub stance: Stance,
}

/// Read-only view of the whole session after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: RunPhase,
    pub run: u32,
    pub runner: RunnerView,
    pub score: u64,
    pub best_score: u64,
    pub distance: f64,
    pub level: u32,
    pub forward_speed: f32,
    pub elapsed_secs: f32,
    pub obstacles: Vec<Obstacle>,
}

/// A player's run loop. Generic over the random source so tests and replays
/// can inject their own generator.
#[derive(Debug, Clone)]
pub struct RunSession<R = Pcg32> {
    tuning: Tuning,
    rng: R,
    phase: RunPhase,
    /// Run counter (1-based)
    run: u32,
    runner: Runner,
    field: ObstacleField,
    score: ScoreState,
    difficulty: DifficultyParams,
    /// Seconds of gameplay in the current run
    elapsed: f32,
    events: Vec<GameEvent>,
    high_scores: HighScores,
}

impl RunSession<Pcg32> {
    /// Create a session seeded for reproducible obstacle sequences
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        log::info!(
            "Session seed={} lanes={} difficulty={}",
            seed,
            tuning.runner.lane_count(),
            if tuning.difficulty.enabled { "curve" } else { "fixed" }
        );
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }

    /// Validate the tuning first
    pub fn try_new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::new(tuning, seed))
    }
}

impl<R: Rng> RunSession<R> {
    /// Create a session drawing from the given generator
    pub fn with_rng(tuning: Tuning, mut rng: R) -> Self {
        let difficulty = DifficultyParams::base(&tuning.difficulty);
        let field = ObstacleField::new(&mut rng, difficulty.spawn_interval);
        let runner = Runner::new(&tuning.runner);
        let score = ScoreState::new(tuning.points_per_meter);

        log::info!("Run 1 started");
        Self {
            tuning,
            rng,
            phase: RunPhase::Running,
            run: 1,
            runner,
            field,
            score,
            difficulty,
            elapsed: 0.0,
            events: vec![GameEvent::RunStarted { run: 1 }],
            high_scores: HighScores::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.obstacles()
    }

    /// Score of the current (or just finished) run
    pub fn score(&self) -> u64 {
        self.score.value
    }

    /// Best finished run this session
    pub fn best_score(&self) -> u64 {
        self.score.best_value
    }

    pub fn difficulty(&self) -> &DifficultyParams {
        &self.difficulty
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one input event. Returns true if it changed anything.
    ///
    /// Movement input is ignored once the run has ended and a reset request
    /// is ignored while running; neither is an error.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let runner_tuning = &self.tuning.runner;
        let lanes = runner_tuning.lane_count();
        let applied = match (self.phase, event) {
            (RunPhase::Ended, InputEvent::ResetRequested) => return self.reset(),
            (RunPhase::Ended, _) | (RunPhase::Running, InputEvent::ResetRequested) => false,
            (RunPhase::Running, InputEvent::LaneLeft) => {
                let before = self.runner.lane;
                self.runner.shift_lane(LaneDirection::Left, lanes);
                self.runner.lane != before
            }
            (RunPhase::Running, InputEvent::LaneRight) => {
                let before = self.runner.lane;
                self.runner.shift_lane(LaneDirection::Right, lanes);
                self.runner.lane != before
            }
            (RunPhase::Running, InputEvent::Jump) => self.runner.jump(runner_tuning),
            (RunPhase::Running, InputEvent::Duck) => self.runner.duck(runner_tuning),
        };

        if !applied {
            log::debug!("Ignored {:?} ({:?})", event, self.phase);
        }
        applied
    }

    /// Translate a key code through the configured mapping and apply it
    pub fn handle_key(&mut self, code: &str) -> bool {
        match self.tuning.key_mapping.map_key(code) {
            Some(event) => self.handle_input(event),
            None => false,
        }
    }

    /// Advance the simulation by one frame of `dt` seconds.
    ///
    /// Order: score, difficulty, runner, obstacles, collision. A bad `dt`
    /// (NaN, negative, infinite) is treated as 0. Does nothing once ended.
    pub fn step(&mut self, dt: f32) {
        if self.phase != RunPhase::Running {
            return;
        }
        let dt = sanitize_delta(dt);
        self.elapsed += dt;

        // Distance this frame is scored at the speed the frame started with
        let speed = f64::from(self.difficulty.forward_speed);
        self.score.advance(f64::from(dt), speed);

        let params = params_for_score(self.score.value, &self.tuning.difficulty);
        if params.level > self.difficulty.level {
            log::info!(
                "Level {} (speed {:.1}, score {})",
                params.level,
                params.forward_speed,
                self.score.value
            );
            self.events.push(GameEvent::LevelUp {
                level: params.level,
            });
        }
        self.difficulty = params;

        let speed = self.difficulty.forward_speed;
        self.runner.integrate(dt, speed, &self.tuning.runner);

        let update = self.field.tick(
            &mut self.rng,
            dt,
            self.runner.pos.z,
            &self.difficulty,
            &self.tuning,
        );
        if let Some(obstacle) = update.spawned {
            self.events.push(GameEvent::ObstacleSpawned(obstacle));
        }
        for id in update.retired {
            self.events.push(GameEvent::ObstacleRetired { id });
        }

        let hit = collision::check_all(&self.runner, &self.tuning.runner, self.field.obstacles())
            .map(|obstacle| obstacle.id);
        if let Some(obstacle_id) = hit {
            log::debug!("Hit obstacle {} at z={:.1}", obstacle_id, self.runner.pos.z);
            self.events.push(GameEvent::Collision { obstacle_id });
            self.finish_run();
        }
    }

    /// End the current run without a collision. Returns false if already ended.
    pub fn end(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.finish_run();
        true
    }

    fn finish_run(&mut self) {
        self.phase = RunPhase::Ended;
        let score = self.score.finalize();
        let best = self.score.best_value;

        let rank = self.high_scores.add_run(RunRecord {
            run: self.run,
            score,
            distance: self.score.distance_travelled,
            level: self.difficulty.level,
            elapsed_secs: self.elapsed,
        });
        self.events.push(GameEvent::RunEnded { score, best, rank });

        log::info!(
            "Run {} over: score {} (best {}), {:.1}m in {:.1}s",
            self.run,
            score,
            best,
            self.score.distance_travelled,
            self.elapsed
        );
    }

    /// Start the next run. Only valid once the current run has ended;
    /// returns false (and changes nothing) while running.
    pub fn reset(&mut self) -> bool {
        if self.phase != RunPhase::Ended {
            log::debug!("Reset ignored while running");
            return false;
        }

        self.difficulty = DifficultyParams::base(&self.tuning.difficulty);
        let interval = self.difficulty.spawn_interval;
        for id in self.field.reset(&mut self.rng, interval) {
            self.events.push(GameEvent::ObstacleRetired { id });
        }

        self.runner.reset(&self.tuning.runner);
        self.score.start_new_run();
        self.elapsed = 0.0;
        self.run += 1;
        self.phase = RunPhase::Running;
        self.events.push(GameEvent::RunStarted { run: self.run });

        log::info!("Run {} started", self.run);
        true
    }

    /// Everything a renderer or HUD needs after a step
    pub fn snapshot(&self) -> SessionSnapshot {
        let runner_tuning = &self.tuning.runner;
        SessionSnapshot {
            phase: self.phase,
            run: self.run,
            runner: RunnerView {
                pos: self.runner.pos,
                scale: Vec3::new(1.0, self.runner.scale_y, 1.0),
                lane: self.runner.lane,
                stance: self.runner.stance(runner_tuning),
            },
            score: self.score.value,
            best_score: self.score.best_value,
            distance: self.score.distance_travelled,
            level: self.difficulty.level,
            forward_speed: self.difficulty.forward_speed,
            elapsed_secs: self.elapsed,
            obstacles: self.field.obstacles().to_vec(),
        }
    }
}
