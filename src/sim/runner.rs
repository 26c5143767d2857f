//! Player motion: lanes, jumping, ducking, gravity
//!
//! Lane changes move a logical index instantly; the body then eases toward
//! the lane's x, so the hitbox trails the index for a few frames. Jump and
//! duck are mutually exclusive and both require standing on the ground.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::GROUNDED_EPSILON;
use crate::tuning::RunnerTuning;

/// Lateral input direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneDirection {
    /// Toward lane 0
    Left,
    /// Toward the last lane
    Right,
}

/// Coarse movement state derived from the runner fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Grounded,
    Airborne,
    Ducking,
}

/// The player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    /// Center of the body. z only ever grows.
    pub pos: Vec3,
    pub vertical_vel: f32,
    /// Index into the lane table, always in range
    pub lane: usize,
    pub ducking: bool,
    /// Seconds of duck left
    pub duck_timer: f32,
    /// Vertical scale (1.0 standing, duck_scale_y while ducking)
    pub scale_y: f32,
}

impl Runner {
    /// Standing in the start lane at the origin
    pub fn new(tuning: &RunnerTuning) -> Self {
        Self {
            pos: Vec3::new(tuning.lane_x(tuning.start_lane), tuning.grounded_y(), 0.0),
            vertical_vel: 0.0,
            lane: tuning.start_lane.min(tuning.lane_count().saturating_sub(1)),
            ducking: false,
            duck_timer: 0.0,
            scale_y: 1.0,
        }
    }

    /// Put the runner back at the start of a run
    pub fn reset(&mut self, tuning: &RunnerTuning) {
        *self = Self::new(tuning);
    }

    /// Current body size including duck scaling
    pub fn size(&self, tuning: &RunnerTuning) -> Vec3 {
        Vec3::new(tuning.size.x, tuning.size.y * self.scale_y, tuning.size.z)
    }

    /// Resting y for the current vertical scale
    #[inline]
    pub fn ground_y(&self, tuning: &RunnerTuning) -> f32 {
        tuning.size.y * self.scale_y / 2.0
    }

    /// On (or within epsilon of) the full-height ground level
    #[inline]
    pub fn is_grounded(&self, tuning: &RunnerTuning) -> bool {
        self.pos.y <= tuning.grounded_y() + GROUNDED_EPSILON
    }

    pub fn stance(&self, tuning: &RunnerTuning) -> Stance {
        if self.ducking {
            Stance::Ducking
        } else if self.is_grounded(tuning) {
            Stance::Grounded
        } else {
            Stance::Airborne
        }
    }

    /// Move the target lane one step, clamped to the lane table
    pub fn shift_lane(&mut self, direction: LaneDirection, lane_count: usize) {
        let last = lane_count.saturating_sub(1);
        self.lane = match direction {
            LaneDirection::Left => self.lane.saturating_sub(1),
            LaneDirection::Right => (self.lane + 1).min(last),
        }
        .min(last);
    }

    /// Start a jump. Returns false (and does nothing) unless grounded and upright.
    pub fn jump(&mut self, tuning: &RunnerTuning) -> bool {
        if self.ducking || !self.is_grounded(tuning) {
            return false;
        }
        self.vertical_vel = tuning.jump_velocity;
        true
    }

    /// Start a duck. Returns false (and does nothing) unless grounded and upright.
    pub fn duck(&mut self, tuning: &RunnerTuning) -> bool {
        // A jump issued earlier in the same input batch hasn't left the ground yet
        let launching = self.vertical_vel > 0.0;
        if self.ducking || launching || !self.is_grounded(tuning) {
            return false;
        }
        self.ducking = true;
        self.duck_timer = tuning.duck_duration;
        self.scale_y = tuning.duck_scale_y;
        // Keep the feet on the ground at the shorter height
        self.pos.y = self.ground_y(tuning);
        true
    }

    fn end_duck(&mut self, tuning: &RunnerTuning) {
        self.ducking = false;
        self.duck_timer = 0.0;
        self.scale_y = 1.0;
        self.pos.y = tuning.grounded_y();
    }

    /// Advance one frame: forward motion, lane easing, duck timer, gravity
    pub fn integrate(&mut self, dt: f32, forward_speed: f32, tuning: &RunnerTuning) {
        self.pos.z += forward_speed * dt;

        let target_x = tuning.lane_x(self.lane);
        let t = (tuning.lane_lerp_speed * dt).clamp(0.0, 1.0);
        self.pos.x = crate::lerp(self.pos.x, target_x, t);

        if self.duck_timer > 0.0 {
            self.duck_timer -= dt;
            if self.duck_timer <= 0.0 {
                self.end_duck(tuning);
            }
        }

        self.vertical_vel += tuning.gravity * dt;
        self.pos.y += self.vertical_vel * dt;

        let floor = self.ground_y(tuning);
        if self.pos.y <= floor && self.vertical_vel <= 0.0 {
            self.pos.y = floor;
            self.vertical_vel = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn tuning() -> RunnerTuning {
        RunnerTuning::default()
    }

    #[test]
    fn test_new_runner_standing_in_start_lane() {
        let t = tuning();
        let runner = Runner::new(&t);
        assert_eq!(runner.lane, 1);
        assert_eq!(runner.pos, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(runner.stance(&t), Stance::Grounded);
    }

    #[test]
    fn test_lane_clamped_at_edges() {
        let mut runner = Runner::new(&tuning());
        runner.shift_lane(LaneDirection::Left, 3);
        runner.shift_lane(LaneDirection::Left, 3);
        runner.shift_lane(LaneDirection::Left, 3);
        assert_eq!(runner.lane, 0);
        for _ in 0..5 {
            runner.shift_lane(LaneDirection::Right, 3);
        }
        assert_eq!(runner.lane, 2);
    }

    #[test]
    fn test_lane_change_eases_toward_target() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        runner.shift_lane(LaneDirection::Right, t.lane_count());
        runner.integrate(DT, 14.0, &t);
        // Partway there after one frame
        assert!(runner.pos.x > 0.0 && runner.pos.x < 2.0);
        for _ in 0..120 {
            runner.integrate(DT, 14.0, &t);
        }
        assert!((runner.pos.x - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_huge_delta_snaps_to_lane() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        runner.shift_lane(LaneDirection::Left, t.lane_count());
        runner.integrate(10.0, 14.0, &t);
        assert_eq!(runner.pos.x, -2.0);
        assert_eq!(runner.pos.y, t.grounded_y());
    }

    #[test]
    fn test_jump_and_land() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        assert!(runner.jump(&t));
        assert_eq!(runner.vertical_vel, 13.0);

        runner.integrate(DT, 14.0, &t);
        assert_eq!(runner.stance(&t), Stance::Airborne);
        // No double jump
        let vel = runner.vertical_vel;
        assert!(!runner.jump(&t));
        assert_eq!(runner.vertical_vel, vel);

        for _ in 0..120 {
            runner.integrate(DT, 14.0, &t);
        }
        assert_eq!(runner.pos.y, t.grounded_y());
        assert_eq!(runner.vertical_vel, 0.0);
    }

    #[test]
    fn test_duck_shrinks_and_recovers() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        assert!(runner.duck(&t));
        assert!(runner.ducking);
        assert_eq!(runner.scale_y, 0.45);
        assert!((runner.pos.y - 0.45).abs() < 1e-6);
        assert_eq!(runner.stance(&t), Stance::Ducking);

        // Still ducking midway
        for _ in 0..20 {
            runner.integrate(DT, 14.0, &t);
        }
        assert!(runner.ducking);
        assert!((runner.pos.y - 0.45).abs() < 1e-6);

        for _ in 0..20 {
            runner.integrate(DT, 14.0, &t);
        }
        assert!(!runner.ducking);
        assert_eq!(runner.scale_y, 1.0);
        assert_eq!(runner.pos.y, t.grounded_y());
        assert_eq!(runner.duck_timer, 0.0);
    }

    #[test]
    fn test_jump_blocked_while_ducking() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        runner.duck(&t);
        assert!(!runner.jump(&t));
        assert_eq!(runner.vertical_vel, 0.0);
    }

    #[test]
    fn test_duck_blocked_while_airborne() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        runner.jump(&t);
        runner.integrate(DT, 14.0, &t);
        assert!(runner.pos.y > t.grounded_y() + GROUNDED_EPSILON);
        assert!(!runner.duck(&t));
        assert!(!runner.ducking);
        assert_eq!(runner.scale_y, 1.0);
    }

    #[test]
    fn test_duck_blocked_right_after_jump_input() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        assert!(runner.jump(&t));
        assert!(!runner.duck(&t));
        assert!(!runner.ducking);
    }

    #[test]
    fn test_duck_not_retriggered() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        runner.duck(&t);
        runner.integrate(0.2, 14.0, &t);
        let timer = runner.duck_timer;
        assert!(!runner.duck(&t));
        assert_eq!(runner.duck_timer, timer);
    }

    #[test]
    fn test_zero_delta_changes_nothing() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        runner.shift_lane(LaneDirection::Right, t.lane_count());
        let before = runner.clone();
        runner.integrate(0.0, 14.0, &t);
        assert_eq!(runner.pos, before.pos);
        assert_eq!(runner.vertical_vel, 0.0);
    }

    #[test]
    fn test_forward_motion() {
        let t = tuning();
        let mut runner = Runner::new(&t);
        runner.integrate(0.5, 14.0, &t);
        assert_eq!(runner.pos.z, 7.0);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Left,
        Right,
        Jump,
        Duck,
        Step(f32),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Left),
            Just(Action::Right),
            Just(Action::Jump),
            Just(Action::Duck),
            (0.0f32..0.1).prop_map(Action::Step),
        ]
    }

    proptest! {
        #[test]
        fn prop_lane_and_ground_invariants(actions in prop::collection::vec(action(), 1..400)) {
            let t = tuning();
            let mut runner = Runner::new(&t);
            for a in actions {
                match a {
                    Action::Left => runner.shift_lane(LaneDirection::Left, t.lane_count()),
                    Action::Right => runner.shift_lane(LaneDirection::Right, t.lane_count()),
                    Action::Jump => { runner.jump(&t); }
                    Action::Duck => { runner.duck(&t); }
                    Action::Step(dt) => runner.integrate(dt, 14.0, &t),
                }
                prop_assert!(runner.lane < t.lane_count());
                prop_assert!(runner.pos.y >= runner.ground_y(&t));
                prop_assert!(runner.duck_timer >= 0.0 || !runner.ducking);
                if runner.pos.y == runner.ground_y(&t) && !runner.ducking {
                    prop_assert!(runner.vertical_vel >= 0.0);
                }
            }
        }
    }
}
