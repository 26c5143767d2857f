//! Per-frame driver
//!
//! Applies a frame's input batch, then steps the session. Input is always
//! fully applied before the step starts so a handler never observes a
//! half-updated frame.

use rand::Rng;

use super::input::InputEvent;
use super::obstacle::{Obstacle, ObstacleKind};
use super::state::RunSession;

/// Seconds of road the autopilot looks ahead
const AUTOPILOT_LOOKAHEAD_SECS: f32 = 1.2;
/// Jump when a ground obstacle is this many seconds away
const AUTOPILOT_JUMP_LEAD_SECS: f32 = 0.22;
/// Duck when an overhead obstacle is this many seconds away
const AUTOPILOT_DUCK_LEAD_SECS: f32 = 0.15;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Events in arrival order
    pub events: Vec<InputEvent>,
    /// Idle/demo mode - the autopilot plays
    pub autopilot: bool,
}

impl TickInput {
    pub fn autopilot() -> Self {
        Self {
            events: Vec::new(),
            autopilot: true,
        }
    }
}

/// Apply `input`, then advance the session by `dt`
pub fn tick<R: Rng>(session: &mut RunSession<R>, input: &TickInput, dt: f32) {
    for &event in &input.events {
        session.handle_input(event);
    }
    if input.autopilot {
        for event in autopilot_events(session) {
            session.handle_input(event);
        }
    }

    session.step(dt);
}

/// Pick dodge input for the current frame.
///
/// Prefers a free neighbouring lane; otherwise ducks under overhead bars and
/// jumps everything else. Requests a reset once the run has ended.
pub fn autopilot_events<R: Rng>(session: &RunSession<R>) -> Vec<InputEvent> {
    if !session.is_running() {
        return vec![InputEvent::ResetRequested];
    }

    let tuning = &session.tuning().runner;
    let runner = session.runner();
    let speed = session.difficulty().forward_speed.max(1.0);
    let front = runner.pos.z + tuning.size.z / 2.0;
    let back = runner.pos.z - tuning.size.z / 2.0;
    let reach = runner.pos.z + speed * AUTOPILOT_LOOKAHEAD_SECS;
    let obstacles = session.obstacles();

    let threat = obstacles
        .iter()
        .filter(|o| o.lane == runner.lane && spans(o, back, reach))
        .min_by(|a, b| a.pos.z.total_cmp(&b.pos.z));
    let Some(threat) = threat else {
        return Vec::new();
    };

    let left = runner.lane.checked_sub(1);
    let right = Some(runner.lane + 1).filter(|&lane| lane < tuning.lane_count());
    for (lane, event) in [(left, InputEvent::LaneLeft), (right, InputEvent::LaneRight)] {
        let Some(lane) = lane else { continue };
        let blocked = obstacles
            .iter()
            .any(|o| o.lane == lane && spans(o, back - 1.0, reach));
        if !blocked {
            return vec![event];
        }
    }

    let gap = threat.pos.z - threat.size.z / 2.0 - front;
    let event = match threat.kind {
        ObstacleKind::High if gap <= speed * AUTOPILOT_DUCK_LEAD_SECS => InputEvent::Duck,
        ObstacleKind::Block | ObstacleKind::Low if gap <= speed * AUTOPILOT_JUMP_LEAD_SECS => {
            InputEvent::Jump
        }
        _ => return Vec::new(),
    };
    vec![event]
}

/// Does the obstacle overlap the z window `[near, far]`?
fn spans(obstacle: &Obstacle, near: f32, far: f32) -> bool {
    let half = obstacle.size.z / 2.0;
    obstacle.pos.z + half >= near && obstacle.pos.z - half <= far
}
