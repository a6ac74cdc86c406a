use super::{Detector, DetectorContext, DetectorKind, RuleOutcome, KICK_STATES};
use crate::config::KickTimeoutConfig;
use crate::error::DetectorError;
use crate::events::{GameEvent, RefereeCommand};
use crate::geometry::Vec2;
use crate::model::{Frame, GameStateSet, Timestamp};

const PRIORITY: i32 = 58;

/// Restart not taken in time; play continues with a force start.
#[derive(Debug, Clone)]
pub struct KickTimeoutDetector {
    config: KickTimeoutConfig,
    started_at: Timestamp,
    start_pos: Vec2,
    done: bool,
}

impl KickTimeoutDetector {
    pub fn new(config: KickTimeoutConfig) -> Self {
        Self {
            config,
            started_at: Timestamp::default(),
            start_pos: Vec2::zeros(),
            done: false,
        }
    }
}

impl Detector for KickTimeoutDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::KickTimeout
    }

    fn active_states(&self) -> GameStateSet {
        KICK_STATES
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.started_at = frame.timestamp();
        self.start_pos = frame.ball_pos();
        self.done = false;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        if self.done {
            return Ok(None);
        }
        let frame = ctx.frame;
        let ball = frame.ball_pos();
        if (ball - self.start_pos).norm() > self.config.ball_moved_distance {
            self.done = true;
            return Ok(None);
        }
        let time = frame.timestamp().secs_since(self.started_at);
        if time <= self.config.timeout {
            return Ok(None);
        }
        self.done = true;

        let Some(team) = frame.game_state().for_team else {
            log::warn!("kick timeout in {} without a kicking team", frame.game_state());
            return Ok(Some(RuleOutcome::command(RefereeCommand::force_start())));
        };
        let event = GameEvent::KickTimeout {
            by_team: team,
            location: ball,
            time,
        };
        Ok(Some(
            RuleOutcome::event(event).with_command(RefereeCommand::force_start()),
        ))
    }
}
