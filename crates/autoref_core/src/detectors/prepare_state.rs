use super::{Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::PrepareStateConfig;
use crate::error::DetectorError;
use crate::events::RefereeCommand;
use crate::model::{Frame, GameStateKind, GameStateSet, Timestamp};

const PRIORITY: i32 = 5;

/// Normal start for a prepared kickoff or penalty once the ball is at rest.
#[derive(Debug, Clone)]
pub struct PrepareStateRule {
    config: PrepareStateConfig,
    entered_at: Timestamp,
    sent: bool,
}

impl PrepareStateRule {
    pub fn new(config: PrepareStateConfig) -> Self {
        Self {
            config,
            entered_at: Timestamp::default(),
            sent: false,
        }
    }
}

impl Detector for PrepareStateRule {
    fn kind(&self) -> DetectorKind {
        DetectorKind::PrepareState
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::of(&[GameStateKind::PrepareKickoff, GameStateKind::PreparePenalty])
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.entered_at = frame.timestamp();
        self.sent = false;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        if self.sent
            || frame.timestamp().secs_since(self.entered_at) < self.config.ready_wait
            || frame.world.ball.speed() >= self.config.max_ball_speed
        {
            return Ok(None);
        }
        self.sent = true;
        Ok(Some(RuleOutcome::command(RefereeCommand::normal_start())))
    }
}
