use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::PenaltyKickConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::model::{Frame, GameStateKind, GameStateSet, TeamColor, Timestamp};

const PRIORITY: i32 = 66;

/// Penalty kick that did not end in a goal.
///
/// Fails on timeout, on the ball leaving the field outside the goal mouth,
/// or on a defender touching the ball.
#[derive(Debug, Clone)]
pub struct PenaltyKickFailedDetector {
    config: PenaltyKickConfig,
    restart_inset: f64,
    started_at: Timestamp,
    done: bool,
}

impl PenaltyKickFailedDetector {
    pub fn new(config: PenaltyKickConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            started_at: Timestamp::default(),
            done: false,
        }
    }

    fn failure(&self, ctx: &DetectorContext, kicker: TeamColor) -> Option<&'static str> {
        let frame = ctx.frame;
        if frame.timestamp().secs_since(self.started_at) > self.config.timeout {
            return Some("timeout");
        }
        if let Some(crossing) = frame.facts.ball_left_field {
            let in_mouth = ctx.field.is_goal_line_crossing(&crossing.pos)
                && crossing.pos.y.abs() <= ctx.field.goal_width / 2.0;
            if !in_mouth {
                return Some("ball left the field");
            }
        }
        let defended = frame
            .facts
            .bots_touching_ball
            .iter()
            .any(|t| t.bot.team != kicker);
        defended.then_some("defender touched the ball")
    }
}

impl Detector for PenaltyKickFailedDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::PenaltyKickFailed
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::of(&[GameStateKind::Penalty])
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.started_at = frame.timestamp();
        self.done = false;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        if self.done {
            return Ok(None);
        }
        let frame = ctx.frame;
        let Some(kicker) = frame.game_state().for_team else {
            log::debug!("penalty without a kicking team");
            return Ok(None);
        };
        let Some(reason) = self.failure(ctx, kicker) else {
            return Ok(None);
        };
        self.done = true;
        log::info!("penalty kick by {} failed: {}", kicker, reason);

        let location = frame.ball_pos();
        let spot = restart_spot(ctx.field, &location, self.restart_inset);
        Ok(Some(RuleOutcome::stop(
            GameEvent::PenaltyKickFailed {
                by_team: kicker,
                location,
            },
            FollowUpAction::direct_free(kicker.opponent(), spot),
        )))
    }
}
