use super::{Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::StopStateConfig;
use crate::error::DetectorError;
use crate::events::RefereeCommand;
use crate::model::{Frame, GameStateKind, GameStateSet, Timestamp};

const PRIORITY: i32 = 10;

/// Drives the game out of STOP towards the queued follow-up.
///
/// Once the bots had time to settle the ball is placed at the follow-up
/// position if needed; otherwise the restart is issued as soon as every bot
/// keeps its distance from the ball. Each command is sent once per STOP.
#[derive(Debug, Clone)]
pub struct StopStateRule {
    config: StopStateConfig,
    placement_tolerance: f64,
    entered_at: Timestamp,
    placement_sent: bool,
    restart_sent: bool,
}

impl StopStateRule {
    pub fn new(config: StopStateConfig, placement_tolerance: f64) -> Self {
        Self {
            config,
            placement_tolerance,
            entered_at: Timestamp::default(),
            placement_sent: false,
            restart_sent: false,
        }
    }
}

impl Detector for StopStateRule {
    fn kind(&self) -> DetectorKind {
        DetectorKind::StopState
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::of(&[GameStateKind::Stop])
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.entered_at = frame.timestamp();
        self.placement_sent = false;
        self.restart_sent = false;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        if frame.timestamp().secs_since(self.entered_at) < self.config.ready_wait {
            return Ok(None);
        }
        let Some(follow_up) = ctx.follow_up else {
            return Ok(None);
        };
        let ball = frame.ball_pos();

        if let Some(target) = follow_up.position {
            if (ball - target).norm() > self.placement_tolerance {
                if self.placement_sent {
                    return Ok(None);
                }
                self.placement_sent = true;
                log::debug!("ball placement for {} to ({:.0}, {:.0})", follow_up.team, target.x, target.y);
                return Ok(Some(RuleOutcome::command(RefereeCommand::ball_placement(
                    follow_up.team,
                    target,
                ))));
            }
        }

        if self.restart_sent {
            return Ok(None);
        }
        let bot_radius = ctx.field.bot_radius;
        let clear = frame
            .world
            .bots
            .values()
            .all(|bot| (bot.pos - ball).norm() - bot_radius >= self.config.min_bot_ball_distance);
        if !clear {
            return Ok(None);
        }
        self.restart_sent = true;
        Ok(Some(RuleOutcome::command(follow_up.to_command())))
    }
}
