use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome, RUNNING};
use crate::config::DribblingConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::geometry::Vec2;
use crate::model::{BotId, Frame, GameStateSet};

const PRIORITY: i32 = 70;

#[derive(Debug, Clone, Copy)]
struct Dribble {
    bot: BotId,
    start: Vec2,
    reported: bool,
}

/// A bot keeping continuous contact with the ball over too long a distance.
#[derive(Debug, Clone)]
pub struct DribblingDetector {
    config: DribblingConfig,
    restart_inset: f64,
    current: Option<Dribble>,
}

impl DribblingDetector {
    pub fn new(config: DribblingConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            current: None,
        }
    }
}

impl Detector for DribblingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Dribbling
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.current = None;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let ball = frame.ball_pos();

        let continuing = self.current.filter(|d| frame.is_touching(d.bot));
        let mut dribble = match continuing {
            Some(d) => d,
            None => {
                self.current = frame.facts.bots_touching_ball.first().map(|t| Dribble {
                    bot: t.bot,
                    start: ball,
                    reported: false,
                });
                return Ok(None);
            }
        };

        let distance = (ball - dribble.start).norm();
        if dribble.reported || distance <= self.config.max_dribble_distance {
            return Ok(None);
        }
        dribble.reported = true;
        self.current = Some(dribble);

        let event = GameEvent::BotDribbledBallTooFar {
            by_team: dribble.bot.team,
            by_bot: dribble.bot.number,
            start: dribble.start,
            end: ball,
        };
        let spot = restart_spot(ctx.field, &dribble.start, self.restart_inset);
        Ok(Some(RuleOutcome::stop(
            event,
            FollowUpAction::indirect_free(dribble.bot.team.opponent(), spot),
        )))
    }
}
