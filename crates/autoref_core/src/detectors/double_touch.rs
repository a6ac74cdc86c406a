use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome, KICK_STATES, RUNNING};
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::model::{BotId, Frame, GameStateKind, GameStateSet};

const PRIORITY: i32 = 78;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Activated during normal play; no restart kick to watch
    Disabled,
    WaitingForKick,
    Kicked { kicker: BotId, released: bool },
    Done,
}

/// The bot that took a restart touching the ball again before any other bot.
#[derive(Debug, Clone)]
pub struct DoubleTouchDetector {
    restart_inset: f64,
    phase: Phase,
}

impl DoubleTouchDetector {
    pub fn new(restart_inset: f64) -> Self {
        Self {
            restart_inset,
            phase: Phase::Disabled,
        }
    }
}

impl Detector for DoubleTouchDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::DoubleTouch
    }

    fn active_states(&self) -> GameStateSet {
        KICK_STATES.union(RUNNING)
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.phase = if frame.game_state().kind == GameStateKind::Running {
            Phase::Disabled
        } else {
            Phase::WaitingForKick
        };
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let touching = &frame.facts.bots_touching_ball;
        match self.phase {
            Phase::Disabled | Phase::Done => Ok(None),
            Phase::WaitingForKick => {
                if let Some(touch) = touching.first() {
                    log::debug!("restart taken by {}", touch.bot);
                    self.phase = Phase::Kicked {
                        kicker: touch.bot,
                        released: false,
                    };
                }
                Ok(None)
            }
            Phase::Kicked { kicker, released } => {
                if touching.iter().any(|t| t.bot != kicker) {
                    self.phase = Phase::Done;
                    return Ok(None);
                }
                let kicker_touching = frame.is_touching(kicker);
                if !released {
                    if !kicker_touching {
                        self.phase = Phase::Kicked {
                            kicker,
                            released: true,
                        };
                    }
                    return Ok(None);
                }
                if !kicker_touching {
                    return Ok(None);
                }

                self.phase = Phase::Done;
                let location = frame.ball_pos();
                let event = GameEvent::AttackerDoubleTouchedBall {
                    by_team: kicker.team,
                    by_bot: kicker.number,
                    location,
                };
                let spot = restart_spot(ctx.field, &location, self.restart_inset);
                Ok(Some(RuleOutcome::stop(
                    event,
                    FollowUpAction::indirect_free(kicker.team.opponent(), spot),
                )))
            }
        }
    }
}
