use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome, RUNNING};
use crate::config::NoProgressConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::model::{Frame, GameStateSet, TimedPosition};

const PRIORITY: i32 = 60;

/// Ball stuck in one place during normal play.
#[derive(Debug, Clone)]
pub struct NoProgressDetector {
    config: NoProgressConfig,
    restart_inset: f64,
    anchor: Option<TimedPosition>,
}

impl NoProgressDetector {
    pub fn new(config: NoProgressConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            anchor: None,
        }
    }
}

impl Detector for NoProgressDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::NoProgress
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.anchor = None;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let here = TimedPosition {
            pos: frame.ball_pos(),
            timestamp: frame.timestamp(),
        };
        let anchor = match self.anchor {
            Some(a) if (here.pos - a.pos).norm() <= self.config.radius => a,
            _ => {
                self.anchor = Some(here);
                return Ok(None);
            }
        };

        let time = here.timestamp.secs_since(anchor.timestamp);
        if time <= self.config.timeout {
            return Ok(None);
        }
        self.anchor = Some(here);
        log::info!("no progress for {:.1} s at ({:.0}, {:.0})", time, here.pos.x, here.pos.y);

        // Teams restart from their own half
        let team = frame.referee.goal_owner(here.pos.x.signum());
        let spot = restart_spot(ctx.field, &here.pos, self.restart_inset);
        Ok(Some(RuleOutcome::stop(
            GameEvent::NoProgressInGame {
                location: here.pos,
                time,
            },
            FollowUpAction::force_start(team, spot),
        )))
    }
}
