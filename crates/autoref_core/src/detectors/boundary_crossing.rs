use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome, RUNNING};
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::model::{Frame, GameStateSet};

const PRIORITY: i32 = 98;

/// Ball kicked over the field boundary wall.
#[derive(Debug, Clone)]
pub struct BoundaryCrossingDetector {
    restart_inset: f64,
    outside: bool,
}

impl BoundaryCrossingDetector {
    pub fn new(restart_inset: f64) -> Self {
        Self {
            restart_inset,
            outside: false,
        }
    }
}

impl Detector for BoundaryCrossingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BoundaryCrossing
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.outside = false;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let ball = frame.ball_pos();
        let boundary = ctx.field.boundary_rect();
        if boundary.contains(&ball) {
            self.outside = false;
            return Ok(None);
        }
        if self.outside {
            return Ok(None);
        }
        self.outside = true;

        let Some(touch) = frame.facts.bot_last_touched_ball else {
            log::debug!("ball crossed the boundary without a known last touch");
            return Ok(None);
        };
        let location = boundary.nearest_point_on_boundary(&ball);
        let spot = restart_spot(ctx.field, &location, self.restart_inset);
        let event = GameEvent::BoundaryCrossing {
            by_team: touch.bot.team,
            location,
        };
        Ok(Some(RuleOutcome::stop(
            event,
            FollowUpAction::indirect_free(touch.bot.team.opponent(), spot),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BotId, TeamColor};
    use crate::test_fixtures::{scene, Harness};

    #[test]
    fn test_fires_once_per_excursion() {
        let mut det = BoundaryCrossingDetector::new(200.0);
        let mut h = Harness::new();
        let inside = scene(0).ball(5000.0, 4000.0).last_touch(BotId::blue(1), 0.0);
        assert!(h.run(&mut det, inside.frame()).is_none());

        let over = scene(1).ball(5000.0, 4900.0).last_touch(BotId::blue(1), 0.0);
        let outcome = h.run(&mut det, over.frame()).expect("crossing");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::BoundaryCrossing { by_team: TeamColor::Blue, .. })
        ));
        let follow_up = outcome.follow_up.expect("follow-up");
        assert_eq!(follow_up.team, TeamColor::Yellow);
        assert_eq!(follow_up.position.map(|p| p.y), Some(4300.0));

        let still_over = scene(2).ball(5000.0, 5000.0).last_touch(BotId::blue(1), 0.0);
        assert!(h.run(&mut det, still_over.frame()).is_none());
    }
}
