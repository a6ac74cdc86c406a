use super::{outside_defense_area, Detector, DetectorContext, DetectorKind, RuleOutcome, RUNNING};
use crate::config::KeeperHeldBallConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::model::{Frame, GameStateSet, Timestamp};

const PRIORITY: i32 = 68;

#[derive(Debug, Clone, Copy)]
struct Hold {
    goal_sign: f64,
    since: Timestamp,
    reported: bool,
}

/// Ball kept inside a defense area for too long.
#[derive(Debug, Clone)]
pub struct KeeperHeldBallDetector {
    config: KeeperHeldBallConfig,
    restart_inset: f64,
    hold: Option<Hold>,
}

impl KeeperHeldBallDetector {
    pub fn new(config: KeeperHeldBallConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            hold: None,
        }
    }
}

impl Detector for KeeperHeldBallDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::KeeperHeldBall
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.hold = None;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let ball = frame.ball_pos();
        let now = frame.timestamp();

        let area_sign = [1.0, -1.0]
            .into_iter()
            .find(|sign| ctx.field.penalty_area(*sign).contains(&ball));
        let Some(goal_sign) = area_sign else {
            self.hold = None;
            return Ok(None);
        };
        let hold = match self.hold {
            Some(h) if h.goal_sign == goal_sign => h,
            _ => Hold {
                goal_sign,
                since: now,
                reported: false,
            },
        };
        self.hold = Some(hold);

        let duration = now.secs_since(hold.since);
        if hold.reported || duration <= self.config.max_hold_time {
            return Ok(None);
        }
        self.hold = Some(Hold {
            reported: true,
            ..hold
        });

        let team = frame.referee.goal_owner(goal_sign);
        let spot = outside_defense_area(
            ctx.field,
            goal_sign,
            &ball,
            self.config.restart_distance,
            self.restart_inset,
        );
        let event = GameEvent::KeeperHeldBall {
            by_team: team,
            location: ball,
            duration,
        };
        Ok(Some(RuleOutcome::stop(
            event,
            FollowUpAction::indirect_free(team.opponent(), spot),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::model::TeamColor;
    use crate::test_fixtures::{config, scene, Harness};

    fn detector() -> KeeperHeldBallDetector {
        let cfg = config();
        KeeperHeldBallDetector::new(cfg.detectors.keeper_held_ball, cfg.detectors.restart.inset)
    }

    #[test]
    fn test_hold_timeout() {
        let mut det = detector();
        let mut h = Harness::new();
        let frames = (0..8).map(|s| scene(s).at_secs(s as f64).ball(5500.0, 0.0).frame());
        let outcomes = h.run_all(&mut det, frames);
        assert_eq!(outcomes.len(), 1);
        match &outcomes[0].event {
            Some(GameEvent::KeeperHeldBall { by_team, duration, .. }) => {
                assert_eq!(*by_team, TeamColor::Yellow);
                assert!((duration - 6.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
        let follow_up = outcomes[0].follow_up.expect("follow-up");
        assert_eq!(follow_up.team, TeamColor::Blue);
        assert_eq!(follow_up.position, Some(Vec2::new(3600.0, 0.0)));
    }

    #[test]
    fn test_leaving_area_resets_timer() {
        let mut det = detector();
        let mut h = Harness::new();
        let frames = (0..8).map(|s| {
            let x = if s == 4 { 3000.0 } else { 5500.0 };
            scene(s).at_secs(s as f64).ball(x, 0.0).frame()
        });
        assert!(h.run_all(&mut det, frames).is_empty());
    }
}
