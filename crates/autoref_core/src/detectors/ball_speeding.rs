use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome, KICK_STATES, RUNNING};
use crate::config::BallSpeedingConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::geometry::Vec2;
use crate::model::{BotId, Frame, GameStateKind, GameStateSet, Timestamp};

const PRIORITY: i32 = 75;

/// Who kicked, from where and when
#[derive(Debug, Clone, Copy, PartialEq)]
struct Kick {
    bot: BotId,
    pos: Vec2,
    at: Timestamp,
}

impl Kick {
    fn of(frame: &Frame) -> Result<Option<Kick>, DetectorError> {
        if let Some(kick) = &frame.world.kick_event {
            if kick.timestamp > frame.timestamp() {
                return Err(DetectorError::InconsistentKick(format!(
                    "kick by {} is {:.3}s ahead of the frame",
                    kick.kicking_bot,
                    kick.timestamp.secs_since(frame.timestamp())
                )));
            }
            return Ok(Some(Kick {
                bot: kick.kicking_bot,
                pos: kick.position,
                at: kick.timestamp,
            }));
        }
        Ok(frame.facts.bot_last_touched_ball.map(|touch| Kick {
            bot: touch.bot,
            pos: touch.pos,
            at: touch.timestamp,
        }))
    }
}

/// Ball kicked faster than the speed limit.
#[derive(Debug, Clone)]
pub struct BallSpeedingDetector {
    config: BallSpeedingConfig,
    restart_inset: f64,
    kick: Option<Kick>,
    frames_over: u32,
    top_speed: f64,
    reported: bool,
}

impl BallSpeedingDetector {
    pub fn new(config: BallSpeedingConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            kick: None,
            frames_over: 0,
            top_speed: 0.0,
            reported: false,
        }
    }
}

impl Detector for BallSpeedingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BallSpeeding
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
            .union(KICK_STATES)
            .union(GameStateSet::of(&[GameStateKind::Penalty]))
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.frames_over = 0;
        self.top_speed = 0.0;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let kick = Kick::of(frame)?;
        if kick.map(|k| (k.bot, k.at)) != self.kick.map(|k| (k.bot, k.at)) {
            self.kick = kick;
            self.reported = false;
        }

        let speed = frame.world.ball.speed();
        if speed <= self.config.max_ball_speed {
            self.frames_over = 0;
            self.top_speed = 0.0;
            return Ok(None);
        }
        self.frames_over += 1;
        self.top_speed = self.top_speed.max(speed);
        if self.frames_over < self.config.min_frames || self.reported {
            return Ok(None);
        }
        self.reported = true;

        let Some(kick) = self.kick else {
            log::debug!("ball at {:.2} m/s without a known kicker", speed);
            return Ok(None);
        };
        let event = GameEvent::BotKickedBallTooFast {
            by_team: kick.bot.team,
            by_bot: Some(kick.bot.number),
            location: kick.pos,
            initial_ball_speed: self.top_speed,
            chipped: frame.world.ball.chipped,
        };
        let spot = restart_spot(ctx.field, &kick.pos, self.restart_inset);
        Ok(Some(RuleOutcome::stop(
            event,
            FollowUpAction::indirect_free(kick.bot.team.opponent(), spot),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TeamColor;
    use crate::test_fixtures::{config, scene, Harness};

    fn detector() -> BallSpeedingDetector {
        let cfg = config();
        BallSpeedingDetector::new(cfg.detectors.ball_speeding, cfg.detectors.restart.inset)
    }

    fn flying(tick: u64, speed: f64, kick_secs: f64) -> Frame {
        scene(tick)
            .ball(500.0, 0.0)
            .ball_vel(speed, 0.0)
            .kick(BotId::blue(3), 100.0, 0.0, kick_secs)
            .frame()
    }

    #[test]
    fn test_fires_after_consecutive_frames_once_per_kick() {
        let mut det = detector();
        let mut h = Harness::new();
        let outcomes = h.run_all(&mut det, (0..6).map(|t| flying(t, 7.0 + t as f64 * 0.1, 0.0)));
        assert_eq!(outcomes.len(), 1);
        match &outcomes[0].event {
            Some(GameEvent::BotKickedBallTooFast {
                by_team,
                by_bot,
                location,
                initial_ball_speed,
                ..
            }) => {
                assert_eq!(*by_team, TeamColor::Blue);
                assert_eq!(*by_bot, Some(3));
                assert_eq!(*location, Vec2::new(100.0, 0.0));
                assert!((initial_ball_speed - 7.2).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }

        // A new kick may be reported again
        let again = h.run_all(&mut det, (6..9).map(|t| flying(t, 7.0, 0.1)));
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_kick_from_the_future_rejected() {
        let mut det = detector();
        let mut h = Harness::new();
        h.history.push(flying(0, 7.0, 5.0));
        let ctx = DetectorContext {
            frame: h.history.latest().expect("frame"),
            history: &h.history,
            field: &h.field,
            follow_up: None,
        };
        assert!(matches!(det.update(&ctx), Err(DetectorError::InconsistentKick(_))));
    }

    #[test]
    fn test_short_spike_ignored() {
        let mut det = detector();
        let mut h = Harness::new();
        let frames = vec![
            flying(0, 7.0, 0.0),
            flying(1, 7.0, 0.0),
            flying(2, 5.0, 0.0),
            flying(3, 7.0, 0.0),
        ];
        assert!(h.run_all(&mut det, frames).is_empty());
    }
}
