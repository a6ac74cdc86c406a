use super::{DebouncedSet, Detector, DetectorContext, DetectorKind, RuleOutcome, KICK_STATES};
use crate::config::KickPointDistanceConfig;
use crate::error::DetectorError;
use crate::events::GameEvent;
use crate::geometry::Vec2;
use crate::model::{BotId, Frame, GameStateSet, Timestamp};

const PRIORITY: i32 = 35;

/// Defenders too close to the ball before a restart is taken.
#[derive(Debug, Clone)]
pub struct DefenderToKickPointDetector {
    config: KickPointDistanceConfig,
    started_at: Timestamp,
    kick_point: Vec2,
    kicked: bool,
    violators: DebouncedSet<BotId>,
}

impl DefenderToKickPointDetector {
    pub fn new(config: KickPointDistanceConfig) -> Self {
        Self {
            config,
            started_at: Timestamp::default(),
            kick_point: Vec2::zeros(),
            kicked: false,
            violators: DebouncedSet::new(),
        }
    }
}

impl Detector for DefenderToKickPointDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::DefenderToKickPoint
    }

    fn active_states(&self) -> GameStateSet {
        KICK_STATES
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.started_at = frame.timestamp();
        self.kick_point = frame.ball_pos();
        self.kicked = false;
        self.violators.clear();
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let now = frame.timestamp();
        let ball = frame.ball_pos();
        if self.kicked || (ball - self.kick_point).norm() > self.config.ball_moved_distance {
            self.kicked = true;
            return Ok(None);
        }
        if now.secs_since(self.started_at) < self.config.grace_period {
            return Ok(None);
        }
        let Some(attacking) = frame.game_state().for_team else {
            return Ok(None);
        };

        let cooldown = self.config.violator_cooldown_time;
        for bot in frame.world.bots_of(attacking.opponent()) {
            let distance = (bot.pos - ball).norm() - ctx.field.bot_radius;
            if distance >= self.config.min_distance || self.violators.reported_within(&bot.id, now, cooldown) {
                continue;
            }
            self.violators.mark_reported(bot.id, now);
            return Ok(Some(RuleOutcome::event(GameEvent::DefenderTooCloseToKickPoint {
                by_team: bot.id.team,
                by_bot: bot.id.number,
                location: bot.pos,
                distance,
            })));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameState, GameStateKind, TeamColor};
    use crate::test_fixtures::{config, scene, Harness};

    const FREE_KICK: GameState = GameState::for_team(GameStateKind::DirectFree, TeamColor::Yellow);

    fn frame(i: u64, ball_x: f64) -> Frame {
        scene(i)
            .at_secs(i as f64 * 0.5)
            .state(FREE_KICK)
            .ball(ball_x, 0.0)
            .bot(BotId::blue(3), 300.0, 0.0)
            .bot(BotId::yellow(1), -150.0, 0.0)
            .frame()
    }

    #[test]
    fn test_reports_after_grace_with_cooldown() {
        let mut det = DefenderToKickPointDetector::new(config().detectors.kick_point_distance);
        let mut h = Harness::new();
        let mut hits = Vec::new();
        for i in 0..12 {
            if let Some(outcome) = h.run(&mut det, frame(i, 0.0)) {
                hits.push(i);
                match outcome.event {
                    Some(GameEvent::DefenderTooCloseToKickPoint { by_team, by_bot, distance, .. }) => {
                        assert_eq!((by_team, by_bot), (TeamColor::Blue, 3));
                        assert!((distance - 210.0).abs() < 1e-9);
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
        }
        // grace 2 s, cooldown 2 s, 0.5 s per frame
        assert_eq!(hits, vec![4, 8]);
    }

    #[test]
    fn test_silent_once_kicked() {
        let mut det = DefenderToKickPointDetector::new(config().detectors.kick_point_distance);
        let mut h = Harness::new();
        let frames = (0..12).map(|i| frame(i, if i >= 2 { 100.0 } else { 0.0 }));
        assert!(h.run_all(&mut det, frames).is_empty());
    }
}
