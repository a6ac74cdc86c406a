use fxhash::{FxHashMap, FxHashSet};

use super::{Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::StopSpeedConfig;
use crate::error::DetectorError;
use crate::events::GameEvent;
use crate::model::{BotId, Frame, GameStateKind, GameStateSet, Timestamp};

const PRIORITY: i32 = 40;

/// Bots moving faster than allowed during STOP.
///
/// Over-speed time is accumulated per bot and decays while the bot is slow,
/// so short spikes from tracking noise never add up to a violation.
#[derive(Debug, Clone)]
pub struct BotStopSpeedDetector {
    config: StopSpeedConfig,
    entered_at: Timestamp,
    last_update: Option<Timestamp>,
    over_speed: FxHashMap<BotId, f64>,
    flagged: FxHashSet<BotId>,
}

impl BotStopSpeedDetector {
    pub fn new(config: StopSpeedConfig) -> Self {
        Self {
            config,
            entered_at: Timestamp::default(),
            last_update: None,
            over_speed: FxHashMap::default(),
            flagged: FxHashSet::default(),
        }
    }
}

impl Detector for BotStopSpeedDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BotStopSpeed
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::of(&[GameStateKind::Stop])
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.entered_at = frame.timestamp();
        self.last_update = None;
        self.over_speed.clear();
        self.flagged.clear();
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let now = frame.timestamp();
        let dt = self.last_update.map_or(0.0, |t| now.secs_since(t));
        self.last_update = Some(now);
        if now.secs_since(self.entered_at) < self.config.grace_period {
            return Ok(None);
        }

        let mut violator = None;
        for bot in frame.world.bots.values() {
            let total = self.over_speed.entry(bot.id).or_insert(0.0);
            if bot.speed() > self.config.max_speed {
                *total += dt;
            } else {
                *total = (*total - dt).max(0.0);
            }
            if *total <= 0.0 {
                self.flagged.remove(&bot.id);
            } else if *total > self.config.min_violation_duration
                && violator.is_none()
                && !self.flagged.contains(&bot.id)
            {
                violator = Some(bot);
            }
        }
        self.over_speed.retain(|id, _| frame.world.bots.contains_key(id));

        let Some(bot) = violator else {
            return Ok(None);
        };
        self.flagged.insert(bot.id);
        Ok(Some(RuleOutcome::event(GameEvent::BotTooFastInStop {
            by_team: bot.id.team,
            by_bot: bot.id.number,
            location: bot.pos,
            speed: bot.speed(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameState, TeamColor};
    use crate::test_fixtures::{config, scene, Harness};

    fn detector() -> BotStopSpeedDetector {
        BotStopSpeedDetector::new(config().detectors.stop_speed)
    }

    fn stop_frame(i: u64, vx: f64) -> Frame {
        scene(i)
            .at_secs(i as f64 * 0.1)
            .state(GameState::STOP)
            .bot_vel(BotId::blue(5), 0.0, 0.0, vx, 0.0)
            .frame()
    }

    #[test]
    fn test_grace_period_then_single_report() {
        let mut det = detector();
        let mut h = Harness::new();
        let mut outcomes = Vec::new();
        for i in 0..=40 {
            if let Some(outcome) = h.run(&mut det, stop_frame(i, 2.0)) {
                outcomes.push((i, outcome));
            }
        }
        assert_eq!(outcomes.len(), 1);
        let (tick, outcome) = &outcomes[0];
        assert!(*tick > 20 && *tick < 25);
        assert!(matches!(
            outcome.event,
            Some(GameEvent::BotTooFastInStop { by_team: TeamColor::Blue, by_bot: 5, .. })
        ));
    }

    #[test]
    fn test_reported_again_after_slowing_down() {
        let mut det = detector();
        let mut h = Harness::new();
        let speeds = (0..=30)
            .map(|_| 2.0)
            .chain((0..20).map(|_| 0.5))
            .chain((0..10).map(|_| 2.0));
        let frames = speeds.enumerate().map(|(i, v)| stop_frame(i as u64, v));
        assert_eq!(h.run_all(&mut det, frames).len(), 2);
    }

    #[test]
    fn test_short_spikes_do_not_accumulate() {
        let mut det = detector();
        let mut h = Harness::new();
        let frames = (0..60).map(|i| stop_frame(i, if i % 2 == 0 { 2.0 } else { 0.5 }));
        assert!(h.run_all(&mut det, frames).is_empty());
    }
}
