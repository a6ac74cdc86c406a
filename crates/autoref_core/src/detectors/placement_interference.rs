use super::{DebouncedSet, Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::PlacementInterferenceConfig;
use crate::error::DetectorError;
use crate::events::GameEvent;
use crate::geometry::Tube;
use crate::model::{BotId, Frame, GameStateKind, GameStateSet};

const PRIORITY: i32 = 45;

/// Opponents standing in the way of a ball placement.
///
/// Only bots that stay inside the corridor between ball and target for
/// `violation_time` are reported; leaving the corridor resets the timer.
#[derive(Debug, Clone)]
pub struct PlacementInterferenceDetector {
    config: PlacementInterferenceConfig,
    violators: DebouncedSet<BotId>,
}

impl PlacementInterferenceDetector {
    pub fn new(config: PlacementInterferenceConfig) -> Self {
        Self {
            config,
            violators: DebouncedSet::new(),
        }
    }
}

impl Detector for PlacementInterferenceDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::PlacementInterference
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::of(&[GameStateKind::BallPlacement])
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.violators.clear();
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let now = frame.timestamp();
        let (Some(placing), Some(target)) = (frame.game_state().for_team, frame.referee.designated_position) else {
            return Ok(None);
        };
        let tube = Tube::new(frame.ball_pos(), target, self.config.tube_radius);

        for bot in frame.world.bots_of(placing.opponent()) {
            if tube.intersects_circle(&bot.pos, ctx.field.bot_radius) {
                self.violators.observe(bot.id, now);
            }
        }
        self.violators.retain_observed(now);

        for bot in frame.world.bots_of(placing.opponent()) {
            let held = self.violators.held_for(&bot.id, now).unwrap_or(0.0);
            if held < self.config.violation_time {
                continue;
            }
            self.violators.remove(&bot.id);
            return Ok(Some(RuleOutcome::event(GameEvent::BotInterferedPlacement {
                by_team: bot.id.team,
                by_bot: bot.id.number,
                location: bot.pos,
            })));
        }
        Ok(None)
    }
}
