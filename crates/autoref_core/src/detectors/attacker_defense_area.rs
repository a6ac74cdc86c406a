use super::{DebouncedSet, Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::AttackerDefenseAreaConfig;
use crate::error::DetectorError;
use crate::events::GameEvent;
use crate::geometry::Vec2;
use crate::model::{BotId, Frame, GameStateKind, GameStateSet, Timestamp};

const PRIORITY: i32 = 30;

/// Attackers too close to the opponent defense area during a free kick.
#[derive(Debug, Clone)]
pub struct AttackerToDefenseAreaDetector {
    config: AttackerDefenseAreaConfig,
    started_at: Timestamp,
    kick_point: Vec2,
    kicked: bool,
    violators: DebouncedSet<BotId>,
}

impl AttackerToDefenseAreaDetector {
    pub fn new(config: AttackerDefenseAreaConfig) -> Self {
        Self {
            config,
            started_at: Timestamp::default(),
            kick_point: Vec2::zeros(),
            kicked: false,
            violators: DebouncedSet::new(),
        }
    }
}

impl Detector for AttackerToDefenseAreaDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::AttackerToDefenseArea
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::of(&[GameStateKind::DirectFree, GameStateKind::IndirectFree])
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
        if self.kicked || (frame.ball_pos() - self.kick_point).norm() > self.config.ball_moved_distance {
            self.kicked = true;
            return Ok(None);
        }
        if now.secs_since(self.started_at) < self.config.grace_period {
            return Ok(None);
        }
        let Some(attacking) = frame.game_state().for_team else {
            return Ok(None);
        };

        let area = ctx.field.penalty_area(-frame.own_goal_sign(attacking));
        let cooldown = self.config.violator_cooldown_time;
        for bot in frame.world.bots_of(attacking) {
            let distance = area.signed_distance(&bot.pos) - ctx.field.bot_radius;
            if distance >= self.config.min_distance || self.violators.reported_within(&bot.id, now, cooldown) {
                continue;
            }
            self.violators.mark_reported(bot.id, now);
            return Ok(Some(RuleOutcome::event(GameEvent::AttackerTooCloseToDefenseArea {
                by_team: attacking,
                by_bot: bot.id.number,
                location: bot.pos,
                distance,
            })));
        }
        Ok(None)
    }
}
