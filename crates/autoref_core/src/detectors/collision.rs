use super::{restart_spot, DebouncedSet, Detector, DetectorContext, DetectorKind, RuleOutcome, RUNNING};
use crate::config::CollisionConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::model::{BotId, GameStateSet, TeamColor, TrackedBot};

const PRIORITY: i32 = 80;

/// Crashes between opposing bots.
///
/// The crash speed is the closing speed along the line between the bot
/// centres. If both bots were about equally fast the crash is drawn and only
/// reported; otherwise the faster bot is the violator.
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    config: CollisionConfig,
    restart_inset: f64,
    /// (yellow, blue)
    pairs: DebouncedSet<(BotId, BotId)>,
}

impl CollisionDetector {
    pub fn new(config: CollisionConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            pairs: DebouncedSet::new(),
        }
    }

    /// Closing speed (m/s), positive when the bots approach each other.
    fn closing_speed(a: &TrackedBot, b: &TrackedBot) -> f64 {
        let offset = b.pos - a.pos;
        let dist = offset.norm();
        if dist <= f64::EPSILON {
            return 0.0;
        }
        (a.vel - b.vel).dot(&(offset / dist))
    }
}

impl Detector for CollisionDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Collision
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let now = frame.timestamp();
        let cooldown = self.config.pair_cooldown_time;
        let contact = 2.0 * ctx.field.bot_radius + self.config.contact_margin;
        self.pairs.expire_reports(now, cooldown);

        for yellow in frame.world.bots_of(TeamColor::Yellow) {
            for blue in frame.world.bots_of(TeamColor::Blue) {
                if (yellow.pos - blue.pos).norm() >= contact {
                    continue;
                }
                let crash_speed = Self::closing_speed(yellow, blue);
                if crash_speed <= self.config.max_crash_speed {
                    continue;
                }
                let key = (yellow.id, blue.id);
                if self.pairs.reported_within(&key, now, cooldown) {
                    continue;
                }
                self.pairs.mark_reported(key, now);

                let location = (yellow.pos + blue.pos) / 2.0;
                let speed_diff = yellow.speed() - blue.speed();
                if speed_diff.abs() < self.config.drawn_speed_difference {
                    return Ok(Some(RuleOutcome::event(GameEvent::BotCrashDrawn {
                        bot_yellow: yellow.id.number,
                        bot_blue: blue.id.number,
                        location,
                        crash_speed,
                        speed_diff: speed_diff.abs(),
                    })));
                }
                let (violator, victim) = if speed_diff > 0.0 {
                    (yellow.id, blue.id)
                } else {
                    (blue.id, yellow.id)
                };
                log::debug!("{} crashed into {} at {:.2} m/s", violator, victim, crash_speed);
                let event = GameEvent::BotCrashUnique {
                    by_team: violator.team,
                    violator: violator.number,
                    victim: victim.number,
                    location,
                    crash_speed,
                    speed_diff: speed_diff.abs(),
                };
                let spot = restart_spot(ctx.field, &location, self.restart_inset);
                return Ok(Some(RuleOutcome::stop(
                    event,
                    FollowUpAction::direct_free(victim.team, spot),
                )));
            }
        }
        Ok(None)
    }
}
