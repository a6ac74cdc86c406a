use super::{
    outside_defense_area, DebouncedSet, Detector, DetectorContext, DetectorKind, RuleOutcome,
    RUNNING,
};
use crate::config::DefenseAreaConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::geometry::{Field, Ray};
use crate::model::{BotId, BotTouchRecord, Frame, GameStateSet, Timestamp, TrackedBot};

const PRIORITY: i32 = 90;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Overlap {
    Full,
    Partial,
}

/// Ball touched by a bot inside a defense area.
///
/// Attackers may not touch the ball in the opponent area at all; defenders
/// other than the keeper may not touch it in their own. A defender that was
/// pushed into its own area by a contacting attacker is exempt.
#[derive(Debug, Clone)]
pub struct BotInDefenseAreaDetector {
    config: DefenseAreaConfig,
    restart_inset: f64,
    activated_at: Timestamp,
    violators: DebouncedSet<BotId>,
}

impl BotInDefenseAreaDetector {
    pub fn new(config: DefenseAreaConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            activated_at: Timestamp::default(),
            violators: DebouncedSet::new(),
        }
    }

    fn overlap(field: &Field, goal_sign: f64, bot: &TrackedBot, partial_margin: f64) -> Option<(Overlap, f64)> {
        let area = field.penalty_area(goal_sign);
        let overlap = field.bot_radius - area.signed_distance(&bot.pos);
        if overlap >= 2.0 * field.bot_radius {
            Some((Overlap::Full, overlap))
        } else if overlap > partial_margin {
            Some((Overlap::Partial, overlap))
        } else {
            None
        }
    }

    /// An opponent in contact whose push line runs through the defender into
    /// the area.
    fn was_pushed(&self, frame: &Frame, field: &Field, defender: &TrackedBot, goal_sign: f64) -> bool {
        let contact = 2.0 * field.bot_radius + self.config.push_contact_margin;
        let area = field.penalty_area(goal_sign);
        frame.world.bots_of(defender.id.team.opponent()).any(|attacker| {
            let offset = defender.pos - attacker.pos;
            if offset.norm() >= contact {
                return false;
            }
            Ray::new(attacker.pos, offset)
                .map_or(false, |ray| ray.hits(&area, offset.norm() + 2.0 * field.bot_radius))
        })
    }

    fn judge(&self, ctx: &DetectorContext, touch: &BotTouchRecord) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let field = ctx.field;
        let bot = frame.bot(touch.bot).ok_or(DetectorError::MissingBot(touch.bot))?;
        let team = touch.bot.team;
        let own_sign = frame.own_goal_sign(team);
        let margin = self.config.partial_touch_margin;

        if let Some((overlap, distance)) = Self::overlap(field, -own_sign, bot, margin) {
            let spot = outside_defense_area(
                field,
                -own_sign,
                &frame.ball_pos(),
                self.config.restart_distance,
                self.restart_inset,
            );
            let (by_team, by_bot, location) = (team, touch.bot.number, bot.pos);
            let event = match overlap {
                Overlap::Full => GameEvent::AttackerInDefenseArea { by_team, by_bot, location, distance },
                Overlap::Partial => {
                    GameEvent::AttackerInDefenseAreaPartially { by_team, by_bot, location, distance }
                }
            };
            return Ok(Some(RuleOutcome::stop(
                event,
                FollowUpAction::indirect_free(team.opponent(), spot),
            )));
        }

        if frame.referee.is_keeper(touch.bot) {
            return Ok(None);
        }
        let Some((overlap, distance)) = Self::overlap(field, own_sign, bot, margin) else {
            return Ok(None);
        };
        if self.was_pushed(frame, field, bot, own_sign) {
            log::debug!("{} pushed into its own defense area; not a foul", touch.bot);
            return Ok(None);
        }
        let (by_team, by_bot, location) = (team, touch.bot.number, bot.pos);
        let outcome = match overlap {
            Overlap::Full => RuleOutcome::stop(
                GameEvent::MultipleDefender { by_team, by_bot, location, distance },
                FollowUpAction::penalty(team.opponent(), field.penalty_mark(own_sign)),
            ),
            Overlap::Partial => {
                let spot = outside_defense_area(
                    field,
                    own_sign,
                    &frame.ball_pos(),
                    self.config.restart_distance,
                    self.restart_inset,
                );
                RuleOutcome::stop(
                    GameEvent::MultipleDefenderPartially { by_team, by_bot, location, distance },
                    FollowUpAction::direct_free(team.opponent(), spot),
                )
            }
        };
        Ok(Some(outcome))
    }
}

impl Detector for BotInDefenseAreaDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BotInDefenseArea
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.activated_at = frame.timestamp();
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let now = ctx.frame.timestamp();
        let earliest = self.activated_at.plus_secs(self.config.activation_grace);
        self.violators
            .expire_reports(now, self.config.violator_cooldown_time);

        for touch in &ctx.frame.facts.bots_touching_ball {
            if touch.timestamp < earliest {
                continue;
            }
            if self
                .violators
                .reported_within(&touch.bot, now, self.config.violator_cooldown_time)
            {
                continue;
            }
            match self.judge(ctx, touch) {
                Ok(Some(outcome)) => {
                    self.violators.mark_reported(touch.bot, now);
                    return Ok(Some(outcome));
                }
                Ok(None) => {}
                Err(DetectorError::MissingBot(bot)) => {
                    log::warn!("bot {} touches the ball but is not tracked, skipping", bot);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FollowUpKind;
    use crate::geometry::Vec2;
    use crate::model::TeamColor;
    use crate::test_fixtures::{config, scene, Harness};

    // Yellow defends +x (default side assignment)
    fn detector() -> BotInDefenseAreaDetector {
        let cfg = config();
        BotInDefenseAreaDetector::new(cfg.detectors.defense_area, cfg.detectors.restart.inset)
    }

    fn activated() -> (BotInDefenseAreaDetector, Harness) {
        let mut det = detector();
        let mut h = Harness::new();
        assert!(h.run(&mut det, scene(0).frame()).is_none());
        (det, h)
    }

    #[test]
    fn test_attacker_fully_inside() {
        let (mut det, mut h) = activated();
        let frame = scene(60)
            .ball(5400.0, 0.0)
            .bot(BotId::blue(2), 5500.0, 0.0)
            .touching(&[BotId::blue(2)])
            .frame();
        let outcome = h.run(&mut det, frame).expect("foul");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::AttackerInDefenseArea { by_team: TeamColor::Blue, by_bot: 2, .. })
        ));
        let follow_up = outcome.follow_up.expect("follow-up");
        assert_eq!(follow_up.kind, FollowUpKind::IndirectFree);
        assert_eq!(follow_up.team, TeamColor::Yellow);
        assert_eq!(follow_up.position, Some(Vec2::new(3600.0, 0.0)));
    }

    #[test]
    fn test_touch_during_grace_ignored() {
        let (mut det, mut h) = activated();
        let frame = scene(6)
            .ball(5400.0, 0.0)
            .bot(BotId::blue(2), 5500.0, 0.0)
            .touching(&[BotId::blue(2)])
            .frame();
        assert!(h.run(&mut det, frame).is_none());
    }

    #[test]
    fn test_defender_partially_inside_then_cooldown() {
        let (mut det, mut h) = activated();
        let touching = |tick| {
            scene(tick)
                .ball(4120.0, 0.0)
                .bot(BotId::yellow(3), 4230.0, 0.0)
                .touching(&[BotId::yellow(3)])
                .frame()
        };
        let outcome = h.run(&mut det, touching(60)).expect("foul");
        match outcome.event {
            Some(GameEvent::MultipleDefenderPartially { by_bot, distance, .. }) => {
                assert_eq!(by_bot, 3);
                assert!((distance - 120.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(outcome.follow_up.map(|f| f.kind), Some(FollowUpKind::DirectFree));

        assert!(h.run(&mut det, touching(61)).is_none());
    }

    #[test]
    fn test_defender_fully_inside_gives_penalty() {
        let (mut det, mut h) = activated();
        let frame = scene(60)
            .ball(5000.0, 0.0)
            .bot(BotId::yellow(3), 5100.0, 0.0)
            .touching(&[BotId::yellow(3)])
            .frame();
        let outcome = h.run(&mut det, frame).expect("foul");
        assert!(matches!(outcome.event, Some(GameEvent::MultipleDefender { .. })));
        let follow_up = outcome.follow_up.expect("follow-up");
        assert_eq!(follow_up.kind, FollowUpKind::Penalty);
        assert_eq!(follow_up.team, TeamColor::Blue);
    }

    #[test]
    fn test_keeper_and_pushed_defender_exempt() {
        let (mut det, mut h) = activated();
        let keeper = scene(60)
            .ball(5400.0, 0.0)
            .bot(BotId::yellow(0), 5500.0, 0.0)
            .touching(&[BotId::yellow(0)])
            .frame();
        assert!(h.run(&mut det, keeper).is_none());

        let pushed = scene(61)
            .ball(4120.0, 100.0)
            .bot(BotId::yellow(3), 4230.0, 0.0)
            .bot(BotId::blue(8), 4050.0, 0.0)
            .touching(&[BotId::yellow(3)])
            .frame();
        assert!(h.run(&mut det, pushed).is_none());
    }

    #[test]
    fn test_untracked_toucher_does_not_hide_others() {
        let (mut det, mut h) = activated();
        let frame = scene(60)
            .ball(5400.0, 0.0)
            .bot(BotId::blue(2), 5500.0, 0.0)
            .touching(&[BotId::blue(9), BotId::blue(2)])
            .frame();
        let outcome = h.run(&mut det, frame).expect("foul");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::AttackerInDefenseArea { by_team: TeamColor::Blue, by_bot: 2, .. })
        ));
    }

    #[test]
    fn test_only_untracked_toucher_is_quiet() {
        let (mut det, mut h) = activated();
        let frame = scene(60).touching(&[BotId::blue(9)]).frame();
        assert!(h.run(&mut det, frame).is_none());
    }
}
