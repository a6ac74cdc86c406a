use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome, KICK_STATES, RUNNING};
use crate::config::GoalConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent, RefereeCommand};
use crate::geometry::Vec2;
use crate::model::{BotId, BotTouchRecord, Frame, GameStateSet, TeamColor};

const PRIORITY: i32 = 100;

/// Goals and chipped (invalid) goals.
///
/// Triggers on a settled possible goal or on the ball leaving the field
/// through a goal mouth, whichever comes first; fires at most once per
/// activation.
#[derive(Debug, Clone)]
pub struct GoalDetector {
    config: GoalConfig,
    restart_inset: f64,
    /// Highest ball per team since the opponent last touched it, indexed
    /// by [`team_slot`]
    max_height: [f64; 2],
    last_contact: Option<BotTouchRecord>,
    fired: bool,
}

fn team_slot(team: TeamColor) -> usize {
    match team {
        TeamColor::Yellow => 0,
        TeamColor::Blue => 1,
    }
}

impl GoalDetector {
    pub fn new(config: GoalConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            max_height: [0.0; 2],
            last_contact: None,
            fired: false,
        }
    }

    fn track_height(&mut self, frame: &Frame) {
        let contact = frame.facts.bot_last_touched_ball;
        let new_contact = match (&contact, &self.last_contact) {
            (Some(c), Some(prev)) => !c.same_contact(prev),
            (Some(_), None) => true,
            _ => false,
        };
        if new_contact {
            self.last_contact = contact;
        }
        let height = frame.world.ball.height;
        match self.last_contact {
            Some(touch) => {
                // A contact only clears the opponent's chip
                if new_contact {
                    self.max_height[team_slot(touch.bot.team.opponent())] = 0.0;
                }
                let slot = &mut self.max_height[team_slot(touch.bot.team)];
                *slot = slot.max(height);
            }
            None => {
                for slot in &mut self.max_height {
                    *slot = slot.max(height);
                }
            }
        }
    }

    /// Goal sign and location if the ball is in or through a goal.
    fn goal_entry(ctx: &DetectorContext) -> Option<(f64, Vec2)> {
        let facts = &ctx.frame.facts;
        if let Some(goal) = facts.possible_goal {
            return Some((goal.goal_sign, goal.entry_pos));
        }
        let crossing = facts.ball_left_field?;
        let in_mouth = ctx.field.is_goal_line_crossing(&crossing.pos)
            && crossing.pos.y.abs() <= ctx.field.goal_width / 2.0;
        in_mouth.then(|| (crossing.pos.x.signum(), crossing.pos))
    }

    fn kicker(frame: &Frame) -> Option<(BotId, Option<Vec2>)> {
        if let Some(kick) = &frame.world.kick_event {
            return Some((kick.kicking_bot, Some(kick.position)));
        }
        frame
            .facts
            .bot_last_touched_ball
            .map(|touch| (touch.bot, Some(touch.pos)))
    }
}

impl Detector for GoalDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Goal
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING.union(KICK_STATES)
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, _frame: &Frame) {
        self.max_height = [0.0; 2];
        self.last_contact = None;
        self.fired = false;
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        self.track_height(frame);
        if self.fired {
            return Ok(None);
        }
        let Some((goal_sign, location)) = Self::goal_entry(ctx) else {
            return Ok(None);
        };
        self.fired = true;

        let defending = frame.referee.goal_owner(goal_sign);
        let scoring = defending.opponent();
        let kicker = Self::kicker(frame);
        let kicking_team = kicker.map(|(bot, _)| bot.team);
        let kicking_bot = kicker.map(|(bot, _)| bot.number);
        let kick_location = kicker.and_then(|(_, pos)| pos);

        let max_height = self.max_height[team_slot(scoring)];
        if max_height > self.config.max_goal_height {
            let event = GameEvent::ChippedGoal {
                by_team: kicking_team.unwrap_or(scoring),
                by_bot: kicking_bot,
                location,
                kick_location,
                max_ball_height: max_height,
            };
            let spot = restart_spot(
                ctx.field,
                &Vec2::new(goal_sign * ctx.field.half_length(), location.y),
                self.config.goal_kick_inset.max(self.restart_inset),
            );
            return Ok(Some(RuleOutcome::stop(
                event,
                FollowUpAction::direct_free(defending, spot),
            )));
        }

        let event = GameEvent::Goal {
            by_team: scoring,
            kicking_team,
            kicking_bot,
            location,
            kick_location,
            max_ball_height: max_height,
        };
        Ok(Some(
            RuleOutcome::stop(event, FollowUpAction::kickoff(defending))
                .with_command(RefereeCommand::goal(scoring)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CommandKind, FollowUpKind};
    use crate::model::PossibleGoal;
    use crate::test_fixtures::{config, scene, ts, Harness};

    fn detector() -> GoalDetector {
        let cfg = config();
        GoalDetector::new(cfg.detectors.goal, cfg.detectors.restart.inset)
    }

    fn goal_frame(tick: u64, height: f64) -> Frame {
        let mut frame = scene(tick)
            .ball(6100.0, 0.0)
            .ball_height(height)
            .referee(|r| r.blue_on_positive_half = true)
            .kick(BotId::yellow(7), 3000.0, 500.0, 0.0)
            .frame();
        frame.facts.possible_goal = Some(PossibleGoal {
            scoring_team: TeamColor::Yellow,
            goal_sign: 1.0,
            entry_pos: Vec2::new(6010.0, 0.0),
            timestamp: ts(0.1),
        });
        frame
    }

    #[test]
    fn test_valid_goal() {
        let mut det = detector();
        let mut h = Harness::new();
        let outcome = h.run(&mut det, goal_frame(10, 0.0)).expect("goal");
        match outcome.event {
            Some(GameEvent::Goal {
                by_team,
                kicking_bot,
                kick_location,
                ..
            }) => {
                assert_eq!(by_team, TeamColor::Yellow);
                assert_eq!(kicking_bot, Some(7));
                assert_eq!(kick_location, Some(Vec2::new(3000.0, 500.0)));
            }
            other => panic!("unexpected {:?}", other),
        }
        let follow_up = outcome.follow_up.expect("follow-up");
        assert_eq!(follow_up.kind, FollowUpKind::KickOff);
        assert_eq!(follow_up.team, TeamColor::Blue);
        assert_eq!(outcome.commands[0].kind, CommandKind::Stop);
        assert_eq!(outcome.commands[1].kind, CommandKind::Goal(TeamColor::Yellow));

        // Fires once per activation
        assert!(h.run(&mut det, goal_frame(11, 0.0)).is_none());
    }

    #[test]
    fn test_chipped_goal_is_invalid() {
        let mut det = detector();
        let mut h = Harness::new();
        let airborne = scene(1)
            .ball(4000.0, 0.0)
            .ball_height(400.0)
            .last_touch(BotId::yellow(7), 0.0)
            .frame();
        assert!(h.run(&mut det, airborne).is_none());

        let mut landing = goal_frame(2, 50.0);
        landing.facts.bot_last_touched_ball = h
            .history
            .latest()
            .and_then(|f| f.facts.bot_last_touched_ball);
        let outcome = h.run(&mut det, landing).expect("chipped goal");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::ChippedGoal { by_team: TeamColor::Yellow, max_ball_height, .. })
                if max_ball_height == 400.0
        ));
        let follow_up = outcome.follow_up.expect("follow-up");
        assert_eq!(follow_up.team, TeamColor::Blue);
        assert!(follow_up.position.expect("spot").x < 6000.0);
    }

    /// Chip by yellow 7 at 400 mm, then a ground touch by `second`, then
    /// the ball settles in the +x goal.
    fn chip_then_touch(second: BotId) -> Option<RuleOutcome> {
        let mut det = detector();
        let mut h = Harness::new();
        let chip = scene(1)
            .ball(3000.0, 0.0)
            .ball_height(400.0)
            .last_touch(BotId::yellow(7), 0.0)
            .frame();
        assert!(h.run(&mut det, chip).is_none());
        let touch = scene(2)
            .ball(5000.0, 0.0)
            .ball_height(0.0)
            .last_touch(second, 0.05)
            .frame();
        assert!(h.run(&mut det, touch).is_none());

        let mut landing = goal_frame(3, 0.0);
        landing.facts.bot_last_touched_ball = h
            .history
            .latest()
            .and_then(|f| f.facts.bot_last_touched_ball);
        h.run(&mut det, landing)
    }

    #[test]
    fn test_teammate_touch_keeps_chip() {
        let outcome = chip_then_touch(BotId::yellow(9)).expect("chipped goal");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::ChippedGoal { by_team: TeamColor::Yellow, max_ball_height, .. })
                if max_ball_height == 400.0
        ));
    }

    #[test]
    fn test_opponent_touch_clears_chip() {
        let outcome = chip_then_touch(BotId::blue(3)).expect("goal");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::Goal { by_team: TeamColor::Yellow, max_ball_height, .. })
                if max_ball_height == 0.0
        ));
    }

    #[test]
    fn test_unknown_kicker() {
        let mut det = detector();
        let mut h = Harness::new();
        let mut frame = goal_frame(1, 0.0);
        frame.world.kick_event = None;
        let outcome = h.run(&mut det, frame).expect("goal");
        assert_eq!(outcome.event.as_ref().and_then(|e| e.responsible_bot()), None);
        assert_eq!(
            outcome.event.and_then(|e| e.responsible_team()),
            Some(TeamColor::Yellow)
        );
    }
}
