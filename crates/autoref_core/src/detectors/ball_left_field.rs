use super::{restart_spot, Detector, DetectorContext, DetectorKind, RuleOutcome, RUNNING};
use crate::config::BallLeftFieldRuleConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent, RefereeCommand};
use crate::geometry::Vec2;
use crate::model::{BotId, Frame, GameStateSet, TimedPosition};

const PRIORITY: i32 = 96;

/// Ball out over a touch line or goal line, including aimless kicks.
///
/// Crossings inside a goal mouth belong to the goal detector and are skipped.
#[derive(Debug, Clone)]
pub struct BallLeftFieldDetector {
    config: BallLeftFieldRuleConfig,
    restart_inset: f64,
    last_handled: Option<TimedPosition>,
}

impl BallLeftFieldDetector {
    pub fn new(config: BallLeftFieldRuleConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            last_handled: None,
        }
    }

    /// Kicked from the own half, past the halfway margin, over the opposite
    /// goal line.
    fn is_aimless(&self, frame: &Frame, kicker: BotId, kick_pos: &Vec2, crossing: &Vec2) -> bool {
        if !self.config.aimless_kick_enabled {
            return false;
        }
        let own_sign = frame.own_goal_sign(kicker.team);
        let from_own_half = kick_pos.x * own_sign > self.config.aimless_kick_halfway_margin;
        let over_opponent_line = crossing.x * own_sign < 0.0;
        from_own_half && over_opponent_line
    }
}

impl Detector for BallLeftFieldDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BallLeftField
    }

    fn active_states(&self) -> GameStateSet {
        RUNNING
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let Some(crossing) = frame.facts.ball_left_field else {
            return Ok(None);
        };
        if self.last_handled == Some(crossing) {
            return Ok(None);
        }
        self.last_handled = Some(crossing);

        let field = ctx.field;
        let location = crossing.pos;
        let goal_line = field.is_goal_line_crossing(&location);
        if goal_line && location.y.abs() <= field.goal_width / 2.0 {
            return Ok(None);
        }
        let spot = restart_spot(field, &location, self.restart_inset);

        let Some(touch) = frame.facts.bot_last_touched_ball else {
            log::warn!("ball left the field without a known last touch; force start");
            return Ok(Some(
                RuleOutcome::command(RefereeCommand::stop())
                    .with_follow_up(FollowUpAction::force_start(frame.referee.goal_owner(location.x), spot)),
            ));
        };
        let team = touch.bot.team;
        let bot = Some(touch.bot.number);

        if !goal_line {
            let event = GameEvent::BallLeftFieldTouchLine {
                by_team: team,
                by_bot: bot,
                location,
            };
            return Ok(Some(RuleOutcome::stop(
                event,
                FollowUpAction::indirect_free(team.opponent(), spot),
            )));
        }

        let kick_pos = match &frame.world.kick_event {
            Some(kick) if kick.kicking_bot == touch.bot => kick.position,
            _ => touch.pos,
        };
        if self.is_aimless(frame, touch.bot, &kick_pos, &location) {
            let event = GameEvent::AimlessKick {
                by_team: team,
                by_bot: bot,
                location,
                kick_location: kick_pos,
            };
            let kick_spot = restart_spot(field, &kick_pos, self.restart_inset);
            return Ok(Some(RuleOutcome::stop(
                event,
                FollowUpAction::indirect_free(team.opponent(), kick_spot),
            )));
        }

        let event = GameEvent::BallLeftFieldGoalLine {
            by_team: team,
            by_bot: bot,
            location,
        };
        Ok(Some(RuleOutcome::stop(
            event,
            FollowUpAction::direct_free(team.opponent(), spot),
        )))
    }
}
