use super::{restart_spot, DebouncedSet, Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::BotNumberConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent};
use crate::model::{GameStateKind, GameStateSet, TeamColor};

const PRIORITY: i32 = 50;

/// More bots on the field than the team is allowed.
#[derive(Debug, Clone)]
pub struct BotNumberDetector {
    config: BotNumberConfig,
    restart_inset: f64,
    teams: DebouncedSet<TeamColor>,
}

impl BotNumberDetector {
    pub fn new(config: BotNumberConfig, restart_inset: f64) -> Self {
        Self {
            config,
            restart_inset,
            teams: DebouncedSet::new(),
        }
    }
}

impl Detector for BotNumberDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BotNumber
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::all_except(&[GameStateKind::Halt])
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let now = frame.timestamp();
        let cooldown = self.config.report_cooldown_time;

        for team in TeamColor::BOTH {
            let allowed = frame.referee.team(team).max_allowed_bots;
            let on_field = frame.world.bots_of(team).count() as u32;
            if on_field <= allowed || self.teams.reported_within(&team, now, cooldown) {
                continue;
            }
            self.teams.mark_reported(team, now);
            log::info!("{} has {} bots on the field, {} allowed", team, on_field, allowed);

            let ball = frame.ball_pos();
            let event = GameEvent::TooManyRobots {
                by_team: team,
                num_robots_allowed: allowed,
                num_robots_on_field: on_field,
                ball_location: ball,
            };
            if !frame.game_state().is_running() {
                return Ok(Some(RuleOutcome::event(event)));
            }
            let spot = restart_spot(ctx.field, &ball, self.restart_inset);
            return Ok(Some(RuleOutcome::stop(
                event,
                FollowUpAction::indirect_free(team.opponent(), spot),
            )));
        }
        Ok(None)
    }
}
