use super::{Detector, DetectorContext, DetectorKind, RuleOutcome};
use crate::config::PlacementConfig;
use crate::error::DetectorError;
use crate::events::{FollowUpAction, GameEvent, RefereeCommand};
use crate::geometry::Vec2;
use crate::model::{Frame, GameStateKind, GameStateSet, Timestamp};

const PRIORITY: i32 = 64;

/// State of one placement attempt
#[derive(Debug, Clone, Copy)]
struct Attempt {
    command_counter: u32,
    started_at: Timestamp,
    start_pos: Vec2,
    /// Smoothed ball position
    filtered: Vec2,
    done: bool,
}

impl Attempt {
    fn start(frame: &Frame) -> Self {
        Self {
            command_counter: frame.referee.command_counter,
            started_at: frame.timestamp(),
            start_pos: frame.ball_pos(),
            filtered: frame.ball_pos(),
            done: false,
        }
    }
}

/// Ball placement success or failure.
///
/// A new referee command (counter change) starts a new attempt. The ball
/// counts as placed once it is within tolerance of the target, has settled
/// and every bot keeps the clearance the following restart requires.
#[derive(Debug, Clone)]
pub struct BallPlacementDetector {
    config: PlacementConfig,
    attempt: Option<Attempt>,
}

impl BallPlacementDetector {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            attempt: None,
        }
    }

    fn required_clearance(&self, ctx: &DetectorContext) -> f64 {
        let free_kick_next = match ctx.frame.referee.next_command {
            Some(next) => next.is_free_kick(),
            None => ctx.follow_up.map_or(false, FollowUpAction::is_free_kick),
        };
        if free_kick_next {
            self.config.min_bot_distance_free_kick
        } else {
            self.config.min_bot_distance_force_start
        }
    }

    /// Distance between the ball and the closest bot hull.
    fn clearance(ctx: &DetectorContext) -> f64 {
        let ball = ctx.frame.ball_pos();
        ctx.frame
            .world
            .bots
            .values()
            .map(|bot| (bot.pos - ball).norm() - ctx.field.bot_radius)
            .fold(f64::INFINITY, f64::min)
    }
}

impl Detector for BallPlacementDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BallPlacement
    }

    fn active_states(&self) -> GameStateSet {
        GameStateSet::of(&[GameStateKind::BallPlacement])
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn on_activate(&mut self, frame: &Frame) {
        self.attempt = Some(Attempt::start(frame));
    }

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError> {
        let frame = ctx.frame;
        let ball = frame.ball_pos();
        let mut attempt = match self.attempt {
            Some(a) if a.command_counter == frame.referee.command_counter => a,
            _ => {
                log::debug!("new placement attempt (command {})", frame.referee.command_counter);
                Attempt::start(frame)
            }
        };
        attempt.filtered += (ball - attempt.filtered) * self.config.ema_factor;
        self.attempt = Some(attempt);
        if attempt.done {
            return Ok(None);
        }

        let (Some(team), Some(target)) = (frame.game_state().for_team, frame.referee.designated_position) else {
            return Ok(None);
        };
        let remaining = (target - ball).norm();

        if frame.referee.current_action_time_remaining.map_or(false, |t| t < 0.0) {
            self.attempt = Some(Attempt { done: true, ..attempt });
            log::info!("{} failed to place the ball, {:.0} mm short", team, remaining);
            return Ok(Some(
                RuleOutcome::event(GameEvent::PlacementFailed {
                    by_team: team,
                    remaining_distance: remaining,
                })
                .with_command(RefereeCommand::stop()),
            ));
        }

        let settled = (attempt.filtered - ball).norm() < self.config.settled_distance;
        if remaining > self.config.ball_placement_tolerance
            || !settled
            || Self::clearance(ctx) < self.required_clearance(ctx)
        {
            return Ok(None);
        }

        self.attempt = Some(Attempt { done: true, ..attempt });
        let event = GameEvent::PlacementSucceeded {
            by_team: team,
            time_taken: frame.timestamp().secs_since(attempt.started_at),
            precision: remaining,
            distance: (ball - attempt.start_pos).norm(),
        };
        let next = ctx
            .follow_up
            .map_or_else(RefereeCommand::stop, FollowUpAction::to_command);
        Ok(Some(RuleOutcome::event(event).with_command(next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CommandKind;
    use crate::model::{BotId, GameState, TeamColor};
    use crate::test_fixtures::{config, scene, Harness};

    const PLACING: GameState = GameState::for_team(GameStateKind::BallPlacement, TeamColor::Yellow);

    fn detector() -> BallPlacementDetector {
        BallPlacementDetector::new(config().detectors.placement)
    }

    fn placing(tick: u64, ball_x: f64, counter: u32) -> Frame {
        scene(tick)
            .state(PLACING)
            .ball(ball_x, 0.0)
            .bot(BotId::yellow(2), 1000.0, 300.0)
            .referee(|r| {
                r.designated_position = Some(Vec2::new(1000.0, 0.0));
                r.command_counter = counter;
                r.current_action_time_remaining = Some(10.0);
            })
            .frame()
    }

    #[test]
    fn test_success_waits_for_settled_ball() {
        let mut det = detector();
        let follow_up = FollowUpAction::indirect_free(TeamColor::Yellow, Vec2::new(1000.0, 0.0));
        let mut h = Harness::new().with_follow_up(follow_up);
        let frames = (0..40).map(|t| placing(t, (2000.0 - 100.0 * t as f64).max(1000.0), 1));
        let outcomes = h.run_all(&mut det, frames);
        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[0];
        match outcome.event {
            Some(GameEvent::PlacementSucceeded {
                by_team,
                time_taken,
                precision,
                distance,
            }) => {
                assert_eq!(by_team, TeamColor::Yellow);
                // Not before the ball reached the target
                assert!(time_taken > 10.0 / 60.0);
                assert_eq!(precision, 0.0);
                assert_eq!(distance, 1000.0);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(outcome.commands[0].kind, CommandKind::IndirectFree(TeamColor::Yellow));
    }

    #[test]
    fn test_force_start_needs_more_clearance_then_fails() {
        let mut det = detector();
        let mut h = Harness::new();
        let settled: Vec<Frame> = (0..10).map(|t| placing(t, 1000.0, 1)).collect();
        assert!(h.run_all(&mut det, settled).is_empty());

        let mut late = placing(10, 1000.0, 1);
        late.referee.current_action_time_remaining = Some(-0.1);
        let outcome = h.run(&mut det, late).expect("failure");
        assert!(matches!(
            outcome.event,
            Some(GameEvent::PlacementFailed { by_team: TeamColor::Yellow, .. })
        ));
        assert_eq!(outcome.commands, vec![RefereeCommand::stop()]);
    }

    #[test]
    fn test_new_command_starts_new_attempt() {
        let mut det = detector();
        let mut h = Harness::new().with_follow_up(FollowUpAction::direct_free(
            TeamColor::Yellow,
            Vec2::new(1000.0, 0.0),
        ));
        assert!(h.run(&mut det, placing(0, 1000.0, 1)).is_some());
        assert!(h.run(&mut det, placing(1, 1000.0, 1)).is_none());
        assert!(h.run(&mut det, placing(2, 1000.0, 2)).is_some());
    }
}
