//! Game event detectors.
//!
//! Every rule of the game is one [`Detector`]: a small state machine that is
//! only consulted while the game is in one of its `active_states()`. The
//! engine calls `on_activate` exactly once when a detector becomes active
//! and `update` on every tick it stays active.
//!
//! ## Priority (highest first)
//! Goal, boundary crossing, ball left field, defense area, pushing,
//! collision, double touch, ball speeding, dribbling, keeper held ball,
//! penalty kick, ball placement, no progress, kick timeout, bot number,
//! placement interference, stop speed, kick point distance, attacker
//! distance, stop state rule, prepare state rule.
//!
//! Equal priorities fall back to declaration order in [`DetectorKind::ALL`].

mod attacker_defense_area;
mod ball_left_field;
mod ball_speeding;
mod bot_number;
mod boundary_crossing;
mod collision;
mod debounce;
mod defense_area;
mod double_touch;
mod dribbling;
mod goal;
mod keeper_held_ball;
mod kick_point_distance;
mod kick_timeout;
mod no_progress;
mod penalty_kick;
mod placement;
mod placement_interference;
mod prepare_state;
mod pushing;
mod stop_speed;
mod stop_state;

pub use attacker_defense_area::AttackerToDefenseAreaDetector;
pub use ball_left_field::BallLeftFieldDetector;
pub use ball_speeding::BallSpeedingDetector;
pub use bot_number::BotNumberDetector;
pub use boundary_crossing::BoundaryCrossingDetector;
pub use collision::CollisionDetector;
pub use debounce::DebouncedSet;
pub use defense_area::BotInDefenseAreaDetector;
pub use double_touch::DoubleTouchDetector;
pub use dribbling::DribblingDetector;
pub use goal::GoalDetector;
pub use keeper_held_ball::KeeperHeldBallDetector;
pub use kick_point_distance::DefenderToKickPointDetector;
pub use kick_timeout::KickTimeoutDetector;
pub use no_progress::NoProgressDetector;
pub use penalty_kick::PenaltyKickFailedDetector;
pub use placement::BallPlacementDetector;
pub use placement_interference::PlacementInterferenceDetector;
pub use prepare_state::PrepareStateRule;
pub use pushing::PushingDetector;
pub use stop_speed::BotStopSpeedDetector;
pub use stop_state::StopStateRule;

use crate::config::RefereeConfig;
use crate::error::{ConfigError, DetectorError};
use crate::events::{FollowUpAction, GameEvent, RefereeCommand};
use crate::geometry::{Field, Vec2};
use crate::model::{Frame, FrameHistory, GameStateKind, GameStateSet};

/// Free kicks plus kickoff: the restarts that end with a single kick.
pub(crate) const KICK_STATES: GameStateSet = GameStateSet::of(&[
    GameStateKind::DirectFree,
    GameStateKind::IndirectFree,
    GameStateKind::Kickoff,
]);

pub(crate) const RUNNING: GameStateSet = GameStateSet::of(&[GameStateKind::Running]);

/// Move a restart position inside the field, `inset` away from the lines.
pub(crate) fn restart_spot(field: &Field, pos: &Vec2, inset: f64) -> Vec2 {
    field.field_rect().with_margin(-inset).clamp(pos)
}

/// Restart position `margin` in front of the defense area on side
/// `goal_sign`, on whichever field-facing side is closest to `pos`.
pub(crate) fn outside_defense_area(field: &Field, goal_sign: f64, pos: &Vec2, margin: f64, inset: f64) -> Vec2 {
    let area = field.penalty_area(goal_sign);
    let front_x = goal_sign * (field.half_length() - field.penalty_area_depth - margin);
    let front = Vec2::new(front_x, pos.y.clamp(area.min.y, area.max.y));
    let side_y = (field.penalty_area_width / 2.0 + margin).copysign(pos.y);
    let side = Vec2::new(pos.x, side_y);
    let nearest = if (front - pos).norm() <= (side - pos).norm() {
        front
    } else {
        side
    };
    restart_spot(field, &nearest, inset)
}

/// Everything a detector may read during one tick.
///
/// `history.latest()` is `frame`; `history.previous()` is the tick before.
pub struct DetectorContext<'a> {
    pub frame: &'a Frame,
    pub history: &'a FrameHistory,
    pub field: &'a Field,
    /// Follow-up action queued by an earlier tick
    pub follow_up: Option<&'a FollowUpAction>,
}

impl<'a> DetectorContext<'a> {
    pub fn previous(&self) -> Option<&'a Frame> {
        self.history.previous()
    }
}

/// Result of one detector for one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleOutcome {
    pub event: Option<GameEvent>,
    pub commands: Vec<RefereeCommand>,
    pub follow_up: Option<FollowUpAction>,
}

impl RuleOutcome {
    /// Report only; play continues.
    pub fn event(event: GameEvent) -> Self {
        Self {
            event: Some(event),
            ..Default::default()
        }
    }

    /// Stop the game and queue the restart.
    pub fn stop(event: GameEvent, follow_up: FollowUpAction) -> Self {
        Self {
            event: Some(event),
            commands: vec![RefereeCommand::stop()],
            follow_up: Some(follow_up),
        }
    }

    /// Commands without an event (state rules).
    pub fn command(command: RefereeCommand) -> Self {
        Self {
            commands: vec![command],
            ..Default::default()
        }
    }

    pub fn with_command(mut self, command: RefereeCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_follow_up(mut self, follow_up: FollowUpAction) -> Self {
        self.follow_up = Some(follow_up);
        self
    }

    /// Whether the outcome asks the referee box to act.
    pub fn is_actionable(&self) -> bool {
        !self.commands.is_empty()
    }
}

/// One rule of the game
pub trait Detector {
    fn kind(&self) -> DetectorKind;

    /// Game states in which the detector runs.
    fn active_states(&self) -> GameStateSet;

    /// Higher runs first in arbitration.
    fn priority(&self) -> i32;

    /// Called once when the detector becomes active; clears per-activation state.
    fn on_activate(&mut self, _frame: &Frame) {}

    fn update(&mut self, ctx: &DetectorContext) -> Result<Option<RuleOutcome>, DetectorError>;
}

/// Every available detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetectorKind {
    Goal,
    BoundaryCrossing,
    BallLeftField,
    BotInDefenseArea,
    Pushing,
    Collision,
    DoubleTouch,
    BallSpeeding,
    Dribbling,
    KeeperHeldBall,
    NoProgress,
    KickTimeout,
    PenaltyKickFailed,
    BallPlacement,
    PlacementInterference,
    BotStopSpeed,
    DefenderToKickPoint,
    AttackerToDefenseArea,
    BotNumber,
    StopState,
    PrepareState,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 21] = [
        DetectorKind::Goal,
        DetectorKind::BoundaryCrossing,
        DetectorKind::BallLeftField,
        DetectorKind::BotInDefenseArea,
        DetectorKind::Pushing,
        DetectorKind::Collision,
        DetectorKind::DoubleTouch,
        DetectorKind::BallSpeeding,
        DetectorKind::Dribbling,
        DetectorKind::KeeperHeldBall,
        DetectorKind::NoProgress,
        DetectorKind::KickTimeout,
        DetectorKind::PenaltyKickFailed,
        DetectorKind::BallPlacement,
        DetectorKind::PlacementInterference,
        DetectorKind::BotStopSpeed,
        DetectorKind::DefenderToKickPoint,
        DetectorKind::AttackerToDefenseArea,
        DetectorKind::BotNumber,
        DetectorKind::StopState,
        DetectorKind::PrepareState,
    ];

    pub fn build(self, config: &RefereeConfig) -> Box<dyn Detector> {
        let d = &config.detectors;
        let inset = d.restart.inset;
        match self {
            DetectorKind::Goal => Box::new(GoalDetector::new(d.goal.clone(), inset)),
            DetectorKind::BoundaryCrossing => Box::new(BoundaryCrossingDetector::new(inset)),
            DetectorKind::BallLeftField => {
                Box::new(BallLeftFieldDetector::new(d.ball_left_field.clone(), inset))
            }
            DetectorKind::BotInDefenseArea => {
                Box::new(BotInDefenseAreaDetector::new(d.defense_area.clone(), inset))
            }
            DetectorKind::Pushing => Box::new(PushingDetector::new(d.pushing.clone(), inset)),
            DetectorKind::Collision => Box::new(CollisionDetector::new(d.collision.clone(), inset)),
            DetectorKind::DoubleTouch => Box::new(DoubleTouchDetector::new(inset)),
            DetectorKind::BallSpeeding => {
                Box::new(BallSpeedingDetector::new(d.ball_speeding.clone(), inset))
            }
            DetectorKind::Dribbling => Box::new(DribblingDetector::new(d.dribbling.clone(), inset)),
            DetectorKind::KeeperHeldBall => {
                Box::new(KeeperHeldBallDetector::new(d.keeper_held_ball.clone(), inset))
            }
            DetectorKind::NoProgress => {
                Box::new(NoProgressDetector::new(d.no_progress.clone(), inset))
            }
            DetectorKind::KickTimeout => {
                Box::new(KickTimeoutDetector::new(d.kick_timeout.clone()))
            }
            DetectorKind::PenaltyKickFailed => {
                Box::new(PenaltyKickFailedDetector::new(d.penalty_kick.clone(), inset))
            }
            DetectorKind::BallPlacement => Box::new(BallPlacementDetector::new(d.placement.clone())),
            DetectorKind::PlacementInterference => Box::new(PlacementInterferenceDetector::new(
                d.placement_interference.clone(),
            )),
            DetectorKind::BotStopSpeed => Box::new(BotStopSpeedDetector::new(d.stop_speed.clone())),
            DetectorKind::DefenderToKickPoint => Box::new(DefenderToKickPointDetector::new(
                d.kick_point_distance.clone(),
            )),
            DetectorKind::AttackerToDefenseArea => Box::new(AttackerToDefenseAreaDetector::new(
                d.attacker_defense_area.clone(),
            )),
            DetectorKind::BotNumber => {
                Box::new(BotNumberDetector::new(d.bot_number.clone(), inset))
            }
            DetectorKind::StopState => Box::new(StopStateRule::new(
                d.stop_state.clone(),
                d.placement.ball_placement_tolerance,
            )),
            DetectorKind::PrepareState => Box::new(PrepareStateRule::new(d.prepare_state.clone())),
        }
    }
}

pub(crate) struct DetectorSlot {
    pub detector: Box<dyn Detector>,
    /// Active on the previous tick
    pub was_active: bool,
}

/// Detectors built once at engine construction, in declaration order.
pub struct DetectorRegistry {
    slots: Vec<DetectorSlot>,
}

impl DetectorRegistry {
    pub fn new(kinds: &[DetectorKind], config: &RefereeConfig) -> Result<Self, ConfigError> {
        if kinds.is_empty() {
            return Err(ConfigError::NoDetectors);
        }
        let slots = kinds
            .iter()
            .map(|kind| DetectorSlot {
                detector: kind.build(config),
                was_active: false,
            })
            .collect();
        Ok(Self { slots })
    }

    /// Append a detector built outside [`DetectorKind`] (league-specific rules).
    pub fn push(&mut self, detector: Box<dyn Detector>) {
        self.slots.push(DetectorSlot {
            detector,
            was_active: false,
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = DetectorKind> + '_ {
        self.slots.iter().map(|s| s.detector.kind())
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut DetectorSlot> {
        self.slots.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds_all_kinds_in_order() {
        let registry = DetectorRegistry::new(&DetectorKind::ALL, &RefereeConfig::default()).unwrap();
        assert_eq!(registry.len(), DetectorKind::ALL.len());
        assert!(registry.kinds().eq(DetectorKind::ALL.iter().copied()));
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(matches!(
            DetectorRegistry::new(&[], &RefereeConfig::default()),
            Err(ConfigError::NoDetectors)
        ));
    }

    #[test]
    fn test_priorities_are_distinct() {
        let cfg = RefereeConfig::default();
        let mut priorities: Vec<i32> = DetectorKind::ALL
            .iter()
            .map(|k| k.build(&cfg).priority())
            .collect();
        let goal = priorities[0];
        priorities.sort_unstable();
        priorities.dedup();
        assert_eq!(priorities.len(), DetectorKind::ALL.len());
        assert_eq!(priorities.last(), Some(&goal));
    }

    #[test]
    fn test_every_detector_has_active_states() {
        let cfg = RefereeConfig::default();
        for kind in DetectorKind::ALL {
            let detector = kind.build(&cfg);
            assert_eq!(detector.kind(), kind);
            assert!(!detector.active_states().is_empty(), "{:?}", kind);
            assert!(!detector.active_states().contains(GameStateKind::Halt), "{:?}", kind);
        }
    }
}
