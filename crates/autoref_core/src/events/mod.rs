//! Game events, follow-up actions and restart commands.
//!
//! ## Units
//! Internal distances are millimetres and speeds m/s. The [`wire`] module is
//! the only place that converts to the league's metre-based schema.

mod command;
mod follow_up;
pub mod wire;

pub use command::{CommandKind, RefereeCommand};
pub use follow_up::{FollowUpAction, FollowUpKind};

use std::fmt;

use crate::geometry::Vec2;
use crate::model::TeamColor;

/// Event kind without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameEventKind {
    Goal,
    ChippedGoal,
    BallLeftFieldTouchLine,
    BallLeftFieldGoalLine,
    AimlessKick,
    BoundaryCrossing,
    AttackerInDefenseArea,
    AttackerInDefenseAreaPartially,
    MultipleDefender,
    MultipleDefenderPartially,
    BotPushedBot,
    BotCrashUnique,
    BotCrashDrawn,
    AttackerDoubleTouchedBall,
    BotKickedBallTooFast,
    BotDribbledBallTooFar,
    KeeperHeldBall,
    NoProgressInGame,
    KickTimeout,
    PenaltyKickFailed,
    PlacementSucceeded,
    PlacementFailed,
    BotInterferedPlacement,
    BotTooFastInStop,
    DefenderTooCloseToKickPoint,
    AttackerTooCloseToDefenseArea,
    TooManyRobots,
}

/// Detected game event
///
/// `by_team` is always the responsible team (the offender for fouls, the
/// scoring team for goals, the placing team for placement outcomes).
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Goal {
        by_team: TeamColor,
        kicking_team: Option<TeamColor>,
        kicking_bot: Option<u32>,
        location: Vec2,
        kick_location: Option<Vec2>,
        max_ball_height: f64,
    },
    ChippedGoal {
        by_team: TeamColor,
        by_bot: Option<u32>,
        location: Vec2,
        kick_location: Option<Vec2>,
        max_ball_height: f64,
    },
    BallLeftFieldTouchLine {
        by_team: TeamColor,
        by_bot: Option<u32>,
        location: Vec2,
    },
    BallLeftFieldGoalLine {
        by_team: TeamColor,
        by_bot: Option<u32>,
        location: Vec2,
    },
    AimlessKick {
        by_team: TeamColor,
        by_bot: Option<u32>,
        location: Vec2,
        kick_location: Vec2,
    },
    BoundaryCrossing {
        by_team: TeamColor,
        location: Vec2,
    },
    AttackerInDefenseArea {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
        distance: f64,
    },
    AttackerInDefenseAreaPartially {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
        distance: f64,
    },
    MultipleDefender {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
        distance: f64,
    },
    MultipleDefenderPartially {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
        distance: f64,
    },
    BotPushedBot {
        by_team: TeamColor,
        violator: u32,
        victim: u32,
        location: Vec2,
        pushed_distance: f64,
    },
    BotCrashUnique {
        by_team: TeamColor,
        violator: u32,
        victim: u32,
        location: Vec2,
        crash_speed: f64,
        speed_diff: f64,
    },
    BotCrashDrawn {
        bot_yellow: u32,
        bot_blue: u32,
        location: Vec2,
        crash_speed: f64,
        speed_diff: f64,
    },
    AttackerDoubleTouchedBall {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
    },
    BotKickedBallTooFast {
        by_team: TeamColor,
        by_bot: Option<u32>,
        location: Vec2,
        initial_ball_speed: f64,
        chipped: bool,
    },
    BotDribbledBallTooFar {
        by_team: TeamColor,
        by_bot: u32,
        start: Vec2,
        end: Vec2,
    },
    KeeperHeldBall {
        by_team: TeamColor,
        location: Vec2,
        duration: f64,
    },
    NoProgressInGame {
        location: Vec2,
        time: f64,
    },
    KickTimeout {
        by_team: TeamColor,
        location: Vec2,
        time: f64,
    },
    PenaltyKickFailed {
        by_team: TeamColor,
        location: Vec2,
    },
    PlacementSucceeded {
        by_team: TeamColor,
        time_taken: f64,
        precision: f64,
        distance: f64,
    },
    PlacementFailed {
        by_team: TeamColor,
        remaining_distance: f64,
    },
    BotInterferedPlacement {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
    },
    BotTooFastInStop {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
        speed: f64,
    },
    DefenderTooCloseToKickPoint {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
        distance: f64,
    },
    AttackerTooCloseToDefenseArea {
        by_team: TeamColor,
        by_bot: u32,
        location: Vec2,
        distance: f64,
    },
    TooManyRobots {
        by_team: TeamColor,
        num_robots_allowed: u32,
        num_robots_on_field: u32,
        ball_location: Vec2,
    },
}

impl GameEvent {
    pub fn kind(&self) -> GameEventKind {
        match self {
            GameEvent::Goal { .. } => GameEventKind::Goal,
            GameEvent::ChippedGoal { .. } => GameEventKind::ChippedGoal,
            GameEvent::BallLeftFieldTouchLine { .. } => GameEventKind::BallLeftFieldTouchLine,
            GameEvent::BallLeftFieldGoalLine { .. } => GameEventKind::BallLeftFieldGoalLine,
            GameEvent::AimlessKick { .. } => GameEventKind::AimlessKick,
            GameEvent::BoundaryCrossing { .. } => GameEventKind::BoundaryCrossing,
            GameEvent::AttackerInDefenseArea { .. } => GameEventKind::AttackerInDefenseArea,
            GameEvent::AttackerInDefenseAreaPartially { .. } => {
                GameEventKind::AttackerInDefenseAreaPartially
            }
            GameEvent::MultipleDefender { .. } => GameEventKind::MultipleDefender,
            GameEvent::MultipleDefenderPartially { .. } => GameEventKind::MultipleDefenderPartially,
            GameEvent::BotPushedBot { .. } => GameEventKind::BotPushedBot,
            GameEvent::BotCrashUnique { .. } => GameEventKind::BotCrashUnique,
            GameEvent::BotCrashDrawn { .. } => GameEventKind::BotCrashDrawn,
            GameEvent::AttackerDoubleTouchedBall { .. } => GameEventKind::AttackerDoubleTouchedBall,
            GameEvent::BotKickedBallTooFast { .. } => GameEventKind::BotKickedBallTooFast,
            GameEvent::BotDribbledBallTooFar { .. } => GameEventKind::BotDribbledBallTooFar,
            GameEvent::KeeperHeldBall { .. } => GameEventKind::KeeperHeldBall,
            GameEvent::NoProgressInGame { .. } => GameEventKind::NoProgressInGame,
            GameEvent::KickTimeout { .. } => GameEventKind::KickTimeout,
            GameEvent::PenaltyKickFailed { .. } => GameEventKind::PenaltyKickFailed,
            GameEvent::PlacementSucceeded { .. } => GameEventKind::PlacementSucceeded,
            GameEvent::PlacementFailed { .. } => GameEventKind::PlacementFailed,
            GameEvent::BotInterferedPlacement { .. } => GameEventKind::BotInterferedPlacement,
            GameEvent::BotTooFastInStop { .. } => GameEventKind::BotTooFastInStop,
            GameEvent::DefenderTooCloseToKickPoint { .. } => {
                GameEventKind::DefenderTooCloseToKickPoint
            }
            GameEvent::AttackerTooCloseToDefenseArea { .. } => {
                GameEventKind::AttackerTooCloseToDefenseArea
            }
            GameEvent::TooManyRobots { .. } => GameEventKind::TooManyRobots,
        }
    }

    /// Team the event is attributed to. `None` for neutral events.
    pub fn responsible_team(&self) -> Option<TeamColor> {
        match self {
            GameEvent::Goal { by_team, .. }
            | GameEvent::ChippedGoal { by_team, .. }
            | GameEvent::BallLeftFieldTouchLine { by_team, .. }
            | GameEvent::BallLeftFieldGoalLine { by_team, .. }
            | GameEvent::AimlessKick { by_team, .. }
            | GameEvent::BoundaryCrossing { by_team, .. }
            | GameEvent::AttackerInDefenseArea { by_team, .. }
            | GameEvent::AttackerInDefenseAreaPartially { by_team, .. }
            | GameEvent::MultipleDefender { by_team, .. }
            | GameEvent::MultipleDefenderPartially { by_team, .. }
            | GameEvent::BotPushedBot { by_team, .. }
            | GameEvent::BotCrashUnique { by_team, .. }
            | GameEvent::AttackerDoubleTouchedBall { by_team, .. }
            | GameEvent::BotKickedBallTooFast { by_team, .. }
            | GameEvent::BotDribbledBallTooFar { by_team, .. }
            | GameEvent::KeeperHeldBall { by_team, .. }
            | GameEvent::KickTimeout { by_team, .. }
            | GameEvent::PenaltyKickFailed { by_team, .. }
            | GameEvent::PlacementSucceeded { by_team, .. }
            | GameEvent::PlacementFailed { by_team, .. }
            | GameEvent::BotInterferedPlacement { by_team, .. }
            | GameEvent::BotTooFastInStop { by_team, .. }
            | GameEvent::DefenderTooCloseToKickPoint { by_team, .. }
            | GameEvent::AttackerTooCloseToDefenseArea { by_team, .. }
            | GameEvent::TooManyRobots { by_team, .. } => Some(*by_team),
            GameEvent::BotCrashDrawn { .. } | GameEvent::NoProgressInGame { .. } => None,
        }
    }

    /// Shirt number of the responsible bot, when one is known.
    pub fn responsible_bot(&self) -> Option<u32> {
        match self {
            GameEvent::Goal { kicking_bot, .. } => *kicking_bot,
            GameEvent::ChippedGoal { by_bot, .. }
            | GameEvent::BallLeftFieldTouchLine { by_bot, .. }
            | GameEvent::BallLeftFieldGoalLine { by_bot, .. }
            | GameEvent::AimlessKick { by_bot, .. }
            | GameEvent::BotKickedBallTooFast { by_bot, .. } => *by_bot,
            GameEvent::AttackerInDefenseArea { by_bot, .. }
            | GameEvent::AttackerInDefenseAreaPartially { by_bot, .. }
            | GameEvent::MultipleDefender { by_bot, .. }
            | GameEvent::MultipleDefenderPartially { by_bot, .. }
            | GameEvent::AttackerDoubleTouchedBall { by_bot, .. }
            | GameEvent::BotDribbledBallTooFar { by_bot, .. }
            | GameEvent::BotInterferedPlacement { by_bot, .. }
            | GameEvent::BotTooFastInStop { by_bot, .. }
            | GameEvent::DefenderTooCloseToKickPoint { by_bot, .. }
            | GameEvent::AttackerTooCloseToDefenseArea { by_bot, .. } => Some(*by_bot),
            GameEvent::BotPushedBot { violator, .. } | GameEvent::BotCrashUnique { violator, .. } => {
                Some(*violator)
            }
            GameEvent::BoundaryCrossing { .. }
            | GameEvent::BotCrashDrawn { .. }
            | GameEvent::KeeperHeldBall { .. }
            | GameEvent::NoProgressInGame { .. }
            | GameEvent::KickTimeout { .. }
            | GameEvent::PenaltyKickFailed { .. }
            | GameEvent::PlacementSucceeded { .. }
            | GameEvent::PlacementFailed { .. }
            | GameEvent::TooManyRobots { .. } => None,
        }
    }

    /// Where the event happened. Placement outcomes carry no location.
    pub fn location(&self) -> Option<Vec2> {
        match self {
            GameEvent::Goal { location, .. }
            | GameEvent::ChippedGoal { location, .. }
            | GameEvent::BallLeftFieldTouchLine { location, .. }
            | GameEvent::BallLeftFieldGoalLine { location, .. }
            | GameEvent::AimlessKick { location, .. }
            | GameEvent::BoundaryCrossing { location, .. }
            | GameEvent::AttackerInDefenseArea { location, .. }
            | GameEvent::AttackerInDefenseAreaPartially { location, .. }
            | GameEvent::MultipleDefender { location, .. }
            | GameEvent::MultipleDefenderPartially { location, .. }
            | GameEvent::BotPushedBot { location, .. }
            | GameEvent::BotCrashUnique { location, .. }
            | GameEvent::BotCrashDrawn { location, .. }
            | GameEvent::AttackerDoubleTouchedBall { location, .. }
            | GameEvent::BotKickedBallTooFast { location, .. }
            | GameEvent::KeeperHeldBall { location, .. }
            | GameEvent::NoProgressInGame { location, .. }
            | GameEvent::KickTimeout { location, .. }
            | GameEvent::PenaltyKickFailed { location, .. }
            | GameEvent::BotInterferedPlacement { location, .. }
            | GameEvent::BotTooFastInStop { location, .. }
            | GameEvent::DefenderTooCloseToKickPoint { location, .. }
            | GameEvent::AttackerTooCloseToDefenseArea { location, .. } => Some(*location),
            GameEvent::BotDribbledBallTooFar { end, .. } => Some(*end),
            GameEvent::TooManyRobots { ball_location, .. } => Some(*ball_location),
            GameEvent::PlacementSucceeded { .. } | GameEvent::PlacementFailed { .. } => None,
        }
    }
}

fn bot_label(team: TeamColor, bot: Option<u32>) -> String {
    match bot {
        Some(n) => format!("{} {}", team, n),
        None => format!("{} (unknown bot)", team),
    }
}

fn at(p: &Vec2) -> String {
    format!("({:.0}, {:.0})", p.x, p.y)
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameEvent::Goal {
                by_team,
                kicking_team,
                kicking_bot,
                location,
                max_ball_height,
                ..
            } => {
                let kicker = kicking_team
                    .map(|t| bot_label(t, *kicking_bot))
                    .unwrap_or_else(|| "unknown bot".to_string());
                write!(
                    f,
                    "Goal for {} by {} at {} (max height {:.0} mm)",
                    by_team,
                    kicker,
                    at(location),
                    max_ball_height
                )
            }
            GameEvent::ChippedGoal {
                by_team,
                by_bot,
                location,
                max_ball_height,
                ..
            } => write!(
                f,
                "Chipped goal by {} at {} (height {:.0} mm)",
                bot_label(*by_team, *by_bot),
                at(location),
                max_ball_height
            ),
            GameEvent::BallLeftFieldTouchLine {
                by_team,
                by_bot,
                location,
            } => write!(
                f,
                "Ball left the field over the touch line at {}, last touched by {}",
                at(location),
                bot_label(*by_team, *by_bot)
            ),
            GameEvent::BallLeftFieldGoalLine {
                by_team,
                by_bot,
                location,
            } => write!(
                f,
                "Ball left the field over the goal line at {}, last touched by {}",
                at(location),
                bot_label(*by_team, *by_bot)
            ),
            GameEvent::AimlessKick {
                by_team,
                by_bot,
                location,
                kick_location,
            } => write!(
                f,
                "Aimless kick by {} from {} left the field at {}",
                bot_label(*by_team, *by_bot),
                at(kick_location),
                at(location)
            ),
            GameEvent::BoundaryCrossing { by_team, location } => write!(
                f,
                "Ball crossed the field boundary at {}, kicked by {}",
                at(location),
                by_team
            ),
            GameEvent::AttackerInDefenseArea {
                by_team,
                by_bot,
                location,
                distance,
            } => write!(
                f,
                "Attacker {} {} touched the ball in the opponent defense area at {} ({:.0} mm deep)",
                by_team,
                by_bot,
                at(location),
                distance
            ),
            GameEvent::AttackerInDefenseAreaPartially {
                by_team,
                by_bot,
                location,
                distance,
            } => write!(
                f,
                "Attacker {} {} touched the ball partially inside the opponent defense area at {} ({:.0} mm)",
                by_team,
                by_bot,
                at(location),
                distance
            ),
            GameEvent::MultipleDefender {
                by_team,
                by_bot,
                location,
                distance,
            } => write!(
                f,
                "Defender {} {} touched the ball inside its own defense area at {} ({:.0} mm deep)",
                by_team,
                by_bot,
                at(location),
                distance
            ),
            GameEvent::MultipleDefenderPartially {
                by_team,
                by_bot,
                location,
                distance,
            } => write!(
                f,
                "Defender {} {} touched the ball partially inside its own defense area at {} ({:.0} mm)",
                by_team,
                by_bot,
                at(location),
                distance
            ),
            GameEvent::BotPushedBot {
                by_team,
                violator,
                victim,
                pushed_distance,
                ..
            } => write!(
                f,
                "{} {} pushed {} {} over {:.0} mm",
                by_team,
                violator,
                by_team.opponent(),
                victim,
                pushed_distance
            ),
            GameEvent::BotCrashUnique {
                by_team,
                violator,
                victim,
                crash_speed,
                ..
            } => write!(
                f,
                "{} {} crashed into {} {} at {:.2} m/s",
                by_team,
                violator,
                by_team.opponent(),
                victim,
                crash_speed
            ),
            GameEvent::BotCrashDrawn {
                bot_yellow,
                bot_blue,
                crash_speed,
                ..
            } => write!(
                f,
                "YELLOW {} and BLUE {} collided at {:.2} m/s",
                bot_yellow, bot_blue, crash_speed
            ),
            GameEvent::AttackerDoubleTouchedBall {
                by_team,
                by_bot,
                location,
            } => write!(
                f,
                "{} {} touched the ball twice after the restart at {}",
                by_team,
                by_bot,
                at(location)
            ),
            GameEvent::BotKickedBallTooFast {
                by_team,
                by_bot,
                initial_ball_speed,
                chipped,
                ..
            } => write!(
                f,
                "{} kicked the ball too fast: {:.2} m/s{}",
                bot_label(*by_team, *by_bot),
                initial_ball_speed,
                if *chipped { " (chipped)" } else { "" }
            ),
            GameEvent::BotDribbledBallTooFar {
                by_team,
                by_bot,
                start,
                end,
            } => write!(
                f,
                "{} {} dribbled the ball {:.0} mm from {} to {}",
                by_team,
                by_bot,
                (end - start).norm(),
                at(start),
                at(end)
            ),
            GameEvent::KeeperHeldBall {
                by_team,
                location,
                duration,
            } => write!(
                f,
                "{} held the ball in its defense area at {} for {:.1} s",
                by_team,
                at(location),
                duration
            ),
            GameEvent::NoProgressInGame { location, time } => write!(
                f,
                "No progress in game for {:.1} s, ball at {}",
                time,
                at(location)
            ),
            GameEvent::KickTimeout {
                by_team,
                location,
                time,
            } => write!(
                f,
                "{} did not kick within {:.1} s, ball at {}",
                by_team,
                time,
                at(location)
            ),
            GameEvent::PenaltyKickFailed { by_team, location } => write!(
                f,
                "Penalty kick of {} failed, ball at {}",
                by_team,
                at(location)
            ),
            GameEvent::PlacementSucceeded {
                by_team,
                time_taken,
                precision,
                distance,
            } => write!(
                f,
                "{} placed the ball over {:.0} mm in {:.1} s ({:.0} mm precision)",
                by_team, distance, time_taken, precision
            ),
            GameEvent::PlacementFailed {
                by_team,
                remaining_distance,
            } => write!(
                f,
                "{} failed to place the ball, {:.0} mm remaining",
                by_team, remaining_distance
            ),
            GameEvent::BotInterferedPlacement {
                by_team,
                by_bot,
                location,
            } => write!(
                f,
                "{} {} interfered with the ball placement at {}",
                by_team,
                by_bot,
                at(location)
            ),
            GameEvent::BotTooFastInStop {
                by_team,
                by_bot,
                speed,
                ..
            } => write!(
                f,
                "{} {} moved too fast during stop: {:.2} m/s",
                by_team, by_bot, speed
            ),
            GameEvent::DefenderTooCloseToKickPoint {
                by_team,
                by_bot,
                distance,
                ..
            } => write!(
                f,
                "{} {} is too close to the kick point: {:.0} mm",
                by_team, by_bot, distance
            ),
            GameEvent::AttackerTooCloseToDefenseArea {
                by_team,
                by_bot,
                distance,
                ..
            } => write!(
                f,
                "{} {} is too close to the opponent defense area: {:.0} mm",
                by_team, by_bot, distance
            ),
            GameEvent::TooManyRobots {
                by_team,
                num_robots_allowed,
                num_robots_on_field,
                ..
            } => write!(
                f,
                "{} has {} robots on the field, {} allowed",
                by_team, num_robots_on_field, num_robots_allowed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let ev = GameEvent::BotPushedBot {
            by_team: TeamColor::Blue,
            violator: 3,
            victim: 5,
            location: Vec2::new(100.0, 50.0),
            pushed_distance: 250.0,
        };
        assert_eq!(ev.kind(), GameEventKind::BotPushedBot);
        assert_eq!(ev.responsible_team(), Some(TeamColor::Blue));
        assert_eq!(ev.responsible_bot(), Some(3));
        assert_eq!(ev.location(), Some(Vec2::new(100.0, 50.0)));
        assert_eq!(ev.to_string(), "BLUE 3 pushed YELLOW 5 over 250 mm");
    }

    #[test]
    fn test_neutral_events() {
        let ev = GameEvent::NoProgressInGame {
            location: Vec2::zeros(),
            time: 10.0,
        };
        assert_eq!(ev.responsible_team(), None);
        let placed = GameEvent::PlacementSucceeded {
            by_team: TeamColor::Yellow,
            time_taken: 3.0,
            precision: 40.0,
            distance: 1500.0,
        };
        assert_eq!(placed.location(), None);
    }

    #[test]
    fn test_goal_description_unknown_bot() {
        let ev = GameEvent::Goal {
            by_team: TeamColor::Yellow,
            kicking_team: None,
            kicking_bot: None,
            location: Vec2::new(6100.0, 0.0),
            kick_location: None,
            max_ball_height: 0.0,
        };
        assert!(ev.to_string().contains("unknown bot"));
    }
}
