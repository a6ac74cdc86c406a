//! League wire representation of events and commands.
//!
//! The wire schema uses metres for every distance and location; the engine
//! works in millimetres. Conversion happens here and nowhere else. Speeds are
//! m/s on both sides and durations are seconds.
//!
//! Teams travel as `"YELLOW"` / `"BLUE"` strings so that a foreign producer
//! sending an unknown team is reported as [`WireError::UnknownTeam`] instead of
//! a generic JSON error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{CommandKind, GameEvent, RefereeCommand};
use crate::error::WireError;
use crate::geometry::Vec2;
use crate::model::TeamColor;

const MM_PER_M: f64 = 1000.0;

/// Point in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WireVector {
    pub x: f64,
    pub y: f64,
}

impl WireVector {
    pub fn from_mm(v: &Vec2) -> Self {
        Self {
            x: v.x / MM_PER_M,
            y: v.y / MM_PER_M,
        }
    }

    pub fn to_mm(self) -> Vec2 {
        Vec2::new(self.x * MM_PER_M, self.y * MM_PER_M)
    }
}

fn to_m(mm: f64) -> f64 {
    mm / MM_PER_M
}

fn to_mm(m: f64) -> f64 {
    m * MM_PER_M
}

/// Game event as exchanged with the referee box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireGameEvent {
    Goal {
        by_team: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kicking_team: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kicking_bot: Option<u32>,
        location: Option<WireVector>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kick_location: Option<WireVector>,
        #[serde(default)]
        max_ball_height: f64,
    },
    ChippedGoal {
        by_team: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by_bot: Option<u32>,
        location: Option<WireVector>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kick_location: Option<WireVector>,
        #[serde(default)]
        max_ball_height: f64,
    },
    BallLeftFieldTouchLine {
        by_team: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by_bot: Option<u32>,
        location: Option<WireVector>,
    },
    BallLeftFieldGoalLine {
        by_team: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by_bot: Option<u32>,
        location: Option<WireVector>,
    },
    AimlessKick {
        by_team: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by_bot: Option<u32>,
        location: Option<WireVector>,
        kick_location: Option<WireVector>,
    },
    BoundaryCrossing {
        by_team: String,
        location: Option<WireVector>,
    },
    AttackerTouchedBallInDefenseArea {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
        distance: f64,
    },
    AttackerTouchedBallInDefenseAreaPartially {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
        distance: f64,
    },
    DefenderInDefenseArea {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
        distance: f64,
    },
    DefenderInDefenseAreaPartially {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
        distance: f64,
    },
    BotPushedBot {
        by_team: String,
        violator: Option<u32>,
        victim: Option<u32>,
        location: Option<WireVector>,
        pushed_distance: f64,
    },
    BotCrashUnique {
        by_team: String,
        violator: Option<u32>,
        victim: Option<u32>,
        location: Option<WireVector>,
        crash_speed: f64,
        speed_diff: f64,
    },
    BotCrashDrawn {
        bot_yellow: Option<u32>,
        bot_blue: Option<u32>,
        location: Option<WireVector>,
        crash_speed: f64,
        speed_diff: f64,
    },
    AttackerDoubleTouchedBall {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
    },
    BotKickedBallTooFast {
        by_team: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        by_bot: Option<u32>,
        location: Option<WireVector>,
        initial_ball_speed: f64,
        #[serde(default)]
        chipped: bool,
    },
    BotDribbledBallTooFar {
        by_team: String,
        by_bot: Option<u32>,
        start: Option<WireVector>,
        end: Option<WireVector>,
    },
    KeeperHeldBall {
        by_team: String,
        location: Option<WireVector>,
        duration: f64,
    },
    NoProgressInGame {
        location: Option<WireVector>,
        time: f64,
    },
    KickTimeout {
        by_team: String,
        location: Option<WireVector>,
        time: f64,
    },
    PenaltyKickFailed {
        by_team: String,
        location: Option<WireVector>,
    },
    PlacementSucceeded {
        by_team: String,
        time_taken: f64,
        precision: f64,
        distance: f64,
    },
    PlacementFailed {
        by_team: String,
        remaining_distance: f64,
    },
    BotInterferedPlacement {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
    },
    BotTooFastInStop {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
        speed: f64,
    },
    DefenderTooCloseToKickPoint {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
        distance: f64,
    },
    AttackerTooCloseToDefenseArea {
        by_team: String,
        by_bot: Option<u32>,
        location: Option<WireVector>,
        distance: f64,
    },
    TooManyRobots {
        by_team: String,
        num_robots_allowed: u32,
        num_robots_on_field: u32,
        ball_location: Option<WireVector>,
    },
}

impl From<&GameEvent> for WireGameEvent {
    fn from(event: &GameEvent) -> Self {
        let team = |t: &TeamColor| t.as_str().to_string();
        let loc = |v: &Vec2| Some(WireVector::from_mm(v));
        match event {
            GameEvent::Goal {
                by_team,
                kicking_team,
                kicking_bot,
                location,
                kick_location,
                max_ball_height,
            } => WireGameEvent::Goal {
                by_team: team(by_team),
                kicking_team: kicking_team.as_ref().map(team),
                kicking_bot: *kicking_bot,
                location: loc(location),
                kick_location: kick_location.as_ref().map(WireVector::from_mm),
                max_ball_height: to_m(*max_ball_height),
            },
            GameEvent::ChippedGoal {
                by_team,
                by_bot,
                location,
                kick_location,
                max_ball_height,
            } => WireGameEvent::ChippedGoal {
                by_team: team(by_team),
                by_bot: *by_bot,
                location: loc(location),
                kick_location: kick_location.as_ref().map(WireVector::from_mm),
                max_ball_height: to_m(*max_ball_height),
            },
            GameEvent::BallLeftFieldTouchLine {
                by_team,
                by_bot,
                location,
            } => WireGameEvent::BallLeftFieldTouchLine {
                by_team: team(by_team),
                by_bot: *by_bot,
                location: loc(location),
            },
            GameEvent::BallLeftFieldGoalLine {
                by_team,
                by_bot,
                location,
            } => WireGameEvent::BallLeftFieldGoalLine {
                by_team: team(by_team),
                by_bot: *by_bot,
                location: loc(location),
            },
            GameEvent::AimlessKick {
                by_team,
                by_bot,
                location,
                kick_location,
            } => WireGameEvent::AimlessKick {
                by_team: team(by_team),
                by_bot: *by_bot,
                location: loc(location),
                kick_location: loc(kick_location),
            },
            GameEvent::BoundaryCrossing { by_team, location } => WireGameEvent::BoundaryCrossing {
                by_team: team(by_team),
                location: loc(location),
            },
            GameEvent::AttackerInDefenseArea {
                by_team,
                by_bot,
                location,
                distance,
            } => WireGameEvent::AttackerTouchedBallInDefenseArea {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
                distance: to_m(*distance),
            },
            GameEvent::AttackerInDefenseAreaPartially {
                by_team,
                by_bot,
                location,
                distance,
            } => WireGameEvent::AttackerTouchedBallInDefenseAreaPartially {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
                distance: to_m(*distance),
            },
            GameEvent::MultipleDefender {
                by_team,
                by_bot,
                location,
                distance,
            } => WireGameEvent::DefenderInDefenseArea {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
                distance: to_m(*distance),
            },
            GameEvent::MultipleDefenderPartially {
                by_team,
                by_bot,
                location,
                distance,
            } => WireGameEvent::DefenderInDefenseAreaPartially {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
                distance: to_m(*distance),
            },
            GameEvent::BotPushedBot {
                by_team,
                violator,
                victim,
                location,
                pushed_distance,
            } => WireGameEvent::BotPushedBot {
                by_team: team(by_team),
                violator: Some(*violator),
                victim: Some(*victim),
                location: loc(location),
                pushed_distance: to_m(*pushed_distance),
            },
            GameEvent::BotCrashUnique {
                by_team,
                violator,
                victim,
                location,
                crash_speed,
                speed_diff,
            } => WireGameEvent::BotCrashUnique {
                by_team: team(by_team),
                violator: Some(*violator),
                victim: Some(*victim),
                location: loc(location),
                crash_speed: *crash_speed,
                speed_diff: *speed_diff,
            },
            GameEvent::BotCrashDrawn {
                bot_yellow,
                bot_blue,
                location,
                crash_speed,
                speed_diff,
            } => WireGameEvent::BotCrashDrawn {
                bot_yellow: Some(*bot_yellow),
                bot_blue: Some(*bot_blue),
                location: loc(location),
                crash_speed: *crash_speed,
                speed_diff: *speed_diff,
            },
            GameEvent::AttackerDoubleTouchedBall {
                by_team,
                by_bot,
                location,
            } => WireGameEvent::AttackerDoubleTouchedBall {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
            },
            GameEvent::BotKickedBallTooFast {
                by_team,
                by_bot,
                location,
                initial_ball_speed,
                chipped,
            } => WireGameEvent::BotKickedBallTooFast {
                by_team: team(by_team),
                by_bot: *by_bot,
                location: loc(location),
                initial_ball_speed: *initial_ball_speed,
                chipped: *chipped,
            },
            GameEvent::BotDribbledBallTooFar {
                by_team,
                by_bot,
                start,
                end,
            } => WireGameEvent::BotDribbledBallTooFar {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                start: loc(start),
                end: loc(end),
            },
            GameEvent::KeeperHeldBall {
                by_team,
                location,
                duration,
            } => WireGameEvent::KeeperHeldBall {
                by_team: team(by_team),
                location: loc(location),
                duration: *duration,
            },
            GameEvent::NoProgressInGame { location, time } => WireGameEvent::NoProgressInGame {
                location: loc(location),
                time: *time,
            },
            GameEvent::KickTimeout {
                by_team,
                location,
                time,
            } => WireGameEvent::KickTimeout {
                by_team: team(by_team),
                location: loc(location),
                time: *time,
            },
            GameEvent::PenaltyKickFailed { by_team, location } => {
                WireGameEvent::PenaltyKickFailed {
                    by_team: team(by_team),
                    location: loc(location),
                }
            }
            GameEvent::PlacementSucceeded {
                by_team,
                time_taken,
                precision,
                distance,
            } => WireGameEvent::PlacementSucceeded {
                by_team: team(by_team),
                time_taken: *time_taken,
                precision: to_m(*precision),
                distance: to_m(*distance),
            },
            GameEvent::PlacementFailed {
                by_team,
                remaining_distance,
            } => WireGameEvent::PlacementFailed {
                by_team: team(by_team),
                remaining_distance: to_m(*remaining_distance),
            },
            GameEvent::BotInterferedPlacement {
                by_team,
                by_bot,
                location,
            } => WireGameEvent::BotInterferedPlacement {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
            },
            GameEvent::BotTooFastInStop {
                by_team,
                by_bot,
                location,
                speed,
            } => WireGameEvent::BotTooFastInStop {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
                speed: *speed,
            },
            GameEvent::DefenderTooCloseToKickPoint {
                by_team,
                by_bot,
                location,
                distance,
            } => WireGameEvent::DefenderTooCloseToKickPoint {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
                distance: to_m(*distance),
            },
            GameEvent::AttackerTooCloseToDefenseArea {
                by_team,
                by_bot,
                location,
                distance,
            } => WireGameEvent::AttackerTooCloseToDefenseArea {
                by_team: team(by_team),
                by_bot: Some(*by_bot),
                location: loc(location),
                distance: to_m(*distance),
            },
            GameEvent::TooManyRobots {
                by_team,
                num_robots_allowed,
                num_robots_on_field,
                ball_location,
            } => WireGameEvent::TooManyRobots {
                by_team: team(by_team),
                num_robots_allowed: *num_robots_allowed,
                num_robots_on_field: *num_robots_on_field,
                ball_location: loc(ball_location),
            },
        }
    }
}

fn parse_team(s: &str) -> Result<TeamColor, WireError> {
    TeamColor::parse(s).ok_or_else(|| WireError::UnknownTeam(s.to_string()))
}

fn required<T>(value: Option<T>, event: &'static str, field: &'static str) -> Result<T, WireError> {
    value.ok_or(WireError::MissingField { event, field })
}

fn required_pos(
    value: Option<WireVector>,
    event: &'static str,
    field: &'static str,
) -> Result<Vec2, WireError> {
    required(value, event, field).map(WireVector::to_mm)
}

impl TryFrom<WireGameEvent> for GameEvent {
    type Error = WireError;

    fn try_from(wire: WireGameEvent) -> Result<Self, Self::Error> {
        let event = match wire {
            WireGameEvent::Goal {
                by_team,
                kicking_team,
                kicking_bot,
                location,
                kick_location,
                max_ball_height,
            } => GameEvent::Goal {
                by_team: parse_team(&by_team)?,
                kicking_team: kicking_team.as_deref().map(parse_team).transpose()?,
                kicking_bot,
                location: required_pos(location, "goal", "location")?,
                kick_location: kick_location.map(WireVector::to_mm),
                max_ball_height: to_mm(max_ball_height),
            },
            WireGameEvent::ChippedGoal {
                by_team,
                by_bot,
                location,
                kick_location,
                max_ball_height,
            } => GameEvent::ChippedGoal {
                by_team: parse_team(&by_team)?,
                by_bot,
                location: required_pos(location, "chipped_goal", "location")?,
                kick_location: kick_location.map(WireVector::to_mm),
                max_ball_height: to_mm(max_ball_height),
            },
            WireGameEvent::BallLeftFieldTouchLine {
                by_team,
                by_bot,
                location,
            } => GameEvent::BallLeftFieldTouchLine {
                by_team: parse_team(&by_team)?,
                by_bot,
                location: required_pos(location, "ball_left_field_touch_line", "location")?,
            },
            WireGameEvent::BallLeftFieldGoalLine {
                by_team,
                by_bot,
                location,
            } => GameEvent::BallLeftFieldGoalLine {
                by_team: parse_team(&by_team)?,
                by_bot,
                location: required_pos(location, "ball_left_field_goal_line", "location")?,
            },
            WireGameEvent::AimlessKick {
                by_team,
                by_bot,
                location,
                kick_location,
            } => GameEvent::AimlessKick {
                by_team: parse_team(&by_team)?,
                by_bot,
                location: required_pos(location, "aimless_kick", "location")?,
                kick_location: required_pos(kick_location, "aimless_kick", "kick_location")?,
            },
            WireGameEvent::BoundaryCrossing { by_team, location } => GameEvent::BoundaryCrossing {
                by_team: parse_team(&by_team)?,
                location: required_pos(location, "boundary_crossing", "location")?,
            },
            WireGameEvent::AttackerTouchedBallInDefenseArea {
                by_team,
                by_bot,
                location,
                distance,
            } => {
                const EV: &str = "attacker_touched_ball_in_defense_area";
                GameEvent::AttackerInDefenseArea {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                    distance: to_mm(distance),
                }
            }
            WireGameEvent::AttackerTouchedBallInDefenseAreaPartially {
                by_team,
                by_bot,
                location,
                distance,
            } => {
                const EV: &str = "attacker_touched_ball_in_defense_area_partially";
                GameEvent::AttackerInDefenseAreaPartially {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                    distance: to_mm(distance),
                }
            }
            WireGameEvent::DefenderInDefenseArea {
                by_team,
                by_bot,
                location,
                distance,
            } => {
                const EV: &str = "defender_in_defense_area";
                GameEvent::MultipleDefender {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                    distance: to_mm(distance),
                }
            }
            WireGameEvent::DefenderInDefenseAreaPartially {
                by_team,
                by_bot,
                location,
                distance,
            } => {
                const EV: &str = "defender_in_defense_area_partially";
                GameEvent::MultipleDefenderPartially {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                    distance: to_mm(distance),
                }
            }
            WireGameEvent::BotPushedBot {
                by_team,
                violator,
                victim,
                location,
                pushed_distance,
            } => GameEvent::BotPushedBot {
                by_team: parse_team(&by_team)?,
                violator: required(violator, "bot_pushed_bot", "violator")?,
                victim: required(victim, "bot_pushed_bot", "victim")?,
                location: required_pos(location, "bot_pushed_bot", "location")?,
                pushed_distance: to_mm(pushed_distance),
            },
            WireGameEvent::BotCrashUnique {
                by_team,
                violator,
                victim,
                location,
                crash_speed,
                speed_diff,
            } => GameEvent::BotCrashUnique {
                by_team: parse_team(&by_team)?,
                violator: required(violator, "bot_crash_unique", "violator")?,
                victim: required(victim, "bot_crash_unique", "victim")?,
                location: required_pos(location, "bot_crash_unique", "location")?,
                crash_speed,
                speed_diff,
            },
            WireGameEvent::BotCrashDrawn {
                bot_yellow,
                bot_blue,
                location,
                crash_speed,
                speed_diff,
            } => GameEvent::BotCrashDrawn {
                bot_yellow: required(bot_yellow, "bot_crash_drawn", "bot_yellow")?,
                bot_blue: required(bot_blue, "bot_crash_drawn", "bot_blue")?,
                location: required_pos(location, "bot_crash_drawn", "location")?,
                crash_speed,
                speed_diff,
            },
            WireGameEvent::AttackerDoubleTouchedBall {
                by_team,
                by_bot,
                location,
            } => {
                const EV: &str = "attacker_double_touched_ball";
                GameEvent::AttackerDoubleTouchedBall {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                }
            }
            WireGameEvent::BotKickedBallTooFast {
                by_team,
                by_bot,
                location,
                initial_ball_speed,
                chipped,
            } => GameEvent::BotKickedBallTooFast {
                by_team: parse_team(&by_team)?,
                by_bot,
                location: required_pos(location, "bot_kicked_ball_too_fast", "location")?,
                initial_ball_speed,
                chipped,
            },
            WireGameEvent::BotDribbledBallTooFar {
                by_team,
                by_bot,
                start,
                end,
            } => {
                const EV: &str = "bot_dribbled_ball_too_far";
                GameEvent::BotDribbledBallTooFar {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    start: required_pos(start, EV, "start")?,
                    end: required_pos(end, EV, "end")?,
                }
            }
            WireGameEvent::KeeperHeldBall {
                by_team,
                location,
                duration,
            } => GameEvent::KeeperHeldBall {
                by_team: parse_team(&by_team)?,
                location: required_pos(location, "keeper_held_ball", "location")?,
                duration,
            },
            WireGameEvent::NoProgressInGame { location, time } => GameEvent::NoProgressInGame {
                location: required_pos(location, "no_progress_in_game", "location")?,
                time,
            },
            WireGameEvent::KickTimeout {
                by_team,
                location,
                time,
            } => GameEvent::KickTimeout {
                by_team: parse_team(&by_team)?,
                location: required_pos(location, "kick_timeout", "location")?,
                time,
            },
            WireGameEvent::PenaltyKickFailed { by_team, location } => {
                GameEvent::PenaltyKickFailed {
                    by_team: parse_team(&by_team)?,
                    location: required_pos(location, "penalty_kick_failed", "location")?,
                }
            }
            WireGameEvent::PlacementSucceeded {
                by_team,
                time_taken,
                precision,
                distance,
            } => GameEvent::PlacementSucceeded {
                by_team: parse_team(&by_team)?,
                time_taken,
                precision: to_mm(precision),
                distance: to_mm(distance),
            },
            WireGameEvent::PlacementFailed {
                by_team,
                remaining_distance,
            } => GameEvent::PlacementFailed {
                by_team: parse_team(&by_team)?,
                remaining_distance: to_mm(remaining_distance),
            },
            WireGameEvent::BotInterferedPlacement {
                by_team,
                by_bot,
                location,
            } => {
                const EV: &str = "bot_interfered_placement";
                GameEvent::BotInterferedPlacement {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                }
            }
            WireGameEvent::BotTooFastInStop {
                by_team,
                by_bot,
                location,
                speed,
            } => {
                const EV: &str = "bot_too_fast_in_stop";
                GameEvent::BotTooFastInStop {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                    speed,
                }
            }
            WireGameEvent::DefenderTooCloseToKickPoint {
                by_team,
                by_bot,
                location,
                distance,
            } => {
                const EV: &str = "defender_too_close_to_kick_point";
                GameEvent::DefenderTooCloseToKickPoint {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                    distance: to_mm(distance),
                }
            }
            WireGameEvent::AttackerTooCloseToDefenseArea {
                by_team,
                by_bot,
                location,
                distance,
            } => {
                const EV: &str = "attacker_too_close_to_defense_area";
                GameEvent::AttackerTooCloseToDefenseArea {
                    by_team: parse_team(&by_team)?,
                    by_bot: required(by_bot, EV, "by_bot")?,
                    location: required_pos(location, EV, "location")?,
                    distance: to_mm(distance),
                }
            }
            WireGameEvent::TooManyRobots {
                by_team,
                num_robots_allowed,
                num_robots_on_field,
                ball_location,
            } => GameEvent::TooManyRobots {
                by_team: parse_team(&by_team)?,
                num_robots_allowed,
                num_robots_on_field,
                ball_location: required_pos(ball_location, "too_many_robots", "ball_location")?,
            },
        };
        Ok(event)
    }
}

/// Command kind on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WireCommandType {
    Halt,
    Stop,
    NormalStart,
    ForceStart,
    Kickoff,
    Penalty,
    DirectFree,
    IndirectFree,
    BallPlacement,
    Goal,
}

/// Restart command as sent to the referee box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WireCommand {
    #[serde(rename = "type")]
    pub command_type: WireCommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designated_position: Option<WireVector>,
}

impl From<&RefereeCommand> for WireCommand {
    fn from(cmd: &RefereeCommand) -> Self {
        let command_type = match cmd.kind {
            CommandKind::Halt => WireCommandType::Halt,
            CommandKind::Stop => WireCommandType::Stop,
            CommandKind::NormalStart => WireCommandType::NormalStart,
            CommandKind::ForceStart => WireCommandType::ForceStart,
            CommandKind::Kickoff(_) => WireCommandType::Kickoff,
            CommandKind::Penalty(_) => WireCommandType::Penalty,
            CommandKind::DirectFree(_) => WireCommandType::DirectFree,
            CommandKind::IndirectFree(_) => WireCommandType::IndirectFree,
            CommandKind::BallPlacement(_) => WireCommandType::BallPlacement,
            CommandKind::Goal(_) => WireCommandType::Goal,
        };
        Self {
            command_type,
            for_team: cmd.kind.team().map(|t| t.as_str().to_string()),
            designated_position: cmd.position.as_ref().map(WireVector::from_mm),
        }
    }
}

impl TryFrom<WireCommand> for RefereeCommand {
    type Error = WireError;

    fn try_from(wire: WireCommand) -> Result<Self, Self::Error> {
        let team = || -> Result<TeamColor, WireError> {
            parse_team(required(wire.for_team.as_deref(), "command", "for_team")?)
        };
        let kind = match wire.command_type {
            WireCommandType::Halt => CommandKind::Halt,
            WireCommandType::Stop => CommandKind::Stop,
            WireCommandType::NormalStart => CommandKind::NormalStart,
            WireCommandType::ForceStart => CommandKind::ForceStart,
            WireCommandType::Kickoff => CommandKind::Kickoff(team()?),
            WireCommandType::Penalty => CommandKind::Penalty(team()?),
            WireCommandType::DirectFree => CommandKind::DirectFree(team()?),
            WireCommandType::IndirectFree => CommandKind::IndirectFree(team()?),
            WireCommandType::BallPlacement => CommandKind::BallPlacement(team()?),
            WireCommandType::Goal => CommandKind::Goal(team()?),
        };
        Ok(RefereeCommand {
            kind,
            position: wire.designated_position.map(WireVector::to_mm),
        })
    }
}

/// Serialize an event to its wire JSON.
pub fn to_json(event: &GameEvent) -> Result<String, WireError> {
    Ok(serde_json::to_string(&WireGameEvent::from(event))?)
}

/// Decode an event from wire JSON.
pub fn from_json(json: &str) -> Result<GameEvent, WireError> {
    let wire: WireGameEvent = serde_json::from_str(json)?;
    GameEvent::try_from(wire)
}

/// JSON schema of the event message, for the league's schema registry.
pub fn event_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(WireGameEvent)
}
