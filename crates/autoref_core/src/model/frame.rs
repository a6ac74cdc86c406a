//! Per-tick frame with derived facts.
//!
//! A [`Frame`] is assembled from the world predictor's output and the latest
//! referee message, extended by the fact calculators, and then frozen in the
//! [`FrameHistory`](super::FrameHistory). Detectors only ever see `&Frame`.

use serde::{Deserialize, Serialize};

use super::{BotId, GameState, RefereeMsg, TeamColor, Timestamp, TrackedBot, WorldFrame};
use crate::geometry::Vec2;

/// Position with the time it was observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedPosition {
    pub pos: Vec2,
    pub timestamp: Timestamp,
}

/// "This bot was in contact with the ball at this instant."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotTouchRecord {
    pub bot: BotId,
    /// Ball position at the contact
    pub pos: Vec2,
    pub timestamp: Timestamp,
}

impl BotTouchRecord {
    /// Same bot and same instant: the record was already handled.
    pub fn same_contact(&self, other: &BotTouchRecord) -> bool {
        self.bot == other.bot && self.timestamp == other.timestamp
    }
}

/// Ball settled inside a goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PossibleGoal {
    /// Team credited with the goal
    pub scoring_team: TeamColor,
    /// Sign of the goal the ball is in
    pub goal_sign: f64,
    /// Ball position at goal entry
    pub entry_pos: Vec2,
    /// Time the ball entered the goal
    pub timestamp: Timestamp,
}

/// Stable identity of a team across colour swaps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentity {
    pub id: u32,
    pub name: String,
    pub color: TeamColor,
}

/// Exactly one identity per colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentities {
    pub yellow: TeamIdentity,
    pub blue: TeamIdentity,
}

impl TeamIdentities {
    pub fn of(&self, color: TeamColor) -> &TeamIdentity {
        match color {
            TeamColor::Yellow => &self.yellow,
            TeamColor::Blue => &self.blue,
        }
    }
}

impl Default for TeamIdentities {
    fn default() -> Self {
        Self {
            yellow: TeamIdentity {
                id: 0,
                name: String::new(),
                color: TeamColor::Yellow,
            },
            blue: TeamIdentity {
                id: 1,
                name: String::new(),
                color: TeamColor::Blue,
            },
        }
    }
}

/// Facts written by the calculators
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameFacts {
    /// Where and when the ball last crossed the field boundary; cleared once
    /// the ball is back in play
    pub ball_left_field: Option<TimedPosition>,
    pub ball_inside_field: bool,
    pub bot_last_touched_ball: Option<BotTouchRecord>,
    pub bots_touching_ball: Vec<BotTouchRecord>,
    pub possible_goal: Option<PossibleGoal>,
    pub team_identities: TeamIdentities,
    pub last_stop_ball_position: Option<Vec2>,
}

/// Immutable-per-tick snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub tick: u64,
    pub world: WorldFrame,
    pub referee: RefereeMsg,
    pub facts: FrameFacts,
}

impl Frame {
    pub fn new(tick: u64, world: WorldFrame, referee: RefereeMsg) -> Self {
        Self {
            tick,
            world,
            referee,
            facts: FrameFacts::default(),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.world.timestamp
    }

    pub fn game_state(&self) -> GameState {
        self.referee.game_state
    }

    pub fn ball_pos(&self) -> Vec2 {
        self.world.ball.pos
    }

    pub fn bot(&self, id: BotId) -> Option<&TrackedBot> {
        self.world.bot(id)
    }

    pub fn is_touching(&self, bot: BotId) -> bool {
        self.facts.bots_touching_ball.iter().any(|r| r.bot == bot)
    }

    /// Sign of the x coordinate of the goal `team` defends.
    pub fn own_goal_sign(&self, team: TeamColor) -> f64 {
        self.referee.own_goal_sign(team)
    }
}
