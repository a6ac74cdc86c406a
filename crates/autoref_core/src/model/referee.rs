use serde::{Deserialize, Serialize};

use super::{BotId, GameState, RefCommand, TeamColor, Timestamp};
use crate::geometry::Vec2;

/// Per-team information reported by the referee box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamInfo {
    pub name: String,
    pub score: u32,
    pub red_cards: u32,
    pub yellow_cards: u32,
    /// Remaining time of each active yellow card (seconds)
    pub yellow_card_times: Vec<f64>,
    /// Shirt number of the goalkeeper
    pub goalkeeper: u32,
    /// Bots this team may currently have on the field
    pub max_allowed_bots: u32,
}

impl Default for TeamInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            score: 0,
            red_cards: 0,
            yellow_cards: 0,
            yellow_card_times: Vec::new(),
            goalkeeper: 0,
            max_allowed_bots: 11,
        }
    }
}

/// Latest referee box message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RefereeMsg {
    pub command: RefCommand,
    /// Incremented by the referee box for every new command
    pub command_counter: u32,
    pub command_timestamp: Timestamp,
    pub game_state: GameState,
    pub yellow: TeamInfo,
    pub blue: TeamInfo,
    pub blue_on_positive_half: bool,
    /// Ball placement target (mm)
    pub designated_position: Option<Vec2>,
    pub next_command: Option<RefCommand>,
    /// Time left for the current action, negative once exceeded (seconds)
    pub current_action_time_remaining: Option<f64>,
}

impl RefereeMsg {
    pub fn team(&self, color: TeamColor) -> &TeamInfo {
        match color {
            TeamColor::Yellow => &self.yellow,
            TeamColor::Blue => &self.blue,
        }
    }

    /// Sign of the x coordinate of the goal `team` defends.
    pub fn own_goal_sign(&self, team: TeamColor) -> f64 {
        let blue_positive = self.blue_on_positive_half;
        match (team, blue_positive) {
            (TeamColor::Blue, true) | (TeamColor::Yellow, false) => 1.0,
            _ => -1.0,
        }
    }

    /// Team defending the goal on side `goal_sign`.
    pub fn goal_owner(&self, goal_sign: f64) -> TeamColor {
        if self.own_goal_sign(TeamColor::Blue) * goal_sign > 0.0 {
            TeamColor::Blue
        } else {
            TeamColor::Yellow
        }
    }

    pub fn keeper(&self, team: TeamColor) -> BotId {
        BotId::new(team, self.team(team).goalkeeper)
    }

    pub fn is_keeper(&self, bot: BotId) -> bool {
        self.keeper(bot.team) == bot
    }
}
