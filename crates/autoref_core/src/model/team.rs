use serde::{Deserialize, Serialize};
use std::fmt;

/// Team identifier as used by the league (neutral representation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamColor {
    Yellow,
    Blue,
}

impl TeamColor {
    pub const BOTH: [TeamColor; 2] = [TeamColor::Yellow, TeamColor::Blue];

    /// Get opponent team
    pub fn opponent(&self) -> Self {
        match self {
            TeamColor::Yellow => TeamColor::Blue,
            TeamColor::Blue => TeamColor::Yellow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamColor::Yellow => "YELLOW",
            TeamColor::Blue => "BLUE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "YELLOW" => Some(TeamColor::Yellow),
            "BLUE" => Some(TeamColor::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Robot identity: team colour plus shirt number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BotId {
    pub team: TeamColor,
    pub number: u32,
}

impl BotId {
    pub const fn new(team: TeamColor, number: u32) -> Self {
        Self { team, number }
    }

    pub const fn yellow(number: u32) -> Self {
        Self::new(TeamColor::Yellow, number)
    }

    pub const fn blue(number: u32) -> Self {
        Self::new(TeamColor::Blue, number)
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.team {
            TeamColor::Yellow => 'Y',
            TeamColor::Blue => 'B',
        };
        write!(f, "{}{}", prefix, self.number)
    }
}
