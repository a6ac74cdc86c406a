use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Vec2;
use crate::model::TeamColor;

/// Restart command requested by the referee engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "team", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    Halt,
    Stop,
    NormalStart,
    ForceStart,
    Kickoff(TeamColor),
    Penalty(TeamColor),
    DirectFree(TeamColor),
    IndirectFree(TeamColor),
    BallPlacement(TeamColor),
    Goal(TeamColor),
}

impl CommandKind {
    pub fn team(&self) -> Option<TeamColor> {
        match self {
            CommandKind::Halt
            | CommandKind::Stop
            | CommandKind::NormalStart
            | CommandKind::ForceStart => None,
            CommandKind::Kickoff(t)
            | CommandKind::Penalty(t)
            | CommandKind::DirectFree(t)
            | CommandKind::IndirectFree(t)
            | CommandKind::BallPlacement(t)
            | CommandKind::Goal(t) => Some(*t),
        }
    }
}

/// Command plus optional target position (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefereeCommand {
    pub kind: CommandKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
}

impl RefereeCommand {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }

    pub fn with_position(kind: CommandKind, position: Vec2) -> Self {
        Self {
            kind,
            position: Some(position),
        }
    }

    pub fn stop() -> Self {
        Self::new(CommandKind::Stop)
    }

    pub fn halt() -> Self {
        Self::new(CommandKind::Halt)
    }

    pub fn normal_start() -> Self {
        Self::new(CommandKind::NormalStart)
    }

    pub fn force_start() -> Self {
        Self::new(CommandKind::ForceStart)
    }

    pub fn ball_placement(team: TeamColor, target: Vec2) -> Self {
        Self::with_position(CommandKind::BallPlacement(team), target)
    }

    pub fn goal(team: TeamColor) -> Self {
        Self::new(CommandKind::Goal(team))
    }
}

impl fmt::Display for RefereeCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(pos) = self.position {
            write!(f, " @ ({:.0}, {:.0})", pos.x, pos.y)?;
        }
        Ok(())
    }
}
