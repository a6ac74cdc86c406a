use serde::{Deserialize, Serialize};

use super::{CommandKind, RefereeCommand};
use crate::geometry::Vec2;
use crate::model::TeamColor;

/// How play resumes after a stoppage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FollowUpKind {
    DirectFree,
    IndirectFree,
    ForceStart,
    KickOff,
    Penalty,
}

/// Restart queued by a rule and consumed by the stop/placement rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowUpAction {
    pub kind: FollowUpKind,
    pub team: TeamColor,
    /// Where the ball must be placed before the restart (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
}

impl FollowUpAction {
    pub fn new(kind: FollowUpKind, team: TeamColor, position: Option<Vec2>) -> Self {
        Self {
            kind,
            team,
            position,
        }
    }

    pub fn direct_free(team: TeamColor, position: Vec2) -> Self {
        Self::new(FollowUpKind::DirectFree, team, Some(position))
    }

    pub fn indirect_free(team: TeamColor, position: Vec2) -> Self {
        Self::new(FollowUpKind::IndirectFree, team, Some(position))
    }

    pub fn force_start(team: TeamColor, position: Vec2) -> Self {
        Self::new(FollowUpKind::ForceStart, team, Some(position))
    }

    /// Kickoff always restarts from the centre spot.
    pub fn kickoff(team: TeamColor) -> Self {
        Self::new(FollowUpKind::KickOff, team, Some(Vec2::zeros()))
    }

    pub fn penalty(team: TeamColor, mark: Vec2) -> Self {
        Self::new(FollowUpKind::Penalty, team, Some(mark))
    }

    pub fn is_free_kick(&self) -> bool {
        matches!(self.kind, FollowUpKind::DirectFree | FollowUpKind::IndirectFree)
    }

    /// Command that executes this restart once the ball is in position.
    pub fn to_command(&self) -> RefereeCommand {
        let kind = match self.kind {
            FollowUpKind::DirectFree => CommandKind::DirectFree(self.team),
            FollowUpKind::IndirectFree => CommandKind::IndirectFree(self.team),
            FollowUpKind::ForceStart => CommandKind::ForceStart,
            FollowUpKind::KickOff => CommandKind::Kickoff(self.team),
            FollowUpKind::Penalty => CommandKind::Penalty(self.team),
        };
        RefereeCommand::new(kind)
    }

    /// Same restart awarded to the other team.
    pub fn for_opponent(&self) -> Self {
        Self {
            team: self.team.opponent(),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_command() {
        let fu = FollowUpAction::indirect_free(TeamColor::Blue, Vec2::new(100.0, 0.0));
        assert_eq!(fu.to_command().kind, CommandKind::IndirectFree(TeamColor::Blue));
        assert!(fu.is_free_kick());
        assert_eq!(
            FollowUpAction::kickoff(TeamColor::Yellow).to_command().kind,
            CommandKind::Kickoff(TeamColor::Yellow)
        );
        assert_eq!(fu.for_opponent().team, TeamColor::Yellow);
        assert_eq!(fu.for_opponent().position, fu.position);
    }
}
