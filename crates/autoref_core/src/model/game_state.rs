use serde::{Deserialize, Serialize};
use std::fmt;

use super::TeamColor;

/// Game state without the team it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStateKind {
    Halt,
    Stop,
    Running,
    Timeout,
    Break,
    PostGame,
    PrepareKickoff,
    Kickoff,
    PreparePenalty,
    Penalty,
    DirectFree,
    IndirectFree,
    BallPlacement,
}

impl GameStateKind {
    pub const ALL: [GameStateKind; 13] = [
        GameStateKind::Halt,
        GameStateKind::Stop,
        GameStateKind::Running,
        GameStateKind::Timeout,
        GameStateKind::Break,
        GameStateKind::PostGame,
        GameStateKind::PrepareKickoff,
        GameStateKind::Kickoff,
        GameStateKind::PreparePenalty,
        GameStateKind::Penalty,
        GameStateKind::DirectFree,
        GameStateKind::IndirectFree,
        GameStateKind::BallPlacement,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Restart states in which the ball is about to be kicked.
    pub fn is_kick_state(self) -> bool {
        matches!(
            self,
            GameStateKind::Kickoff
                | GameStateKind::Penalty
                | GameStateKind::DirectFree
                | GameStateKind::IndirectFree
        )
    }
}

/// Set of game state kinds, used as detector activation predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStateSet(u16);

impl GameStateSet {
    pub const EMPTY: GameStateSet = GameStateSet(0);

    pub const fn of(kinds: &[GameStateKind]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        GameStateSet(bits)
    }

    /// Every state except the listed ones.
    pub const fn all_except(kinds: &[GameStateKind]) -> Self {
        let all = (1u16 << GameStateKind::ALL.len()) - 1;
        GameStateSet(all & !Self::of(kinds).0)
    }

    pub const fn contains(self, kind: GameStateKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn union(self, other: GameStateSet) -> Self {
        GameStateSet(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Game state with the team it applies to (kicking/placing team).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub kind: GameStateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_team: Option<TeamColor>,
}

impl GameState {
    pub const HALT: GameState = GameState::neutral(GameStateKind::Halt);
    pub const STOP: GameState = GameState::neutral(GameStateKind::Stop);
    pub const RUNNING: GameState = GameState::neutral(GameStateKind::Running);

    pub const fn neutral(kind: GameStateKind) -> Self {
        Self {
            kind,
            for_team: None,
        }
    }

    pub const fn for_team(kind: GameStateKind, team: TeamColor) -> Self {
        Self {
            kind,
            for_team: Some(team),
        }
    }

    pub fn is_running(&self) -> bool {
        self.kind == GameStateKind::Running
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::HALT
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.for_team {
            Some(team) => write!(f, "{:?}({})", self.kind, team),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

/// Command issued by the referee box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "team", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefCommand {
    #[default]
    Halt,
    Stop,
    NormalStart,
    ForceStart,
    PrepareKickoff(TeamColor),
    PreparePenalty(TeamColor),
    DirectFree(TeamColor),
    IndirectFree(TeamColor),
    Timeout(TeamColor),
    Goal(TeamColor),
    BallPlacement(TeamColor),
}

impl RefCommand {
    pub fn is_free_kick(&self) -> bool {
        matches!(self, RefCommand::DirectFree(_) | RefCommand::IndirectFree(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set() {
        const SET: GameStateSet = GameStateSet::of(&[GameStateKind::Running, GameStateKind::Stop]);
        assert!(SET.contains(GameStateKind::Running));
        assert!(SET.contains(GameStateKind::Stop));
        assert!(!SET.contains(GameStateKind::Halt));

        let not_halt = GameStateSet::all_except(&[GameStateKind::Halt]);
        assert!(!not_halt.contains(GameStateKind::Halt));
        assert!(not_halt.contains(GameStateKind::BallPlacement));
        assert!(GameStateSet::EMPTY.is_empty());
    }

    #[test]
    fn test_ref_command_json() {
        let json = serde_json::to_string(&RefCommand::DirectFree(TeamColor::Blue)).unwrap();
        assert_eq!(json, r#"{"type":"DIRECT_FREE","team":"BLUE"}"#);
        let back: RefCommand = serde_json::from_str(r#"{"type":"STOP"}"#).unwrap();
        assert_eq!(back, RefCommand::Stop);
    }
}
