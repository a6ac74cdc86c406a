//! Data model: identifiers, inputs from the world predictor and referee box,
//! and the per-tick [`Frame`] with its derived facts.

mod frame;
mod game_state;
mod history;
mod referee;
mod team;
mod time;
mod world;

pub use frame::{BotTouchRecord, Frame, FrameFacts, PossibleGoal, TeamIdentity, TeamIdentities, TimedPosition};
pub use game_state::{GameState, GameStateKind, GameStateSet, RefCommand};
pub use history::FrameHistory;
pub use referee::{RefereeMsg, TeamInfo};
pub use team::{BotId, TeamColor};
pub use time::Timestamp;
pub use world::{BallState, KickEvent, TrackedBot, WorldFrame};
