//! # autoref_core - Deterministic Autonomous Referee Engine
//!
//! Watches a stream of world-state snapshots from a robot-soccer match and
//! emits discrete game events (fouls, goals, placement outcomes) together with
//! the restart commands a referee box needs to resume play.
//!
//! ## Pipeline
//! ```text
//! WorldFrame + RefereeMsg
//!        │
//!        ▼
//!   Frame assembly ── FrameHistory (bounded ring buffer)
//!        │
//!        ▼
//!   Fact calculators (touch, left-field, possible goal, teams, stop ball)
//!        │
//!        ▼
//!   Detector set (one state machine per rule, scoped by game state)
//!        │
//!        ▼
//!   Arbitration (priority winner, follow-up action, command debounce)
//!        │
//!        ▼
//!   TickOutput { winner, commands, violations, follow_up }
//! ```
//!
//! ## Features
//! - Single-threaded, tick-driven and replayable: every time-relative rule
//!   reads the frame timestamp, never the wall clock
//! - Configuration injected through [`config::RefereeConfig`] presets
//! - Wire contract for events/commands in [`events::wire`]

pub mod calc;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod model;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use config::RefereeConfig;
pub use engine::{ArbitrationMode, EngineStats, RefereeEngine, RefereeEngineBuilder, TickOutput};
pub use error::{ConfigError, DetectorError, WireError};
pub use events::{CommandKind, FollowUpAction, FollowUpKind, GameEvent, GameEventKind, RefereeCommand};
pub use geometry::Vec2;
pub use model::{
    BotId, Frame, GameState, GameStateKind, RefCommand, RefereeMsg, TeamColor, Timestamp,
    WorldFrame,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
