use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{BotId, TeamColor, Timestamp};
use crate::geometry::Vec2;

/// Tracked ball as delivered by the world predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallState {
    /// Ground-plane position (mm)
    pub pos: Vec2,
    /// Height above ground (mm)
    pub height: f64,
    /// Ground-plane velocity (m/s)
    pub vel: Vec2,
    /// Ball is believed to be airborne after a chip kick
    pub chipped: bool,
    pub visible: bool,
}

impl Default for BallState {
    fn default() -> Self {
        Self {
            pos: Vec2::zeros(),
            height: 0.0,
            vel: Vec2::zeros(),
            chipped: false,
            visible: true,
        }
    }
}

impl BallState {
    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

/// Tracked robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedBot {
    pub id: BotId,
    /// Position (mm)
    pub pos: Vec2,
    /// Velocity (m/s)
    pub vel: Vec2,
    /// Heading in radians
    #[serde(default)]
    pub orientation: f64,
}

impl TrackedBot {
    pub fn new(id: BotId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::zeros(),
            orientation: 0.0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

/// Kick detected by the world predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickEvent {
    pub kicking_bot: BotId,
    /// Ball position at the kick (mm)
    pub position: Vec2,
    pub timestamp: Timestamp,
}

/// One tick of world state from the world predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldFrame {
    pub timestamp: Timestamp,
    #[serde(default)]
    pub ball: BallState,
    #[serde(default, with = "bot_list")]
    pub bots: BTreeMap<BotId, TrackedBot>,
    #[serde(default)]
    pub kick_event: Option<KickEvent>,
}

impl WorldFrame {
    pub fn bot(&self, id: BotId) -> Option<&TrackedBot> {
        self.bots.get(&id)
    }

    pub fn bots_of(&self, team: TeamColor) -> impl Iterator<Item = &TrackedBot> {
        self.bots.values().filter(move |b| b.id.team == team)
    }

    pub fn insert_bot(&mut self, bot: TrackedBot) {
        self.bots.insert(bot.id, bot);
    }
}

/// Bots travel as a plain list on the wire; the map key is the bot id.
mod bot_list {
    use super::{BotId, TrackedBot};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        bots: &BTreeMap<BotId, TrackedBot>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&TrackedBot> = bots.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<BotId, TrackedBot>, D::Error> {
        let list = Vec::<TrackedBot>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|b| (b.id, b)).collect())
    }
}
