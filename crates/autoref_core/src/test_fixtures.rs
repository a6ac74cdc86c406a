//! Scene builders shared by the unit and scenario tests.

use crate::config::RefereeConfig;
use crate::detectors::{Detector, DetectorContext, RuleOutcome};
use crate::events::FollowUpAction;
use crate::geometry::{Field, Vec2};
use crate::model::{
    BotId, BotTouchRecord, Frame, FrameHistory, GameState, KickEvent, RefereeMsg, Timestamp,
    TrackedBot, WorldFrame,
};

pub const TICK_SECS: f64 = 1.0 / 60.0;

pub fn config() -> RefereeConfig {
    RefereeConfig::division_a()
}

pub fn field() -> Field {
    let cfg = config();
    Field::new(&cfg.field, &cfg.robots)
}

pub fn ts(secs: f64) -> Timestamp {
    Timestamp::from_secs(secs)
}

/// Fluent builder for a single frame.
#[derive(Debug, Clone)]
pub struct Scene {
    tick: u64,
    world: WorldFrame,
    referee: RefereeMsg,
    touching: Vec<BotId>,
    last_touch: Option<BotTouchRecord>,
}

pub fn scene(tick: u64) -> Scene {
    Scene {
        tick,
        world: WorldFrame {
            timestamp: ts(tick as f64 * TICK_SECS),
            ..Default::default()
        },
        referee: RefereeMsg {
            game_state: GameState::RUNNING,
            ..Default::default()
        },
        touching: Vec::new(),
        last_touch: None,
    }
}

impl Scene {
    pub fn at_secs(mut self, secs: f64) -> Self {
        self.world.timestamp = ts(secs);
        self
    }

    pub fn state(mut self, state: GameState) -> Self {
        self.referee.game_state = state;
        self
    }

    pub fn referee(mut self, f: impl FnOnce(&mut RefereeMsg)) -> Self {
        f(&mut self.referee);
        self
    }

    pub fn ball(mut self, x: f64, y: f64) -> Self {
        self.world.ball.pos = Vec2::new(x, y);
        self
    }

    pub fn ball_vel(mut self, vx: f64, vy: f64) -> Self {
        self.world.ball.vel = Vec2::new(vx, vy);
        self
    }

    pub fn ball_height(mut self, h: f64) -> Self {
        self.world.ball.height = h;
        self
    }

    pub fn chipped(mut self) -> Self {
        self.world.ball.chipped = true;
        self
    }

    pub fn bot(mut self, id: BotId, x: f64, y: f64) -> Self {
        self.world.insert_bot(TrackedBot::new(id, Vec2::new(x, y)));
        self
    }

    pub fn bot_vel(mut self, id: BotId, x: f64, y: f64, vx: f64, vy: f64) -> Self {
        let mut bot = TrackedBot::new(id, Vec2::new(x, y));
        bot.vel = Vec2::new(vx, vy);
        self.world.insert_bot(bot);
        self
    }

    pub fn bot_facing(mut self, id: BotId, x: f64, y: f64, orientation: f64) -> Self {
        let mut bot = TrackedBot::new(id, Vec2::new(x, y));
        bot.orientation = orientation;
        self.world.insert_bot(bot);
        self
    }

    pub fn kick(mut self, bot: BotId, x: f64, y: f64, secs: f64) -> Self {
        self.world.kick_event = Some(KickEvent {
            kicking_bot: bot,
            position: Vec2::new(x, y),
            timestamp: ts(secs),
        });
        self
    }

    /// Mark bots as touching the ball this tick (also sets last touch).
    pub fn touching(mut self, bots: &[BotId]) -> Self {
        self.touching = bots.to_vec();
        self
    }

    /// Set the last-touch fact without a current contact.
    pub fn last_touch(mut self, bot: BotId, secs: f64) -> Self {
        self.last_touch = Some(BotTouchRecord {
            bot,
            pos: self.world.ball.pos,
            timestamp: ts(secs),
        });
        self
    }

    /// Raw frame without derived facts.
    pub fn raw(self) -> (WorldFrame, RefereeMsg) {
        (self.world, self.referee)
    }

    /// Frame with the touch facts filled in.
    pub fn frame(self) -> Frame {
        let timestamp = self.world.timestamp;
        let ball = self.world.ball.pos;
        let mut frame = Frame::new(self.tick, self.world, self.referee);
        frame.facts.ball_inside_field = true;
        frame.facts.bots_touching_ball = self
            .touching
            .iter()
            .map(|bot| BotTouchRecord {
                bot: *bot,
                pos: ball,
                timestamp,
            })
            .collect();
        frame.facts.bot_last_touched_ball = frame
            .facts
            .bots_touching_ball
            .first()
            .copied()
            .or(self.last_touch);
        frame
    }
}

/// Drives a single detector the way the engine does.
pub struct Harness {
    pub field: Field,
    pub history: FrameHistory,
    pub follow_up: Option<FollowUpAction>,
    was_active: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            field: field(),
            history: FrameHistory::new(8),
            follow_up: None,
            was_active: false,
        }
    }

    pub fn with_follow_up(mut self, follow_up: FollowUpAction) -> Self {
        self.follow_up = Some(follow_up);
        self
    }

    pub fn run(&mut self, detector: &mut dyn Detector, frame: Frame) -> Option<RuleOutcome> {
        let active = detector.active_states().contains(frame.game_state().kind);
        self.history.push(frame);
        let frame = self.history.latest().expect("frame just pushed");
        if !active {
            self.was_active = false;
            return None;
        }
        if !self.was_active {
            detector.on_activate(frame);
            self.was_active = true;
        }
        let ctx = DetectorContext {
            frame,
            history: &self.history,
            field: &self.field,
            follow_up: self.follow_up.as_ref(),
        };
        detector.update(&ctx).expect("detector error")
    }

    /// Feed frames and collect every outcome.
    pub fn run_all(
        &mut self,
        detector: &mut dyn Detector,
        frames: impl IntoIterator<Item = Frame>,
    ) -> Vec<RuleOutcome> {
        frames
            .into_iter()
            .filter_map(|f| self.run(detector, f))
            .collect()
    }
}
