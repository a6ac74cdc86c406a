//! Fact calculators.
//!
//! Run once per tick, before any detector, and write derived facts into
//! [`FrameFacts`](crate::model::FrameFacts). The history handed to a
//! calculator does not contain the frame being processed yet, so
//! `history.latest()` is the previous tick.
//!
//! ## Order (fixed)
//! 1. Team identities
//! 2. Ball touch
//! 3. Ball left field
//! 4. Possible goal
//! 5. Last stop ball position

mod ball_left_field;
mod ball_touch;
mod last_stop_ball;
mod possible_goal;
mod team_info;

pub use ball_left_field::BallLeftFieldCalc;
pub use ball_touch::BallTouchCalc;
pub use last_stop_ball::LastStopBallCalc;
pub use possible_goal::PossibleGoalCalc;
pub use team_info::TeamInfoCalc;

use crate::config::RefereeConfig;
use crate::geometry::Field;
use crate::model::{Frame, FrameHistory};

/// All calculators, run in declaration order.
#[derive(Debug, Clone)]
pub struct FactCalculators {
    team_info: TeamInfoCalc,
    ball_touch: BallTouchCalc,
    ball_left_field: BallLeftFieldCalc,
    possible_goal: PossibleGoalCalc,
    last_stop_ball: LastStopBallCalc,
}

impl FactCalculators {
    pub fn new(config: &RefereeConfig) -> Self {
        let field = Field::new(&config.field, &config.robots);
        Self {
            team_info: TeamInfoCalc::new(),
            ball_touch: BallTouchCalc::new(config.ball_touch.clone(), &field),
            ball_left_field: BallLeftFieldCalc::new(config.ball_left_field.clone(), &field),
            possible_goal: PossibleGoalCalc::new(config.possible_goal.clone(), field),
            last_stop_ball: LastStopBallCalc::default(),
        }
    }

    pub fn run(&mut self, frame: &mut Frame, history: &FrameHistory) {
        self.team_info.process(frame);
        self.ball_touch.process(frame, history);
        self.ball_left_field.process(frame);
        self.possible_goal.process(frame);
        self.last_stop_ball.process(frame, history);
    }
}
