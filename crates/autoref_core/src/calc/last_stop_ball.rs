use crate::geometry::Vec2;
use crate::model::{Frame, FrameHistory, GameStateKind};

/// Remembers where the ball was when the game was last stopped.
#[derive(Debug, Clone, Default)]
pub struct LastStopBallCalc {
    position: Option<Vec2>,
}

impl LastStopBallCalc {
    pub fn process(&mut self, frame: &mut Frame, history: &FrameHistory) {
        let entered_stop = frame.game_state().kind == GameStateKind::Stop
            && history
                .latest()
                .map_or(true, |prev| prev.game_state().kind != GameStateKind::Stop);
        if entered_stop {
            self.position = Some(frame.ball_pos());
        }
        frame.facts.last_stop_ball_position = self.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameState;
    use crate::test_fixtures::scene;

    #[test]
    fn test_records_on_stop_entry_only() {
        let mut calc = LastStopBallCalc::default();
        let mut history = FrameHistory::new(4);

        let mut frame = scene(0).state(GameState::RUNNING).ball(100.0, 0.0).frame();
        calc.process(&mut frame, &history);
        assert_eq!(frame.facts.last_stop_ball_position, None);
        history.push(frame);

        let mut frame = scene(1).state(GameState::STOP).ball(200.0, 0.0).frame();
        calc.process(&mut frame, &history);
        history.push(frame);

        let mut frame = scene(2).state(GameState::STOP).ball(900.0, 0.0).frame();
        calc.process(&mut frame, &history);
        assert_eq!(frame.facts.last_stop_ball_position, Some(Vec2::new(200.0, 0.0)));
        history.push(frame);

        let mut frame = scene(3).state(GameState::RUNNING).ball(0.0, 0.0).frame();
        calc.process(&mut frame, &history);
        assert_eq!(frame.facts.last_stop_ball_position, Some(Vec2::new(200.0, 0.0)));
    }
}
