use std::collections::VecDeque;

use crate::config::BallLeftFieldConfig;
use crate::geometry::{Field, Rectangle, Vec2};
use crate::model::{Frame, TimedPosition, Timestamp};

/// Tracks where the ball crossed the field boundary.
///
/// Two samples at least `min_comparison_span` apart are compared; the older
/// one must be at least `max_time_to_detect_chip_kick` old so that a chip
/// kick flagged late by the world predictor can still invalidate it. Only an
/// inside to outside transition records a crossing, and the crossing stays
/// until the ball is back in play.
#[derive(Debug, Clone)]
pub struct BallLeftFieldCalc {
    config: BallLeftFieldConfig,
    in_play: Rectangle,
    /// Newest first
    samples: VecDeque<TimedPosition>,
    crossing: Option<TimedPosition>,
}

impl BallLeftFieldCalc {
    pub fn new(config: BallLeftFieldConfig, field: &Field) -> Self {
        Self {
            config,
            in_play: field.ball_in_play_rect(),
            samples: VecDeque::new(),
            crossing: None,
        }
    }

    pub fn process(&mut self, frame: &mut Frame) {
        let now = frame.timestamp();
        let ball = &frame.world.ball;

        if ball.visible {
            self.samples.push_front(TimedPosition {
                pos: ball.pos,
                timestamp: now,
            });
        }

        let retention = self.config.retention();
        self.samples.retain(|s| {
            let age = now.secs_since(s.timestamp);
            (0.0..=retention).contains(&age)
        });

        if ball.chipped {
            match &frame.world.kick_event {
                Some(kick)
                    if now.secs_since(kick.timestamp) < self.config.max_time_to_detect_chip_kick =>
                {
                    self.samples.clear();
                }
                Some(_) => {}
                None => {
                    log::warn!("ball flagged as chipped without a kick event; keeping samples");
                }
            }
        }

        if let Some(newest) = self.samples.front() {
            if self.crossing.is_some() && self.in_play.contains(&newest.pos) {
                self.crossing = None;
            }
        }

        if self.crossing.is_none() {
            self.crossing = self.detect_crossing(now);
            if let Some(c) = &self.crossing {
                log::debug!("ball left the field at ({:.0}, {:.0})", c.pos.x, c.pos.y);
            }
        }

        frame.facts.ball_left_field = self.crossing;
        frame.facts.ball_inside_field = self.crossing.is_none();
    }

    fn detect_crossing(&self, now: Timestamp) -> Option<TimedPosition> {
        let newest = self.samples.front()?;
        let trusted = self
            .samples
            .iter()
            .find(|s| now.secs_since(s.timestamp) > self.config.max_time_to_detect_chip_kick)?;

        if newest.timestamp.secs_since(trusted.timestamp) < self.config.min_comparison_span {
            return None;
        }
        if !self.in_play.contains(&trusted.pos) || self.in_play.contains(&newest.pos) {
            return None;
        }
        Some(TimedPosition {
            pos: self.crossing_point(&trusted.pos, &newest.pos),
            timestamp: newest.timestamp,
        })
    }

    /// Boundary point on the way out, nearest the outside sample.
    fn crossing_point(&self, inside: &Vec2, outside: &Vec2) -> Vec2 {
        self.in_play
            .segment_intersections(inside, outside)
            .into_iter()
            .min_by(|a, b| (a - outside).norm().total_cmp(&(b - outside).norm()))
            .unwrap_or_else(|| self.in_play.nearest_point_on_boundary(outside))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BotId;
    use crate::test_fixtures::{config, field, scene};
    use proptest::prelude::*;

    fn calc() -> BallLeftFieldCalc {
        BallLeftFieldCalc::new(config().ball_left_field, &field())
    }

    #[test]
    fn test_crossing_recorded_at_outside_sample() {
        let mut calc = calc();
        // 60 Hz, ball rolling out over the touch line (y = 4500 + 31.5)
        let mut result = None;
        let mut out_time = None;
        for tick in 0..60u64 {
            let y = 4000.0 + tick as f64 * 20.0;
            let mut frame = scene(tick).ball(1000.0, y).ball_vel(0.0, 1.2).frame();
            calc.process(&mut frame);
            if result.is_none() && frame.facts.ball_left_field.is_some() {
                result = frame.facts.ball_left_field;
                out_time = Some(frame.timestamp());
            }
        }
        let crossing = result.expect("crossing detected");
        assert!((crossing.pos.y - 4531.5).abs() < 1e-6);
        assert!((crossing.pos.x - 1000.0).abs() < 1e-6);
        assert_eq!(Some(crossing.timestamp), out_time);
    }

    #[test]
    fn test_crossing_clears_when_ball_returns() {
        let mut calc = calc();
        let mut frame = scene(0).at_secs(0.0).ball(5000.0, 0.0).frame();
        calc.process(&mut frame);
        let mut frame = scene(1).at_secs(0.5).ball(6300.0, 0.0).frame();
        calc.process(&mut frame);
        assert!(frame.facts.ball_left_field.is_some());
        assert!(!frame.facts.ball_inside_field);

        let mut frame = scene(2).at_secs(1.0).ball(6300.0, 10.0).frame();
        calc.process(&mut frame);
        let first = frame.facts.ball_left_field;
        assert!(first.is_some());

        let mut frame = scene(3).at_secs(1.5).ball(0.0, 0.0).frame();
        calc.process(&mut frame);
        assert!(frame.facts.ball_left_field.is_none());
        assert!(frame.facts.ball_inside_field);
    }

    #[test]
    fn test_recent_chip_kick_clears_samples() {
        let mut calc = calc();
        let mut frame = scene(0).at_secs(0.0).ball(5000.0, 0.0).frame();
        calc.process(&mut frame);
        let mut frame = scene(1)
            .at_secs(0.5)
            .ball(6300.0, 0.0)
            .chipped()
            .kick(BotId::yellow(1), 5000.0, 0.0, 0.4)
            .frame();
        calc.process(&mut frame);
        assert!(frame.facts.ball_left_field.is_none());
    }

    #[test]
    fn test_future_samples_dropped() {
        let mut calc = calc();
        let mut frame = scene(0).at_secs(2.0).ball(5000.0, 0.0).frame();
        calc.process(&mut frame);
        // Clock jumped back: the 2.0 s sample must not act as trusted sample
        let mut frame = scene(1).at_secs(1.0).ball(6300.0, 0.0).frame();
        calc.process(&mut frame);
        assert!(frame.facts.ball_left_field.is_none());
    }

    proptest! {
        #[test]
        fn prop_inside_trajectory_never_leaves(
            points in prop::collection::vec((-6000.0f64..6000.0, -4500.0f64..4500.0), 1..80)
        ) {
            let mut calc = calc();
            for (i, (x, y)) in points.into_iter().enumerate() {
                let mut frame = scene(i as u64).ball(x, y).frame();
                calc.process(&mut frame);
                prop_assert!(frame.facts.ball_left_field.is_none());
                prop_assert!(frame.facts.ball_inside_field);
            }
        }

        #[test]
        fn prop_crossing_lies_on_boundary(y_out in 4600.0f64..5500.0, x in -5000.0f64..5000.0) {
            let mut calc = calc();
            let mut frame = scene(0).at_secs(0.0).ball(x, 3000.0).frame();
            calc.process(&mut frame);
            let mut frame = scene(1).at_secs(0.4).ball(x, y_out).frame();
            calc.process(&mut frame);
            let crossing = frame.facts.ball_left_field.expect("crossing");
            prop_assert!((crossing.pos.y - 4531.5).abs() < 1e-6);
            prop_assert_eq!(crossing.timestamp, frame.timestamp());
        }
    }
}
