use crate::config::BallTouchConfig;
use crate::geometry::{angle_between, unit_from_angle, Field, Ray};
use crate::model::{BotId, BotTouchRecord, Frame, FrameHistory};

/// Decides which bots are in contact with the ball.
///
/// Two strategies:
/// - heading based: a sudden change of ball direction or speed is traced back
///   along the new heading to the nearest bot on that ray
/// - vicinity: bots close to the current or the previous ball position, with
///   an orientation fallback for bots facing along the ball's path
///
/// A heading-based hit wins over vicinity.
#[derive(Debug, Clone)]
pub struct BallTouchCalc {
    config: BallTouchConfig,
    contact_distance: f64,
    ray_width: f64,
    last_touch: Option<BotTouchRecord>,
}

impl BallTouchCalc {
    pub fn new(config: BallTouchConfig, field: &Field) -> Self {
        let reach = field.bot_radius + field.ball_radius;
        Self {
            contact_distance: reach + config.touch_margin,
            ray_width: reach + config.ray_margin,
            config,
            last_touch: None,
        }
    }

    pub fn process(&mut self, frame: &mut Frame, history: &FrameHistory) {
        let prev = history.latest();
        let touching = if frame.world.ball.visible {
            match self.heading_based(frame, prev) {
                Some(bot) => vec![bot],
                None => self.vicinity(frame, prev),
            }
        } else {
            Vec::new()
        };

        let ball = frame.ball_pos();
        let now = frame.timestamp();
        let records: Vec<BotTouchRecord> = touching
            .into_iter()
            .map(|bot| BotTouchRecord {
                bot,
                pos: ball,
                timestamp: now,
            })
            .collect();

        if let Some(first) = records.first() {
            self.last_touch = Some(*first);
        }
        frame.facts.bots_touching_ball = records;
        frame.facts.bot_last_touched_ball = self.last_touch;
    }

    /// Bots in contact, nearest first; orientation fallback when none.
    fn vicinity(&self, frame: &Frame, prev: Option<&Frame>) -> Vec<BotId> {
        let ball = frame.ball_pos();
        let prev_ball = prev.map(|f| f.ball_pos()).unwrap_or(ball);

        let mut contacts: Vec<(f64, BotId)> = frame
            .world
            .bots
            .values()
            .filter_map(|bot| {
                let d = (bot.pos - ball).norm().min((bot.pos - prev_ball).norm());
                (d < self.contact_distance).then_some((d, bot.id))
            })
            .collect();

        if contacts.is_empty() {
            let vel = frame.world.ball.vel;
            if vel.norm() < self.config.min_ball_speed {
                return Vec::new();
            }
            let tolerance = self.config.orientation_tolerance_deg.to_radians();
            contacts = frame
                .world
                .bots
                .values()
                .filter(|bot| (bot.pos - ball).norm() <= self.config.extended_dist)
                .filter_map(|bot| {
                    let dev = angle_between(&unit_from_angle(bot.orientation), &vel);
                    (dev <= tolerance).then_some((dev, bot.id))
                })
                .collect();
        }

        contacts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        contacts.into_iter().map(|(_, id)| id).collect()
    }

    fn heading_based(&self, frame: &Frame, prev: Option<&Frame>) -> Option<BotId> {
        let prev = prev?;
        let ball = &frame.world.ball;
        let prev_ball = &prev.world.ball;
        let speed = ball.speed();
        if speed < self.config.min_ball_speed {
            return None;
        }

        let prev_speed = prev_ball.speed();
        let turned = prev_speed >= self.config.min_ball_speed
            && angle_between(&prev_ball.vel, &ball.vel)
                > self.config.min_heading_change_deg.to_radians();
        let accelerated = speed - prev_speed > self.config.min_speed_gain_threshold;
        if !turned && !accelerated {
            return None;
        }

        let ray = Ray::new(ball.pos, -ball.vel)?;
        let travel = (ball.pos - prev_ball.pos).norm();
        let radius = travel.max(self.config.min_search_radius);

        frame
            .world
            .bots
            .values()
            .filter(|bot| {
                (bot.pos - ball.pos).norm() <= radius
                    && ray.along(&bot.pos) > 0.0
                    && ray.lateral_distance(&bot.pos) <= self.ray_width
            })
            .min_by(|a, b| {
                (a.pos - ball.pos)
                    .norm()
                    .total_cmp(&(b.pos - ball.pos).norm())
                    .then(a.id.cmp(&b.id))
            })
            .map(|bot| bot.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{config, field, scene};
    use std::f64::consts::PI;

    fn calc() -> BallTouchCalc {
        BallTouchCalc::new(config().ball_touch, &field())
    }

    #[test]
    fn test_vicinity_reports_close_bot() {
        let mut calc = calc();
        let history = FrameHistory::new(4);
        let (w, r) = scene(0)
            .bot(BotId::yellow(1), 0.0, 0.0)
            .ball(95.0, 0.0)
            .ball_vel(-1.0, 0.0)
            .raw();
        let mut frame = Frame::new(0, w, r);
        calc.process(&mut frame, &history);
        assert_eq!(frame.facts.bots_touching_ball.len(), 1);
        assert_eq!(frame.facts.bots_touching_ball[0].bot, BotId::yellow(1));
        assert_eq!(
            frame.facts.bot_last_touched_ball.map(|r| r.bot),
            Some(BotId::yellow(1))
        );
    }

    #[test]
    fn test_last_touch_persists() {
        let mut calc = calc();
        let mut history = FrameHistory::new(4);
        let (w, r) = scene(0).bot(BotId::blue(2), 0.0, 0.0).ball(100.0, 0.0).raw();
        let mut frame = Frame::new(0, w, r);
        calc.process(&mut frame, &history);
        history.push(frame);

        let (w, r) = scene(1).bot(BotId::blue(2), 0.0, 0.0).ball(1500.0, 0.0).raw();
        let mut frame = Frame::new(1, w, r);
        calc.process(&mut frame, &history);
        assert!(frame.facts.bots_touching_ball.is_empty());
        assert_eq!(
            frame.facts.bot_last_touched_ball.map(|r| r.bot),
            Some(BotId::blue(2))
        );
    }

    #[test]
    fn test_fast_ball_uses_previous_position() {
        let mut calc = calc();
        let mut history = FrameHistory::new(4);
        let (w, r) = scene(0).bot(BotId::yellow(5), 0.0, 0.0).ball(110.0, 0.0).raw();
        let mut frame = Frame::new(0, w, r);
        calc.process(&mut frame, &history);
        history.push(frame);

        // Ball already 400 mm away, same direction of travel: no heading change
        let (w, r) = scene(1)
            .bot(BotId::yellow(5), 0.0, 0.0)
            .ball(400.0, 0.0)
            .raw();
        let mut frame = Frame::new(1, w, r);
        calc.process(&mut frame, &history);
        assert!(frame.is_touching(BotId::yellow(5)));
    }

    #[test]
    fn test_heading_change_traced_back_to_bot() {
        let mut calc = calc();
        let mut history = FrameHistory::new(4);
        // Ball rolling in +x, deflected to +y by a bot standing below it
        let (w, r) = scene(0)
            .bot(BotId::blue(3), 2000.0, -200.0)
            .bot(BotId::yellow(4), 2000.0, 800.0)
            .ball(1900.0, 0.0)
            .ball_vel(2.0, 0.0)
            .raw();
        let mut frame = Frame::new(0, w, r);
        calc.process(&mut frame, &history);
        history.push(frame);

        let (w, r) = scene(1)
            .bot(BotId::blue(3), 2000.0, -200.0)
            .bot(BotId::yellow(4), 2000.0, 800.0)
            .ball(2000.0, 50.0)
            .ball_vel(0.0, 2.0)
            .raw();
        let mut frame = Frame::new(1, w, r);
        calc.process(&mut frame, &history);
        let touching: Vec<BotId> = frame.facts.bots_touching_ball.iter().map(|r| r.bot).collect();
        assert_eq!(touching, vec![BotId::blue(3)]);
    }

    #[test]
    fn test_orientation_fallback() {
        let mut calc = calc();
        let history = FrameHistory::new(4);
        let (w, r) = scene(0)
            .bot_facing(BotId::yellow(2), 0.0, 0.0, 0.0)
            .bot_facing(BotId::blue(2), 200.0, 200.0, PI)
            .ball(250.0, 0.0)
            .ball_vel(3.0, 0.2)
            .raw();
        let mut frame = Frame::new(0, w, r);
        calc.process(&mut frame, &history);
        assert!(frame.is_touching(BotId::yellow(2)));
        assert!(!frame.is_touching(BotId::blue(2)));
    }
}
