//! Field geometry derived from the injected configuration.
//!
//! ## Goal sides
//! Goals are addressed by the sign of their x coordinate (`+1.0` or `-1.0`).
//! Which team defends which side comes from the referee message
//! (`RefereeMsg::own_goal_sign`), never from the geometry itself.

use super::{Rectangle, Vec2};
use crate::config::{FieldConfig, RobotConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub length: f64,
    pub width: f64,
    pub goal_width: f64,
    pub goal_depth: f64,
    pub goal_height: f64,
    pub penalty_area_depth: f64,
    pub penalty_area_width: f64,
    pub penalty_mark_distance: f64,
    pub boundary_width: f64,
    pub center_circle_radius: f64,
    pub line_width: f64,
    pub ball_radius: f64,
    pub bot_radius: f64,
}

impl Field {
    pub fn new(field: &FieldConfig, robots: &RobotConfig) -> Self {
        Self {
            length: field.length,
            width: field.width,
            goal_width: field.goal_width,
            goal_depth: field.goal_depth,
            goal_height: field.goal_height,
            penalty_area_depth: field.penalty_area_depth,
            penalty_area_width: field.penalty_area_width,
            penalty_mark_distance: field.penalty_mark_distance,
            boundary_width: field.boundary_width,
            center_circle_radius: field.center_circle_radius,
            line_width: field.line_width,
            ball_radius: robots.ball_radius,
            bot_radius: robots.bot_radius,
        }
    }

    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Playing area bounded by the outer edge of the field lines.
    pub fn field_rect(&self) -> Rectangle {
        Rectangle::from_center(Vec2::zeros(), self.length, self.width)
    }

    /// Area in which the ball still counts as in play: the lines belong to the
    /// field and the ball is out only once it fully crossed them.
    pub fn ball_in_play_rect(&self) -> Rectangle {
        self.field_rect().with_margin(self.line_width + self.ball_radius)
    }

    /// Outer wall of the field boundary.
    pub fn boundary_rect(&self) -> Rectangle {
        self.field_rect().with_margin(self.boundary_width)
    }

    pub fn goal_center(&self, goal_sign: f64) -> Vec2 {
        Vec2::new(goal_sign * self.half_length(), 0.0)
    }

    /// Penalty (defense) area in front of the goal on side `goal_sign`.
    pub fn penalty_area(&self, goal_sign: f64) -> Rectangle {
        let hl = self.half_length();
        let hw = self.penalty_area_width / 2.0;
        Rectangle::from_corners(
            Vec2::new(goal_sign * hl, -hw),
            Vec2::new(goal_sign * (hl - self.penalty_area_depth), hw),
        )
    }

    /// Volume behind the goal line enclosed by the goal frame (2D footprint).
    pub fn goal_rect(&self, goal_sign: f64) -> Rectangle {
        let hl = self.half_length();
        let hw = self.goal_width / 2.0;
        Rectangle::from_corners(
            Vec2::new(goal_sign * hl, -hw),
            Vec2::new(goal_sign * (hl + self.goal_depth), hw),
        )
    }

    pub fn penalty_mark(&self, goal_sign: f64) -> Vec2 {
        Vec2::new(goal_sign * (self.half_length() - self.penalty_mark_distance), 0.0)
    }

    /// Sign of the goal whose volume contains `pos`, if any.
    pub fn goal_containing(&self, pos: &Vec2) -> Option<f64> {
        [1.0, -1.0]
            .into_iter()
            .find(|sign| self.goal_rect(*sign).contains(pos))
    }

    /// Whether a crossing point of the in-play rectangle lies on a goal line.
    pub fn is_goal_line_crossing(&self, pos: &Vec2) -> bool {
        pos.x.abs() > self.half_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RefereeConfig;
    use crate::geometry::vec2;

    fn field() -> Field {
        let cfg = RefereeConfig::division_a();
        Field::new(&cfg.field, &cfg.robots)
    }

    #[test]
    fn test_penalty_area_placement() {
        let f = field();
        let area = f.penalty_area(1.0);
        assert!(area.contains(&vec2(5500.0, 0.0)));
        assert!(!area.contains(&vec2(3000.0, 0.0)));
        assert!(f.penalty_area(-1.0).contains(&vec2(-5500.0, 1500.0)));
    }

    #[test]
    fn test_goal_containing() {
        let f = field();
        assert_eq!(f.goal_containing(&vec2(6100.0, 0.0)), Some(1.0));
        assert_eq!(f.goal_containing(&vec2(-6100.0, 200.0)), Some(-1.0));
        assert_eq!(f.goal_containing(&vec2(5900.0, 0.0)), None);
        assert_eq!(f.goal_containing(&vec2(6100.0, 1000.0)), None);
    }

    #[test]
    fn test_in_play_rect_includes_lines() {
        let f = field();
        let r = f.ball_in_play_rect();
        assert!(r.contains(&vec2(6025.0, 0.0)));
        assert!(!r.contains(&vec2(6040.0, 0.0)));
    }
}
