use serde::{Deserialize, Serialize};

/// Field dimensions in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Goal line to goal line
    pub length: f64,
    /// Touch line to touch line
    pub width: f64,
    /// Inner distance between the goal posts
    pub goal_width: f64,
    /// Inner depth of the goal
    pub goal_depth: f64,
    /// Height of the goal crossbar
    pub goal_height: f64,
    /// Penalty area extent along the field length
    pub penalty_area_depth: f64,
    /// Penalty area extent along the goal line
    pub penalty_area_width: f64,
    /// Penalty mark distance from the goal centre
    pub penalty_mark_distance: f64,
    /// Run-off area between field lines and the boundary wall
    pub boundary_width: f64,
    pub center_circle_radius: f64,
    pub line_width: f64,
}

impl FieldConfig {
    /// Division A: 12 m x 9 m
    pub fn division_a() -> Self {
        Self {
            length: 12000.0,
            width: 9000.0,
            goal_width: 1800.0,
            goal_depth: 180.0,
            goal_height: 160.0,
            penalty_area_depth: 1800.0,
            penalty_area_width: 3600.0,
            penalty_mark_distance: 8000.0,
            boundary_width: 300.0,
            center_circle_radius: 500.0,
            line_width: 10.0,
        }
    }

    /// Division B: 9 m x 6 m
    pub fn division_b() -> Self {
        Self {
            length: 9000.0,
            width: 6000.0,
            goal_width: 1000.0,
            goal_depth: 180.0,
            goal_height: 160.0,
            penalty_area_depth: 1000.0,
            penalty_area_width: 2000.0,
            penalty_mark_distance: 6000.0,
            boundary_width: 300.0,
            center_circle_radius: 500.0,
            line_width: 10.0,
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::division_a()
    }
}

/// Physical robot and ball dimensions (mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub bot_radius: f64,
    pub ball_radius: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            bot_radius: 90.0,
            ball_radius: 21.5,
        }
    }
}
