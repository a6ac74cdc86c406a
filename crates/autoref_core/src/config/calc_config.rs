use serde::{Deserialize, Serialize};

/// Ball-left-field tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallLeftFieldConfig {
    /// Samples younger than this are not trusted (seconds)
    pub max_time_to_detect_chip_kick: f64,
    /// Minimum gap between the compared samples (seconds)
    pub min_comparison_span: f64,
    /// Extra retention on top of the two windows above (seconds)
    pub buffer_slack: f64,
}

impl Default for BallLeftFieldConfig {
    fn default() -> Self {
        Self {
            max_time_to_detect_chip_kick: 0.3,
            min_comparison_span: 0.05,
            buffer_slack: 0.2,
        }
    }
}

impl BallLeftFieldConfig {
    pub fn retention(&self) -> f64 {
        self.max_time_to_detect_chip_kick + self.min_comparison_span + self.buffer_slack
    }
}

/// Ball-touch ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTouchConfig {
    /// Added to bot + ball radius for the vicinity test (mm)
    pub touch_margin: f64,
    /// Centre distance for the orientation fallback (mm)
    pub extended_dist: f64,
    /// Max deviation between bot orientation and ball heading (deg)
    pub orientation_tolerance_deg: f64,
    /// Heading change that counts as a deflection (deg)
    pub min_heading_change_deg: f64,
    /// Speed increase that counts as a kick (m/s)
    pub min_speed_gain_threshold: f64,
    /// Ball speed below which heading changes are ignored (m/s)
    pub min_ball_speed: f64,
    /// Lower bound for the heading-based search radius (mm)
    pub min_search_radius: f64,
    /// Lateral margin around the backward ray, on top of bot + ball radius (mm)
    pub ray_margin: f64,
}

impl Default for BallTouchConfig {
    fn default() -> Self {
        Self {
            touch_margin: 10.0,
            extended_dist: 300.0,
            orientation_tolerance_deg: 20.0,
            min_heading_change_deg: 15.0,
            min_speed_gain_threshold: 0.3,
            min_ball_speed: 0.1,
            min_search_radius: 300.0,
            ray_margin: 40.0,
        }
    }
}

/// Possible-goal tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossibleGoalConfig {
    /// Margin between the goal frame and its core zone (mm)
    pub core_margin: f64,
    /// Heading rotation that marks the ball as stopped by the goal (deg)
    pub min_heading_rotation_deg: f64,
    /// Speed below which the ball counts as settled (m/s)
    pub stationary_speed: f64,
}

impl Default for PossibleGoalConfig {
    fn default() -> Self {
        Self {
            core_margin: 30.0,
            min_heading_rotation_deg: 30.0,
            stationary_speed: 0.1,
        }
    }
}
