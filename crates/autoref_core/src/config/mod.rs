//! # Referee Configuration
//!
//! Every tolerance the rules depend on lives here so that rule-book revisions
//! only touch presets, never detector code.
//!
//! ## Usage
//!
//! ```rust
//! use autoref_core::config::RefereeConfig;
//!
//! let config = RefereeConfig::default();
//! let div_b = RefereeConfig::division_b();
//! assert!(div_b.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `AUTOREF_DIVISION`: Select preset (`a`, `b`)

mod calc_config;
mod detector_config;
mod field_config;

pub use calc_config::{BallLeftFieldConfig, BallTouchConfig, PossibleGoalConfig};
pub use detector_config::{
    AttackerDefenseAreaConfig, BallLeftFieldRuleConfig, BallSpeedingConfig, BotNumberConfig,
    CollisionConfig, DefenseAreaConfig, DetectorsConfig, DribblingConfig, GoalConfig,
    KeeperHeldBallConfig, KickPointDistanceConfig, KickTimeoutConfig, NoProgressConfig,
    PenaltyKickConfig, PlacementConfig, PlacementInterferenceConfig, PrepareStateConfig,
    PushingConfig, RestartConfig, StopSpeedConfig, StopStateConfig,
};
pub use field_config::{FieldConfig, RobotConfig};

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;

/// How the arbitration treats the winning event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArbitrationMode {
    /// Winner's commands are sent to the referee box
    #[default]
    Active,
    /// Events are collected and reported only; no commands leave the engine
    Passive,
}

/// Arbitration engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identical commands within this window are dropped (seconds)
    pub command_debounce_window: f64,
    /// Number of frames kept in the history ring buffer
    pub history_depth: usize,
    pub mode: ArbitrationMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command_debounce_window: 0.5,
            history_depth: 8,
            mode: ArbitrationMode::Active,
        }
    }
}

/// Complete referee configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RefereeConfig {
    pub field: FieldConfig,
    pub robots: RobotConfig,
    pub ball_left_field: BallLeftFieldConfig,
    pub ball_touch: BallTouchConfig,
    pub possible_goal: PossibleGoalConfig,
    pub detectors: DetectorsConfig,
    pub engine: EngineConfig,
}

impl RefereeConfig {
    /// Division A rules (default)
    pub fn division_a() -> Self {
        Self::default()
    }

    /// Division B rules: smaller field, more relaxed timeouts
    pub fn division_b() -> Self {
        let mut cfg = Self {
            field: FieldConfig::division_b(),
            ..Self::default()
        };
        cfg.detectors.kick_timeout.timeout = 10.0;
        cfg.detectors.keeper_held_ball.max_hold_time = 10.0;
        cfg
    }

    /// Load preset from environment variable AUTOREF_DIVISION or use default
    pub fn from_env_or_default() -> Self {
        match env::var("AUTOREF_DIVISION")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "b" | "div_b" | "division_b" => Self::division_b(),
            _ => Self::division_a(),
        }
    }

    /// Parse a (possibly partial) JSON document; missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no rule can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.field;
        for (name, value) in [
            ("field.length", f.length),
            ("field.width", f.width),
            ("field.goal_width", f.goal_width),
            ("field.goal_depth", f.goal_depth),
            ("field.penalty_area_depth", f.penalty_area_depth),
            ("field.penalty_area_width", f.penalty_area_width),
            ("robots.bot_radius", self.robots.bot_radius),
            ("robots.ball_radius", self.robots.ball_radius),
        ] {
            positive(name, value)?;
        }

        let d = &self.detectors;
        for (name, value) in [
            ("field.boundary_width", f.boundary_width),
            ("field.line_width", f.line_width),
            ("ball_left_field.max_time_to_detect_chip_kick", self.ball_left_field.max_time_to_detect_chip_kick),
            ("ball_left_field.min_comparison_span", self.ball_left_field.min_comparison_span),
            ("ball_left_field.buffer_slack", self.ball_left_field.buffer_slack),
            ("ball_touch.touch_margin", self.ball_touch.touch_margin),
            ("ball_touch.extended_dist", self.ball_touch.extended_dist),
            ("ball_touch.min_speed_gain_threshold", self.ball_touch.min_speed_gain_threshold),
            ("ball_touch.min_search_radius", self.ball_touch.min_search_radius),
            ("ball_touch.ray_margin", self.ball_touch.ray_margin),
            ("possible_goal.core_margin", self.possible_goal.core_margin),
            ("possible_goal.stationary_speed", self.possible_goal.stationary_speed),
            ("detectors.restart.inset", d.restart.inset),
            ("detectors.goal.max_goal_height", d.goal.max_goal_height),
            ("detectors.defense_area.violator_cooldown_time", d.defense_area.violator_cooldown_time),
            ("detectors.defense_area.activation_grace", d.defense_area.activation_grace),
            ("detectors.stop_speed.grace_period", d.stop_speed.grace_period),
            ("detectors.stop_speed.min_violation_duration", d.stop_speed.min_violation_duration),
            ("detectors.pushing.push_max_distance", d.pushing.push_max_distance),
            ("detectors.pushing.violator_cooldown_time", d.pushing.violator_cooldown_time),
            ("detectors.collision.pair_cooldown_time", d.collision.pair_cooldown_time),
            ("detectors.placement.ball_placement_tolerance", d.placement.ball_placement_tolerance),
            ("detectors.placement_interference.violation_time", d.placement_interference.violation_time),
            ("detectors.kick_point_distance.violator_cooldown_time", d.kick_point_distance.violator_cooldown_time),
            ("detectors.attacker_defense_area.violator_cooldown_time", d.attacker_defense_area.violator_cooldown_time),
            ("detectors.bot_number.report_cooldown_time", d.bot_number.report_cooldown_time),
            ("engine.command_debounce_window", self.engine.command_debounce_window),
        ] {
            non_negative(name, value)?;
        }

        for (name, value) in [
            ("detectors.stop_speed.max_speed", d.stop_speed.max_speed),
            ("detectors.ball_speeding.max_ball_speed", d.ball_speeding.max_ball_speed),
            ("detectors.collision.max_crash_speed", d.collision.max_crash_speed),
            ("detectors.dribbling.max_dribble_distance", d.dribbling.max_dribble_distance),
            ("detectors.keeper_held_ball.max_hold_time", d.keeper_held_ball.max_hold_time),
            ("detectors.no_progress.timeout", d.no_progress.timeout),
            ("detectors.kick_timeout.timeout", d.kick_timeout.timeout),
            ("detectors.penalty_kick.timeout", d.penalty_kick.timeout),
        ] {
            positive(name, value)?;
        }

        for (name, value) in [
            ("ball_touch.orientation_tolerance_deg", self.ball_touch.orientation_tolerance_deg),
            ("ball_touch.min_heading_change_deg", self.ball_touch.min_heading_change_deg),
            ("possible_goal.min_heading_rotation_deg", self.possible_goal.min_heading_rotation_deg),
            ("detectors.pushing.push_angle_tolerance_deg", d.pushing.push_angle_tolerance_deg),
        ] {
            within(name, value, 0.0, 180.0)?;
        }
        within("detectors.placement.ema_factor", d.placement.ema_factor, 0.0, 1.0)?;

        if self.engine.history_depth < MIN_HISTORY_DEPTH {
            return Err(ConfigError::HistoryTooShort {
                found: self.engine.history_depth,
                min: MIN_HISTORY_DEPTH,
            });
        }
        Ok(())
    }
}

/// Current and previous frame are always needed
pub const MIN_HISTORY_DEPTH: usize = 2;

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value < 0.0 || value.is_nan() {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value <= 0.0 || value.is_nan() {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(())
}

/// Half-open range `(min, max]`.
fn within(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(value > min && value <= max) {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(RefereeConfig::division_a().validate().is_ok());
        assert!(RefereeConfig::division_b().validate().is_ok());
        assert_eq!(RefereeConfig::division_b().field.length, 9000.0);
    }

    #[test]
    fn test_division_from_env() {
        env::set_var("AUTOREF_DIVISION", "Div_B");
        let cfg = RefereeConfig::from_env_or_default();
        assert_eq!(cfg.field.length, 9000.0);
        assert_eq!(cfg.detectors.kick_timeout.timeout, 10.0);

        env::set_var("AUTOREF_DIVISION", "c");
        assert_eq!(RefereeConfig::from_env_or_default().field.length, 12000.0);

        env::remove_var("AUTOREF_DIVISION");
        let cfg = RefereeConfig::from_env_or_default();
        assert_eq!(cfg.field.length, RefereeConfig::division_a().field.length);
    }

    #[test]
    fn test_negative_cooldown_rejected() {
        let mut cfg = RefereeConfig::default();
        cfg.detectors.defense_area.violator_cooldown_time = -1.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Negative {
                name: "detectors.defense_area.violator_cooldown_time",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_ema_factor_range() {
        let mut cfg = RefereeConfig::default();
        cfg.detectors.placement.ema_factor = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange { .. })));
        cfg.detectors.placement.ema_factor = 1.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_history_depth() {
        let mut cfg = RefereeConfig::default();
        cfg.engine.history_depth = 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::HistoryTooShort { .. })));
    }

    #[test]
    fn test_partial_json() {
        let cfg = RefereeConfig::from_json(
            r#"{ "detectors": { "pushing": { "push_max_distance": 250.0 } }, "engine": { "mode": "passive" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.detectors.pushing.push_max_distance, 250.0);
        assert_eq!(cfg.detectors.pushing.push_angle_tolerance_deg, 45.0);
        assert_eq!(cfg.engine.mode, ArbitrationMode::Passive);
        assert_eq!(cfg.field.length, 12000.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            RefereeConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
