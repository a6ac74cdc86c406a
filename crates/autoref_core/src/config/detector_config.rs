//! Per-detector tunables.
//!
//! Distances in mm, durations in seconds, speeds in m/s, angles in degrees.

use serde::{Deserialize, Serialize};

/// All detector sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DetectorsConfig {
    pub restart: RestartConfig,
    pub goal: GoalConfig,
    pub ball_left_field: BallLeftFieldRuleConfig,
    pub defense_area: DefenseAreaConfig,
    pub stop_speed: StopSpeedConfig,
    pub pushing: PushingConfig,
    pub collision: CollisionConfig,
    pub ball_speeding: BallSpeedingConfig,
    pub dribbling: DribblingConfig,
    pub keeper_held_ball: KeeperHeldBallConfig,
    pub no_progress: NoProgressConfig,
    pub kick_timeout: KickTimeoutConfig,
    pub penalty_kick: PenaltyKickConfig,
    pub placement: PlacementConfig,
    pub placement_interference: PlacementInterferenceConfig,
    pub kick_point_distance: KickPointDistanceConfig,
    pub attacker_defense_area: AttackerDefenseAreaConfig,
    pub bot_number: BotNumberConfig,
    pub stop_state: StopStateConfig,
    pub prepare_state: PrepareStateConfig,
}

/// Placement of free kicks awarded for fouls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    /// Minimum distance of a restart position from the field lines
    pub inset: f64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self { inset: 200.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    /// Goals chipped higher than this are not valid
    pub max_goal_height: f64,
    /// Distance from the goal line where the defenders restart after a chip
    pub goal_kick_inset: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            max_goal_height: 150.0,
            goal_kick_inset: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallLeftFieldRuleConfig {
    pub aimless_kick_enabled: bool,
    /// Kicks closer than this to the halfway line never count as aimless
    pub aimless_kick_halfway_margin: f64,
}

impl Default for BallLeftFieldRuleConfig {
    fn default() -> Self {
        Self {
            aimless_kick_enabled: true,
            aimless_kick_halfway_margin: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseAreaConfig {
    /// Same bot is not reported twice within this window
    pub violator_cooldown_time: f64,
    /// Touches within this time after activation are ignored
    pub activation_grace: f64,
    /// Overlap with the area that counts as a partial violation
    pub partial_touch_margin: f64,
    /// Contact distance between attacker and defender, on top of 2 x bot radius
    pub push_contact_margin: f64,
    /// Distance outside the area for the restart position
    pub restart_distance: f64,
}

impl Default for DefenseAreaConfig {
    fn default() -> Self {
        Self {
            violator_cooldown_time: 1.5,
            activation_grace: 0.3,
            partial_touch_margin: 20.0,
            push_contact_margin: 20.0,
            restart_distance: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopSpeedConfig {
    pub max_speed: f64,
    /// Time after entering STOP before speeds are checked
    pub grace_period: f64,
    /// Accumulated over-speed time before a bot is reported
    pub min_violation_duration: f64,
}

impl Default for StopSpeedConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.5,
            grace_period: 2.0,
            min_violation_duration: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushingConfig {
    pub push_max_distance: f64,
    /// Max angle between displacement and pusher-to-pushed line
    pub push_angle_tolerance_deg: f64,
    /// Contact distance on top of 2 x bot radius
    pub contact_margin: f64,
    pub violator_cooldown_time: f64,
}

impl Default for PushingConfig {
    fn default() -> Self {
        Self {
            push_max_distance: 200.0,
            push_angle_tolerance_deg: 45.0,
            contact_margin: 20.0,
            violator_cooldown_time: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Relative speed along the contact line that counts as a crash
    pub max_crash_speed: f64,
    /// Below this speed difference both bots are to blame
    pub drawn_speed_difference: f64,
    pub contact_margin: f64,
    pub pair_cooldown_time: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_crash_speed: 1.5,
            drawn_speed_difference: 0.3,
            contact_margin: 10.0,
            pair_cooldown_time: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSpeedingConfig {
    pub max_ball_speed: f64,
    /// Consecutive frames above the limit before reporting
    pub min_frames: u32,
}

impl Default for BallSpeedingConfig {
    fn default() -> Self {
        Self {
            max_ball_speed: 6.5,
            min_frames: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DribblingConfig {
    pub max_dribble_distance: f64,
}

impl Default for DribblingConfig {
    fn default() -> Self {
        Self {
            max_dribble_distance: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeeperHeldBallConfig {
    pub max_hold_time: f64,
    /// Distance outside the defense area for the restart
    pub restart_distance: f64,
}

impl Default for KeeperHeldBallConfig {
    fn default() -> Self {
        Self {
            max_hold_time: 5.0,
            restart_distance: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoProgressConfig {
    pub timeout: f64,
    /// Ball movement inside this radius does not count as progress
    pub radius: f64,
}

impl Default for NoProgressConfig {
    fn default() -> Self {
        Self {
            timeout: 10.0,
            radius: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickTimeoutConfig {
    pub timeout: f64,
    /// Ball displacement that counts as the restart kick
    pub ball_moved_distance: f64,
}

impl Default for KickTimeoutConfig {
    fn default() -> Self {
        Self {
            timeout: 5.0,
            ball_moved_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyKickConfig {
    pub timeout: f64,
}

impl Default for PenaltyKickConfig {
    fn default() -> Self {
        Self { timeout: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub ball_placement_tolerance: f64,
    /// Exponential moving average factor for the settled test, (0, 1]
    pub ema_factor: f64,
    /// Filtered vs raw distance for a settled ball
    pub settled_distance: f64,
    /// Required bot clearance when a free kick follows
    pub min_bot_distance_free_kick: f64,
    /// Required bot clearance when a force start follows
    pub min_bot_distance_force_start: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            ball_placement_tolerance: 150.0,
            ema_factor: 0.3,
            settled_distance: 5.0,
            min_bot_distance_free_kick: 50.0,
            min_bot_distance_force_start: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementInterferenceConfig {
    pub tube_radius: f64,
    /// Continuous violation time before reporting
    pub violation_time: f64,
}

impl Default for PlacementInterferenceConfig {
    fn default() -> Self {
        Self {
            tube_radius: 500.0,
            violation_time: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickPointDistanceConfig {
    /// Required distance between the ball and defending bots
    pub min_distance: f64,
    pub grace_period: f64,
    pub violator_cooldown_time: f64,
    pub ball_moved_distance: f64,
}

impl Default for KickPointDistanceConfig {
    fn default() -> Self {
        Self {
            min_distance: 500.0,
            grace_period: 2.0,
            violator_cooldown_time: 2.0,
            ball_moved_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackerDefenseAreaConfig {
    /// Required distance between attackers and the opponent defense area
    pub min_distance: f64,
    pub grace_period: f64,
    pub violator_cooldown_time: f64,
    pub ball_moved_distance: f64,
}

impl Default for AttackerDefenseAreaConfig {
    fn default() -> Self {
        Self {
            min_distance: 200.0,
            grace_period: 2.0,
            violator_cooldown_time: 2.0,
            ball_moved_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotNumberConfig {
    pub report_cooldown_time: f64,
}

impl Default for BotNumberConfig {
    fn default() -> Self {
        Self {
            report_cooldown_time: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopStateConfig {
    /// Time in STOP before the restart is prepared
    pub ready_wait: f64,
    /// Required bot-to-ball distance before the restart command
    pub min_bot_ball_distance: f64,
}

impl Default for StopStateConfig {
    fn default() -> Self {
        Self {
            ready_wait: 2.0,
            min_bot_ball_distance: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareStateConfig {
    pub ready_wait: f64,
    pub max_ball_speed: f64,
}

impl Default for PrepareStateConfig {
    fn default() -> Self {
        Self {
            ready_wait: 2.0,
            max_ball_speed: 0.1,
        }
    }
}
