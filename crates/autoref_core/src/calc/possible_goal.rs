use crate::config::PossibleGoalConfig;
use crate::geometry::{angle_between, Field, Vec2};
use crate::model::{Frame, PossibleGoal, Timestamp};

#[derive(Debug, Clone, Copy)]
struct GoalEntry {
    goal_sign: f64,
    heading: Vec2,
    pos: Vec2,
    timestamp: Timestamp,
    reached_core: bool,
}

/// Flags a ball that settled inside a goal.
///
/// A ball merely clipping the goal mouth is not a candidate: it has to reach
/// the core of the goal and then either turn away from its entry heading or
/// come to rest.
#[derive(Debug, Clone)]
pub struct PossibleGoalCalc {
    config: PossibleGoalConfig,
    field: Field,
    entry: Option<GoalEntry>,
    candidate: Option<PossibleGoal>,
}

impl PossibleGoalCalc {
    pub fn new(config: PossibleGoalConfig, field: Field) -> Self {
        Self {
            config,
            field,
            entry: None,
            candidate: None,
        }
    }

    pub fn process(&mut self, frame: &mut Frame) {
        let ball = &frame.world.ball;
        // An occluded ball keeps the current state
        if ball.visible {
            match self.field.goal_containing(&ball.pos) {
                None => {
                    self.entry = None;
                    self.candidate = None;
                }
                Some(sign) => {
                    let entry = match self.entry {
                        Some(e) if e.goal_sign == sign => e,
                        _ => {
                            self.candidate = None;
                            GoalEntry {
                                goal_sign: sign,
                                heading: ball.vel,
                                pos: ball.pos,
                                timestamp: frame.world.timestamp,
                                reached_core: false,
                            }
                        }
                    };
                    let core = self
                        .field
                        .goal_rect(sign)
                        .with_margin(-self.config.core_margin);
                    let entry = GoalEntry {
                        reached_core: entry.reached_core || core.contains(&ball.pos),
                        ..entry
                    };
                    self.entry = Some(entry);

                    if self.candidate.is_none() && entry.reached_core {
                        let rotated = angle_between(&entry.heading, &ball.vel)
                            > self.config.min_heading_rotation_deg.to_radians();
                        let settled = ball.speed() < self.config.stationary_speed;
                        if rotated || settled {
                            let scoring_team = frame.referee.goal_owner(sign).opponent();
                            log::debug!("possible goal for {} in goal {:+}", scoring_team, sign);
                            self.candidate = Some(PossibleGoal {
                                scoring_team,
                                goal_sign: sign,
                                entry_pos: entry.pos,
                                timestamp: entry.timestamp,
                            });
                        }
                    }
                }
            }
        }
        frame.facts.possible_goal = self.candidate;
    }
}
