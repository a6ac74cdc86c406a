//! Arbitration Engine - Per-Tick Referee Hub
//!
//! Turns one `(WorldFrame, RefereeMsg)` pair into at most one winning event
//! plus the commands for the referee box.
//!
//! ## Tick order (fixed)
//! 1. Snapshot the queued follow-up; drop it when play (re)enters RUNNING
//! 2. Assemble the frame and run the fact calculators
//! 3. Push the frame into the history
//! 4. Activate and update every detector whose active set holds the state
//! 5. Sort outcomes by priority (stable, so ties keep declaration order)
//! 6. First outcome with commands wins; persist its follow-up
//! 7. Debounce and emit the winner's commands (active mode only)
//!
//! Every detector runs each tick it is active; a winner never short-circuits
//! the updates of lower-priority detectors.

mod debounce;


pub use crate::config::ArbitrationMode;
pub use debounce::CommandDebouncer;

use std::cmp::Reverse;

use crate::calc::FactCalculators;
use crate::config::RefereeConfig;
use crate::detectors::{Detector, DetectorContext, DetectorKind, DetectorRegistry, RuleOutcome};
use crate::error::ConfigError;
use crate::events::{FollowUpAction, GameEvent, RefereeCommand};
use crate::geometry::Field;
use crate::model::{Frame, FrameHistory, GameState, RefereeMsg, WorldFrame};

/// Everything the engine decided for one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutput {
    pub tick: u64,
    /// Event of the highest-priority outcome that asked for commands
    pub winner: Option<GameEvent>,
    /// Commands to send (empty in passive mode or when debounced)
    pub commands: Vec<RefereeCommand>,
    /// Every event produced this tick, winner included, in priority order
    pub violations: Vec<GameEvent>,
    /// Follow-up queued after this tick
    pub follow_up: Option<FollowUpAction>,
}

impl TickOutput {
    pub fn is_quiet(&self) -> bool {
        self.winner.is_none() && self.commands.is_empty() && self.violations.is_empty()
    }
}

/// Engine counters (for QA/debugging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    pub ticks_processed: u64,
    /// Events produced, winners or not
    pub events_detected: u64,
    pub winners: u64,
    pub commands_sent: u64,
    pub commands_debounced: u64,
    pub detector_errors: u64,
}

struct Candidate {
    kind: DetectorKind,
    priority: i32,
    outcome: RuleOutcome,
}

/// Tick-driven referee
pub struct RefereeEngine {
    config: RefereeConfig,
    field: Field,
    calculators: FactCalculators,
    registry: DetectorRegistry,
    history: FrameHistory,
    follow_up: Option<FollowUpAction>,
    debouncer: CommandDebouncer,
    mode: ArbitrationMode,
    next_tick: u64,
    prev_state: Option<GameState>,
    stats: EngineStats,
}

impl RefereeEngine {
    /// Engine with every detector, in the mode the config selects.
    pub fn new(config: RefereeConfig) -> Result<Self, ConfigError> {
        let mode = config.engine.mode;
        Self::with_detectors(config, mode, &DetectorKind::ALL, Vec::new())
    }

    pub fn builder() -> RefereeEngineBuilder {
        RefereeEngineBuilder::default()
    }

    fn with_detectors(
        config: RefereeConfig,
        mode: ArbitrationMode,
        kinds: &[DetectorKind],
        custom: Vec<Box<dyn Detector>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut registry = DetectorRegistry::new(kinds, &config)?;
        for detector in custom {
            registry.push(detector);
        }
        log::debug!(
            "referee engine: {} detectors, {:?} mode, history depth {}",
            registry.len(),
            mode,
            config.engine.history_depth
        );
        Ok(Self {
            field: Field::new(&config.field, &config.robots),
            calculators: FactCalculators::new(&config),
            registry,
            history: FrameHistory::new(config.engine.history_depth),
            follow_up: None,
            debouncer: CommandDebouncer::new(config.engine.command_debounce_window),
            mode,
            next_tick: 0,
            prev_state: None,
            stats: EngineStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &RefereeConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn mode(&self) -> ArbitrationMode {
        self.mode
    }

    /// Switch between refereeing and observing without losing detector state.
    pub fn set_mode(&mut self, mode: ArbitrationMode) {
        self.mode = mode;
    }

    /// Follow-up queued by the last winning outcome
    pub fn follow_up(&self) -> Option<&FollowUpAction> {
        self.follow_up.as_ref()
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn detectors(&self) -> impl Iterator<Item = DetectorKind> + '_ {
        self.registry.kinds()
    }

    /// Forget history, follow-up and detector activation (new match).
    pub fn reset(&mut self) {
        self.calculators = FactCalculators::new(&self.config);
        self.history.clear();
        self.follow_up = None;
        self.debouncer.reset();
        self.prev_state = None;
        for slot in self.registry.slots_mut() {
            slot.was_active = false;
        }
    }

    /// Process one frame.
    pub fn process(&mut self, world: WorldFrame, referee: RefereeMsg) -> TickOutput {
        let tick = self.next_tick;
        self.next_tick += 1;
        self.stats.ticks_processed += 1;

        let state = referee.game_state;
        let previous_follow_up = self.follow_up;
        let entered_running = state.is_running() && !self.prev_state.is_some_and(|s| s.is_running());
        if entered_running && self.follow_up.take().is_some() {
            log::debug!("tick {}: play resumed, follow-up cleared", tick);
        }
        self.prev_state = Some(state);

        let mut frame = Frame::new(tick, world, referee);
        self.calculators.run(&mut frame, &self.history);
        self.history.push(frame);

        let candidates = self.update_detectors(tick);

        let mut output = TickOutput {
            tick,
            ..Default::default()
        };
        let now = match self.history.latest() {
            Some(frame) => frame.timestamp(),
            None => return output,
        };

        let winner = candidates.iter().position(|c| c.outcome.is_actionable());
        for (i, candidate) in candidates.iter().enumerate() {
            let Some(event) = &candidate.outcome.event else {
                continue;
            };
            self.stats.events_detected += 1;
            if Some(i) != winner {
                log::debug!("tick {}: {:?} reported {}", tick, candidate.kind, event);
            }
            output.violations.push(event.clone());
        }

        if let Some(candidate) = winner.map(|i| &candidates[i]) {
            self.stats.winners += 1;
            let outcome = &candidate.outcome;
            log::info!(
                "tick {}: {:?} wins with {} -> [{}]{}",
                tick,
                candidate.kind,
                outcome
                    .event
                    .as_ref()
                    .map_or_else(|| "no event".to_string(), |e| e.to_string()),
                outcome
                    .commands
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                outcome
                    .follow_up
                    .map_or_else(String::new, |f| format!(", follow-up {:?} for {}", f.kind, f.team))
            );
            output.winner = outcome.event.clone();

            if let Some(follow_up) = outcome.follow_up {
                if previous_follow_up.is_some_and(|prev| prev != follow_up) {
                    log::debug!("tick {}: replacing queued follow-up", tick);
                }
                self.follow_up = Some(follow_up);
            }

            if self.mode == ArbitrationMode::Active {
                let requested = outcome.commands.len();
                output.commands = self.debouncer.filter(outcome.commands.clone(), now);
                self.stats.commands_sent += output.commands.len() as u64;
                self.stats.commands_debounced += (requested - output.commands.len()) as u64;
            }
        }

        output.follow_up = self.follow_up;
        output
    }

    /// Run every active detector and return their outcomes, highest priority first.
    fn update_detectors(&mut self, tick: u64) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        let Some(frame) = self.history.latest() else {
            return candidates;
        };
        let state = frame.game_state().kind;
        let ctx = DetectorContext {
            frame,
            history: &self.history,
            field: &self.field,
            follow_up: self.follow_up.as_ref(),
        };

        for slot in self.registry.slots_mut() {
            let detector = &mut slot.detector;
            let active = detector.active_states().contains(state);
            if !active {
                slot.was_active = false;
                continue;
            }
            if !slot.was_active {
                log::debug!("tick {}: activating {:?} in {:?}", tick, detector.kind(), state);
                detector.on_activate(frame);
                slot.was_active = true;
            }
            match detector.update(&ctx) {
                Ok(Some(outcome)) => candidates.push(Candidate {
                    kind: detector.kind(),
                    priority: detector.priority(),
                    outcome,
                }),
                Ok(None) => {}
                Err(err) => {
                    self.stats.detector_errors += 1;
                    log::warn!("tick {}: {:?} failed, no event this tick: {}", tick, detector.kind(), err);
                }
            }
        }

        candidates.sort_by_key(|c| Reverse(c.priority));
        candidates
    }
}

/// Builder for [`RefereeEngine`]
#[derive(Default)]
pub struct RefereeEngineBuilder {
    config: RefereeConfig,
    mode: Option<ArbitrationMode>,
    detectors: Option<Vec<DetectorKind>>,
    custom: Vec<Box<dyn Detector>>,
}

impl RefereeEngineBuilder {
    pub fn config(mut self, config: RefereeConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides `config.engine.mode`.
    pub fn mode(mut self, mode: ArbitrationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Restrict the engine to these detectors (declaration order kept).
    pub fn detectors(mut self, kinds: &[DetectorKind]) -> Self {
        self.detectors = Some(kinds.to_vec());
        self
    }

    /// Extra rule appended after the built-in detectors.
    pub fn with_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.custom.push(detector);
        self
    }

    pub fn build(self) -> Result<RefereeEngine, ConfigError> {
        let mode = self.mode.unwrap_or(self.config.engine.mode);
        let kinds = self.detectors.unwrap_or_else(|| DetectorKind::ALL.to_vec());
        RefereeEngine::with_detectors(self.config, mode, &kinds, self.custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{config, scene};

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut cfg = config();
        cfg.engine.history_depth = 1;
        assert!(matches!(
            RefereeEngine::new(cfg),
            Err(ConfigError::HistoryTooShort { found: 1, .. })
        ));
    }

    #[test]
    fn test_builder_detector_subset() {
        let engine = RefereeEngine::builder()
            .detectors(&[DetectorKind::Goal, DetectorKind::BotNumber])
            .mode(ArbitrationMode::Passive)
            .build()
            .unwrap();
        assert_eq!(engine.detectors().collect::<Vec<_>>(), vec![DetectorKind::Goal, DetectorKind::BotNumber]);
        assert_eq!(engine.mode(), ArbitrationMode::Passive);
    }

    #[test]
    fn test_builder_rejects_empty_detector_list() {
        assert!(matches!(
            RefereeEngine::builder().detectors(&[]).build(),
            Err(ConfigError::NoDetectors)
        ));
    }

    #[test]
    fn test_quiet_ticks_fill_history() {
        let mut engine = RefereeEngine::new(config()).unwrap();
        for i in 0..20 {
            let (world, referee) = scene(i).ball(0.0, 0.0).raw();
            let out = engine.process(world, referee);
            assert_eq!(out.tick, i);
            assert!(out.is_quiet());
        }
        assert_eq!(engine.history().len(), config().engine.history_depth);
        assert_eq!(engine.stats().ticks_processed, 20);
    }
}
