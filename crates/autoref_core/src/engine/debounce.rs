use crate::events::RefereeCommand;
use crate::model::Timestamp;

/// Drops a command identical to the last one sent within a short window.
///
/// Only the immediately previous *sent* command is remembered; a dropped
/// command does not extend the window.
#[derive(Debug, Clone)]
pub struct CommandDebouncer {
    window: f64,
    last_sent: Option<(RefereeCommand, Timestamp)>,
}

impl CommandDebouncer {
    /// `window` in seconds
    pub fn new(window: f64) -> Self {
        Self {
            window,
            last_sent: None,
        }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    /// Returns `true` if the command should be sent and records it.
    pub fn admit(&mut self, command: &RefereeCommand, now: Timestamp) -> bool {
        if let Some((last, at)) = &self.last_sent {
            if last == command && now.secs_since(*at) <= self.window {
                log::info!(
                    "dropping duplicate command {} ({:.3}s after the last one)",
                    command,
                    now.secs_since(*at)
                );
                return false;
            }
        }
        self.last_sent = Some((*command, now));
        true
    }

    /// Filter a batch of commands issued at the same instant.
    pub fn filter(&mut self, commands: Vec<RefereeCommand>, now: Timestamp) -> Vec<RefereeCommand> {
        commands
            .into_iter()
            .filter(|command| self.admit(command, now))
            .collect()
    }

    pub fn last_sent(&self) -> Option<&RefereeCommand> {
        self.last_sent.as_ref().map(|(command, _)| command)
    }

    pub fn reset(&mut self) {
        self.last_sent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::model::TeamColor;
    use proptest::prelude::*;

    fn ts(secs: f64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    #[test]
    fn test_identical_within_window_dropped() {
        let mut debouncer = CommandDebouncer::new(0.5);
        assert!(debouncer.admit(&RefereeCommand::stop(), ts(1.0)));
        assert!(!debouncer.admit(&RefereeCommand::stop(), ts(1.3)));
    }

    #[test]
    fn test_identical_outside_window_sent() {
        let mut debouncer = CommandDebouncer::new(0.5);
        assert!(debouncer.admit(&RefereeCommand::stop(), ts(1.0)));
        assert!(debouncer.admit(&RefereeCommand::stop(), ts(1.6)));
    }

    #[test]
    fn test_different_command_always_sent() {
        let mut debouncer = CommandDebouncer::new(0.5);
        assert!(debouncer.admit(&RefereeCommand::stop(), ts(1.0)));
        assert!(debouncer.admit(&RefereeCommand::force_start(), ts(1.1)));
        // Previous sent is now force start, so stop passes again
        assert!(debouncer.admit(&RefereeCommand::stop(), ts(1.2)));
    }

    #[test]
    fn test_position_is_part_of_identity() {
        let mut debouncer = CommandDebouncer::new(0.5);
        let a = RefereeCommand::ball_placement(TeamColor::Blue, Vec2::new(100.0, 0.0));
        let b = RefereeCommand::ball_placement(TeamColor::Blue, Vec2::new(200.0, 0.0));
        assert!(debouncer.admit(&a, ts(0.0)));
        assert!(debouncer.admit(&b, ts(0.1)));
    }

    #[test]
    fn test_filter_batch() {
        let mut debouncer = CommandDebouncer::new(0.5);
        let sent = debouncer.filter(vec![RefereeCommand::stop(), RefereeCommand::stop()], ts(0.0));
        assert_eq!(sent, vec![RefereeCommand::stop()]);
        assert_eq!(debouncer.last_sent(), Some(&RefereeCommand::stop()));
    }

    proptest! {
        #[test]
        fn prop_pair_sent_once_or_twice(gap in 0.0f64..2.0) {
            prop_assume!((gap - 0.5).abs() > 1e-6);
            let mut debouncer = CommandDebouncer::new(0.5);
            let first = debouncer.admit(&RefereeCommand::stop(), ts(10.0));
            let second = debouncer.admit(&RefereeCommand::stop(), ts(10.0 + gap));
            prop_assert!(first);
            prop_assert_eq!(second, gap > 0.5);
        }
    }
}
