use std::collections::VecDeque;

use super::{Frame, GameState};

/// Bounded ring buffer of recent frames, newest last.
///
/// Frames are addressed by tick number; detectors keep ticks, never
/// references, so nothing outlives the buffer.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    frames: VecDeque<Frame>,
    capacity: usize,
}

impl FrameHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push(&mut self, frame: Frame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn latest(&self) -> Option<&Frame> {
        self.frames.back()
    }

    /// Frame before the latest one.
    pub fn previous(&self) -> Option<&Frame> {
        self.ticks_ago(1)
    }

    /// `n = 0` is the latest frame.
    pub fn ticks_ago(&self, n: usize) -> Option<&Frame> {
        let len = self.frames.len();
        if n >= len {
            return None;
        }
        self.frames.get(len - 1 - n)
    }

    pub fn get(&self, tick: u64) -> Option<&Frame> {
        let first = self.frames.front()?.tick;
        let offset = tick.checked_sub(first)?;
        self.frames
            .get(usize::try_from(offset).ok()?)
            .filter(|f| f.tick == tick)
    }

    /// Game state `n` ticks before the latest frame.
    pub fn state_ticks_ago(&self, n: usize) -> Option<GameState> {
        self.ticks_ago(n).map(|f| f.game_state())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().rev()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameStateKind, RefereeMsg, WorldFrame};

    fn frame(tick: u64, state: GameState) -> Frame {
        let referee = RefereeMsg {
            game_state: state,
            ..Default::default()
        };
        Frame::new(tick, WorldFrame::default(), referee)
    }

    #[test]
    fn test_bounded_depth() {
        let mut history = FrameHistory::new(3);
        for tick in 0..5 {
            history.push(frame(tick, GameState::RUNNING));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().map(|f| f.tick), Some(4));
        assert_eq!(history.previous().map(|f| f.tick), Some(3));
        assert!(history.get(1).is_none());
        assert_eq!(history.get(2).map(|f| f.tick), Some(2));
        assert!(history.ticks_ago(3).is_none());
    }

    #[test]
    fn test_state_ticks_ago() {
        let mut history = FrameHistory::new(4);
        history.push(frame(0, GameState::STOP));
        history.push(frame(1, GameState::STOP));
        history.push(frame(2, GameState::RUNNING));
        assert_eq!(
            history.state_ticks_ago(2).map(|s| s.kind),
            Some(GameStateKind::Stop)
        );
        assert_eq!(
            history.state_ticks_ago(0).map(|s| s.kind),
            Some(GameStateKind::Running)
        );
        assert_eq!(history.iter().map(|f| f.tick).collect::<Vec<_>>(), vec![2, 1, 0]);
    }
}
