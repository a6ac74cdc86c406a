use fxhash::FxHashMap;
use std::hash::Hash;

use crate::model::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Presence {
    first_seen: Timestamp,
    last_seen: Timestamp,
}

/// Keys currently in violation, with how long they have been and when they
/// were last reported.
///
/// Presence and report times are tracked separately: a key that disappears
/// loses its presence (its continuous-violation timer restarts) but keeps its
/// report time, so cooldowns survive short gaps.
#[derive(Debug, Clone)]
pub struct DebouncedSet<K> {
    present: FxHashMap<K, Presence>,
    reported: FxHashMap<K, Timestamp>,
}

impl<K> Default for DebouncedSet<K> {
    fn default() -> Self {
        Self {
            present: FxHashMap::default(),
            reported: FxHashMap::default(),
        }
    }
}

impl<K: Hash + Eq + Copy> DebouncedSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` as present at `now`. Returns true for a new key.
    pub fn observe(&mut self, key: K, now: Timestamp) -> bool {
        match self.present.get_mut(&key) {
            Some(p) => {
                p.last_seen = now;
                false
            }
            None => {
                self.present.insert(
                    key,
                    Presence {
                        first_seen: now,
                        last_seen: now,
                    },
                );
                true
            }
        }
    }

    /// Drop every key not observed at `now`.
    pub fn retain_observed(&mut self, now: Timestamp) {
        self.present.retain(|_, p| p.last_seen == now);
    }

    pub fn remove(&mut self, key: &K) {
        self.present.remove(key);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.present.contains_key(key)
    }

    /// Continuous presence of `key` in seconds.
    pub fn held_for(&self, key: &K, now: Timestamp) -> Option<f64> {
        self.present.get(key).map(|p| now.secs_since(p.first_seen))
    }

    pub fn mark_reported(&mut self, key: K, now: Timestamp) {
        self.reported.insert(key, now);
    }

    pub fn reported_within(&self, key: &K, now: Timestamp, window: f64) -> bool {
        self.reported
            .get(key)
            .map_or(false, |at| now.secs_since(*at) < window)
    }

    /// Forget report times older than `window`.
    pub fn expire_reports(&mut self, now: Timestamp, window: f64) {
        self.reported.retain(|_, at| now.secs_since(*at) < window);
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub fn clear(&mut self) {
        self.present.clear();
        self.reported.clear();
    }
}
