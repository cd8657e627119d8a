//! Bounded per-user behavior log

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::models::BehaviorEvent;

/// Storage for per-user behavior events.
///
/// Implementations must keep events in insertion order; trend and
/// seasonality derivations depend on it.
pub trait BehaviorRepository: Send + Sync {
    /// Events for a user, oldest first
    fn get(&self, user_id: &str) -> Vec<BehaviorEvent>;

    fn append(&self, user_id: &str, event: BehaviorEvent);

    fn len(&self, user_id: &str) -> usize {
        self.get(user_id).len()
    }

    fn clear(&self, user_id: &str);
}

/// In-memory log keeping the most recent `capacity` events per user
pub struct InMemoryBehaviorLog {
    capacity: usize,
    logs: Mutex<HashMap<String, VecDeque<BehaviorEvent>>>,
}

impl InMemoryBehaviorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            logs: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<BehaviorEvent>>> {
        // A panic in another writer can't leave a deque half-updated, so the
        // data behind a poisoned lock is still consistent
        self.logs.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Behavior log lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for InMemoryBehaviorLog {
    fn default() -> Self {
        Self::new(100)
    }
}

impl BehaviorRepository for InMemoryBehaviorLog {
    fn get(&self, user_id: &str) -> Vec<BehaviorEvent> {
        self.lock()
            .get(user_id)
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn append(&self, user_id: &str, event: BehaviorEvent) {
        let mut logs = self.lock();
        let events = logs
            .entry(user_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));

        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    fn len(&self, user_id: &str) -> usize {
        self.lock().get(user_id).map(VecDeque::len).unwrap_or(0)
    }

    fn clear(&self, user_id: &str) {
        self.lock().remove(user_id);
    }
}
