use homeguard_common::types::AlertEvent;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Default number of events kept, matching the dashboard's activity list.
pub const DEFAULT_CAPACITY: usize = 100;

/// Capacity-bounded alert history, newest first.
///
/// New events are inserted at the front; once the log is full the oldest
/// events are evicted from the tail. Every accessor returns an owned
/// snapshot, so readers never observe a log that is being modified.
///
/// # Examples
///
/// ```
/// use homeguard_alert::event_log::EventLog;
///
/// let log = EventLog::new(2);
/// assert!(log.is_empty());
/// assert_eq!(log.capacity(), 2);
/// ```
pub struct EventLog {
    capacity: usize,
    events: Mutex<VecDeque<AlertEvent>>,
}

impl EventLog {
    /// Creates a log holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<AlertEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn append(&self, event: AlertEvent) {
        let mut events = self.lock();
        events.push_front(event);
        events.truncate(self.capacity);
    }

    /// The `n` most recent events, newest first.
    pub fn recent(&self, n: usize) -> Vec<AlertEvent> {
        self.lock().iter().take(n).cloned().collect()
    }

    /// Every retained event, newest first.
    pub fn snapshot(&self) -> Vec<AlertEvent> {
        self.recent(self.capacity)
    }

    pub fn latest(&self) -> Option<AlertEvent> {
        self.lock().front().cloned()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
