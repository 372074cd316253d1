//! # Alarms
//!
//! One-shot timers ordered by deadline. The event loop owns one queue, asks
//! it how long it may sleep, and pops expired entries to run them.
//!
//! Time is always passed in, never read here, so ordering and cancellation
//! are testable without sleeping.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Identifies a scheduled alarm so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmHandle(u64);

/// Longer intervals are clamped to this, which is as good as never.
pub const MAX_INTERVAL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

pub struct AlarmQueue<T> {
    next_id: u64,
    /// Keyed by (deadline, id) so equal deadlines fire in scheduling order.
    pending: BTreeMap<(Instant, u64), T>,
    deadlines: HashMap<u64, Instant>,
}

impl<T> Default for AlarmQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AlarmQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn schedule(&mut self, now: Instant, interval: Duration, item: T) -> AlarmHandle {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = now.checked_add(interval.min(MAX_INTERVAL)).unwrap_or(now);
        self.pending.insert((deadline, id), item);
        self.deadlines.insert(id, deadline);
        AlarmHandle(id)
    }

    /// Returns `false` if the alarm already fired or was cancelled.
    pub fn cancel(&mut self, handle: AlarmHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(deadline) => self.pending.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    /// Cancel everything. Returns how many alarms were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        self.deadlines.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Time until the next alarm is due, zero if one is overdue.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Marks the alarms that exist right now. Pass it to [`pop_expired`] so
    /// a firing pass never picks up alarms its own callbacks scheduled.
    ///
    /// [`pop_expired`]: AlarmQueue::pop_expired
    pub fn watermark(&self) -> u64 {
        self.next_id
    }

    /// Remove and return the earliest alarm that is due at `now` and was
    /// scheduled before `watermark`.
    pub fn pop_expired(&mut self, now: Instant, watermark: u64) -> Option<(AlarmHandle, T)> {
        let key = self
            .pending
            .keys()
            .take_while(|(deadline, _)| *deadline <= now)
            .find(|(_, id)| *id < watermark)
            .copied()?;
        self.deadlines.remove(&key.1);
        self.pending.remove(&key).map(|item| (AlarmHandle(key.1), item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let now = Instant::now();
        let mut queue = AlarmQueue::new();
        queue.schedule(now, secs(3), "c");
        queue.schedule(now, secs(1), "a");
        queue.schedule(now, secs(2), "b");

        let mark = queue.watermark();
        let later = now + secs(5);
        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_expired(later, mark))
            .map(|(_, item)| item)
            .collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_not_due_yet() {
        let now = Instant::now();
        let mut queue = AlarmQueue::new();
        queue.schedule(now, secs(10), ());
        assert!(queue.pop_expired(now + secs(9), queue.watermark()).is_none());
        assert_eq!(queue.time_until_next(now + secs(4)), Some(secs(6)));
        assert_eq!(queue.time_until_next(now + secs(11)), Some(Duration::ZERO));
    }

    #[test]
    fn test_cancel() {
        let now = Instant::now();
        let mut queue = AlarmQueue::new();
        let first = queue.schedule(now, secs(1), 1);
        let second = queue.schedule(now, secs(1), 2);

        assert!(queue.cancel(first));
        assert!(!queue.cancel(first), "double cancel reports false");
        assert_eq!(queue.len(), 1);

        let (handle, item) = queue.pop_expired(now + secs(1), queue.watermark()).unwrap();
        assert_eq!(handle, second);
        assert_eq!(item, 2);
        assert!(!queue.cancel(second), "fired alarms cannot be cancelled");
    }

    #[test]
    fn test_cancel_all() {
        let now = Instant::now();
        let mut queue = AlarmQueue::new();
        for i in 0..4 {
            queue.schedule(now, secs(i), i);
        }
        assert_eq!(queue.cancel_all(), 4);
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_oversized_interval_is_clamped() {
        let now = Instant::now();
        let mut queue = AlarmQueue::new();
        queue.schedule(now, Duration::MAX, ());
        assert_eq!(queue.time_until_next(now), Some(MAX_INTERVAL));
        assert!(queue.pop_expired(now + secs(86_400), queue.watermark()).is_none());
    }

    #[test]
    fn test_watermark_excludes_newer_alarms() {
        let now = Instant::now();
        let mut queue = AlarmQueue::new();
        queue.schedule(now, Duration::ZERO, "old");
        let mark = queue.watermark();
        queue.schedule(now, Duration::ZERO, "new");

        assert_eq!(queue.pop_expired(now, mark).map(|(_, i)| i), Some("old"));
        assert!(queue.pop_expired(now, mark).is_none());
        assert_eq!(queue.len(), 1);
    }
}
