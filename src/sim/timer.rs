//! One-shot timers on the simulation clock
//!
//! Events are plain values handed back by `advance` once their fire time has
//! passed. Time is simulated milliseconds, so a paused host pauses timers too.

/// Handle for cancelling a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    id: TimerId,
    fire_at_ms: f64,
    event: E,
}

/// Pending one-shot events, fired in fire-time order
#[derive(Debug, Clone)]
pub struct Timers<E> {
    now_ms: f64,
    pending: Vec<Scheduled<E>>,
    next_id: u64,
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Fire `event` once `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            fire_at_ms: self.now_ms + delay_ms.max(0.0),
            event,
        });
        id
    }

    /// Drop a pending event; false if it already fired or never existed
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Move the clock forward and return every event now due
    pub fn advance(&mut self, dt_ms: f64) -> Vec<E> {
        self.now_ms += dt_ms;
        let now = self.now_ms;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|s| s.fire_at_ms <= now);
        self.pending = pending;

        // Same fire time keeps scheduling order
        due.sort_by(|a, b| {
            a.fire_at_ms
                .partial_cmp(&b.fire_at_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.0.cmp(&b.id.0))
        });
        due.into_iter().map(|s| s.event).collect()
    }
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timers = Timers::new();
        let id = timers.schedule(800.0, "next");

        assert!(timers.advance(500.0).is_empty());
        assert!(timers.advance(299.0).is_empty());
        assert_eq!(timers.advance(1.0), vec!["next"]);
        assert!(timers.advance(1000.0).is_empty());
        assert!(!timers.is_pending(id));
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let id = timers.schedule(100.0, 1);
        assert!(timers.is_pending(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance(200.0).is_empty());
    }

    #[test]
    fn test_fire_order() {
        let mut timers = Timers::new();
        timers.schedule(300.0, 'c');
        timers.schedule(100.0, 'a');
        timers.schedule(100.0, 'b');
        assert_eq!(timers.advance(500.0), vec!['a', 'b', 'c']);
    }
}
