//! Virtual-clock timer queue.
//!
//! Delayed UI transitions (modal cleanup, feedback expiry, round resets, badge
//! removal) are plain data here. Nothing fires on its own: the owner calls
//! [`Scheduler::drain_due`] with the current time, which the browser supplies
//! from `performance.now()` and tests supply by hand.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    due_ms: f64,
    payload: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_ms: now_ms + delay_ms.max(0.0),
            payload,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    /// Drop every pending timer (section switch).
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|p| p.due_ms).reduce(f64::min)
    }

    /// Remove and return every timer due at `now_ms`, earliest first; ties keep
    /// scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now_ms {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)));
        due.into_iter().map(|p| p.payload).collect()
    }
}
