//! Bounded handoff queue between the perception thread (producer) and
//! the simulation thread (consumer).
//!
//! Single producer, single consumer. `push` never blocks: when the
//! queue is full the oldest entry is evicted. Entries keep FIFO order
//! and non-decreasing timestamps. The consumer drains once per tick,
//! discarding entries whose delivery deadline has passed.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::gesture::GestureEvent;

/// A gesture event wrapped with its delivery deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedAction {
    pub event: GestureEvent,
    /// Pipeline timestamp (microseconds) after which the entry is stale.
    pub deadline_us: u64,
}

/// Counters for dropped input, surfaced in the snapshot statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Entries evicted by overflow.
    pub evicted: u64,
    /// Entries discarded past their deadline.
    pub expired: u64,
}

struct QueueInner {
    entries: VecDeque<QueuedAction>,
    stats: QueueStats,
    last_timestamp_us: u64,
}

/// Bounded SPSC action queue. Shared via `Arc`; all methods take `&self`.
pub struct ActionQueue {
    inner: Mutex<QueueInner>,
    capacity: usize,
}

impl ActionQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "action queue capacity must be nonzero");
        Self {
            inner: Mutex::new(QueueInner {
                entries: VecDeque::with_capacity(capacity),
                stats: QueueStats::default(),
                last_timestamp_us: 0,
            }),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest if the queue is full.
    /// The producer never blocks.
    pub fn push(&self, action: QueuedAction) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        debug_assert!(
            action.event.timestamp_us >= inner.last_timestamp_us,
            "gesture timestamps must be non-decreasing"
        );
        inner.last_timestamp_us = action.event.timestamp_us;
        if inner.entries.len() == self.capacity {
            let _ = inner.entries.pop_front();
            inner.stats.evicted += 1;
        }
        inner.entries.push_back(action);
    }

    /// Remove and return the oldest entry. Non-blocking.
    pub fn pop(&self) -> Option<QueuedAction> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.pop_front()
    }

    /// Drain all pending entries, discarding those whose deadline has
    /// passed. Called once per simulation tick.
    pub fn drain_ready(&self, now_us: u64) -> Vec<GestureEvent> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut ready = Vec::with_capacity(inner.entries.len());
        while let Some(action) = inner.entries.pop_front() {
            if action.deadline_us < now_us {
                inner.stats.expired += 1;
            } else {
                ready.push(action.event);
            }
        }
        ready
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> QueueStats {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.stats
    }
}
