//! Tick-counting timer table
//!
//! Entries are keyed by [`TaskId`] and count down in whole ticks. A
//! `Repeating` entry re-arms itself after firing; a `OneShot` entry is
//! removed once it fires. Cancelled entries are swept on the next tick
//! without firing.

use std::collections::HashMap;

use crate::cancel::CancellationToken;

/// Unique identifier for a scheduled entry
pub type TaskId = u64;

/// Whether an entry fires once or re-arms after each fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fires every `interval` ticks until cancelled
    Repeating,
    /// Fires once after `interval` ticks, then is removed
    OneShot,
}

#[derive(Debug)]
struct TaskEntry {
    kind: TaskKind,
    interval: u64,
    remaining: u64,
    token: CancellationToken,
}

/// Counters describing scheduler activity, mostly useful in tests and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Total entries ever scheduled
    pub scheduled: u64,
    /// Total fire events delivered
    pub fired: u64,
    /// Total entries removed by cancellation
    pub cancelled: u64,
}

/// Single-threaded timer table driven by an external ~20ms tick.
///
/// `tick()` advances every live entry by one tick and returns the ids that
/// came due, in ascending id order so firing is deterministic. The scheduler
/// holds no callbacks; callers match the returned ids against their own
/// state, which keeps all mutation inside the caller's event loop.
#[derive(Debug, Default)]
pub struct TickScheduler {
    entries: HashMap<TaskId, TaskEntry>,
    next_id: TaskId,
    stats: TickStats,
}

impl TickScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an entry that fires after `interval_ticks` ticks.
    ///
    /// An `interval_ticks` of zero is treated as one tick, so an entry never
    /// fires synchronously inside `schedule`. Returns the entry id and the
    /// cancellation token the owner holds.
    pub fn schedule(&mut self, kind: TaskKind, interval_ticks: u64) -> (TaskId, CancellationToken) {
        let interval = interval_ticks.max(1);
        let id = self.next_id;
        self.next_id += 1;

        let token = CancellationToken::new();
        self.entries.insert(
            id,
            TaskEntry {
                kind,
                interval,
                remaining: interval,
                token: token.clone(),
            },
        );
        self.stats.scheduled += 1;

        (id, token)
    }

    /// Cancel an entry by id. Returns `true` if the entry was live.
    ///
    /// The entry's token is cancelled too, so clones held elsewhere observe
    /// the cancellation.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(entry) = self.entries.remove(&id) {
            entry.token.cancel();
            self.stats.cancelled += 1;
            true
        } else {
            false
        }
    }

    /// Cancel every live entry
    pub fn cancel_all(&mut self) {
        for (_, entry) in self.entries.drain() {
            entry.token.cancel();
            self.stats.cancelled += 1;
        }
    }

    /// Advance one tick and return the entries that came due, in id order.
    ///
    /// Entries whose token was cancelled externally are swept here without
    /// firing. A repeating entry re-arms to its full interval after firing.
    pub fn tick(&mut self) -> Vec<TaskId> {
        let mut fired = Vec::new();
        let mut finished = Vec::new();

        for (&id, entry) in &mut self.entries {
            if entry.token.is_cancelled() {
                finished.push(id);
                continue;
            }

            entry.remaining -= 1;
            if entry.remaining > 0 {
                continue;
            }

            fired.push(id);
            match entry.kind {
                TaskKind::Repeating => entry.remaining = entry.interval,
                TaskKind::OneShot => finished.push(id),
            }
        }

        for id in finished {
            if let Some(entry) = self.entries.remove(&id) {
                if entry.token.is_cancelled() {
                    self.stats.cancelled += 1;
                }
            }
        }

        fired.sort_unstable();
        self.stats.fired += fired.len() as u64;
        fired
    }

    /// Whether an entry is still live
    pub fn contains(&self, id: TaskId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scheduler has no live entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Activity counters
    pub fn stats(&self) -> TickStats {
        self.stats
    }
}
