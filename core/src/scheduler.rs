use alloc::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Deferred work a session runs once its deadline passes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    ReleaseInputLock,
    ResolvePair,
    ClockTick,
    ShowWin,
    RevealScore,
    MatchSignalCooldown,
    MatchSignalGrace,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle(u64);

/// Cancellable timer queue on the logical game clock.
///
/// Tasks fire in deadline order, ties in the order they were scheduled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scheduler {
    queue: BTreeMap<(Millis, TaskHandle), Task>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Millis, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.queue.insert((at, handle), task);
        log::trace!("Scheduled {:?} at {} as {:?}", task, at, handle);
        handle
    }

    /// Removes a pending task, returns whether it was still queued.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let key = self.queue.keys().find(|(_, queued)| *queued == handle).copied();
        key.and_then(|key| self.queue.remove(&key)).is_some()
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        count
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.queue.keys().next().map(|&(at, _)| at)
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.queue.keys().any(|(_, queued)| *queued == handle)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Takes the earliest task whose deadline is not after `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, TaskHandle, Task)> {
        let entry = self.queue.first_entry()?;
        let (at, handle) = *entry.key();
        if at > now {
            return None;
        }
        let task = *entry.get();
        entry.remove();
        Some((at, handle, task))
    }
}
