//! Per-node scheduled work.
//!
//! Tasks are plain keys, `(owner, task)`, with a due time and an optional
//! repeat interval. The queue never runs anything itself: the page asks for
//! the due keys and routes each one back to its owner. Scheduling a key that
//! is already queued replaces it.

use std::collections::BTreeMap;

use web_time::{Duration, Instant};

use crate::NodeId;

pub type TaskId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    due: Instant,
    repeat: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    entries: BTreeMap<(NodeId, TaskId), Entry>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, owner: NodeId, task: TaskId, due: Instant, repeat: Option<Duration>) {
        log::trace!("schedule {owner:?}/{task}");
        self.entries.insert((owner, task), Entry { due, repeat });
    }

    pub fn cancel(&mut self, owner: NodeId, task: TaskId) -> bool {
        self.entries.remove(&(owner, task)).is_some()
    }

    pub fn cancel_owner(&mut self, owner: NodeId) {
        self.entries.retain(|(o, _), _| *o != owner);
    }

    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("cancelling {} scheduled tasks", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn is_scheduled(&self, owner: NodeId, task: TaskId) -> bool {
        self.entries.contains_key(&(owner, task))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns every key due at `now`, earliest first. Repeating
    /// tasks are put back one interval after `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<(NodeId, TaskId)> {
        let mut due: Vec<(Instant, (NodeId, TaskId))> = self
            .entries
            .iter()
            .filter(|(_, e)| e.due <= now)
            .map(|(k, e)| (e.due, *k))
            .collect();
        due.sort_by_key(|(t, _)| *t);

        for (_, key) in &due {
            let Some(entry) = self.entries.remove(key) else {
                continue;
            };
            if let Some(every) = entry.repeat {
                self.entries.insert(
                    *key,
                    Entry {
                        due: now + every,
                        repeat: Some(every),
                    },
                );
            }
        }
        due.into_iter().map(|(_, k)| k).collect()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.due).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<NodeId> {
        let mut m: SlotMap<NodeId, ()> = SlotMap::with_key();
        (0..n).map(|_| m.insert(())).collect()
    }

    #[test]
    fn test_due_in_time_order() {
        let t0 = Instant::now();
        let n = ids(2);
        let mut q = TaskQueue::new();
        q.schedule(n[0], 1, t0 + Duration::from_millis(20), None);
        q.schedule(n[1], 1, t0 + Duration::from_millis(10), None);
        assert_eq!(q.next_due(), Some(t0 + Duration::from_millis(10)));
        assert!(q.take_due(t0).is_empty());
        assert_eq!(q.take_due(t0 + Duration::from_millis(30)), vec![(n[1], 1), (n[0], 1)]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_repeat_reschedules() {
        let t0 = Instant::now();
        let n = ids(1);
        let mut q = TaskQueue::new();
        let every = Duration::from_secs(5);
        q.schedule(n[0], 2, t0 + every, Some(every));
        let later = t0 + every;
        assert_eq!(q.take_due(later), vec![(n[0], 2)]);
        assert!(q.is_scheduled(n[0], 2));
        assert_eq!(q.next_due(), Some(later + every));
    }

    #[test]
    fn test_cancel_owner_only_hits_owner() {
        let t0 = Instant::now();
        let n = ids(2);
        let mut q = TaskQueue::new();
        q.schedule(n[0], 1, t0, None);
        q.schedule(n[0], 2, t0, None);
        q.schedule(n[1], 1, t0, None);
        q.cancel_owner(n[0]);
        assert_eq!(q.len(), 1);
        assert!(q.cancel(n[1], 1));
        assert!(!q.cancel(n[1], 1));
        q.schedule(n[1], 3, t0, None);
        q.cancel_all();
        assert!(q.is_empty());
    }
}
