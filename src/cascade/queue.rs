//! Bounded delay queue feeding one cascade worker.
//!
//! Items are ordered by `not_before`, then by insertion. Capacity is a semaphore
//! permit per held item: producers wait for a permit when the queue is full, and
//! a permit is returned only when the worker finishes an item for good. Requeues
//! reuse the item's permit, so the worker itself never waits on capacity.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;
use tokio::sync::{Notify, Semaphore};
use tokio::time::Instant;

/// A pending deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub resource_uid: String,
    pub not_before: Instant,
    /// Attempts already made
    pub attempt: u32,
}

impl WorkItem {
    /// Item due immediately
    pub fn now(resource_uid: impl Into<String>) -> Self {
        Self::at(resource_uid, Instant::now())
    }

    pub fn at(resource_uid: impl Into<String>, not_before: Instant) -> Self {
        Self {
            resource_uid: resource_uid.into(),
            not_before,
            attempt: 0,
        }
    }

    /// Same resource, due `backoff` from now
    pub fn retry_after(self, backoff: std::time::Duration) -> Self {
        Self {
            resource_uid: self.resource_uid,
            not_before: Instant::now() + backoff,
            attempt: self.attempt + 1,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.not_before <= now
    }
}

#[derive(Debug)]
struct Entry {
    item: WorkItem,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.item
            .not_before
            .cmp(&other.item.not_before)
            .then(self.seq.cmp(&other.seq))
    }
}

pub struct WorkQueue {
    name: &'static str,
    capacity: usize,
    heap: Mutex<BinaryHeap<Reverse<Entry>>>,
    slots: Semaphore,
    seq: AtomicU64,
    notify: Notify,
}

impl WorkQueue {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            heap: Mutex::new(BinaryHeap::new()),
            slots: Semaphore::new(capacity),
            seq: AtomicU64::new(0),
            notify: Notify::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Items currently held, due or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enqueue a new item, waiting while the queue is full
    pub async fn push(&self, item: WorkItem) {
        match self.slots.acquire().await {
            // Held until `complete`.
            Ok(permit) => permit.forget(),
            Err(_) => return,
        }
        self.insert(item);
        metrics::counter!("gateway_cascade_items_total", "queue" => self.name, "outcome" => "enqueued")
            .increment(1);
    }

    /// Put back an item already counted against capacity
    pub fn requeue(&self, item: WorkItem) {
        self.insert(item);
    }

    /// Release the slot of an item that left the queue for good
    pub fn complete(&self) {
        self.slots.add_permits(1);
        self.record_depth();
    }

    /// Wait for the earliest item whose `not_before` has passed and take it
    pub async fn next_due(&self) -> WorkItem {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let deadline = {
                let mut heap = self.lock();
                let next = heap.peek().map(|Reverse(entry)| entry.item.not_before);
                match next {
                    Some(not_before) if not_before <= Instant::now() => {
                        if let Some(Reverse(entry)) = heap.pop() {
                            return entry.item;
                        }
                        None
                    }
                    other => other,
                }
            };

            match deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = &mut notified => {}
                        _ = tokio::time::sleep_until(deadline) => {}
                    }
                }
                None => notified.await,
            }
        }
    }

    fn insert(&self, item: WorkItem) {
        let seq = self.seq.fetch_add(1, AtomicOrdering::Relaxed);
        self.lock().push(Reverse(Entry { item, seq }));
        self.record_depth();
        self.notify.notify_one();
    }

    /// Slots left before `push` starts waiting
    pub(crate) fn free_slots(&self) -> usize {
        self.slots.available_permits()
    }

    fn record_depth(&self) {
        let held = self.capacity.saturating_sub(self.free_slots());
        metrics::gauge!("gateway_cascade_queue_depth", "queue" => self.name).set(held as f64);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BinaryHeap<Reverse<Entry>>> {
        // A poisoned heap is still structurally valid.
        self.heap.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
