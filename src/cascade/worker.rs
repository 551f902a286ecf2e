//! Deletion targets and the worker loop draining one queue

use super::queue::{WorkItem, WorkQueue};
use crate::backend::{CommentBackend, ContentBackend, StatsBackend};
use crate::error::{BackendError, BackendResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Backend deletion performed by a worker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeletionTarget: Send + Sync {
    async fn delete(&self, resource_uid: &str) -> BackendResult<()>;
}

pub struct ContentDeletion(pub Arc<dyn ContentBackend>);

#[async_trait]
impl DeletionTarget for ContentDeletion {
    async fn delete(&self, resource_uid: &str) -> BackendResult<()> {
        self.0.delete_post(resource_uid).await
    }
}

pub struct StatsDeletion(pub Arc<dyn StatsBackend>);

#[async_trait]
impl DeletionTarget for StatsDeletion {
    async fn delete(&self, resource_uid: &str) -> BackendResult<()> {
        self.0.delete_post_stats(resource_uid).await
    }
}

pub struct CommentDeletion(pub Arc<dyn CommentBackend>);

#[async_trait]
impl DeletionTarget for CommentDeletion {
    async fn delete(&self, resource_uid: &str) -> BackendResult<()> {
        self.0.delete_comment(resource_uid).await
    }
}

/// Result of handling one dequeued item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkOutcome {
    /// Deleted; the item leaves the queue
    Done,
    /// Not due yet; put back unchanged without calling the backend
    Deferred,
    /// Backend unavailable; put back with a later `not_before`
    Retried(WorkItem),
    /// Unrecoverable failure; the item leaves the queue
    Dropped(BackendError),
}

pub struct DeleteWorker {
    queue: Arc<WorkQueue>,
    target: Arc<dyn DeletionTarget>,
    backoff: Duration,
}

impl DeleteWorker {
    pub fn new(queue: Arc<WorkQueue>, target: Arc<dyn DeletionTarget>, backoff: Duration) -> Self {
        Self {
            queue,
            target,
            backoff,
        }
    }

    /// Drain the queue for the lifetime of the process
    pub async fn run(self) {
        tracing::info!(queue = self.queue.name(), "Cascade worker started");
        loop {
            let item = self.queue.next_due().await;
            self.process(item).await;
        }
    }

    /// Attempt one item and settle it back into the queue or out of it
    pub async fn process(&self, item: WorkItem) -> WorkOutcome {
        let queue = self.queue.name();

        if !item.is_due(Instant::now()) {
            self.queue.requeue(item);
            return WorkOutcome::Deferred;
        }

        match self.target.delete(&item.resource_uid).await {
            Ok(()) => {
                tracing::debug!(queue, resource_uid = %item.resource_uid, attempt = item.attempt, "Cascade delete done");
                metrics::counter!("gateway_cascade_items_total", "queue" => queue, "outcome" => "done")
                    .increment(1);
                self.queue.complete();
                WorkOutcome::Done
            }
            Err(e) if e.is_unavailable() => {
                let retry = item.retry_after(self.backoff);
                tracing::info!(
                    queue,
                    resource_uid = %retry.resource_uid,
                    attempt = retry.attempt,
                    error = %e,
                    "Backend unavailable, cascade delete rescheduled"
                );
                metrics::counter!("gateway_cascade_items_total", "queue" => queue, "outcome" => "retried")
                    .increment(1);
                self.queue.requeue(retry.clone());
                WorkOutcome::Retried(retry)
            }
            Err(e) => {
                tracing::warn!(
                    queue,
                    resource_uid = %item.resource_uid,
                    attempt = item.attempt,
                    classification = e.kind(),
                    error = %e,
                    "Cascade delete dropped"
                );
                metrics::counter!("gateway_cascade_items_total", "queue" => queue, "outcome" => "dropped")
                    .increment(1);
                self.queue.complete();
                WorkOutcome::Dropped(e)
            }
        }
    }
}
