//! Cascading-delete retry subsystem.
//!
//! Deleting a post fans out to three queues (content, statistics, comments), each
//! drained by a single long-lived worker. Items are retried after a fixed backoff
//! while their backend is unavailable and dropped on any other failure.

pub mod queue;
pub mod worker;

pub use queue::{WorkItem, WorkQueue};
pub use worker::{
    CommentDeletion, ContentDeletion, DeleteWorker, DeletionTarget, StatsDeletion, WorkOutcome,
};

use crate::backend::Backends;
use crate::config::CascadeConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct CascadeQueues {
    pub content: Arc<WorkQueue>,
    pub stats: Arc<WorkQueue>,
    pub comments: Arc<WorkQueue>,
    backoff: std::time::Duration,
}

impl CascadeQueues {
    pub fn new(config: &CascadeConfig) -> Self {
        Self {
            content: Arc::new(WorkQueue::new("content", config.queue_capacity)),
            stats: Arc::new(WorkQueue::new("stats", config.queue_capacity)),
            comments: Arc::new(WorkQueue::new("comments", config.queue_capacity)),
            backoff: config.retry_backoff(),
        }
    }

    /// Enqueue the post, its statistics record and the given comments.
    ///
    /// Waits while a queue is full.
    pub async fn enqueue_post_deletion(&self, post_uid: &str, comment_uids: Vec<String>) {
        self.content.push(WorkItem::now(post_uid)).await;
        self.stats.push(WorkItem::now(post_uid)).await;
        for comment_uid in comment_uids {
            self.comments.push(WorkItem::now(comment_uid)).await;
        }
        tracing::info!(post_uid, "Cascading delete enqueued");
    }

    /// Start one worker per queue
    pub fn spawn_workers(&self, backends: &Backends) -> Vec<JoinHandle<()>> {
        let workers = [
            DeleteWorker::new(
                self.content.clone(),
                Arc::new(ContentDeletion(backends.content.clone())),
                self.backoff,
            ),
            DeleteWorker::new(
                self.stats.clone(),
                Arc::new(StatsDeletion(backends.stats.clone())),
                self.backoff,
            ),
            DeleteWorker::new(
                self.comments.clone(),
                Arc::new(CommentDeletion(backends.comments.clone())),
                self.backoff,
            ),
        ];

        workers
            .into_iter()
            .map(|worker| tokio::spawn(worker.run()))
            .collect()
    }
}
