//! Post orchestration: aggregated reads, creation with statistics, votes and
//! cascading deletion

use crate::backend::{Backends, StatsBackend};
use crate::cascade::CascadeQueues;
use crate::domain::{
    CreatePostInput, CreateReportInput, NewPost, NewReport, Post, PostStats, PostWithStats,
    Report, UpdatePostInput, VoteResult,
};
use crate::error::{AppError, BackendError, Result};
use crate::policy::{self, Resource};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

/// Page size used when sweeping a post's comments before deletion
const COMMENT_SWEEP_PAGE_SIZE: u32 = 100;
const COMMENT_SWEEP_MAX_PAGES: u32 = 1000;

/// Statistics of a post, or sentinel counters when the statistics backend is
/// unavailable. Any other failure is returned.
pub async fn stats_or_sentinel(stats: &dyn StatsBackend, post_uid: &str) -> Result<PostStats> {
    match stats.get_post_stats(post_uid).await {
        Ok(stats) => Ok(stats),
        Err(e) if e.is_unavailable() => {
            warn!(post_uid, error = %e, "Statistics unavailable, serving sentinel counters");
            metrics::counter!("gateway_stats_degraded_total").increment(1);
            Ok(PostStats::unavailable())
        }
        Err(e) => Err(e.into()),
    }
}

pub struct PostService {
    backends: Backends,
    cascade: Arc<CascadeQueues>,
}

impl PostService {
    pub fn new(backends: Backends, cascade: Arc<CascadeQueues>) -> Self {
        Self { backends, cascade }
    }

    /// Single post merged with its statistics
    pub async fn get_with_stats(&self, uid: &str) -> Result<PostWithStats> {
        let post = self.backends.content.get_post(uid).await?;
        let stats = stats_or_sentinel(self.backends.stats.as_ref(), uid).await?;
        Ok(PostWithStats { post, stats })
    }

    /// Read a post for display and count the view
    pub async fn view(&self, uid: &str) -> Result<PostWithStats> {
        let merged = self.get_with_stats(uid).await?;
        match self.backends.stats.increase_views(uid).await {
            Ok(()) => {}
            Err(e) if e.is_unavailable() => {
                warn!(post_uid = uid, error = %e, "View not counted, statistics unavailable");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(merged)
    }

    pub async fn list_with_stats(&self, page: u32, size: u32) -> Result<Vec<PostWithStats>> {
        let posts = self.backends.content.list_posts(page, size).await?;
        self.attach_stats(posts).await
    }

    pub async fn list_category_with_stats(
        &self,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> Result<Vec<PostWithStats>> {
        let posts = self
            .backends
            .content
            .list_posts_by_category(category_uid, page, size)
            .await?;
        self.attach_stats(posts).await
    }

    /// Merge statistics into a page of posts. After the first unavailable
    /// response the remaining posts get sentinel counters without another call.
    async fn attach_stats(&self, posts: Vec<Post>) -> Result<Vec<PostWithStats>> {
        let mut merged = Vec::with_capacity(posts.len());
        let mut degraded = false;

        for post in posts {
            let stats = if degraded {
                metrics::counter!("gateway_stats_degraded_total").increment(1);
                PostStats::unavailable()
            } else {
                let stats = stats_or_sentinel(self.backends.stats.as_ref(), &post.uid).await?;
                degraded = stats.is_unavailable();
                stats
            };
            merged.push(PostWithStats { post, stats });
        }

        Ok(merged)
    }

    /// Create a post and its statistics record. If the statistics backend is
    /// unavailable the post is deleted again and the request fails.
    pub async fn create(
        &self,
        actor_uid: &str,
        category_uid: &str,
        input: CreatePostInput,
    ) -> Result<Post> {
        input.validate()?;
        self.backends
            .categories
            .get_category_info(category_uid)
            .await?;

        let post = self
            .backends
            .content
            .create_post(&NewPost {
                title: input.title,
                url: input.url,
                user_uid: actor_uid.to_string(),
                category_uid: category_uid.to_string(),
            })
            .await?;

        match self.backends.stats.create_post_stats(&post.uid).await {
            Ok(()) => Ok(post),
            Err(e) if e.is_unavailable() => {
                warn!(post_uid = %post.uid, error = %e, "Statistics unavailable, rolling back post");
                self.backends.content.delete_post(&post.uid).await?;
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Owner-only update
    pub async fn update(&self, actor_uid: &str, uid: &str, input: UpdatePostInput) -> Result<()> {
        input.validate()?;
        let owner = self.backends.content.get_post_owner(uid).await?;
        policy::check_owner(actor_uid, &owner.owner_uid, uid)?;
        self.backends.content.update_post(uid, &input).await?;
        Ok(())
    }

    pub async fn like(&self, actor_uid: &str, uid: &str) -> Result<VoteResult> {
        self.ensure_exists(uid).await?;
        Ok(self.backends.stats.like_post(uid, actor_uid).await?)
    }

    pub async fn dislike(&self, actor_uid: &str, uid: &str) -> Result<VoteResult> {
        self.ensure_exists(uid).await?;
        Ok(self.backends.stats.dislike_post(uid, actor_uid).await?)
    }

    /// Authorize, then hand the post, its statistics and its current comments to
    /// the cascade. Returns once everything is enqueued.
    ///
    /// The enqueue runs in its own task and finishes even if the request is
    /// dropped while a full queue makes it wait. Comments created after the
    /// sweep are not enqueued.
    pub async fn delete(&self, actor_uid: &str, category_uid: &str, uid: &str) -> Result<()> {
        policy::enforce(&self.backends, actor_uid, &Resource::post(uid, category_uid)).await?;

        let comment_uids = self.comment_uids(uid).await?;
        let cascade = self.cascade.clone();
        let post_uid = uid.to_string();
        tokio::spawn(async move {
            cascade
                .enqueue_post_deletion(&post_uid, comment_uids)
                .await
        })
        .await
        .map_err(|e| anyhow::anyhow!("Cascade enqueue task failed: {}", e))?;
        Ok(())
    }

    /// File a moderation report against a post; any authenticated user may report
    pub async fn report(
        &self,
        category_uid: &str,
        uid: &str,
        input: CreateReportInput,
    ) -> Result<Report> {
        policy::resource_owner(&self.backends, &Resource::post(uid, category_uid)).await?;

        let report = self
            .backends
            .categories
            .create_report(&NewReport {
                category_uid: category_uid.to_string(),
                post_uid: uid.to_string(),
                comment_uid: uuid::Uuid::nil().to_string(),
                reason: input.reason,
            })
            .await?;
        Ok(report)
    }

    async fn ensure_exists(&self, uid: &str) -> Result<()> {
        if !self.backends.content.check_post_exists(uid).await? {
            return Err(AppError::NotFound(format!("Post {} not found", uid)));
        }
        Ok(())
    }

    /// Comment uids of a post, page by page. Stops early when the backend
    /// repeats a page or after `COMMENT_SWEEP_MAX_PAGES` pages.
    async fn comment_uids(&self, post_uid: &str) -> Result<Vec<String>> {
        let mut uids = Vec::new();
        let mut page = 0;
        let mut previous_last: Option<String> = None;
        loop {
            let comments = match self
                .backends
                .comments
                .list_comments(post_uid, None, page, COMMENT_SWEEP_PAGE_SIZE)
                .await
            {
                Ok(comments) => comments,
                Err(BackendError::NotFound(_)) => Vec::new(),
                Err(e) => return Err(e.into()),
            };
            let last_page = (comments.len() as u32) < COMMENT_SWEEP_PAGE_SIZE;
            let page_last = comments.last().map(|c| c.uid.clone());
            if page_last.is_some() && page_last == previous_last {
                warn!(post_uid, page, "Comment listing repeated a page, ending sweep");
                return Ok(uids);
            }
            uids.extend(comments.into_iter().map(|c| c.uid));
            if last_page {
                return Ok(uids);
            }
            page += 1;
            if page >= COMMENT_SWEEP_MAX_PAGES {
                warn!(post_uid, pages = page, "Comment sweep page limit reached");
                return Ok(uids);
            }
            previous_last = page_last;
        }
    }
}
