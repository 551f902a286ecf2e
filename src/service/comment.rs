//! Comment orchestration

use crate::backend::Backends;
use crate::domain::{
    Comment, CommentView, CreateCommentInput, CreateReportInput, NewComment, NewReport, Report,
    UpdateCommentInput,
};
use crate::error::{AppError, Result};
use crate::policy::{self, Resource};
use validator::Validate;

pub struct CommentService {
    backends: Backends,
}

impl CommentService {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    pub async fn list(
        &self,
        post_uid: &str,
        parent_uid: Option<String>,
        page: u32,
        size: u32,
    ) -> Result<Vec<CommentView>> {
        self.ensure_post_exists(post_uid).await?;
        let comments = self
            .backends
            .comments
            .list_comments(post_uid, parent_uid, page, size)
            .await?;
        Ok(comments.into_iter().map(CommentView::from).collect())
    }

    pub async fn get(&self, post_uid: &str, uid: &str) -> Result<CommentView> {
        let comment = self.find_on_post(post_uid, uid).await?;
        Ok(comment.into())
    }

    pub async fn create(
        &self,
        actor_uid: &str,
        post_uid: &str,
        input: CreateCommentInput,
    ) -> Result<CommentView> {
        input.validate()?;
        self.ensure_post_exists(post_uid).await?;

        if let Some(parent_uid) = &input.parent_uid {
            let parent = self.backends.comments.get_comment(parent_uid).await?;
            if parent.post_uid != post_uid {
                return Err(AppError::Validation(format!(
                    "Parent comment {} belongs to another post",
                    parent_uid
                )));
            }
        }

        let comment = self
            .backends
            .comments
            .create_comment(&NewComment {
                post_uid: post_uid.to_string(),
                user_uid: actor_uid.to_string(),
                body: input.body,
                parent_uid: input.parent_uid,
            })
            .await?;
        Ok(comment.into())
    }

    /// Owner-only update
    pub async fn update(
        &self,
        actor_uid: &str,
        post_uid: &str,
        uid: &str,
        input: UpdateCommentInput,
    ) -> Result<()> {
        input.validate()?;
        let post = self.backends.content.get_post_owner(post_uid).await?;
        let resource = Resource::comment(uid, post_uid, post.category_uid);
        policy::require_owner(&self.backends, actor_uid, &resource).await?;

        self.backends.comments.update_comment(uid, &input).await?;
        Ok(())
    }

    /// Remove a comment's content after the authorization chain permits it
    pub async fn delete(
        &self,
        actor_uid: &str,
        category_uid: &str,
        post_uid: &str,
        uid: &str,
    ) -> Result<()> {
        self.ensure_post_in_category(category_uid, post_uid).await?;
        let resource = Resource::comment(uid, post_uid, category_uid);
        policy::enforce(&self.backends, actor_uid, &resource).await?;

        self.backends.comments.remove_content(uid).await?;
        Ok(())
    }

    pub async fn report(
        &self,
        category_uid: &str,
        post_uid: &str,
        uid: &str,
        input: CreateReportInput,
    ) -> Result<Report> {
        self.ensure_post_in_category(category_uid, post_uid).await?;
        policy::resource_owner(
            &self.backends,
            &Resource::comment(uid, post_uid, category_uid),
        )
        .await?;

        let report = self
            .backends
            .categories
            .create_report(&NewReport {
                category_uid: category_uid.to_string(),
                post_uid: post_uid.to_string(),
                comment_uid: uid.to_string(),
                reason: input.reason,
            })
            .await?;
        Ok(report)
    }

    async fn ensure_post_exists(&self, post_uid: &str) -> Result<()> {
        if !self.backends.content.check_post_exists(post_uid).await? {
            return Err(AppError::NotFound(format!("Post {} not found", post_uid)));
        }
        Ok(())
    }

    async fn ensure_post_in_category(&self, category_uid: &str, post_uid: &str) -> Result<()> {
        let post = self.backends.content.get_post_owner(post_uid).await?;
        if post.category_uid != category_uid {
            return Err(AppError::NotFound(format!(
                "Post {} not found in category {}",
                post_uid, category_uid
            )));
        }
        Ok(())
    }

    async fn find_on_post(&self, post_uid: &str, uid: &str) -> Result<Comment> {
        let comment = self.backends.comments.get_comment(uid).await?;
        if comment.post_uid != post_uid {
            return Err(AppError::NotFound(format!(
                "Comment {} not found on post {}",
                uid, post_uid
            )));
        }
        Ok(comment)
    }
}
