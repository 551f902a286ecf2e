//! Comment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body rendered for comments whose content was removed
pub const DELETED_COMMENT_BODY: &str = "[deleted]";

/// Comment as stored by the comment backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub uid: String,
    pub user_uid: String,
    pub post_uid: String,
    pub body: String,
    #[serde(default)]
    pub parent_uid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Ownership record of a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOwner {
    pub owner_uid: String,
    pub post_uid: String,
}

/// Comment as exposed by the gateway; removed comments hide author and body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentView {
    pub uid: String,
    pub user_uid: Option<String>,
    pub post_uid: String,
    pub body: String,
    pub parent_uid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        let (user_uid, body) = if comment.is_deleted {
            (None, DELETED_COMMENT_BODY.to_string())
        } else {
            (Some(comment.user_uid), comment.body)
        };

        Self {
            uid: comment.uid,
            user_uid,
            post_uid: comment.post_uid,
            body,
            parent_uid: comment.parent_uid,
            created_at: comment.created_at,
            modified_at: comment.modified_at,
        }
    }
}

/// Request body for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
    #[serde(default)]
    pub parent_uid: Option<String>,
}

/// Request sent to the comment backend to create a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub post_uid: String,
    pub user_uid: String,
    pub body: String,
    pub parent_uid: Option<String>,
}

/// Request body for updating a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}
