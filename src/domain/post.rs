//! Post and post statistics models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Value reported for every counter when the statistics backend is unavailable
pub const STATS_UNAVAILABLE: i32 = -1;

/// Post as stored by the content backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    pub uid: String,
    pub user_uid: String,
    pub category_uid: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Ownership record of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOwner {
    pub owner_uid: String,
    pub category_uid: String,
}

/// Counters kept by the statistics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostStats {
    pub num_likes: i32,
    pub num_dislikes: i32,
    pub num_views: i32,
}

impl PostStats {
    /// Counters of a freshly created post
    pub fn zero() -> Self {
        Self {
            num_likes: 0,
            num_dislikes: 0,
            num_views: 0,
        }
    }

    /// Sentinel counters served while the statistics backend is down
    pub fn unavailable() -> Self {
        Self {
            num_likes: STATS_UNAVAILABLE,
            num_dislikes: STATS_UNAVAILABLE,
            num_views: STATS_UNAVAILABLE,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        *self == Self::unavailable()
    }
}

/// Post merged with its statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostWithStats {
    #[serde(flatten)]
    pub post: Post,
    #[serde(flatten)]
    pub stats: PostStats,
}

/// Request body for creating a post
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: String,
}

/// Request sent to the content backend to create a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub url: String,
    pub user_uid: String,
    pub category_uid: String,
}

/// Request body for updating a post
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: String,
}

/// Outcome of a like/dislike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VoteResult {
    pub success: bool,
    pub first_time: bool,
}
