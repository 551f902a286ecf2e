//! Authorization chain for destructive mutations on posts and comments.
//!
//! A mutation is permitted when the actor owns the resource, is a global
//! administrator, or administers the resource's category. Checks run in that
//! order and stop at the first permit. Any lookup failure aborts the chain.

use crate::backend::Backends;
use crate::error::AppError;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

/// Resource targeted by a mutation, scoped by the category from the request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Post {
        uid: String,
        category_uid: String,
    },
    Comment {
        uid: String,
        post_uid: String,
        category_uid: String,
    },
}

impl Resource {
    pub fn post(uid: impl Into<String>, category_uid: impl Into<String>) -> Self {
        Resource::Post {
            uid: uid.into(),
            category_uid: category_uid.into(),
        }
    }

    pub fn comment(
        uid: impl Into<String>,
        post_uid: impl Into<String>,
        category_uid: impl Into<String>,
    ) -> Self {
        Resource::Comment {
            uid: uid.into(),
            post_uid: post_uid.into(),
            category_uid: category_uid.into(),
        }
    }

    pub fn uid(&self) -> &str {
        match self {
            Resource::Post { uid, .. } | Resource::Comment { uid, .. } => uid,
        }
    }

    pub fn category_uid(&self) -> &str {
        match self {
            Resource::Post { category_uid, .. } | Resource::Comment { category_uid, .. } => {
                category_uid
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit {
    Owner,
    GlobalAdmin,
    CategoryAdmin,
}

/// Facts resolved while evaluating the chain; discarded after the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthDecision {
    pub actor_uid: String,
    pub resource_owner_uid: String,
    /// `None` when the chain stopped before the lookup
    pub is_global_admin: Option<bool>,
    pub category_owner_uid: Option<String>,
    pub permit: Option<Permit>,
}

impl AuthDecision {
    pub fn is_allowed(&self) -> bool {
        self.permit.is_some()
    }
}

/// Recorded owner of a resource. A resource recorded under another parent than the
/// one in the request path is reported as not found.
pub async fn resource_owner(backends: &Backends, resource: &Resource) -> PolicyResult<String> {
    match resource {
        Resource::Post { uid, category_uid } => {
            let owner = backends.content.get_post_owner(uid).await?;
            if owner.category_uid != *category_uid {
                return Err(AppError::NotFound(format!(
                    "Post {} not found in category {}",
                    uid, category_uid
                )));
            }
            Ok(owner.owner_uid)
        }
        Resource::Comment { uid, post_uid, .. } => {
            let owner = backends.comments.get_comment_owner(uid).await?;
            if owner.post_uid != *post_uid {
                return Err(AppError::NotFound(format!(
                    "Comment {} not found on post {}",
                    uid, post_uid
                )));
            }
            Ok(owner.owner_uid)
        }
    }
}

/// Evaluate the chain without turning a deny into an error
pub async fn authorize(
    backends: &Backends,
    actor_uid: &str,
    resource: &Resource,
) -> PolicyResult<AuthDecision> {
    let mut decision = AuthDecision {
        actor_uid: actor_uid.to_string(),
        resource_owner_uid: resource_owner(backends, resource).await?,
        is_global_admin: None,
        category_owner_uid: None,
        permit: None,
    };

    if decision.resource_owner_uid == actor_uid {
        decision.permit = Some(Permit::Owner);
        return Ok(decision);
    }

    let actor = backends.identity.get_user_info(actor_uid).await?;
    decision.is_global_admin = Some(actor.is_admin);
    if actor.is_admin {
        decision.permit = Some(Permit::GlobalAdmin);
        return Ok(decision);
    }

    let category = backends
        .categories
        .get_category_info(resource.category_uid())
        .await?;
    if category.user_uid == actor_uid {
        decision.permit = Some(Permit::CategoryAdmin);
    }
    decision.category_owner_uid = Some(category.user_uid);

    Ok(decision)
}

/// Run the chain and fail with `Unauthorized` on deny
pub async fn enforce(
    backends: &Backends,
    actor_uid: &str,
    resource: &Resource,
) -> PolicyResult<AuthDecision> {
    let decision = authorize(backends, actor_uid, resource).await?;
    if !decision.is_allowed() {
        tracing::info!(actor = actor_uid, resource = resource.uid(), "Mutation denied");
        return Err(AppError::Unauthorized(format!(
            "Not allowed to modify {}",
            resource.uid()
        )));
    }
    Ok(decision)
}

/// Owner-only rule for updates, given an already resolved owner
pub fn check_owner(actor_uid: &str, owner_uid: &str, resource_uid: &str) -> PolicyResult<()> {
    if owner_uid != actor_uid {
        return Err(AppError::Unauthorized(format!(
            "Only the owner may modify {}",
            resource_uid
        )));
    }
    Ok(())
}

/// Owner-only check used by updates
pub async fn require_owner(
    backends: &Backends,
    actor_uid: &str,
    resource: &Resource,
) -> PolicyResult<()> {
    let owner_uid = resource_owner(backends, resource).await?;
    check_owner(actor_uid, &owner_uid, resource.uid())
}

/// Category-admin check used by moderation endpoints
pub async fn require_category_admin(
    backends: &Backends,
    actor_uid: &str,
    category_uid: &str,
) -> PolicyResult<()> {
    let category = backends.categories.get_category_info(category_uid).await?;
    if category.user_uid != actor_uid {
        return Err(AppError::Unauthorized(format!(
            "Not an administrator of category {}",
            category_uid
        )));
    }
    Ok(())
}
