//! Service client facade: one trait per backend capability

pub mod category;
pub mod comment;
pub mod content;
pub mod credential;
pub mod http;
pub mod identity;
pub mod stats;

use crate::config::Config;
use crate::domain::{
    AccessToken, App, AppInfo, Category, CodeExchange, Comment, CommentOwner, CreateUserInput,
    CreatedUser, Credentials, NewApp, NewCategory, NewComment, NewPost, NewReport, OAuthCode,
    OAuthCodeRequest, Post, PostOwner, PostStats, RefreshToken, Report, TokenPair,
    UpdateCommentInput, UpdatePostInput, UserInfo, VoteResult,
};
use crate::error::BackendResult;
use async_trait::async_trait;
use std::sync::Arc;

pub use category::CategoryClient;
pub use comment::CommentClient;
pub use content::ContentClient;
pub use credential::CredentialCache;
pub use identity::IdentityClient;
pub use stats::StatsClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn create_post(&self, input: &NewPost) -> BackendResult<Post>;
    async fn get_post(&self, uid: &str) -> BackendResult<Post>;
    async fn list_posts(&self, page: u32, size: u32) -> BackendResult<Vec<Post>>;
    async fn list_posts_by_category(
        &self,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Post>>;
    async fn get_post_owner(&self, uid: &str) -> BackendResult<PostOwner>;
    async fn update_post(&self, uid: &str, input: &UpdatePostInput) -> BackendResult<()>;
    async fn delete_post(&self, uid: &str) -> BackendResult<()>;
    async fn check_post_exists(&self, uid: &str) -> BackendResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentBackend: Send + Sync {
    async fn create_comment(&self, input: &NewComment) -> BackendResult<Comment>;
    async fn get_comment(&self, uid: &str) -> BackendResult<Comment>;
    async fn list_comments(
        &self,
        post_uid: &str,
        parent_uid: Option<String>,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Comment>>;
    async fn get_comment_owner(&self, uid: &str) -> BackendResult<CommentOwner>;
    async fn update_comment(&self, uid: &str, input: &UpdateCommentInput) -> BackendResult<()>;
    async fn delete_comment(&self, uid: &str) -> BackendResult<()>;
    async fn remove_content(&self, uid: &str) -> BackendResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsBackend: Send + Sync {
    async fn create_post_stats(&self, post_uid: &str) -> BackendResult<()>;
    async fn get_post_stats(&self, post_uid: &str) -> BackendResult<PostStats>;
    async fn delete_post_stats(&self, post_uid: &str) -> BackendResult<()>;
    async fn increase_views(&self, post_uid: &str) -> BackendResult<()>;
    async fn like_post(&self, post_uid: &str, user_uid: &str) -> BackendResult<VoteResult>;
    async fn dislike_post(&self, post_uid: &str, user_uid: &str) -> BackendResult<VoteResult>;
}

/// Identity backend. Calls that carry the service credential go through [`CredentialCache`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn get_user_by_access_token(&self, token: &str) -> BackendResult<UserInfo>;
    async fn get_user_info(&self, uid: &str) -> BackendResult<UserInfo>;
    async fn create_user(&self, input: &CreateUserInput) -> BackendResult<CreatedUser>;
    async fn create_access_token(&self, credentials: &Credentials) -> BackendResult<AccessToken>;
    async fn create_refresh_token(&self, credentials: &Credentials)
        -> BackendResult<RefreshToken>;
    async fn refresh_access_token(&self, refresh_token: &str) -> BackendResult<TokenPair>;
    async fn create_app(&self, input: &NewApp) -> BackendResult<App>;
    async fn get_app_info(&self, app_uid: &str) -> BackendResult<AppInfo>;
    async fn create_oauth_code(&self, request: &OAuthCodeRequest) -> BackendResult<OAuthCode>;
    async fn exchange_oauth_code(&self, exchange: &CodeExchange) -> BackendResult<AccessToken>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryBackend: Send + Sync {
    async fn get_category_info(&self, uid: &str) -> BackendResult<Category>;
    async fn list_categories(&self, page: u32, size: u32) -> BackendResult<Vec<Category>>;
    async fn create_category(&self, input: &NewCategory) -> BackendResult<Category>;
    async fn create_report(&self, input: &NewReport) -> BackendResult<Report>;
    async fn list_reports(
        &self,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Report>>;
    async fn delete_report(&self, uid: &str) -> BackendResult<()>;
}

/// Handles to every backend, shared by handlers and cascade workers
#[derive(Clone)]
pub struct Backends {
    pub content: Arc<dyn ContentBackend>,
    pub comments: Arc<dyn CommentBackend>,
    pub stats: Arc<dyn StatsBackend>,
    pub identity: Arc<dyn IdentityBackend>,
    pub categories: Arc<dyn CategoryBackend>,
}

impl Backends {
    /// Build HTTP clients for every configured backend
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = http::build_client(config.request_timeout())?;
        let urls = &config.backends;
        let credential = CredentialCache::new(
            config.service_credential.app_id.clone(),
            config.service_credential.app_secret.clone(),
        );

        Ok(Self {
            content: Arc::new(ContentClient::new(&urls.content_url, client.clone())),
            comments: Arc::new(CommentClient::new(&urls.comment_url, client.clone())),
            stats: Arc::new(StatsClient::new(&urls.stats_url, client.clone())),
            identity: Arc::new(IdentityClient::new(
                &urls.identity_url,
                client.clone(),
                credential,
            )),
            categories: Arc::new(CategoryClient::new(&urls.category_url, client)),
        })
    }
}

/// Mock for every backend, with no expectations set
#[cfg(test)]
pub(crate) struct MockBackends {
    pub content: MockContentBackend,
    pub comments: MockCommentBackend,
    pub stats: MockStatsBackend,
    pub identity: MockIdentityBackend,
    pub categories: MockCategoryBackend,
}

#[cfg(test)]
impl MockBackends {
    pub fn new() -> Self {
        Self {
            content: MockContentBackend::new(),
            comments: MockCommentBackend::new(),
            stats: MockStatsBackend::new(),
            identity: MockIdentityBackend::new(),
            categories: MockCategoryBackend::new(),
        }
    }

    pub fn into_backends(self) -> Backends {
        Backends {
            content: Arc::new(self.content),
            comments: Arc::new(self.comments),
            stats: Arc::new(self.stats),
            identity: Arc::new(self.identity),
            categories: Arc::new(self.categories),
        }
    }
}
