//! Common test utilities
//!
//! `FakeForum` is an in-memory stand-in for all five backends. It records
//! every call so tests can assert which lookups a request performed.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use forum_gateway::backend::{
    Backends, CategoryBackend, CommentBackend, ContentBackend, IdentityBackend, StatsBackend,
};
use forum_gateway::config::{
    BackendsConfig, CascadeConfig, Config, ServiceCredentialConfig, TelemetryConfig,
};
use forum_gateway::domain::{
    AccessToken, App, AppInfo, Category, CodeExchange, Comment, CommentOwner, CreateUserInput,
    CreatedUser, Credentials, NewApp, NewCategory, NewComment, NewPost, NewReport, OAuthCode,
    OAuthCodeRequest, Post, PostOwner, PostStats, RefreshToken, Report, TokenPair,
    UpdateCommentInput, UpdatePostInput, UserInfo, VoteResult,
};
use forum_gateway::error::{BackendError, BackendResult};
use forum_gateway::server::{build_router, AppState};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const ADMIN_TOKEN: &str = "admin-token";

pub fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        request_timeout_secs: 5,
        backends: BackendsConfig {
            content_url: "http://content.test".to_string(),
            comment_url: "http://comment.test".to_string(),
            stats_url: "http://stats.test".to_string(),
            identity_url: "http://identity.test".to_string(),
            category_url: "http://category.test".to_string(),
        },
        service_credential: ServiceCredentialConfig {
            app_id: "UserAPI".to_string(),
            app_secret: "test-secret".to_string(),
        },
        cascade: CascadeConfig {
            queue_capacity: 16,
            retry_backoff_ms: 50,
        },
        telemetry: TelemetryConfig {
            log_format: "plain".to_string(),
            metrics_enabled: false,
        },
    }
}

#[derive(Default)]
struct ForumData {
    users: HashMap<String, UserInfo>,
    tokens: HashMap<String, String>,
    categories: HashMap<String, Category>,
    posts: Vec<Post>,
    stats: HashMap<String, PostStats>,
    comments: Vec<Comment>,
    reports: Vec<Report>,
}

/// In-memory implementation of every backend
pub struct FakeForum {
    data: Mutex<ForumData>,
    calls: Mutex<Vec<String>>,
    stats_down: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeForum {
    /// Seed users alice, bob and a global admin, plus category `c1`
    /// administered by bob
    pub fn seeded() -> Arc<Self> {
        let forum = Arc::new(Self {
            data: Mutex::new(ForumData::default()),
            calls: Mutex::new(Vec::new()),
            stats_down: AtomicBool::new(false),
            next_id: AtomicUsize::new(1),
        });
        forum.add_user("alice", ALICE_TOKEN, false);
        forum.add_user("bob", BOB_TOKEN, false);
        forum.add_user("admin", ADMIN_TOKEN, true);
        forum.add_category("c1", "bob");
        forum
    }

    pub fn add_user(&self, uid: &str, token: &str, is_admin: bool) {
        let mut data = self.data.lock().unwrap();
        data.users.insert(
            uid.to_string(),
            UserInfo {
                uid: uid.to_string(),
                username: uid.to_string(),
                is_admin,
            },
        );
        data.tokens.insert(token.to_string(), uid.to_string());
    }

    pub fn add_category(&self, uid: &str, admin_uid: &str) {
        self.data.lock().unwrap().categories.insert(
            uid.to_string(),
            Category {
                uid: uid.to_string(),
                user_uid: admin_uid.to_string(),
                name: format!("category {}", uid),
                description: String::new(),
            },
        );
    }

    pub fn add_post(&self, uid: &str, owner_uid: &str, category_uid: &str) {
        let now = Utc::now();
        let mut data = self.data.lock().unwrap();
        data.posts.push(Post {
            uid: uid.to_string(),
            user_uid: owner_uid.to_string(),
            category_uid: category_uid.to_string(),
            title: format!("post {}", uid),
            url: String::new(),
            created_at: now,
            modified_at: now,
        });
        data.stats.insert(
            uid.to_string(),
            PostStats {
                num_likes: 3,
                num_dislikes: 1,
                num_views: 10,
            },
        );
    }

    pub fn add_comment(&self, uid: &str, owner_uid: &str, post_uid: &str) {
        let now = Utc::now();
        self.data.lock().unwrap().comments.push(Comment {
            uid: uid.to_string(),
            user_uid: owner_uid.to_string(),
            post_uid: post_uid.to_string(),
            body: format!("comment {}", uid),
            parent_uid: None,
            created_at: now,
            modified_at: now,
            is_deleted: false,
        });
    }

    pub fn set_stats_down(&self, down: bool) {
        self.stats_down.store(down, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn has_post(&self, uid: &str) -> bool {
        self.data.lock().unwrap().posts.iter().any(|p| p.uid == uid)
    }

    pub fn post_count(&self) -> usize {
        self.data.lock().unwrap().posts.len()
    }

    pub fn backends(self: &Arc<Self>) -> Backends {
        Backends {
            content: self.clone(),
            comments: self.clone(),
            stats: self.clone(),
            identity: self.clone(),
            categories: self.clone(),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn next_uid(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn stats_available(&self) -> BackendResult<()> {
        if self.stats_down.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("stats backend is down".to_string()))
        } else {
            Ok(())
        }
    }

    fn page<T: Clone>(items: Vec<T>, page: u32, size: u32) -> Vec<T> {
        items
            .into_iter()
            .skip((page * size) as usize)
            .take(size as usize)
            .collect()
    }
}

fn not_found(what: &str, uid: &str) -> BackendError {
    BackendError::NotFound(format!("{} {} not found", what, uid))
}

#[async_trait]
impl ContentBackend for FakeForum {
    async fn create_post(&self, input: &NewPost) -> BackendResult<Post> {
        self.record("content.create_post");
        let now = Utc::now();
        let post = Post {
            uid: self.next_uid("post"),
            user_uid: input.user_uid.clone(),
            category_uid: input.category_uid.clone(),
            title: input.title.clone(),
            url: input.url.clone(),
            created_at: now,
            modified_at: now,
        };
        self.data.lock().unwrap().posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, uid: &str) -> BackendResult<Post> {
        self.record(format!("content.get_post {}", uid));
        let data = self.data.lock().unwrap();
        data.posts
            .iter()
            .find(|p| p.uid == uid)
            .cloned()
            .ok_or_else(|| not_found("post", uid))
    }

    async fn list_posts(&self, page: u32, size: u32) -> BackendResult<Vec<Post>> {
        self.record("content.list_posts");
        let posts = self.data.lock().unwrap().posts.clone();
        Ok(Self::page(posts, page, size))
    }

    async fn list_posts_by_category(
        &self,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Post>> {
        self.record(format!("content.list_posts_by_category {}", category_uid));
        let posts: Vec<Post> = self
            .data
            .lock()
            .unwrap()
            .posts
            .iter()
            .filter(|p| p.category_uid == category_uid)
            .cloned()
            .collect();
        Ok(Self::page(posts, page, size))
    }

    async fn get_post_owner(&self, uid: &str) -> BackendResult<PostOwner> {
        self.record(format!("content.get_post_owner {}", uid));
        let data = self.data.lock().unwrap();
        data.posts
            .iter()
            .find(|p| p.uid == uid)
            .map(|p| PostOwner {
                owner_uid: p.user_uid.clone(),
                category_uid: p.category_uid.clone(),
            })
            .ok_or_else(|| not_found("post", uid))
    }

    async fn update_post(&self, uid: &str, input: &UpdatePostInput) -> BackendResult<()> {
        self.record(format!("content.update_post {}", uid));
        let mut data = self.data.lock().unwrap();
        let post = data
            .posts
            .iter_mut()
            .find(|p| p.uid == uid)
            .ok_or_else(|| not_found("post", uid))?;
        post.title = input.title.clone();
        post.url = input.url.clone();
        post.modified_at = Utc::now();
        Ok(())
    }

    async fn delete_post(&self, uid: &str) -> BackendResult<()> {
        self.record(format!("content.delete_post {}", uid));
        let mut data = self.data.lock().unwrap();
        let before = data.posts.len();
        data.posts.retain(|p| p.uid != uid);
        if data.posts.len() == before {
            return Err(not_found("post", uid));
        }
        Ok(())
    }

    async fn check_post_exists(&self, uid: &str) -> BackendResult<bool> {
        self.record(format!("content.check_post_exists {}", uid));
        Ok(self.has_post(uid))
    }
}

#[async_trait]
impl CommentBackend for FakeForum {
    async fn create_comment(&self, input: &NewComment) -> BackendResult<Comment> {
        self.record("comments.create_comment");
        let now = Utc::now();
        let comment = Comment {
            uid: self.next_uid("comment"),
            user_uid: input.user_uid.clone(),
            post_uid: input.post_uid.clone(),
            body: input.body.clone(),
            parent_uid: input.parent_uid.clone(),
            created_at: now,
            modified_at: now,
            is_deleted: false,
        };
        self.data.lock().unwrap().comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, uid: &str) -> BackendResult<Comment> {
        self.record(format!("comments.get_comment {}", uid));
        let data = self.data.lock().unwrap();
        data.comments
            .iter()
            .find(|c| c.uid == uid)
            .cloned()
            .ok_or_else(|| not_found("comment", uid))
    }

    async fn list_comments(
        &self,
        post_uid: &str,
        parent_uid: Option<String>,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Comment>> {
        self.record(format!("comments.list_comments {} page={}", post_uid, page));
        let comments: Vec<Comment> = self
            .data
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| c.post_uid == post_uid)
            .filter(|c| parent_uid.is_none() || c.parent_uid == parent_uid)
            .cloned()
            .collect();
        Ok(Self::page(comments, page, size))
    }

    async fn get_comment_owner(&self, uid: &str) -> BackendResult<CommentOwner> {
        self.record(format!("comments.get_comment_owner {}", uid));
        let data = self.data.lock().unwrap();
        data.comments
            .iter()
            .find(|c| c.uid == uid)
            .map(|c| CommentOwner {
                owner_uid: c.user_uid.clone(),
                post_uid: c.post_uid.clone(),
            })
            .ok_or_else(|| not_found("comment", uid))
    }

    async fn update_comment(&self, uid: &str, input: &UpdateCommentInput) -> BackendResult<()> {
        self.record(format!("comments.update_comment {}", uid));
        let mut data = self.data.lock().unwrap();
        let comment = data
            .comments
            .iter_mut()
            .find(|c| c.uid == uid)
            .ok_or_else(|| not_found("comment", uid))?;
        comment.body = input.body.clone();
        Ok(())
    }

    async fn delete_comment(&self, uid: &str) -> BackendResult<()> {
        self.record(format!("comments.delete_comment {}", uid));
        self.data.lock().unwrap().comments.retain(|c| c.uid != uid);
        Ok(())
    }

    async fn remove_content(&self, uid: &str) -> BackendResult<()> {
        self.record(format!("comments.remove_content {}", uid));
        let mut data = self.data.lock().unwrap();
        let comment = data
            .comments
            .iter_mut()
            .find(|c| c.uid == uid)
            .ok_or_else(|| not_found("comment", uid))?;
        comment.is_deleted = true;
        Ok(())
    }
}

#[async_trait]
impl StatsBackend for FakeForum {
    async fn create_post_stats(&self, post_uid: &str) -> BackendResult<()> {
        self.record(format!("stats.create_post_stats {}", post_uid));
        self.stats_available()?;
        self.data
            .lock()
            .unwrap()
            .stats
            .insert(post_uid.to_string(), PostStats::zero());
        Ok(())
    }

    async fn get_post_stats(&self, post_uid: &str) -> BackendResult<PostStats> {
        self.record(format!("stats.get_post_stats {}", post_uid));
        self.stats_available()?;
        let data = self.data.lock().unwrap();
        data.stats
            .get(post_uid)
            .copied()
            .ok_or_else(|| not_found("stats", post_uid))
    }

    async fn delete_post_stats(&self, post_uid: &str) -> BackendResult<()> {
        self.record(format!("stats.delete_post_stats {}", post_uid));
        self.stats_available()?;
        self.data.lock().unwrap().stats.remove(post_uid);
        Ok(())
    }

    async fn increase_views(&self, post_uid: &str) -> BackendResult<()> {
        self.record(format!("stats.increase_views {}", post_uid));
        self.stats_available()?;
        if let Some(stats) = self.data.lock().unwrap().stats.get_mut(post_uid) {
            stats.num_views += 1;
        }
        Ok(())
    }

    async fn like_post(&self, post_uid: &str, user_uid: &str) -> BackendResult<VoteResult> {
        self.record(format!("stats.like_post {} {}", post_uid, user_uid));
        self.stats_available()?;
        Ok(VoteResult {
            success: true,
            first_time: true,
        })
    }

    async fn dislike_post(&self, post_uid: &str, user_uid: &str) -> BackendResult<VoteResult> {
        self.record(format!("stats.dislike_post {} {}", post_uid, user_uid));
        self.stats_available()?;
        Ok(VoteResult {
            success: true,
            first_time: true,
        })
    }
}

#[async_trait]
impl IdentityBackend for FakeForum {
    async fn get_user_by_access_token(&self, token: &str) -> BackendResult<UserInfo> {
        self.record("identity.get_user_by_access_token");
        let data = self.data.lock().unwrap();
        data.tokens
            .get(token)
            .and_then(|uid| data.users.get(uid))
            .cloned()
            .ok_or_else(|| not_found("token", "<redacted>"))
    }

    async fn get_user_info(&self, uid: &str) -> BackendResult<UserInfo> {
        self.record(format!("identity.get_user_info {}", uid));
        let data = self.data.lock().unwrap();
        data.users.get(uid).cloned().ok_or_else(|| not_found("user", uid))
    }

    async fn create_user(&self, input: &CreateUserInput) -> BackendResult<CreatedUser> {
        self.record("identity.create_user");
        let uid = self.next_uid("user");
        self.add_user(&uid, &format!("{}-token", uid), false);
        Ok(CreatedUser {
            uid,
            username: input.username.clone(),
        })
    }

    async fn create_access_token(&self, credentials: &Credentials) -> BackendResult<AccessToken> {
        self.record("identity.create_access_token");
        let data = self.data.lock().unwrap();
        data.tokens
            .iter()
            .find(|(_, uid)| **uid == credentials.username)
            .map(|(token, uid)| AccessToken {
                uid: uid.clone(),
                token: token.clone(),
            })
            .ok_or_else(|| BackendError::InvalidArgument("bad credentials".to_string()))
    }

    async fn create_refresh_token(
        &self,
        credentials: &Credentials,
    ) -> BackendResult<RefreshToken> {
        self.record("identity.create_refresh_token");
        Ok(RefreshToken {
            token: format!("refresh-{}", credentials.username),
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> BackendResult<TokenPair> {
        self.record("identity.refresh_access_token");
        Ok(TokenPair {
            access_token: format!("access-from-{}", refresh_token),
            refresh_token: refresh_token.to_string(),
        })
    }

    async fn create_app(&self, input: &NewApp) -> BackendResult<App> {
        self.record(format!("identity.create_app {}", input.owner));
        Ok(App {
            id: self.next_uid("app"),
            secret: "app-secret".to_string(),
        })
    }

    async fn get_app_info(&self, app_uid: &str) -> BackendResult<AppInfo> {
        self.record(format!("identity.get_app_info {}", app_uid));
        Ok(AppInfo {
            owner: "alice".to_string(),
            name: "demo".to_string(),
        })
    }

    async fn create_oauth_code(&self, request: &OAuthCodeRequest) -> BackendResult<OAuthCode> {
        self.record(format!("identity.create_oauth_code {}", request.app_uid));
        Ok(OAuthCode {
            code: "code-1".to_string(),
        })
    }

    async fn exchange_oauth_code(&self, exchange: &CodeExchange) -> BackendResult<AccessToken> {
        self.record(format!("identity.exchange_oauth_code {}", exchange.code));
        Ok(AccessToken {
            uid: "alice".to_string(),
            token: ALICE_TOKEN.to_string(),
        })
    }
}

#[async_trait]
impl CategoryBackend for FakeForum {
    async fn get_category_info(&self, uid: &str) -> BackendResult<Category> {
        self.record(format!("categories.get_category_info {}", uid));
        let data = self.data.lock().unwrap();
        data.categories
            .get(uid)
            .cloned()
            .ok_or_else(|| not_found("category", uid))
    }

    async fn list_categories(&self, page: u32, size: u32) -> BackendResult<Vec<Category>> {
        self.record("categories.list_categories");
        let mut categories: Vec<Category> =
            self.data.lock().unwrap().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.uid.cmp(&b.uid));
        Ok(Self::page(categories, page, size))
    }

    async fn create_category(&self, input: &NewCategory) -> BackendResult<Category> {
        self.record("categories.create_category");
        let uid = self.next_uid("category");
        let category = Category {
            uid: uid.clone(),
            user_uid: input.user_uid.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
        };
        self.data
            .lock()
            .unwrap()
            .categories
            .insert(uid, category.clone());
        Ok(category)
    }

    async fn create_report(&self, input: &NewReport) -> BackendResult<Report> {
        self.record(format!("categories.create_report {}", input.post_uid));
        let report = Report {
            uid: self.next_uid("report"),
            category_uid: input.category_uid.clone(),
            post_uid: input.post_uid.clone(),
            comment_uid: input.comment_uid.clone(),
            reason: input.reason.clone(),
            created_at: Utc::now(),
        };
        self.data.lock().unwrap().reports.push(report.clone());
        Ok(report)
    }

    async fn list_reports(
        &self,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Report>> {
        self.record(format!("categories.list_reports {}", category_uid));
        let reports: Vec<Report> = self
            .data
            .lock()
            .unwrap()
            .reports
            .iter()
            .filter(|r| r.category_uid == category_uid)
            .cloned()
            .collect();
        Ok(Self::page(reports, page, size))
    }

    async fn delete_report(&self, uid: &str) -> BackendResult<()> {
        self.record(format!("categories.delete_report {}", uid));
        self.data.lock().unwrap().reports.retain(|r| r.uid != uid);
        Ok(())
    }
}

/// Production router over the fake backends. Cascade workers are not started,
/// so enqueued work stays observable through `state.cascade`.
pub fn build_test_app(forum: &Arc<FakeForum>) -> (Router, AppState) {
    let state = AppState::new(test_config(), forum.backends(), None);
    (build_router(state.clone()), state)
}

// ============================================================================
// HTTP helpers
// ============================================================================

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Body,
    json: bool,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if json {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(body).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    serde_json::from_slice(bytes).ok()
}

pub async fn get_json<T: DeserializeOwned>(
    app: &Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Option<T>) {
    let (status, bytes) = send(app, Method::GET, uri, token, Body::empty(), false).await;
    (status, decode(&bytes))
}

pub async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, bytes) = send(app, Method::GET, uri, None, Body::empty(), false).await;
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: &B,
) -> (StatusCode, Option<T>) {
    let payload = Body::from(serde_json::to_vec(body).unwrap());
    let (status, bytes) = send(app, Method::POST, uri, token, payload, true).await;
    (status, decode(&bytes))
}

pub async fn post_raw(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    raw: &'static str,
) -> StatusCode {
    send(app, Method::POST, uri, token, Body::from(raw), true)
        .await
        .0
}

pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: &B,
) -> (StatusCode, Option<T>) {
    let payload = Body::from(serde_json::to_vec(body).unwrap());
    let (status, bytes) = send(app, Method::PATCH, uri, token, payload, true).await;
    (status, decode(&bytes))
}

pub async fn patch_empty<T: DeserializeOwned>(
    app: &Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Option<T>) {
    let (status, bytes) = send(app, Method::PATCH, uri, token, Body::empty(), false).await;
    (status, decode(&bytes))
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> StatusCode {
    send(app, Method::DELETE, uri, token, Body::empty(), false)
        .await
        .0
}
