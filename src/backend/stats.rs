//! Statistics backend client

use super::http::HttpBackend;
use super::StatsBackend;
use crate::domain::{PostStats, VoteResult};
use crate::error::BackendResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

pub struct StatsClient {
    http: HttpBackend,
}

impl StatsClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            http: HttpBackend::new("stats", base_url, client),
        }
    }
}

#[derive(Serialize)]
struct VoteRequest<'a> {
    user_uid: &'a str,
}

#[async_trait]
impl StatsBackend for StatsClient {
    async fn create_post_stats(&self, post_uid: &str) -> BackendResult<()> {
        self.http
            .send_empty(self.http.post(&format!("/stats/{}", post_uid)))
            .await
    }

    async fn get_post_stats(&self, post_uid: &str) -> BackendResult<PostStats> {
        self.http
            .send_json(self.http.get(&format!("/stats/{}", post_uid)))
            .await
    }

    async fn delete_post_stats(&self, post_uid: &str) -> BackendResult<()> {
        self.http
            .send_empty(self.http.delete(&format!("/stats/{}", post_uid)))
            .await
    }

    async fn increase_views(&self, post_uid: &str) -> BackendResult<()> {
        self.http
            .send_empty(self.http.post(&format!("/stats/{}/views", post_uid)))
            .await
    }

    async fn like_post(&self, post_uid: &str, user_uid: &str) -> BackendResult<VoteResult> {
        let request = self
            .http
            .post(&format!("/stats/{}/like", post_uid))
            .json(&VoteRequest { user_uid });
        self.http.send_json(request).await
    }

    async fn dislike_post(&self, post_uid: &str, user_uid: &str) -> BackendResult<VoteResult> {
        let request = self
            .http
            .post(&format!("/stats/{}/dislike", post_uid))
            .json(&VoteRequest { user_uid });
        self.http.send_json(request).await
    }
}
