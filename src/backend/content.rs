//! Content (posts) backend client

use super::http::HttpBackend;
use super::ContentBackend;
use crate::domain::{NewPost, Post, PostOwner, UpdatePostInput};
use crate::error::BackendResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub struct ContentClient {
    http: HttpBackend,
}

impl ContentClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            http: HttpBackend::new("content", base_url, client),
        }
    }
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

#[async_trait]
impl ContentBackend for ContentClient {
    async fn create_post(&self, input: &NewPost) -> BackendResult<Post> {
        self.http.send_json(self.http.post("/posts").json(input)).await
    }

    async fn get_post(&self, uid: &str) -> BackendResult<Post> {
        self.http
            .send_json(self.http.get(&format!("/posts/{}", uid)))
            .await
    }

    async fn list_posts(&self, page: u32, size: u32) -> BackendResult<Vec<Post>> {
        let request = self
            .http
            .get("/posts")
            .query(&[("page", page), ("size", size)]);
        self.http.send_json(request).await
    }

    async fn list_posts_by_category(
        &self,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Post>> {
        let request = self
            .http
            .get(&format!("/categories/{}/posts", category_uid))
            .query(&[("page", page), ("size", size)]);
        self.http.send_json(request).await
    }

    async fn get_post_owner(&self, uid: &str) -> BackendResult<PostOwner> {
        self.http
            .send_json(self.http.get(&format!("/posts/{}/owner", uid)))
            .await
    }

    async fn update_post(&self, uid: &str, input: &UpdatePostInput) -> BackendResult<()> {
        self.http
            .send_empty(self.http.patch(&format!("/posts/{}", uid)).json(input))
            .await
    }

    async fn delete_post(&self, uid: &str) -> BackendResult<()> {
        self.http
            .send_empty(self.http.delete(&format!("/posts/{}", uid)))
            .await
    }

    async fn check_post_exists(&self, uid: &str) -> BackendResult<bool> {
        let response: ExistsResponse = self
            .http
            .send_json(self.http.get(&format!("/posts/{}/exists", uid)))
            .await?;
        Ok(response.exists)
    }
}
