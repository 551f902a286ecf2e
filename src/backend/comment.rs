//! Comment backend client

use super::http::HttpBackend;
use super::CommentBackend;
use crate::domain::{Comment, CommentOwner, NewComment, UpdateCommentInput};
use crate::error::BackendResult;
use async_trait::async_trait;
use reqwest::Client;

pub struct CommentClient {
    http: HttpBackend,
}

impl CommentClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            http: HttpBackend::new("comments", base_url, client),
        }
    }
}

#[async_trait]
impl CommentBackend for CommentClient {
    async fn create_comment(&self, input: &NewComment) -> BackendResult<Comment> {
        let request = self
            .http
            .post(&format!("/posts/{}/comments", input.post_uid))
            .json(input);
        self.http.send_json(request).await
    }

    async fn get_comment(&self, uid: &str) -> BackendResult<Comment> {
        self.http
            .send_json(self.http.get(&format!("/comments/{}", uid)))
            .await
    }

    async fn list_comments(
        &self,
        post_uid: &str,
        parent_uid: Option<String>,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Comment>> {
        let mut request = self
            .http
            .get(&format!("/posts/{}/comments", post_uid))
            .query(&[("page", page), ("size", size)]);
        if let Some(parent_uid) = parent_uid {
            request = request.query(&[("parent_uid", parent_uid)]);
        }
        self.http.send_json(request).await
    }

    async fn get_comment_owner(&self, uid: &str) -> BackendResult<CommentOwner> {
        self.http
            .send_json(self.http.get(&format!("/comments/{}/owner", uid)))
            .await
    }

    async fn update_comment(&self, uid: &str, input: &UpdateCommentInput) -> BackendResult<()> {
        self.http
            .send_empty(self.http.patch(&format!("/comments/{}", uid)).json(input))
            .await
    }

    async fn delete_comment(&self, uid: &str) -> BackendResult<()> {
        self.http
            .send_empty(self.http.delete(&format!("/comments/{}", uid)))
            .await
    }

    async fn remove_content(&self, uid: &str) -> BackendResult<()> {
        self.http
            .send_empty(self.http.post(&format!("/comments/{}/remove-content", uid)))
            .await
    }
}
