//! Categorization and moderation backend client

use super::http::HttpBackend;
use super::CategoryBackend;
use crate::domain::{Category, NewCategory, NewReport, Report};
use crate::error::BackendResult;
use async_trait::async_trait;
use reqwest::Client;

pub struct CategoryClient {
    http: HttpBackend,
}

impl CategoryClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            http: HttpBackend::new("categories", base_url, client),
        }
    }
}

#[async_trait]
impl CategoryBackend for CategoryClient {
    async fn get_category_info(&self, uid: &str) -> BackendResult<Category> {
        self.http
            .send_json(self.http.get(&format!("/categories/{}", uid)))
            .await
    }

    async fn list_categories(&self, page: u32, size: u32) -> BackendResult<Vec<Category>> {
        let request = self
            .http
            .get("/categories")
            .query(&[("page", page), ("size", size)]);
        self.http.send_json(request).await
    }

    async fn create_category(&self, input: &NewCategory) -> BackendResult<Category> {
        self.http
            .send_json(self.http.post("/categories").json(input))
            .await
    }

    async fn create_report(&self, input: &NewReport) -> BackendResult<Report> {
        let request = self
            .http
            .post(&format!("/categories/{}/reports", input.category_uid))
            .json(input);
        self.http.send_json(request).await
    }

    async fn list_reports(
        &self,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> BackendResult<Vec<Report>> {
        let request = self
            .http
            .get(&format!("/categories/{}/reports", category_uid))
            .query(&[("page", page), ("size", size)]);
        self.http.send_json(request).await
    }

    async fn delete_report(&self, uid: &str) -> BackendResult<()> {
        self.http
            .send_empty(self.http.delete(&format!("/reports/{}", uid)))
            .await
    }
}
