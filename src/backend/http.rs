//! Shared HTTP plumbing for the backend clients

use crate::error::{BackendError, BackendResult};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Build the HTTP client shared by every backend; `timeout` is the per-call deadline
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
}

/// One backend base URL plus the shared client
#[derive(Debug, Clone)]
pub struct HttpBackend {
    name: &'static str,
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(name: &'static str, base_url: impl Into<String>, client: Client) -> Self {
        Self {
            name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// Send a request and decode a JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            BackendError::Other(format!("{}: failed to decode response: {}", self.name, e))
        })
    }

    /// Send a request and discard the body
    pub async fn send_empty(&self, request: RequestBuilder) -> BackendResult<()> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| classify_transport(self.name, &e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = format!("{}: {}", self.name, error_message(status, &body));
        tracing::debug!(backend = self.name, %status, "Backend call failed");
        Err(classify_status(status, message))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    if body.trim().is_empty() {
        status.to_string()
    } else {
        body.trim().to_string()
    }
}

/// Map a non-success status to its failure classification
pub fn classify_status(status: StatusCode, message: String) -> BackendError {
    match status {
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            BackendError::InvalidArgument(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthenticated(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            BackendError::Unavailable(message)
        }
        _ => BackendError::Other(message),
    }
}

/// Connection failures and deadlines count as unavailability
fn classify_transport(name: &str, err: &reqwest::Error) -> BackendError {
    if err.is_timeout() || err.is_connect() {
        BackendError::Unavailable(format!("{}: {}", name, err))
    } else {
        BackendError::Other(format!("{}: {}", name, err))
    }
}
