//! Configuration management for the gateway

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Inbound request timeout, also used as the deadline of every outbound backend call
    pub request_timeout_secs: u64,
    /// Backend service addresses
    pub backends: BackendsConfig,
    /// Credential the gateway presents to the identity backend
    pub service_credential: ServiceCredentialConfig,
    /// Cascading-delete queue configuration
    pub cascade: CascadeConfig,
    /// Logging and metrics configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct BackendsConfig {
    pub content_url: String,
    pub comment_url: String,
    pub stats_url: String,
    pub identity_url: String,
    pub category_url: String,
}

#[derive(Debug, Clone)]
pub struct ServiceCredentialConfig {
    pub app_id: String,
    pub app_secret: String,
}

#[derive(Debug, Clone)]
pub struct CascadeConfig {
    /// Maximum number of in-flight items per queue
    pub queue_capacity: usize,
    /// Fixed delay before an unavailable backend is retried
    pub retry_backoff_ms: u64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            retry_backoff_ms: 5000,
        }
    }
}

impl CascadeConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "plain" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "plain".to_string(),
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS")?,
            backends: BackendsConfig {
                content_url: env::var("CONTENT_BACKEND_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
                comment_url: env::var("COMMENT_BACKEND_URL")
                    .unwrap_or_else(|_| "http://localhost:8082".to_string()),
                stats_url: env::var("STATS_BACKEND_URL")
                    .unwrap_or_else(|_| "http://localhost:8083".to_string()),
                identity_url: env::var("IDENTITY_BACKEND_URL")
                    .unwrap_or_else(|_| "http://localhost:8084".to_string()),
                category_url: env::var("CATEGORY_BACKEND_URL")
                    .unwrap_or_else(|_| "http://localhost:8085".to_string()),
            },
            service_credential: ServiceCredentialConfig {
                app_id: env::var("IDENTITY_APP_ID").unwrap_or_else(|_| "UserAPI".to_string()),
                app_secret: env::var("IDENTITY_APP_SECRET")
                    .context("IDENTITY_APP_SECRET is required")?,
            },
            cascade: CascadeConfig {
                queue_capacity: env::var("CASCADE_QUEUE_CAPACITY")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()
                    .context("Invalid CASCADE_QUEUE_CAPACITY")?,
                retry_backoff_ms: env::var("CASCADE_RETRY_BACKOFF_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .context("Invalid CASCADE_RETRY_BACKOFF_MS")?,
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "plain".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|s| s.to_lowercase() != "false")
                    .unwrap_or(true),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
