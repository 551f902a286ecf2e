//! Service credential cache for calls into the identity backend.
//!
//! The token is issued lazily on first use and refreshed only after a call is
//! rejected as unauthenticated. Refreshes are serialized; a caller holding a token
//! that was already replaced reuses the replacement instead of issuing again.

use crate::error::BackendResult;
use async_trait::async_trait;
use std::future::Future;
use tokio::sync::{Mutex, RwLock};

/// Issues service credentials from a fixed id/secret pair
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue_service_token(&self, app_id: &str, app_secret: &str) -> BackendResult<String>;
}

pub struct CredentialCache {
    app_id: String,
    app_secret: String,
    token: RwLock<Option<String>>,
    refresh_lock: Mutex<()>,
}

impl CredentialCache {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            token: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Cache pre-seeded with a token
    pub fn with_token(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let cache = Self::new(app_id, app_secret);
        Self {
            token: RwLock::new(Some(token.into())),
            ..cache
        }
    }

    /// Currently cached token, if any
    pub async fn cached(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Return the cached token, issuing one if none is held yet
    pub async fn token(&self, issuer: &dyn TokenIssuer) -> BackendResult<String> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.cached().await {
            return Ok(token);
        }
        self.issue(issuer).await
    }

    /// Replace `stale` with a fresh token.
    ///
    /// If another caller already replaced `stale`, its token is returned without
    /// contacting the issuer.
    pub async fn refresh(&self, issuer: &dyn TokenIssuer, stale: &str) -> BackendResult<String> {
        let _guard = self.refresh_lock.lock().await;
        if let Some(current) = self.cached().await {
            if current != stale {
                return Ok(current);
            }
        }
        self.issue(issuer).await
    }

    /// Run `call` with the service token; on an unauthenticated failure refresh once and
    /// replay the call exactly once. The replay's result is returned as is.
    pub async fn with_refresh<T, F, Fut>(&self, issuer: &dyn TokenIssuer, call: F) -> BackendResult<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = BackendResult<T>>,
    {
        let token = self.token(issuer).await?;
        match call(token.clone()).await {
            Err(e) if e.is_unauthenticated() => {
                tracing::info!(error = %e, "Service credential rejected, refreshing");
                let fresh = self.refresh(issuer, &token).await?;
                call(fresh).await
            }
            result => result,
        }
    }

    async fn issue(&self, issuer: &dyn TokenIssuer) -> BackendResult<String> {
        match issuer
            .issue_service_token(&self.app_id, &self.app_secret)
            .await
        {
            Ok(token) => {
                *self.token.write().await = Some(token.clone());
                metrics::counter!("gateway_credential_refresh_total", "outcome" => "success")
                    .increment(1);
                tracing::info!(app_id = %self.app_id, "Issued service credential");
                Ok(token)
            }
            Err(e) => {
                metrics::counter!("gateway_credential_refresh_total", "outcome" => "error")
                    .increment(1);
                tracing::warn!(app_id = %self.app_id, error = %e, "Service credential issuance failed");
                Err(e)
            }
        }
    }
}
