//! Identity backend client

use super::credential::{CredentialCache, TokenIssuer};
use super::http::HttpBackend;
use super::IdentityBackend;
use crate::domain::{
    AccessToken, App, AppInfo, CodeExchange, CreateUserInput, CreatedUser, Credentials, NewApp,
    OAuthCode, OAuthCodeRequest, RefreshToken, ServiceToken, TokenPair, UserInfo,
};
use crate::error::BackendResult;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Header carrying an end-user access token to the identity backend
pub const USER_TOKEN_HEADER: &str = "X-User-Token";

pub struct IdentityClient {
    http: HttpBackend,
    credential: CredentialCache,
}

#[derive(Serialize)]
struct ServiceTokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    token: &'a str,
}

impl IdentityClient {
    pub fn new(base_url: &str, client: Client, credential: CredentialCache) -> Self {
        Self {
            http: HttpBackend::new("identity", base_url, client),
            credential,
        }
    }

    pub fn credential(&self) -> &CredentialCache {
        &self.credential
    }

    /// Send a request carrying the service credential, refreshing it once if rejected
    async fn authorized<T, B>(&self, build: B) -> BackendResult<T>
    where
        T: DeserializeOwned,
        B: Fn() -> RequestBuilder,
    {
        self.credential
            .with_refresh(self, |token| {
                let request = build().bearer_auth(token);
                async move { self.http.send_json(request).await }
            })
            .await
    }
}

#[async_trait]
impl TokenIssuer for IdentityClient {
    async fn issue_service_token(&self, app_id: &str, app_secret: &str) -> BackendResult<String> {
        let request = self
            .http
            .post("/service-token")
            .json(&ServiceTokenRequest { app_id, app_secret });
        let issued: ServiceToken = self.http.send_json(request).await?;
        Ok(issued.token)
    }
}

#[async_trait]
impl IdentityBackend for IdentityClient {
    async fn get_user_by_access_token(&self, token: &str) -> BackendResult<UserInfo> {
        self.authorized(|| {
            self.http
                .get("/users/by-token")
                .header(USER_TOKEN_HEADER, token)
        })
        .await
    }

    async fn get_user_info(&self, uid: &str) -> BackendResult<UserInfo> {
        self.http
            .send_json(self.http.get(&format!("/users/{}", uid)))
            .await
    }

    async fn create_user(&self, input: &CreateUserInput) -> BackendResult<CreatedUser> {
        self.authorized(|| self.http.post("/users").json(input)).await
    }

    async fn create_access_token(&self, credentials: &Credentials) -> BackendResult<AccessToken> {
        self.authorized(|| self.http.post("/tokens/access").json(credentials))
            .await
    }

    async fn create_refresh_token(
        &self,
        credentials: &Credentials,
    ) -> BackendResult<RefreshToken> {
        self.authorized(|| self.http.post("/tokens/refresh-token").json(credentials))
            .await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> BackendResult<TokenPair> {
        self.authorized(|| {
            self.http.post("/tokens/refresh").json(&RefreshTokenRequest {
                token: refresh_token,
            })
        })
        .await
    }

    async fn create_app(&self, input: &NewApp) -> BackendResult<App> {
        self.authorized(|| self.http.post("/apps").json(input)).await
    }

    async fn get_app_info(&self, app_uid: &str) -> BackendResult<AppInfo> {
        self.http
            .send_json(self.http.get(&format!("/apps/{}", app_uid)))
            .await
    }

    async fn create_oauth_code(&self, request: &OAuthCodeRequest) -> BackendResult<OAuthCode> {
        self.authorized(|| self.http.post("/oauth/code").json(request))
            .await
    }

    async fn exchange_oauth_code(&self, exchange: &CodeExchange) -> BackendResult<AccessToken> {
        self.authorized(|| self.http.post("/oauth/token").json(exchange))
            .await
    }
}
