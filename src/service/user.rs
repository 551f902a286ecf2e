//! Identity orchestration: registration, login tokens and OAuth apps

use crate::backend::Backends;
use crate::domain::{
    App, AppInfo, CodeExchange, CreateAppInput, CreateUserInput, CreatedUser, Credentials, NewApp,
    OAuthCode, OAuthCodeRequest, OAuthTokenQuery, RefreshRequest, TokenPair, TokenRequest,
    TokenResponse, UserInfo,
};
use crate::error::{AppError, Result};
use validator::Validate;

/// The only OAuth grant the gateway exchanges
pub const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

pub struct UserService {
    backends: Backends,
}

impl UserService {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    pub async fn register(&self, input: CreateUserInput) -> Result<CreatedUser> {
        input.validate()?;
        Ok(self.backends.identity.create_user(&input).await?)
    }

    pub async fn get(&self, uid: &str) -> Result<UserInfo> {
        Ok(self.backends.identity.get_user_info(uid).await?)
    }

    /// Password login; a refresh token is issued too when asked for
    pub async fn login(&self, request: TokenRequest) -> Result<TokenResponse> {
        let credentials = Credentials {
            username: request.username,
            password: request.password,
        };
        let access = self
            .backends
            .identity
            .create_access_token(&credentials)
            .await?;

        let refresh_token = if request.refresh {
            let refresh = self
                .backends
                .identity
                .create_refresh_token(&credentials)
                .await?;
            Some(refresh.token)
        } else {
            None
        };

        Ok(TokenResponse {
            uid: access.uid,
            access_token: access.token,
            refresh_token,
        })
    }

    pub async fn refresh(&self, request: RefreshRequest) -> Result<TokenPair> {
        Ok(self
            .backends
            .identity
            .refresh_access_token(&request.token)
            .await?)
    }

    pub async fn create_app(&self, actor_uid: &str, input: CreateAppInput) -> Result<App> {
        input.validate()?;
        let app = self
            .backends
            .identity
            .create_app(&NewApp {
                name: input.name,
                owner: actor_uid.to_string(),
            })
            .await?;
        Ok(app)
    }

    pub async fn app_info(&self, app_uid: &str) -> Result<AppInfo> {
        Ok(self.backends.identity.get_app_info(app_uid).await?)
    }

    pub async fn authorize_app(&self, request: OAuthCodeRequest) -> Result<OAuthCode> {
        Ok(self.backends.identity.create_oauth_code(&request).await?)
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, query: OAuthTokenQuery) -> Result<TokenResponse> {
        if query.grant_type != AUTHORIZATION_CODE_GRANT {
            return Err(AppError::NotAcceptable(format!(
                "Unsupported grant_type '{}'",
                query.grant_type
            )));
        }

        let access = self
            .backends
            .identity
            .exchange_oauth_code(&CodeExchange {
                code: query.code,
                app_uid: query.client_id,
                app_secret: query.client_secret,
            })
            .await?;

        Ok(TokenResponse {
            uid: access.uid,
            access_token: access.token,
            refresh_token: None,
        })
    }
}
