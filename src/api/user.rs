//! User, token and OAuth API handlers

use crate::api::JsonBody;
use crate::domain::{
    CreateAppInput, CreateUserInput, OAuthCodeRequest, OAuthTokenQuery, RefreshRequest,
    TokenRequest,
};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Identity",
    request_body = CreateUserInput,
    responses((status = 201, description = "Created", body = crate::domain::CreatedUser))
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/user/{uid}",
    tag = "Identity",
    responses(
        (status = 200, description = "Success", body = crate::domain::UserInfo),
        (status = 404, description = "User not found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(uid): Path<String>) -> Result<impl IntoResponse> {
    let user = state.user_service.get(&uid).await?;
    Ok(Json(user))
}

/// Password login
#[utoipa::path(
    post,
    path = "/api/auth/token",
    tag = "Identity",
    request_body = TokenRequest,
    responses((status = 200, description = "Success", body = crate::domain::TokenResponse))
)]
pub async fn token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TokenRequest>,
) -> Result<impl IntoResponse> {
    let tokens = state.user_service.login(request).await?;
    Ok(Json(tokens))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Identity",
    request_body = RefreshRequest,
    responses((status = 200, description = "Success", body = crate::domain::TokenPair))
)]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> Result<impl IntoResponse> {
    let tokens = state.user_service.refresh(request).await?;
    Ok(Json(tokens))
}

#[utoipa::path(
    post,
    path = "/api/oauth/app",
    tag = "OAuth",
    request_body = CreateAppInput,
    responses((status = 201, description = "Created", body = crate::domain::App))
)]
pub async fn create_app(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<CreateAppInput>,
) -> Result<impl IntoResponse> {
    let app = state.user_service.create_app(&auth.uid, input).await?;
    Ok((StatusCode::CREATED, Json(app)))
}

#[utoipa::path(
    get,
    path = "/api/oauth/app/{app_uid}",
    tag = "OAuth",
    responses((status = 200, description = "Success", body = crate::domain::AppInfo))
)]
pub async fn app_info(
    State(state): State<AppState>,
    Path(app_uid): Path<String>,
) -> Result<impl IntoResponse> {
    let info = state.user_service.app_info(&app_uid).await?;
    Ok(Json(info))
}

#[utoipa::path(
    post,
    path = "/api/oauth/authorize",
    tag = "OAuth",
    request_body = OAuthCodeRequest,
    responses((status = 200, description = "Success", body = crate::domain::OAuthCode))
)]
pub async fn authorize(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<OAuthCodeRequest>,
) -> Result<impl IntoResponse> {
    let code = state.user_service.authorize_app(request).await?;
    Ok(Json(code))
}

/// Exchange an authorization code; only `grant_type=authorization_code` is accepted
#[utoipa::path(
    get,
    path = "/api/oauth/token",
    tag = "OAuth",
    responses(
        (status = 200, description = "Success", body = crate::domain::TokenResponse),
        (status = 406, description = "Unsupported grant type")
    )
)]
pub async fn oauth_token(
    State(state): State<AppState>,
    Query(query): Query<OAuthTokenQuery>,
) -> Result<impl IntoResponse> {
    let token = state.user_service.exchange_code(query).await?;
    Ok(Json(token))
}
