//! Actor resolution for mutating endpoints
//!
//! The bearer token is resolved by the identity backend; the gateway never
//! inspects it.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::error::{AppError, BackendError};
use crate::state::AppState;

/// Authenticated actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub username: String,
}

/// Extract the Bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Forbidden("Missing authorization token".to_string()))?
        .to_str()
        .map_err(|_| AppError::Forbidden("Invalid authorization header".to_string()))?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::Forbidden(
            "Authorization header must use Bearer scheme".to_string(),
        )),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        match state.backends.identity.get_user_by_access_token(token).await {
            Ok(user) => Ok(AuthUser {
                uid: user.uid,
                username: user.username,
            }),
            Err(BackendError::NotFound(_)) => {
                Err(AppError::Forbidden("Token does not resolve to a user".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
