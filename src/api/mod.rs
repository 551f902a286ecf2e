//! REST API handlers and shared request/response types

pub mod category;
pub mod comment;
pub mod health;
pub mod metrics;
pub mod post;
pub mod user;

use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const DEFAULT_PAGE: u32 = 0;
pub(crate) const DEFAULT_PAGE_SIZE: u32 = 10;
/// Maximum allowed page size
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters (`page`, `size`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Deserialize)]
struct RawPagination {
    page: Option<String>,
    size: Option<String>,
}

impl Pagination {
    fn parse(raw: RawPagination) -> Result<Self, AppError> {
        let page = match raw.page.as_deref() {
            None | Some("") => DEFAULT_PAGE,
            Some(value) => value
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid page '{}'", value)))?,
        };
        let size = match raw.size.as_deref() {
            None | Some("") => DEFAULT_PAGE_SIZE,
            Some(value) => match value.parse::<u32>() {
                Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
                _ => {
                    return Err(AppError::BadRequest(format!(
                        "Invalid size '{}', expected 1..={}",
                        value, MAX_PAGE_SIZE
                    )))
                }
            },
        };
        Ok(Self { page, size })
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPagination>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Self::parse(raw)
    }
}

/// JSON body extractor whose rejection is rendered as a 422 `AppError`
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
}

impl<T: Serialize> PageResponse<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            page: pagination.page,
            size: pagination.size,
        }
    }
}
