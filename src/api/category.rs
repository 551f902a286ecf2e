//! Category and moderation API handlers

use crate::api::{JsonBody, PageResponse, Pagination};
use crate::domain::CreateCategoryInput;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/categories/",
    tag = "Categories",
    responses((status = 200, description = "Success"))
)]
pub async fn list(
    State(state): State<AppState>,
    pagination: Pagination,
) -> Result<impl IntoResponse> {
    let categories = state
        .category_service
        .list(pagination.page, pagination.size)
        .await?;
    Ok(Json(PageResponse::new(categories, pagination)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{category_uid}/info",
    tag = "Categories",
    responses(
        (status = 200, description = "Success", body = crate::domain::Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(category_uid): Path<String>,
) -> Result<impl IntoResponse> {
    let category = state.category_service.get(&category_uid).await?;
    Ok(Json(category))
}

/// Create a category administered by the caller
#[utoipa::path(
    post,
    path = "/api/categories/",
    tag = "Categories",
    request_body = CreateCategoryInput,
    responses((status = 201, description = "Created", body = crate::domain::Category))
)]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<CreateCategoryInput>,
) -> Result<impl IntoResponse> {
    let category = state.category_service.create(&auth.uid, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{category_uid}/reports",
    tag = "Moderation",
    responses(
        (status = 200, description = "Success"),
        (status = 401, description = "Not a category administrator")
    )
)]
pub async fn list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_uid): Path<String>,
    pagination: Pagination,
) -> Result<impl IntoResponse> {
    let reports = state
        .category_service
        .list_reports(&auth.uid, &category_uid, pagination.page, pagination.size)
        .await?;
    Ok(Json(PageResponse::new(reports, pagination)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{category_uid}/reports/{report_uid}",
    tag = "Moderation",
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not a category administrator")
    )
)]
pub async fn delete_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((category_uid, report_uid)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    state
        .category_service
        .delete_report(&auth.uid, &category_uid, &report_uid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
