//! Post API handlers

use crate::api::{JsonBody, PageResponse, Pagination};
use crate::domain::{CreatePostInput, CreateReportInput, UpdatePostInput};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List posts with their statistics
#[utoipa::path(
    get,
    path = "/api/posts/",
    tag = "Posts",
    params(
        ("page" = Option<u32>, Query, description = "Page number, from 0"),
        ("size" = Option<u32>, Query, description = "Page size, 1..=100")
    ),
    responses(
        (status = 200, description = "Success"),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    pagination: Pagination,
) -> Result<impl IntoResponse> {
    let posts = state
        .post_service
        .list_with_stats(pagination.page, pagination.size)
        .await?;
    Ok(Json(PageResponse::new(posts, pagination)))
}

/// Posts of one category with their statistics
#[utoipa::path(
    get,
    path = "/api/categories/{category_uid}",
    tag = "Posts",
    params(("category_uid" = String, Path, description = "Category uid")),
    responses((status = 200, description = "Success"))
)]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_uid): Path<String>,
    pagination: Pagination,
) -> Result<impl IntoResponse> {
    let posts = state
        .post_service
        .list_category_with_stats(&category_uid, pagination.page, pagination.size)
        .await?;
    Ok(Json(PageResponse::new(posts, pagination)))
}

/// Get a post with its statistics; counts a view
#[utoipa::path(
    get,
    path = "/api/posts/{post_uid}",
    tag = "Posts",
    params(("post_uid" = String, Path, description = "Post uid")),
    responses(
        (status = 200, description = "Success", body = crate::domain::PostWithStats),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(post_uid): Path<String>,
) -> Result<impl IntoResponse> {
    let post = state.post_service.view(&post_uid).await?;
    Ok(Json(post))
}

/// Create a post in a category
#[utoipa::path(
    post,
    path = "/api/categories/{category_uid}",
    tag = "Posts",
    request_body = CreatePostInput,
    responses(
        (status = 201, description = "Created", body = crate::domain::Post),
        (status = 503, description = "Statistics backend unavailable, post rolled back")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_uid): Path<String>,
    JsonBody(input): JsonBody<CreatePostInput>,
) -> Result<impl IntoResponse> {
    let post = state
        .post_service
        .create(&auth.uid, &category_uid, input)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{post_uid}",
    tag = "Posts",
    request_body = UpdatePostInput,
    responses(
        (status = 204, description = "Updated"),
        (status = 401, description = "Not the owner")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_uid): Path<String>,
    JsonBody(input): JsonBody<UpdatePostInput>,
) -> Result<impl IntoResponse> {
    state.post_service.update(&auth.uid, &post_uid, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/posts/{post_uid}/like",
    tag = "Posts",
    responses((status = 200, description = "Success", body = crate::domain::VoteResult))
)]
pub async fn like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_uid): Path<String>,
) -> Result<impl IntoResponse> {
    let result = state.post_service.like(&auth.uid, &post_uid).await?;
    Ok(Json(result))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{post_uid}/dislike",
    tag = "Posts",
    responses((status = 200, description = "Success", body = crate::domain::VoteResult))
)]
pub async fn dislike(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_uid): Path<String>,
) -> Result<impl IntoResponse> {
    let result = state.post_service.dislike(&auth.uid, &post_uid).await?;
    Ok(Json(result))
}

/// Delete a post. Dependent records are removed in the background.
#[utoipa::path(
    delete,
    path = "/api/categories/{category_uid}/posts/{post_uid}",
    tag = "Posts",
    responses(
        (status = 204, description = "Deletion accepted"),
        (status = 401, description = "Not allowed"),
        (status = 404, description = "Post not found in category")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((category_uid, post_uid)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    state
        .post_service
        .delete(&auth.uid, &category_uid, &post_uid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/categories/{category_uid}/posts/{post_uid}/report",
    tag = "Moderation",
    request_body = CreateReportInput,
    responses((status = 201, description = "Reported", body = crate::domain::Report))
)]
pub async fn report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((category_uid, post_uid)): Path<(String, String)>,
    JsonBody(input): JsonBody<CreateReportInput>,
) -> Result<impl IntoResponse> {
    let report = state
        .post_service
        .report(&category_uid, &post_uid, input)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}
