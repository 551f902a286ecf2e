//! Comment API handlers

use crate::api::{JsonBody, PageResponse, Pagination};
use crate::domain::{CreateCommentInput, CreateReportInput, UpdateCommentInput};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CommentFilter {
    pub parent_uid: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_uid}/comments/",
    tag = "Comments",
    params(
        ("post_uid" = String, Path, description = "Post uid"),
        ("parent_uid" = Option<String>, Query, description = "Only replies to this comment")
    ),
    responses((status = 200, description = "Success"))
)]
pub async fn list(
    State(state): State<AppState>,
    Path(post_uid): Path<String>,
    Query(filter): Query<CommentFilter>,
    pagination: Pagination,
) -> Result<impl IntoResponse> {
    let parent_uid = filter.parent_uid.filter(|uid| !uid.is_empty());
    let comments = state
        .comment_service
        .list(&post_uid, parent_uid, pagination.page, pagination.size)
        .await?;
    Ok(Json(PageResponse::new(comments, pagination)))
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_uid}/comments/{comment_uid}",
    tag = "Comments",
    responses(
        (status = 200, description = "Success", body = crate::domain::CommentView),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path((post_uid, comment_uid)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let comment = state.comment_service.get(&post_uid, &comment_uid).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    post,
    path = "/api/posts/{post_uid}/comments/",
    tag = "Comments",
    request_body = CreateCommentInput,
    responses((status = 201, description = "Created", body = crate::domain::CommentView))
)]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_uid): Path<String>,
    JsonBody(input): JsonBody<CreateCommentInput>,
) -> Result<impl IntoResponse> {
    let comment = state
        .comment_service
        .create(&auth.uid, &post_uid, input)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{post_uid}/comments/{comment_uid}",
    tag = "Comments",
    request_body = UpdateCommentInput,
    responses(
        (status = 204, description = "Updated"),
        (status = 401, description = "Not the owner")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((post_uid, comment_uid)): Path<(String, String)>,
    JsonBody(input): JsonBody<UpdateCommentInput>,
) -> Result<impl IntoResponse> {
    state
        .comment_service
        .update(&auth.uid, &post_uid, &comment_uid, input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a comment's content
#[utoipa::path(
    delete,
    path = "/api/categories/{category_uid}/posts/{post_uid}/comments/{comment_uid}",
    tag = "Comments",
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Not allowed")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((category_uid, post_uid, comment_uid)): Path<(String, String, String)>,
) -> Result<impl IntoResponse> {
    state
        .comment_service
        .delete(&auth.uid, &category_uid, &post_uid, &comment_uid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/categories/{category_uid}/posts/{post_uid}/comments/{comment_uid}/report",
    tag = "Moderation",
    request_body = CreateReportInput,
    responses((status = 201, description = "Reported", body = crate::domain::Report))
)]
pub async fn report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((category_uid, post_uid, comment_uid)): Path<(String, String, String)>,
    JsonBody(input): JsonBody<CreateReportInput>,
) -> Result<impl IntoResponse> {
    let report = state
        .comment_service
        .report(&category_uid, &post_uid, &comment_uid, input)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}
