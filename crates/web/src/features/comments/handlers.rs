use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gym_storage::{
    Database,
    dto::post::{CommentFilter, CommentResponse, CreateCommentRequest, UpdateCommentRequest},
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

#[utoipa::path(
    get,
    path = "/api/comments",
    params(CommentFilter),
    responses(
        (status = 200, description = "List comments, oldest first", body = Vec<CommentResponse>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(db): State<Database>,
    ApiQuery(filter): ApiQuery<CommentFilter>,
) -> Result<Response, WebError> {
    let comments = services::list_comments(db.pool(), &filter).await?;

    let response: Vec<CommentResponse> =
        comments.into_iter().map(CommentResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment found", body = CommentResponse),
        (status = 404, description = "Comment not found")
    ),
    tag = "comments"
)]
pub async fn get_comment(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let comment = services::get_comment(db.pool(), id).await?;

    Ok(Json(CommentResponse::from(comment)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation error, e.g. missing author_id"),
        (status = 404, description = "Post or author not found")
    ),
    tag = "comments"
)]
pub async fn create_comment(
    State(db): State<Database>,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let comment = services::create_comment(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Comment not found")
    ),
    tag = "comments"
)]
pub async fn update_comment(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateCommentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let comment = services::update_comment(db.pool(), id, &req).await?;

    Ok(Json(CommentResponse::from(comment)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 404, description = "Comment not found")
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_comment(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
