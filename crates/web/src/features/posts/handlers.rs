use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gym_storage::{
    Database,
    dto::post::{
        AddCommentRequest, CommentResponse, CreatePostRequest, PostDetailResponse, PostFilter,
        PostResponse, UpdatePostRequest,
    },
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

#[utoipa::path(
    get,
    path = "/api/posts",
    params(PostFilter),
    responses(
        (status = 200, description = "List posts, newest first", body = Vec<PostResponse>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "posts"
)]
pub async fn list_posts(
    State(db): State<Database>,
    ApiQuery(filter): ApiQuery<PostFilter>,
) -> Result<Response, WebError> {
    let posts = services::list_posts(db.pool(), &filter).await?;

    let response: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailResponse),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn get_post(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let post = services::get_post_detail(db.pool(), id).await?;

    Ok(Json(post).into_response())
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error, e.g. missing author_id"),
        (status = 404, description = "Member or author not found")
    ),
    tag = "posts"
)]
pub async fn create_post(
    State(db): State<Database>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let post = services::create_post(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn update_post(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let post = services::update_post(db.pool(), id, &req).await?;

    Ok(Json(PostResponse::from(post)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 204, description = "Post and its comments deleted"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
pub async fn delete_post(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_post(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Validation error, e.g. missing author_id"),
        (status = 404, description = "Post or author not found")
    ),
    tag = "posts"
)]
pub async fn add_comment(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AddCommentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let comment = services::add_comment(db.pool(), id, &req).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))).into_response())
}
