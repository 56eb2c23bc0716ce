use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gym_storage::{
    Database,
    dto::{
        member::{CreateMemberRequest, MemberFilter, MemberResponse, UpdateMemberRequest},
        post::PostResponse,
        schedule::ScheduleResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::features::today;

#[utoipa::path(
    get,
    path = "/api/members",
    params(MemberFilter),
    responses(
        (status = 200, description = "List members", body = Vec<MemberResponse>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "members"
)]
pub async fn list_members(
    State(db): State<Database>,
    ApiQuery(filter): ApiQuery<MemberFilter>,
) -> Result<Response, WebError> {
    let members = services::list_members(db.pool(), &filter).await?;

    let today = today();
    let response: Vec<MemberResponse> = members
        .into_iter()
        .map(|row| MemberResponse::new(row, today))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member found", body = MemberResponse),
        (status = 404, description = "Member not found")
    ),
    tag = "members"
)]
pub async fn get_member(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let member = services::get_member(db.pool(), id).await?;

    Ok(Json(MemberResponse::new(member, today())).into_response())
}

#[utoipa::path(
    post,
    path = "/api/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member registered", body = MemberResponse),
        (status = 400, description = "Validation error or user is not a trainer"),
        (status = 404, description = "Trainer not found")
    ),
    tag = "members"
)]
pub async fn create_member(
    State(db): State<Database>,
    ApiJson(req): ApiJson<CreateMemberRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let member = services::create_member(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::new(member, today()))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 400, description = "Validation error or user is not a trainer"),
        (status = 404, description = "Member or trainer not found")
    ),
    tag = "members"
)]
pub async fn update_member(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateMemberRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let member = services::update_member(db.pool(), id, &req).await?;

    Ok(Json(MemberResponse::new(member, today())).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 204, description = "Member deleted with memberships, posts and schedule seats"),
        (status = 404, description = "Member not found")
    ),
    tag = "members"
)]
pub async fn delete_member(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_member(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/members/{id}/posts",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Posts about the member, newest first", body = Vec<PostResponse>),
        (status = 404, description = "Member not found")
    ),
    tag = "members"
)]
pub async fn list_member_posts(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let posts = services::member_posts(db.pool(), id).await?;

    let response: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/members/{id}/schedules",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Schedules the member takes part in, latest first", body = Vec<ScheduleResponse>),
        (status = 404, description = "Member not found")
    ),
    tag = "members"
)]
pub async fn list_member_schedules(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let schedules = services::member_schedules(db.pool(), id).await?;

    let response: Vec<ScheduleResponse> =
        schedules.into_iter().map(ScheduleResponse::from).collect();

    Ok(Json(response).into_response())
}
