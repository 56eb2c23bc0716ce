use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gym_storage::{
    Database,
    dto::membership::{
        CreateMembershipRequest, MembershipFilter, MembershipResponse, UpdateMembershipRequest,
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
    path = "/api/memberships",
    params(MembershipFilter),
    responses(
        (status = 200, description = "List memberships, newest first", body = Vec<MembershipResponse>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "memberships"
)]
pub async fn list_memberships(
    State(db): State<Database>,
    ApiQuery(filter): ApiQuery<MembershipFilter>,
) -> Result<Response, WebError> {
    let memberships = services::list_memberships(db.pool(), &filter).await?;

    let today = today();
    let response: Vec<MembershipResponse> = memberships
        .into_iter()
        .map(|row| MembershipResponse::new(row, today))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/memberships/{id}",
    params(
        ("id" = Uuid, Path, description = "Membership ID")
    ),
    responses(
        (status = 200, description = "Membership found", body = MembershipResponse),
        (status = 404, description = "Membership not found")
    ),
    tag = "memberships"
)]
pub async fn get_membership(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let membership = services::get_membership(db.pool(), id).await?;

    Ok(Json(MembershipResponse::new(membership, today())).into_response())
}

#[utoipa::path(
    post,
    path = "/api/memberships",
    request_body = CreateMembershipRequest,
    responses(
        (status = 201, description = "Membership created", body = MembershipResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Member not found")
    ),
    tag = "memberships"
)]
pub async fn create_membership(
    State(db): State<Database>,
    ApiJson(req): ApiJson<CreateMembershipRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let membership = services::create_membership(db.pool(), &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MembershipResponse::new(membership, today())),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/memberships/{id}",
    params(
        ("id" = Uuid, Path, description = "Membership ID")
    ),
    request_body = UpdateMembershipRequest,
    responses(
        (status = 200, description = "Membership updated", body = MembershipResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Membership not found")
    ),
    tag = "memberships"
)]
pub async fn update_membership(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateMembershipRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let membership = services::update_membership(db.pool(), id, &req).await?;

    Ok(Json(MembershipResponse::new(membership, today())).into_response())
}

#[utoipa::path(
    post,
    path = "/api/memberships/{id}/consume-session",
    params(
        ("id" = Uuid, Path, description = "Membership ID")
    ),
    responses(
        (status = 200, description = "One session used", body = MembershipResponse),
        (status = 404, description = "Membership not found"),
        (status = 409, description = "No remaining sessions")
    ),
    tag = "memberships"
)]
pub async fn consume_session(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let membership = services::consume_session(db.pool(), id).await?;

    Ok(Json(MembershipResponse::new(membership, today())).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/memberships/{id}",
    params(
        ("id" = Uuid, Path, description = "Membership ID")
    ),
    responses(
        (status = 204, description = "Membership deleted"),
        (status = 404, description = "Membership not found")
    ),
    tag = "memberships"
)]
pub async fn delete_membership(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_membership(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
