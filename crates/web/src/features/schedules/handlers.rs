use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gym_storage::{
    Database,
    dto::schedule::{
        CreateScheduleRequest, JoinScheduleRequest, JoinScheduleResponse, ScheduleDetailResponse,
        ScheduleFilter, ScheduleResponse, UpdateScheduleRequest,
    },
    models::{Admission, ScheduleWithTrainer},
    services::calendar::DateWindow,
};
use uuid::Uuid;
use validator::Validate;

use super::services;
use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::features::today;
use crate::state::AppState;

fn to_responses(schedules: Vec<ScheduleWithTrainer>) -> Vec<ScheduleResponse> {
    schedules.into_iter().map(ScheduleResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ScheduleFilter),
    responses(
        (status = 200, description = "List schedules in calendar order", body = Vec<ScheduleResponse>),
        (status = 400, description = "Invalid filter, e.g. month without year")
    ),
    tag = "schedules"
)]
pub async fn list_schedules(
    State(db): State<Database>,
    ApiQuery(filter): ApiQuery<ScheduleFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let schedules = services::list_schedules(db.pool(), &filter, None).await?;

    Ok(Json(to_responses(schedules)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/schedules/today",
    params(ScheduleFilter),
    responses(
        (status = 200, description = "Schedules on the current day", body = Vec<ScheduleResponse>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "schedules"
)]
pub async fn list_today_schedules(
    State(db): State<Database>,
    ApiQuery(filter): ApiQuery<ScheduleFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let window = DateWindow::day(today());
    let schedules = services::list_schedules(db.pool(), &filter, Some(window)).await?;

    Ok(Json(to_responses(schedules)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/schedules/upcoming",
    params(ScheduleFilter),
    responses(
        (status = 200, description = "Schedules from today through the configured horizon", body = Vec<ScheduleResponse>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "schedules"
)]
pub async fn list_upcoming_schedules(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ScheduleFilter>,
) -> Result<Response, WebError> {
    filter.validate().map_err(WebError::BadRequest)?;

    let window = DateWindow::upcoming(today(), state.upcoming_horizon_days);
    let schedules = services::list_schedules(state.db.pool(), &filter, Some(window)).await?;

    Ok(Json(to_responses(schedules)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/schedules/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule with participants", body = ScheduleDetailResponse),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules"
)]
pub async fn get_schedule(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let schedule = services::get_schedule_detail(db.pool(), id).await?;

    Ok(Json(schedule).into_response())
}

#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleResponse),
        (status = 400, description = "Validation error or user is not a trainer"),
        (status = 404, description = "Trainer not found")
    ),
    tag = "schedules"
)]
pub async fn create_schedule(
    State(db): State<Database>,
    ApiJson(req): ApiJson<CreateScheduleRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let schedule = services::create_schedule(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(ScheduleResponse::from(schedule))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/schedules/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Schedule updated", body = ScheduleResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Schedule or trainer not found")
    ),
    tag = "schedules"
)]
pub async fn update_schedule(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateScheduleRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let schedule = services::update_schedule(db.pool(), id, &req).await?;

    Ok(Json(ScheduleResponse::from(schedule)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/schedules/{id}",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules"
)]
pub async fn delete_schedule(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_schedule(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/schedules/{id}/join",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = JoinScheduleRequest,
    responses(
        (status = 200, description = "Member registered, or was already registered", body = JoinScheduleResponse),
        (status = 400, description = "member_id missing"),
        (status = 404, description = "Schedule or member not found"),
        (status = 409, description = "Schedule is full")
    ),
    tag = "schedules"
)]
pub async fn join_schedule(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<JoinScheduleRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let member_id = req
        .member_id
        .ok_or_else(|| WebError::BadRequest("member_id is required".to_string()))?;

    let registration = services::join_schedule(db.pool(), id, member_id).await?;

    let already_registered = registration.admission == Admission::AlreadyRegistered;
    let message = if already_registered {
        "Member is already registered for this schedule"
    } else {
        "Member registered for this schedule"
    };

    Ok(Json(JoinScheduleResponse {
        message: message.to_string(),
        already_registered,
        participant_count: registration.participant_count,
    })
    .into_response())
}
