use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use gym_storage::{
    Database,
    dto::schedule::{ReplaceParticipantsRequest, ScheduleDetailResponse},
};
use uuid::Uuid;

use super::services;
use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath};
use crate::features::schedules;

#[utoipa::path(
    put,
    path = "/api/admin/schedules/{id}/participants",
    params(
        ("id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = ReplaceParticipantsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participant set replaced without capacity checks", body = ScheduleDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Schedule or member not found")
    ),
    tag = "admin"
)]
pub async fn replace_participants(
    State(db): State<Database>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ReplaceParticipantsRequest>,
) -> Result<Response, WebError> {
    services::replace_participants(db.pool(), id, &req.member_ids).await?;

    let schedule = schedules::services::get_schedule_detail(db.pool(), id).await?;

    Ok(Json(schedule).into_response())
}
