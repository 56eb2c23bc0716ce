use gym_storage::{
    dto::schedule::{
        CreateScheduleRequest, ScheduleDetailResponse, ScheduleFilter, UpdateScheduleRequest,
    },
    error::{Result, StorageError},
    models::{Admission, ScheduleWithTrainer},
    repository::{Registration, ScheduleRepository, UserRepository},
    services::{
        calendar::DateWindow,
        validation::{ensure_capacity, ensure_time_range},
    },
};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_schedules(
    pool: &PgPool,
    filter: &ScheduleFilter,
    window: Option<DateWindow>,
) -> Result<Vec<ScheduleWithTrainer>> {
    let repo = ScheduleRepository::new(pool);
    repo.list(filter, window).await
}

pub async fn get_schedule_detail(pool: &PgPool, id: Uuid) -> Result<ScheduleDetailResponse> {
    let repo = ScheduleRepository::new(pool);

    let schedule = repo.find_by_id(id).await?;
    let participants = repo.participants(id).await?;

    Ok(ScheduleDetailResponse {
        schedule: schedule.into(),
        participants,
    })
}

pub async fn create_schedule(
    pool: &PgPool,
    request: &CreateScheduleRequest,
) -> Result<ScheduleWithTrainer> {
    ensure_time_range(request.start_time, request.end_time)?;
    ensure_capacity(request.max_participants)?;
    UserRepository::new(pool)
        .find_trainer(request.trainer_id)
        .await?;

    let repo = ScheduleRepository::new(pool);
    repo.create(request).await
}

/// Apply a partial update. The repository re-checks capacity against the
/// locked participant list.
pub async fn update_schedule(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateScheduleRequest,
) -> Result<ScheduleWithTrainer> {
    let repo = ScheduleRepository::new(pool);
    let existing = repo.find_by_id(id).await?.schedule;

    if request.start_time.is_some() || request.end_time.is_some() {
        ensure_time_range(
            request.start_time.unwrap_or(existing.start_time),
            request.end_time.unwrap_or(existing.end_time),
        )?;
    }

    if let Some(max_participants) = request.max_participants {
        ensure_capacity(max_participants)?;
    }

    if let Some(trainer_id) = request.trainer_id {
        UserRepository::new(pool).find_trainer(trainer_id).await?;
    }

    repo.update(&existing, request).await
}

pub async fn delete_schedule(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = ScheduleRepository::new(pool);
    repo.delete(id).await
}

/// Admission-controlled join of one member
pub async fn join_schedule(
    pool: &PgPool,
    schedule_id: Uuid,
    member_id: Uuid,
) -> Result<Registration> {
    let repo = ScheduleRepository::new(pool);

    match repo.register_member(schedule_id, member_id).await {
        Ok(registration) => {
            match registration.admission {
                Admission::Added => tracing::info!(
                    schedule_id = %schedule_id,
                    member_id = %member_id,
                    participant_count = registration.participant_count,
                    "Member registered"
                ),
                Admission::AlreadyRegistered => tracing::debug!(
                    schedule_id = %schedule_id,
                    member_id = %member_id,
                    "Member already registered"
                ),
            }
            Ok(registration)
        }
        Err(e @ StorageError::ScheduleFull { .. }) => {
            tracing::info!(
                schedule_id = %schedule_id,
                member_id = %member_id,
                "Registration rejected, schedule is full"
            );
            Err(e)
        }
        Err(e) => Err(e),
    }
}
