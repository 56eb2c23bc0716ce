use gym_storage::{error::Result, models::Roster, repository::ScheduleRepository};
use sqlx::PgPool;
use uuid::Uuid;

/// Overwrite a schedule's participants, ignoring its capacity.
pub async fn replace_participants(
    pool: &PgPool,
    schedule_id: Uuid,
    member_ids: &[Uuid],
) -> Result<Roster> {
    let repo = ScheduleRepository::new(pool);
    let roster = repo
        .replace_participants_unchecked(schedule_id, member_ids)
        .await?;

    if roster.is_over_capacity() {
        tracing::warn!(
            schedule_id = %schedule_id,
            participant_count = roster.participant_count(),
            max_participants = roster.max_participants(),
            "Participants replaced beyond capacity"
        );
    } else {
        tracing::info!(
            schedule_id = %schedule_id,
            participant_count = roster.participant_count(),
            "Participants replaced"
        );
    }

    Ok(roster)
}
