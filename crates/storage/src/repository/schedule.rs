use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::dto::schedule::{
    CreateScheduleRequest, ParticipantInfo, ScheduleFilter, UpdateScheduleRequest,
};
use crate::error::{Result, StorageError};
use crate::models::{Admission, Roster, Schedule, ScheduleWithTrainer};
use crate::services::calendar::DateWindow;

const SCHEDULE_SELECT: &str = r#"
    SELECT s.schedule_id, s.title, s.description, s.schedule_type, s.date,
           s.start_time, s.end_time, s.trainer_id, s.status, s.max_participants,
           (SELECT COUNT(*) FROM schedule_members sm WHERE sm.schedule_id = s.schedule_id)
               AS participant_count,
           s.created_at, s.updated_at,
           COALESCE(NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), ''), u.username)
               AS trainer_name
    FROM schedules s
    JOIN users u ON u.user_id = s.trainer_id
"#;

/// Result of an admission-controlled registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub admission: Admission,
    pub participant_count: i64,
}

pub struct ScheduleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScheduleRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List schedules in calendar order. `window` narrows the result on top
    /// of the filter's own date constraints.
    pub async fn list(
        &self,
        filter: &ScheduleFilter,
        window: Option<DateWindow>,
    ) -> Result<Vec<ScheduleWithTrainer>> {
        let mut windows = filter.date_windows().map_err(StorageError::Validation)?;
        windows.extend(window);

        let mut query = QueryBuilder::new(SCHEDULE_SELECT);
        query.push(" WHERE 1=1");

        for window in windows {
            query.push(" AND s.date BETWEEN ");
            query.push_bind(window.first());
            query.push(" AND ");
            query.push_bind(window.last());
        }

        if let Some(trainer_id) = filter.trainer {
            query.push(" AND s.trainer_id = ");
            query.push_bind(trainer_id);
        }

        if let Some(schedule_type) = filter.schedule_type {
            query.push(" AND s.schedule_type = ");
            query.push_bind(schedule_type);
        }

        if let Some(status) = filter.status {
            query.push(" AND s.status = ");
            query.push_bind(status);
        }

        query.push(" ORDER BY s.date, s.start_time");

        let schedules = query
            .build_query_as::<ScheduleWithTrainer>()
            .fetch_all(self.pool)
            .await?;

        Ok(schedules)
    }

    /// Schedules a member takes part in, latest first
    pub async fn list_for_member(&self, member_id: Uuid) -> Result<Vec<ScheduleWithTrainer>> {
        let schedules = sqlx::query_as::<_, ScheduleWithTrainer>(&format!(
            r#"
            {SCHEDULE_SELECT}
            WHERE EXISTS (
                SELECT 1 FROM schedule_members sm
                WHERE sm.schedule_id = s.schedule_id AND sm.member_id = $1
            )
            ORDER BY s.date DESC, s.start_time DESC
            "#
        ))
        .bind(member_id)
        .fetch_all(self.pool)
        .await?;

        Ok(schedules)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<ScheduleWithTrainer> {
        let schedule = sqlx::query_as::<_, ScheduleWithTrainer>(&format!(
            "{SCHEDULE_SELECT} WHERE s.schedule_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Schedule"))?;

        Ok(schedule)
    }

    pub async fn participants(&self, schedule_id: Uuid) -> Result<Vec<ParticipantInfo>> {
        let participants = sqlx::query_as::<_, ParticipantInfo>(
            r#"
            SELECT m.member_id, m.name, m.phone
            FROM schedule_members sm
            JOIN members m ON m.member_id = sm.member_id
            WHERE sm.schedule_id = $1
            ORDER BY sm.joined_at, m.name
            "#,
        )
        .bind(schedule_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    pub async fn create(&self, req: &CreateScheduleRequest) -> Result<ScheduleWithTrainer> {
        let schedule_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO schedules (
                title, description, schedule_type, date, start_time, end_time,
                trainer_id, status, max_participants
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING schedule_id
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.schedule_type)
        .bind(req.date)
        .bind(req.start_time)
        .bind(req.end_time)
        .bind(req.trainer_id)
        .bind(req.status)
        .bind(req.max_participants)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Trainer no longer exists"))?;

        self.find_by_id(schedule_id).await
    }

    /// Apply a merged partial update. A capacity change is checked against
    /// the participants present while the schedule row is locked, so a
    /// concurrent join cannot slip in between the check and the write.
    pub async fn update(
        &self,
        existing: &Schedule,
        req: &UpdateScheduleRequest,
    ) -> Result<ScheduleWithTrainer> {
        let title = req.title.as_ref().unwrap_or(&existing.title);
        let description = req.description.as_ref().unwrap_or(&existing.description);
        let schedule_type = req.schedule_type.unwrap_or(existing.schedule_type);
        let date = req.date.unwrap_or(existing.date);
        let start_time = req.start_time.unwrap_or(existing.start_time);
        let end_time = req.end_time.unwrap_or(existing.end_time);
        let trainer_id = req.trainer_id.unwrap_or(existing.trainer_id);
        let status = req.status.unwrap_or(existing.status);

        let mut tx = self.pool.begin().await?;

        let mut roster = lock_roster(&mut tx, existing.schedule_id).await?;
        if let Some(max_participants) = req.max_participants {
            roster.resize(max_participants)?;
        }

        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET title = $2,
                description = $3,
                schedule_type = $4,
                date = $5,
                start_time = $6,
                end_time = $7,
                trainer_id = $8,
                status = $9,
                max_participants = $10,
                updated_at = now()
            WHERE schedule_id = $1
            "#,
        )
        .bind(existing.schedule_id)
        .bind(title)
        .bind(description)
        .bind(schedule_type)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(trainer_id)
        .bind(status)
        .bind(roster.max_participants())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Trainer no longer exists"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Schedule"));
        }

        tx.commit().await?;

        self.find_by_id(existing.schedule_id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM schedules WHERE schedule_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Schedule"));
        }

        Ok(())
    }

    /// Admission-controlled registration of one member.
    ///
    /// The schedule row stays locked from the capacity check to the insert,
    /// so concurrent registrations for the same schedule run one at a time
    /// and can never over-fill it.
    pub async fn register_member(&self, schedule_id: Uuid, member_id: Uuid) -> Result<Registration> {
        let mut tx = self.pool.begin().await?;

        let mut roster = lock_roster(&mut tx, schedule_id).await?;

        let member_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE member_id = $1)",
        )
        .bind(member_id)
        .fetch_one(&mut *tx)
        .await?;

        if !member_exists {
            return Err(StorageError::NotFound("Member"));
        }

        let admission = roster.admit(member_id)?;

        if admission == Admission::Added {
            sqlx::query("INSERT INTO schedule_members (schedule_id, member_id) VALUES ($1, $2)")
                .bind(schedule_id)
                .bind(member_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| StorageError::from(e).into_constraint("Member no longer exists"))?;

            sqlx::query("UPDATE schedules SET updated_at = now() WHERE schedule_id = $1")
                .bind(schedule_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Registration {
            admission,
            participant_count: roster.participant_count() as i64,
        })
    }

    /// Replace the whole participant set without any capacity check.
    ///
    /// Only for administrative setup of group classes; the public join
    /// flow goes through [`Self::register_member`].
    pub async fn replace_participants_unchecked(
        &self,
        schedule_id: Uuid,
        member_ids: &[Uuid],
    ) -> Result<Roster> {
        let mut tx = self.pool.begin().await?;

        let mut roster = lock_roster(&mut tx, schedule_id).await?;
        roster.replace_unchecked(member_ids.iter().copied());
        let members: Vec<Uuid> = roster.members().collect();

        let known = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM members WHERE member_id = ANY($1)",
        )
        .bind(&members)
        .fetch_one(&mut *tx)
        .await?;

        if known != members.len() as i64 {
            return Err(StorageError::NotFound("Member"));
        }

        sqlx::query("DELETE FROM schedule_members WHERE schedule_id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO schedule_members (schedule_id, member_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(schedule_id)
        .bind(&members)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE schedules SET updated_at = now() WHERE schedule_id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(roster)
    }
}

/// Lock the schedule row and load its current participants.
async fn lock_roster(tx: &mut Transaction<'_, Postgres>, schedule_id: Uuid) -> Result<Roster> {
    let max_participants = sqlx::query_scalar::<_, i32>(
        "SELECT max_participants FROM schedules WHERE schedule_id = $1 FOR UPDATE",
    )
    .bind(schedule_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(StorageError::NotFound("Schedule"))?;

    let members = sqlx::query_scalar::<_, Uuid>(
        "SELECT member_id FROM schedule_members WHERE schedule_id = $1",
    )
    .bind(schedule_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(Roster::new(schedule_id, max_participants, members))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert_member(pool: &PgPool, name: &str) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO members (name, phone, join_date) VALUES ($1, '010-1234-5678', CURRENT_DATE) RETURNING member_id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn insert_schedule(pool: &PgPool, max_participants: i32) -> Uuid {
        let trainer_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, user_type) VALUES ($1, 'trainer') RETURNING user_id",
        )
        .bind(format!("trainer-{}", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar(
            r#"
            INSERT INTO schedules (title, schedule_type, date, start_time, end_time, trainer_id, max_participants)
            VALUES ('Evening circuit', 'group', CURRENT_DATE, '18:00', '19:00', $1, $2)
            RETURNING schedule_id
            "#,
        )
        .bind(trainer_id)
        .bind(max_participants)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_joins_for_last_seat(pool: PgPool) {
        let repo = ScheduleRepository::new(&pool);
        let schedule_id = insert_schedule(&pool, 2).await;
        let first = insert_member(&pool, "Kim").await;
        let second = insert_member(&pool, "Lee").await;
        let third = insert_member(&pool, "Park").await;

        repo.register_member(schedule_id, first).await.unwrap();

        let (a, b) = tokio::join!(
            repo.register_member(schedule_id, second),
            repo.register_member(schedule_id, third),
        );

        let mut added = 0;
        let mut full = 0;
        for outcome in [a, b] {
            match outcome {
                Ok(Registration {
                    admission: Admission::Added,
                    participant_count: 2,
                }) => added += 1,
                Err(StorageError::ScheduleFull { max_participants: 2, .. }) => full += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!((added, full), (1, 1));

        let schedule = repo.find_by_id(schedule_id).await.unwrap().schedule;
        assert_eq!(schedule.participant_count, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_join_reports_missing_schedule_before_member(pool: PgPool) {
        let repo = ScheduleRepository::new(&pool);
        let schedule_id = insert_schedule(&pool, 3).await;

        let err = repo
            .register_member(schedule_id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound("Member")));

        let err = repo
            .register_member(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound("Schedule")));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_repeated_join_is_a_no_op(pool: PgPool) {
        let repo = ScheduleRepository::new(&pool);
        let schedule_id = insert_schedule(&pool, 1).await;
        let member_id = insert_member(&pool, "Choi").await;

        let first = repo.register_member(schedule_id, member_id).await.unwrap();
        assert_eq!(first.admission, Admission::Added);

        // The schedule is now full, yet the same member is still accepted.
        let again = repo.register_member(schedule_id, member_id).await.unwrap();
        assert_eq!(again.admission, Admission::AlreadyRegistered);
        assert_eq!(again.participant_count, 1);

        assert_eq!(repo.participants(schedule_id).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unchecked_replacement_dedupes_and_ignores_capacity(pool: PgPool) {
        let repo = ScheduleRepository::new(&pool);
        let schedule_id = insert_schedule(&pool, 1).await;
        let a = insert_member(&pool, "Jung").await;
        let b = insert_member(&pool, "Kang").await;

        let roster = repo
            .replace_participants_unchecked(schedule_id, &[a, b, a])
            .await
            .unwrap();
        assert_eq!(roster.participant_count(), 2);
        assert!(roster.is_over_capacity());
        assert_eq!(repo.participants(schedule_id).await.unwrap().len(), 2);

        let err = repo
            .replace_participants_unchecked(schedule_id, &[a, Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound("Member")));
        assert_eq!(repo.participants(schedule_id).await.unwrap().len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_capacity_update_sees_joins_after_read(pool: PgPool) {
        let repo = ScheduleRepository::new(&pool);
        let schedule_id = insert_schedule(&pool, 2).await;
        let first = insert_member(&pool, "Yoon").await;
        let second = insert_member(&pool, "Han").await;

        repo.register_member(schedule_id, first).await.unwrap();
        let stale = repo.find_by_id(schedule_id).await.unwrap().schedule;
        assert_eq!(stale.participant_count, 1);

        repo.register_member(schedule_id, second).await.unwrap();

        let request: UpdateScheduleRequest =
            serde_json::from_value(serde_json::json!({ "max_participants": 1 })).unwrap();
        let err = repo.update(&stale, &request).await.unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));

        let schedule = repo.find_by_id(schedule_id).await.unwrap().schedule;
        assert_eq!(schedule.max_participants, 2);
        assert_eq!(schedule.participant_count, 2);
    }
}
