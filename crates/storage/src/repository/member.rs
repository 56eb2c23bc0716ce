use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::member::{CreateMemberRequest, MemberFilter, UpdateMemberRequest};
use crate::error::{Result, StorageError};
use crate::models::{Member, MemberWithTrainer};

const MEMBER_SELECT: &str = r#"
    SELECT m.member_id, m.name, m.phone, m.email, m.gender, m.birth_date, m.join_date,
           m.trainer_id, m.goals, m.health_notes, m.emergency_contact, m.is_active,
           m.created_at, m.updated_at,
           COALESCE(NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), ''), u.username)
               AS trainer_name
    FROM members m
    LEFT JOIN users u ON u.user_id = m.trainer_id
"#;

pub struct MemberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List members, most recently registered first
    pub async fn list(&self, filter: &MemberFilter) -> Result<Vec<MemberWithTrainer>> {
        let mut query = QueryBuilder::new(MEMBER_SELECT);
        query.push(" WHERE 1=1");

        if let Some(trainer_id) = filter.trainer {
            query.push(" AND m.trainer_id = ");
            query.push_bind(trainer_id);
        }

        if let Some(is_active) = filter.is_active {
            query.push(" AND m.is_active = ");
            query.push_bind(is_active);
        }

        query.push(" ORDER BY m.created_at DESC");

        let members = query
            .build_query_as::<MemberWithTrainer>()
            .fetch_all(self.pool)
            .await?;

        Ok(members)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<MemberWithTrainer> {
        let member = sqlx::query_as::<_, MemberWithTrainer>(&format!(
            "{MEMBER_SELECT} WHERE m.member_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Member"))?;

        Ok(member)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE member_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(&self, req: &CreateMemberRequest) -> Result<MemberWithTrainer> {
        let member_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO members (
                name, phone, email, gender, birth_date, join_date, trainer_id,
                goals, health_notes, emergency_contact, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING member_id
            "#,
        )
        .bind(&req.name)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(req.gender)
        .bind(req.birth_date)
        .bind(req.join_date)
        .bind(req.trainer_id)
        .bind(&req.goals)
        .bind(&req.health_notes)
        .bind(&req.emergency_contact)
        .bind(req.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Trainer no longer exists"))?;

        self.find_by_id(member_id).await
    }

    pub async fn update(
        &self,
        existing: &Member,
        req: &UpdateMemberRequest,
    ) -> Result<MemberWithTrainer> {
        let name = req.name.as_ref().unwrap_or(&existing.name);
        let phone = req.phone.as_ref().unwrap_or(&existing.phone);
        let email = req.email.as_ref().or(existing.email.as_ref());
        let gender = req.gender.or(existing.gender);
        let birth_date = req.birth_date.or(existing.birth_date);
        let join_date = req.join_date.unwrap_or(existing.join_date);
        let trainer_id = req.trainer_id.or(existing.trainer_id);
        let goals = req.goals.as_ref().unwrap_or(&existing.goals);
        let health_notes = req.health_notes.as_ref().unwrap_or(&existing.health_notes);
        let emergency_contact = req
            .emergency_contact
            .as_ref()
            .unwrap_or(&existing.emergency_contact);
        let is_active = req.is_active.unwrap_or(existing.is_active);

        let result = sqlx::query(
            r#"
            UPDATE members
            SET name = $2,
                phone = $3,
                email = $4,
                gender = $5,
                birth_date = $6,
                join_date = $7,
                trainer_id = $8,
                goals = $9,
                health_notes = $10,
                emergency_contact = $11,
                is_active = $12,
                updated_at = now()
            WHERE member_id = $1
            "#,
        )
        .bind(existing.member_id)
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(gender)
        .bind(birth_date)
        .bind(join_date)
        .bind(trainer_id)
        .bind(goals)
        .bind(health_notes)
        .bind(emergency_contact)
        .bind(is_active)
        .execute(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Trainer no longer exists"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Member"));
        }

        self.find_by_id(existing.member_id).await
    }

    /// Delete a member together with memberships, posts and schedule seats
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM members WHERE member_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Member"));
        }

        Ok(())
    }
}
