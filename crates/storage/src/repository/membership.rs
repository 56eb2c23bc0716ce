use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::membership::MembershipFilter;
use crate::error::{Result, StorageError};
use crate::models::{Membership, MembershipWithMember};
use crate::services::membership_period::MembershipPlan;

const MEMBERSHIP_COLUMNS: &str = "membership_id, member_id, membership_type, start_date, end_date, \
     remaining_sessions, price, is_active, created_at";

const MEMBERSHIP_SELECT: &str = r#"
    SELECT ms.membership_id, ms.member_id, ms.membership_type, ms.start_date, ms.end_date,
           ms.remaining_sessions, ms.price, ms.is_active, ms.created_at,
           m.name AS member_name
    FROM memberships ms
    JOIN members m ON m.member_id = ms.member_id
"#;

pub struct MembershipRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MembershipRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List memberships, newest first
    pub async fn list(&self, filter: &MembershipFilter) -> Result<Vec<MembershipWithMember>> {
        let mut query = QueryBuilder::new(MEMBERSHIP_SELECT);
        query.push(" WHERE 1=1");

        if let Some(member_id) = filter.member {
            query.push(" AND ms.member_id = ");
            query.push_bind(member_id);
        }

        if let Some(membership_type) = filter.membership_type {
            query.push(" AND ms.membership_type = ");
            query.push_bind(membership_type);
        }

        if let Some(is_active) = filter.is_active {
            query.push(" AND ms.is_active = ");
            query.push_bind(is_active);
        }

        query.push(" ORDER BY ms.created_at DESC");

        let memberships = query
            .build_query_as::<MembershipWithMember>()
            .fetch_all(self.pool)
            .await?;

        Ok(memberships)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<MembershipWithMember> {
        let membership = sqlx::query_as::<_, MembershipWithMember>(&format!(
            "{MEMBERSHIP_SELECT} WHERE ms.membership_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Membership"))?;

        Ok(membership)
    }

    pub async fn create(&self, plan: &MembershipPlan, is_active: bool) -> Result<MembershipWithMember> {
        let membership_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO memberships (
                member_id, membership_type, start_date, end_date,
                remaining_sessions, price, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING membership_id
            "#,
        )
        .bind(plan.member_id)
        .bind(plan.membership_type)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(plan.remaining_sessions)
        .bind(plan.price)
        .bind(is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Member no longer exists"))?;

        self.find_by_id(membership_id).await
    }

    /// Persist every mutable column of an already validated membership
    pub async fn update(&self, membership: &Membership) -> Result<MembershipWithMember> {
        let result = sqlx::query(
            r#"
            UPDATE memberships
            SET membership_type = $2,
                start_date = $3,
                end_date = $4,
                remaining_sessions = $5,
                price = $6,
                is_active = $7
            WHERE membership_id = $1
            "#,
        )
        .bind(membership.membership_id)
        .bind(membership.membership_type)
        .bind(membership.start_date)
        .bind(membership.end_date)
        .bind(membership.remaining_sessions)
        .bind(membership.price)
        .bind(membership.is_active)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Membership"));
        }

        self.find_by_id(membership.membership_id).await
    }

    /// Use one session of a session-based plan.
    ///
    /// The row is locked for the duration of the check so two concurrent
    /// check-ins cannot both take the last session.
    pub async fn consume_session(&self, id: Uuid) -> Result<MembershipWithMember> {
        let mut tx = self.pool.begin().await?;

        let mut membership = sqlx::query_as::<_, Membership>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE membership_id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound("Membership"))?;

        membership.consume_session()?;

        sqlx::query("UPDATE memberships SET remaining_sessions = $2 WHERE membership_id = $1")
            .bind(id)
            .bind(membership.remaining_sessions)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            membership_id = %id,
            remaining_sessions = membership.remaining_sessions,
            "Session consumed"
        );

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM memberships WHERE membership_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Membership"));
        }

        Ok(())
    }
}
