use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::user::{CreateUserRequest, UpdateUserRequest, UserFilter};
use crate::error::{Result, StorageError};
use crate::models::User;
use crate::services::validation::ensure_trainer;

const USER_COLUMNS: &str =
    "user_id, username, email, first_name, last_name, user_type, phone, created_at";

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List users, newest first
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut query = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1"));

        if let Some(user_type) = filter.user_type {
            query.push(" AND user_type = ");
            query.push_bind(user_type);
        }

        query.push(" ORDER BY created_at DESC");

        let users = query.build_query_as::<User>().fetch_all(self.pool).await?;

        Ok(users)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("User"))?;

        Ok(user)
    }

    /// Resolve a trainer reference: the user must exist and be a trainer
    pub async fn find_trainer(&self, id: Uuid) -> Result<User> {
        let user = self.find_by_id(id).await.map_err(|e| match e {
            StorageError::NotFound(_) => StorageError::NotFound("Trainer"),
            other => other,
        })?;
        ensure_trainer(&user)?;

        Ok(user)
    }

    pub async fn create(&self, req: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, user_type, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(req.user_type)
        .bind(&req.phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Username already exists"))?;

        Ok(user)
    }

    pub async fn update(&self, existing: &User, req: &UpdateUserRequest) -> Result<User> {
        let username = req.username.as_ref().unwrap_or(&existing.username);
        let email = req.email.as_ref().or(existing.email.as_ref());
        let first_name = req.first_name.as_ref().unwrap_or(&existing.first_name);
        let last_name = req.last_name.as_ref().unwrap_or(&existing.last_name);
        let user_type = req.user_type.unwrap_or(existing.user_type);
        let phone = req.phone.as_ref().unwrap_or(&existing.phone);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $2,
                email = $3,
                first_name = $4,
                last_name = $5,
                user_type = $6,
                phone = $7
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(existing.user_id)
        .bind(username)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(user_type)
        .bind(phone)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Username already exists"))?
        .ok_or(StorageError::NotFound("User"))?;

        Ok(user)
    }

    /// Delete a user. Members assigned to them lose their trainer
    /// reference; schedules, posts and comments they own go with them.
    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let released = sqlx::query(
            "UPDATE members SET trainer_id = NULL, updated_at = now() WHERE trainer_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("User"));
        }

        tx.commit().await?;

        Ok(released)
    }
}
