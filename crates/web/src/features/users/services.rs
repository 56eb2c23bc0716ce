use gym_storage::{
    dto::user::{CreateUserRequest, UpdateUserRequest, UserFilter},
    error::Result,
    models::User,
    repository::UserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_users(pool: &PgPool, filter: &UserFilter) -> Result<Vec<User>> {
    let repo = UserRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<User> {
    let repo = UserRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_user(pool: &PgPool, request: &CreateUserRequest) -> Result<User> {
    let repo = UserRepository::new(pool);
    repo.create(request).await
}

pub async fn update_user(pool: &PgPool, id: Uuid, request: &UpdateUserRequest) -> Result<User> {
    let repo = UserRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

/// Delete a user; members they trained keep existing without a trainer
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = UserRepository::new(pool);
    let released = repo.delete(id).await?;

    if released > 0 {
        tracing::info!(user_id = %id, released, "Cleared trainer reference on members");
    }

    Ok(())
}
