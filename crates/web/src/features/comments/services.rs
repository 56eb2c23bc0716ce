use gym_storage::{
    dto::post::{CommentFilter, CreateCommentRequest, UpdateCommentRequest},
    error::{Result, StorageError},
    models::CommentWithAuthor,
    repository::{CommentRepository, PostRepository},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::posts::services::ensure_author;

pub async fn list_comments(pool: &PgPool, filter: &CommentFilter) -> Result<Vec<CommentWithAuthor>> {
    let repo = CommentRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_comment(pool: &PgPool, id: Uuid) -> Result<CommentWithAuthor> {
    let repo = CommentRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_comment(
    pool: &PgPool,
    request: &CreateCommentRequest,
) -> Result<CommentWithAuthor> {
    let author_id = request
        .author_id
        .ok_or_else(|| StorageError::validation("author_id is required"))?;

    if !PostRepository::new(pool).exists(request.post_id).await? {
        return Err(StorageError::NotFound("Post"));
    }
    ensure_author(pool, author_id).await?;

    let repo = CommentRepository::new(pool);
    repo.create(request.post_id, author_id, &request.content).await
}

pub async fn update_comment(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateCommentRequest,
) -> Result<CommentWithAuthor> {
    let repo = CommentRepository::new(pool);
    repo.update(id, &request.content).await
}

pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = CommentRepository::new(pool);
    repo.delete(id).await
}
