use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::post::{CreatePostRequest, PostFilter, UpdatePostRequest};
use crate::error::{Result, StorageError};
use crate::models::{Post, PostWithNames};

const POST_SELECT: &str = r#"
    SELECT p.post_id, p.member_id, p.author_id, p.post_type, p.content,
           p.workout_duration, p.calories_burned, p.weight, p.created_at, p.updated_at,
           m.name AS member_name,
           COALESCE(NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), ''), u.username)
               AS author_name,
           (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.post_id)
               AS comments_count
    FROM posts p
    JOIN members m ON m.member_id = p.member_id
    JOIN users u ON u.user_id = p.author_id
"#;

pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List posts, newest first
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<PostWithNames>> {
        let mut query = QueryBuilder::new(POST_SELECT);
        query.push(" WHERE 1=1");

        if let Some(member_id) = filter.member {
            query.push(" AND p.member_id = ");
            query.push_bind(member_id);
        }

        if let Some(post_type) = filter.post_type {
            query.push(" AND p.post_type = ");
            query.push_bind(post_type);
        }

        if let Some(author_id) = filter.author {
            query.push(" AND p.author_id = ");
            query.push_bind(author_id);
        }

        query.push(" ORDER BY p.created_at DESC");

        let posts = query
            .build_query_as::<PostWithNames>()
            .fetch_all(self.pool)
            .await?;

        Ok(posts)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<PostWithNames> {
        let post = sqlx::query_as::<_, PostWithNames>(&format!(
            "{POST_SELECT} WHERE p.post_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Post"))?;

        Ok(post)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE post_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn create(&self, req: &CreatePostRequest, author_id: Uuid) -> Result<PostWithNames> {
        let post_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO posts (
                member_id, author_id, post_type, content,
                workout_duration, calories_burned, weight
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING post_id
            "#,
        )
        .bind(req.member_id)
        .bind(author_id)
        .bind(req.post_type)
        .bind(&req.content)
        .bind(req.workout_duration)
        .bind(req.calories_burned)
        .bind(req.weight)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Member or author no longer exists"))?;

        self.find_by_id(post_id).await
    }

    pub async fn update(&self, existing: &Post, req: &UpdatePostRequest) -> Result<PostWithNames> {
        let post_type = req.post_type.unwrap_or(existing.post_type);
        let content = req.content.as_ref().unwrap_or(&existing.content);
        let workout_duration = req.workout_duration.or(existing.workout_duration);
        let calories_burned = req.calories_burned.or(existing.calories_burned);
        let weight = req.weight.or(existing.weight);

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET post_type = $2,
                content = $3,
                workout_duration = $4,
                calories_burned = $5,
                weight = $6,
                updated_at = now()
            WHERE post_id = $1
            "#,
        )
        .bind(existing.post_id)
        .bind(post_type)
        .bind(content)
        .bind(workout_duration)
        .bind(calories_burned)
        .bind(weight)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Post"));
        }

        self.find_by_id(existing.post_id).await
    }

    /// Delete a post and its comment thread
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Post"));
        }

        Ok(())
    }
}
