use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::post::CommentFilter;
use crate::error::{Result, StorageError};
use crate::models::CommentWithAuthor;

const COMMENT_SELECT: &str = r#"
    SELECT c.comment_id, c.post_id, c.author_id, c.content, c.created_at,
           COALESCE(NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), ''), u.username)
               AS author_name
    FROM post_comments c
    JOIN users u ON u.user_id = c.author_id
"#;

pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List comments in thread order
    pub async fn list(&self, filter: &CommentFilter) -> Result<Vec<CommentWithAuthor>> {
        let mut query = QueryBuilder::new(COMMENT_SELECT);
        query.push(" WHERE 1=1");

        if let Some(post_id) = filter.post {
            query.push(" AND c.post_id = ");
            query.push_bind(post_id);
        }

        query.push(" ORDER BY c.created_at");

        let comments = query
            .build_query_as::<CommentWithAuthor>()
            .fetch_all(self.pool)
            .await?;

        Ok(comments)
    }

    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        self.list(&CommentFilter {
            post: Some(post_id),
        })
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<CommentWithAuthor> {
        let comment = sqlx::query_as::<_, CommentWithAuthor>(&format!(
            "{COMMENT_SELECT} WHERE c.comment_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound("Comment"))?;

        Ok(comment)
    }

    pub async fn create(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<CommentWithAuthor> {
        let comment_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO post_comments (post_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING comment_id
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("Post or author no longer exists"))?;

        self.find_by_id(comment_id).await
    }

    pub async fn update(&self, id: Uuid, content: &str) -> Result<CommentWithAuthor> {
        let result = sqlx::query("UPDATE post_comments SET content = $2 WHERE comment_id = $1")
            .bind(id)
            .bind(content)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Comment"));
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM post_comments WHERE comment_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Comment"));
        }

        Ok(())
    }
}
