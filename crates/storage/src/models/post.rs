use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "post_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    #[default]
    Workout,
    Progress,
    Note,
}

/// Training log entry written about a member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Post {
    pub post_id: Uuid,
    pub member_id: Uuid,
    pub author_id: Uuid,
    pub post_type: PostType,
    pub content: String,
    pub workout_duration: Option<i32>,
    pub calories_burned: Option<i32>,
    pub weight: Option<Decimal>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PostComment {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct PostWithNames {
    #[sqlx(flatten)]
    pub post: Post,
    pub member_name: String,
    pub author_name: String,
    pub comments_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    pub comment: PostComment,
    pub author_name: String,
}
