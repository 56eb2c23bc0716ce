use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{CommentWithAuthor, PostType, PostWithNames};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub post_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub post_type: PostType,
    pub content: String,
    pub workout_duration: Option<i32>,
    pub calories_burned: Option<i32>,
    pub weight: Option<Decimal>,
    pub comments_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Post together with its comment thread, oldest comment first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// Request payload for creating a post. The author must be named
/// explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    pub member_id: Uuid,

    #[validate(required(message = "author_id is required"))]
    pub author_id: Option<Uuid>,

    #[serde(default)]
    pub post_type: PostType,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    #[validate(range(min = 0))]
    pub workout_duration: Option<i32>,

    #[validate(range(min = 0))]
    pub calories_burned: Option<i32>,

    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    pub post_type: Option<PostType>,

    #[validate(length(min = 1))]
    pub content: Option<String>,

    #[validate(range(min = 0))]
    pub workout_duration: Option<i32>,

    #[validate(range(min = 0))]
    pub calories_burned: Option<i32>,

    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<Decimal>,
}

/// Comment payload when the post is given by the URL
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddCommentRequest {
    #[validate(required(message = "author_id is required"))]
    pub author_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,

    #[validate(required(message = "author_id is required"))]
    pub author_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

// Body weight in kg, stored as NUMERIC(5, 1)
fn validate_weight(weight: &Decimal) -> Result<(), ValidationError> {
    let in_range = *weight >= Decimal::ZERO && *weight < Decimal::from(10_000);
    if in_range && weight.round_dp(1) == *weight {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_weight")
            .with_message("weight must be between 0 and 9999.9 with one decimal".into()))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostFilter {
    pub member: Option<Uuid>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub author: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentFilter {
    pub post: Option<Uuid>,
}

impl From<PostWithNames> for PostResponse {
    fn from(row: PostWithNames) -> Self {
        let post = row.post;
        Self {
            post_id: post.post_id,
            member_id: post.member_id,
            member_name: row.member_name,
            author_id: post.author_id,
            author_name: row.author_name,
            post_type: post.post_type,
            content: post.content,
            workout_duration: post.workout_duration,
            calories_burned: post.calories_burned,
            weight: post.weight,
            comments_count: row.comments_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(row: CommentWithAuthor) -> Self {
        let comment = row.comment;
        Self {
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name: row.author_name,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_author_is_a_validation_error() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "member_id": Uuid::nil(),
            "content": "Squats 5x5",
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("author_id"));
        assert_eq!(req.post_type, PostType::Workout);
    }

    #[test]
    fn test_comment_requires_author_and_content() {
        let req = AddCommentRequest {
            author_id: None,
            content: String::new(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("author_id"));
        assert!(fields.contains_key("content"));
    }

    #[test]
    fn test_weight_must_fit_the_column() {
        let post = |weight: Decimal| CreatePostRequest {
            member_id: Uuid::nil(),
            author_id: Some(Uuid::nil()),
            post_type: PostType::Progress,
            content: "Weigh-in".to_string(),
            workout_duration: None,
            calories_burned: None,
            weight: Some(weight),
        };

        assert!(post(Decimal::new(725, 1)).validate().is_ok());
        assert!(post(Decimal::new(99_999, 1)).validate().is_ok());

        for weight in [Decimal::from(10_000), Decimal::new(7255, 3), Decimal::from(-1)] {
            let errors = post(weight).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("weight"), "{weight}");
        }

        let update = UpdatePostRequest {
            post_type: None,
            content: None,
            workout_duration: None,
            calories_burned: None,
            weight: Some(Decimal::new(801, 2)),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_unknown_post_type_fails_to_parse() {
        let parsed = serde_json::from_value::<CreatePostRequest>(serde_json::json!({
            "member_id": Uuid::nil(),
            "author_id": Uuid::nil(),
            "post_type": "selfie",
            "content": "x",
        }));
        assert!(parsed.is_err());
    }
}
