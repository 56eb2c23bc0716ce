use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gym_storage::error::StorageError;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Storage(
                StorageError::ConstraintViolation(_)
                | StorageError::ScheduleFull { .. }
                | StorageError::InsufficientSessions { .. },
            ) => StatusCode::CONFLICT,
            Self::Storage(StorageError::Database(_) | StorageError::Migration(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(e @ StorageError::NotFound(_)) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg))
            | Self::Storage(StorageError::Validation(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(e @ StorageError::ScheduleFull { .. }) => {
                json!({
                    "error": "Schedule is full",
                    "details": [e.to_string()]
                })
            }
            Self::Storage(e @ StorageError::InsufficientSessions { .. }) => {
                json!({
                    "error": "No remaining sessions",
                    "details": [e.to_string()]
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for WebError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use uuid::Uuid;
    use validator::Validate;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WebError::from(StorageError::NotFound("Member")), StatusCode::NOT_FOUND),
            (
                WebError::from(StorageError::validation("bad period")),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(StorageError::ConstraintViolation("dup".into())),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(StorageError::ScheduleFull {
                    schedule_id: Uuid::nil(),
                    max_participants: 1,
                }),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(StorageError::InsufficientSessions {
                    membership_id: Uuid::nil(),
                }),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(StorageError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (WebError::BadRequest("nope".into()), StatusCode::BAD_REQUEST),
            (WebError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error}");
        }
    }

    #[tokio::test]
    async fn test_internal_errors_are_redacted() {
        let response =
            WebError::from(StorageError::Database(sqlx::Error::PoolTimedOut)).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_schedule_full_carries_description() {
        let response = WebError::from(StorageError::ScheduleFull {
            schedule_id: Uuid::nil(),
            max_participants: 4,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Schedule is full");
        assert!(body["details"][0].as_str().unwrap().contains("4 participants"));
    }

    #[tokio::test]
    async fn test_validation_errors_list_fields() {
        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 1, message = "must not be empty"))]
            name: String,
        }

        let errors = Payload {
            name: String::new(),
        }
        .validate()
        .unwrap_err();

        let response = WebError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["details"][0], "name: must not be empty");
    }
}
