use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schedule {schedule_id} is full ({max_participants} participants)")]
    ScheduleFull {
        schedule_id: Uuid,
        max_participants: i32,
    },

    #[error("Membership {membership_id} has no remaining sessions")]
    InsufficientSessions { membership_id: Uuid },
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Turns raw unique/foreign-key failures into a `ConstraintViolation`
    /// carrying a caller-facing message.
    pub fn into_constraint(self, msg: &str) -> Self {
        if self.is_unique_violation() || self.is_foreign_key_violation() {
            StorageError::ConstraintViolation(msg.to_string())
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_describe_business_rejections() {
        let id = Uuid::nil();
        let full = StorageError::ScheduleFull {
            schedule_id: id,
            max_participants: 3,
        };
        assert_eq!(
            full.to_string(),
            format!("Schedule {id} is full (3 participants)")
        );

        let exhausted = StorageError::InsufficientSessions { membership_id: id };
        assert!(exhausted.to_string().contains("no remaining sessions"));

        assert_eq!(StorageError::NotFound("Member").to_string(), "Member not found");
    }

    #[test]
    fn test_into_constraint_leaves_other_errors_untouched() {
        let err = StorageError::NotFound("Schedule").into_constraint("duplicate");
        assert!(matches!(err, StorageError::NotFound("Schedule")));
        assert!(!StorageError::validation("x").is_unique_violation());
    }
}
