use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    #[default]
    Trainer,
}

/// Staff account: either a trainer or a back-office admin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub phone: String,
    pub created_at: chrono::NaiveDateTime,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_trainer(&self) -> bool {
        self.user_type == UserType::Trainer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            user_id: Uuid::new_v4(),
            username: "coach".into(),
            email: None,
            first_name: first.into(),
            last_name: last.into(),
            user_type: UserType::Trainer,
            phone: String::new(),
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        assert_eq!(user("Kim", "Trainer").full_name(), "Kim Trainer");
        assert_eq!(user("", "Lee").full_name(), "Lee");
        assert_eq!(user("", "").full_name(), "");
    }

    #[test]
    fn test_user_type_wire_format() {
        let parsed: UserType = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, UserType::Admin);
        assert!(serde_json::from_str::<UserType>("\"manager\"").is_err());
    }
}
