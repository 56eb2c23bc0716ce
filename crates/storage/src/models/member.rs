use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::validation::age;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    #[sqlx(rename = "M")]
    #[serde(rename = "M")]
    Male,
    #[sqlx(rename = "F")]
    #[serde(rename = "F")]
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub member_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub join_date: NaiveDate,
    /// Assigned trainer; cleared when that trainer is removed.
    pub trainer_id: Option<Uuid>,
    pub goals: String,
    pub health_notes: String,
    pub emergency_contact: String,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Member {
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        age(self.birth_date, today)
    }
}

/// Member row joined with the assigned trainer's display name.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithTrainer {
    #[sqlx(flatten)]
    pub member: Member,
    pub trainer_name: Option<String>,
}
