use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Gender, MemberWithTrainer};

/// Member as returned by the API, with age computed for the current day
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub member_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i32>,
    pub join_date: NaiveDate,
    pub trainer_id: Option<Uuid>,
    pub trainer_name: Option<String>,
    pub goals: String,
    pub health_notes: String,
    pub emergency_contact: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request payload for registering a new member
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name must be between 1 and 50 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 15,
        message = "Phone must be between 1 and 15 characters"
    ))]
    pub phone: String,

    #[validate(email)]
    pub email: Option<String>,

    pub gender: Option<Gender>,

    pub birth_date: Option<NaiveDate>,

    pub join_date: NaiveDate,

    pub trainer_id: Option<Uuid>,

    #[serde(default)]
    pub goals: String,

    #[serde(default)]
    pub health_notes: String,

    #[validate(length(max = 50))]
    #[serde(default)]
    pub emergency_contact: String,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 15))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub gender: Option<Gender>,

    pub birth_date: Option<NaiveDate>,

    pub join_date: Option<NaiveDate>,

    pub trainer_id: Option<Uuid>,

    pub goals: Option<String>,

    pub health_notes: Option<String>,

    #[validate(length(max = 50))]
    pub emergency_contact: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberFilter {
    /// Only members assigned to this trainer
    pub trainer: Option<Uuid>,
    pub is_active: Option<bool>,
}

pub(crate) fn default_active() -> bool {
    true
}

impl MemberResponse {
    pub fn new(row: MemberWithTrainer, today: NaiveDate) -> Self {
        let age = row.member.age_on(today);
        let member = row.member;
        Self {
            member_id: member.member_id,
            name: member.name,
            phone: member.phone,
            email: member.email,
            gender: member.gender,
            birth_date: member.birth_date,
            age,
            join_date: member.join_date,
            trainer_id: member.trainer_id,
            trainer_name: row.trainer_name,
            goals: member.goals,
            health_notes: member.health_notes,
            emergency_contact: member.emergency_contact,
            is_active: member.is_active,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}
