use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::member::default_active;
use crate::models::{MembershipType, MembershipWithMember};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MembershipResponse {
    pub membership_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub membership_type: MembershipType,
    pub membership_type_display: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub remaining_sessions: i32,
    pub price: Decimal,
    pub is_active: bool,
    /// Whether the membership grants access today
    pub is_currently_valid: bool,
    pub created_at: NaiveDateTime,
}

/// Request payload for selling a membership.
///
/// `end_date` may be omitted for every type except `daily`; it then follows
/// the type's default period.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMembershipRequest {
    pub member_id: Uuid,

    pub membership_type: MembershipType,

    #[validate(required(message = "start_date is required"))]
    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "remaining_sessions must not be negative"))]
    #[serde(default)]
    pub remaining_sessions: i32,

    pub price: Decimal,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMembershipRequest {
    pub membership_type: Option<MembershipType>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(range(min = 0))]
    pub remaining_sessions: Option<i32>,

    pub price: Option<Decimal>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MembershipFilter {
    pub member: Option<Uuid>,
    #[serde(rename = "type")]
    pub membership_type: Option<MembershipType>,
    pub is_active: Option<bool>,
}

impl MembershipResponse {
    pub fn new(row: MembershipWithMember, today: NaiveDate) -> Self {
        let is_currently_valid = row.membership.is_currently_valid(today);
        let membership = row.membership;
        Self {
            membership_id: membership.membership_id,
            member_id: membership.member_id,
            member_name: row.member_name,
            membership_type: membership.membership_type,
            membership_type_display: membership.membership_type.display_name().to_string(),
            start_date: membership.start_date,
            end_date: membership.end_date,
            remaining_sessions: membership.remaining_sessions,
            price: membership.price,
            is_active: membership.is_active,
            is_currently_valid,
            created_at: membership.created_at,
        }
    }
}
