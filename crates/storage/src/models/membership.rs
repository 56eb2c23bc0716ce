use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "membership_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    Daily,
    Monthly,
    Quarterly,
    Yearly,
    Pt,
}

impl MembershipType {
    /// Length of the plan in days, counted from the start date.
    ///
    /// These are literal day offsets, so a yearly plan starting on
    /// 2024-01-01 ends on 2024-12-31 in a leap year. Daily passes have no
    /// default and need an explicit end date.
    pub fn default_period_days(self) -> Option<i64> {
        match self {
            Self::Monthly => Some(30),
            Self::Quarterly => Some(90),
            Self::Yearly => Some(365),
            Self::Pt => Some(60),
            Self::Daily => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Pt => "pt",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Daily => "Daily pass",
            Self::Monthly => "Monthly membership",
            Self::Quarterly => "3-month membership",
            Self::Yearly => "Yearly membership",
            Self::Pt => "Personal training",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Membership {
    pub membership_id: Uuid,
    pub member_id: Uuid,
    pub membership_type: MembershipType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub remaining_sessions: i32,
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl Membership {
    /// Active and `as_of` falls inside `[start_date, end_date]`.
    pub fn is_currently_valid(&self, as_of: NaiveDate) -> bool {
        self.is_active && self.start_date <= as_of && as_of <= self.end_date
    }

    pub fn consume_session(&mut self) -> Result<()> {
        if self.remaining_sessions <= 0 {
            return Err(StorageError::InsufficientSessions {
                membership_id: self.membership_id,
            });
        }

        self.remaining_sessions -= 1;
        Ok(())
    }
}

/// Membership row joined with the owning member's name.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipWithMember {
    #[sqlx(flatten)]
    pub membership: Membership,
    pub member_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn membership(sessions: i32, active: bool) -> Membership {
        Membership {
            membership_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            membership_type: MembershipType::Pt,
            start_date: date(2024, 3, 1),
            end_date: date(2024, 4, 30),
            remaining_sessions: sessions,
            price: Decimal::from(600_000),
            is_active: active,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_validity_window_is_inclusive() {
        let m = membership(0, true);
        assert!(m.is_currently_valid(date(2024, 3, 1)));
        assert!(m.is_currently_valid(date(2024, 4, 30)));
        assert!(!m.is_currently_valid(date(2024, 2, 29)));
        assert!(!m.is_currently_valid(date(2024, 5, 1)));
    }

    #[test]
    fn test_inactive_membership_is_never_valid() {
        let m = membership(5, false);
        assert!(!m.is_currently_valid(date(2024, 3, 15)));
    }

    #[test]
    fn test_consume_session_decrements_until_exhausted() {
        let mut m = membership(2, true);
        m.consume_session().unwrap();
        m.consume_session().unwrap();
        assert_eq!(m.remaining_sessions, 0);

        let err = m.consume_session().unwrap_err();
        assert!(matches!(err, StorageError::InsufficientSessions { .. }));
        assert_eq!(m.remaining_sessions, 0);
    }

    #[test]
    fn test_membership_type_parsing_rejects_unknown() {
        let parsed: MembershipType = serde_json::from_str("\"quarterly\"").unwrap();
        assert_eq!(parsed, MembershipType::Quarterly);
        assert!(serde_json::from_str::<MembershipType>("\"weekly\"").is_err());
    }
}
