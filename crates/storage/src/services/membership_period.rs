use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::MembershipType;

const MAX_PRICE_EXCLUSIVE: i64 = 10_000_000_000;

/// A validated membership ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipPlan {
    pub member_id: Uuid,
    pub membership_type: MembershipType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub remaining_sessions: i32,
    pub price: Decimal,
}

/// End date for a plan starting on `start_date`.
///
/// An explicitly requested end date wins; otherwise the type's default
/// offset applies. Daily passes have no offset and must name their end.
pub fn resolve_end_date(
    membership_type: MembershipType,
    start_date: NaiveDate,
    requested_end: Option<NaiveDate>,
) -> Result<NaiveDate> {
    let end_date = match requested_end {
        Some(end_date) => end_date,
        None => {
            let days = membership_type.default_period_days().ok_or_else(|| {
                StorageError::validation(format!(
                    "end_date is required for {} memberships",
                    membership_type.as_str()
                ))
            })?;
            start_date
                .checked_add_days(Days::new(days.unsigned_abs()))
                .ok_or_else(|| StorageError::validation("end_date is out of range"))?
        }
    };

    ensure_period(start_date, end_date)?;
    Ok(end_date)
}

pub fn ensure_period(start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
    if end_date < start_date {
        return Err(StorageError::validation(
            "end_date must not be earlier than start_date",
        ));
    }
    Ok(())
}

/// Prices are whole amounts stored as `NUMERIC(10, 0)`.
pub fn ensure_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(StorageError::validation("price must not be negative"));
    }
    if !price.fract().is_zero() {
        return Err(StorageError::validation("price must be a whole amount"));
    }
    if price >= Decimal::from(MAX_PRICE_EXCLUSIVE) {
        return Err(StorageError::validation("price must have at most 10 digits"));
    }
    Ok(())
}

pub fn ensure_sessions(remaining_sessions: i32) -> Result<()> {
    if remaining_sessions < 0 {
        return Err(StorageError::validation(
            "remaining_sessions must not be negative",
        ));
    }
    Ok(())
}

pub fn plan_membership(
    member_id: Uuid,
    membership_type: MembershipType,
    start_date: Option<NaiveDate>,
    price: Decimal,
    remaining_sessions: i32,
    requested_end: Option<NaiveDate>,
) -> Result<MembershipPlan> {
    let start_date =
        start_date.ok_or_else(|| StorageError::validation("start_date is required"))?;
    ensure_price(price)?;
    ensure_sessions(remaining_sessions)?;
    let end_date = resolve_end_date(membership_type, start_date, requested_end)?;

    Ok(MembershipPlan {
        member_id,
        membership_type,
        start_date,
        end_date,
        remaining_sessions,
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan(
        membership_type: MembershipType,
        start: Option<NaiveDate>,
        price: i64,
        end: Option<NaiveDate>,
    ) -> Result<MembershipPlan> {
        plan_membership(Uuid::new_v4(), membership_type, start, Decimal::from(price), 0, end)
    }

    #[test]
    fn test_default_offsets() {
        let start = date(2024, 1, 1);
        let end = |t| resolve_end_date(t, start, None).unwrap();

        assert_eq!(end(MembershipType::Monthly), date(2024, 1, 31));
        assert_eq!(end(MembershipType::Quarterly), date(2024, 3, 31));
        assert_eq!(end(MembershipType::Pt), date(2024, 3, 1));
        // 365 literal days, not a calendar year
        assert_eq!(end(MembershipType::Yearly), date(2024, 12, 31));
    }

    #[test]
    fn test_daily_requires_explicit_end() {
        let start = date(2024, 5, 10);
        let err = resolve_end_date(MembershipType::Daily, start, None).unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));

        let end = resolve_end_date(MembershipType::Daily, start, Some(start)).unwrap();
        assert_eq!(end, start);
    }

    #[test]
    fn test_explicit_end_overrides_offset() {
        let start = date(2024, 1, 1);
        let end = resolve_end_date(MembershipType::Monthly, start, Some(date(2024, 2, 15))).unwrap();
        assert_eq!(end, date(2024, 2, 15));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = plan(
            MembershipType::Monthly,
            Some(date(2024, 3, 1)),
            80_000,
            Some(date(2024, 2, 1)),
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn test_missing_start_date_is_rejected() {
        let err = plan(MembershipType::Monthly, None, 80_000, None).unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let err = plan(MembershipType::Yearly, Some(date(2024, 1, 1)), -1, None).unwrap_err();
        assert!(err.to_string().contains("price"));
        assert!(plan(MembershipType::Yearly, Some(date(2024, 1, 1)), 0, None).is_ok());
    }

    #[test]
    fn test_price_must_fit_the_column() {
        assert!(ensure_price(Decimal::new(120, 1)).is_ok());
        assert!(ensure_price(Decimal::from(9_999_999_999_i64)).is_ok());

        let err = ensure_price(Decimal::new(125, 1)).unwrap_err();
        assert!(err.to_string().contains("whole amount"));

        let err = ensure_price(Decimal::from(10_000_000_000_i64)).unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));

        let err = plan_membership(
            Uuid::new_v4(),
            MembershipType::Monthly,
            Some(date(2024, 1, 1)),
            Decimal::new(125, 1),
            0,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn test_plan_carries_sessions() {
        let plan = plan_membership(
            Uuid::new_v4(),
            MembershipType::Pt,
            Some(date(2024, 1, 1)),
            Decimal::from(600_000),
            12,
            None,
        )
        .unwrap();
        assert_eq!(plan.remaining_sessions, 12);
        assert_eq!(plan.end_date, date(2024, 3, 1));

        let err = plan_membership(
            Uuid::new_v4(),
            MembershipType::Pt,
            Some(date(2024, 1, 1)),
            Decimal::ZERO,
            -3,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }
}
