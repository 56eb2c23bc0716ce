use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::error::{Result, StorageError};
use crate::models::User;

/// Whole years between `birth_date` and `today`; `None` without a birth date.
pub fn age(birth_date: Option<NaiveDate>, today: NaiveDate) -> Option<i32> {
    let birth = birth_date?;
    let birthday_pending = (today.month(), today.day()) < (birth.month(), birth.day());
    Some(today.year() - birth.year() - i32::from(birthday_pending))
}

/// Members and schedules may only point at staff whose type is trainer.
pub fn ensure_trainer(user: &User) -> Result<()> {
    if user.is_trainer() {
        Ok(())
    } else {
        Err(StorageError::validation(format!(
            "user {} is not a trainer",
            user.user_id
        )))
    }
}

pub fn ensure_time_range(start_time: NaiveTime, end_time: NaiveTime) -> Result<()> {
    if end_time <= start_time {
        return Err(StorageError::validation(
            "end_time must be later than start_time",
        ));
    }
    Ok(())
}

pub fn ensure_capacity(max_participants: i32) -> Result<()> {
    if max_participants < 1 {
        return Err(StorageError::validation(
            "max_participants must be at least 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::UserType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_around_birthday() {
        let birth = Some(date(1990, 6, 15));
        assert_eq!(age(birth, date(2024, 6, 14)), Some(33));
        assert_eq!(age(birth, date(2024, 6, 15)), Some(34));
        assert_eq!(age(birth, date(2024, 6, 16)), Some(34));
    }

    #[test]
    fn test_age_for_leap_day_birthday() {
        let birth = Some(date(2000, 2, 29));
        assert_eq!(age(birth, date(2023, 2, 28)), Some(22));
        assert_eq!(age(birth, date(2023, 3, 1)), Some(23));
    }

    #[test]
    fn test_age_without_birth_date() {
        assert_eq!(age(None, date(2024, 1, 1)), None);
    }

    #[test]
    fn test_ensure_trainer_rejects_admins() {
        let mut user = User {
            user_id: Uuid::new_v4(),
            username: "admin1".into(),
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            user_type: UserType::Admin,
            phone: String::new(),
            created_at: chrono::NaiveDateTime::default(),
        };
        assert!(matches!(ensure_trainer(&user), Err(StorageError::Validation(_))));

        user.user_type = UserType::Trainer;
        assert!(ensure_trainer(&user).is_ok());
    }

    #[test]
    fn test_time_range_must_be_positive() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert!(ensure_time_range(nine, ten).is_ok());
        assert!(ensure_time_range(ten, ten).is_err());
        assert!(ensure_time_range(ten, nine).is_err());
    }

    #[test]
    fn test_capacity_must_be_positive() {
        assert!(ensure_capacity(1).is_ok());
        assert!(ensure_capacity(0).is_err());
    }
}
