use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Schedule;

pub const DEFAULT_UPCOMING_HORIZON_DAYS: u64 = 7;

/// An inclusive range of calendar days used to select schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    first: NaiveDate,
    last: NaiveDate,
}

impl DateWindow {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            first: date,
            last: date,
        }
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| StorageError::validation(format!("invalid month {year}-{month}")))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| StorageError::validation(format!("invalid month {year}-{month}")))?;

        Ok(Self { first, last })
    }

    /// `today` through `today + horizon_days`, both included.
    pub fn upcoming(today: NaiveDate, horizon_days: u64) -> Self {
        let last = today
            .checked_add_days(Days::new(horizon_days))
            .unwrap_or(NaiveDate::MAX);
        Self { first: today, last }
    }

    pub fn first(&self) -> NaiveDate {
        self.first
    }

    pub fn last(&self) -> NaiveDate {
        self.last
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

pub fn filter_by_window(schedules: &[Schedule], window: DateWindow) -> Vec<&Schedule> {
    schedules.iter().filter(|s| window.contains(s.date)).collect()
}

pub fn filter_by_date(schedules: &[Schedule], date: NaiveDate) -> Vec<&Schedule> {
    filter_by_window(schedules, DateWindow::day(date))
}

pub fn filter_by_month(schedules: &[Schedule], year: i32, month: u32) -> Result<Vec<&Schedule>> {
    Ok(filter_by_window(schedules, DateWindow::month(year, month)?))
}

pub fn filter_by_trainer(schedules: &[Schedule], trainer_id: Uuid) -> Vec<&Schedule> {
    schedules
        .iter()
        .filter(|s| s.trainer_id == trainer_id)
        .collect()
}

pub fn filter_upcoming(
    schedules: &[Schedule],
    today: NaiveDate,
    horizon_days: u64,
) -> Vec<&Schedule> {
    filter_by_window(schedules, DateWindow::upcoming(today, horizon_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::schedule_on;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(found: Vec<&Schedule>) -> Vec<NaiveDate> {
        found.into_iter().map(|s| s.date).collect()
    }

    #[test]
    fn test_upcoming_horizon_is_inclusive() {
        let schedules = vec![
            schedule_on(date(2024, 5, 31)),
            schedule_on(date(2024, 6, 1)),
            schedule_on(date(2024, 6, 8)),
            schedule_on(date(2024, 6, 9)),
        ];

        let found = filter_upcoming(&schedules, date(2024, 6, 1), DEFAULT_UPCOMING_HORIZON_DAYS);
        assert_eq!(dates(found), vec![date(2024, 6, 1), date(2024, 6, 8)]);
    }

    #[test]
    fn test_month_window_covers_whole_month() {
        let feb = DateWindow::month(2024, 2).unwrap();
        assert_eq!(feb.first(), date(2024, 2, 1));
        assert_eq!(feb.last(), date(2024, 2, 29));

        let dec = DateWindow::month(2023, 12).unwrap();
        assert_eq!(dec.last(), date(2023, 12, 31));

        assert!(DateWindow::month(2024, 13).is_err());
        assert!(DateWindow::month(2024, 0).is_err());
    }

    #[test]
    fn test_filter_by_month_and_date() {
        let schedules = vec![
            schedule_on(date(2024, 1, 31)),
            schedule_on(date(2024, 2, 1)),
            schedule_on(date(2024, 2, 29)),
            schedule_on(date(2024, 3, 1)),
        ];

        let feb = filter_by_month(&schedules, 2024, 2).unwrap();
        assert_eq!(dates(feb), vec![date(2024, 2, 1), date(2024, 2, 29)]);

        let single = filter_by_date(&schedules, date(2024, 3, 1));
        assert_eq!(dates(single), vec![date(2024, 3, 1)]);
    }

    #[test]
    fn test_filter_by_trainer() {
        let mut schedules = vec![schedule_on(date(2024, 6, 1)), schedule_on(date(2024, 6, 2))];
        let trainer = Uuid::new_v4();
        schedules[1].trainer_id = trainer;

        let found = filter_by_trainer(&schedules, trainer);
        assert_eq!(dates(found), vec![date(2024, 6, 2)]);
    }
}
