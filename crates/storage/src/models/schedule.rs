use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "schedule_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    #[default]
    Personal,
    Group,
    Consultation,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "schedule_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

/// A training session slot. `participant_count` is computed by the query
/// that loads the row, not stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub schedule_id: Uuid,
    pub title: String,
    pub description: String,
    pub schedule_type: ScheduleType,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub trainer_id: Uuid,
    pub status: ScheduleStatus,
    pub max_participants: i32,
    pub participant_count: i64,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Schedule {
    /// Minutes between start and end on the same day. Overnight slots are
    /// not modelled, so an end before the start yields a negative value.
    pub fn duration_minutes(&self) -> i64 {
        let start = self.date.and_time(self.start_time);
        let end = self.date.and_time(self.end_time);
        (end - start).num_minutes()
    }

    pub fn can_register(&self) -> bool {
        self.participant_count < i64::from(self.max_participants)
    }
}

/// Schedule row joined with the trainer's display name.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleWithTrainer {
    #[sqlx(flatten)]
    pub schedule: Schedule,
    pub trainer_name: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn schedule_on(date: NaiveDate) -> Schedule {
        Schedule {
            schedule_id: Uuid::new_v4(),
            title: "Morning PT".into(),
            description: String::new(),
            schedule_type: ScheduleType::Personal,
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            trainer_id: Uuid::new_v4(),
            status: ScheduleStatus::Scheduled,
            max_participants: 1,
            participant_count: 0,
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::schedule_on;
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_duration_in_minutes() {
        let mut s = schedule_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(s.duration_minutes(), 60);

        s.start_time = time(18, 15);
        s.end_time = time(19, 45);
        assert_eq!(s.duration_minutes(), 90);
    }

    #[test]
    fn test_duration_is_not_clamped() {
        let mut s = schedule_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        s.start_time = time(10, 0);
        s.end_time = time(10, 0);
        assert_eq!(s.duration_minutes(), 0);

        s.end_time = time(9, 30);
        assert_eq!(s.duration_minutes(), -30);
    }

    #[test]
    fn test_can_register_until_capacity() {
        let mut s = schedule_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        s.max_participants = 2;
        s.participant_count = 1;
        assert!(s.can_register());

        s.participant_count = 2;
        assert!(!s.can_register());
    }

    #[test]
    fn test_status_wire_format() {
        let status: ScheduleStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(status, ScheduleStatus::NoShow);
        assert!(serde_json::from_str::<ScheduleType>("\"yoga\"").is_err());
    }
}
