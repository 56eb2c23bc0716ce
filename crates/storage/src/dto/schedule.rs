use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ScheduleStatus, ScheduleType, ScheduleWithTrainer};
use crate::services::calendar::DateWindow;

/// Schedule with its derived capacity figures
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleResponse {
    pub schedule_id: Uuid,
    pub title: String,
    pub description: String,
    pub schedule_type: ScheduleType,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i64,
    pub trainer_id: Uuid,
    pub trainer_name: String,
    pub status: ScheduleStatus,
    pub max_participants: i32,
    pub participant_count: i64,
    pub can_register: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Schedule with its participant list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleDetailResponse {
    #[serde(flatten)]
    pub schedule: ScheduleResponse,
    pub participants: Vec<ParticipantInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ParticipantInfo {
    pub member_id: Uuid,
    pub name: String,
    pub phone: String,
}

/// Request payload for creating a schedule.
///
/// Participants are not part of the payload: they join one by one through
/// the admission-controlled join endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateScheduleRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub schedule_type: ScheduleType,

    pub date: NaiveDate,

    pub start_time: NaiveTime,

    pub end_time: NaiveTime,

    pub trainer_id: Uuid,

    #[serde(default)]
    pub status: ScheduleStatus,

    #[validate(range(min = 1, message = "max_participants must be at least 1"))]
    #[serde(default = "default_max_participants")]
    pub max_participants: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduleRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub schedule_type: Option<ScheduleType>,

    pub date: Option<NaiveDate>,

    pub start_time: Option<NaiveTime>,

    pub end_time: Option<NaiveTime>,

    pub trainer_id: Option<Uuid>,

    pub status: Option<ScheduleStatus>,

    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct JoinScheduleRequest {
    #[validate(required(message = "member_id is required"))]
    pub member_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinScheduleResponse {
    pub message: String,
    pub already_registered: bool,
    pub participant_count: i64,
}

/// Administrative replacement of a schedule's whole participant set
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReplaceParticipantsRequest {
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleFilter {
    /// Exact day, `YYYY-MM-DD`
    pub date: Option<NaiveDate>,
    /// Calendar month (1-12); requires `year`
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub trainer: Option<Uuid>,
    #[serde(rename = "type")]
    pub schedule_type: Option<ScheduleType>,
    pub status: Option<ScheduleStatus>,
}

fn default_max_participants() -> i32 {
    1
}

impl ScheduleFilter {
    pub fn validate(&self) -> Result<(), String> {
        self.date_windows().map(|_| ())
    }

    /// Date constraints expressed as windows; all of them must match.
    pub fn date_windows(&self) -> Result<Vec<DateWindow>, String> {
        let mut windows = Vec::new();

        if let Some(date) = self.date {
            windows.push(DateWindow::day(date));
        }

        match (self.year, self.month) {
            (Some(year), Some(month)) => {
                let window = DateWindow::month(year, month).map_err(|e| e.to_string())?;
                windows.push(window);
            }
            (None, None) => {}
            _ => return Err("month and year must be given together".to_string()),
        }

        Ok(windows)
    }
}

impl From<ScheduleWithTrainer> for ScheduleResponse {
    fn from(row: ScheduleWithTrainer) -> Self {
        let duration_minutes = row.schedule.duration_minutes();
        let can_register = row.schedule.can_register();
        let schedule = row.schedule;
        Self {
            schedule_id: schedule.schedule_id,
            title: schedule.title,
            description: schedule.description,
            schedule_type: schedule.schedule_type,
            date: schedule.date,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            duration_minutes,
            trainer_id: schedule.trainer_id,
            trainer_name: row.trainer_name,
            status: schedule.status,
            max_participants: schedule.max_participants,
            participant_count: schedule.participant_count,
            can_register,
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_requires_year() {
        let filter = ScheduleFilter {
            month: Some(6),
            ..Default::default()
        };
        assert!(filter.validate().is_err());

        let filter = ScheduleFilter {
            year: Some(2024),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_date_and_month_combine() {
        let filter = ScheduleFilter {
            date: NaiveDate::from_ymd_opt(2024, 6, 3),
            month: Some(6),
            year: Some(2024),
            ..Default::default()
        };
        let windows = filter.date_windows().unwrap();
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let filter = ScheduleFilter {
            month: Some(13),
            year: Some(2024),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_join_requires_member() {
        let req: JoinScheduleRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());

        let req = JoinScheduleRequest {
            member_id: Some(Uuid::new_v4()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateScheduleRequest = serde_json::from_value(serde_json::json!({
            "title": "Group HIIT",
            "date": "2024-06-01",
            "start_time": "18:00:00",
            "end_time": "18:50:00",
            "trainer_id": Uuid::nil(),
        }))
        .unwrap();

        assert_eq!(req.max_participants, 1);
        assert_eq!(req.status, ScheduleStatus::Scheduled);
        assert_eq!(req.schedule_type, ScheduleType::Personal);
        assert!(req.validate().is_ok());
    }
}
