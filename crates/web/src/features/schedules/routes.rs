use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    create_schedule, delete_schedule, get_schedule, join_schedule, list_schedules,
    list_today_schedules, list_upcoming_schedules, update_schedule,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route("/today", get(list_today_schedules))
        .route("/upcoming", get(list_upcoming_schedules))
        .route(
            "/:id",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
        .route("/:id/join", post(join_schedule))
}
