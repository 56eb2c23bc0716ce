use axum::{Router, routing::get};

use super::handlers::{
    create_member, delete_member, get_member, list_member_posts, list_member_schedules,
    list_members, update_member,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/:id/posts", get(list_member_posts))
        .route("/:id/schedules", get(list_member_schedules))
}
