use axum::{Router, routing::get};

use super::handlers::{create_comment, delete_comment, get_comment, list_comments, update_comment};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route(
            "/:id",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}
