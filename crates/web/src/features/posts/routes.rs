use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{add_comment, create_post, delete_post, get_post, list_posts, update_post};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/comments", post(add_comment))
}
