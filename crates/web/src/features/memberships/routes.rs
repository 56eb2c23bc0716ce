use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    consume_session, create_membership, delete_membership, get_membership, list_memberships,
    update_membership,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_memberships).post(create_membership))
        .route(
            "/:id",
            get(get_membership)
                .put(update_membership)
                .delete(delete_membership),
        )
        .route("/:id/consume-session", post(consume_session))
}
