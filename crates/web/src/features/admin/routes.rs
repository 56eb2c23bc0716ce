use axum::{Router, middleware, routing::put};

use super::handlers::replace_participants;
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/schedules/:id/participants", put(replace_participants))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
