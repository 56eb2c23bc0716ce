use axum::extract::FromRef;
use gym_storage::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub upcoming_horizon_days: u64,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
