use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/habits", get(handlers::list_habits))
        .route("/api/habits/:id", get(handlers::get_habit))
        .route("/api/snapshot", put(handlers::replace_snapshot))
        .route("/api/analyze", post(handlers::analyze))
        .with_state(state)
}
