use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route("/api/toggle", post(handlers::toggle_activity))
        .route("/api/pomodoros", post(handlers::set_pomodoros))
        .route("/api/weight", post(handlers::set_weight))
        .route("/api/save", post(handlers::save_day))
        .route("/api/stats", get(handlers::get_stats))
        .with_state(state)
}
