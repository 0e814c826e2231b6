use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/bounds", get(handlers::get_bounds))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/daily-orders", get(handlers::get_daily_orders))
        .route("/api/seasons", get(handlers::get_seasons))
        .route("/api/recency-frequency", get(handlers::get_recency_frequency))
        .route("/api/hourly", get(handlers::get_hourly))
        .with_state(state)
}
