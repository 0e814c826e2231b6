use crate::errors::AppError;
use crate::models::{
    BoundsResponse, DailyOrdersResponse, DashboardParams, DashboardView, DateRangeQuery,
    HourRangeQuery, HourlyResponse, RecencyFrequencyResponse, SeasonSummary,
};
use crate::state::AppState;
use crate::stats::{
    build_dashboard, compute_recency_frequency, daily_orders_in, hourly_in, rf_averages,
    seasons_in,
};
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::{debug, warn};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let view = build_dashboard(&state.dataset, &DashboardParams::default())?;
    Ok(Html(render_index(&view)?))
}

pub async fn get_bounds(State(state): State<AppState>) -> Json<BoundsResponse> {
    Json(BoundsResponse {
        source: state.data_path.display().to_string(),
        min_date: state.dataset.min_date(),
        max_date: state.dataset.max_date(),
        record_count: state.dataset.len(),
    })
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardView>, AppError> {
    debug!(?params, "building dashboard view");
    let view = build_dashboard(&state.dataset, &params).inspect_err(|err| {
        warn!("rejected dashboard parameters: {err}");
    })?;
    Ok(Json(view))
}

pub async fn get_daily_orders(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DailyOrdersResponse>, AppError> {
    let (range, points) = daily_orders_in(&state.dataset, query.start, query.end)?;
    let total_orders = points
        .iter()
        .fold(0u64, |acc, day| acc.saturating_add(day.order_count));

    Ok(Json(DailyOrdersResponse {
        start: range.map(|(start, _)| start),
        end: range.map(|(_, end)| end),
        total_orders,
        points,
    }))
}

pub async fn get_seasons(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<SeasonSummary>>, AppError> {
    Ok(Json(seasons_in(&state.dataset, query.start, query.end)?))
}

pub async fn get_recency_frequency(
    State(state): State<AppState>,
) -> Json<RecencyFrequencyResponse> {
    let months = compute_recency_frequency(state.dataset.records());
    Json(RecencyFrequencyResponse {
        averages: rf_averages(&months),
        months,
    })
}

pub async fn get_hourly(
    State(state): State<AppState>,
    Query(query): Query<HourRangeQuery>,
) -> Result<Json<HourlyResponse>, AppError> {
    let (start_hour, end_hour, points) =
        hourly_in(&state.dataset, query.start_hour, query.end_hour)?;
    Ok(Json(HourlyResponse {
        start_hour,
        end_hour,
        points,
    }))
}
