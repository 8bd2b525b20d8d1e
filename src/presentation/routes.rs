// Router wiring for the dashboard surface
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    asset_updated, chart_png, download_report, export_report, get_dashboard, health_check,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/chart.png", get(chart_png))
        .route("/dashboard/export", post(export_report))
        .route("/dashboard/report", get(download_report))
        .route("/events/asset-updated", post(asset_updated))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
