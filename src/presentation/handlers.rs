// HTTP request handlers
use crate::application::chart_renderer::{format_tick, tooltip_label};
use crate::application::dashboard_controller::TriggerError;
use crate::domain::chart::{ChartFrame, Metric};
use crate::domain::page::PageSnapshot;
use crate::infrastructure::chart_raster::render_png;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct AxisTicks {
    pub quantity_title: &'static str,
    pub quantity: Vec<String>,
    pub price_title: &'static str,
    pub price: Vec<String>,
}

/// Hover text for each bar segment of one dataset, indexed like the labels
#[derive(Serialize)]
pub struct DatasetTooltips {
    pub dataset: String,
    pub segments: Vec<String>,
}

#[derive(Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub snapshot: PageSnapshot,
    pub ticks: Option<AxisTicks>,
    pub tooltips: Vec<DatasetTooltips>,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub path: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn axis_ticks(frame: &ChartFrame) -> AxisTicks {
    let format_axis = |metric: Metric| -> Vec<String> {
        frame
            .axis(metric)
            .ticks()
            .into_iter()
            .map(|v| format_tick(metric, v))
            .collect()
    };
    AxisTicks {
        quantity_title: Metric::Quantity.axis_title(),
        quantity: format_axis(Metric::Quantity),
        price_title: Metric::Price.axis_title(),
        price: format_axis(Metric::Price),
    }
}

fn segment_tooltips(frame: &ChartFrame) -> Vec<DatasetTooltips> {
    frame
        .datasets
        .iter()
        .map(|dataset| DatasetTooltips {
            dataset: dataset.label.clone(),
            segments: dataset
                .data
                .iter()
                .map(|&value| tooltip_label(dataset, value))
                .collect(),
        })
        .collect()
}

/// Current rendered page with formatted axis ticks and bar tooltips
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let snapshot = state.dashboard.snapshot();
    let frame = snapshot.chart.as_ref().and_then(|canvas| canvas.frame.as_ref());
    let ticks = frame.map(axis_ticks);
    let tooltips = frame.map(segment_tooltips).unwrap_or_default();

    Json(DashboardView {
        snapshot,
        ticks,
        tooltips,
    })
}

/// Raster snapshot of the chart canvas
pub async fn chart_png(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.dashboard.snapshot();
    let Some(canvas) = snapshot.chart else {
        return (StatusCode::NOT_FOUND, "chart canvas not present").into_response();
    };
    let Some(frame) = canvas.frame else {
        return (StatusCode::NOT_FOUND, "chart not rendered yet").into_response();
    };

    match render_png(&frame, canvas.width, canvas.height) {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => {
            tracing::error!("Error rasterizing chart: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Export button: write the PDF report from the rendered page
pub async fn export_report(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.export().await {
        Ok(path) => Json(ExportResponse {
            path: path.display().to_string(),
        })
        .into_response(),
        Err(TriggerError::Unbound) => {
            (StatusCode::NOT_FOUND, TriggerError::Unbound.to_string()).into_response()
        }
        Err(TriggerError::Stopped) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        Err(e @ TriggerError::Export(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Download the last exported report
pub async fn download_report(State(state): State<Arc<AppState>>) -> Response {
    let bytes = match tokio::fs::read(&state.report_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "no report exported yet").into_response();
        }
        Err(e) => {
            tracing::error!("Error reading report {}: {}", state.report_path.display(), e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let file_name = state
        .report_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&file_name)
    );

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Host notification that inventory data changed
pub async fn asset_updated(State(state): State<Arc<AppState>>) -> StatusCode {
    let receivers = state.gateway.publish_asset_updated();
    tracing::debug!("assetUpdated relayed to {} subscriber(s)", receivers);
    StatusCode::ACCEPTED
}
