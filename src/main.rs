// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;

use crate::application::dashboard_controller::{self, DashboardController};
use crate::application::report_exporter::ReportExporter;
use crate::domain::page::DashboardPage;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_gateway::HttpAssetGateway;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "asset_dashboard=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create gateway (infrastructure layer)
    let gateway = Arc::new(HttpAssetGateway::new(
        config.gateway.base_url.clone(),
        Duration::from_secs(config.gateway.timeout_secs),
    )?);

    // Create the page and its controller (application layer)
    let page = DashboardPage::new(
        config.page.summary_container,
        config
            .page
            .chart_canvas
            .then_some((config.chart.width, config.chart.height)),
        config.page.export_button,
    );
    let exporter = ReportExporter::new(config.report.clone());
    let report_path = exporter.output_path();
    let dashboard =
        dashboard_controller::spawn(DashboardController::new(gateway.clone(), page, exporter));

    // Create application state
    let state = Arc::new(AppState {
        dashboard,
        gateway,
        report_path,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting asset dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
