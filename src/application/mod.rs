// Application layer - Rendering use cases and the dashboard controller
pub mod asset_gateway;
pub mod chart_renderer;
pub mod dashboard_controller;
pub mod formatter;
pub mod report_exporter;
pub mod summary_renderer;
