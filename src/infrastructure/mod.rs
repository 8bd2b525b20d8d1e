// Infrastructure layer - External dependencies and adapters
pub mod chart_raster;
pub mod config;
pub mod http_gateway;
pub mod pdf_report;
