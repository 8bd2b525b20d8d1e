// Application state for HTTP handlers
use crate::application::dashboard_controller::DashboardHandle;
use crate::infrastructure::http_gateway::HttpAssetGateway;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardHandle,
    pub gateway: Arc<HttpAssetGateway>,
    pub report_path: PathBuf,
}
