use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub page: PageSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which mount points exist on the page
#[derive(Debug, Deserialize, Clone)]
pub struct PageSettings {
    pub summary_container: bool,
    pub chart_canvas: bool,
    pub export_button: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            summary_container: true,
            chart_canvas: true,
            export_button: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    #[serde(default = "default_report_file")]
    pub file_name: String,
    #[serde(default = "default_report_title")]
    pub title: String,
}

fn default_report_file() -> String {
    "asset report.pdf".to_string()
}

fn default_report_title() -> String {
    "UAS Asset Report".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_name: default_report_file(),
            title: default_report_title(),
        }
    }
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
