// Report exporter - PDF snapshot of the rendered summary and chart
use crate::application::summary_renderer::{TOTAL_ASSETS_CLASS, TOTAL_PRICE_CLASS};
use crate::domain::page::DashboardPage;
use crate::infrastructure::chart_raster::render_png;
use crate::infrastructure::config::ReportSettings;
use crate::infrastructure::pdf_report::{ExportError, ReportDocument};
use std::path::PathBuf;

const TITLE_FONT_SIZE: f32 = 22.0;
const BODY_FONT_SIZE: f32 = 16.0;
const LEFT_MM: f32 = 14.0;
const CHART_TOP_MM: f32 = 60.0;
const CHART_WIDTH_MM: f32 = 180.0;
const CHART_HEIGHT_MM: f32 = 90.0;

#[derive(Debug, Clone)]
pub struct ReportExporter {
    settings: ReportSettings,
}

impl ReportExporter {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    pub fn output_path(&self) -> PathBuf {
        self.settings.output_dir.join(&self.settings.file_name)
    }

    /// Write the report from whatever is currently rendered on `page`.
    /// Nothing is refreshed first.
    pub fn export(&self, page: &DashboardPage) -> Result<PathBuf, ExportError> {
        tracing::info!("Exporting asset report");

        let total_assets = page.slot_value(TOTAL_ASSETS_CLASS).unwrap_or("N/A");
        let total_price = page.slot_value(TOTAL_PRICE_CLASS).unwrap_or("N/A");

        let doc = ReportDocument::new(&self.settings.title)?;
        doc.text(&self.settings.title, TITLE_FONT_SIZE, LEFT_MM, 20.0);
        doc.text(&format!("Total Assets: {}", total_assets), BODY_FONT_SIZE, LEFT_MM, 40.0);
        doc.text(&format!("Total Price: {}", total_price), BODY_FONT_SIZE, LEFT_MM, 50.0);

        match page.chart_canvas.as_ref() {
            Some(canvas) => match canvas.frame.as_ref() {
                Some(frame) => match render_png(frame, canvas.width, canvas.height) {
                    Ok(png) => doc.png_image(
                        &png,
                        LEFT_MM,
                        CHART_TOP_MM,
                        CHART_WIDTH_MM,
                        CHART_HEIGHT_MM,
                    )?,
                    Err(e) => tracing::warn!("Skipping chart image: {:#}", e),
                },
                None => tracing::debug!("Chart not drawn yet, exporting without image"),
            },
            None => tracing::debug!("Chart canvas absent, exporting without image"),
        }

        std::fs::create_dir_all(&self.settings.output_dir)?;
        let path = self.output_path();
        doc.save(&path)?;
        tracing::info!("Asset report saved to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_renderer::ChartRenderer;
    use crate::application::summary_renderer::SummaryRenderer;
    use crate::domain::asset::{AssetCountsByStation, AssetType, StationAggregate};

    fn exporter(name: &str) -> ReportExporter {
        let output_dir = std::env::temp_dir()
            .join(format!("asset-dashboard-{}-{}", std::process::id(), name));
        ReportExporter::new(ReportSettings {
            output_dir,
            ..ReportSettings::default()
        })
    }

    fn rendered_page(chart: bool) -> DashboardPage {
        let counts = AssetCountsByStation::new().with_type(
            AssetType::Furniture,
            vec![StationAggregate::new("Dodoma", 4, "1,250,000")],
        );
        let mut page = DashboardPage::new(true, chart.then_some((600, 300)), true);
        SummaryRenderer.render(&counts, &mut page);
        ChartRenderer::default().render(&counts, &mut page);
        page
    }

    #[test]
    fn test_default_file_name() {
        let exporter = exporter("name");
        assert!(exporter.output_path().ends_with("asset report.pdf"));
    }

    #[test]
    fn test_export_with_chart() {
        let exporter = exporter("with-chart");
        let path = exporter.export(&rendered_page(true)).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_export_without_canvas() {
        let exporter = exporter("no-canvas");
        let path = exporter.export(&rendered_page(false)).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_export_before_render() {
        let exporter = exporter("unrendered");
        let page = DashboardPage::new(false, None, true);
        let path = exporter.export(&page).unwrap();

        assert!(path.exists());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
