// Dashboard page model - the mount points renderers write into
use super::chart::ChartFrame;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub const SUMMARY_CONTAINER_ID: &str = "assetCountsContainer";
pub const CHART_CANVAS_ID: &str = "assetChart";
pub const EXPORT_BUTTON_ID: &str = "exportPdfButton";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("{0} element not found")]
    MissingElement(&'static str),
}

/// One badge in the summary container, e.g. `Total Assets: 12`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySlot {
    pub class: String,
    pub label: String,
    pub value: String,
}

impl SummarySlot {
    pub fn new(class: &str, label: &str, value: String) -> Self {
        Self {
            class: class.to_string(),
            label: label.to_string(),
            value,
        }
    }

    pub fn text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryContainer {
    pub slots: Vec<SummarySlot>,
}

impl SummaryContainer {
    /// Replace the container's content wholesale
    pub fn set_slots(&mut self, slots: Vec<SummarySlot>) {
        self.slots = slots;
    }

    pub fn slot(&self, class: &str) -> Option<&SummarySlot> {
        self.slots.iter().find(|s| s.class == class)
    }
}

/// Drawing surface for the chart. Holds the last frame drawn into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartCanvas {
    pub width: u32,
    pub height: u32,
    pub frame: Option<ChartFrame>,
}

impl ChartCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardPage {
    pub summary_container: Option<SummaryContainer>,
    pub chart_canvas: Option<ChartCanvas>,
    pub export_button: bool,
}

impl DashboardPage {
    pub fn new(summary: bool, chart: Option<(u32, u32)>, export_button: bool) -> Self {
        Self {
            summary_container: summary.then(SummaryContainer::default),
            chart_canvas: chart.map(|(w, h)| ChartCanvas::new(w, h)),
            export_button,
        }
    }

    pub fn summary_container_mut(&mut self) -> Result<&mut SummaryContainer, PageError> {
        self.summary_container
            .as_mut()
            .ok_or(PageError::MissingElement(SUMMARY_CONTAINER_ID))
    }

    pub fn chart_canvas_mut(&mut self) -> Result<&mut ChartCanvas, PageError> {
        self.chart_canvas
            .as_mut()
            .ok_or(PageError::MissingElement(CHART_CANVAS_ID))
    }

    /// Text of the summary slot with the given class, if rendered
    pub fn slot_value(&self, class: &str) -> Option<&str> {
        self.summary_container
            .as_ref()
            .and_then(|c| c.slot(class))
            .map(|s| s.value.as_str())
    }
}

/// Read-only copy of the page published after each refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub ready: bool,
    pub rendered_at: DateTime<Utc>,
    pub summary: Option<SummaryContainer>,
    pub chart: Option<ChartCanvas>,
    pub export_enabled: bool,
}

impl PageSnapshot {
    pub fn capture(page: &DashboardPage, ready: bool, export_enabled: bool) -> Self {
        Self {
            ready,
            rendered_at: Utc::now(),
            summary: page.summary_container.clone(),
            chart: page.chart_canvas.clone(),
            export_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_elements() {
        let mut page = DashboardPage::new(false, None, false);
        assert_eq!(
            page.summary_container_mut().unwrap_err(),
            PageError::MissingElement(SUMMARY_CONTAINER_ID)
        );
        assert_eq!(
            page.chart_canvas_mut().unwrap_err().to_string(),
            "assetChart element not found"
        );
        assert_eq!(page.slot_value("total-price"), None);
    }

    #[test]
    fn test_slot_lookup() {
        let mut page = DashboardPage::new(true, Some((800, 400)), true);
        page.summary_container_mut()
            .unwrap()
            .set_slots(vec![SummarySlot::new("total-assets-count", "Total Assets", "7".to_string())]);

        assert_eq!(page.slot_value("total-assets-count"), Some("7"));
        assert_eq!(
            page.summary_container.as_ref().unwrap().slots[0].text(),
            "Total Assets: 7"
        );
    }
}
