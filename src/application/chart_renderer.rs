// Chart renderer - Dual-axis stacked bar chart over station aggregates
use crate::application::formatter::{
    format_currency, format_grouped, integer_quantity, normalize_number,
};
use crate::domain::asset::{AssetCountsByStation, AssetType, StationAggregate};
use crate::domain::chart::{AxisScale, ChartFrame, Dataset, Metric};
use crate::domain::page::{ChartCanvas, DashboardPage};

/// Distinct station names in first-seen order across the fixed type order
pub fn station_labels(counts: &AssetCountsByStation) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for (_, aggregates) in counts.iter() {
        for aggregate in aggregates {
            if !labels.contains(&aggregate.station_name) {
                labels.push(aggregate.station_name.clone());
            }
        }
    }
    labels
}

fn metric_value(metric: Metric, aggregate: &StationAggregate) -> f64 {
    let quantity = integer_quantity(&aggregate.total_quantity);
    match metric {
        Metric::Quantity => quantity as f64,
        Metric::Price => normalize_number(&aggregate.total_price) * quantity as f64,
    }
}

/// Build the full frame: one dataset per (metric, type), keyed to `labels`
pub fn build_frame(counts: &AssetCountsByStation) -> ChartFrame {
    let labels = station_labels(counts);

    let mut datasets = Vec::with_capacity(Metric::ALL.len() * AssetType::ALL.len());
    for metric in Metric::ALL {
        for asset_type in AssetType::ALL {
            let aggregates = counts.stations(asset_type);
            let data = labels
                .iter()
                .map(|station| {
                    aggregates
                        .iter()
                        .find(|a| &a.station_name == station)
                        .map(|a| metric_value(metric, a))
                        .unwrap_or(0.0)
                })
                .collect();
            datasets.push(Dataset::new(asset_type, metric, data));
        }
    }

    let max_of = |metric: Metric| {
        datasets
            .iter()
            .filter(|d| d.metric == metric)
            .flat_map(|d| d.data.iter().copied())
            .fold(f64::NEG_INFINITY, f64::max)
    };
    let quantity_axis = AxisScale::fit(max_of(Metric::Quantity), Metric::Quantity.granularity());
    let price_axis = AxisScale::fit(max_of(Metric::Price), Metric::Price.granularity());

    ChartFrame {
        labels,
        datasets,
        quantity_axis,
        price_axis,
    }
}

/// Tick label on the axis a metric is plotted against
pub fn format_tick(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Quantity => format_grouped(value),
        Metric::Price => format_currency(value),
    }
}

/// Hover label for one bar segment, e.g. `Vehicles Price: TSh 90,000,000`
pub fn tooltip_label(dataset: &Dataset, value: f64) -> String {
    let formatted = format_tick(dataset.metric, value);
    if dataset.label.is_empty() {
        formatted
    } else {
        format!("{}: {}", dataset.label, formatted)
    }
}

/// A chart bound to a canvas. Updated in place on every refresh.
#[derive(Debug)]
pub struct Chart {
    frame: ChartFrame,
    revision: u64,
}

impl Chart {
    fn new(frame: ChartFrame, canvas: &mut ChartCanvas) -> Self {
        let chart = Self { frame, revision: 0 };
        chart.draw(canvas);
        chart
    }

    fn update(&mut self, frame: ChartFrame, canvas: &mut ChartCanvas) {
        self.frame.labels = frame.labels;
        self.frame.datasets = frame.datasets;
        self.frame.quantity_axis = frame.quantity_axis;
        self.frame.price_axis = frame.price_axis;
        self.revision += 1;
        self.draw(canvas);
    }

    fn draw(&self, canvas: &mut ChartCanvas) {
        canvas.frame = Some(self.frame.clone());
    }
}

#[cfg(test)]
impl Chart {
    pub fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    /// Number of in-place updates since construction
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Owns the single chart instance for the dashboard's lifetime
#[derive(Debug, Default)]
pub struct ChartRenderer {
    chart: Option<Chart>,
}

impl ChartRenderer {
    /// Build the chart on first call, update it in place afterwards. A
    /// missing canvas is logged and nothing else happens.
    pub fn render(&mut self, counts: &AssetCountsByStation, page: &mut DashboardPage) {
        let canvas = match page.chart_canvas_mut() {
            Ok(canvas) => canvas,
            Err(e) => {
                tracing::error!("Chart: {}", e);
                return;
            }
        };

        let frame = build_frame(counts);
        tracing::debug!(
            "Rendering chart: {} stations, quantity max {}, price max {}",
            frame.labels.len(),
            frame.quantity_axis.max,
            frame.price_axis.max
        );

        match self.chart.as_mut() {
            Some(chart) => chart.update(frame, canvas),
            None => self.chart = Some(Chart::new(frame, canvas)),
        }
    }
}

#[cfg(test)]
impl ChartRenderer {
    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }
}
