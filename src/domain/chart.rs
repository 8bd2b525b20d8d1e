// Chart domain model - stacked bar datasets and axis scaling
use super::asset::AssetType;
use serde::Serialize;

/// Quantity axis maxima round up to this granularity
pub const QUANTITY_GRANULARITY: f64 = 100.0;
/// Price axis maxima round up to this granularity
pub const PRICE_GRANULARITY: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Quantity,
    Price,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Quantity, Metric::Price];

    /// Stack group name; bars of one metric stack only among themselves
    pub fn stack(self) -> &'static str {
        match self {
            Metric::Quantity => "quantity",
            Metric::Price => "price",
        }
    }

    pub fn axis_id(self) -> &'static str {
        match self {
            Metric::Quantity => "y",
            Metric::Price => "y1",
        }
    }

    pub fn axis_title(self) -> &'static str {
        match self {
            Metric::Quantity => "Quantity",
            Metric::Price => "Price (TZS)",
        }
    }

    pub fn granularity(self) -> f64 {
        match self {
            Metric::Quantity => QUANTITY_GRANULARITY,
            Metric::Price => PRICE_GRANULARITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub asset_type: AssetType,
    pub metric: Metric,
    pub background_color: String,
    pub stack: String,
    pub y_axis_id: String,
    pub data: Vec<f64>,
}

impl Dataset {
    pub fn new(asset_type: AssetType, metric: Metric, data: Vec<f64>) -> Self {
        let suffix = match metric {
            Metric::Quantity => "Quantity",
            Metric::Price => "Price",
        };
        Self {
            label: format!("{} {}", asset_type.display_name(), suffix),
            asset_type,
            metric,
            background_color: asset_type.color().to_string(),
            stack: metric.stack().to_string(),
            y_axis_id: metric.axis_id().to_string(),
            data,
        }
    }
}

/// Linear axis starting at 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisScale {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisScale {
    /// Smallest multiple of `granularity` covering `max_value`, ten ticks.
    /// An empty or non-positive maximum yields a zero-height axis.
    pub fn fit(max_value: f64, granularity: f64) -> Self {
        let max_value = if max_value.is_finite() { max_value.max(0.0) } else { 0.0 };
        let max = (max_value / granularity).ceil() * granularity;
        let step = (max / 10.0).ceil();
        Self { min: 0.0, max, step }
    }

    /// Tick values from `min` to `max` inclusive
    pub fn ticks(&self) -> Vec<f64> {
        if self.step <= 0.0 {
            return vec![self.min];
        }
        let mut ticks = Vec::new();
        let mut value = self.min;
        while value < self.max {
            ticks.push(value);
            value += self.step;
        }
        ticks.push(self.max);
        ticks
    }
}

/// Everything needed to draw the chart once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub quantity_axis: AxisScale,
    pub price_axis: AxisScale,
}

impl ChartFrame {
    pub fn axis(&self, metric: Metric) -> &AxisScale {
        match metric {
            Metric::Quantity => &self.quantity_axis,
            Metric::Price => &self.price_axis,
        }
    }

    pub fn datasets_for(&self, metric: Metric) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().filter(move |d| d.metric == metric)
    }
}
