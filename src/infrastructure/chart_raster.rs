// Chart rasterizer - Draws a chart frame into a PNG snapshot
use crate::application::chart_renderer::format_tick;
use crate::domain::chart::{AxisScale, ChartFrame, Metric};
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::register_font;
use std::io::Cursor;
use std::ops::Range;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

const MARGIN: u32 = 10;
const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 70;
const RIGHT_LABEL_AREA: u32 = 120;
const LABEL_SIZE: u32 = 12;
const LEGEND_SIZE: u32 = 10;
/// Share of a station slot taken by its two bars
const BAR_FILL: f64 = 0.7;

const GRID: RGBColor = RGBColor(0xE0, 0xE0, 0xE0);
const AXIS: RGBColor = RGBColor(0x55, 0x55, 0x55);

/// Parse `#RRGGBB`, falling back to grey
pub fn parse_hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return RGBColor(0x99, 0x99, 0x99);
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0x99);
    RGBColor(channel(0), channel(2), channel(4))
}

/// Text rendering needs the embedded face registered once per process
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if !ok {
        anyhow::bail!("Embedded chart font could not be loaded");
    }
    Ok(())
}

/// Rasterize `frame` at `width` x `height` and return PNG bytes
pub fn render_png(frame: &ChartFrame, width: u32, height: u32) -> Result<Vec<u8>> {
    ensure_font()?;

    let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_frame(&root, frame)?;
        root.present()
            .map_err(|e| anyhow::anyhow!("Failed to present chart bitmap: {}", e))?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .context("Chart bitmap has unexpected size")?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .context("Failed to encode chart PNG")?;
    Ok(png)
}

fn draw_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow::anyhow!("Failed to draw chart: {:?}", e)
}

/// Horizontal units per station slot; bars are placed in whole units
const SLOT: u32 = 1000;

/// Drawable value range for an axis; a zero-height axis still gets one step
fn value_range(axis: &AxisScale, metric: Metric) -> Range<i64> {
    let top = if axis.max > axis.min {
        axis.max
    } else {
        axis.min + metric.granularity()
    };
    axis.min.round() as i64..top.round() as i64
}

fn key_points(axis: &AxisScale) -> Vec<i64> {
    axis.ticks().into_iter().map(|t| t.round() as i64).collect()
}

type Bars = Vec<(String, RGBColor, Vec<Rectangle<(u32, i64)>>)>;

/// Stacked rectangles for one metric, one series per dataset. Quantity bars
/// sit on the left half of a station slot, price bars on the right.
fn stacked_bars(frame: &ChartFrame, metric: Metric) -> Bars {
    let bar = (SLOT as f64 * BAR_FILL / 2.0) as u32;
    let pad = (SLOT - 2 * bar) / 2;
    let offset = match metric {
        Metric::Quantity => 0,
        Metric::Price => bar,
    };
    let mut bases = vec![0.0; frame.labels.len()];

    frame
        .datasets_for(metric)
        .map(|dataset| {
            let color = parse_hex_color(&dataset.background_color);
            let rects = bases
                .iter_mut()
                .enumerate()
                .filter_map(|(index, base)| {
                    let value = dataset.data.get(index).copied().unwrap_or(0.0);
                    if value <= 0.0 {
                        return None;
                    }
                    let left = index as u32 * SLOT + pad + offset;
                    let top = *base + value;
                    let rect = Rectangle::new(
                        [
                            (left, base.round() as i64),
                            (left + bar, top.round() as i64),
                        ],
                        color.filled(),
                    );
                    *base = top;
                    Some(rect)
                })
                .collect();
            (dataset.label.clone(), color, rects)
        })
        .collect()
}

fn draw_frame(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    frame: &ChartFrame,
) -> Result<()> {
    root.fill(&WHITE).map_err(draw_err)?;

    let width = frame.labels.len().max(1) as u32 * SLOT;
    let centers = || -> Vec<u32> {
        (0..frame.labels.len() as u32)
            .map(|i| i * SLOT + SLOT / 2)
            .collect()
    };

    let quantity = &frame.quantity_axis;
    let price = &frame.price_axis;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .right_y_label_area_size(RIGHT_LABEL_AREA)
        .build_cartesian_2d(
            (0..width).with_key_points(centers()),
            value_range(quantity, Metric::Quantity).with_key_points(key_points(quantity)),
        )
        .map_err(draw_err)?
        .set_secondary_coord(
            (0..width).with_key_points(centers()),
            value_range(price, Metric::Price).with_key_points(key_points(price)),
        );

    let station = |x: &u32| {
        frame
            .labels
            .get((*x / SLOT) as usize)
            .cloned()
            .unwrap_or_default()
    };
    let quantity_tick = |v: &i64| format_tick(Metric::Quantity, *v as f64);
    let price_tick = |v: &i64| format_tick(Metric::Price, *v as f64);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(GRID)
        .axis_style(AXIS)
        .label_style((FONT_FAMILY, LABEL_SIZE))
        .x_label_formatter(&station)
        .y_label_formatter(&quantity_tick)
        .x_desc("Station")
        .y_desc(Metric::Quantity.axis_title())
        .draw()
        .map_err(draw_err)?;

    chart
        .configure_secondary_axes()
        .axis_style(AXIS)
        .label_style((FONT_FAMILY, LABEL_SIZE))
        .y_label_formatter(&price_tick)
        .y_desc(Metric::Price.axis_title())
        .draw()
        .map_err(draw_err)?;

    for (label, color, rects) in stacked_bars(frame, Metric::Quantity) {
        chart
            .draw_series(rects)
            .map_err(draw_err)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled()));
    }
    for (label, color, rects) in stacked_bars(frame, Metric::Price) {
        chart
            .draw_secondary_series(rects)
            .map_err(draw_err)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT_FAMILY, LEGEND_SIZE))
        .background_style(WHITE.mix(0.8))
        .border_style(GRID)
        .draw()
        .map_err(draw_err)?;

    Ok(())
}
