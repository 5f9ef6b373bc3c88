//! Bar chart rendering.
//!
//! Draws the per-position frequency table as a bar chart with [`plotters`].
//! The output file extension picks the backend: `.svg` uses the SVG backend,
//! `.png` uses the bitmap backend.
//!
//! No font rasterizer is compiled in, so PNG charts carry bars and axes but
//! no text. SVG charts keep all labels because the SVG backend emits text
//! elements directly.

use crate::config::ChartConfig;
use crate::tally::{FrequencyTable, BLOCK_SIZE};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Unsupported chart format '{0}' (expected .svg or .png)")]
    UnsupportedFormat(String),

    #[error("Invalid colour '{0}' (expected #rrggbb)")]
    InvalidColor(String),
}

type Result<T> = core::result::Result<T, ChartError>;

/// Parse a `#rrggbb` hex colour.
pub fn parse_color(hex: &str) -> Result<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChartError::InvalidColor(hex.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| ChartError::InvalidColor(hex.to_string()))
    };

    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Render the frequency table as a bar chart at `config.output`.
pub fn render_bar_chart(table: &FrequencyTable, config: &ChartConfig) -> Result<()> {
    let output = config.output.as_path();
    let color = parse_color(&config.color)?;
    let size = (config.width, config.height);

    let extension = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    debug!(
        "Rendering {}x{} {} chart to {}",
        size.0,
        size.1,
        extension,
        output.display()
    );

    match extension.as_str() {
        "svg" => draw_bars(
            SVGBackend::new(output, size).into_drawing_area(),
            table,
            config,
            color,
        )?,
        "png" => draw_bars(
            BitMapBackend::new(output, size).into_drawing_area(),
            table,
            config,
            color,
        )?,
        _ => return Err(ChartError::UnsupportedFormat(display_name(output))),
    }

    info!("Chart written to {}", output.display());
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn draw_bars<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    table: &FrequencyTable,
    config: &ChartConfig,
    color: RGBColor,
) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    // Headroom above the tallest bar; an empty table still gets a 0..2 axis.
    let y_max = table.max_count().max(1) + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(config.title.as_str(), ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((0u32..BLOCK_SIZE as u32).into_segmented(), 0u64..y_max)
        .map_err(|e| ChartError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .axis_desc_style(("sans-serif", 20))
        .label_style(("sans-serif", 16))
        .x_labels(BLOCK_SIZE)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(position) | SegmentValue::Exact(position) => {
                position.to_string()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(10)
                .data(
                    table
                        .observed()
                        .map(|(position, count)| (position as u32, count)),
                ),
        )
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    Ok(())
}
