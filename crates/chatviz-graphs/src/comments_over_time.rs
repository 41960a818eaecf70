//! Comments over time line chart implementation

use crate::{ColorScheme, GraphConfig, GraphRenderer};
use chatviz_common::Result;
use chatviz_config::GraphSettings;
use chrono::{DateTime, Utc};
use plotters::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Data point for comments at one publish timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeCountDataPoint {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

/// Comments over time line chart renderer
#[derive(Debug, Default)]
pub struct CommentsOverTimeGraph {
    /// Data points sorted by timestamp
    pub data: Vec<TimeCountDataPoint>,
}

impl CommentsOverTimeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chart configuration: blue line, time axis
    pub fn default_config(settings: &GraphSettings) -> GraphConfig {
        GraphConfig::from_settings(settings)
            .titled(
                "Comments Over Time",
                Some("Published Time"),
                Some("Number of Comments"),
            )
            .with_color_scheme(ColorScheme::Custom(vec!["#0000FF".to_string()]))
    }

    /// Set data, sorted by timestamp
    pub fn set_data(&mut self, mut data: Vec<TimeCountDataPoint>) {
        data.sort_by_key(|point| point.timestamp);
        self.data = data;
    }

    fn points(&self) -> Vec<(f64, f64)> {
        self.data
            .iter()
            .map(|p| (to_seconds(p.timestamp), p.count as f64))
            .collect()
    }

    /// X range in epoch seconds, padded by 5%, at least one minute wide
    fn time_range(&self) -> (f64, f64) {
        let (Some(first), Some(last)) = (self.data.first(), self.data.last()) else {
            return (0.0, 3600.0);
        };

        let (start, end) = (to_seconds(first.timestamp), to_seconds(last.timestamp));
        let padding = ((end - start) * 0.05).max(30.0);
        (start - padding, end + padding)
    }

    /// Y maximum with 10% headroom
    fn max_count(&self) -> f64 {
        let max = self.data.iter().map(|p| p.count).max().unwrap_or(0);
        (max as f64 * 1.1).max(1.0)
    }
}

fn to_seconds(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp_millis() as f64 / 1000.0
}

fn format_seconds(seconds: f64) -> String {
    DateTime::from_timestamp(seconds.round() as i64, 0)
        .map(|ts| ts.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

impl GraphRenderer for CommentsOverTimeGraph {
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.apply_styling(&root, config)?;

        let (x_min, x_max) = self.time_range();
        let y_max = self.max_count();

        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, config.style.title_font.to_font())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        let x_formatter = |x: &f64| format_seconds(*x);
        let y_formatter = |y: &f64| format!("{y:.0}");
        let grid_color = config
            .style
            .grid
            .color
            .as_deref()
            .map_or(RGBColor(229, 229, 229), |c| self.parse_color(c));

        {
            let mut mesh = chart.configure_mesh();
            mesh.x_desc(config.x_label.as_deref().unwrap_or(""))
                .y_desc(config.y_label.as_deref().unwrap_or(""))
                .x_labels(8)
                .x_label_formatter(&x_formatter)
                .y_label_formatter(&y_formatter)
                .label_style(config.style.axis_font.to_font())
                .axis_desc_style(config.style.label_font.to_font())
                .light_line_style(&grid_color);
            if !config.style.grid.show_x {
                mesh.disable_x_mesh();
            }
            if !config.style.grid.show_y {
                mesh.disable_y_mesh();
            }
            mesh.draw()?;
        }

        let color = self.primary_color(config);
        let points = self.points();

        chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
        chart.draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))?;

        root.present()?;
        tracing::info!("Successfully rendered comments over time chart to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "comments_over_time"
    }
}
