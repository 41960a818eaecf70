//! Likes distribution histogram with density overlay

use crate::{ColorScheme, GraphConfig, GraphRenderer};
use chatviz_common::Result;
use chatviz_config::GraphSettings;
use plotters::prelude::*;
use serde::Serialize;
use std::path::Path;

/// One histogram bin; the last bin includes its right edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Binned like counts plus a KDE curve in count units
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LikesHistogram {
    pub bins: Vec<HistogramBin>,
    pub bin_width: f64,
    /// (like count, expected rows per bin) pairs; empty when undefined
    pub kde: Vec<(f64, f64)>,
}

/// Likes histogram renderer
#[derive(Debug, Default)]
pub struct LikesDistributionGraph {
    pub data: LikesHistogram,
}

impl LikesDistributionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chart configuration: orange bars and density line
    pub fn default_config(settings: &GraphSettings) -> GraphConfig {
        GraphConfig::from_settings(settings)
            .titled(
                "Distribution of Likes",
                Some("Number of Likes"),
                Some("Frequency"),
            )
            .with_color_scheme(ColorScheme::Custom(vec!["#FFA500".to_string()]))
    }

    pub fn set_data(&mut self, data: LikesHistogram) {
        self.data = data;
    }

    fn x_range(&self) -> (f64, f64) {
        match (self.data.bins.first(), self.data.bins.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0.0, 1.0),
        }
    }

    /// Y maximum over bars and curve with 10% headroom
    fn y_max(&self) -> f64 {
        let bars = self.data.bins.iter().map(|b| b.count as f64);
        let curve = self.data.kde.iter().map(|&(_, y)| y);
        let max = bars.chain(curve).fold(0.0, f64::max);
        (max * 1.1).max(1.0)
    }
}

impl GraphRenderer for LikesDistributionGraph {
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.apply_styling(&root, config)?;

        let (x_min, x_max) = self.x_range();
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, config.style.title_font.to_font())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_min..x_max, 0f64..self.y_max())?;

        let y_formatter = |y: &f64| format!("{y:.0}");
        let grid_color = config
            .style
            .grid
            .color
            .as_deref()
            .map_or(RGBColor(229, 229, 229), |c| self.parse_color(c));

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""))
            .y_label_formatter(&y_formatter)
            .label_style(config.style.axis_font.to_font())
            .axis_desc_style(config.style.label_font.to_font())
            .light_line_style(&grid_color)
            .draw()?;

        let color = self.primary_color(config);

        chart.draw_series(self.data.bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                color.mix(0.6).filled(),
            )
        }))?;
        chart.draw_series(self.data.bins.iter().filter(|bin| bin.count > 0).map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                color.stroke_width(1),
            )
        }))?;

        if !self.data.kde.is_empty() {
            chart.draw_series(LineSeries::new(
                self.data.kde.iter().copied(),
                color.stroke_width(2),
            ))?;
        }

        root.present()?;
        tracing::info!("Successfully rendered likes distribution chart to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "likes_distribution"
    }
}
