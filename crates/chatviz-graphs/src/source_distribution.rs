//! Source distribution pie chart implementation

use crate::renderer::draw_no_data;
use crate::{ColorScheme, GraphConfig, GraphRenderer};
use chatviz_common::{ChatvizError, Result};
use chatviz_config::GraphSettings;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use std::path::Path;

/// Share of comments coming from one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceShare {
    pub source: String,
    pub count: u64,
    /// Percentage of all comments with a source
    pub percentage: f64,
}

/// One pie wedge in degrees, counter-clockwise from the positive x axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct Wedge {
    start: f64,
    sweep: f64,
}

impl Wedge {
    fn mid(self) -> f64 {
        self.start + self.sweep / 2.0
    }
}

/// Source distribution pie chart renderer
#[derive(Debug)]
pub struct SourceDistributionGraph {
    pub data: Vec<SourceShare>,
    /// Angle of the first wedge's leading edge, in degrees
    pub start_angle: f64,
}

impl SourceDistributionGraph {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            start_angle: 140.0,
        }
    }

    /// Chart configuration: square canvas, pastel wedges
    pub fn default_config(settings: &GraphSettings) -> GraphConfig {
        GraphConfig::from_settings(settings)
            .titled("Distribution of Sources", None, None)
            .with_color_scheme(ColorScheme::Pastel)
            .with_dimensions(800, 800)
    }

    pub fn set_data(&mut self, data: Vec<SourceShare>) {
        self.data = data;
    }

    /// Wedges laid out counter-clockwise from the start angle
    fn wedges(&self) -> Vec<Wedge> {
        let total: u64 = self.data.iter().map(|s| s.count).sum();
        if total == 0 {
            return Vec::new();
        }

        let mut start = self.start_angle;
        self.data
            .iter()
            .map(|share| {
                let sweep = 360.0 * share.count as f64 / total as f64;
                let wedge = Wedge { start, sweep };
                start += sweep;
                wedge
            })
            .collect()
    }
}

impl Default for SourceDistributionGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Point at `radius` along `degrees`, in screen coordinates
fn polar(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let theta = degrees.to_radians();
    (
        center.0 + (radius * theta.cos()).round() as i32,
        center.1 - (radius * theta.sin()).round() as i32,
    )
}

fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

impl GraphRenderer for SourceDistributionGraph {
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.apply_styling(&root, config)?;

        let area = root.titled(&config.title, config.style.title_font.to_font())?;
        let wedges = self.wedges();
        if wedges.is_empty() {
            draw_no_data(&area, config)?;
            root.present()?;
            return Ok(());
        }

        let colors = self.get_colors(&config.style.color_scheme);
        if colors.is_empty() {
            return Err(ChatvizError::graph("Color scheme has no colors"));
        }

        let (width, height) = area.dim_in_pixel();
        let center = ((width / 2) as i32, (height / 2) as i32);
        let radius = f64::from(width.min(height)) * 0.35;

        for (i, wedge) in wedges.iter().enumerate() {
            let steps = (wedge.sweep.ceil() as usize).max(2);
            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            points.extend((0..=steps).map(|step| {
                polar(
                    center,
                    radius,
                    wedge.start + wedge.sweep * step as f64 / steps as f64,
                )
            }));
            area.draw(&Polygon::new(points, colors[i % colors.len()].filled()))?;
        }

        let text_font = config.style.label_font.to_font();
        for (share, wedge) in self.data.iter().zip(&wedges) {
            let mid = wedge.mid();

            let pct_style = text_font
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw(&Text::new(
                format_percentage(share.percentage),
                polar(center, radius * 0.6, mid),
                pct_style,
            ))?;

            let side = if mid.to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            let label_style = text_font.color(&BLACK).pos(Pos::new(side, VPos::Center));
            area.draw(&Text::new(
                share.source.clone(),
                polar(center, radius * 1.1, mid),
                label_style,
            ))?;
        }

        root.present()?;
        tracing::info!("Successfully rendered source distribution chart to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "source_distribution"
    }
}
