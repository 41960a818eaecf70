//! Comments per day vertical bar chart implementation

use crate::renderer::draw_no_data;
use crate::{ColorScheme, GraphConfig, GraphRenderer};
use chatviz_common::Result;
use chatviz_config::GraphSettings;
use chrono::NaiveDate;
use plotters::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Data point for comments on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCountDataPoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// Comments per day bar chart renderer
#[derive(Debug)]
pub struct CommentsPerDayGraph {
    /// Data points sorted by date
    pub data: Vec<DayCountDataPoint>,
    /// Date label format
    pub date_format: String,
}

impl CommentsPerDayGraph {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }

    /// Chart configuration: purple bars, one per day
    pub fn default_config(settings: &GraphSettings) -> GraphConfig {
        GraphConfig::from_settings(settings)
            .titled("Comments Per Day", Some("Date"), Some("Number of Comments"))
            .with_color_scheme(ColorScheme::Custom(vec!["#800080".to_string()]))
    }

    /// Set data, sorted by date
    pub fn set_data(&mut self, mut data: Vec<DayCountDataPoint>) {
        data.sort_by_key(|point| point.date);
        self.data = data;
    }

    fn max_count(&self) -> u64 {
        let max = self.data.iter().map(|p| p.count).max().unwrap_or(0);
        max.saturating_add(max / 10).saturating_add(1)
    }

    /// Date label for a bar slot
    fn label_for_slot(&self, slot: usize) -> String {
        self.data
            .get(slot)
            .map(|p| p.date.format(&self.date_format).to_string())
            .unwrap_or_default()
    }
}

impl Default for CommentsPerDayGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for CommentsPerDayGraph {
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.apply_styling(&root, config)?;

        let num_days = self.data.len().max(1);
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, config.style.title_font.to_font())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(-0.5f64..(num_days as f64 - 0.5), 0u64..self.max_count())?;

        let x_formatter = |x: &f64| {
            let slot = x.round();
            if (x - slot).abs() < 1e-6 && slot >= 0.0 {
                self.label_for_slot(slot as usize)
            } else {
                String::new()
            }
        };

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""))
            .x_labels(num_days)
            .x_label_formatter(&x_formatter)
            .disable_x_mesh()
            .label_style(config.style.axis_font.to_font())
            .axis_desc_style(config.style.label_font.to_font())
            .draw()?;

        if self.data.is_empty() {
            draw_no_data(&chart.plotting_area().strip_coord_spec(), config)?;
        } else {
            let color = self.primary_color(config);
            chart.draw_series(self.data.iter().enumerate().map(|(slot, point)| {
                let x = slot as f64;
                Rectangle::new([(x - 0.4, 0), (x + 0.4, point.count)], color.filled())
            }))?;
        }

        root.present()?;
        tracing::info!("Successfully rendered comments per day chart to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "comments_per_day"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::font_available;
    use tempfile::tempdir;

    fn day(d: u32, count: u64) -> DayCountDataPoint {
        DayCountDataPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            count,
        }
    }

    #[test]
    fn test_default_config() {
        let config = CommentsPerDayGraph::default_config(&GraphSettings::default());
        assert_eq!(config.title, "Comments Per Day");
        assert_eq!(config.x_label.as_deref(), Some("Date"));
        assert_eq!(
            CommentsPerDayGraph::new().primary_color(&config),
            RGBColor(128, 0, 128)
        );
    }

    #[test]
    fn test_set_data_sorts_and_labels() {
        let mut graph = CommentsPerDayGraph::new();
        graph.set_data(vec![day(3, 1), day(1, 4)]);

        assert_eq!(graph.label_for_slot(0), "2024-01-01");
        assert_eq!(graph.label_for_slot(1), "2024-01-03");
        assert_eq!(graph.label_for_slot(2), "");
        assert_eq!(graph.max_count(), 5);

        graph.set_data(vec![day(1, u64::MAX)]);
        assert_eq!(graph.max_count(), u64::MAX);
    }

    #[test]
    fn test_render_to_file() {
        if !font_available() {
            return;
        }
        let mut graph = CommentsPerDayGraph::new();
        graph.set_data(vec![day(1, 3), day(2, 1)]);
        let config = CommentsPerDayGraph::default_config(&GraphSettings::default());

        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("comments_per_day_livechat.png");
        graph.render_to_file(&config, &file_path).unwrap();
        assert!(file_path.exists());
    }

    #[test]
    fn test_render_empty_data() {
        if !font_available() {
            return;
        }
        let graph = CommentsPerDayGraph::new();
        let config = CommentsPerDayGraph::default_config(&GraphSettings::default());

        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("empty.png");
        graph.render_to_file(&config, &file_path).unwrap();
        assert!(file_path.exists());
    }
}
