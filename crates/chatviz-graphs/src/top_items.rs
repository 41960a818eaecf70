//! Top authors/comments horizontal bar chart implementation

use crate::renderer::{draw_no_data, truncate_label};
use crate::{ColorScheme, GraphConfig, GraphRenderer};
use chatviz_common::Result;
use chatviz_config::GraphSettings;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use std::path::Path;

/// Data point for a ranked author or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItemDataPoint {
    /// Author name or comment text
    pub name: String,
    /// Comment count or like count
    pub count: u64,
}

/// Top authors/comments horizontal bar chart renderer
#[derive(Debug)]
pub struct TopItemsGraph {
    /// Data points sorted by count (descending)
    pub data: Vec<TopItemDataPoint>,
    /// Maximum number of items to display
    pub limit: usize,
    /// Longest label drawn on the category axis
    pub max_label_chars: usize,
    /// Log name of the chart
    pub chart_type: &'static str,
}

impl TopItemsGraph {
    /// Create for top authors
    pub fn for_authors(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
            max_label_chars: 24,
            chart_type: "author_distribution",
        }
    }

    /// Create for top comments
    pub fn for_comments(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
            max_label_chars: 48,
            chart_type: "top_comments",
        }
    }

    /// Chart configuration for the author ranking
    pub fn authors_config(settings: &GraphSettings) -> GraphConfig {
        let mut config = GraphConfig::from_settings(settings)
            .titled(
                &format!("Top {} Authors by Number of Comments", settings.top_n),
                Some("Number of Comments"),
                Some("Author"),
            )
            .with_color_scheme(ColorScheme::Deep);
        config.style.margins.left = 200;
        config
    }

    /// Chart configuration for the comment ranking
    pub fn comments_config(settings: &GraphSettings) -> GraphConfig {
        let mut config = GraphConfig::from_settings(settings)
            .titled(
                &format!("Top {} Comments by Likes", settings.top_n),
                Some("Number of Likes"),
                Some("Comment"),
            )
            .with_color_scheme(ColorScheme::Deep);
        config.style.margins.left = 380;
        config
    }

    /// Set data already ranked by the aggregator, keeping the first `limit`
    pub fn set_data(&mut self, mut data: Vec<TopItemDataPoint>) {
        data.truncate(self.limit);
        self.data = data;
    }

    /// Get max count for x-axis scaling.
    ///
    /// Computed in f64: like counts saturate at `u64::MAX` during cleaning.
    fn get_max_count(&self) -> f64 {
        let max = self.data.iter().map(|d| d.count).max().unwrap_or(0) as f64;
        // Leave room for the value labels
        max + max / 10.0 + 1.0
    }

    /// Category slot for the item at `rank`; rank 0 is drawn at the top
    fn slot(&self, rank: usize) -> usize {
        self.data.len() - 1 - rank
    }

    /// Axis label for a category slot
    fn label_for_slot(&self, slot: usize) -> String {
        self.data
            .len()
            .checked_sub(slot + 1)
            .and_then(|rank| self.data.get(rank))
            .map(|item| {
                let name = item.name.replace(['\n', '\r'], " ");
                truncate_label(name.trim(), self.max_label_chars)
            })
            .unwrap_or_default()
    }
}

impl GraphRenderer for TopItemsGraph {
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        self.apply_styling(&root, config)?;

        if self.data.is_empty() {
            let mut chart = ChartBuilder::on(&root)
                .caption(&config.title, config.style.title_font.to_font())
                .margin(config.style.margins.top)
                .x_label_area_size(config.style.margins.bottom)
                .y_label_area_size(config.style.margins.left)
                .build_cartesian_2d(0u64..1u64, 0u64..1u64)?;
            chart
                .configure_mesh()
                .x_desc(config.x_label.as_deref().unwrap_or(""))
                .y_desc(config.y_label.as_deref().unwrap_or(""))
                .label_style(config.style.axis_font.to_font())
                .axis_desc_style(config.style.label_font.to_font())
                .draw()?;
            draw_no_data(&chart.plotting_area().strip_coord_spec(), config)?;
            root.present()?;
            return Ok(());
        }

        let num_items = self.data.len();
        let max_count = self.get_max_count();

        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, config.style.title_font.to_font())
            .margin(config.style.margins.top)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(0f64..max_count, -0.5f64..(num_items as f64 - 0.5))?;

        let x_formatter = |x: &f64| format!("{x:.0}");
        // Only whole slots carry a label
        let y_formatter = |y: &f64| {
            let slot = y.round();
            if (y - slot).abs() < 1e-6 && slot >= 0.0 {
                self.label_for_slot(slot as usize)
            } else {
                String::new()
            }
        };

        chart
            .configure_mesh()
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""))
            .y_labels(num_items)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .disable_y_mesh()
            .label_style(config.style.axis_font.to_font())
            .axis_desc_style(config.style.label_font.to_font())
            .draw()?;

        // One colour for every bar
        let color = self.primary_color(config);
        chart.draw_series(self.data.iter().enumerate().map(|(rank, item)| {
            let slot = self.slot(rank) as f64;
            Rectangle::new(
                [(0.0, slot - 0.4), (item.count as f64, slot + 0.4)],
                color.filled(),
            )
        }))?;

        let value_style = config
            .style
            .axis_font
            .to_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(self.data.iter().enumerate().map(|(rank, item)| {
            Text::new(
                item.count.to_string(),
                (item.count as f64, self.slot(rank) as f64),
                value_style.clone(),
            )
        }))?;

        root.present()?;
        tracing::info!(
            "Successfully rendered {} chart to {}",
            self.chart_type,
            path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.chart_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::font_available;
    use tempfile::tempdir;

    fn items(pairs: &[(&str, u64)]) -> Vec<TopItemDataPoint> {
        pairs
            .iter()
            .map(|(name, count)| TopItemDataPoint {
                name: name.to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn test_constructors() {
        let authors = TopItemsGraph::for_authors(5);
        assert_eq!(authors.limit, 5);
        assert_eq!(authors.name(), "author_distribution");

        let comments = TopItemsGraph::for_comments(10);
        assert_eq!(comments.name(), "top_comments");
        assert!(comments.max_label_chars > authors.max_label_chars);
    }

    #[test]
    fn test_configs() {
        let settings = GraphSettings::default();
        let authors = TopItemsGraph::authors_config(&settings);
        assert_eq!(authors.title, "Top 10 Authors by Number of Comments");
        assert_eq!(authors.y_label.as_deref(), Some("Author"));
        assert_eq!(authors.style.color_scheme, ColorScheme::Deep);

        let comments = TopItemsGraph::comments_config(&settings);
        assert_eq!(comments.title, "Top 10 Comments by Likes");
        assert_eq!(comments.x_label.as_deref(), Some("Number of Likes"));
    }

    #[test]
    fn test_set_data_limits() {
        let mut graph = TopItemsGraph::for_authors(2);
        graph.set_data(items(&[("alice", 5), ("bob", 3), ("carol", 1)]));
        assert_eq!(graph.data.len(), 2);
        assert_eq!(graph.data[1].name, "bob");
    }

    #[test]
    fn test_slots_put_first_rank_on_top() {
        let mut graph = TopItemsGraph::for_authors(10);
        graph.set_data(items(&[("alice", 5), ("bob", 3), ("carol", 1)]));

        assert_eq!(graph.slot(0), 2);
        assert_eq!(graph.label_for_slot(2), "alice");
        assert_eq!(graph.label_for_slot(0), "carol");
        assert_eq!(graph.label_for_slot(3), "");
    }

    #[test]
    fn test_labels_are_single_line_and_truncated() {
        let mut graph = TopItemsGraph::for_comments(10);
        graph.max_label_chars = 12;
        graph.set_data(items(&[("line one\nline two and more", 9)]));
        assert_eq!(graph.label_for_slot(0), "line one ...");
    }

    #[test]
    fn test_get_max_count() {
        let mut graph = TopItemsGraph::for_authors(10);
        assert!((graph.get_max_count() - 1.0).abs() < f64::EPSILON);

        graph.set_data(items(&[("a", 100), ("b", 50)]));
        assert!((graph.get_max_count() - 111.0).abs() < 1e-9);

        graph.set_data(items(&[("a", u64::MAX)]));
        assert!(graph.get_max_count() > u64::MAX as f64);
    }

    #[test]
    fn test_render_saturated_like_count() {
        if !font_available() {
            return;
        }
        let mut graph = TopItemsGraph::for_comments(10);
        graph.set_data(items(&[("viral", u64::MAX), ("quiet", 2)]));
        let config = TopItemsGraph::comments_config(&GraphSettings::default());

        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("top_comments_livechat.png");
        graph.render_to_file(&config, &file_path).unwrap();
        assert!(file_path.exists());
    }

    #[test]
    fn test_render_to_file() {
        if !font_available() {
            return;
        }
        let mut graph = TopItemsGraph::for_authors(10);
        graph.set_data(items(&[("alice", 5), ("bob", 3), ("carol", 1)]));
        let config = TopItemsGraph::authors_config(&GraphSettings::default());

        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("author_distribution_livechat.png");
        graph.render_to_file(&config, &file_path).unwrap();
        assert!(file_path.exists());
    }

    #[test]
    fn test_render_empty_data() {
        if !font_available() {
            return;
        }
        let graph = TopItemsGraph::for_comments(10);
        let config = TopItemsGraph::comments_config(&GraphSettings::default());

        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("top_comments_livechat.png");
        graph.render_to_file(&config, &file_path).unwrap();
        assert!(file_path.exists());
    }
}
