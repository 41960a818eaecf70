//! Word cloud layout and rendering
//!
//! Words are placed largest first at a random free position. Free positions
//! are found with an integral image over an occupancy grid, so each query is
//! a constant-time rectangle sum per candidate. All randomness comes from a
//! seeded [`fastrand::Rng`], which makes a cloud reproducible for a seed.

use crate::renderer::viridis;
use crate::{GraphConfig, GraphRenderer, WordFrequency};
use chatviz_common::{ChatvizError, Result};
use chatviz_config::{GraphSettings, WordCloudSettings};
use plotters::prelude::*;
use plotters::style::FontTransform;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Weight of the frequency ratio when scaling font sizes between words
const RELATIVE_SCALING: f64 = 0.5;
/// Padding added around each word's box, in pixels
const WORD_MARGIN: u32 = 2;
/// Font size decrement when a word does not fit
const FONT_STEP: u32 = 1;

/// A word positioned on the cloud canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: u32,
    /// Top-left corner of the word's box
    pub x: u32,
    pub y: u32,
    /// Box size as drawn, after rotation
    pub width: u32,
    pub height: u32,
    /// Rotated 90° counter-clockwise
    pub rotated: bool,
    pub color: (u8, u8, u8),
}

/// Occupancy grid with an integral image for free-rectangle queries
struct OccupancyMap {
    width: usize,
    height: usize,
    occupied: Vec<bool>,
    /// (width + 1) x (height + 1) prefix sums of `occupied`
    integral: Vec<u32>,
}

impl OccupancyMap {
    fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            occupied: vec![false; width * height],
            integral: vec![0; (width + 1) * (height + 1)],
        }
    }

    fn integral_at(&self, x: usize, y: usize) -> u32 {
        self.integral[y * (self.width + 1) + x]
    }

    fn area_sum(&self, x: usize, y: usize, w: usize, h: usize) -> u32 {
        self.integral_at(x + w, y + h) + self.integral_at(x, y)
            - self.integral_at(x + w, y)
            - self.integral_at(x, y + h)
    }

    /// Pick a uniformly random free position for a `w` x `h` box
    fn sample_position(&self, w: u32, h: u32, rng: &mut fastrand::Rng) -> Option<(u32, u32)> {
        let (w, h) = (w as usize, h as usize);
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }

        let free = |x: usize, y: usize| self.area_sum(x, y, w, h) == 0;
        let columns = self.width - w + 1;
        let rows = self.height - h + 1;

        let hits = (0..rows)
            .flat_map(|y| (0..columns).map(move |x| (x, y)))
            .filter(|&(x, y)| free(x, y))
            .count();
        if hits == 0 {
            return None;
        }

        let target = rng.usize(0..hits);
        (0..rows)
            .flat_map(|y| (0..columns).map(move |x| (x, y)))
            .filter(|&(x, y)| free(x, y))
            .nth(target)
            .map(|(x, y)| (x as u32, y as u32))
    }

    /// Mark a box occupied and refresh the prefix sums below its top row
    fn occupy(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let (x, y) = (x as usize, y as usize);
        let x_end = (x + w as usize).min(self.width);
        let y_end = (y + h as usize).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.occupied[row * self.width + col] = true;
            }
        }

        let stride = self.width + 1;
        for row in y..self.height {
            let mut row_sum = 0;
            for col in 0..self.width {
                row_sum += u32::from(self.occupied[row * self.width + col]);
                self.integral[(row + 1) * stride + col + 1] =
                    self.integral[row * stride + col + 1] + row_sum;
            }
        }
    }
}

/// Word cloud layout engine
#[derive(Debug, Clone)]
pub struct WordCloudLayout {
    pub width: u32,
    pub height: u32,
    pub max_font_size: u32,
    pub min_font_size: u32,
    pub prefer_horizontal: f64,
    pub seed: u64,
}

impl WordCloudLayout {
    pub fn from_settings(settings: &WordCloudSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            max_font_size: settings.max_font_size,
            min_font_size: settings.min_font_size.max(1),
            prefer_horizontal: settings.prefer_horizontal,
            seed: settings.seed,
        }
    }

    /// Place `words` (largest first) on the canvas.
    ///
    /// `measure` returns the unrotated (width, height) of a word at a font
    /// size. Layout stops at the first word that no longer fits at the
    /// minimum font size.
    pub fn layout<F>(&self, words: &[WordFrequency], mut measure: F) -> Result<Vec<PlacedWord>>
    where
        F: FnMut(&str, u32) -> Result<(u32, u32)>,
    {
        if words.is_empty() {
            return Err(ChatvizError::EmptyCorpus);
        }

        let mut rng = fastrand::Rng::with_seed(self.seed);
        let mut occupancy = OccupancyMap::new(self.width, self.height);
        let mut placed = Vec::new();

        let mut font_size = self.max_font_size;
        let mut last_weight = 1.0;

        for word in words.iter().filter(|w| w.weight > 0.0) {
            let scale = RELATIVE_SCALING * (word.weight / last_weight) + (1.0 - RELATIVE_SCALING);
            font_size = (scale * f64::from(font_size)).round() as u32;

            let mut rotated = rng.f64() >= self.prefer_horizontal;
            let mut tried_other_orientation = false;

            let spot = loop {
                if font_size < self.min_font_size {
                    break None;
                }

                let (text_w, text_h) = measure(&word.word, font_size)?;
                let (box_w, box_h) = if rotated {
                    (text_h, text_w)
                } else {
                    (text_w, text_h)
                };

                if let Some((x, y)) =
                    occupancy.sample_position(box_w + WORD_MARGIN, box_h + WORD_MARGIN, &mut rng)
                {
                    break Some((x, y, box_w, box_h));
                }

                if !tried_other_orientation && self.prefer_horizontal < 1.0 {
                    rotated = !rotated;
                    tried_other_orientation = true;
                } else {
                    font_size = font_size.saturating_sub(FONT_STEP);
                    rotated = false;
                }
            };

            let Some((x, y, width, height)) = spot else {
                debug!(word = %word.word, "canvas full, stopping layout");
                break;
            };

            let (x, y) = (x + WORD_MARGIN / 2, y + WORD_MARGIN / 2);
            occupancy.occupy(x, y, width, height);

            let color = viridis(rng.f64());
            placed.push(PlacedWord {
                word: word.word.clone(),
                font_size,
                x,
                y,
                width,
                height,
                rotated,
                color: (color.0, color.1, color.2),
            });
            last_weight = word.weight;
        }

        debug!(placed = placed.len(), offered = words.len(), "word cloud layout done");
        Ok(placed)
    }
}

/// Word cloud renderer
#[derive(Debug)]
pub struct WordCloudGraph {
    pub data: Vec<WordFrequency>,
    pub layout: WordCloudLayout,
    /// Background of the cloud canvas
    pub background_color: String,
}

impl WordCloudGraph {
    pub fn new(settings: &WordCloudSettings) -> Self {
        Self {
            data: Vec::new(),
            layout: WordCloudLayout::from_settings(settings),
            background_color: settings.background_color.clone(),
        }
    }

    /// Figure configuration: a wide canvas holding the cloud under a title
    pub fn default_config(settings: &GraphSettings) -> GraphConfig {
        GraphConfig::from_settings(settings)
            .titled("Most Frequent Words in Comments", None, None)
            .with_dimensions(1200, 600)
    }

    pub fn set_data(&mut self, data: Vec<WordFrequency>) {
        self.data = data;
    }
}

impl GraphRenderer for WordCloudGraph {
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        if self.data.is_empty() {
            return Err(ChatvizError::EmptyCorpus);
        }

        let title_space = config.style.title_font.size * 2;
        let width = config.width.max(self.layout.width);
        let height = config.height.max(self.layout.height + title_space);

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        self.apply_styling(&root, config)?;

        let area = root.titled(&config.title, config.style.title_font.to_font())?;
        let (area_w, area_h) = area.dim_in_pixel();
        let left = area_w.saturating_sub(self.layout.width) / 2;
        let top = area_h.saturating_sub(self.layout.height) / 2;
        let canvas = area.shrink((left, top), (self.layout.width, self.layout.height));
        canvas.fill(&self.parse_color(&self.background_color))?;

        let family = config.style.label_font.family.as_str();
        let placed = self.layout.layout(&self.data, |word, size| {
            let style = TextStyle::from((family, size).into_font());
            Ok(canvas.estimate_text_size(word, &style)?)
        })?;

        for word in &placed {
            let color = RGBColor(word.color.0, word.color.1, word.color.2);
            let font = (family, word.font_size).into_font();
            let (x, y) = (word.x as i32, word.y as i32);

            if word.rotated {
                // Rotated glyphs extend up and right from the anchor
                let style = font.transform(FontTransform::Rotate270).color(&color);
                canvas.draw(&Text::new(word.word.as_str(), (x, y + word.height as i32), style))?;
            } else {
                canvas.draw(&Text::new(word.word.as_str(), (x, y), font.color(&color)))?;
            }
        }

        root.present()?;
        tracing::info!(
            words = placed.len(),
            "Successfully rendered word cloud to {}",
            path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "word_cloud"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::font_available;
    use tempfile::tempdir;

    /// Monospace-ish stand-in for a font: 0.6em per char, 1em tall
    fn fake_measure(word: &str, size: u32) -> Result<(u32, u32)> {
        let chars = word.chars().count() as f64;
        Ok(((chars * 0.6 * f64::from(size)).ceil() as u32, size))
    }

    fn words(pairs: &[(&str, u64)]) -> Vec<WordFrequency> {
        let max = pairs.iter().map(|(_, c)| *c).max().unwrap_or(1) as f64;
        pairs
            .iter()
            .map(|(word, count)| WordFrequency {
                word: word.to_string(),
                count: *count,
                weight: *count as f64 / max,
            })
            .collect()
    }

    fn layout() -> WordCloudLayout {
        WordCloudLayout::from_settings(&WordCloudSettings::default())
    }

    fn overlaps(a: &PlacedWord, b: &PlacedWord) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn test_empty_words_is_empty_corpus() {
        let err = layout().layout(&[], fake_measure).unwrap_err();
        assert!(matches!(err, ChatvizError::EmptyCorpus));
    }

    #[test]
    fn test_layout_is_reproducible_for_a_seed() {
        let data = words(&[("economy", 9), ("jobs", 5), ("healthcare", 4), ("vote", 2)]);
        let first = layout().layout(&data, fake_measure).unwrap();
        let second = layout().layout(&data, fake_measure).unwrap();
        assert_eq!(first, second);

        let mut other = layout();
        other.seed = 7;
        let third = other.layout(&data, fake_measure).unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn test_words_fit_canvas_without_overlap() {
        let data = words(&[
            ("economy", 20),
            ("jobs", 15),
            ("healthcare", 12),
            ("vote", 9),
            ("border", 7),
            ("tax", 5),
            ("climate", 4),
            ("energy", 3),
        ]);
        let engine = layout();
        let placed = engine.layout(&data, fake_measure).unwrap();

        assert!(!placed.is_empty());
        for word in &placed {
            assert!(word.x + word.width <= engine.width, "{word:?}");
            assert!(word.y + word.height <= engine.height, "{word:?}");
        }
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!overlaps(a, b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_font_sizes_follow_relative_scaling() {
        let mut engine = layout();
        engine.prefer_horizontal = 1.0;
        let data = words(&[("alpha", 4), ("beta", 2)]);
        let placed = engine.layout(&data, fake_measure).unwrap();

        assert_eq!(placed[0].font_size, 120);
        // (0.5 * 0.5 + 0.5) * 120
        assert_eq!(placed[1].font_size, 90);
        assert!(placed.iter().all(|w| !w.rotated));
    }

    #[test]
    fn test_too_large_word_shrinks() {
        let mut engine = layout();
        engine.prefer_horizontal = 1.0;
        let data = words(&[("supercalifragilisticexpialidocious", 1)]);
        let placed = engine.layout(&data, fake_measure).unwrap();

        assert_eq!(placed.len(), 1);
        assert!(placed[0].font_size < 120);
        assert!(placed[0].width + WORD_MARGIN <= engine.width);
    }

    #[test]
    fn test_rotation_swaps_box() {
        let mut engine = layout();
        engine.prefer_horizontal = 0.0;
        let data = words(&[("vote", 1)]);
        let placed = engine.layout(&data, fake_measure).unwrap();

        assert!(placed[0].rotated);
        assert_eq!(placed[0].width, placed[0].font_size);
    }

    #[test]
    fn test_occupancy_map_queries() {
        let mut map = OccupancyMap::new(10, 10);
        let mut rng = fastrand::Rng::with_seed(1);
        assert!(map.sample_position(10, 10, &mut rng).is_some());
        assert!(map.sample_position(11, 1, &mut rng).is_none());

        map.occupy(0, 0, 10, 5);
        assert_eq!(map.area_sum(0, 0, 10, 10), 50);
        let (_, y) = map.sample_position(10, 5, &mut rng).unwrap();
        assert_eq!(y, 5);
        assert!(map.sample_position(10, 6, &mut rng).is_none());
    }

    #[test]
    fn test_render_empty_corpus_fails() {
        let graph = WordCloudGraph::new(&WordCloudSettings::default());
        let config = WordCloudGraph::default_config(&GraphSettings::default());
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("wordcloud_livechat.png");

        let err = graph.render_to_file(&config, &file_path).unwrap_err();
        assert!(matches!(err, ChatvizError::EmptyCorpus));
        assert!(!file_path.exists());
    }

    #[test]
    fn test_render_to_file() {
        if !font_available() {
            return;
        }
        let mut graph = WordCloudGraph::new(&WordCloudSettings::default());
        graph.set_data(words(&[("economy", 9), ("jobs", 5), ("healthcare", 4)]));
        let config = WordCloudGraph::default_config(&GraphSettings::default());

        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("wordcloud_livechat.png");
        graph.render_to_file(&config, &file_path).unwrap();
        assert!(file_path.exists());
    }
}
