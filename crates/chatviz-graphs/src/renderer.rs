//! Graph rendering trait and shared drawing helpers

use crate::{ColorScheme, GraphConfig};
use chatviz_common::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Stops of the viridis colormap, evenly spaced over [0, 1]
const VIRIDIS_STOPS: [RGBColor; 9] = [
    RGBColor(68, 1, 84),
    RGBColor(71, 44, 122),
    RGBColor(59, 81, 139),
    RGBColor(44, 113, 142),
    RGBColor(33, 144, 141),
    RGBColor(39, 173, 129),
    RGBColor(92, 200, 99),
    RGBColor(170, 220, 50),
    RGBColor(253, 231, 37),
];

/// Trait for rendering graphs with different types and styling options
pub trait GraphRenderer {
    /// Render the graph to a PNG at `path`
    fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fill the background of the drawing area
    fn apply_styling<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &GraphConfig,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
        Self: Sized,
    {
        let bg_color = self.get_background_color(config);
        root.fill(&bg_color)?;
        Ok(())
    }

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
            ],
            ColorScheme::Deep => vec![
                RGBColor(76, 114, 176),
                RGBColor(221, 132, 82),
                RGBColor(85, 168, 104),
                RGBColor(196, 78, 82),
                RGBColor(129, 114, 179),
                RGBColor(147, 120, 96),
                RGBColor(218, 139, 195),
                RGBColor(140, 140, 140),
                RGBColor(204, 185, 116),
                RGBColor(100, 181, 205),
            ],
            ColorScheme::Pastel => vec![
                RGBColor(161, 201, 244),
                RGBColor(255, 180, 130),
                RGBColor(141, 229, 161),
                RGBColor(255, 159, 155),
                RGBColor(208, 187, 255),
                RGBColor(222, 187, 155),
                RGBColor(250, 176, 228),
                RGBColor(207, 207, 207),
                RGBColor(255, 254, 163),
                RGBColor(185, 242, 240),
            ],
            ColorScheme::Custom(colors) => colors
                .iter()
                .map(|color_str| self.parse_color(color_str))
                .collect(),
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255))
    }

    /// First color of the configured scheme
    fn primary_color(&self, config: &GraphConfig) -> RGBColor {
        self.get_colors(&config.style.color_scheme)
            .first()
            .copied()
            .unwrap_or(RGBColor(31, 119, 180))
    }
}

/// Sample the viridis colormap at `t` in [0, 1]
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS_STOPS.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(VIRIDIS_STOPS.len() - 1);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    let (a, b) = (VIRIDIS_STOPS[lower], VIRIDIS_STOPS[upper]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Shorten `text` to at most `max_chars` characters, ending in "..."
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Draw a centered placeholder when a chart has nothing to plot
pub(crate) fn draw_no_data<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    config: &GraphConfig,
) -> Result<()>
where
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    use plotters::style::text_anchor::{HPos, Pos, VPos};

    let (width, height) = area.dim_in_pixel();
    let style = config
        .style
        .label_font
        .to_font()
        .color(&RGBColor(100, 100, 100))
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        "No data",
        ((width / 2) as i32, (height / 2) as i32),
        style,
    ))?;
    Ok(())
}
