//! Graph types and data structures

use chatviz_config::GraphSettings;
use plotters::style::{FontDesc, IntoFont};
use serde::{Deserialize, Serialize};

/// Graph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub style: StyleConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            title: "Graph".to_string(),
            width: 1000,
            height: 600,
            x_label: None,
            y_label: None,
            style: StyleConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Base config sized and styled from the shared settings
    pub fn from_settings(settings: &GraphSettings) -> Self {
        let mut config = Self {
            width: settings.width,
            height: settings.height,
            ..Default::default()
        };
        config.style.background_color = Some(settings.background_color.clone());
        config.style.title_font = FontConfig {
            family: settings.font_family.clone(),
            size: settings.title_font_size,
        };
        config.style.label_font = FontConfig {
            family: settings.font_family.clone(),
            size: settings.label_font_size,
        };
        config.style.axis_font = config.style.label_font.clone();
        config
    }

    /// Set title and axis descriptions
    pub fn titled(mut self, title: &str, x_label: Option<&str>, y_label: Option<&str>) -> Self {
        self.title = title.to_string();
        self.x_label = x_label.map(str::to_string);
        self.y_label = y_label.map(str::to_string);
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.style.color_scheme = scheme;
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Color scheme for graphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Ten-colour categorical palette
    Default,
    /// Muted categorical palette
    Deep,
    /// Light categorical palette
    Pastel,
    Custom(Vec<String>),
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14,
        }
    }
}

impl FontConfig {
    /// Plotters font description for this config
    pub fn to_font(&self) -> FontDesc<'_> {
        (self.family.as_str(), self.size).into_font()
    }
}

/// Margin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            bottom: 60,
            left: 70,
        }
    }
}

/// Grid line configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub show_x: bool,
    pub show_y: bool,
    pub color: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show_x: true,
            show_y: true,
            color: Some("#E5E5E5".to_string()),
        }
    }
}

/// Comprehensive styling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub color_scheme: ColorScheme,
    pub background_color: Option<String>,
    pub title_font: FontConfig,
    pub axis_font: FontConfig,
    pub label_font: FontConfig,
    pub margins: MarginConfig,
    pub grid: GridConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            background_color: Some("#FFFFFF".to_string()),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 24,
            },
            axis_font: FontConfig::default(),
            label_font: FontConfig::default(),
            margins: MarginConfig::default(),
            grid: GridConfig::default(),
        }
    }
}
