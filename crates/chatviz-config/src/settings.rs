//! Application configuration structures

use chatviz_common::{LogFormat, DEFAULT_INPUT_PATH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// The seven charts the report can produce, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    CommentsOverTime,
    AuthorDistribution,
    CommentsPerDay,
    TopComments,
    WordCloud,
    LikesDistribution,
    SourceDistribution,
}

impl ChartKind {
    /// Every chart in the order the report runs them
    pub const ALL: [ChartKind; 7] = [
        ChartKind::CommentsOverTime,
        ChartKind::AuthorDistribution,
        ChartKind::CommentsPerDay,
        ChartKind::TopComments,
        ChartKind::WordCloud,
        ChartKind::LikesDistribution,
        ChartKind::SourceDistribution,
    ];

    /// Fixed output file name
    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::CommentsOverTime => "comments_over_time.png",
            ChartKind::AuthorDistribution => "author_distribution_livechat.png",
            ChartKind::CommentsPerDay => "comments_per_day_livechat.png",
            ChartKind::TopComments => "top_comments_livechat.png",
            ChartKind::WordCloud => "wordcloud_livechat.png",
            ChartKind::LikesDistribution => "likes_distribution_livechat.png",
            ChartKind::SourceDistribution => "source_distribution_livechat.png",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::CommentsOverTime => "comments_over_time",
            ChartKind::AuthorDistribution => "author_distribution",
            ChartKind::CommentsPerDay => "comments_per_day",
            ChartKind::TopComments => "top_comments",
            ChartKind::WordCloud => "word_cloud",
            ChartKind::LikesDistribution => "likes_distribution",
            ChartKind::SourceDistribution => "source_distribution",
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Where the export is read from
    #[validate]
    pub input: InputConfig,

    /// Where images go and which ones are made
    #[validate]
    pub output: OutputConfig,

    /// Shared chart rendering settings
    #[validate]
    pub graph: GraphSettings,

    /// Word cloud layout settings
    #[validate]
    pub word_cloud: WordCloudSettings,

    /// Logging configuration
    #[validate]
    pub logging: LoggingSettings,
}

/// Input export location
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InputConfig {
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Input path is empty or contains invalid characters"))]
    pub path: String,
}

/// Output location and chart selection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the PNG files are written to
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Output directory is empty or contains invalid characters"))]
    pub directory: String,

    /// Charts to produce; run order is always the canonical one
    #[validate(length(min = 1, message = "At least one chart must be enabled"))]
    pub charts: Vec<ChartKind>,

    /// Optional JSON file receiving every computed aggregate
    pub aggregates_path: Option<String>,
}

/// Chart rendering settings shared by the bar, line, histogram and pie charts
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphSettings {
    /// Graph width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Graph height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    #[validate(range(min = 8, max = 72, message = "Title font size must be between 8 and 72"))]
    pub title_font_size: u32,

    #[validate(range(min = 8, max = 72, message = "Label font size must be between 8 and 72"))]
    pub label_font_size: u32,

    /// How many authors / comments the ranking charts keep
    #[validate(range(min = 1, max = 100, message = "Top N must be between 1 and 100"))]
    pub top_n: usize,

    /// Bin count of the likes histogram
    #[validate(range(min = 1, max = 500, message = "Histogram bins must be between 1 and 500"))]
    pub histogram_bins: usize,
}

/// Word cloud settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WordCloudSettings {
    /// Cloud canvas width in pixels
    #[validate(range(min = 100, max = 4000, message = "Word cloud width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Cloud canvas height in pixels
    #[validate(range(min = 100, max = 4000, message = "Word cloud height must be between 100 and 4000 pixels"))]
    pub height: u32,

    #[validate(range(min = 1, max = 2000, message = "Max words must be between 1 and 2000"))]
    pub max_words: usize,

    #[validate(range(min = 4, max = 1000, message = "Max font size must be between 4 and 1000"))]
    pub max_font_size: u32,

    #[validate(range(min = 1, max = 1000, message = "Min font size must be between 1 and 1000"))]
    pub min_font_size: u32,

    /// Probability that a word is laid out horizontally
    #[validate(range(min = 0.0, max = 1.0, message = "Prefer horizontal must be between 0 and 1"))]
    pub prefer_horizontal: f64,

    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// RNG seed for placement and colors
    pub seed: u64,

    /// Additional stop words, matched case-insensitively
    pub stopwords: Vec<String>,

    /// Keep strongly associated word pairs as single entries
    pub collocations: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    pub format: LogFormat,

    /// Optional log file path
    pub file: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_INPUT_PATH.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            charts: ChartKind::ALL.to_vec(),
            aggregates_path: None,
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            font_family: "sans-serif".to_string(),
            title_font_size: 24,
            label_font_size: 14,
            top_n: 10,
            histogram_bins: 20,
        }
    }
}

impl Default for WordCloudSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            max_words: 200,
            max_font_size: 120,
            min_font_size: 4,
            prefer_horizontal: 0.9,
            background_color: "#FFFFFF".to_string(),
            seed: 42,
            stopwords: Vec::new(),
            collocations: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        self.word_cloud.validate_font_range()?;
        Ok(())
    }

    /// Input export path
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(&self.input.path)
    }

    /// Full path of a chart's output file
    pub fn output_path(&self, chart: ChartKind) -> PathBuf {
        PathBuf::from(&self.output.directory).join(chart.file_name())
    }

    /// Whether `chart` is selected
    pub fn is_enabled(&self, chart: ChartKind) -> bool {
        self.output.charts.contains(&chart)
    }

    /// Logging bootstrap settings
    pub fn logging_config(&self) -> chatviz_common::LoggingConfig {
        chatviz_common::LoggingConfig {
            level: self.logging.level.clone(),
            format: self.logging.format,
            file_path: self.logging.file.clone(),
        }
    }
}

impl WordCloudSettings {
    fn validate_font_range(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();
        if self.min_font_size > self.max_font_size {
            errors.add(
                "min_font_size",
                validator::ValidationError::new("min_font_size_exceeds_max"),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
