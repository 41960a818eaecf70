//! Configuration loading utilities

use crate::Config;
use chatviz_common::Result as ChatvizResult;
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "CHATVIZ_CONFIG_PATH";

/// Config files probed in the working directory, in order
const DEFAULT_CONFIG_FILES: &[&str] = &["chatviz.yaml", "chatviz.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for chatviz_common::ChatvizError {
    fn from(err: ConfigError) -> Self {
        chatviz_common::ChatvizError::config_with_source(err.to_string(), err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from the explicit path, the environment, a default
    /// file in the working directory, or built-in defaults, in that order
    pub fn load(explicit: Option<&Path>) -> ChatvizResult<Config> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading configuration from argument");
            return Ok(Self::load_config(path)?);
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            debug!(path = %config_path, "loading configuration from {}", CONFIG_PATH_VAR);
            return Ok(Self::load_config(&config_path)?);
        }

        if let Some(found) = DEFAULT_CONFIG_FILES.iter().find(|p| Path::new(p).exists()) {
            debug!(path = %found, "loading configuration file from working directory");
            return Ok(Self::load_config(found)?);
        }

        debug!("no configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Apply process environment overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("CHATVIZ_INPUT") {
            config.input.path = path;
        }

        if let Some(dir) = lookup("CHATVIZ_OUTPUT_DIR") {
            config.output.directory = dir;
        }

        if let Some(width) = parse_var(&lookup, "CHATVIZ_GRAPH_WIDTH")? {
            config.graph.width = width;
        }

        if let Some(height) = parse_var(&lookup, "CHATVIZ_GRAPH_HEIGHT")? {
            config.graph.height = height;
        }

        if let Some(top_n) = parse_var(&lookup, "CHATVIZ_TOP_N")? {
            config.graph.top_n = top_n;
        }

        if let Some(bins) = parse_var(&lookup, "CHATVIZ_HISTOGRAM_BINS")? {
            config.graph.histogram_bins = bins;
        }

        if let Some(seed) = parse_var(&lookup, "CHATVIZ_WORDCLOUD_SEED")? {
            config.word_cloud.seed = seed;
        }

        if let Some(level) = lookup("CHATVIZ_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: var.to_string(),
                source: Box::new(e),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartKind;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_load_valid_yaml_config() {
        let file = create_test_config_file(
            r#"
input:
  path: exports/debate_4.json
output:
  directory: charts
  charts: [word_cloud, comments_per_day]
graph:
  histogram_bins: 30
word_cloud:
  seed: 7
  stopwords: [debate, moderator]
"#,
        );

        let mut config: Config =
            serde_yaml::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        ConfigLoader::apply_overrides(&mut config, vars(&[])).unwrap();
        config.validate_all().unwrap();

        assert_eq!(config.input.path, "exports/debate_4.json");
        assert_eq!(config.output.directory, "charts");
        assert_eq!(config.output.charts, [ChartKind::WordCloud, ChartKind::CommentsPerDay]);
        assert_eq!(config.graph.histogram_bins, 30);
        assert_eq!(config.word_cloud.seed, 7);
        assert_eq!(config.word_cloud.stopwords, ["debate", "moderator"]);
    }

    #[test]
    fn test_invalid_yaml() {
        let file = create_test_config_file("graph: [unterminated");
        let result = ConfigLoader::load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_error() {
        let file = create_test_config_file("graph:\n  top_n: 0\n");
        let result = ConfigLoader::load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load(Some(&dir.path().join("nope.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_variable_overrides() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides(
            &mut config,
            vars(&[
                ("CHATVIZ_INPUT", "other.json"),
                ("CHATVIZ_OUTPUT_DIR", "/tmp/charts"),
                ("CHATVIZ_GRAPH_WIDTH", "1500"),
                ("CHATVIZ_TOP_N", " 5 "),
                ("CHATVIZ_HISTOGRAM_BINS", "40"),
                ("CHATVIZ_WORDCLOUD_SEED", "99"),
                ("CHATVIZ_LOG_LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.input.path, "other.json");
        assert_eq!(config.output.directory, "/tmp/charts");
        assert_eq!(config.graph.width, 1500);
        assert_eq!(config.graph.height, 600);
        assert_eq!(config.graph.top_n, 5);
        assert_eq!(config.graph.histogram_bins, 40);
        assert_eq!(config.word_cloud.seed, 99);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_parse_error() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides(&mut config, vars(&[("CHATVIZ_GRAPH_WIDTH", "wide")]))
            .unwrap_err();

        match err {
            ConfigError::EnvParseError { var, .. } => assert_eq!(var, "CHATVIZ_GRAPH_WIDTH"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_config_error_converts_to_chatviz_error() {
        let err: chatviz_common::ChatvizError =
            ConfigError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).into();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
