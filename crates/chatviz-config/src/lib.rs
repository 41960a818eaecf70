//! # chatviz config
//!
//! Typed YAML configuration with environment overrides and validation.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{ChartKind, Config, GraphSettings, InputConfig, LoggingSettings, OutputConfig, WordCloudSettings};
