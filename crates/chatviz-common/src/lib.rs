//! # chatviz common
//!
//! Shared types for the chatviz workspace: the comment record model, the
//! export loader and cleaner, the error type and logging bootstrap.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod comment;
pub mod error;
pub mod loader;
pub mod logging;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use comment::{CleaningReport, Comment, CommentTable, RawComment};
pub use error::{ChatvizError, Result};
pub use loader::{load_export, parse_export, DEFAULT_INPUT_PATH};
pub use logging::{init_logging, LogFormat, LoggingConfig};
