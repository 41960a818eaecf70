//! # chatviz graphs
//!
//! Aggregation and chart rendering for live-chat comment reports.
//!
//! Every chart pairs a [`DataAggregator`] that reduces the cleaned
//! [`chatviz_common::CommentTable`] with a [`GraphRenderer`] that draws the
//! result to a PNG using plotters. [`GraphManager`] runs them in order.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod manager;
pub mod renderer;
pub mod types;
pub mod word_frequency;

// Graph implementations
pub mod comments_over_time;
pub mod comments_per_day;
pub mod likes_distribution;
pub mod source_distribution;
pub mod top_items;
pub mod word_cloud;

#[cfg(test)]
mod test_support;

pub use aggregator::*;
pub use comments_over_time::*;
pub use comments_per_day::*;
pub use likes_distribution::*;
pub use manager::*;
pub use renderer::*;
pub use source_distribution::*;
pub use top_items::*;
pub use types::*;
pub use word_cloud::*;
pub use word_frequency::*;
