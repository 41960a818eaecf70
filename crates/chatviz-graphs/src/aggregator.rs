//! Aggregations turning the cleaned comment table into chart data

use crate::{
    DayCountDataPoint, HistogramBin, LikesHistogram, SourceShare, TimeCountDataPoint,
    TopItemDataPoint, WordFrequency, WordFrequencyAnalyzer,
};
use chatviz_common::{ChatvizError, CleaningReport, CommentTable, Result};
use chatviz_config::Config;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, warn};

/// Number of points the density curve is evaluated at
pub const KDE_POINTS: usize = 200;

/// Trait for aggregating the comment table into one chart's data
pub trait DataAggregator<T> {
    /// Compute the aggregate over the whole table
    fn aggregate(&self, table: &CommentTable) -> Result<T>;
}

/// Count `keys` by value, ordered by count descending then first appearance
fn ranked_counts<'a, I>(keys: I) -> Vec<(&'a str, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, (u64, usize)> = HashMap::new();
    for (position, key) in keys.into_iter().enumerate() {
        counts.entry(key).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, u64, usize)> = counts
        .into_iter()
        .map(|(key, (count, first))| (key, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(key, count, _)| (key, count)).collect()
}

/// Comments per exact publish timestamp, ascending
#[derive(Debug, Default)]
pub struct CommentsOverTimeAggregator;

impl DataAggregator<Vec<TimeCountDataPoint>> for CommentsOverTimeAggregator {
    #[instrument(skip_all)]
    fn aggregate(&self, table: &CommentTable) -> Result<Vec<TimeCountDataPoint>> {
        let mut counts: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();
        for timestamp in table.iter().filter_map(|c| c.published_at) {
            *counts.entry(timestamp).or_insert(0) += 1;
        }

        let result: Vec<TimeCountDataPoint> = counts
            .into_iter()
            .map(|(timestamp, count)| TimeCountDataPoint { timestamp, count })
            .collect();

        debug!("Aggregated {} distinct timestamps", result.len());
        Ok(result)
    }
}

/// Most prolific authors by comment count
#[derive(Debug)]
pub struct TopAuthorsAggregator {
    pub limit: usize,
}

impl TopAuthorsAggregator {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl DataAggregator<Vec<TopItemDataPoint>> for TopAuthorsAggregator {
    #[instrument(skip_all, fields(limit = self.limit))]
    fn aggregate(&self, table: &CommentTable) -> Result<Vec<TopItemDataPoint>> {
        let result: Vec<TopItemDataPoint> =
            ranked_counts(table.iter().filter_map(|c| c.author.as_deref()))
                .into_iter()
                .take(self.limit)
                .map(|(name, count)| TopItemDataPoint {
                    name: name.to_string(),
                    count,
                })
                .collect();

        debug!("Aggregated {} top authors", result.len());
        Ok(result)
    }
}

/// Comments per calendar day, ascending
#[derive(Debug, Default)]
pub struct CommentsPerDayAggregator;

impl DataAggregator<Vec<DayCountDataPoint>> for CommentsPerDayAggregator {
    #[instrument(skip_all)]
    fn aggregate(&self, table: &CommentTable) -> Result<Vec<DayCountDataPoint>> {
        let mut daily_counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        let mut undated = 0usize;

        for comment in table {
            match comment.date {
                Some(date) => *daily_counts.entry(date).or_insert(0) += 1,
                None => undated += 1,
            }
        }

        if undated > 0 {
            warn!(rows = undated, "rows without a date left out of per-day counts");
        }

        let result: Vec<DayCountDataPoint> = daily_counts
            .into_iter()
            .map(|(date, count)| DayCountDataPoint { date, count })
            .collect();

        debug!("Aggregated {} days", result.len());
        Ok(result)
    }
}

/// Most liked comments
#[derive(Debug)]
pub struct TopCommentsAggregator {
    pub limit: usize,
}

impl TopCommentsAggregator {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl DataAggregator<Vec<TopItemDataPoint>> for TopCommentsAggregator {
    #[instrument(skip_all, fields(limit = self.limit))]
    fn aggregate(&self, table: &CommentTable) -> Result<Vec<TopItemDataPoint>> {
        let mut ranked: Vec<_> = table.iter().collect();
        // Stable: equal like counts keep table order
        ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));

        let result: Vec<TopItemDataPoint> = ranked
            .into_iter()
            .take(self.limit)
            .map(|comment| TopItemDataPoint {
                name: comment.text.clone().unwrap_or_default(),
                count: comment.like_count,
            })
            .collect();

        debug!("Aggregated {} top comments", result.len());
        Ok(result)
    }
}

/// Every string comment body joined by single spaces
pub fn text_corpus(table: &CommentTable) -> String {
    table
        .iter()
        .filter_map(|c| c.text.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Equal-width histogram of like counts with a scaled Gaussian KDE
#[derive(Debug)]
pub struct LikesHistogramAggregator {
    pub bins: usize,
}

impl LikesHistogramAggregator {
    pub fn new(bins: usize) -> Self {
        Self { bins }
    }

    /// Bin range over the data, widened when degenerate
    fn value_range(values: &[f64]) -> (f64, f64) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if values.is_empty() {
            (0.0, 1.0)
        } else if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        }
    }

    /// Gaussian KDE with Scott's bandwidth, scaled from density to counts
    fn kde_curve(values: &[f64], bin_width: f64) -> Vec<(f64, f64)> {
        let n = values.len();
        if n < 2 {
            return Vec::new();
        }

        let count = n as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);
        if variance <= 0.0 || !variance.is_finite() {
            return Vec::new();
        }

        let bandwidth = variance.sqrt() * count.powf(-0.2);
        let norm = 1.0 / (count * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
        let scale = count * bin_width;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = (max - min) / (KDE_POINTS - 1) as f64;

        (0..KDE_POINTS)
            .map(|i| {
                let x = min + step * i as f64;
                let density: f64 = values
                    .iter()
                    .map(|v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>()
                    * norm;
                (x, density * scale)
            })
            .collect()
    }
}

impl DataAggregator<LikesHistogram> for LikesHistogramAggregator {
    #[instrument(skip_all, fields(bins = self.bins))]
    fn aggregate(&self, table: &CommentTable) -> Result<LikesHistogram> {
        if self.bins == 0 {
            return Err(ChatvizError::validation_field(
                "Histogram needs at least one bin",
                "histogram_bins",
            ));
        }

        let values: Vec<f64> = table.iter().map(|c| c.like_count as f64).collect();
        let (low, high) = Self::value_range(&values);
        let bin_width = (high - low) / self.bins as f64;

        let mut counts = vec![0u64; self.bins];
        for value in &values {
            let index = ((value - low) / bin_width).floor() as usize;
            // The last bin is closed on the right
            counts[index.min(self.bins - 1)] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: low + bin_width * i as f64,
                end: if i + 1 == self.bins {
                    high
                } else {
                    low + bin_width * (i + 1) as f64
                },
                count,
            })
            .collect();

        let kde = Self::kde_curve(&values, bin_width);
        debug!(points = kde.len(), "Computed like count histogram");

        Ok(LikesHistogram {
            bins,
            bin_width,
            kde,
        })
    }
}

/// Share of comments per source, largest first
#[derive(Debug, Default)]
pub struct SourceDistributionAggregator;

impl DataAggregator<Vec<SourceShare>> for SourceDistributionAggregator {
    #[instrument(skip_all)]
    fn aggregate(&self, table: &CommentTable) -> Result<Vec<SourceShare>> {
        let ranked = ranked_counts(table.iter().filter_map(|c| c.source.as_deref()));
        let total: u64 = ranked.iter().map(|(_, count)| count).sum();

        let result: Vec<SourceShare> = ranked
            .into_iter()
            .map(|(source, count)| SourceShare {
                source: source.to_string(),
                count,
                percentage: count as f64 / total as f64 * 100.0,
            })
            .collect();

        debug!("Aggregated {} sources", result.len());
        Ok(result)
    }
}

/// Every chart's aggregate in one serializable value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub cleaning: CleaningReport,
    pub comments_over_time: Vec<TimeCountDataPoint>,
    pub top_authors: Vec<TopItemDataPoint>,
    pub comments_per_day: Vec<DayCountDataPoint>,
    pub top_comments: Vec<TopItemDataPoint>,
    /// Empty when the corpus has no words left after filtering
    pub word_frequencies: Vec<WordFrequency>,
    pub likes_histogram: LikesHistogram,
    pub source_distribution: Vec<SourceShare>,
}

impl Aggregates {
    /// Compute every aggregate with the configured limits
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn compute(table: &CommentTable, config: &Config) -> Result<Self> {
        let top_n = config.graph.top_n;
        let cloud = &config.word_cloud;
        let analyzer = WordFrequencyAnalyzer::new(&cloud.stopwords, cloud.max_words)
            .with_collocations(cloud.collocations);

        Ok(Self {
            cleaning: *table.report(),
            comments_over_time: CommentsOverTimeAggregator.aggregate(table)?,
            top_authors: TopAuthorsAggregator::new(top_n).aggregate(table)?,
            comments_per_day: CommentsPerDayAggregator.aggregate(table)?,
            top_comments: TopCommentsAggregator::new(top_n).aggregate(table)?,
            word_frequencies: analyzer.frequencies(&text_corpus(table)),
            likes_histogram: LikesHistogramAggregator::new(config.graph.histogram_bins)
                .aggregate(table)?,
            source_distribution: SourceDistributionAggregator.aggregate(table)?,
        })
    }
}
