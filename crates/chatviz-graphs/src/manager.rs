//! Graph manager running every enabled chart in order.

use crate::aggregator::text_corpus;
use crate::{
    Aggregates, CommentsOverTimeAggregator, CommentsOverTimeGraph, CommentsPerDayAggregator,
    CommentsPerDayGraph, DataAggregator, GraphConfig, GraphRenderer, LikesDistributionGraph,
    LikesHistogramAggregator, SourceDistributionAggregator, SourceDistributionGraph,
    TopAuthorsAggregator, TopCommentsAggregator, TopItemsGraph, WordCloudGraph,
    WordFrequencyAnalyzer,
};
use chatviz_common::{CommentTable, Result};
use chatviz_config::{ChartKind, Config};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, instrument};

/// Files written by one report run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub written: Vec<PathBuf>,
}

/// Manages report generation from a cleaned comment table.
#[derive(Debug, Clone)]
pub struct GraphManager {
    config: Config,
}

impl GraphManager {
    /// Creates a new graph manager.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates all enabled graphs in canonical order.
    ///
    /// Stops at the first failing chart; files written before it stay on disk.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn generate_all(&self, table: &CommentTable) -> Result<ReportSummary> {
        fs::create_dir_all(&self.config.output.directory)?;

        let mut summary = ReportSummary::default();

        if let Some(path) = &self.config.output.aggregates_path {
            let path = PathBuf::from(path);
            self.write_aggregates(table, &path)?;
            summary.written.push(path);
        }

        for kind in ChartKind::ALL {
            if !self.config.is_enabled(kind) {
                continue;
            }

            let _span = info_span!("chart", name = kind.name()).entered();
            let path = self.config.output_path(kind);
            self.render_chart(kind, table, &path)?;
            info!(path = %path.display(), "chart written");
            summary.written.push(path);
        }

        info!(files = summary.written.len(), "report complete");
        Ok(summary)
    }

    /// Dump every aggregate as pretty JSON
    pub fn write_aggregates(&self, table: &CommentTable, path: &Path) -> Result<()> {
        let aggregates = Aggregates::compute(table, &self.config)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&aggregates)?)?;
        info!(path = %path.display(), "aggregates written");
        Ok(())
    }

    /// Aggregate and render a single chart to `path`
    pub fn render_chart(&self, kind: ChartKind, table: &CommentTable, path: &Path) -> Result<()> {
        let settings = &self.config.graph;

        match kind {
            ChartKind::CommentsOverTime => {
                let mut graph = CommentsOverTimeGraph::new();
                graph.set_data(CommentsOverTimeAggregator.aggregate(table)?);
                render_with(&graph, &CommentsOverTimeGraph::default_config(settings), path)
            }
            ChartKind::AuthorDistribution => {
                let mut graph = TopItemsGraph::for_authors(settings.top_n);
                graph.set_data(TopAuthorsAggregator::new(settings.top_n).aggregate(table)?);
                render_with(&graph, &TopItemsGraph::authors_config(settings), path)
            }
            ChartKind::CommentsPerDay => {
                let mut graph = CommentsPerDayGraph::new();
                graph.set_data(CommentsPerDayAggregator.aggregate(table)?);
                render_with(&graph, &CommentsPerDayGraph::default_config(settings), path)
            }
            ChartKind::TopComments => {
                let mut graph = TopItemsGraph::for_comments(settings.top_n);
                graph.set_data(TopCommentsAggregator::new(settings.top_n).aggregate(table)?);
                render_with(&graph, &TopItemsGraph::comments_config(settings), path)
            }
            ChartKind::WordCloud => {
                let cloud = &self.config.word_cloud;
                let analyzer = WordFrequencyAnalyzer::new(&cloud.stopwords, cloud.max_words)
                    .with_collocations(cloud.collocations);
                let mut graph = WordCloudGraph::new(cloud);
                graph.set_data(analyzer.frequencies(&text_corpus(table)));
                render_with(&graph, &WordCloudGraph::default_config(settings), path)
            }
            ChartKind::LikesDistribution => {
                let histogram =
                    LikesHistogramAggregator::new(settings.histogram_bins).aggregate(table)?;
                let mut graph = LikesDistributionGraph::new();
                graph.set_data(histogram);
                render_with(&graph, &LikesDistributionGraph::default_config(settings), path)
            }
            ChartKind::SourceDistribution => {
                let mut graph = SourceDistributionGraph::new();
                graph.set_data(SourceDistributionAggregator.aggregate(table)?);
                render_with(&graph, &SourceDistributionGraph::default_config(settings), path)
            }
        }
    }
}

fn render_with<G: GraphRenderer>(graph: &G, config: &GraphConfig, path: &Path) -> Result<()> {
    debug!(
        renderer = graph.name(),
        width = config.width,
        height = config.height,
        "rendering"
    );
    graph.render_to_file(config, path)
}

impl Default for GraphManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
