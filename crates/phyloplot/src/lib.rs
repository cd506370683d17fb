//! Phyloplot - charts of phylogenetic diversity and tree space.
//!
//! Two pipelines over precomputed inputs:
//!
//! - **Diversity**: a `<clade>: <v1>,<v2>,...` file is parsed into a
//!   [`CladeSeries`](series::CladeSeries) and drawn as one styled line per
//!   clade against a year axis.
//! - **Tree space**: a `<i>-<j>-<d>` file is parsed into a symmetric
//!   [`DistanceMatrix`](matrix::DistanceMatrix), embedded in two dimensions
//!   and drawn as a scatter plot.
//!
//! Both write a single PNG image through [`PlotBuilder`].

pub mod config;
pub mod embed;
pub mod export;

mod error;

pub use phyloplot_core::{color, draw, input, matrix, series};
pub use phyloplot_parser::Parsed;

pub use error::PhyloplotError;

use std::path::Path;

use log::{debug, info, trace};

use config::AppConfig;
use embed::{Embedder, Embedding, Umap};
use export::{Theme, line_chart::LineChart, scatter::Scatter};
use matrix::DistanceMatrix;
use series::CladeSeries;

/// Builder for parsing, embedding and rendering phyloplot charts.
///
/// Every step takes its settings from the [`AppConfig`] the builder was
/// created with.
///
/// # Examples
///
/// ```rust,no_run
/// use phyloplot::{PlotBuilder, config::AppConfig};
///
/// let builder = PlotBuilder::new(AppConfig::default());
///
/// // Diversity line chart
/// let parsed = builder
///     .parse_diversity("mammalia: 1.0,2.0,3.0,4.0,5.0,6.0,7.0,8.0\n")
///     .expect("Failed to parse");
/// builder
///     .render_diversity(parsed.value(), "diversity.png".as_ref())
///     .expect("Failed to render");
///
/// // Tree-space scatter plot
/// let parsed = builder
///     .parse_distances("0-1-5\n0-2-7\n1-2-3\n")
///     .expect("Failed to parse");
/// let embedding = builder.embed(parsed.value()).expect("Failed to embed");
/// builder
///     .render_tree_space(&embedding, "tree-space.png".as_ref())
///     .expect("Failed to render");
/// ```
#[derive(Debug, Default)]
pub struct PlotBuilder {
    config: AppConfig,
}

impl PlotBuilder {
    /// Create a new plot builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a diversity series file.
    ///
    /// Warnings, such as duplicate clades or lines skipped in lenient mode,
    /// are returned with the series for the caller to report.
    ///
    /// # Errors
    ///
    /// Returns [`PhyloplotError::Parse`] holding every diagnostic if the
    /// file is rejected.
    pub fn parse_diversity(&self, source: &str) -> Result<Parsed<CladeSeries>, PhyloplotError> {
        info!("Parsing diversity series");

        let parsed =
            phyloplot_parser::parse_diversity(source, &self.config.diversity().parse_config())
                .map_err(|err| PhyloplotError::new_parse_error(err, source))?;

        log_warnings(parsed.warnings());
        debug!(clades = parsed.value().len(); "Diversity series parsed successfully");
        trace!(series:? = parsed.value(); "Parsed series");

        Ok(parsed)
    }

    /// Render diversity series as a line chart PNG at `output`.
    ///
    /// # Errors
    ///
    /// Returns [`PhyloplotError::InvalidSeriesLength`] before touching any
    /// file if a series does not match the configured year axis,
    /// [`PhyloplotError::Config`] for an unrepresentable axis or unusable
    /// style settings and
    /// [`PhyloplotError::Export`] if rendering or writing fails.
    pub fn render_diversity(
        &self,
        series: &CladeSeries,
        output: &Path,
    ) -> Result<(), PhyloplotError> {
        let diversity = self.config.diversity();
        let axis = diversity.axis().map_err(PhyloplotError::Config)?;
        info!(clades = series.len(), years = axis.len(), output:? = output; "Rendering diversity chart");

        series.check_lengths(&axis)?;
        let theme = self.theme()?;

        let chart = LineChart::new(series, axis, &theme)
            .with_labels(diversity.x_label(), diversity.y_label());
        export::write_png(output, &theme, &chart)?;

        info!("Diversity chart rendered successfully");
        Ok(())
    }

    /// Parse a distance triple file into a symmetric matrix.
    ///
    /// # Errors
    ///
    /// Returns [`PhyloplotError::Parse`] holding every diagnostic if the
    /// file is rejected.
    pub fn parse_distances(&self, source: &str) -> Result<Parsed<DistanceMatrix>, PhyloplotError> {
        info!("Parsing distance matrix");

        let parsed =
            phyloplot_parser::parse_distances(source, &self.config.tree_space().parse_config())
                .map_err(|err| PhyloplotError::new_parse_error(err, source))?;

        log_warnings(parsed.warnings());
        debug!(size = parsed.value().size(); "Distance matrix parsed successfully");

        Ok(parsed)
    }

    /// Embed a distance matrix with the configured [`Umap`] embedder.
    ///
    /// # Errors
    ///
    /// Returns [`PhyloplotError::Embedding`] if the matrix or the embedding
    /// parameters are rejected.
    pub fn embed(&self, matrix: &DistanceMatrix) -> Result<Embedding, PhyloplotError> {
        let umap = Umap::new(self.config.tree_space().embedding().clone());
        self.embed_with(&umap, matrix)
    }

    /// Embed a distance matrix with a caller-supplied embedder.
    ///
    /// # Errors
    ///
    /// Returns [`PhyloplotError::Embedding`] if the embedder fails.
    pub fn embed_with(
        &self,
        embedder: &dyn Embedder,
        matrix: &DistanceMatrix,
    ) -> Result<Embedding, PhyloplotError> {
        info!(points = matrix.size(); "Embedding distance matrix");
        let embedding = embedder.fit_transform(matrix)?;
        debug!(points = embedding.len(), bounds:? = embedding.bounds(); "Embedding complete");
        Ok(embedding)
    }

    /// Render an embedding as a scatter plot PNG at `output`.
    ///
    /// # Errors
    ///
    /// Returns [`PhyloplotError::Config`] for unusable style settings and
    /// [`PhyloplotError::Export`] if rendering or writing fails.
    pub fn render_tree_space(
        &self,
        embedding: &Embedding,
        output: &Path,
    ) -> Result<(), PhyloplotError> {
        info!(points = embedding.len(), output:? = output; "Rendering tree-space scatter plot");

        let theme = self.theme()?;
        export::write_png(output, &theme, &Scatter::new(embedding, &theme))?;

        info!("Tree-space scatter plot rendered successfully");
        Ok(())
    }

    fn theme(&self) -> Result<Theme, PhyloplotError> {
        Theme::from_style(self.config.style()).map_err(PhyloplotError::Config)
    }
}

fn log_warnings(warnings: &[phyloplot_parser::error::Diagnostic]) {
    if !warnings.is_empty() {
        debug!(count = warnings.len(); "Input accepted with warnings");
    }
    for warning in warnings {
        trace!(code:? = warning.code(); "{warning}");
    }
}
