//! Configuration types for phyloplot runs.
//!
//! This module provides configuration structures for the two pipelines and
//! for the shared plot style. All types implement [`serde::Deserialize`] for
//! loading from TOML, and every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`DiversityConfig`] - Input, output and axis of the diversity line chart.
//! - [`TreeSpaceConfig`] - Input, output, matrix sizing and [`EmbeddingConfig`]
//!   of the tree-space scatter plot.
//! - [`StyleConfig`] - Image size, colours, grid and marker sizes.
//!
//! # Example
//!
//! ```
//! # use phyloplot::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.diversity().axis().unwrap().years().next(), Some(2015));
//! assert!(config.style().palette().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use phyloplot_core::{
    color::{Color, DEFAULT_PALETTE},
    input::{MatrixSize, ParseMode},
    series::{DEFAULT_AXIS_LENGTH, DEFAULT_AXIS_START, YearAxis},
};
use phyloplot_parser::{MatrixParseConfig, SeriesParseConfig};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Diversity line chart section.
    #[serde(default)]
    diversity: DiversityConfig,

    /// Tree-space scatter plot section.
    #[serde(default)]
    tree_space: TreeSpaceConfig,

    /// Style section shared by both plots.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(diversity: DiversityConfig, tree_space: TreeSpaceConfig, style: StyleConfig) -> Self {
        Self {
            diversity,
            tree_space,
            style,
        }
    }

    /// Returns the diversity chart configuration.
    pub fn diversity(&self) -> &DiversityConfig {
        &self.diversity
    }

    /// Returns the tree-space configuration.
    pub fn tree_space(&self) -> &TreeSpaceConfig {
        &self.tree_space
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Configuration of the diversity line chart.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiversityConfig {
    input: PathBuf,
    output: PathBuf,
    axis_start: i32,
    axis_length: usize,
    parse_mode: ParseMode,
    x_label: String,
    y_label: String,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("phylogenetic-diversity/pds.out"),
            output: PathBuf::from("phylogenetic-diversity.png"),
            axis_start: DEFAULT_AXIS_START,
            axis_length: DEFAULT_AXIS_LENGTH,
            parse_mode: ParseMode::default(),
            x_label: "Year".to_string(),
            y_label: "Phylogenetic Diversity".to_string(),
        }
    }
}

impl DiversityConfig {
    /// Path of the `<clade>: <values>` input file.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Path of the PNG to write.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The year axis every series is plotted against.
    ///
    /// # Errors
    ///
    /// Returns an error if the last year of the axis is not representable.
    pub fn axis(&self) -> Result<YearAxis, String> {
        YearAxis::try_new(self.axis_start, self.axis_length)
            .map_err(|err| format!("Invalid diversity axis in config: {err}"))
    }

    /// Label under the x axis.
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    /// Label beside the y axis.
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Parser settings derived from this section.
    pub fn parse_config(&self) -> SeriesParseConfig {
        SeriesParseConfig::new(self.parse_mode)
    }

    /// Returns a copy reading from `input` and writing to `output`.
    pub fn with_paths(mut self, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self.output = output.into();
        self
    }

    /// Returns a copy plotting against `axis`.
    pub fn with_axis(mut self, axis: YearAxis) -> Self {
        self.axis_start = axis.start();
        self.axis_length = axis.len();
        self
    }
}

/// Configuration of the tree-space embedding and scatter plot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TreeSpaceConfig {
    input: PathBuf,
    output: PathBuf,
    /// Fixed matrix dimension; derived from the data when absent.
    matrix_size: Option<usize>,
    require_complete: bool,
    parse_mode: ParseMode,
    embedding: EmbeddingConfig,
}

impl Default for TreeSpaceConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("tree-space.out"),
            output: PathBuf::from("tree-space.png"),
            matrix_size: None,
            require_complete: false,
            parse_mode: ParseMode::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl TreeSpaceConfig {
    /// Path of the `<i>-<j>-<d>` input file.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Path of the PNG to write.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Embedding parameters.
    pub fn embedding(&self) -> &EmbeddingConfig {
        &self.embedding
    }

    /// Parser settings derived from this section.
    pub fn parse_config(&self) -> MatrixParseConfig {
        MatrixParseConfig::default()
            .with_mode(self.parse_mode)
            .with_size(MatrixSize::from(self.matrix_size))
            .with_require_complete(self.require_complete)
    }

    /// Returns a copy reading from `input` and writing to `output`.
    pub fn with_paths(mut self, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self.output = output.into();
        self
    }

    /// Returns a copy using the given embedding parameters.
    pub fn with_embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.embedding = embedding;
        self
    }
}

/// Parameters of the default UMAP-style embedder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Size of the local neighbourhood; clamped to `N - 1`.
    pub n_neighbors: usize,
    /// Optimisation epochs.
    pub n_epochs: usize,
    /// Initial SGD step size, decayed linearly to zero.
    pub learning_rate: f64,
    /// Negative samples drawn per attractive edge update.
    pub negative_sample_rate: usize,
    /// Minimum distance between embedded points, in `[0, 1]`.
    pub min_dist: f64,
    /// Seed for initialisation and negative sampling.
    pub seed: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 15,
            n_epochs: 200,
            learning_rate: 1.0,
            negative_sample_rate: 5,
            min_dist: 0.1,
            seed: 42,
        }
    }
}

/// Visual styling shared by both plots.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    width: u32,
    height: u32,
    background_color: String,
    grid: bool,
    /// Share of the image width reserved for the legend.
    legend_width_ratio: f64,
    marker_size: u32,
    line_width: u32,
    point_size: u32,
    palette: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 1000,
            background_color: "white".to_string(),
            grid: true,
            legend_width_ratio: 0.2,
            marker_size: 10,
            line_width: 2,
            point_size: 5,
            palette: DEFAULT_PALETTE.iter().map(|hex| hex.to_string()).collect(),
        }
    }
}

impl StyleConfig {
    /// Image size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether a background grid is drawn.
    pub fn grid(&self) -> bool {
        self.grid
    }

    /// Share of the width given to the legend, clamped to `[0, 0.9]`.
    pub fn legend_width_ratio(&self) -> f64 {
        self.legend_width_ratio.clamp(0.0, 0.9)
    }

    /// Full width of a line chart marker in pixels.
    pub fn marker_size(&self) -> u32 {
        self.marker_size
    }

    /// Stroke width of series lines in pixels.
    pub fn line_width(&self) -> u32 {
        self.line_width.max(1)
    }

    /// Radius of scatter points in pixels.
    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    /// Returns the parsed background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Color, String> {
        Color::new(&self.background_color)
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed series colours.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette is empty or an entry cannot be parsed.
    pub fn palette(&self) -> Result<Vec<Color>, String> {
        Color::parse_palette(&self.palette).map_err(|err| format!("Invalid palette in config: {err}"))
    }

    /// Returns a copy rendering at `width` x `height` pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}
