//! # Phyloplot Parser
//!
//! Parsers for the two phyloplot input formats:
//!
//! - diversity series, one `<clade>: <v1>,<v2>,...` record per line, read
//!   into a [`CladeSeries`];
//! - pairwise distances, one `<i>-<j>-<d>` record per line, read into a
//!   symmetric [`DistanceMatrix`].
//!
//! Problems are reported as [`Diagnostic`](error::Diagnostic)s with error
//! codes and byte spans into the source. In strict mode every error of a file
//! is collected before the file is rejected; in lenient mode malformed lines
//! become warnings and are skipped.
//!
//! ## Usage
//!
//! ```
//! # use phyloplot_parser::{parse_distances, MatrixParseConfig};
//! # use phyloplot_parser::error::ParseError;
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "0-1-5\n0-2-7\n1-2-3\n";
//!     let parsed = parse_distances(source, &MatrixParseConfig::default())?;
//!
//!     assert_eq!(parsed.value().get(2, 1), Some(3.0));
//!     Ok(())
//! }
//! ```

mod distance;
mod diversity;
pub mod error;
mod lines;
mod number;
#[cfg(test)]
mod parser_tests;
mod span;

pub use span::Span;

use log::info;

use phyloplot_core::{
    input::{MatrixSize, ParseMode},
    matrix::DistanceMatrix,
    series::CladeSeries,
};

use error::{Diagnostic, ParseError};

/// A successfully parsed value together with the warnings raised while
/// reading it.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    value: T,
    warnings: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    fn new(value: T, warnings: Vec<Diagnostic>) -> Self {
        Self { value, warnings }
    }

    /// The parsed value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Warnings such as duplicate definitions or lines skipped in lenient
    /// mode.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Splits into the value and its warnings.
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.warnings)
    }
}

/// Configuration for [`parse_diversity`].
#[derive(Debug, Clone, Default)]
pub struct SeriesParseConfig {
    /// How malformed lines are handled
    pub mode: ParseMode,
}

impl SeriesParseConfig {
    /// Create a new SeriesParseConfig with the given mode
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }
}

/// Configuration for [`parse_distances`].
#[derive(Debug, Clone, Default)]
pub struct MatrixParseConfig {
    /// How malformed lines are handled
    pub mode: ParseMode,
    /// Matrix dimension, derived from the data by default
    pub size: MatrixSize,
    /// Reject the input unless every pair is given
    pub require_complete: bool,
}

impl MatrixParseConfig {
    /// Sets the parse mode.
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets how the matrix dimension is chosen.
    pub fn with_size(mut self, size: MatrixSize) -> Self {
        self.size = size;
        self
    }

    /// Sets whether every unordered pair must be present.
    pub fn with_require_complete(mut self, require_complete: bool) -> Self {
        self.require_complete = require_complete;
        self
    }
}

/// Parse a diversity series file.
///
/// # Arguments
///
/// * `source` - The file contents
/// * `config` - Parse mode
///
/// # Returns
///
/// The clade series in file order with any warnings, or a [`ParseError`]
/// holding every diagnostic when the file is rejected.
///
/// # Example
///
/// ```
/// # use phyloplot_parser::{parse_diversity, SeriesParseConfig};
///
/// let parsed = parse_diversity("cladeA: 1.0,2.0,3.0\n", &SeriesParseConfig::default()).unwrap();
/// assert_eq!(parsed.value().get("cladeA"), Some(&[1.0, 2.0, 3.0][..]));
/// ```
pub fn parse_diversity(
    source: &str,
    config: &SeriesParseConfig,
) -> Result<Parsed<CladeSeries>, ParseError> {
    info!(mode:? = config.mode, bytes = source.len(); "Parsing diversity series");
    diversity::parse(source, config)
}

/// Parse a distance triple file into a symmetric matrix.
///
/// The matrix is sized from the largest index unless `config.size` fixes it.
/// Both `M[i][j]` and `M[j][i]` receive each distance; pairs that are never
/// given stay zero unless `config.require_complete` is set.
pub fn parse_distances(
    source: &str,
    config: &MatrixParseConfig,
) -> Result<Parsed<DistanceMatrix>, ParseError> {
    info!(
        mode:? = config.mode,
        size:? = config.size,
        require_complete = config.require_complete;
        "Parsing distance triples"
    );
    distance::parse(source, config)
}
