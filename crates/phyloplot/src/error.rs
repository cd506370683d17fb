//! Error types for phyloplot operations.
//!
//! This module provides the main error type [`PhyloplotError`] which wraps
//! the error conditions of both pipelines, from reading an input file to
//! persisting the rendered image.

use std::io;

use thiserror::Error;

use phyloplot_core::series::SeriesLengthError;
use phyloplot_parser::error::ParseError;

use crate::embed::EmbeddingError;

/// The main error type for phyloplot operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source code
/// spans. This provides detailed error information that can be used for rich
/// error reporting.
#[derive(Debug, Error)]
pub enum PhyloplotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Invalid series length: {0}")]
    InvalidSeriesLength(#[from] SeriesLengthError),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for PhyloplotError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl PhyloplotError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
