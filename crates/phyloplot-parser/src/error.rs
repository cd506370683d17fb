//! Error and diagnostic system for the phyloplot parsers.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating every problem in a file
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! when a file is rejected.
//!
//! # Example
//!
//! ```
//! # use phyloplot_parser::error::{Diagnostic, ErrorCode};
//! # use phyloplot_parser::Span;
//!
//! let span = Span::new(40..48);
//! let first = Span::new(0..8);
//!
//! let diag = Diagnostic::warning("clade `mammalia` is defined multiple times")
//!     .with_code(ErrorCode::E006)
//!     .with_label(span, "redefined here")
//!     .with_secondary_label(first, "first defined here")
//!     .with_help("the later values replace the earlier ones");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
