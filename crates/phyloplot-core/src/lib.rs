//! Phyloplot Core Types and Definitions
//!
//! This crate provides the foundational types shared by the phyloplot
//! pipelines. It includes:
//!
//! - **Series**: Clade diversity series and the year axis they are plotted
//!   against ([`series`] module)
//! - **Matrix**: The dense symmetric distance matrix fed to embeddings
//!   ([`matrix`] module)
//! - **Input**: Options controlling how input files are interpreted
//!   ([`input`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Draw**: Per-series visual styles such as line patterns and markers
//!   ([`draw`] module)

pub mod color;
pub mod draw;
pub mod input;
pub mod matrix;
pub mod series;
