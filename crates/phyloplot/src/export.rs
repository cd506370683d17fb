//! PNG export for phyloplot charts.
//!
//! This module renders charts to PNG files through the `plotters` bitmap
//! backend. It is the final stage of both pipelines.
//!
//! # Pipeline Position
//!
//! ```text
//! Input Text
//!     ↓ parse
//! CladeSeries / DistanceMatrix
//!     ↓ embed (tree space only)
//! Embedding
//!     ↓ export (this module)
//! PNG File
//! ```
//!
//! # Available Charts
//!
//! - [`line_chart::LineChart`] - one styled line per clade with an outside
//!   legend
//! - [`scatter::Scatter`] - one point per embedded tree
//!
//! # Atomic Writes
//!
//! [`write_png`] draws into a temporary file next to the destination and
//! renames it over the destination only once the image is complete, so a
//! failed render leaves any previous image untouched.
//!
//! # Text
//!
//! Axis labels and legend names are rendered with the system `sans-serif`
//! font through the plotters `ttf` backend.

mod frame;
pub mod line_chart;
pub mod scatter;

use std::path::Path;

use log::{debug, info};
use plotters::{
    backend::BitMapBackend,
    coord::Shift,
    drawing::{DrawingArea, DrawingAreaErrorKind, IntoDrawingArea},
    style::{Color as _, RGBAColor, RGBColor, ShapeStyle},
};

use phyloplot_core::color::Color;

use crate::config::StyleConfig;

/// Something that can be drawn onto a full-size bitmap.
///
/// Implementors only draw; the caller owns file handling and has already
/// filled the background.
pub trait Chart {
    /// Draws the chart onto `root`, whose coordinates are image pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a drawing operation fails.
    fn draw(&self, root: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), Error>;
}

/// Errors that can occur during chart export.
///
/// This type is converted into [`PhyloplotError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`PhyloplotError::Export`]: crate::PhyloplotError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Render(err.to_string())
    }
}

/// Resolved visual settings for one render.
///
/// Built from a [`StyleConfig`] once colours have been parsed.
#[derive(Debug, Clone)]
pub struct Theme {
    size: (u32, u32),
    background: Color,
    palette: Vec<Color>,
    grid: bool,
    legend_width_ratio: f64,
    marker_size: u32,
    line_width: u32,
    point_size: u32,
}

impl Theme {
    /// Resolves a [`StyleConfig`].
    ///
    /// # Errors
    ///
    /// Returns a message if a colour cannot be parsed or the image would be
    /// empty.
    pub fn from_style(style: &StyleConfig) -> Result<Self, String> {
        let (width, height) = style.size();
        if width == 0 || height == 0 {
            return Err(format!("image size must be positive, found {width}x{height}"));
        }
        Ok(Self {
            size: (width, height),
            background: style.background_color()?,
            palette: style.palette()?,
            grid: style.grid(),
            legend_width_ratio: style.legend_width_ratio(),
            marker_size: style.marker_size(),
            line_width: style.line_width(),
            point_size: style.point_size(),
        })
    }

    /// Image size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Series colours in cycling order.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

/// Renders `chart` into a PNG at `path`, replacing any existing file.
///
/// The image is drawn into a temporary file in the destination directory
/// which is then atomically renamed to `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the temporary file cannot be created or
/// persisted, and [`Error::Render`] if drawing or encoding fails. In both
/// cases the destination is left as it was.
pub fn write_png(path: &Path, theme: &Theme, chart: &dyn Chart) -> Result<(), Error> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .prefix(".phyloplot-")
        .suffix(".png")
        .tempfile_in(directory)
        .map_err(Error::Io)?;
    debug!(temp:? = temp.path(); "Rendering into temporary file");

    {
        let root = BitMapBackend::new(temp.path(), theme.size).into_drawing_area();
        root.fill(&to_rgba(theme.background))?;
        chart.draw(&root)?;
        root.present()?;
    }

    temp.persist(path).map_err(|err| Error::Io(err.error))?;
    info!(path:? = path, width = theme.size.0, height = theme.size.1; "Image written");
    Ok(())
}

/// Converts a CSS colour to the plotters representation.
pub(crate) fn to_rgba(color: Color) -> RGBAColor {
    let (r, g, b) = color.to_rgb8();
    RGBColor(r, g, b).mix(f64::from(color.alpha()))
}

/// Outline style of the given colour and width.
pub(crate) fn stroke(color: Color, width: u32) -> ShapeStyle {
    ShapeStyle {
        color: to_rgba(color),
        filled: false,
        stroke_width: width,
    }
}

/// Fill style of the given colour.
pub(crate) fn fill(color: Color) -> ShapeStyle {
    ShapeStyle {
        color: to_rgba(color),
        filled: true,
        stroke_width: 1,
    }
}
