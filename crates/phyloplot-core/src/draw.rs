//! Visual definitions for chart series.
//!
//! - [`LineStyle`]: line pattern (solid, dashed, ...) and its dash geometry
//! - [`MarkerShape`]: shape drawn at every data point
//! - [`SeriesStyle`]: the combination assigned to one series
//!
//! Styles are assigned by position: series `n` gets `LINE_CYCLE[n % 3]`,
//! `MARKER_CYCLE[n % 4]` and `palette[n % palette.len()]`.

mod marker;
mod stroke;

pub use marker::MarkerShape;
pub use stroke::{DashSegments, LineStyle};

use crate::color::Color;

/// Line styles cycled over series, in order.
pub const LINE_CYCLE: [LineStyle; 3] = [LineStyle::Solid, LineStyle::DashDot, LineStyle::Dashed];

/// Marker shapes cycled over series, in order.
pub const MARKER_CYCLE: [MarkerShape; 4] = [
    MarkerShape::Cross,
    MarkerShape::Circle,
    MarkerShape::Triangle,
    MarkerShape::Square,
];

/// The full visual style of one plotted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    line: LineStyle,
    marker: MarkerShape,
    color: Color,
}

impl SeriesStyle {
    /// Creates a style from its parts.
    pub fn new(line: LineStyle, marker: MarkerShape, color: Color) -> Self {
        Self {
            line,
            marker,
            color,
        }
    }

    /// Returns the style for the series at `index`.
    ///
    /// An empty palette falls back to black.
    pub fn cycle(index: usize, palette: &[Color]) -> Self {
        let color = if palette.is_empty() {
            Color::default()
        } else {
            palette[index % palette.len()]
        };
        Self::new(
            LINE_CYCLE[index % LINE_CYCLE.len()],
            MARKER_CYCLE[index % MARKER_CYCLE.len()],
            color,
        )
    }

    /// Returns the line pattern.
    pub fn line(&self) -> LineStyle {
        self.line
    }

    /// Returns the marker shape.
    pub fn marker(&self) -> MarkerShape {
        self.marker
    }

    /// Returns the series color.
    pub fn color(&self) -> Color {
        self.color
    }
}
