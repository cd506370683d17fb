//! Axes, grid and labels shared by all charts.

use std::ops::Range;

use plotters::{
    backend::BitMapBackend,
    chart::{ChartBuilder, ChartContext},
    coord::{Shift, cartesian::Cartesian2d, types::RangedCoordf64},
    drawing::DrawingArea,
    style::{Color as _, RGBColor},
};

use super::Error;

/// A chart with `f64` data coordinates on both axes.
pub(crate) type Chart2d<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 70;
const LABEL_FONT_SIZE: u32 = 14;
const DESC_FONT_SIZE: u32 = 18;

/// Share of the data span added on each side of an axis.
const PADDING_RATIO: f64 = 0.05;

/// Number of labelled grid lines per axis when not set explicitly.
const DEFAULT_LABELS: usize = 10;

const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

/// Data ranges and labels of a chart.
#[derive(Debug, Clone)]
pub(crate) struct Axes<'a> {
    x_range: Range<f64>,
    y_range: Range<f64>,
    x_labels: usize,
    integer_x: bool,
    x_desc: &'a str,
    y_desc: &'a str,
}

impl<'a> Axes<'a> {
    /// Axes spanning exactly the given ranges.
    pub(crate) fn new(x_range: Range<f64>, y_range: Range<f64>) -> Self {
        Self {
            x_range,
            y_range,
            x_labels: DEFAULT_LABELS,
            integer_x: false,
            x_desc: "",
            y_desc: "",
        }
    }

    /// Labels the x axis with about `count` whole numbers.
    pub(crate) fn with_integer_x(mut self, count: usize) -> Self {
        self.x_labels = count.max(1);
        self.integer_x = true;
        self
    }

    pub(crate) fn with_labels(mut self, x_desc: &'a str, y_desc: &'a str) -> Self {
        self.x_desc = x_desc;
        self.y_desc = y_desc;
        self
    }

    /// Builds the coordinate system on `area` and draws the mesh: axes,
    /// tick labels, descriptions and, if `grid` is set, grid lines.
    pub(crate) fn draw<'b, 'c>(
        &self,
        area: &'b DrawingArea<BitMapBackend<'c>, Shift>,
        grid: bool,
    ) -> Result<Chart2d<'b, 'c>, Error> {
        let mut chart = ChartBuilder::on(area)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(self.x_range.clone(), self.y_range.clone())?;

        let whole = |x: &f64| format!("{x:.0}");
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(self.x_labels)
            .label_style(("sans-serif", LABEL_FONT_SIZE))
            .axis_desc_style(("sans-serif", DESC_FONT_SIZE))
            .bold_line_style(GRID_COLOR.mix(0.8))
            .light_line_style(GRID_COLOR.mix(0.3));
        if self.integer_x {
            mesh.x_label_formatter(&whole);
        }
        if !grid {
            mesh.disable_mesh();
        }
        if !self.x_desc.is_empty() {
            mesh.x_desc(self.x_desc);
        }
        if !self.y_desc.is_empty() {
            mesh.y_desc(self.y_desc);
        }
        mesh.draw()?;

        Ok(chart)
    }
}

/// Returns `[lo, hi]` widened by [`PADDING_RATIO`] of its span on both
/// sides. A degenerate range is widened around its value.
pub(crate) fn padded(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * PADDING_RATIO
    } else {
        (lo.abs() * PADDING_RATIO).max(0.5)
    };
    (lo - pad)..(hi + pad)
}

/// Range covering the years `first..=last` with half a year on each side.
pub(crate) fn year_range(first: i32, last: i32) -> Range<f64> {
    (f64::from(first) - 0.5)..(f64::from(last) + 0.5)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_padded_adds_five_percent() {
        let range = padded(0.0, 100.0);
        assert_approx_eq!(f64, range.start, -5.0);
        assert_approx_eq!(f64, range.end, 105.0);
    }

    #[test]
    fn test_padded_degenerate_range() {
        let range = padded(3.0, 3.0);
        assert!(range.start < 3.0 && range.end > 3.0);

        let range = padded(0.0, 0.0);
        assert_approx_eq!(f64, range.start, -0.5);
        assert_approx_eq!(f64, range.end, 0.5);
    }

    #[test]
    fn test_year_range_keeps_single_year_centered() {
        let range = year_range(2020, 2020);
        assert_approx_eq!(f64, range.start, 2019.5);
        assert_approx_eq!(f64, range.end, 2020.5);
    }
}
