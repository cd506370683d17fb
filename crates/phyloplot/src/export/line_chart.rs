//! Phylogenetic diversity line chart.
//!
//! One line per clade against a [`YearAxis`], styled by position through
//! [`SeriesStyle::cycle`]. The right part of the image, sized by the
//! legend width ratio, holds the legend outside the plot area.

use log::{debug, warn};
use plotters::{
    backend::BitMapBackend,
    coord::Shift,
    drawing::DrawingArea,
    element::{Circle, PathElement, Polygon, Text},
    series::LineSeries,
};

use phyloplot_core::{
    color::Color,
    draw::{LineStyle, MarkerShape, SeriesStyle},
    series::{CladeSeries, YearAxis},
};

use super::{
    Chart, Error, Theme, fill,
    frame::{Axes, padded, year_range},
    stroke,
};

/// Distance of the first legend row from the top of the legend strip.
const LEGEND_TOP: i32 = 40;
/// Horizontal inset of the legend inside its strip.
const LEGEND_INSET: i32 = 10;
/// Length of the line sample drawn in front of each label.
const LEGEND_SAMPLE: i32 = 40;
const LEGEND_FONT_SIZE: i32 = 16;

/// A diversity line chart ready to be drawn.
///
/// Series lengths are expected to match the axis; see
/// [`CladeSeries::check_lengths`].
#[derive(Debug)]
pub struct LineChart<'a> {
    series: &'a CladeSeries,
    axis: YearAxis,
    theme: &'a Theme,
    x_desc: &'a str,
    y_desc: &'a str,
}

impl<'a> LineChart<'a> {
    pub fn new(series: &'a CladeSeries, axis: YearAxis, theme: &'a Theme) -> Self {
        Self {
            series,
            axis,
            theme,
            x_desc: "",
            y_desc: "",
        }
    }

    /// Sets the axis descriptions.
    pub fn with_labels(mut self, x_desc: &'a str, y_desc: &'a str) -> Self {
        self.x_desc = x_desc;
        self.y_desc = y_desc;
        self
    }

    fn axes(&self) -> Axes<'a> {
        let start = self.axis.start();
        let end = self.axis.end().unwrap_or(start);
        let (lo, hi) = self.series.value_range().unwrap_or((0.0, 1.0));

        Axes::new(year_range(start, end), padded(lo, hi))
            .with_integer_x(self.axis.len())
            .with_labels(self.x_desc, self.y_desc)
    }

    fn draw_legend(&self, area: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), Error> {
        let row_height = self.theme.marker_size.max(LEGEND_FONT_SIZE as u32) as i32 + 10;

        for (index, clade) in self.series.clades().enumerate() {
            let style = SeriesStyle::cycle(index, &self.theme.palette);
            let y = LEGEND_TOP + index as i32 * row_height;
            let sample = [
                (f64::from(LEGEND_INSET), f64::from(y)),
                (f64::from(LEGEND_INSET + LEGEND_SAMPLE), f64::from(y)),
            ];

            draw_polyline(area, &sample, style.line(), style.color(), self.theme.line_width)?;
            draw_marker(
                area,
                (LEGEND_INSET + LEGEND_SAMPLE / 2, y),
                style.marker(),
                style.color(),
                self.theme,
            )?;

            area.draw(&Text::new(
                clade.to_uppercase(),
                (LEGEND_INSET + LEGEND_SAMPLE + 10, y - LEGEND_FONT_SIZE / 2),
                ("sans-serif", LEGEND_FONT_SIZE),
            ))?;
        }
        Ok(())
    }
}

impl Chart for LineChart<'_> {
    fn draw(&self, root: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), Error> {
        if self.series.is_empty() {
            warn!("No clades to plot, rendering axes only");
        }

        let (width, _) = self.theme.size;
        let plot_width = (f64::from(width) * (1.0 - self.theme.legend_width_ratio)).round() as u32;
        let (plot_area, legend_area) = root.split_horizontally(plot_width);

        let mut chart = self.axes().draw(&plot_area, self.theme.grid)?;

        for (index, (clade, values)) in self.series.iter().enumerate() {
            let style = SeriesStyle::cycle(index, &self.theme.palette);
            debug!(clade, index, line:% = style.line(), marker:% = style.marker(); "Drawing series");

            let points: Vec<(f64, f64)> = self
                .axis
                .years()
                .zip(values)
                .map(|(year, &value)| (f64::from(year), value))
                .collect();
            let pixels: Vec<(i32, i32)> = points
                .iter()
                .map(|point| chart.backend_coord(point))
                .collect();

            if style.line() == LineStyle::Solid {
                chart.draw_series(LineSeries::new(
                    points,
                    stroke(style.color(), self.theme.line_width),
                ))?;
            } else {
                let pixels: Vec<(f64, f64)> = pixels
                    .iter()
                    .map(|&(x, y)| (f64::from(x), f64::from(y)))
                    .collect();
                draw_polyline(root, &pixels, style.line(), style.color(), self.theme.line_width)?;
            }
            for &center in &pixels {
                draw_marker(root, center, style.marker(), style.color(), self.theme)?;
            }
        }

        self.draw_legend(&legend_area)
    }
}

/// Draws a pixel-space polyline in the given pattern.
fn draw_polyline(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    points: &[(f64, f64)],
    line: LineStyle,
    color: Color,
    width: u32,
) -> Result<(), Error> {
    for run in line.split(points, f64::from(width)) {
        let run: Vec<(i32, i32)> = run
            .iter()
            .map(|&(x, y)| (x.round() as i32, y.round() as i32))
            .collect();
        area.draw(&PathElement::new(run, stroke(color, width)))?;
    }
    Ok(())
}

fn draw_marker(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    center: (i32, i32),
    marker: MarkerShape,
    color: Color,
    theme: &Theme,
) -> Result<(), Error> {
    let size = theme.marker_size;
    match marker {
        MarkerShape::Cross => {
            let tips = marker.outline(center, size);
            for stroke_tips in tips.chunks(2) {
                area.draw(&PathElement::new(
                    stroke_tips.to_vec(),
                    stroke(color, theme.line_width),
                ))?;
            }
        }
        MarkerShape::Circle => {
            area.draw(&Circle::new(center, size / 2, fill(color)))?;
        }
        MarkerShape::Triangle | MarkerShape::Square => {
            area.draw(&Polygon::new(marker.outline(center, size), fill(color)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        config::StyleConfig,
        export::{
            tests::{assert_png, small_theme},
            write_png,
        },
    };

    fn mammals() -> CladeSeries {
        let mut series = CladeSeries::new();
        series.insert("mammalia", vec![10.5, 11.0, 11.2]);
        series.insert("aves", vec![8.0, 8.5, 9.25]);
        series.insert("reptilia", vec![3.0, 2.5, 2.0]);
        series.insert("amphibia", vec![1.0, 1.0, 1.5]);
        series
    }

    #[test]
    fn test_renders_every_style() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diversity.png");
        let theme = small_theme();
        let series = mammals();

        let chart = LineChart::new(&series, YearAxis::new(2015, 3), &theme)
            .with_labels("Year", "Phylogenetic Diversity");
        write_png(&path, &theme, &chart).unwrap();

        assert_png(&path);
    }

    #[test]
    fn test_empty_series_renders_axes_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let theme = small_theme();
        let series = CladeSeries::new();

        write_png(&path, &theme, &LineChart::new(&series, YearAxis::default(), &theme)).unwrap();

        assert_png(&path);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_legend_shows_clade_names() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::from_style(&StyleConfig::default().with_size(800, 600)).unwrap();

        let render = |clade: &str| {
            let mut series = CladeSeries::new();
            series.insert(clade, vec![1.0, 2.0, 3.0]);
            let path = dir.path().join(format!("{clade}.png"));
            write_png(&path, &theme, &LineChart::new(&series, YearAxis::new(2015, 3), &theme))
                .unwrap();
            fs::read(&path).unwrap()
        };

        assert_ne!(render("a"), render("mammalia_very_long_clade_name"));
    }

    #[test]
    fn test_single_year_axis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.png");
        let theme = small_theme();
        let mut series = CladeSeries::new();
        series.insert("mammalia", vec![4.0]);

        write_png(&path, &theme, &LineChart::new(&series, YearAxis::new(2020, 1), &theme)).unwrap();

        assert_png(&path);
    }
}
