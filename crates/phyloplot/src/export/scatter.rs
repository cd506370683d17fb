//! Tree-space scatter plot: one filled point per embedded tree.

use plotters::{
    backend::BitMapBackend,
    coord::Shift,
    drawing::DrawingArea,
    element::{Circle, EmptyElement},
    series::PointSeries,
};

use phyloplot_core::color::Color;

use super::{
    Chart, Error, Theme, fill,
    frame::{Axes, padded},
};
use crate::embed::Embedding;

/// A scatter plot of an [`Embedding`], drawn in the first palette colour.
#[derive(Debug)]
pub struct Scatter<'a> {
    embedding: &'a Embedding,
    theme: &'a Theme,
}

impl<'a> Scatter<'a> {
    pub fn new(embedding: &'a Embedding, theme: &'a Theme) -> Self {
        Self { embedding, theme }
    }
}

impl Chart for Scatter<'_> {
    fn draw(&self, root: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), Error> {
        let (x, y) = self
            .embedding
            .bounds()
            .unwrap_or(((0.0, 1.0), (0.0, 1.0)));
        let mut chart =
            Axes::new(padded(x.0, x.1), padded(y.0, y.1)).draw(root, self.theme.grid)?;

        let color = self
            .theme
            .palette
            .first()
            .copied()
            .unwrap_or_else(Color::default);
        chart.draw_series(PointSeries::of_element(
            self.embedding.points().iter().copied(),
            self.theme.point_size,
            fill(color),
            &|coord, size, style| EmptyElement::at(coord) + Circle::new((0, 0), size, style),
        ))?;
        Ok(())
    }
}
