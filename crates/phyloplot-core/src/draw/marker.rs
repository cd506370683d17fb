//! Marker shapes drawn at data points.

use std::fmt;

/// Shape drawn at every data point of a line series.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerShape {
    /// Diagonal cross (`X`)
    #[default]
    Cross,
    /// Filled circle (`o`)
    Circle,
    /// Upward pointing filled triangle (`^`)
    Triangle,
    /// Filled square (`s`)
    Square,
}

impl MarkerShape {
    /// Returns the single-character code of this marker.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cross => "x",
            Self::Circle => "o",
            Self::Triangle => "^",
            Self::Square => "s",
        }
    }

    /// Returns the vertices of the marker outline centred on `center`.
    ///
    /// `size` is the marker's full width in pixels. A cross returns the four
    /// arm tips in the order `[top-left, bottom-right, top-right, bottom-left]`
    /// so that consecutive pairs form its two strokes; a circle has no
    /// polygon and returns an empty list.
    pub fn outline(&self, center: (i32, i32), size: u32) -> Vec<(i32, i32)> {
        let (cx, cy) = center;
        let half = (size / 2) as i32;
        match self {
            Self::Cross => vec![
                (cx - half, cy - half),
                (cx + half, cy + half),
                (cx + half, cy - half),
                (cx - half, cy + half),
            ],
            Self::Circle => Vec::new(),
            Self::Triangle => vec![(cx, cy - half), (cx + half, cy + half), (cx - half, cy + half)],
            Self::Square => vec![
                (cx - half, cy - half),
                (cx + half, cy - half),
                (cx + half, cy + half),
                (cx - half, cy + half),
            ],
        }
    }
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
