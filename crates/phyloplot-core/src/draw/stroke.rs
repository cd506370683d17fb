//! Line patterns and their dash geometry.
//!
//! Raster backends only draw solid polylines, so patterned lines are cut into
//! the solid runs they consist of before drawing. The cut happens in pixel
//! space, which keeps dash lengths identical whatever the data scale of the
//! chart.
//!
//! | Style     | Dash pattern (on, off, ...) |
//! |-----------|-----------------------------|
//! | `Solid`   | none                        |
//! | `Dashed`  | `5, 5`                      |
//! | `DashDot` | `10, 5, 2, 5`               |
//!
//! Pattern lengths are multiplied by a scale factor, normally the line width.

use std::fmt;

/// Solid runs of a patterned polyline, one inner list per dash.
pub type DashSegments = Vec<Vec<(f64, f64)>>;

/// Defines the visual pattern of a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line with equal dash and gap lengths
    Dashed,
    /// Alternating dash and dot
    DashDot,
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::DashDot => "dashdot",
        };
        f.write_str(name)
    }
}

impl LineStyle {
    /// Returns the alternating on/off lengths of the pattern, or `None` for
    /// solid lines.
    pub fn dash_pattern(&self) -> Option<&'static [f64]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(&[5.0, 5.0]),
            Self::DashDot => Some(&[10.0, 5.0, 2.0, 5.0]),
        }
    }

    /// Cuts a polyline into the solid runs this style draws.
    ///
    /// `points` are pixel coordinates. The pattern continues across vertices,
    /// so a dash may bend around a corner. A solid style returns the whole
    /// polyline as a single run. Fewer than two points yield no runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use phyloplot_core::draw::LineStyle;
    ///
    /// // Two 5px dashes separated by 5px gaps.
    /// let runs = LineStyle::Dashed.split(&[(0.0, 0.0), (20.0, 0.0)], 1.0);
    /// assert_eq!(runs.len(), 2);
    /// ```
    pub fn split(&self, points: &[(f64, f64)], scale: f64) -> DashSegments {
        if points.len() < 2 {
            return Vec::new();
        }
        let Some(pattern) = self.dash_pattern() else {
            return vec![points.to_vec()];
        };

        let scale = scale.max(f64::EPSILON);
        let lengths: Vec<f64> = pattern.iter().map(|length| length * scale).collect();

        let mut runs = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        let mut phase = 0;
        let mut remaining = lengths[0];

        for pair in points.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let (dx, dy) = (end.0 - start.0, end.1 - start.1);
            let length = dx.hypot(dy);

            if is_on(phase) && current.is_empty() {
                current.push(start);
            }

            let mut travelled = 0.0;
            while length - travelled > remaining {
                travelled += remaining;
                let t = travelled / length;
                current.push((start.0 + dx * t, start.1 + dy * t));
                if is_on(phase) {
                    runs.push(std::mem::take(&mut current));
                }
                phase = (phase + 1) % lengths.len();
                remaining = lengths[phase];
            }

            remaining -= length - travelled;
            if is_on(phase) {
                current.push(end);
            }
        }

        if current.len() >= 2 {
            runs.push(current);
        }
        runs
    }
}

/// Even pattern phases draw, odd ones are gaps.
fn is_on(phase: usize) -> bool {
    phase % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_runs_eq(actual: &DashSegments, expected: &[&[(f64, f64)]]) {
        assert_eq!(actual.len(), expected.len(), "run count: {actual:?}");
        for (run, want) in actual.iter().zip(expected) {
            assert_eq!(run.len(), want.len(), "run length: {run:?}");
            for (&(x, y), &(wx, wy)) in run.iter().zip(want.iter()) {
                assert!(
                    (x - wx).abs() < 1e-9 && (y - wy).abs() < 1e-9,
                    "{run:?} != {want:?}"
                );
            }
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(LineStyle::Solid.to_string(), "solid");
        assert_eq!(LineStyle::Dashed.to_string(), "dashed");
        assert_eq!(LineStyle::DashDot.to_string(), "dashdot");
    }

    #[test]
    fn test_solid_is_single_run() {
        let points = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
        assert_eq!(LineStyle::Solid.split(&points, 2.0), vec![points.to_vec()]);
    }

    #[test]
    fn test_too_few_points() {
        assert!(LineStyle::Dashed.split(&[(1.0, 1.0)], 1.0).is_empty());
        assert!(LineStyle::Solid.split(&[], 1.0).is_empty());
    }

    #[test]
    fn test_dashed_straight_line() {
        let runs = LineStyle::Dashed.split(&[(0.0, 0.0), (30.0, 0.0)], 1.0);
        assert_runs_eq(
            &runs,
            &[
                &[(0.0, 0.0), (5.0, 0.0)],
                &[(10.0, 0.0), (15.0, 0.0)],
                &[(20.0, 0.0), (25.0, 0.0)],
            ],
        );
    }

    #[test]
    fn test_dash_continues_around_corner() {
        let runs = LineStyle::Dashed.split(&[(0.0, 0.0), (3.0, 0.0), (3.0, 10.0)], 1.0);
        assert_runs_eq(
            &runs,
            &[&[(0.0, 0.0), (3.0, 0.0), (3.0, 2.0)], &[(3.0, 7.0), (3.0, 10.0)]],
        );
    }

    #[test]
    fn test_scale_stretches_pattern() {
        let runs = LineStyle::Dashed.split(&[(0.0, 0.0), (20.0, 0.0)], 2.0);
        assert_runs_eq(&runs, &[&[(0.0, 0.0), (10.0, 0.0)]]);
    }

    #[test]
    fn test_dash_dot_pattern() {
        let runs = LineStyle::DashDot.split(&[(0.0, 0.0), (22.0, 0.0)], 1.0);
        assert_runs_eq(&runs, &[&[(0.0, 0.0), (10.0, 0.0)], &[(15.0, 0.0), (17.0, 0.0)]]);
    }
}
