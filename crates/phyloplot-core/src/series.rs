//! Clade diversity series and the year axis they are plotted against.
//!
//! A [`CladeSeries`] maps clade names to one phylogenetic-diversity value per
//! year. Iteration follows insertion order, which is the order in which clades
//! appear in the input file. The length of each sequence is not constrained
//! here; it is checked against a [`YearAxis`] with
//! [`CladeSeries::check_lengths`] right before plotting.
//!
//! # Example
//!
//! ```
//! use phyloplot_core::series::{CladeSeries, YearAxis};
//!
//! let mut series = CladeSeries::new();
//! series.insert("mammalia", vec![10.5, 11.0, 11.2]);
//!
//! assert!(series.check_lengths(&YearAxis::new(2015, 3)).is_ok());
//! assert!(series.check_lengths(&YearAxis::default()).is_err());
//! ```

use indexmap::IndexMap;
use thiserror::Error;

/// First year of the default axis.
pub const DEFAULT_AXIS_START: i32 = 2015;

/// Number of years on the default axis (2015 through 2022).
pub const DEFAULT_AXIS_LENGTH: usize = 8;

/// A series whose length does not match the axis it is plotted against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("series for clade `{clade}` has {actual} values but the axis has {expected} points")]
pub struct SeriesLengthError {
    /// Name of the offending clade.
    pub clade: String,
    /// Number of points on the axis.
    pub expected: usize,
    /// Number of values supplied for the clade.
    pub actual: usize,
}

/// An axis whose last year does not fit in an `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("an axis of {length} years starting at {start} ends past the last representable year")]
pub struct AxisRangeError {
    pub start: i32,
    pub length: usize,
}

/// Consecutive integer years used as the horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearAxis {
    start: i32,
    length: usize,
}

impl YearAxis {
    /// Creates an axis of `length` consecutive years beginning at `start`.
    ///
    /// Years past `i32::MAX` are dropped from [`years`](Self::years); use
    /// [`try_new`](Self::try_new) to reject such axes instead.
    pub fn new(start: i32, length: usize) -> Self {
        Self { start, length }
    }

    /// Creates an axis, failing if its last year is not representable.
    pub fn try_new(start: i32, length: usize) -> Result<Self, AxisRangeError> {
        let axis = Self::new(start, length);
        if length > 0 && axis.end().is_none() {
            return Err(AxisRangeError { start, length });
        }
        Ok(axis)
    }

    /// Returns the first year.
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Returns the number of points on the axis.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the axis has no points.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the last year, or `None` for an empty axis or one ending past
    /// `i32::MAX`.
    pub fn end(&self) -> Option<i32> {
        let last = i32::try_from(self.length.checked_sub(1)?).ok()?;
        self.start.checked_add(last)
    }

    /// Iterates over the years on the axis.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.length).map_while(move |offset| {
            i32::try_from(offset)
                .ok()
                .and_then(|offset| self.start.checked_add(offset))
        })
    }
}

impl Default for YearAxis {
    fn default() -> Self {
        Self::new(DEFAULT_AXIS_START, DEFAULT_AXIS_LENGTH)
    }
}

/// Insertion-ordered mapping from clade name to its per-year values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CladeSeries {
    clades: IndexMap<String, Vec<f64>>,
}

impl CladeSeries {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the values for a clade.
    ///
    /// If the clade is already present its values are replaced while it keeps
    /// its original position, and the previous values are returned.
    pub fn insert(&mut self, clade: impl Into<String>, values: Vec<f64>) -> Option<Vec<f64>> {
        self.clades.insert(clade.into(), values)
    }

    /// Returns the values for a clade.
    pub fn get(&self, clade: &str) -> Option<&[f64]> {
        self.clades.get(clade).map(Vec::as_slice)
    }

    /// Returns `true` if the clade is present.
    pub fn contains(&self, clade: &str) -> bool {
        self.clades.contains_key(clade)
    }

    /// Returns the number of clades.
    pub fn len(&self) -> usize {
        self.clades.len()
    }

    /// Returns `true` if no clade has been inserted.
    pub fn is_empty(&self) -> bool {
        self.clades.is_empty()
    }

    /// Iterates over `(clade, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.clades
            .iter()
            .map(|(clade, values)| (clade.as_str(), values.as_slice()))
    }

    /// Iterates over clade names in insertion order.
    pub fn clades(&self) -> impl Iterator<Item = &str> {
        self.clades.keys().map(String::as_str)
    }

    /// Checks that every series has exactly one value per axis point.
    ///
    /// # Errors
    ///
    /// Returns a [`SeriesLengthError`] naming the first clade, in insertion
    /// order, whose length differs from the axis length.
    pub fn check_lengths(&self, axis: &YearAxis) -> Result<(), SeriesLengthError> {
        match self
            .iter()
            .find(|(_, values)| values.len() != axis.len())
        {
            Some((clade, values)) => Err(SeriesLengthError {
                clade: clade.to_string(),
                expected: axis.len(),
                actual: values.len(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the smallest and largest value over all series.
    ///
    /// Returns `None` when there are no values at all.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.clades
            .values()
            .flatten()
            .fold(None, |range, &value| match range {
                None => Some((value, value)),
                Some((lo, hi)) => Some((f64::min(lo, value), f64::max(hi, value))),
            })
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_axis_near_year_limit() {
        let axis = YearAxis::new(i32::MAX - 1, 3);
        assert_eq!(axis.end(), None);
        assert_eq!(axis.years().collect::<Vec<_>>(), vec![i32::MAX - 1, i32::MAX]);

        let err = YearAxis::try_new(i32::MAX - 1, 3).unwrap_err();
        assert_eq!(err, AxisRangeError { start: i32::MAX - 1, length: 3 });
        assert_eq!(YearAxis::try_new(i32::MAX - 1, 2).unwrap().end(), Some(i32::MAX));
    }

    #[test]
    fn test_axis_longer_than_i32() {
        let length = usize::try_from(i64::from(i32::MAX) + 10).unwrap_or(usize::MAX);
        assert!(YearAxis::try_new(0, length).is_err());
        assert!(YearAxis::try_new(2015, 0).unwrap().is_empty());
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut series = CladeSeries::new();
        series.insert("mammalia", vec![1.0]);
        series.insert("aves", vec![2.0]);
        series.insert("reptilia", vec![3.0]);

        let clades: Vec<_> = series.clades().collect();
        assert_eq!(clades, vec!["mammalia", "aves", "reptilia"]);
    }

    #[test]
    fn test_reinsert_keeps_position_and_replaces_values() {
        let mut series = CladeSeries::new();
        series.insert("mammalia", vec![1.0]);
        series.insert("aves", vec![2.0]);
        let previous = series.insert("mammalia", vec![5.0, 6.0]);

        assert_eq!(previous, Some(vec![1.0]));
        assert_eq!(series.clades().next(), Some("mammalia"));
        assert_eq!(series.get("mammalia"), Some(&[5.0, 6.0][..]));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_check_lengths_matching_axis() {
        let mut series = CladeSeries::new();
        series.insert("mammalia", vec![10.5, 11.0, 11.2]);

        assert!(series.check_lengths(&YearAxis::new(2015, 3)).is_ok());
    }

    #[test]
    fn test_check_lengths_reports_first_mismatch() {
        let mut series = CladeSeries::new();
        series.insert("mammalia", vec![10.5, 11.0, 11.2]);

        let err = series.check_lengths(&YearAxis::default()).unwrap_err();
        assert_eq!(err.clade, "mammalia");
        assert_eq!(err.expected, 8);
        assert_eq!(err.actual, 3);
    }

    #[test]
    fn test_empty_series_passes_length_check() {
        let series = CladeSeries::new();
        assert!(series.is_empty());
        assert!(series.check_lengths(&YearAxis::default()).is_ok());
        assert_eq!(series.value_range(), None);
    }

    #[test]
    fn test_value_range() {
        let mut series = CladeSeries::new();
        series.insert("a", vec![3.0, -1.5]);
        series.insert("b", vec![7.25]);

        let (lo, hi) = series.value_range().unwrap();
        assert_approx_eq!(f64, lo, -1.5);
        assert_approx_eq!(f64, hi, 7.25);
    }

    #[test]
    fn test_default_axis_years() {
        let axis = YearAxis::default();
        let years: Vec<_> = axis.years().collect();

        assert_eq!(years, (2015..2023).collect::<Vec<_>>());
        assert_eq!(axis.end(), Some(2022));
    }

    #[test]
    fn test_empty_axis() {
        let axis = YearAxis::new(2000, 0);
        assert!(axis.is_empty());
        assert_eq!(axis.end(), None);
        assert_eq!(axis.years().count(), 0);
    }

    #[test]
    fn test_length_error_message() {
        let err = SeriesLengthError {
            clade: "aves".to_string(),
            expected: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "series for clade `aves` has 3 values but the axis has 8 points"
        );
    }
}
