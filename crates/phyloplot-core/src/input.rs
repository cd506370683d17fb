//! Options controlling how input files are interpreted.

use serde::Deserialize;

/// How malformed input lines are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Any malformed line fails the whole run.
    #[default]
    Strict,
    /// Malformed lines are reported as warnings and skipped.
    Lenient,
}

impl ParseMode {
    /// Returns `true` for [`ParseMode::Lenient`].
    pub fn is_lenient(self) -> bool {
        matches!(self, Self::Lenient)
    }
}

/// How the dimension of a distance matrix is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatrixSize {
    /// One more than the largest index found in the input.
    #[default]
    Auto,
    /// A fixed dimension; larger indices are rejected.
    Fixed(usize),
}

impl From<Option<usize>> for MatrixSize {
    fn from(size: Option<usize>) -> Self {
        size.map_or(Self::Auto, Self::Fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_default_is_strict() {
        assert_eq!(ParseMode::default(), ParseMode::Strict);
        assert!(!ParseMode::Strict.is_lenient());
        assert!(ParseMode::Lenient.is_lenient());
    }

    #[test]
    fn test_matrix_size_from_option() {
        assert_eq!(MatrixSize::from(None), MatrixSize::Auto);
        assert_eq!(MatrixSize::from(Some(10)), MatrixSize::Fixed(10));
    }
}
