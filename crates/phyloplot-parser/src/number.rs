//! Numeric field parsing.

use winnow::{
    Parser,
    ascii::{dec_uint, float},
    error::ContextError,
};

/// Why a numeric field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberError {
    /// Not a number at all, or trailing garbage after one.
    Invalid,
    /// Infinity or NaN.
    NonFinite,
}

/// Parses the whole of `text` as a finite `f64`.
///
/// Accepts integers, decimals and exponents with an optional sign.
pub(crate) fn parse_f64(text: &str) -> Result<f64, NumberError> {
    let value = float::<_, f64, ContextError>
        .parse(text)
        .map_err(|_| NumberError::Invalid)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumberError::NonFinite)
    }
}

/// Parses the whole of `text` as an unsigned index.
pub(crate) fn parse_index(text: &str) -> Option<usize> {
    dec_uint::<_, usize, ContextError>.parse(text).ok()
}
