//! Error codes for the phyloplot diagnostic system.
//!
//! Error codes are organized by input:
//! - `E0xx` - Diversity series records
//! - `E1xx` - Distance triple records
//! - `E2xx` - Distance matrix validation

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Diversity Series Records (E0xx)
    // =========================================================================
    /// Missing separator.
    ///
    /// A record has no `": "` between the clade name and its values.
    E001,

    /// Multiple separators.
    ///
    /// A record contains `": "` more than once.
    E002,

    /// Empty clade name.
    ///
    /// Nothing precedes the `": "` separator.
    E003,

    /// Invalid number.
    ///
    /// A comma-separated value is empty or not a floating-point number.
    E004,

    /// Non-finite number.
    ///
    /// A value parses as infinity or NaN.
    E005,

    /// Duplicate clade.
    ///
    /// A clade appears on more than one line; the later values win.
    E006,

    /// Blank line.
    ///
    /// A whitespace-only line precedes a later record. Trailing blank lines
    /// are accepted silently.
    E007,

    // =========================================================================
    // Distance Triple Records (E1xx)
    // =========================================================================
    /// Wrong field count.
    ///
    /// A record does not consist of exactly three `-`-separated fields.
    E100,

    /// Invalid index.
    ///
    /// An index field is not an unsigned integer.
    E101,

    /// Invalid distance.
    ///
    /// The distance field is not a finite number.
    E102,

    // =========================================================================
    // Distance Matrix Validation (E2xx)
    // =========================================================================
    /// Index out of bounds.
    ///
    /// An index is not smaller than the configured matrix size.
    E200,

    /// Non-zero self distance.
    ///
    /// A record gives a distance other than zero between an element and itself.
    E201,

    /// Conflicting distance.
    ///
    /// The same pair is given twice with different distances; the later
    /// distance wins.
    E202,

    /// Missing pairs.
    ///
    /// Completeness was required but some pairs were never given.
    E203,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "missing separator",
            ErrorCode::E002 => "multiple separators",
            ErrorCode::E003 => "empty clade name",
            ErrorCode::E004 => "invalid number",
            ErrorCode::E005 => "non-finite number",
            ErrorCode::E006 => "duplicate clade",
            ErrorCode::E007 => "blank line",
            ErrorCode::E100 => "wrong field count",
            ErrorCode::E101 => "invalid index",
            ErrorCode::E102 => "invalid distance",
            ErrorCode::E200 => "index out of bounds",
            ErrorCode::E201 => "non-zero self distance",
            ErrorCode::E202 => "conflicting distance",
            ErrorCode::E203 => "missing pairs",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
