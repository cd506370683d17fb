//! Labeled source spans for diagnostic messages.
//!
//! A label associates a message with a span in the input file,
//! pointing at the line or field a diagnostic is about.

use crate::span::Span;

/// A labeled span in an input file.
///
/// # Primary vs Secondary Labels
///
/// - **Primary labels** mark the field or line that caused the diagnostic.
/// - **Secondary labels** point at related lines, such as the earlier line
///   that supplied the same distance pair.
///
/// # Example
///
/// ```text
/// warning[E202]: distance between 0 and 1 is given more than once
///   --> tree-space.out:4:1
///    |
///  4 | 1-0-9
///    |     ^ redefined as 9
///    |
///  1 | 0-1-5
///    |     - first given as 5
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
