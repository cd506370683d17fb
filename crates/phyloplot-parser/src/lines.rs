//! Line splitting and the delimiter grammar shared by both input formats.
//!
//! Records are parsed one line at a time over a [`LocatingSlice`] of the line
//! text, so byte ranges produced by winnow are relative to the line. A
//! [`SourceLine`] translates them back into [`Span`]s over the whole file.

use std::ops::Range;

use winnow::{
    Parser,
    error::{ContextError, ErrMode},
    stream::LocatingSlice,
    token::take_till,
};

use crate::span::Span;

pub(crate) type Input<'a> = LocatingSlice<&'a str>;

/// One line of the input with its position in the file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceLine<'a> {
    /// 1-based line number
    number: usize,
    /// Line text without the terminating `\n` or `\r\n`
    text: &'a str,
    /// Byte offset of the first character in the file
    offset: usize,
}

impl<'a> SourceLine<'a> {
    pub(crate) fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn text(&self) -> &'a str {
        self.text
    }

    /// Returns `true` if the line holds nothing but whitespace.
    pub(crate) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Span of the whole line, excluding the line terminator.
    pub(crate) fn span(&self) -> Span {
        Span::new(self.offset..self.offset + self.text.len())
    }

    /// Converts a range relative to the line into a file span.
    pub(crate) fn span_of(&self, range: &Range<usize>) -> Span {
        Span::new(self.offset + range.start..self.offset + range.end)
    }

    /// Returns a fresh winnow input over the line text.
    pub(crate) fn input(&self) -> Input<'a> {
        LocatingSlice::new(self.text)
    }
}

/// Splits `source` into lines, tracking the byte offset of each one.
///
/// Both `\n` and `\r\n` terminate a line. A trailing terminator does not
/// produce an extra empty line.
pub(crate) fn source_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    source
        .split_inclusive('\n')
        .scan(0usize, |offset, raw| {
            let start = *offset;
            *offset += raw.len();
            Some((start, raw))
        })
        .enumerate()
        .map(|(index, (offset, raw))| {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            SourceLine {
                number: index + 1,
                text,
                offset,
            }
        })
}

/// A delimited piece of a line and its byte range within the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field<'a> {
    pub text: &'a str,
    pub range: Range<usize>,
}

impl<'a> Field<'a> {
    /// The field text with surrounding whitespace removed.
    pub(crate) fn trimmed(&self) -> &'a str {
        self.text.trim()
    }
}

impl<'a> From<(&'a str, Range<usize>)> for Field<'a> {
    fn from((text, range): (&'a str, Range<usize>)) -> Self {
        Self { text, range }
    }
}

/// Parses text up to (not including) the next `delimiter` as a [`Field`].
///
/// The field may be empty; it never fails.
pub(crate) fn field<'a>(
    delimiter: char,
) -> impl Parser<Input<'a>, Field<'a>, ErrMode<ContextError>> {
    take_till(0.., delimiter).with_span().map(Field::from)
}
