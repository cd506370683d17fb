//! Parser for clade diversity series.
//!
//! Every non-blank line has the form `<clade>: <v1>,<v2>,...,<vn>`. The
//! clade names keep their file order; a clade given twice keeps its first
//! position and takes the later values. Blank lines before a record draw a
//! warning; trailing ones are ignored.

use std::collections::HashMap;

use log::{debug, trace};
use winnow::{
    Parser,
    combinator::separated,
    error::ModalResult,
    token::take_until,
};

use phyloplot_core::series::CladeSeries;

use crate::{
    Parsed, SeriesParseConfig,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lines::{self, Field, Input, SourceLine},
    number::{self, NumberError},
    span::Span,
};

const SEPARATOR: &str = ": ";

/// A record split into its clade and value fields.
#[derive(Debug)]
struct Record<'a> {
    clade: Field<'a>,
    values: Vec<Field<'a>>,
}

/// Parse the `<clade>: <values>` structure of a line.
///
/// Fails only when the separator is missing.
fn record<'a>(input: &mut Input<'a>) -> ModalResult<Record<'a>> {
    let clade = take_until(0.., SEPARATOR)
        .with_span()
        .map(Field::from)
        .parse_next(input)?;
    SEPARATOR.parse_next(input)?;
    let values = separated(1.., lines::field(','), ',').parse_next(input)?;
    Ok(Record { clade, values })
}

/// Parses one line into a clade name and its values.
///
/// Returns every problem found on the line, not just the first.
fn parse_line<'a>(line: &SourceLine<'a>) -> Result<(&'a str, Span, Vec<f64>), Vec<Diagnostic>> {
    let Ok(parsed) = record.parse(line.input()) else {
        return Err(vec![
            Diagnostic::error(format!("line {} has no `: ` separator", line.number()))
                .with_code(ErrorCode::E001)
                .with_label(line.span(), "expected `<clade>: <values>`")
                .with_help("separate the clade name from its values with `: `"),
        ]);
    };

    let mut problems = Vec::new();

    let clade = parsed.clade.trimmed();
    let clade_span = line.span_of(&parsed.clade.range);
    if clade.is_empty() {
        problems.push(
            Diagnostic::error(format!("line {} has an empty clade name", line.number()))
                .with_code(ErrorCode::E003)
                .with_label(clade_span, "clade name expected here"),
        );
    }

    // A second separator can only sit inside one of the value fields.
    if let Some(at) = parsed
        .values
        .iter()
        .find_map(|value| value.text.find(SEPARATOR).map(|at| value.range.start + at))
    {
        problems.push(
            Diagnostic::error(format!(
                "line {} contains more than one `: ` separator",
                line.number()
            ))
            .with_code(ErrorCode::E002)
            .with_label(line.span_of(&(at..at + SEPARATOR.len())), "second separator")
            .with_secondary_label(
                line.span_of(&(parsed.clade.range.end..parsed.clade.range.end + SEPARATOR.len())),
                "first separator",
            ),
        );
    }

    let mut values = Vec::with_capacity(parsed.values.len());
    for value in &parsed.values {
        let span = line.span_of(&value.range);
        match number::parse_f64(value.trimmed()) {
            Ok(parsed_value) => values.push(parsed_value),
            Err(NumberError::Invalid) => problems.push(
                Diagnostic::error(format!("value `{}` is not a number", value.trimmed()))
                    .with_code(ErrorCode::E004)
                    .with_label(span, "expected a decimal number")
                    .with_help("values are separated by `,`"),
            ),
            Err(NumberError::NonFinite) => problems.push(
                Diagnostic::error(format!("value `{}` is not finite", value.trimmed()))
                    .with_code(ErrorCode::E005)
                    .with_label(span, "infinite or NaN values cannot be plotted"),
            ),
        }
    }

    if problems.is_empty() {
        Ok((clade, clade_span, values))
    } else {
        Err(problems)
    }
}

/// Parse a diversity series file into a [`CladeSeries`].
pub(crate) fn parse(
    source: &str,
    config: &SeriesParseConfig,
) -> Result<Parsed<CladeSeries>, ParseError> {
    let lenient = config.mode.is_lenient();
    let mut collector = DiagnosticCollector::new();
    let mut series = CladeSeries::new();
    let mut first_defined: HashMap<&str, Span> = HashMap::new();
    let mut skipped = 0usize;
    // Consecutive blank lines not yet followed by a record
    let mut blank_run: Option<Span> = None;

    for line in lines::source_lines(source) {
        if line.is_blank() {
            blank_run = Some(blank_run.map_or(line.span(), |run| run.union(line.span())));
            continue;
        }
        if let Some(run) = blank_run.take() {
            collector.emit(
                Diagnostic::warning("blank line before a record is ignored")
                    .with_code(ErrorCode::E007)
                    .with_label(run, "whitespace only")
                    .with_help("remove empty lines so every line holds a clade record"),
            );
        }

        match parse_line(&line) {
            Ok((clade, span, values)) => {
                trace!(line = line.number(), clade, count = values.len(); "Parsed clade record");
                if let Some(first) = first_defined.get(clade) {
                    collector.emit(
                        Diagnostic::warning(format!("clade `{clade}` is defined more than once"))
                            .with_code(ErrorCode::E006)
                            .with_label(span, "redefined here")
                            .with_secondary_label(*first, "first defined here")
                            .with_help("the values from the last definition are plotted"),
                    );
                } else {
                    first_defined.insert(clade, span);
                }
                series.insert(clade, values);
            }
            Err(problems) if lenient => {
                skipped += 1;
                for problem in problems {
                    collector.emit(problem.into_warning());
                }
            }
            Err(problems) => {
                for problem in problems {
                    collector.emit(problem);
                }
            }
        }
    }

    let warnings = collector.finish()?;
    debug!(
        clades = series.len(),
        skipped,
        warnings = warnings.len();
        "Parsed diversity series"
    );

    Ok(Parsed::new(series, warnings))
}
