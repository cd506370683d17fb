//! Parser for pairwise distance triples.
//!
//! Every non-blank line has the form `<i>-<j>-<d>`. Parsing runs in two
//! passes: the first validates each record and finds the largest index, the
//! second sizes the matrix and fills it symmetrically.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use winnow::{Parser, combinator::preceded, error::ModalResult};

use phyloplot_core::{
    input::MatrixSize,
    matrix::{DistanceMatrix, MatrixError},
};

use crate::{
    MatrixParseConfig, Parsed,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lines::{self, Field, Input, SourceLine},
    number::{self, NumberError},
    span::Span,
};

const DELIMITER: char = '-';

/// Number of records between progress log lines.
const PROGRESS_INTERVAL: usize = 10_000;

/// Largest supported matrix dimension. A full matrix of this size takes
/// about 150 MB.
const MAX_MATRIX_SIZE: usize = 4_096;

/// An auto-sized matrix with more than this many rows per mentioned index is
/// reported as sparse.
const SPARSE_RATIO: usize = 2;

/// Number of missing pairs listed in a completeness error.
const MISSING_PAIRS_SHOWN: usize = 10;

/// A validated record with the spans needed for later diagnostics.
#[derive(Debug, Clone)]
struct Triple {
    i: usize,
    j: usize,
    distance: f64,
    i_span: Span,
    j_span: Span,
    distance_span: Span,
    line_span: Span,
}

impl Triple {
    /// The pair with the smaller index first.
    fn pair(&self) -> (usize, usize) {
        (self.i.min(self.j), self.i.max(self.j))
    }

    /// Span of the field holding the offending index.
    fn span_of_index(&self, index: usize) -> Span {
        if index == self.i { self.i_span } else { self.j_span }
    }
}

/// Parse exactly three `-`-separated fields.
fn fields<'a>(input: &mut Input<'a>) -> ModalResult<[Field<'a>; 3]> {
    let i = lines::field(DELIMITER).parse_next(input)?;
    let j = preceded(DELIMITER, lines::field(DELIMITER)).parse_next(input)?;
    let distance = preceded(DELIMITER, lines::field(DELIMITER)).parse_next(input)?;
    Ok([i, j, distance])
}

fn index_error(field: &Field<'_>, line: &SourceLine<'_>) -> Diagnostic {
    Diagnostic::error(format!("index `{}` is not an unsigned integer", field.trimmed()))
        .with_code(ErrorCode::E101)
        .with_label(line.span_of(&field.range), "expected an index such as `0` or `12`")
}

fn parse_line(line: &SourceLine<'_>) -> Result<Triple, Vec<Diagnostic>> {
    let Ok([i_field, j_field, distance_field]) = fields.parse(line.input()) else {
        let found = line.text().split(DELIMITER).count();
        return Err(vec![
            Diagnostic::error(format!(
                "line {} has {found} `-`-separated fields, expected 3",
                line.number()
            ))
            .with_code(ErrorCode::E100)
            .with_label(line.span(), "expected `<i>-<j>-<distance>`")
            .with_help("distances are non-negative; a `-` always separates fields"),
        ]);
    };

    let mut problems = Vec::new();

    let i = number::parse_index(i_field.trimmed());
    if i.is_none() {
        problems.push(index_error(&i_field, line));
    }
    let j = number::parse_index(j_field.trimmed());
    if j.is_none() {
        problems.push(index_error(&j_field, line));
    }

    let distance_span = line.span_of(&distance_field.range);
    let distance = match number::parse_f64(distance_field.trimmed()) {
        Ok(distance) => Some(distance),
        Err(reason) => {
            let label = match reason {
                NumberError::Invalid => "expected a decimal number",
                NumberError::NonFinite => "distance must be finite",
            };
            problems.push(
                Diagnostic::error(format!(
                    "distance `{}` is not a finite number",
                    distance_field.trimmed()
                ))
                .with_code(ErrorCode::E102)
                .with_label(distance_span, label),
            );
            None
        }
    };

    match (i, j, distance) {
        (Some(i), Some(j), Some(distance)) if problems.is_empty() => Ok(Triple {
            i,
            j,
            distance,
            i_span: line.span_of(&i_field.range),
            j_span: line.span_of(&j_field.range),
            distance_span,
            line_span: line.span(),
        }),
        _ => Err(problems),
    }
}

/// Routes a per-line problem to the collector, downgrading it in lenient mode.
fn report(collector: &mut DiagnosticCollector, diagnostic: Diagnostic, lenient: bool) {
    if lenient {
        collector.emit(diagnostic.into_warning());
    } else {
        collector.emit(diagnostic);
    }
}

/// Parse a distance triple file into a [`DistanceMatrix`].
pub(crate) fn parse(
    source: &str,
    config: &MatrixParseConfig,
) -> Result<Parsed<DistanceMatrix>, ParseError> {
    if let MatrixSize::Fixed(size) = config.size {
        if size > MAX_MATRIX_SIZE {
            return Err(Diagnostic::error(format!(
                "matrix size {size} exceeds the largest supported size of {MAX_MATRIX_SIZE}"
            ))
            .with_code(ErrorCode::E200)
            .into());
        }
    }

    let lenient = config.mode.is_lenient();
    let mut collector = DiagnosticCollector::new();

    // Pass 1: record syntax.
    let mut triples = Vec::new();
    for line in lines::source_lines(source) {
        if line.is_blank() {
            continue;
        }
        match parse_line(&line) {
            Ok(triple) if triple.i.max(triple.j) >= MAX_MATRIX_SIZE => {
                let index = triple.i.max(triple.j);
                report(
                    &mut collector,
                    Diagnostic::error(format!(
                        "index {index} exceeds the largest supported matrix size of {MAX_MATRIX_SIZE}"
                    ))
                    .with_code(ErrorCode::E200)
                    .with_label(triple.span_of_index(index), "index too large"),
                    lenient,
                );
            }
            Ok(triple) => triples.push(triple),
            Err(problems) => {
                for problem in problems {
                    report(&mut collector, problem, lenient);
                }
            }
        }
        if line.number() % PROGRESS_INTERVAL == 0 {
            debug!(lines = line.number(), records = triples.len(); "Reading distance records");
        }
    }

    let size = match config.size {
        MatrixSize::Fixed(size) => size,
        MatrixSize::Auto => triples
            .iter()
            .map(|triple| triple.i.max(triple.j) + 1)
            .max()
            .unwrap_or(0),
    };
    if config.size == MatrixSize::Auto {
        let mentioned: HashSet<usize> = triples
            .iter()
            .flat_map(|triple| [triple.i, triple.j])
            .collect();
        if size > SPARSE_RATIO * mentioned.len() {
            warn!(
                size,
                mentioned = mentioned.len();
                "Most matrix indices never appear in the input; missing rows stay zero"
            );
        }
    }
    debug!(records = triples.len(), size; "Filling distance matrix");

    // Pass 2: symmetric fill.
    let mut matrix = DistanceMatrix::new(size);
    let mut given_at: HashMap<(usize, usize), Span> = HashMap::new();
    for (count, triple) in triples.iter().enumerate() {
        match matrix.set_symmetric(triple.i, triple.j, triple.distance) {
            Ok(previous) => {
                let pair = triple.pair();
                if let Some(previous) = previous.filter(|previous| *previous != triple.distance) {
                    let mut warning = Diagnostic::warning(format!(
                        "distance between {} and {} is given more than once",
                        pair.0, pair.1
                    ))
                    .with_code(ErrorCode::E202)
                    .with_label(triple.distance_span, format!("redefined as {}", triple.distance));
                    if let Some(first) = given_at.get(&pair) {
                        warning =
                            warning.with_secondary_label(*first, format!("first given as {previous}"));
                    }
                    collector.emit(warning.with_help("the last distance given is used"));
                }
                given_at.entry(pair).or_insert(triple.line_span);
            }
            Err(MatrixError::IndexOutOfBounds { index, size }) => report(
                &mut collector,
                Diagnostic::error(format!(
                    "index {index} is out of bounds for a {size}x{size} matrix"
                ))
                .with_code(ErrorCode::E200)
                .with_label(triple.span_of_index(index), format!("must be below {size}")),
                lenient,
            ),
            Err(MatrixError::NonZeroDiagonal { index, distance }) => report(
                &mut collector,
                Diagnostic::error(format!(
                    "distance from {index} to itself must be 0, found {distance}"
                ))
                .with_code(ErrorCode::E201)
                .with_label(triple.distance_span, "expected 0"),
                lenient,
            ),
        }
        if (count + 1) % PROGRESS_INTERVAL == 0 {
            debug!(filled = count + 1, total = triples.len(); "Filling distance matrix");
        }
    }

    if config.require_complete && !collector.has_errors() {
        let missing: Vec<_> = matrix.missing_pairs().collect();
        if !missing.is_empty() {
            let shown = missing
                .iter()
                .take(MISSING_PAIRS_SHOWN)
                .map(|(i, j)| format!("{i}-{j}"))
                .collect::<Vec<_>>()
                .join(", ");
            let more = missing.len().saturating_sub(MISSING_PAIRS_SHOWN);
            let listing = if more > 0 {
                format!("{shown} and {more} more")
            } else {
                shown
            };
            collector.emit(
                Diagnostic::error(format!(
                    "{} of {} pairs have no distance",
                    missing.len(),
                    size * size.saturating_sub(1) / 2
                ))
                .with_code(ErrorCode::E203)
                .with_help(format!("missing pairs: {listing}")),
            );
        }
    }

    let warnings = collector.finish()?;
    trace!(matrix:?; "Parsed distance matrix");

    Ok(Parsed::new(matrix, warnings))
}

#[cfg(test)]
mod tests {
    use phyloplot_core::input::ParseMode;

    use super::*;

    fn auto(source: &str) -> Result<Parsed<DistanceMatrix>, ParseError> {
        parse(source, &MatrixParseConfig::default())
    }

    fn rows(matrix: &DistanceMatrix) -> Vec<Vec<f64>> {
        matrix.rows().map(<[f64]>::to_vec).collect()
    }

    #[test]
    fn test_three_element_matrix() {
        let parsed = auto("0-1-5\n0-2-7\n1-2-3\n").unwrap();

        assert_eq!(
            rows(parsed.value()),
            vec![
                vec![0.0, 5.0, 7.0],
                vec![5.0, 0.0, 3.0],
                vec![7.0, 3.0, 0.0]
            ]
        );
        assert!(parsed.warnings().is_empty());
    }

    #[test]
    fn test_auto_size_from_largest_index() {
        let parsed = auto("3-1-2.5\n").unwrap();

        assert_eq!(parsed.value().size(), 4);
        assert_eq!(parsed.value().get(1, 3), Some(2.5));
        assert_eq!(parsed.value().get(0, 2), Some(0.0));
    }

    #[test]
    fn test_empty_source_gives_empty_matrix() {
        let parsed = auto("\n\n").unwrap();

        assert!(parsed.value().is_empty());
    }

    #[test]
    fn test_fixed_size_pads_with_zeros() {
        let config = MatrixParseConfig::default().with_size(MatrixSize::Fixed(10));
        let parsed = parse("0-1-5\n", &config).unwrap();

        assert_eq!(parsed.value().size(), 10);
        assert_eq!(parsed.value().get(9, 8), Some(0.0));
    }

    #[test]
    fn test_index_out_of_fixed_bounds() {
        let config = MatrixParseConfig::default().with_size(MatrixSize::Fixed(10));
        let err = parse("0-1-5\n3-10-2\n", &config).unwrap_err();

        assert!(err.has_code(ErrorCode::E200));
        // `10` sits at bytes 8..10
        assert_eq!(err.diagnostics()[0].labels()[0].span(), Span::new(8..10));
    }

    #[test]
    fn test_wrong_field_count() {
        let err = auto("0-1\n0-1-2-3\n0-1--5\n").unwrap_err();

        assert_eq!(err.errors().count(), 3);
        assert!(err.errors().all(|d| d.code() == Some(ErrorCode::E100)));
    }

    #[test]
    fn test_invalid_index_and_distance_reported_together() {
        let err = auto("a-1-x\n").unwrap_err();

        assert_eq!(err.errors().count(), 2);
        assert!(err.has_code(ErrorCode::E101));
        assert!(err.has_code(ErrorCode::E102));
    }

    #[test]
    fn test_non_finite_distance() {
        let err = auto("0-1-inf\n").unwrap_err();

        assert!(err.has_code(ErrorCode::E102));
    }

    #[test]
    fn test_self_distance_must_be_zero() {
        assert!(auto("2-2-0\n").is_ok());

        let err = auto("2-2-1.5\n").unwrap_err();
        assert!(err.has_code(ErrorCode::E201));
    }

    #[test]
    fn test_conflicting_duplicate_warns_and_last_wins() {
        let parsed = auto("0-1-5\n1-0-9\n").unwrap();

        assert_eq!(parsed.value().get(0, 1), Some(9.0));
        assert_eq!(parsed.value().get(1, 0), Some(9.0));
        assert_eq!(parsed.warnings().len(), 1);
        let warning = &parsed.warnings()[0];
        assert_eq!(warning.code(), Some(ErrorCode::E202));
        assert_eq!(warning.labels()[0].span(), Span::new(10..11));
        assert_eq!(warning.labels()[1].span(), Span::new(0..5));
    }

    #[test]
    fn test_identical_duplicate_is_silent() {
        let parsed = auto("0-1-5\n1-0-5\n").unwrap();

        assert!(parsed.warnings().is_empty());
    }

    #[test]
    fn test_require_complete() {
        let config = MatrixParseConfig::default().with_require_complete(true);

        assert!(parse("0-1-5\n0-2-7\n1-2-3\n", &config).is_ok());

        let err = parse("0-1-5\n0-2-7\n", &config).unwrap_err();
        assert!(err.has_code(ErrorCode::E203));
        assert_eq!(err.diagnostics()[0].help(), Some("missing pairs: 1-2"));
    }

    #[test]
    fn test_lenient_skips_bad_lines() {
        let config = MatrixParseConfig::default()
            .with_mode(ParseMode::Lenient)
            .with_size(MatrixSize::Fixed(3));
        let parsed = parse("0-1-5\nnonsense\n0-7-1\n1-2-3\n", &config).unwrap();

        assert_eq!(parsed.value().get(1, 2), Some(3.0));
        assert_eq!(parsed.warnings().len(), 2);
        assert_eq!(parsed.warnings()[0].code(), Some(ErrorCode::E100));
        assert_eq!(parsed.warnings()[1].code(), Some(ErrorCode::E200));
    }

    #[test]
    fn test_lenient_completeness_stays_an_error() {
        let config = MatrixParseConfig::default()
            .with_mode(ParseMode::Lenient)
            .with_require_complete(true);

        let err = parse("0-2-1\n", &config).unwrap_err();
        assert!(err.has_code(ErrorCode::E203));
    }

    #[test]
    fn test_oversized_matrix_rejected() {
        let config = MatrixParseConfig::default().with_size(MatrixSize::Fixed(MAX_MATRIX_SIZE + 1));
        assert!(parse("0-1-5\n", &config).unwrap_err().has_code(ErrorCode::E200));

        let err = auto("0-123456789-5\n").unwrap_err();
        assert!(err.has_code(ErrorCode::E200));

        let err = auto(&format!("0-{MAX_MATRIX_SIZE}-1\n")).unwrap_err();
        assert!(err.has_code(ErrorCode::E200));
    }

    #[test]
    fn test_whitespace_in_fields() {
        let parsed = auto(" 0 - 1 - 2.5 \n").unwrap();

        assert_eq!(parsed.value().get(0, 1), Some(2.5));
    }
}
