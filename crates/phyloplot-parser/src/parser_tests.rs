//! Property tests across both input formats.
//!
//! Generated well-formed files must parse into models that mirror the
//! records they were built from, and arbitrary text must never panic.

use proptest::{prelude::*, test_runner::TestCaseError};

use phyloplot_core::input::MatrixSize;

use crate::{MatrixParseConfig, SeriesParseConfig, parse_distances, parse_diversity};

// ===================
// Strategies
// ===================

/// Clade names: letters, digits and underscores, never blank.
fn clade_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

/// Finite values written the way the diversity files write them.
fn value_strategy() -> impl Strategy<Value = f64> {
    (0u32..100_000, 0u32..1000).prop_map(|(integer, fraction)| {
        format!("{integer}.{fraction}")
            .parse()
            .unwrap_or_default()
    })
}

/// Distinct clades, each with its own value list.
fn series_strategy() -> impl Strategy<Value = Vec<(String, Vec<f64>)>> {
    prop::collection::btree_map(
        clade_strategy(),
        prop::collection::vec(value_strategy(), 1..10),
        0..12,
    )
    .prop_map(|map| map.into_iter().collect())
}

/// Triples over a matrix of up to 12 elements, self-pairs always zero.
fn triples_strategy() -> impl Strategy<Value = Vec<(usize, usize, u32)>> {
    prop::collection::vec((0usize..12, 0usize..12, 0u32..1000), 1..60).prop_map(|triples| {
        triples
            .into_iter()
            .map(|(i, j, d)| if i == j { (i, j, 0) } else { (i, j, d) })
            .collect()
    })
}

fn render_series(series: &[(String, Vec<f64>)]) -> String {
    series
        .iter()
        .map(|(clade, values)| {
            let values: Vec<String> = values.iter().map(f64::to_string).collect();
            format!("{clade}: {}\n", values.join(","))
        })
        .collect()
}

fn render_triples(triples: &[(usize, usize, u32)]) -> String {
    triples
        .iter()
        .map(|(i, j, d)| format!("{i}-{j}-{d}\n"))
        .collect()
}

// ===================
// Property Test Functions
// ===================

/// Parsed clades keep file order and every value of their line.
fn check_series_mirror_records(series: &[(String, Vec<f64>)]) -> Result<(), TestCaseError> {
    let source = render_series(series);
    let parsed = parse_diversity(&source, &SeriesParseConfig::default())
        .map_err(|err| TestCaseError::fail(format!("rejected `{source}`: {err}")))?;

    let parsed_clades: Vec<_> = parsed.value().clades().collect();
    let expected_clades: Vec<_> = series.iter().map(|(clade, _)| clade.as_str()).collect();
    prop_assert_eq!(parsed_clades, expected_clades);

    for (clade, values) in series {
        prop_assert_eq!(parsed.value().get(clade), Some(values.as_slice()));
    }
    Ok(())
}

/// The matrix is symmetric, has a zero diagonal and holds the last distance
/// given for every pair.
fn check_matrix_is_symmetric_fill(triples: &[(usize, usize, u32)]) -> Result<(), TestCaseError> {
    let source = render_triples(triples);
    let parsed = parse_distances(&source, &MatrixParseConfig::default())
        .map_err(|err| TestCaseError::fail(format!("rejected `{source}`: {err}")))?;
    let matrix = parsed.value();

    let expected_size = triples.iter().map(|(i, j, _)| i.max(j) + 1).max();
    prop_assert_eq!(Some(matrix.size()), expected_size);

    for k in 0..matrix.size() {
        prop_assert_eq!(matrix.get(k, k), Some(0.0));
    }
    for &(i, j, _) in triples {
        let last = triples
            .iter()
            .rev()
            .find(|&&(a, b, _)| (a, b) == (i, j) || (b, a) == (i, j))
            .map(|&(_, _, d)| f64::from(d));
        prop_assert_eq!(matrix.get(i, j), last);
        prop_assert_eq!(matrix.get(i, j), matrix.get(j, i));
    }
    prop_assert!(matrix.is_symmetric(0.0));
    Ok(())
}

/// Parsing the same series text twice yields equal mappings.
fn check_series_parsing_is_idempotent(source: &str) -> Result<(), TestCaseError> {
    let config = SeriesParseConfig::default();
    let first = parse_diversity(source, &config)
        .map_err(|err| TestCaseError::fail(format!("rejected `{source}`: {err}")))?;
    let second = parse_diversity(source, &config)
        .map_err(|err| TestCaseError::fail(format!("rejected `{source}`: {err}")))?;
    prop_assert_eq!(first.value(), second.value());
    prop_assert_eq!(first.warnings().len(), second.warnings().len());
    Ok(())
}

/// Parsing the same text twice yields the same structures.
fn check_parsing_is_idempotent(source: &str) -> Result<(), TestCaseError> {
    let config = MatrixParseConfig::default().with_size(MatrixSize::Fixed(12));
    let first = parse_distances(source, &config).ok().map(|p| p.into_parts().0);
    let second = parse_distances(source, &config).ok().map(|p| p.into_parts().0);
    prop_assert_eq!(first, second);
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn series_mirror_records(series in series_strategy()) {
        check_series_mirror_records(&series)?;
    }

    #[test]
    fn matrix_is_symmetric_fill(triples in triples_strategy()) {
        check_matrix_is_symmetric_fill(&triples)?;
    }

    #[test]
    fn series_parsing_is_idempotent(series in series_strategy()) {
        check_series_parsing_is_idempotent(&render_series(&series))?;
    }

    #[test]
    fn parsing_is_idempotent(triples in triples_strategy()) {
        check_parsing_is_idempotent(&render_triples(&triples))?;
    }

    #[test]
    fn arbitrary_text_never_panics(source in "[ -~\n]{0,200}") {
        let _ = parse_diversity(&source, &SeriesParseConfig::default());
        let _ = parse_distances(&source, &MatrixParseConfig::default());
    }
}
