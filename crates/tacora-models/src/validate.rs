//! Concurrent structural validation of columnar responses.

use rayon::prelude::*;
use tacora_types::{DateRange, Result, SchemaVersion, TacoraError};
use tracing::trace;

/// One independent validity check.
///
/// A family declares which checks apply to it through [`Columnar::CHECKS`];
/// when several fail, the one declared first is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// The time column never decreases.
    Ascending,
    /// Every present column has the length of the first one.
    EqualLength,
    /// No present column is empty.
    NonEmpty,
    /// The optional columns resolve to a schema version.
    Version,
}

/// Checks applied to candle families, in reporting order.
pub const CANDLE_CHECKS: &[Check] = &[
    Check::Ascending,
    Check::EqualLength,
    Check::NonEmpty,
    Check::Version,
];

/// Checks applied to families keyed by symbol rather than time.
pub const KEYED_CHECKS: &[Check] = &[Check::EqualLength, Check::NonEmpty];

/// A response stored as parallel columns.
pub trait Columnar: Sync {
    /// Checks that apply to this family, in reporting order.
    const CHECKS: &'static [Check];

    /// Wire key and length of every present column; the first entry is the
    /// reference for the equal-length check.
    fn column_lengths(&self) -> Vec<(&'static str, usize)>;

    /// Wire key and values of the time column, if the family has one.
    fn time_column(&self) -> Option<(&'static str, &[i64])> {
        None
    }

    /// Resolves the schema version from the optional columns.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::UnresolvableVersion`] if the optional columns
    /// match no version.
    fn version(&self) -> Result<SchemaVersion> {
        Ok(SchemaVersion::V1)
    }

    /// Number of rows, taken from the reference column.
    fn len(&self) -> usize {
        self.column_lengths().first().map_or(0, |&(_, len)| len)
    }

    /// Returns true if the response has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Range spanned by the time column.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::NoTimeColumn`] if the family has no time
    /// column, or an error if the column is empty or a timestamp is out of
    /// range.
    fn date_range(&self) -> Result<DateRange> {
        let (column, times) = self.time_column().ok_or(TacoraError::NoTimeColumn)?;
        DateRange::spanning(times)?.ok_or(TacoraError::EmptyColumn(column))
    }
}

/// Appends the length of an optional column if it is present.
pub(crate) fn push_present<T>(
    lengths: &mut Vec<(&'static str, usize)>,
    column: &'static str,
    values: Option<&[T]>,
) {
    if let Some(values) = values {
        lengths.push((column, values.len()));
    }
}

/// Runs a single check.
///
/// # Errors
///
/// Returns the failure of that check.
pub fn run_check<C: Columnar + ?Sized>(columns: &C, check: Check) -> Result<()> {
    match check {
        Check::Ascending => {
            if let Some((column, times)) = columns.time_column() {
                if let Some(index) = (1..times.len()).find(|&i| times[i] < times[i - 1]) {
                    return Err(TacoraError::NotAscending { column, index });
                }
            }
            Ok(())
        }
        Check::EqualLength => {
            let lengths = columns.column_lengths();
            let Some(&(_, expected)) = lengths.first() else {
                return Ok(());
            };
            match lengths.iter().find(|&&(_, len)| len != expected) {
                Some(&(column, found)) => Err(TacoraError::LengthMismatch {
                    column,
                    expected,
                    found,
                }),
                None => Ok(()),
            }
        }
        Check::NonEmpty => match columns.column_lengths().iter().find(|&&(_, len)| len == 0) {
            Some(&(column, _)) => Err(TacoraError::EmptyColumn(column)),
            None => Ok(()),
        },
        Check::Version => columns.version().map(|_| ()),
    }
}

/// Runs every check of the family concurrently and reports the first failure
/// in declared order.
///
/// All checks run to completion before a result is chosen, so the reported
/// error does not depend on scheduling.
///
/// # Errors
///
/// Returns the failure of the first declared check that failed.
pub fn run_checks<C: Columnar>(columns: &C) -> Result<()> {
    let outcomes: Vec<Result<()>> = C::CHECKS
        .par_iter()
        .map(|&check| run_check(columns, check))
        .collect();
    trace!(checks = outcomes.len(), "validation checks finished");
    outcomes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Series {
        time: Vec<i64>,
        value: Vec<f64>,
        extra: Option<Vec<f64>>,
    }

    impl Columnar for Series {
        const CHECKS: &'static [Check] = CANDLE_CHECKS;

        fn column_lengths(&self) -> Vec<(&'static str, usize)> {
            let mut lengths = vec![("t", self.time.len()), ("x", self.value.len())];
            if let Some(extra) = &self.extra {
                lengths.push(("extra", extra.len()));
            }
            lengths
        }

        fn time_column(&self) -> Option<(&'static str, &[i64])> {
            Some(("t", &self.time))
        }

        fn version(&self) -> Result<SchemaVersion> {
            match &self.extra {
                None => Ok(SchemaVersion::V1),
                Some(extra) if !extra.is_empty() => Ok(SchemaVersion::V2),
                Some(_) => Err(TacoraError::UnresolvableVersion("extra is empty".into())),
            }
        }
    }

    fn series(time: Vec<i64>) -> Series {
        let value = vec![1.0; time.len()];
        Series {
            time,
            value,
            extra: None,
        }
    }

    #[test]
    fn test_ascending_passes() {
        assert!(run_checks(&series(vec![1, 2, 3, 4, 5])).is_ok());
    }

    #[test]
    fn test_equal_adjacent_timestamps_pass() {
        assert!(run_checks(&series(vec![1, 2, 2, 3])).is_ok());
    }

    #[test]
    fn test_descending_fails() {
        let err = run_checks(&series(vec![1, 3, 2, 4, 5])).unwrap_err();
        assert!(matches!(err, TacoraError::NotAscending { column: "t", index: 2 }));
    }

    #[test]
    fn test_length_mismatch() {
        let mut s = series(vec![1, 2, 3]);
        s.value.pop();
        assert!(matches!(
            run_checks(&s),
            Err(TacoraError::LengthMismatch {
                column: "x",
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(
            run_checks(&series(vec![])),
            Err(TacoraError::EmptyColumn("t"))
        ));
    }

    #[test]
    fn test_first_declared_failure_wins() {
        // Descending and mismatched at once: ascending is declared first.
        let mut s = series(vec![3, 2, 1]);
        s.value.push(1.0);
        assert!(matches!(
            run_checks(&s),
            Err(TacoraError::NotAscending { .. })
        ));
    }

    #[test]
    fn test_version_check() {
        let mut s = series(vec![1, 2]);
        s.extra = Some(vec![]);
        assert!(matches!(
            run_check(&s, Check::Version),
            Err(TacoraError::UnresolvableVersion(_))
        ));
        s.extra = Some(vec![0.5, 0.6]);
        assert!(run_checks(&s).is_ok());
        assert_eq!(s.version().unwrap(), SchemaVersion::V2);
    }

    #[test]
    fn test_date_range() {
        let s = series(vec![100, 200, 300]);
        let range = s.date_range().unwrap();
        assert_eq!(range, DateRange::from_timestamps(100, 300).unwrap());
        assert!(matches!(
            series(vec![]).date_range(),
            Err(TacoraError::EmptyColumn("t"))
        ));
    }
}
