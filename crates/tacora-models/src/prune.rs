//! In-place row removal for time-indexed responses.

use tacora_types::{DateRange, Result, TacoraError};
use tracing::debug;

use crate::validate::Columnar;

/// An edit applied identically to every column of a response.
pub trait ColumnOp {
    /// Applies the edit to one column.
    fn apply<T>(&self, column: &mut Vec<T>);
}

/// Removes the row at an index.
#[derive(Debug, Clone, Copy)]
struct RemoveAt(usize);

impl ColumnOp for RemoveAt {
    fn apply<T>(&self, column: &mut Vec<T>) {
        if self.0 < column.len() {
            column.remove(self.0);
        }
    }
}

/// Keeps rows after an index.
#[derive(Debug, Clone, Copy)]
struct KeepAfter(usize);

impl ColumnOp for KeepAfter {
    fn apply<T>(&self, column: &mut Vec<T>) {
        let end = (self.0 + 1).min(column.len());
        column.drain(..end);
    }
}

/// Keeps rows before an index.
#[derive(Debug, Clone, Copy)]
struct KeepBefore(usize);

impl ColumnOp for KeepBefore {
    fn apply<T>(&self, column: &mut Vec<T>) {
        column.truncate(self.0);
    }
}

/// Removes rows in place, keeping every present column the same length.
pub trait Prune: Columnar {
    /// Applies `op` to every present column, optional ones included.
    fn for_each_column<O: ColumnOp>(&mut self, op: &O);

    /// Removes the rows at `indices`, highest index first.
    ///
    /// Duplicate indices are removed once. Nothing is removed if any index is
    /// out of range or if every row would go.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::IndexOutOfRange`] for the largest offending index,
    /// or [`TacoraError::PruneEmptiesResponse`] if `indices` covers every row.
    fn prune_indices(&mut self, indices: &[usize]) -> Result<()> {
        let len = self.len();
        let mut descending = indices.to_vec();
        descending.sort_unstable_by(|a, b| b.cmp(a));
        descending.dedup();
        if let Some(&index) = descending.first().filter(|&&index| index >= len) {
            return Err(TacoraError::IndexOutOfRange { index, len });
        }
        if len > 0 && descending.len() == len {
            return Err(TacoraError::PruneEmptiesResponse { len });
        }
        for index in descending {
            self.for_each_column(&RemoveAt(index));
        }
        Ok(())
    }

    /// Keeps only the rows after `index`.
    ///
    /// The last row is never dropped: for `index == len - 1` the response is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::IndexOutOfRange`] if `index` is not a row.
    fn prune_before_index(&mut self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(TacoraError::IndexOutOfRange { index, len });
        }
        if index + 1 < len {
            self.for_each_column(&KeepAfter(index));
        }
        Ok(())
    }

    /// Keeps only the rows before `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::IndexOutOfRange`] if `index` is not a row, or
    /// [`TacoraError::PruneEmptiesResponse`] for `index == 0`.
    fn prune_after_index(&mut self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(TacoraError::IndexOutOfRange { index, len });
        }
        if index == 0 {
            return Err(TacoraError::PruneEmptiesResponse { len });
        }
        self.for_each_column(&KeepBefore(index));
        Ok(())
    }

    /// Removes every row whose timestamp lies outside `range`, returning how
    /// many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::PruneEmptiesResponse`], and removes nothing, if
    /// no row lies inside `range`.
    fn prune_outside_date_range(&mut self, range: &DateRange) -> Result<usize> {
        let Some((_, times)) = self.time_column() else {
            return Ok(0);
        };
        let (inside, outside) = range.split_timestamps(times);
        debug!(
            %range,
            inside = inside.len(),
            outside = outside.len(),
            "pruning outside date range"
        );
        if inside.is_empty() && !outside.is_empty() {
            return Err(TacoraError::PruneEmptiesResponse { len: outside.len() });
        }

        let mut removed = 0;
        for timestamp in outside {
            while let Some(index) = self
                .time_column()
                .and_then(|(_, times)| times.iter().position(|&t| t == timestamp))
            {
                self.for_each_column(&RemoveAt(index));
                removed += 1;
            }
        }
        Ok(removed)
    }
}
