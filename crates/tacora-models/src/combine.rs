//! Merging two responses of the same family.

use tacora_types::{Result, TacoraError};
use tracing::debug;

use crate::response::Response;
use crate::validate::Columnar;

/// Concatenates two responses covering disjoint date ranges.
pub trait Combine: Response + Columnar {
    /// Appends every column of `other` to the matching column of `self`.
    fn append(&mut self, other: Self);

    /// Merges `self` followed by `other`.
    ///
    /// Rows are concatenated in argument order without re-sorting, so the
    /// earlier range must be passed first for the result to validate.
    ///
    /// # Errors
    ///
    /// Returns an error if either input is invalid, the schema versions
    /// differ, the date ranges overlap (touching endpoints included), or the
    /// merged response fails validation.
    fn combine(self, other: Self) -> Result<Self> {
        self.validate()?;
        other.validate()?;

        let left = self.version()?;
        let right = other.version()?;
        if left != right {
            return Err(TacoraError::VersionMismatch { left, right });
        }

        let left = self.date_range()?;
        let right = other.date_range()?;
        if left.overlaps(&right) {
            return Err(TacoraError::Overlap { left, right });
        }

        debug!(%left, %right, "combining responses");
        let mut merged = self;
        merged.append(other);
        merged
            .validate()
            .map_err(|err| TacoraError::CombineInvalid(Box::new(err)))?;
        Ok(merged)
    }
}
