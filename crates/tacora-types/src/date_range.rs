//! Inclusive UTC date ranges.

use chrono::{DateTime, Utc};

use crate::{DateRangeError, Result, TacoraError};

/// Converts epoch seconds to a UTC timestamp.
///
/// # Errors
///
/// Returns [`TacoraError::InvalidTimestamp`] if the value is out of range.
pub fn utc_from_seconds(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or(TacoraError::InvalidTimestamp(seconds))
}

/// An inclusive range of UTC timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// Start of the range (inclusive).
    pub start: DateTime<Utc>,
    /// End of the range (inclusive).
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> std::result::Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering a single instant.
    #[must_use]
    pub const fn single_point(at: DateTime<Utc>) -> Self {
        Self { start: at, end: at }
    }

    /// Creates a range from epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not a valid timestamp or start > end.
    pub fn from_timestamps(start: i64, end: i64) -> Result<Self> {
        Ok(Self::new(utc_from_seconds(start)?, utc_from_seconds(end)?)?)
    }

    /// Returns the smallest range containing every timestamp, or `None` for an
    /// empty slice.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is not a valid timestamp.
    pub fn spanning(timestamps: &[i64]) -> Result<Option<Self>> {
        let (Some(&start), Some(&end)) = (timestamps.iter().min(), timestamps.iter().max()) else {
            return Ok(None);
        };
        Self::from_timestamps(start, end).map(Some)
    }

    /// Returns true if the range contains the given instant.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Returns true if the range contains the given epoch seconds.
    #[must_use]
    pub fn contains_timestamp(&self, seconds: i64) -> bool {
        DateTime::from_timestamp(seconds, 0).is_some_and(|at| self.contains(at))
    }

    /// Returns true if `other` lies entirely before or after this range.
    #[must_use]
    pub fn does_not_contain(&self, other: &Self) -> bool {
        self.start > other.end || self.end < other.start
    }

    /// Returns true if the ranges share at least one instant.
    ///
    /// Touching endpoints count as overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.does_not_contain(other) && !other.does_not_contain(self)
    }

    /// Splits timestamps into those inside and those outside the range,
    /// preserving order.
    #[must_use]
    pub fn split_timestamps(&self, timestamps: &[i64]) -> (Vec<i64>, Vec<i64>) {
        timestamps
            .iter()
            .partition(|&&seconds| self.contains_timestamp(seconds))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
