//! Error types for tacora.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{DateRange, SchemaVersion};

/// Result type alias for tacora operations.
pub type Result<T> = std::result::Result<T, TacoraError>;

/// Errors raised while decoding, validating, reshaping or merging responses.
#[derive(Error, Debug)]
pub enum TacoraError {
    /// A column does not have the length of the reference column.
    #[error("Column length mismatch: {column} has {found} rows, expected {expected}")]
    LengthMismatch {
        /// The offending column's wire key.
        column: &'static str,
        /// Length of the reference column.
        expected: usize,
        /// Length actually found.
        found: usize,
    },

    /// The set of optional columns matches no known schema version.
    #[error("Unresolvable schema version: {0}")]
    UnresolvableVersion(String),

    /// The time column decreases at the given row.
    #[error("Column {column} is not ascending at index {index}")]
    NotAscending {
        /// The time column's wire key.
        column: &'static str,
        /// First row whose timestamp is lower than its predecessor.
        index: usize,
    },

    /// A required (or present optional) column has no rows.
    #[error("Column {0} is empty")]
    EmptyColumn(&'static str),

    /// A column needed by the operation was not sent.
    #[error("Column {0} is missing")]
    MissingColumn(&'static str),

    /// The family is keyed by symbol and has no time column.
    #[error("Response has no time column")]
    NoTimeColumn,

    /// A prune would remove every row.
    #[error("Pruning would remove all {len} rows")]
    PruneEmptiesResponse {
        /// Number of rows in the response.
        len: usize,
    },

    /// A row index lies outside `[0, len)`.
    #[error("Index {index} out of range for {len} rows")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of rows in the response.
        len: usize,
    },

    /// Two responses with different schema versions cannot be merged.
    #[error("Schema version mismatch: {left} vs {right}")]
    VersionMismatch {
        /// Version of the first argument.
        left: SchemaVersion,
        /// Version of the second argument.
        right: SchemaVersion,
    },

    /// Two responses cover intersecting date ranges.
    #[error("Date ranges overlap: {left} and {right}")]
    Overlap {
        /// Range of the first argument.
        left: DateRange,
        /// Range of the second argument.
        right: DateRange,
    },

    /// The merged response failed validation.
    #[error("Combined response is invalid: {0}")]
    CombineInvalid(#[source] Box<TacoraError>),

    /// Epoch seconds outside the representable range.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// An option expiration that is not a `YYYY-MM-DD` date.
    #[error("Invalid option expiration: {0}")]
    InvalidExpiration(String),

    /// A strikes key that is not a `YYYY-MM-DD` date.
    #[error("Invalid strike key: {0}")]
    InvalidStrikeKey(String),

    /// A strikes value that is not a list of numbers.
    #[error("Invalid strikes for {0}: expected an array of numbers")]
    InvalidStrikeValue(String),

    /// An option symbol that is not in OCC format.
    #[error("Invalid option symbol: {0}")]
    InvalidOptionSymbol(String),

    /// An option lookup came back without a symbol.
    #[error("Option lookup returned an empty symbol")]
    EmptyLookup,

    /// The service answered with a status other than `ok`.
    #[error("API returned status {status}: {message}")]
    Status {
        /// The `s` field of the payload.
        status: String,
        /// The `errmsg` field, empty if none was sent.
        message: String,
    },

    /// A time zone name not present in the tz database.
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// A local time that does not exist in the zone (DST gap).
    #[error("Local time {0} does not exist in the configured zone")]
    NonexistentLocalTime(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start is after end.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start of the range.
        start: DateTime<Utc>,
        /// The end of the range.
        end: DateTime<Utc>,
    },
}
