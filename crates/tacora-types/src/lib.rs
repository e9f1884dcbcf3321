//! Core types for the tacora market-data model.
//!
//! This crate provides the leaf types shared by every tacora crate:
//!
//! - [`Candle`] - A single OHLC bar with optional volume, VWAP and trade count
//! - [`Record`] - One row produced by unpacking a columnar response
//! - [`DateRange`] - Inclusive UTC range used for pruning and overlap tests
//! - [`DisplayZone`] - Time zone used for rendering and local market dates
//! - [`SchemaVersion`] - Which optional column set a response carries
//! - [`TacoraError`] - The error taxonomy shared by all operations

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tacora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod date_range;
mod error;
mod record;
mod version;
mod zone;

pub use candle::Candle;
pub use date_range::{DateRange, utc_from_seconds};
pub use error::{DateRangeError, Result, TacoraError};
pub use record::Record;
pub use version::SchemaVersion;
pub use zone::{DEFAULT_ZONE, DisplayZone, MARKET_CLOSE_HOUR};
