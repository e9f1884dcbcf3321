//! Output formatters for tacora.
//!
//! This crate writes unpacked records and whole columnar payloads:
//!
//! - [`JsonFormatter`] - JSON array or NDJSON records, compact or pretty payloads
//! - [`TextFormatter`] - One human-readable line per record in a display zone

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tacora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod formatter;

#[cfg(feature = "json")]
mod json;

#[cfg(feature = "text")]
mod text;

pub use formatter::{FormatError, Formatter, OutputFormat};

#[cfg(feature = "json")]
pub use json::{JsonFormatter, JsonStyle};

#[cfg(feature = "text")]
pub use text::TextFormatter;
