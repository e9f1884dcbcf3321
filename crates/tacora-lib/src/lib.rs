//! Client-side data model for a columnar market-data HTTP API.
//!
//! This is a facade crate that re-exports functionality from the tacora
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use tacora_lib::prelude::*;
//!
//! let payload = r#"{"s":"ok","t":[1672808400],"o":[355.43],"h":[356.0],"l":[350.1],"c":[351.35]}"#;
//! let candles: FundCandlesResponse = from_json(payload)?;
//!
//! let records = candles.unpack()?;
//! assert_eq!(records.len(), 1);
//! assert_eq!(candles.to_json()?, payload);
//! # Ok::<(), TacoraError>(())
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tacora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tacora_types::*;

// Re-export responses and the operations on them
pub use tacora_models::*;

// Re-export formatters
#[cfg(feature = "format")]
pub use tacora_format::{
    FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, TextFormatter,
};

/// Prelude module for convenient imports.
///
/// ```
/// use tacora_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tacora_types::{
        Candle, DateRange, DateRangeError, DisplayZone, Record, Result, SchemaVersion,
        TacoraError,
    };

    pub use tacora_models::{
        BulkCandlesResponse, Columnar, Combine, Decoder, DiagnosticSink, EarningsResponse,
        FundCandlesResponse, IndexCandlesResponse, IndexQuotesResponse, MarketStatusResponse,
        OptionLookupResponse, OptionQuotesResponse, OptionsExpirationsResponse,
        OptionsStrikesResponse, Prune, Response, StockCandlesResponse, StockQuotesResponse,
        Unpack, from_json,
    };

    #[cfg(feature = "format")]
    pub use tacora_format::{Formatter, JsonFormatter, OutputFormat, TextFormatter};
}
