//! Columnar market-data responses for tacora.
//!
//! Every data family is decoded from parallel JSON columns into a typed
//! response that is validated before it is handed out:
//!
//! - [`Decoder`] - Decodes payloads and reports rejections to a [`DiagnosticSink`]
//! - [`Columnar`] and [`run_checks`] - Concurrent structural validation
//! - [`Unpack`] - Turns columns into per-row records
//! - [`Prune`] - Removes rows by index or by date range
//! - [`Combine`] - Merges two non-overlapping responses of the same family
//!
//! Candle families: [`StockCandlesResponse`], [`FundCandlesResponse`],
//! [`IndexCandlesResponse`], [`BulkCandlesResponse`]. Quote families:
//! [`StockQuotesResponse`], [`IndexQuotesResponse`]. Also
//! [`EarningsResponse`], [`MarketStatusResponse`], [`OptionQuotesResponse`] and
//! the option helpers.

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tacora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bulk_candles;
mod combine;
mod decode;
mod diagnostics;
mod earnings;
mod fund_candles;
mod index_candles;
mod index_quotes;
mod market_status;
mod ohlc;
mod option_quotes;
mod options;
mod prune;
mod response;
mod stock_candles;
mod stock_quotes;
mod unpack;
mod validate;

pub use bulk_candles::{BulkCandlesResponse, BulkCandlesWire};
pub use combine::Combine;
pub use decode::{Decoder, from_json};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, NullSink, TracingSink};
pub use earnings::{EarningsReport, EarningsResponse, EarningsWire};
pub use fund_candles::FundCandlesResponse;
pub use index_candles::IndexCandlesResponse;
pub use index_quotes::{IndexQuote, IndexQuotesResponse, IndexQuotesWire};
pub use market_status::{MarketState, MarketStatusReport, MarketStatusResponse, MarketStatusWire};
pub use ohlc::{OhlcColumns, OhlcWire};
pub use option_quotes::{OptionQuote, OptionQuotesResponse, OptionQuotesWire};
pub use options::{
    OptionLookupResponse, OptionLookupWire, OptionSide, OptionStrikes, OptionSymbol,
    OptionsExpirationsResponse, OptionsExpirationsWire, OptionsStrikesResponse,
};
pub use prune::{ColumnOp, Prune};
pub use response::{Rejected, Response};
pub use stock_candles::{CandleExtras, StockCandlesResponse, StockCandlesWire};
pub use stock_quotes::{StockQuote, StockQuotesResponse, StockQuotesWire};
pub use unpack::Unpack;
pub use validate::{CANDLE_CHECKS, Check, Columnar, KEYED_CHECKS, run_check, run_checks};
