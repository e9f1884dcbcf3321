//! Bulk stock candles: one bar per symbol for a single session.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{Candle, Result, TacoraError};

use crate::decode::Decoder;
use crate::ohlc::OhlcColumns;
use crate::response::{Rejected, Response, check_status, write_text};
use crate::unpack::Unpack;
use crate::validate::{Check, Columnar, KEYED_CHECKS, run_check, run_checks};

/// Columnar bulk candles. Rows are keyed by symbol, so timestamps may repeat
/// and are not required to ascend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BulkCandlesWire")]
pub struct BulkCandlesResponse {
    /// Ticker symbols (`symbol`).
    pub symbol: Vec<String>,
    /// Time and price columns.
    pub ohlc: OhlcColumns,
    /// Traded volume (`v`).
    pub volume: Vec<i64>,
}

/// Bulk candles as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkCandlesWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// Ticker symbols.
    #[serde(default)]
    pub symbol: Vec<String>,
    /// Bar open times (`t`).
    #[serde(rename = "t", default)]
    pub time: Vec<i64>,
    /// Opening prices (`o`).
    #[serde(rename = "o", default)]
    pub open: Vec<f64>,
    /// Highest prices (`h`).
    #[serde(rename = "h", default)]
    pub high: Vec<f64>,
    /// Lowest prices (`l`).
    #[serde(rename = "l", default)]
    pub low: Vec<f64>,
    /// Closing prices (`c`).
    #[serde(rename = "c", default)]
    pub close: Vec<f64>,
    /// Traded volume (`v`).
    #[serde(rename = "v", default)]
    pub volume: Vec<i64>,
}

impl Columnar for BulkCandlesResponse {
    const CHECKS: &'static [Check] = KEYED_CHECKS;

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = vec![("symbol", self.symbol.len())];
        lengths.extend(self.ohlc.lengths());
        lengths.push(("v", self.volume.len()));
        lengths
    }
}

impl Response for BulkCandlesResponse {
    type Wire = BulkCandlesWire;

    const FAMILY: &'static str = "bulk stock candles";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            symbol: wire.symbol,
            ohlc: OhlcColumns::new(wire.time, wire.open, wire.high, wire.low, wire.close),
            volume: wire.volume,
        })
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<BulkCandlesWire> for BulkCandlesResponse {
    type Error = TacoraError;

    fn try_from(wire: BulkCandlesWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for BulkCandlesResponse {
    type Record = Candle;

    fn unpack(&self) -> Result<Vec<Candle>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len())
            .map(|i| {
                Ok(self
                    .ohlc
                    .candle_at(i)?
                    .with_symbol(self.symbol[i].as_str())
                    .with_volume(self.volume[i]))
            })
            .collect()
    }
}

impl Serialize for BulkCandlesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("symbol", &self.symbol)?;
        self.ohlc.serialize_entries(&mut map)?;
        map.serialize_entry("v", &self.volume)?;
        map.end()
    }
}

impl fmt::Display for BulkCandlesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}
