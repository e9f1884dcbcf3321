//! Stock candles.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{Candle, Result, SchemaVersion, TacoraError};

use crate::combine::Combine;
use crate::decode::Decoder;
use crate::ohlc::OhlcColumns;
use crate::prune::{ColumnOp, Prune};
use crate::response::{Rejected, Response, check_status, write_text};
use crate::unpack::Unpack;
use crate::validate::{CANDLE_CHECKS, Check, Columnar, run_check, run_checks};

/// Optional columns of a stock candle response.
///
/// The variant is the schema version: `Basic` is version 1, `Extended` is
/// version 2. Both extended columns travel together.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CandleExtras {
    /// No VWAP or trade count columns.
    #[default]
    Basic,
    /// VWAP (`vwap`) and trade count (`n`) columns.
    Extended {
        /// Volume-weighted average prices.
        vwap: Vec<f64>,
        /// Trade counts.
        trades: Vec<i64>,
    },
}

/// Columnar stock candles with volume and optional VWAP/trade counts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "StockCandlesWire")]
pub struct StockCandlesResponse {
    /// Time and price columns.
    pub ohlc: OhlcColumns,
    /// Traded volume (`v`).
    pub volume: Vec<i64>,
    /// Version-dependent columns.
    pub extras: CandleExtras,
}

/// Stock candles as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockCandlesWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
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
    /// Volume-weighted average prices.
    pub vwap: Option<Vec<f64>>,
    /// Trade counts (`n`).
    #[serde(rename = "n")]
    pub trades: Option<Vec<i64>>,
}

impl StockCandlesResponse {
    /// Creates a version 1 response.
    #[must_use]
    pub const fn new(ohlc: OhlcColumns, volume: Vec<i64>) -> Self {
        Self {
            ohlc,
            volume,
            extras: CandleExtras::Basic,
        }
    }

    /// Adds the version 2 columns.
    #[must_use]
    pub fn with_extras(mut self, vwap: Vec<f64>, trades: Vec<i64>) -> Self {
        self.extras = CandleExtras::Extended { vwap, trades };
        self
    }
}

impl Columnar for StockCandlesResponse {
    const CHECKS: &'static [Check] = CANDLE_CHECKS;

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = self.ohlc.lengths().to_vec();
        lengths.push(("v", self.volume.len()));
        if let CandleExtras::Extended { vwap, trades } = &self.extras {
            lengths.push(("vwap", vwap.len()));
            lengths.push(("n", trades.len()));
        }
        lengths
    }

    fn time_column(&self) -> Option<(&'static str, &[i64])> {
        Some(("t", &self.ohlc.time))
    }

    fn version(&self) -> Result<SchemaVersion> {
        match &self.extras {
            CandleExtras::Basic => Ok(SchemaVersion::V1),
            CandleExtras::Extended { vwap, trades } if !vwap.is_empty() && !trades.is_empty() => {
                Ok(SchemaVersion::V2)
            }
            CandleExtras::Extended { .. } => Err(TacoraError::UnresolvableVersion(
                "vwap and n are present but empty".to_string(),
            )),
        }
    }
}

impl Response for StockCandlesResponse {
    type Wire = StockCandlesWire;

    const FAMILY: &'static str = "stock candles";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        if wire.vwap.is_some() != wire.trades.is_some() {
            let error = TacoraError::UnresolvableVersion(
                "vwap and n must be sent together".to_string(),
            );
            return Err(Rejected::new(error, wire));
        }

        let StockCandlesWire {
            time,
            open,
            high,
            low,
            close,
            volume,
            vwap,
            trades,
            ..
        } = wire;
        let extras = match (vwap, trades) {
            (Some(vwap), Some(trades)) => CandleExtras::Extended { vwap, trades },
            _ => CandleExtras::Basic,
        };
        Ok(Self {
            ohlc: OhlcColumns::new(time, open, high, low, close),
            volume,
            extras,
        })
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<StockCandlesWire> for StockCandlesResponse {
    type Error = TacoraError;

    fn try_from(wire: StockCandlesWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for StockCandlesResponse {
    type Record = Candle;

    fn unpack(&self) -> Result<Vec<Candle>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len())
            .map(|i| {
                let candle = self.ohlc.candle_at(i)?.with_volume(self.volume[i]);
                Ok(match &self.extras {
                    CandleExtras::Basic => candle,
                    CandleExtras::Extended { vwap, trades } => candle.with_extras(vwap[i], trades[i]),
                })
            })
            .collect()
    }
}

impl Prune for StockCandlesResponse {
    fn for_each_column<O: ColumnOp>(&mut self, op: &O) {
        self.ohlc.for_each_column(op);
        op.apply(&mut self.volume);
        if let CandleExtras::Extended { vwap, trades } = &mut self.extras {
            op.apply(vwap);
            op.apply(trades);
        }
    }
}

impl Combine for StockCandlesResponse {
    fn append(&mut self, other: Self) {
        self.ohlc.append(other.ohlc);
        self.volume.extend(other.volume);
        if let (
            CandleExtras::Extended { vwap, trades },
            CandleExtras::Extended {
                vwap: more_vwap,
                trades: more_trades,
            },
        ) = (&mut self.extras, other.extras)
        {
            vwap.extend(more_vwap);
            trades.extend(more_trades);
        }
    }
}

impl Serialize for StockCandlesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        self.ohlc.serialize_entries(&mut map)?;
        map.serialize_entry("v", &self.volume)?;
        if let CandleExtras::Extended { vwap, trades } = &self.extras {
            map.serialize_entry("vwap", vwap)?;
            map.serialize_entry("n", trades)?;
        }
        map.end()
    }
}

impl fmt::Display for StockCandlesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}
