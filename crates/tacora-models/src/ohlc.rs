//! Time and price columns shared by the candle families.

use serde::Deserialize;
use serde::ser::SerializeMap;
use tacora_types::{Candle, Result, utc_from_seconds};

use crate::prune::ColumnOp;
use crate::response::check_status;

/// Parallel `t`, `o`, `h`, `l`, `c` columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcColumns {
    /// Bar open times in epoch seconds (`t`).
    pub time: Vec<i64>,
    /// Opening prices (`o`).
    pub open: Vec<f64>,
    /// Highest prices (`h`).
    pub high: Vec<f64>,
    /// Lowest prices (`l`).
    pub low: Vec<f64>,
    /// Closing prices (`c`).
    pub close: Vec<f64>,
}

impl OhlcColumns {
    /// Creates the columns from their values.
    #[must_use]
    pub const fn new(
        time: Vec<i64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if there are no timestamps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub(crate) fn lengths(&self) -> [(&'static str, usize); 5] {
        [
            ("t", self.time.len()),
            ("o", self.open.len()),
            ("h", self.high.len()),
            ("l", self.low.len()),
            ("c", self.close.len()),
        ]
    }

    pub(crate) fn for_each_column<O: ColumnOp>(&mut self, op: &O) {
        op.apply(&mut self.time);
        op.apply(&mut self.open);
        op.apply(&mut self.high);
        op.apply(&mut self.low);
        op.apply(&mut self.close);
    }

    pub(crate) fn append(&mut self, other: Self) {
        self.time.extend(other.time);
        self.open.extend(other.open);
        self.high.extend(other.high);
        self.low.extend(other.low);
        self.close.extend(other.close);
    }

    pub(crate) fn serialize_entries<M: SerializeMap>(
        &self,
        map: &mut M,
    ) -> std::result::Result<(), M::Error> {
        map.serialize_entry("t", &self.time)?;
        map.serialize_entry("o", &self.open)?;
        map.serialize_entry("h", &self.high)?;
        map.serialize_entry("l", &self.low)?;
        map.serialize_entry("c", &self.close)
    }

    /// Builds the price part of the candle at `index`; callers check lengths
    /// first.
    pub(crate) fn candle_at(&self, index: usize) -> Result<Candle> {
        Ok(Candle::new(
            utc_from_seconds(self.time[index])?,
            self.open[index],
            self.high[index],
            self.low[index],
            self.close[index],
        ))
    }
}

/// Price-only candles as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OhlcWire {
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
}

impl OhlcWire {
    pub(crate) fn status(&self) -> Result<()> {
        check_status(self.status.as_deref(), self.errmsg.as_deref())
    }

    pub(crate) fn into_columns(self) -> OhlcColumns {
        OhlcColumns::new(self.time, self.open, self.high, self.low, self.close)
    }
}
