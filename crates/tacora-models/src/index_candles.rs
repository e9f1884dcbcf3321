//! Index candles.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{Candle, Result, TacoraError};

use crate::combine::Combine;
use crate::decode::Decoder;
use crate::ohlc::{OhlcColumns, OhlcWire};
use crate::prune::{ColumnOp, Prune};
use crate::response::{Rejected, Response, write_text};
use crate::unpack::Unpack;
use crate::validate::{Check, Columnar, run_check, run_checks};

/// Columnar index candles. Indices are not traded, so there is no volume.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "OhlcWire")]
pub struct IndexCandlesResponse {
    /// Time and price columns.
    pub ohlc: OhlcColumns,
}

impl IndexCandlesResponse {
    /// Wraps price columns.
    #[must_use]
    pub const fn new(ohlc: OhlcColumns) -> Self {
        Self { ohlc }
    }
}

impl Columnar for IndexCandlesResponse {
    const CHECKS: &'static [Check] = &[Check::Ascending, Check::EqualLength, Check::NonEmpty];

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        self.ohlc.lengths().to_vec()
    }

    fn time_column(&self) -> Option<(&'static str, &[i64])> {
        Some(("t", &self.ohlc.time))
    }
}

impl Response for IndexCandlesResponse {
    type Wire = OhlcWire;

    const FAMILY: &'static str = "index candles";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        match wire.status() {
            Ok(()) => Ok(Self::new(wire.into_columns())),
            Err(error) => Err(Rejected::new(error, wire)),
        }
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<OhlcWire> for IndexCandlesResponse {
    type Error = TacoraError;

    fn try_from(wire: OhlcWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for IndexCandlesResponse {
    type Record = Candle;

    fn unpack(&self) -> Result<Vec<Candle>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len()).map(|i| self.ohlc.candle_at(i)).collect()
    }
}

impl Prune for IndexCandlesResponse {
    fn for_each_column<O: ColumnOp>(&mut self, op: &O) {
        self.ohlc.for_each_column(op);
    }
}

impl Combine for IndexCandlesResponse {
    fn append(&mut self, other: Self) {
        self.ohlc.append(other.ohlc);
    }
}

impl Serialize for IndexCandlesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        self.ohlc.serialize_entries(&mut map)?;
        map.end()
    }
}

impl fmt::Display for IndexCandlesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::from_json;

    const VIX: &str = r#"{"s":"ok","t":[1704171600,1704258000,1704344400],"o":[13.21,14.2,14.37],"h":[14.23,14.82,14.39],"l":[13.1,14.09,13.37],"c":[13.2,14.04,14.13]}"#;

    #[test]
    fn test_decode_and_unpack() {
        let response: IndexCandlesResponse = from_json(VIX).unwrap();
        let candles = response.unpack().unwrap();

        assert_eq!(candles.len(), 3);
        assert!((candles[2].close - 14.13).abs() < 1e-10);
        assert!(candles.iter().all(|c| c.volume.is_none()));
    }

    #[test]
    fn test_round_trip() {
        let response: IndexCandlesResponse = from_json(VIX).unwrap();
        assert_eq!(response.to_json().unwrap(), VIX);
    }

    #[test]
    fn test_no_data_status() {
        let payload = r#"{"s":"no_data","nextTime":1704171600}"#;
        assert!(matches!(
            from_json::<IndexCandlesResponse>(payload),
            Err(TacoraError::Status { ref status, .. }) if status == "no_data"
        ));
    }

    #[test]
    fn test_empty_payload_invalid() {
        assert!(matches!(
            from_json::<IndexCandlesResponse>(r#"{"s":"ok"}"#),
            Err(TacoraError::EmptyColumn("t"))
        ));
    }

    #[test]
    fn test_prune_before_index() {
        let mut response: IndexCandlesResponse = from_json(VIX).unwrap();
        response.prune_before_index(0).unwrap();
        assert_eq!(response.ohlc.time, vec![1704258000, 1704344400]);
        assert_eq!(response.ohlc.low, vec![14.09, 13.37]);
    }
}
