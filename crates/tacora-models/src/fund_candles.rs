//! Mutual fund candles.

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

/// Columnar fund candles. Funds price once a day and report no volume.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "OhlcWire")]
pub struct FundCandlesResponse {
    /// Time and price columns.
    pub ohlc: OhlcColumns,
}

impl FundCandlesResponse {
    /// Wraps price columns.
    #[must_use]
    pub const fn new(ohlc: OhlcColumns) -> Self {
        Self { ohlc }
    }
}

impl Columnar for FundCandlesResponse {
    const CHECKS: &'static [Check] = &[Check::Ascending, Check::EqualLength, Check::NonEmpty];

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        self.ohlc.lengths().to_vec()
    }

    fn time_column(&self) -> Option<(&'static str, &[i64])> {
        Some(("t", &self.ohlc.time))
    }
}

impl Response for FundCandlesResponse {
    type Wire = OhlcWire;

    const FAMILY: &'static str = "fund candles";

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

impl TryFrom<OhlcWire> for FundCandlesResponse {
    type Error = TacoraError;

    fn try_from(wire: OhlcWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for FundCandlesResponse {
    type Record = Candle;

    fn unpack(&self) -> Result<Vec<Candle>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len()).map(|i| self.ohlc.candle_at(i)).collect()
    }
}

impl Prune for FundCandlesResponse {
    fn for_each_column<O: ColumnOp>(&mut self, op: &O) {
        self.ohlc.for_each_column(op);
    }
}

impl Combine for FundCandlesResponse {
    fn append(&mut self, other: Self) {
        self.ohlc.append(other.ohlc);
    }
}

impl Serialize for FundCandlesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        self.ohlc.serialize_entries(&mut map)?;
        map.end()
    }
}

impl fmt::Display for FundCandlesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::from_json;
    use tacora_types::{DateRange, SchemaVersion};

    const JAN_2023: &str = r#"{"s":"ok","t":[1672808400,1672894800],"o":[355.43,351.35],"h":[355.43,351.35],"l":[355.43,351.35],"c":[355.43,351.35]}"#;
    const JAN_2024: &str = r#"{"s":"ok","t":[1704344400,1704430800],"o":[432.65,433.44],"h":[432.65,433.44],"l":[432.65,433.44],"c":[432.65,433.44]}"#;

    #[test]
    fn test_encode_is_byte_stable() {
        let response: FundCandlesResponse = from_json(JAN_2023).unwrap();
        assert_eq!(response.to_json().unwrap(), JAN_2023);
    }

    #[test]
    fn test_key_order_independent_of_input_order() {
        let shuffled = r#"{"c":[355.43,351.35],"t":[1672808400,1672894800],"l":[355.43,351.35],"h":[355.43,351.35],"o":[355.43,351.35],"s":"ok"}"#;
        let response: FundCandlesResponse = from_json(shuffled).unwrap();
        assert_eq!(response.to_json().unwrap(), JAN_2023);
    }

    #[test]
    fn test_missing_column_is_empty() {
        let payload = r#"{"s":"ok","t":[1672808400],"o":[1.0],"h":[1.0],"l":[1.0]}"#;
        assert!(matches!(
            from_json::<FundCandlesResponse>(payload),
            Err(TacoraError::LengthMismatch { column: "c", .. })
        ));
    }

    #[test]
    fn test_version_is_always_v1() {
        let response: FundCandlesResponse = from_json(JAN_2023).unwrap();
        assert_eq!(response.version().unwrap(), SchemaVersion::V1);
    }

    #[test]
    fn test_unpack() {
        let response: FundCandlesResponse = from_json(JAN_2023).unwrap();
        let candles = response.unpack().unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].timestamp.timestamp(), 1672894800);
        assert!((candles[1].open - 351.35).abs() < 1e-10);
        assert_eq!(candles[1].volume, None);
    }

    #[test]
    fn test_combine() {
        let first: FundCandlesResponse = from_json(JAN_2023).unwrap();
        let second: FundCandlesResponse = from_json(JAN_2024).unwrap();
        let merged = first.combine(second).unwrap();

        assert_eq!(
            merged.ohlc.time,
            vec![1672808400, 1672894800, 1704344400, 1704430800]
        );
        assert_eq!(merged.ohlc.close[2], 432.65);
        assert_eq!(
            merged.date_range().unwrap(),
            DateRange::from_timestamps(1672808400, 1704430800).unwrap()
        );
    }

    #[test]
    fn test_combine_overlap() {
        let first: FundCandlesResponse = from_json(JAN_2023).unwrap();
        let second: FundCandlesResponse = from_json(JAN_2023).unwrap();
        assert!(matches!(
            first.combine(second),
            Err(TacoraError::Overlap { .. })
        ));
    }

    #[test]
    fn test_prune_outside_date_range() {
        let mut response: FundCandlesResponse = from_json(JAN_2024).unwrap();
        let range = DateRange::from_timestamps(1704400000, 1704500000).unwrap();

        assert_eq!(response.prune_outside_date_range(&range).unwrap(), 1);
        assert_eq!(response.ohlc.time, vec![1704430800]);
        assert!(response.is_valid());
    }
}
