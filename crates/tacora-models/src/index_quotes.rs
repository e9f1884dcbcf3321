//! Real-time index quotes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{DisplayZone, Record, Result, TacoraError, utc_from_seconds};

use crate::decode::Decoder;
use crate::response::{Rejected, Response, check_status, write_text};
use crate::unpack::Unpack;
use crate::validate::{Check, Columnar, KEYED_CHECKS, push_present, run_check, run_checks};

/// One index quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    /// Index symbol.
    pub symbol: String,
    /// Last value.
    pub last: f64,
    /// Change since the previous close.
    pub change: Option<f64>,
    /// Percentage change since the previous close.
    pub change_pct: Option<f64>,
    /// 52-week high.
    pub high_52_week: Option<f64>,
    /// 52-week low.
    pub low_52_week: Option<f64>,
    /// When the quote was last updated.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
}

impl Record for IndexQuote {
    fn describe(&self, zone: &DisplayZone) -> String {
        let mut line = format!(
            "{} {} Last: {}",
            self.symbol,
            zone.format(self.updated),
            self.last
        );
        if let Some(change) = self.change {
            line.push_str(&format!(" Change: {change}"));
        }
        if let Some(change_pct) = self.change_pct {
            line.push_str(&format!(" ({change_pct}%)"));
        }
        if let (Some(high), Some(low)) = (self.high_52_week, self.low_52_week) {
            line.push_str(&format!(" 52w: {low}-{high}"));
        }
        line
    }
}

/// Columnar index quotes, one row per symbol.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "IndexQuotesWire")]
pub struct IndexQuotesResponse {
    /// Index symbols (`symbol`).
    pub symbol: Vec<String>,
    /// Last values (`last`).
    pub last: Vec<f64>,
    /// Changes (`change`), with gaps where not applicable.
    pub change: Option<Vec<Option<f64>>>,
    /// Percentage changes (`changepct`), with gaps where not applicable.
    pub change_pct: Option<Vec<Option<f64>>>,
    /// 52-week highs (`52weekHigh`).
    pub high_52_week: Option<Vec<f64>>,
    /// 52-week lows (`52weekLow`).
    pub low_52_week: Option<Vec<f64>>,
    /// Update times in epoch seconds (`updated`).
    pub updated: Vec<i64>,
}

/// Index quotes as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexQuotesWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// Index symbols.
    #[serde(default)]
    pub symbol: Vec<String>,
    /// Last values.
    #[serde(default)]
    pub last: Vec<f64>,
    /// Changes.
    pub change: Option<Vec<Option<f64>>>,
    /// Percentage changes.
    #[serde(rename = "changepct")]
    pub change_pct: Option<Vec<Option<f64>>>,
    /// 52-week highs.
    #[serde(rename = "52weekHigh")]
    pub high_52_week: Option<Vec<f64>>,
    /// 52-week lows.
    #[serde(rename = "52weekLow")]
    pub low_52_week: Option<Vec<f64>>,
    /// Update times.
    #[serde(default)]
    pub updated: Vec<i64>,
}

impl Columnar for IndexQuotesResponse {
    const CHECKS: &'static [Check] = KEYED_CHECKS;

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = vec![
            ("symbol", self.symbol.len()),
            ("last", self.last.len()),
            ("updated", self.updated.len()),
        ];
        push_present(&mut lengths, "change", self.change.as_deref());
        push_present(&mut lengths, "changepct", self.change_pct.as_deref());
        push_present(&mut lengths, "52weekHigh", self.high_52_week.as_deref());
        push_present(&mut lengths, "52weekLow", self.low_52_week.as_deref());
        lengths
    }
}

impl Response for IndexQuotesResponse {
    type Wire = IndexQuotesWire;

    const FAMILY: &'static str = "index quotes";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            symbol: wire.symbol,
            last: wire.last,
            change: wire.change,
            change_pct: wire.change_pct,
            high_52_week: wire.high_52_week,
            low_52_week: wire.low_52_week,
            updated: wire.updated,
        })
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<IndexQuotesWire> for IndexQuotesResponse {
    type Error = TacoraError;

    fn try_from(wire: IndexQuotesWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for IndexQuotesResponse {
    type Record = IndexQuote;

    fn unpack(&self) -> Result<Vec<IndexQuote>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len())
            .map(|i| {
                Ok(IndexQuote {
                    symbol: self.symbol[i].clone(),
                    last: self.last[i],
                    change: self.change.as_ref().and_then(|c| c[i]),
                    change_pct: self.change_pct.as_ref().and_then(|c| c[i]),
                    high_52_week: self.high_52_week.as_ref().map(|c| c[i]),
                    low_52_week: self.low_52_week.as_ref().map(|c| c[i]),
                    updated: utc_from_seconds(self.updated[i])?,
                })
            })
            .collect()
    }
}

impl Serialize for IndexQuotesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("symbol", &self.symbol)?;
        map.serialize_entry("last", &self.last)?;
        if let Some(change) = &self.change {
            map.serialize_entry("change", change)?;
        }
        if let Some(change_pct) = &self.change_pct {
            map.serialize_entry("changepct", change_pct)?;
        }
        if let Some(high) = &self.high_52_week {
            map.serialize_entry("52weekHigh", high)?;
        }
        if let Some(low) = &self.low_52_week {
            map.serialize_entry("52weekLow", low)?;
        }
        map.serialize_entry("updated", &self.updated)?;
        map.end()
    }
}

impl fmt::Display for IndexQuotesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::from_json;

    const VIX: &str = r#"{"s":"ok","symbol":["VIX"],"last":[13.33],"change":[-0.21],"changepct":[-0.0155],"52weekHigh":[30.81],"52weekLow":[12.07],"updated":[1705344896]}"#;

    #[test]
    fn test_unpack() {
        let response: IndexQuotesResponse = from_json(VIX).unwrap();
        let quotes = response.unpack().unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "VIX");
        assert_eq!(quotes[0].change, Some(-0.21));
        assert_eq!(quotes[0].high_52_week, Some(30.81));
    }

    #[test]
    fn test_without_optional_columns() {
        let payload = r#"{"s":"ok","symbol":["SPX"],"last":[4783.83],"updated":[1705344896]}"#;
        let response: IndexQuotesResponse = from_json(payload).unwrap();
        let quote = &response.unpack().unwrap()[0];

        assert_eq!(quote.change, None);
        assert_eq!(quote.low_52_week, None);
        assert_eq!(response.to_json().unwrap(), payload);
    }

    #[test]
    fn test_round_trip() {
        let response: IndexQuotesResponse = from_json(VIX).unwrap();
        assert_eq!(response.to_json().unwrap(), VIX);
    }

    #[test]
    fn test_error_status() {
        let payload = r#"{"s":"error","errmsg":"Invalid symbol: XYZ"}"#;
        let err = from_json::<IndexQuotesResponse>(payload).unwrap_err();
        assert_eq!(err.to_string(), "API returned status error: Invalid symbol: XYZ");
    }
}
