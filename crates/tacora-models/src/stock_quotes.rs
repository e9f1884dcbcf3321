//! Real-time stock quotes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{DisplayZone, Record, Result, TacoraError, utc_from_seconds};

use crate::decode::Decoder;
use crate::response::{Rejected, Response, check_status, write_text};
use crate::unpack::Unpack;
use crate::validate::{Check, Columnar, KEYED_CHECKS, push_present, run_check, run_checks};

/// One stock quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    /// Ticker symbol.
    pub symbol: String,
    /// Best ask price.
    pub ask: f64,
    /// Shares offered at the ask.
    pub ask_size: i64,
    /// Best bid price.
    pub bid: f64,
    /// Shares bid at the bid.
    pub bid_size: i64,
    /// Midpoint of bid and ask.
    pub mid: f64,
    /// Last traded price.
    pub last: f64,
    /// Change since the previous close.
    pub change: Option<f64>,
    /// Percentage change since the previous close.
    pub change_pct: Option<f64>,
    /// 52-week high.
    pub high_52_week: Option<f64>,
    /// 52-week low.
    pub low_52_week: Option<f64>,
    /// Session volume.
    pub volume: i64,
    /// When the quote was last updated.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
}

impl Record for StockQuote {
    fn describe(&self, zone: &DisplayZone) -> String {
        let mut line = format!(
            "{} {} Ask: {} x {} Bid: {} x {} Mid: {} Last: {} Volume: {}",
            self.symbol,
            zone.format(self.updated),
            self.ask,
            self.ask_size,
            self.bid,
            self.bid_size,
            self.mid,
            self.last,
            self.volume
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

/// Columnar stock quotes, one row per symbol.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "StockQuotesWire")]
pub struct StockQuotesResponse {
    /// Ticker symbols (`symbol`).
    pub symbol: Vec<String>,
    /// Ask prices (`ask`).
    pub ask: Vec<f64>,
    /// Ask sizes (`askSize`).
    pub ask_size: Vec<i64>,
    /// Bid prices (`bid`).
    pub bid: Vec<f64>,
    /// Bid sizes (`bidSize`).
    pub bid_size: Vec<i64>,
    /// Mid prices (`mid`).
    pub mid: Vec<f64>,
    /// Last traded prices (`last`).
    pub last: Vec<f64>,
    /// Price changes (`change`), with gaps where not applicable.
    pub change: Option<Vec<Option<f64>>>,
    /// Percentage changes (`changepct`), with gaps where not applicable.
    pub change_pct: Option<Vec<Option<f64>>>,
    /// 52-week highs (`52weekHigh`).
    pub high_52_week: Option<Vec<f64>>,
    /// 52-week lows (`52weekLow`).
    pub low_52_week: Option<Vec<f64>>,
    /// Volumes (`volume`).
    pub volume: Vec<i64>,
    /// Update times in epoch seconds (`updated`).
    pub updated: Vec<i64>,
}

/// Stock quotes as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuotesWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// Ticker symbols.
    #[serde(default)]
    pub symbol: Vec<String>,
    /// Ask prices.
    #[serde(default)]
    pub ask: Vec<f64>,
    /// Ask sizes.
    #[serde(default)]
    pub ask_size: Vec<i64>,
    /// Bid prices.
    #[serde(default)]
    pub bid: Vec<f64>,
    /// Bid sizes.
    #[serde(default)]
    pub bid_size: Vec<i64>,
    /// Mid prices.
    #[serde(default)]
    pub mid: Vec<f64>,
    /// Last traded prices.
    #[serde(default)]
    pub last: Vec<f64>,
    /// Price changes.
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
    /// Volumes.
    #[serde(default)]
    pub volume: Vec<i64>,
    /// Update times.
    #[serde(default)]
    pub updated: Vec<i64>,
}

impl Columnar for StockQuotesResponse {
    const CHECKS: &'static [Check] = KEYED_CHECKS;

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = vec![
            ("symbol", self.symbol.len()),
            ("ask", self.ask.len()),
            ("askSize", self.ask_size.len()),
            ("bid", self.bid.len()),
            ("bidSize", self.bid_size.len()),
            ("mid", self.mid.len()),
            ("last", self.last.len()),
            ("volume", self.volume.len()),
            ("updated", self.updated.len()),
        ];
        push_present(&mut lengths, "change", self.change.as_deref());
        push_present(&mut lengths, "changepct", self.change_pct.as_deref());
        push_present(&mut lengths, "52weekHigh", self.high_52_week.as_deref());
        push_present(&mut lengths, "52weekLow", self.low_52_week.as_deref());
        lengths
    }
}

impl Response for StockQuotesResponse {
    type Wire = StockQuotesWire;

    const FAMILY: &'static str = "stock quotes";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            symbol: wire.symbol,
            ask: wire.ask,
            ask_size: wire.ask_size,
            bid: wire.bid,
            bid_size: wire.bid_size,
            mid: wire.mid,
            last: wire.last,
            change: wire.change,
            change_pct: wire.change_pct,
            high_52_week: wire.high_52_week,
            low_52_week: wire.low_52_week,
            volume: wire.volume,
            updated: wire.updated,
        })
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<StockQuotesWire> for StockQuotesResponse {
    type Error = TacoraError;

    fn try_from(wire: StockQuotesWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for StockQuotesResponse {
    type Record = StockQuote;

    fn unpack(&self) -> Result<Vec<StockQuote>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len())
            .map(|i| {
                Ok(StockQuote {
                    symbol: self.symbol[i].clone(),
                    ask: self.ask[i],
                    ask_size: self.ask_size[i],
                    bid: self.bid[i],
                    bid_size: self.bid_size[i],
                    mid: self.mid[i],
                    last: self.last[i],
                    change: self.change.as_ref().and_then(|c| c[i]),
                    change_pct: self.change_pct.as_ref().and_then(|c| c[i]),
                    high_52_week: self.high_52_week.as_ref().map(|c| c[i]),
                    low_52_week: self.low_52_week.as_ref().map(|c| c[i]),
                    volume: self.volume[i],
                    updated: utc_from_seconds(self.updated[i])?,
                })
            })
            .collect()
    }
}

impl Serialize for StockQuotesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("symbol", &self.symbol)?;
        map.serialize_entry("ask", &self.ask)?;
        map.serialize_entry("askSize", &self.ask_size)?;
        map.serialize_entry("bid", &self.bid)?;
        map.serialize_entry("bidSize", &self.bid_size)?;
        map.serialize_entry("mid", &self.mid)?;
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
        map.serialize_entry("volume", &self.volume)?;
        map.serialize_entry("updated", &self.updated)?;
        map.end()
    }
}

impl fmt::Display for StockQuotesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::from_json;

    const QUOTES: &str = r#"{"s":"ok","symbol":["AAPL","MSFT"],"ask":[186.2,390.5],"askSize":[1,3],"bid":[186.19,390.45],"bidSize":[4,2],"mid":[186.195,390.475],"last":[186.2,390.48],"change":[0.55,null],"changepct":[0.003,null],"volume":[4620193,1203344],"updated":[1705341600,1705341601]}"#;

    #[test]
    fn test_unpack_with_gaps() {
        let response: StockQuotesResponse = from_json(QUOTES).unwrap();
        let quotes = response.unpack().unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].change, Some(0.55));
        assert_eq!(quotes[1].change, None);
        assert_eq!(quotes[1].change_pct, None);
        assert_eq!(quotes[0].high_52_week, None);
        assert_eq!(quotes[1].ask_size, 3);
        assert_eq!(quotes[1].updated.timestamp(), 1705341601);
    }

    #[test]
    fn test_52_week_columns() {
        let payload = QUOTES.replace(
            r#""volume""#,
            r#""52weekHigh":[199.62,405.63],"52weekLow":[143.9,275.37],"volume""#,
        );
        let response: StockQuotesResponse = from_json(&payload).unwrap();
        let quotes = response.unpack().unwrap();

        assert_eq!(quotes[1].low_52_week, Some(275.37));
        assert_eq!(response.to_json().unwrap(), payload);
    }

    #[test]
    fn test_short_optional_column_rejected() {
        let payload = QUOTES.replace(r#""change":[0.55,null]"#, r#""change":[0.55]"#);
        assert!(matches!(
            from_json::<StockQuotesResponse>(&payload),
            Err(TacoraError::LengthMismatch {
                column: "change",
                ..
            })
        ));
    }

    #[test]
    fn test_encode_round_trip() {
        let response: StockQuotesResponse = from_json(QUOTES).unwrap();
        assert_eq!(response.to_json().unwrap(), QUOTES);
    }

    #[test]
    fn test_no_time_column() {
        let response: StockQuotesResponse = from_json(QUOTES).unwrap();
        assert!(matches!(response.date_range(), Err(TacoraError::NoTimeColumn)));
    }

    #[test]
    fn test_describe() {
        let response: StockQuotesResponse = from_json(QUOTES).unwrap();
        let quote = &response.unpack().unwrap()[0];
        let line = quote.describe(&DisplayZone::utc());
        assert!(line.starts_with("AAPL 2024-01-15 18:00:00 UTC Ask: 186.2 x 1"));
        assert!(line.ends_with("Change: 0.55 (0.003%)"));
    }
}
