//! Candle (OHLC bar) record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DisplayZone, Record};

/// A single OHLC bar, optionally carrying volume, VWAP and trade count.
///
/// Serializes with the same short keys the service uses for its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Ticker symbol, set for bulk responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Bar open time.
    #[serde(rename = "t", with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    #[serde(rename = "o")]
    pub open: f64,
    /// Highest price.
    #[serde(rename = "h")]
    pub high: f64,
    /// Lowest price.
    #[serde(rename = "l")]
    pub low: f64,
    /// Closing price.
    #[serde(rename = "c")]
    pub close: f64,
    /// Traded volume.
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    /// Volume-weighted average price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
    /// Number of trades.
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub trades: Option<i64>,
}

impl Candle {
    /// Creates a candle with prices only.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        Self {
            symbol: None,
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
            vwap: None,
            trades: None,
        }
    }

    /// Sets the ticker symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Sets the traded volume.
    #[must_use]
    pub fn with_volume(mut self, volume: i64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Sets VWAP and trade count.
    #[must_use]
    pub fn with_extras(mut self, vwap: f64, trades: i64) -> Self {
        self.vwap = Some(vwap);
        self.trades = Some(trades);
        self
    }

    /// Returns true if the prices are internally consistent and volume is not
    /// negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.open >= self.low
            && self.close >= self.low
            && self.volume.is_none_or(|volume| volume >= 0)
    }

    /// Returns true if this candle opened strictly before `other`.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.timestamp < other.timestamp
    }

    /// Returns true if this candle opened strictly after `other`.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.timestamp > other.timestamp
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns the typical price ((high + low + close) / 3).
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

impl Record for Candle {
    fn describe(&self, zone: &DisplayZone) -> String {
        let mut line = String::new();
        if let Some(symbol) = &self.symbol {
            line.push_str(symbol);
            line.push(' ');
        }
        line.push_str(&format!(
            "{} O: {} H: {} L: {} C: {}",
            zone.format(self.timestamp),
            self.open,
            self.high,
            self.low,
            self.close
        ));
        if let Some(volume) = self.volume {
            line.push_str(&format!(" V: {volume}"));
        }
        if let (Some(vwap), Some(trades)) = (self.vwap, self.trades) {
            line.push_str(&format!(" VWAP: {vwap} N: {trades}"));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_candle() -> Candle {
        let timestamp = Utc.with_ymd_and_hms(2023, 11, 10, 15, 30, 0).unwrap();
        Candle::new(timestamp, 183.78, 183.93, 183.76, 183.8716).with_volume(147185)
    }

    #[test]
    fn test_is_valid() {
        assert!(create_test_candle().is_valid());
    }

    #[test]
    fn test_invalid_high_below_close() {
        let mut candle = create_test_candle();
        candle.high = 183.80;
        assert!(!candle.is_valid());
    }

    #[test]
    fn test_invalid_negative_volume() {
        let candle = create_test_candle().with_volume(-1);
        assert!(!candle.is_valid());
    }

    #[test]
    fn test_ordering_helpers() {
        let first = create_test_candle();
        let mut second = create_test_candle();
        second.timestamp += chrono::TimeDelta::minutes(1);

        assert!(first.is_before(&second));
        assert!(second.is_after(&first));
        assert!(!first.is_after(&first));
    }

    #[test]
    fn test_range_and_body() {
        let candle = create_test_candle();
        assert!((candle.range() - 0.17).abs() < 1e-10);
        assert!((candle.body() - 0.0916).abs() < 1e-10);
        let expected = (183.93 + 183.76 + 183.8716) / 3.0;
        assert!((candle.typical_price() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_serialize_wire_keys() {
        let json = serde_json::to_string(&create_test_candle()).unwrap();
        assert_eq!(
            json,
            r#"{"t":1699630200,"o":183.78,"h":183.93,"l":183.76,"c":183.8716,"v":147185}"#
        );
    }

    #[test]
    fn test_describe() {
        let candle = create_test_candle().with_symbol("AAPL").with_extras(183.85, 1200);
        assert_eq!(
            candle.describe(&DisplayZone::default()),
            "AAPL 2023-11-10 10:30:00 EST O: 183.78 H: 183.93 L: 183.76 C: 183.8716 V: 147185 \
             VWAP: 183.85 N: 1200"
        );
    }
}
