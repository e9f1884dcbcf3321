//! Option chain helpers: symbol lookup, expirations and strikes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tacora_types::{DisplayZone, Record, Result, TacoraError};

use crate::decode::Decoder;
use crate::response::{Rejected, Response, check_status, write_text};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

/// The parts of an OCC option symbol such as `AAPL250117C00150000`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSymbol {
    /// Root symbol of the underlying.
    pub underlying: String,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Call or put.
    pub side: OptionSide,
    /// Strike price.
    pub strike: f64,
}

impl OptionSymbol {
    /// Parses an OCC symbol: root, `YYMMDD`, `C` or `P`, then the strike in
    /// thousandths padded to eight digits.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::InvalidOptionSymbol`] if the symbol does not
    /// follow that layout.
    pub fn parse(symbol: &str) -> Result<Self> {
        let invalid = || TacoraError::InvalidOptionSymbol(symbol.to_string());
        if !symbol.is_ascii() || symbol.len() < 16 {
            return Err(invalid());
        }
        let (underlying, rest) = symbol.split_at(symbol.len() - 15);
        let (date, rest) = rest.split_at(6);
        let (side, strike) = rest.split_at(1);

        let expiration = NaiveDate::parse_from_str(date, "%y%m%d").map_err(|_| invalid())?;
        let side = match side {
            "C" => OptionSide::Call,
            "P" => OptionSide::Put,
            _ => return Err(invalid()),
        };
        if !strike.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let strike = strike.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self {
            underlying: underlying.trim_end().to_string(),
            expiration,
            side,
            strike: f64::from(strike) / 1000.0,
        })
    }
}

impl Record for OptionSymbol {
    fn describe(&self, _zone: &DisplayZone) -> String {
        let side = match self.side {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        };
        format!("{} {} {side} {:.2}", self.underlying, self.expiration, self.strike)
    }
}

/// The OCC symbol found for a human-readable option description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "OptionLookupWire")]
pub struct OptionLookupResponse {
    /// The option symbol (`optionSymbol`).
    pub option_symbol: String,
}

/// Option lookup as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionLookupWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// The option symbol.
    #[serde(rename = "optionSymbol", default)]
    pub option_symbol: String,
}

impl OptionLookupResponse {
    /// Splits the symbol into its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is not in OCC format.
    pub fn parse_symbol(&self) -> Result<OptionSymbol> {
        OptionSymbol::parse(&self.option_symbol)
    }
}

impl Response for OptionLookupResponse {
    type Wire = OptionLookupWire;

    const FAMILY: &'static str = "option lookup";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            option_symbol: wire.option_symbol,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.option_symbol.is_empty() {
            return Err(TacoraError::EmptyLookup);
        }
        Ok(())
    }
}

impl TryFrom<OptionLookupWire> for OptionLookupResponse {
    type Error = TacoraError;

    fn try_from(wire: OptionLookupWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Serialize for OptionLookupResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("optionSymbol", &self.option_symbol)?;
        map.end()
    }
}

impl fmt::Display for OptionLookupResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

/// Expiration dates available for an underlying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "OptionsExpirationsWire")]
pub struct OptionsExpirationsResponse {
    /// Expiration dates as `YYYY-MM-DD` (`expirations`).
    pub expirations: Vec<String>,
    /// Update time in epoch seconds (`updated`).
    pub updated: i64,
}

/// Option expirations as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsExpirationsWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// Expiration dates.
    #[serde(default)]
    pub expirations: Vec<String>,
    /// Update time.
    #[serde(default)]
    pub updated: i64,
}

fn parse_expiration(expiration: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(expiration, DATE_FORMAT)
        .map_err(|_| TacoraError::InvalidExpiration(expiration.to_string()))
}

impl OptionsExpirationsResponse {
    /// Expirations as instants at the 16:00 close in `zone`.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is malformed or 16:00 does not exist on it.
    pub fn unpack_in(&self, zone: &DisplayZone) -> Result<Vec<DateTime<Utc>>> {
        self.expirations
            .iter()
            .map(|expiration| zone.market_close(parse_expiration(expiration)?))
            .collect()
    }
}

impl Response for OptionsExpirationsResponse {
    type Wire = OptionsExpirationsWire;

    const FAMILY: &'static str = "option expirations";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            expirations: wire.expirations,
            updated: wire.updated,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.expirations.is_empty() {
            return Err(TacoraError::EmptyColumn("expirations"));
        }
        for expiration in &self.expirations {
            parse_expiration(expiration)?;
        }
        Ok(())
    }
}

impl TryFrom<OptionsExpirationsWire> for OptionsExpirationsResponse {
    type Error = TacoraError;

    fn try_from(wire: OptionsExpirationsWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Serialize for OptionsExpirationsResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("expirations", &self.expirations)?;
        map.serialize_entry("updated", &self.updated)?;
        map.end()
    }
}

impl fmt::Display for OptionsExpirationsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

/// Strikes listed for one expiration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionStrikes {
    /// Expiration at the 16:00 close.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiration: DateTime<Utc>,
    /// Strike prices.
    pub strikes: Vec<f64>,
}

impl Record for OptionStrikes {
    fn describe(&self, zone: &DisplayZone) -> String {
        let strikes: Vec<String> = self.strikes.iter().map(|s| format!("{s:.2}")).collect();
        format!("{} [{}]", zone.format(self.expiration), strikes.join(" "))
    }
}

/// Strikes keyed by expiration date.
///
/// The service sends one top-level key per `YYYY-MM-DD` expiration, so the
/// payload is read as a generic JSON object and converted key by key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct OptionsStrikesResponse {
    /// Strike lists by expiration date, in date order.
    pub strikes: BTreeMap<NaiveDate, Vec<f64>>,
    /// Update time in epoch seconds (`updated`).
    pub updated: i64,
}

/// Keys of a strikes payload that are not expiration dates.
const STRIKES_RESERVED: &[&str] = &["s", "errmsg", "updated"];

fn parse_strikes(wire: &Map<String, Value>) -> Result<BTreeMap<NaiveDate, Vec<f64>>> {
    let mut strikes = BTreeMap::new();
    for (key, value) in wire {
        if STRIKES_RESERVED.contains(&key.as_str()) {
            continue;
        }
        let date = NaiveDate::parse_from_str(key, DATE_FORMAT)
            .map_err(|_| TacoraError::InvalidStrikeKey(key.clone()))?;
        let values = value
            .as_array()
            .ok_or_else(|| TacoraError::InvalidStrikeValue(key.clone()))?
            .iter()
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| TacoraError::InvalidStrikeValue(key.clone()))
            })
            .collect::<Result<Vec<f64>>>()?;
        strikes.insert(date, values);
    }
    Ok(strikes)
}

impl OptionsStrikesResponse {
    /// One record per expiration, at the 16:00 close in `zone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is empty or 16:00 does not exist on
    /// an expiration date.
    pub fn unpack_in(&self, zone: &DisplayZone) -> Result<Vec<OptionStrikes>> {
        self.validate()?;
        self.strikes
            .iter()
            .map(|(&date, strikes)| {
                Ok(OptionStrikes {
                    expiration: zone.market_close(date)?,
                    strikes: strikes.clone(),
                })
            })
            .collect()
    }
}

impl Response for OptionsStrikesResponse {
    type Wire = Map<String, Value>;

    const FAMILY: &'static str = "option strikes";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        let status = check_status(
            wire.get("s").and_then(Value::as_str),
            wire.get("errmsg").and_then(Value::as_str),
        );
        if let Err(error) = status {
            return Err(Rejected::new(error, wire));
        }
        let Some(updated) = wire.get("updated").and_then(Value::as_i64) else {
            return Err(Rejected::new(TacoraError::MissingColumn("updated"), wire));
        };
        match parse_strikes(&wire) {
            Ok(strikes) => Ok(Self { strikes, updated }),
            Err(error) => Err(Rejected::new(error, wire)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.strikes.is_empty() {
            return Err(TacoraError::EmptyColumn("strikes"));
        }
        Ok(())
    }
}

impl TryFrom<Map<String, Value>> for OptionsStrikesResponse {
    type Error = TacoraError;

    fn try_from(wire: Map<String, Value>) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Serialize for OptionsStrikesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.strikes.len() + 2))?;
        map.serialize_entry("s", "ok")?;
        for (date, strikes) in &self.strikes {
            map.serialize_entry(&date.format(DATE_FORMAT).to_string(), strikes)?;
        }
        map.serialize_entry("updated", &self.updated)?;
        map.end()
    }
}

impl fmt::Display for OptionsStrikesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::from_json;
    use chrono::TimeZone;

    const STRIKES: &str = r#"{"s":"ok","updated":1705597200,"2024-01-26":[180,182.5,185],"2024-01-19":[175,177.5]}"#;

    #[test]
    fn test_strikes_sorted_by_date() {
        let response: OptionsStrikesResponse = from_json(STRIKES).unwrap();
        let dates: Vec<_> = response.strikes.keys().copied().collect();

        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 26).unwrap(),
            ]
        );
        assert_eq!(response.updated, 1705597200);
    }

    #[test]
    fn test_strikes_encode_in_date_order() {
        let response: OptionsStrikesResponse = from_json(STRIKES).unwrap();
        assert_eq!(
            response.to_json().unwrap(),
            r#"{"s":"ok","2024-01-19":[175.0,177.5],"2024-01-26":[180.0,182.5,185.0],"updated":1705597200}"#
        );
    }

    #[test]
    fn test_strikes_unpack_at_close() {
        let response: OptionsStrikesResponse = from_json(STRIKES).unwrap();
        let unpacked = response.unpack_in(&DisplayZone::default()).unwrap();

        assert_eq!(unpacked.len(), 2);
        assert_eq!(
            unpacked[0].expiration,
            Utc.with_ymd_and_hms(2024, 1, 19, 21, 0, 0).unwrap()
        );
        assert_eq!(unpacked[1].strikes, vec![180.0, 182.5, 185.0]);
        assert_eq!(
            unpacked[0].describe(&DisplayZone::default()),
            "2024-01-19 16:00:00 EST [175.00 177.50]"
        );
    }

    #[test]
    fn test_strikes_bad_key() {
        let payload = r#"{"s":"ok","updated":1,"next friday":[1,2]}"#;
        assert!(matches!(
            from_json::<OptionsStrikesResponse>(payload),
            Err(TacoraError::InvalidStrikeKey(ref key)) if key == "next friday"
        ));
    }

    #[test]
    fn test_strikes_bad_value() {
        let payload = r#"{"s":"ok","updated":1,"2024-01-19":"175"}"#;
        assert!(matches!(
            from_json::<OptionsStrikesResponse>(payload),
            Err(TacoraError::InvalidStrikeValue(_))
        ));
    }

    #[test]
    fn test_strikes_missing_updated() {
        let payload = r#"{"s":"ok","2024-01-19":[175]}"#;
        assert!(matches!(
            from_json::<OptionsStrikesResponse>(payload),
            Err(TacoraError::MissingColumn("updated"))
        ));
    }

    #[test]
    fn test_strikes_empty() {
        assert!(matches!(
            from_json::<OptionsStrikesResponse>(r#"{"s":"ok","updated":1}"#),
            Err(TacoraError::EmptyColumn("strikes"))
        ));
    }

    #[test]
    fn test_expirations() {
        let payload = r#"{"s":"ok","expirations":["2024-01-19","2024-07-19"],"updated":1705597200}"#;
        let response: OptionsExpirationsResponse = from_json(payload).unwrap();
        let expirations = response.unpack_in(&DisplayZone::default()).unwrap();

        assert_eq!(expirations[0], Utc.with_ymd_and_hms(2024, 1, 19, 21, 0, 0).unwrap());
        assert_eq!(expirations[1], Utc.with_ymd_and_hms(2024, 7, 19, 20, 0, 0).unwrap());
        assert_eq!(response.to_json().unwrap(), payload);
    }

    #[test]
    fn test_expirations_invalid_date() {
        let payload = r#"{"s":"ok","expirations":["2024-13-01"],"updated":1}"#;
        assert!(matches!(
            from_json::<OptionsExpirationsResponse>(payload),
            Err(TacoraError::InvalidExpiration(_))
        ));
    }

    #[test]
    fn test_lookup() {
        let payload = r#"{"s":"ok","optionSymbol":"AAPL250117C00150000"}"#;
        let response: OptionLookupResponse = from_json(payload).unwrap();
        let symbol = response.parse_symbol().unwrap();

        assert_eq!(symbol.underlying, "AAPL");
        assert_eq!(symbol.expiration, NaiveDate::from_ymd_opt(2025, 1, 17).unwrap());
        assert_eq!(symbol.side, OptionSide::Call);
        assert!((symbol.strike - 150.0).abs() < 1e-10);
        assert_eq!(symbol.describe(&DisplayZone::utc()), "AAPL 2025-01-17 call 150.00");
        assert_eq!(response.to_json().unwrap(), payload);
    }

    #[test]
    fn test_lookup_empty_symbol() {
        assert!(matches!(
            from_json::<OptionLookupResponse>(r#"{"s":"ok","optionSymbol":""}"#),
            Err(TacoraError::EmptyLookup)
        ));
    }

    #[test]
    fn test_parse_fractional_put() {
        let symbol = OptionSymbol::parse("SPY240119P00477500").unwrap();
        assert_eq!(symbol.side, OptionSide::Put);
        assert!((symbol.strike - 477.5).abs() < 1e-10);
    }

    #[test]
    fn test_parse_malformed_symbols() {
        for bad in ["", "AAPL", "AAPL250117X00150000", "AAPL251317C00150000", "AAPL250117C0015000O"] {
            assert!(matches!(
                OptionSymbol::parse(bad),
                Err(TacoraError::InvalidOptionSymbol(_))
            ));
        }
    }
}
