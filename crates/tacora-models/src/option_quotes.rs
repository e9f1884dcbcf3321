//! Option chain quotes with optional greeks.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{DisplayZone, Record, Result, TacoraError, utc_from_seconds};

use crate::decode::Decoder;
use crate::response::{Rejected, Response, check_status, write_text};
use crate::unpack::Unpack;
use crate::validate::{Check, Columnar, KEYED_CHECKS, run_check, run_checks};

/// One option contract quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionQuote {
    /// OCC option symbol.
    pub option_symbol: String,
    /// Underlying ticker.
    pub underlying: String,
    /// Expiration time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiration: DateTime<Utc>,
    /// `call` or `put`.
    pub side: String,
    /// Strike price.
    pub strike: f64,
    /// When the contract first traded.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub first_traded: DateTime<Utc>,
    /// Days to expiration.
    pub dte: i64,
    /// When the quote was last updated.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
    /// Best bid price.
    pub bid: f64,
    /// Contracts bid.
    pub bid_size: i64,
    /// Midpoint of bid and ask.
    pub mid: f64,
    /// Best ask price.
    pub ask: f64,
    /// Contracts offered.
    pub ask_size: i64,
    /// Last traded price.
    pub last: f64,
    /// Open contracts.
    pub open_interest: i64,
    /// Session volume.
    pub volume: i64,
    /// Whether the contract is in the money.
    pub in_the_money: bool,
    /// Value if exercised now.
    pub intrinsic_value: f64,
    /// Premium above intrinsic value.
    pub extrinsic_value: f64,
    /// Price of the underlying.
    pub underlying_price: f64,
    /// Implied volatility.
    pub iv: Option<f64>,
    /// Delta.
    pub delta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
    /// Rho.
    pub rho: Option<f64>,
}

impl Record for OptionQuote {
    fn describe(&self, zone: &DisplayZone) -> String {
        let mut line = format!(
            "{} {} {} {} Exp: {} DTE: {} Bid: {} x {} Mid: {} Ask: {} x {} Last: {} OI: {} Volume: {} Underlying: {}",
            self.option_symbol,
            zone.format(self.updated),
            self.side,
            self.strike,
            zone.format(self.expiration),
            self.dte,
            self.bid,
            self.bid_size,
            self.mid,
            self.ask,
            self.ask_size,
            self.last,
            self.open_interest,
            self.volume,
            self.underlying_price
        );
        let greeks = [
            ("IV", self.iv),
            ("Delta", self.delta),
            ("Gamma", self.gamma),
            ("Theta", self.theta),
            ("Vega", self.vega),
            ("Rho", self.rho),
        ];
        for (name, value) in greeks {
            if let Some(value) = value {
                line.push_str(&format!(" {name}: {value}"));
            }
        }
        line
    }
}

/// Columnar option quotes, one row per contract.
///
/// The greek columns are either absent (empty) or one value per row, each of
/// which may be null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "OptionQuotesWire")]
pub struct OptionQuotesResponse {
    /// OCC option symbols (`optionSymbol`).
    pub option_symbol: Vec<String>,
    /// Underlying tickers (`underlying`).
    pub underlying: Vec<String>,
    /// Expirations in epoch seconds (`expiration`).
    pub expiration: Vec<i64>,
    /// Sides (`side`).
    pub side: Vec<String>,
    /// Strike prices (`strike`).
    pub strike: Vec<f64>,
    /// First trade times in epoch seconds (`firstTraded`).
    pub first_traded: Vec<i64>,
    /// Days to expiration (`dte`).
    pub dte: Vec<i64>,
    /// Update times in epoch seconds (`updated`).
    pub updated: Vec<i64>,
    /// Bid prices (`bid`).
    pub bid: Vec<f64>,
    /// Bid sizes (`bidSize`).
    pub bid_size: Vec<i64>,
    /// Mid prices (`mid`).
    pub mid: Vec<f64>,
    /// Ask prices (`ask`).
    pub ask: Vec<f64>,
    /// Ask sizes (`askSize`).
    pub ask_size: Vec<i64>,
    /// Last traded prices (`last`).
    pub last: Vec<f64>,
    /// Open interest (`openInterest`).
    pub open_interest: Vec<i64>,
    /// Volumes (`volume`).
    pub volume: Vec<i64>,
    /// In-the-money flags (`inTheMoney`).
    pub in_the_money: Vec<bool>,
    /// Intrinsic values (`intrinsicValue`).
    pub intrinsic_value: Vec<f64>,
    /// Extrinsic values (`extrinsicValue`).
    pub extrinsic_value: Vec<f64>,
    /// Underlying prices (`underlyingPrice`).
    pub underlying_price: Vec<f64>,
    /// Implied volatilities (`iv`).
    pub iv: Vec<Option<f64>>,
    /// Deltas (`delta`).
    pub delta: Vec<Option<f64>>,
    /// Gammas (`gamma`).
    pub gamma: Vec<Option<f64>>,
    /// Thetas (`theta`).
    pub theta: Vec<Option<f64>>,
    /// Vegas (`vega`).
    pub vega: Vec<Option<f64>>,
    /// Rhos (`rho`).
    pub rho: Vec<Option<f64>>,
}

/// Option quotes as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionQuotesWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// OCC option symbols.
    #[serde(default)]
    pub option_symbol: Vec<String>,
    /// Underlying tickers.
    #[serde(default)]
    pub underlying: Vec<String>,
    /// Expirations.
    #[serde(default)]
    pub expiration: Vec<i64>,
    /// Sides.
    #[serde(default)]
    pub side: Vec<String>,
    /// Strike prices.
    #[serde(default)]
    pub strike: Vec<f64>,
    /// First trade times.
    #[serde(default)]
    pub first_traded: Vec<i64>,
    /// Days to expiration.
    #[serde(default)]
    pub dte: Vec<i64>,
    /// Update times.
    #[serde(default)]
    pub updated: Vec<i64>,
    /// Bid prices.
    #[serde(default)]
    pub bid: Vec<f64>,
    /// Bid sizes.
    #[serde(default)]
    pub bid_size: Vec<i64>,
    /// Mid prices.
    #[serde(default)]
    pub mid: Vec<f64>,
    /// Ask prices.
    #[serde(default)]
    pub ask: Vec<f64>,
    /// Ask sizes.
    #[serde(default)]
    pub ask_size: Vec<i64>,
    /// Last traded prices.
    #[serde(default)]
    pub last: Vec<f64>,
    /// Open interest.
    #[serde(default)]
    pub open_interest: Vec<i64>,
    /// Volumes.
    #[serde(default)]
    pub volume: Vec<i64>,
    /// In-the-money flags.
    #[serde(default)]
    pub in_the_money: Vec<bool>,
    /// Intrinsic values.
    #[serde(default)]
    pub intrinsic_value: Vec<f64>,
    /// Extrinsic values.
    #[serde(default)]
    pub extrinsic_value: Vec<f64>,
    /// Underlying prices.
    #[serde(default)]
    pub underlying_price: Vec<f64>,
    /// Implied volatilities.
    #[serde(default)]
    pub iv: Vec<Option<f64>>,
    /// Deltas.
    #[serde(default)]
    pub delta: Vec<Option<f64>>,
    /// Gammas. Older payloads spell the key `gamm`.
    #[serde(default, alias = "gamm")]
    pub gamma: Vec<Option<f64>>,
    /// Thetas.
    #[serde(default)]
    pub theta: Vec<Option<f64>>,
    /// Vegas.
    #[serde(default)]
    pub vega: Vec<Option<f64>>,
    /// Rhos.
    #[serde(default)]
    pub rho: Vec<Option<f64>>,
}

impl OptionQuotesResponse {
    fn greeks(&self) -> [(&'static str, &[Option<f64>]); 6] {
        [
            ("iv", self.iv.as_slice()),
            ("delta", self.delta.as_slice()),
            ("gamma", self.gamma.as_slice()),
            ("theta", self.theta.as_slice()),
            ("vega", self.vega.as_slice()),
            ("rho", self.rho.as_slice()),
        ]
    }
}

/// Value at `index` of a greek column, or `None` when the column is absent.
fn greek_at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

impl Columnar for OptionQuotesResponse {
    const CHECKS: &'static [Check] = KEYED_CHECKS;

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = vec![
            ("optionSymbol", self.option_symbol.len()),
            ("underlying", self.underlying.len()),
            ("expiration", self.expiration.len()),
            ("side", self.side.len()),
            ("strike", self.strike.len()),
            ("firstTraded", self.first_traded.len()),
            ("dte", self.dte.len()),
            ("updated", self.updated.len()),
            ("bid", self.bid.len()),
            ("bidSize", self.bid_size.len()),
            ("mid", self.mid.len()),
            ("ask", self.ask.len()),
            ("askSize", self.ask_size.len()),
            ("last", self.last.len()),
            ("openInterest", self.open_interest.len()),
            ("volume", self.volume.len()),
            ("inTheMoney", self.in_the_money.len()),
            ("intrinsicValue", self.intrinsic_value.len()),
            ("extrinsicValue", self.extrinsic_value.len()),
            ("underlyingPrice", self.underlying_price.len()),
        ];
        // An empty greek column means the greeks were not requested.
        lengths.extend(
            self.greeks()
                .into_iter()
                .filter(|(_, values)| !values.is_empty())
                .map(|(column, values)| (column, values.len())),
        );
        lengths
    }
}

impl Response for OptionQuotesResponse {
    type Wire = OptionQuotesWire;

    const FAMILY: &'static str = "option quotes";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            option_symbol: wire.option_symbol,
            underlying: wire.underlying,
            expiration: wire.expiration,
            side: wire.side,
            strike: wire.strike,
            first_traded: wire.first_traded,
            dte: wire.dte,
            updated: wire.updated,
            bid: wire.bid,
            bid_size: wire.bid_size,
            mid: wire.mid,
            ask: wire.ask,
            ask_size: wire.ask_size,
            last: wire.last,
            open_interest: wire.open_interest,
            volume: wire.volume,
            in_the_money: wire.in_the_money,
            intrinsic_value: wire.intrinsic_value,
            extrinsic_value: wire.extrinsic_value,
            underlying_price: wire.underlying_price,
            iv: wire.iv,
            delta: wire.delta,
            gamma: wire.gamma,
            theta: wire.theta,
            vega: wire.vega,
            rho: wire.rho,
        })
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<OptionQuotesWire> for OptionQuotesResponse {
    type Error = TacoraError;

    fn try_from(wire: OptionQuotesWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for OptionQuotesResponse {
    type Record = OptionQuote;

    fn unpack(&self) -> Result<Vec<OptionQuote>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len())
            .map(|i| {
                Ok(OptionQuote {
                    option_symbol: self.option_symbol[i].clone(),
                    underlying: self.underlying[i].clone(),
                    expiration: utc_from_seconds(self.expiration[i])?,
                    side: self.side[i].clone(),
                    strike: self.strike[i],
                    first_traded: utc_from_seconds(self.first_traded[i])?,
                    dte: self.dte[i],
                    updated: utc_from_seconds(self.updated[i])?,
                    bid: self.bid[i],
                    bid_size: self.bid_size[i],
                    mid: self.mid[i],
                    ask: self.ask[i],
                    ask_size: self.ask_size[i],
                    last: self.last[i],
                    open_interest: self.open_interest[i],
                    volume: self.volume[i],
                    in_the_money: self.in_the_money[i],
                    intrinsic_value: self.intrinsic_value[i],
                    extrinsic_value: self.extrinsic_value[i],
                    underlying_price: self.underlying_price[i],
                    iv: greek_at(&self.iv, i),
                    delta: greek_at(&self.delta, i),
                    gamma: greek_at(&self.gamma, i),
                    theta: greek_at(&self.theta, i),
                    vega: greek_at(&self.vega, i),
                    rho: greek_at(&self.rho, i),
                })
            })
            .collect()
    }
}

impl Serialize for OptionQuotesResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("optionSymbol", &self.option_symbol)?;
        map.serialize_entry("underlying", &self.underlying)?;
        map.serialize_entry("expiration", &self.expiration)?;
        map.serialize_entry("side", &self.side)?;
        map.serialize_entry("strike", &self.strike)?;
        map.serialize_entry("firstTraded", &self.first_traded)?;
        map.serialize_entry("dte", &self.dte)?;
        map.serialize_entry("updated", &self.updated)?;
        map.serialize_entry("bid", &self.bid)?;
        map.serialize_entry("bidSize", &self.bid_size)?;
        map.serialize_entry("mid", &self.mid)?;
        map.serialize_entry("ask", &self.ask)?;
        map.serialize_entry("askSize", &self.ask_size)?;
        map.serialize_entry("last", &self.last)?;
        map.serialize_entry("openInterest", &self.open_interest)?;
        map.serialize_entry("volume", &self.volume)?;
        map.serialize_entry("inTheMoney", &self.in_the_money)?;
        map.serialize_entry("intrinsicValue", &self.intrinsic_value)?;
        map.serialize_entry("extrinsicValue", &self.extrinsic_value)?;
        map.serialize_entry("underlyingPrice", &self.underlying_price)?;
        for (column, values) in self.greeks() {
            if !values.is_empty() {
                map.serialize_entry(column, values)?;
            }
        }
        map.end()
    }
}

impl fmt::Display for OptionQuotesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}
