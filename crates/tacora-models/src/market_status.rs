//! Market open/closed calendar.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{DisplayZone, Record, Result, TacoraError, utc_from_seconds};

use crate::decode::Decoder;
use crate::response::{Rejected, Response, check_status, write_text};
use crate::unpack::Unpack;
use crate::validate::{Check, Columnar, push_present, run_check, run_checks};

/// Whether the market trades on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketState {
    /// Regular session.
    Open,
    /// Holiday or weekend.
    Closed,
    /// Any other status string.
    Unknown,
}

impl MarketState {
    /// Parses a wire status, ignoring case.
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market status on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketStatusReport {
    /// The day.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    /// Its status.
    pub status: MarketState,
}

impl MarketStatusReport {
    /// Returns true if the market was open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == MarketState::Open
    }

    /// Returns true if the market was closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == MarketState::Closed
    }
}

impl Record for MarketStatusReport {
    fn describe(&self, zone: &DisplayZone) -> String {
        format!("{} {}", zone.format(self.date), self.status)
    }
}

/// Columnar market status, one row per day.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "MarketStatusWire")]
pub struct MarketStatusResponse {
    /// Days in epoch seconds (`date`).
    pub date: Vec<i64>,
    /// Status per day (`status`); may be omitted by the service.
    pub status: Option<Vec<String>>,
}

/// Market status as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketStatusWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status_code: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// Days.
    #[serde(default)]
    pub date: Vec<i64>,
    /// Status per day.
    pub status: Option<Vec<String>>,
}

impl MarketStatusResponse {
    /// Days on which the market was open.
    ///
    /// # Errors
    ///
    /// See [`Unpack::unpack`].
    pub fn open_dates(&self) -> Result<Vec<DateTime<Utc>>> {
        Ok(self
            .unpack()?
            .into_iter()
            .filter(MarketStatusReport::is_open)
            .map(|report| report.date)
            .collect())
    }

    /// Days on which the market was closed.
    ///
    /// # Errors
    ///
    /// See [`Unpack::unpack`].
    pub fn closed_dates(&self) -> Result<Vec<DateTime<Utc>>> {
        Ok(self
            .unpack()?
            .into_iter()
            .filter(MarketStatusReport::is_closed)
            .map(|report| report.date)
            .collect())
    }
}

impl Columnar for MarketStatusResponse {
    const CHECKS: &'static [Check] = &[Check::Ascending, Check::EqualLength, Check::NonEmpty];

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        let mut lengths = vec![("date", self.date.len())];
        push_present(&mut lengths, "status", self.status.as_deref());
        lengths
    }

    fn time_column(&self) -> Option<(&'static str, &[i64])> {
        Some(("date", &self.date))
    }
}

impl Response for MarketStatusResponse {
    type Wire = MarketStatusWire;

    const FAMILY: &'static str = "market status";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status_code.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            date: wire.date,
            status: wire.status,
        })
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<MarketStatusWire> for MarketStatusResponse {
    type Error = TacoraError;

    fn try_from(wire: MarketStatusWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for MarketStatusResponse {
    type Record = MarketStatusReport;

    fn unpack(&self) -> Result<Vec<MarketStatusReport>> {
        let status = self
            .status
            .as_ref()
            .ok_or(TacoraError::MissingColumn("status"))?;
        run_check(self, Check::EqualLength)?;
        self.date
            .iter()
            .zip(status)
            .map(|(&date, status)| {
                Ok(MarketStatusReport {
                    date: utc_from_seconds(date)?,
                    status: MarketState::from_status(status),
                })
            })
            .collect()
    }
}

impl Serialize for MarketStatusResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("date", &self.date)?;
        if let Some(status) = &self.status {
            map.serialize_entry("status", status)?;
        }
        map.end()
    }
}

impl fmt::Display for MarketStatusResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::from_json;

    const STATUS: &str = r#"{"s":"ok","date":[1704085200,1704171600,1704258000],"status":["closed","Open","open"]}"#;

    #[test]
    fn test_unpack_lowercases_status() {
        let response: MarketStatusResponse = from_json(STATUS).unwrap();
        let reports = response.unpack().unwrap();

        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_closed());
        assert!(reports[1].is_open());
        assert_eq!(reports[2].status, MarketState::Open);
    }

    #[test]
    fn test_open_and_closed_dates() {
        let response: MarketStatusResponse = from_json(STATUS).unwrap();

        let open = response.open_dates().unwrap();
        let closed = response.closed_dates().unwrap();
        assert_eq!(open.len(), 2);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].timestamp(), 1704085200);
    }

    #[test]
    fn test_unpack_without_status() {
        let response: MarketStatusResponse =
            from_json(r#"{"s":"ok","date":[1704085200]}"#).unwrap();
        assert!(matches!(
            response.unpack(),
            Err(TacoraError::MissingColumn("status"))
        ));
    }

    #[test]
    fn test_unknown_status() {
        assert_eq!(MarketState::from_status("half-day"), MarketState::Unknown);
    }

    #[test]
    fn test_describe() {
        let response: MarketStatusResponse = from_json(STATUS).unwrap();
        let reports = response.unpack().unwrap();
        assert_eq!(reports[0].describe(&DisplayZone::default()), "2024-01-01 closed");
    }

    #[test]
    fn test_round_trip() {
        let response: MarketStatusResponse = from_json(STATUS).unwrap();
        assert_eq!(response.to_json().unwrap(), STATUS);
    }
}
