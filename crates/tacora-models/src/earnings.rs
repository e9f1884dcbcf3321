//! Stock earnings history and estimates.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tacora_types::{DisplayZone, Record, Result, TacoraError, utc_from_seconds};

use crate::decode::Decoder;
use crate::response::{Rejected, Response, check_status, write_text};
use crate::unpack::Unpack;
use crate::validate::{Check, Columnar, KEYED_CHECKS, run_check, run_checks};

/// One earnings report. EPS figures are absent for reports not yet released.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    /// Ticker symbol.
    pub symbol: String,
    /// Fiscal year of the report.
    pub fiscal_year: i64,
    /// Fiscal quarter of the report.
    pub fiscal_quarter: i64,
    /// Last day of the fiscal period.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    /// Day the report was (or will be) released.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub report_date: DateTime<Utc>,
    /// Session of the release, such as `before market open`.
    pub report_time: String,
    /// Reporting currency.
    pub currency: String,
    /// Reported earnings per share.
    #[serde(rename = "reportedEPS")]
    pub reported_eps: Option<f64>,
    /// Consensus estimate.
    #[serde(rename = "estimatedEPS")]
    pub estimated_eps: Option<f64>,
    /// Reported minus estimated.
    #[serde(rename = "surpriseEPS")]
    pub surprise_eps: Option<f64>,
    /// Surprise as a fraction of the estimate.
    #[serde(rename = "surpriseEPSpct")]
    pub surprise_eps_pct: Option<f64>,
    /// When the row was last updated.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
}

fn or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl Record for EarningsReport {
    fn describe(&self, zone: &DisplayZone) -> String {
        format!(
            "{} FY{} Q{} reported {} ({}) EPS: {} est: {} surprise: {} {}",
            self.symbol,
            self.fiscal_year,
            self.fiscal_quarter,
            zone.format(self.report_date),
            self.report_time,
            or_dash(self.reported_eps),
            or_dash(self.estimated_eps),
            or_dash(self.surprise_eps),
            self.currency
        )
    }
}

/// Columnar earnings, one row per fiscal period.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "EarningsWire")]
pub struct EarningsResponse {
    /// Ticker symbols (`symbol`).
    pub symbol: Vec<String>,
    /// Fiscal years (`fiscalYear`).
    pub fiscal_year: Vec<i64>,
    /// Fiscal quarters (`fiscalQuarter`).
    pub fiscal_quarter: Vec<i64>,
    /// Period end dates in epoch seconds (`date`).
    pub date: Vec<i64>,
    /// Release dates in epoch seconds (`reportDate`).
    pub report_date: Vec<i64>,
    /// Release sessions (`reportTime`).
    pub report_time: Vec<String>,
    /// Reporting currencies (`currency`).
    pub currency: Vec<String>,
    /// Reported EPS (`reportedEPS`).
    pub reported_eps: Vec<Option<f64>>,
    /// Estimated EPS (`estimatedEPS`).
    pub estimated_eps: Vec<Option<f64>>,
    /// EPS surprise (`surpriseEPS`).
    pub surprise_eps: Vec<Option<f64>>,
    /// EPS surprise percentage (`surpriseEPSpct`).
    pub surprise_eps_pct: Vec<Option<f64>>,
    /// Update times in epoch seconds (`updated`).
    pub updated: Vec<i64>,
}

/// Earnings as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsWire {
    /// Response status (`s`).
    #[serde(rename = "s")]
    pub status: Option<String>,
    /// Error message sent with a non-`ok` status.
    pub errmsg: Option<String>,
    /// Ticker symbols.
    #[serde(default)]
    pub symbol: Vec<String>,
    /// Fiscal years.
    #[serde(default)]
    pub fiscal_year: Vec<i64>,
    /// Fiscal quarters.
    #[serde(default)]
    pub fiscal_quarter: Vec<i64>,
    /// Period end dates.
    #[serde(default)]
    pub date: Vec<i64>,
    /// Release dates.
    #[serde(default)]
    pub report_date: Vec<i64>,
    /// Release sessions.
    #[serde(default)]
    pub report_time: Vec<String>,
    /// Reporting currencies.
    #[serde(default)]
    pub currency: Vec<String>,
    /// Reported EPS.
    #[serde(rename = "reportedEPS", default)]
    pub reported_eps: Vec<Option<f64>>,
    /// Estimated EPS.
    #[serde(rename = "estimatedEPS", default)]
    pub estimated_eps: Vec<Option<f64>>,
    /// EPS surprise.
    #[serde(rename = "surpriseEPS", default)]
    pub surprise_eps: Vec<Option<f64>>,
    /// EPS surprise percentage.
    #[serde(rename = "surpriseEPSpct", default)]
    pub surprise_eps_pct: Vec<Option<f64>>,
    /// Update times.
    #[serde(default)]
    pub updated: Vec<i64>,
}

impl Columnar for EarningsResponse {
    const CHECKS: &'static [Check] = KEYED_CHECKS;

    fn column_lengths(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("symbol", self.symbol.len()),
            ("fiscalYear", self.fiscal_year.len()),
            ("fiscalQuarter", self.fiscal_quarter.len()),
            ("date", self.date.len()),
            ("reportDate", self.report_date.len()),
            ("reportTime", self.report_time.len()),
            ("currency", self.currency.len()),
            ("reportedEPS", self.reported_eps.len()),
            ("estimatedEPS", self.estimated_eps.len()),
            ("surpriseEPS", self.surprise_eps.len()),
            ("surpriseEPSpct", self.surprise_eps_pct.len()),
            ("updated", self.updated.len()),
        ]
    }
}

impl Response for EarningsResponse {
    type Wire = EarningsWire;

    const FAMILY: &'static str = "stock earnings";

    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>> {
        if let Err(error) = check_status(wire.status.as_deref(), wire.errmsg.as_deref()) {
            return Err(Rejected::new(error, wire));
        }
        Ok(Self {
            symbol: wire.symbol,
            fiscal_year: wire.fiscal_year,
            fiscal_quarter: wire.fiscal_quarter,
            date: wire.date,
            report_date: wire.report_date,
            report_time: wire.report_time,
            currency: wire.currency,
            reported_eps: wire.reported_eps,
            estimated_eps: wire.estimated_eps,
            surprise_eps: wire.surprise_eps,
            surprise_eps_pct: wire.surprise_eps_pct,
            updated: wire.updated,
        })
    }

    fn validate(&self) -> Result<()> {
        run_checks(self)
    }
}

impl TryFrom<EarningsWire> for EarningsResponse {
    type Error = TacoraError;

    fn try_from(wire: EarningsWire) -> Result<Self> {
        Decoder::new().accept(wire)
    }
}

impl Unpack for EarningsResponse {
    type Record = EarningsReport;

    fn unpack(&self) -> Result<Vec<EarningsReport>> {
        run_check(self, Check::EqualLength)?;
        (0..self.len())
            .map(|i| {
                Ok(EarningsReport {
                    symbol: self.symbol[i].clone(),
                    fiscal_year: self.fiscal_year[i],
                    fiscal_quarter: self.fiscal_quarter[i],
                    date: utc_from_seconds(self.date[i])?,
                    report_date: utc_from_seconds(self.report_date[i])?,
                    report_time: self.report_time[i].clone(),
                    currency: self.currency[i].clone(),
                    reported_eps: self.reported_eps[i],
                    estimated_eps: self.estimated_eps[i],
                    surprise_eps: self.surprise_eps[i],
                    surprise_eps_pct: self.surprise_eps_pct[i],
                    updated: utc_from_seconds(self.updated[i])?,
                })
            })
            .collect()
    }
}

impl Serialize for EarningsResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("s", "ok")?;
        map.serialize_entry("symbol", &self.symbol)?;
        map.serialize_entry("fiscalYear", &self.fiscal_year)?;
        map.serialize_entry("fiscalQuarter", &self.fiscal_quarter)?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("reportDate", &self.report_date)?;
        map.serialize_entry("reportTime", &self.report_time)?;
        map.serialize_entry("currency", &self.currency)?;
        map.serialize_entry("reportedEPS", &self.reported_eps)?;
        map.serialize_entry("estimatedEPS", &self.estimated_eps)?;
        map.serialize_entry("surpriseEPS", &self.surprise_eps)?;
        map.serialize_entry("surpriseEPSpct", &self.surprise_eps_pct)?;
        map.serialize_entry("updated", &self.updated)?;
        map.end()
    }
}

impl fmt::Display for EarningsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::from_json;

    const EARNINGS: &str = r#"{"s":"ok","symbol":["AAPL","AAPL"],"fiscalYear":[2023,2024],"fiscalQuarter":[4,1],"date":[1696046400,1703998800],"reportDate":[1698897600,1706763600],"reportTime":["after close","after close"],"currency":["USD","USD"],"reportedEPS":[1.46,null],"estimatedEPS":[1.39,2.1],"surpriseEPS":[0.07,null],"surpriseEPSpct":[0.0504,null],"updated":[1705352400,1705352400]}"#;

    #[test]
    fn test_unpack() {
        let response: EarningsResponse = from_json(EARNINGS).unwrap();
        let reports = response.unpack().unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].fiscal_quarter, 4);
        assert_eq!(reports[0].reported_eps, Some(1.46));
        assert_eq!(reports[1].reported_eps, None);
        assert_eq!(reports[1].estimated_eps, Some(2.1));
        assert_eq!(reports[1].report_date.timestamp(), 1706763600);
    }

    #[test]
    fn test_round_trip() {
        let response: EarningsResponse = from_json(EARNINGS).unwrap();
        assert_eq!(response.to_json().unwrap(), EARNINGS);
    }

    #[test]
    fn test_missing_column() {
        let payload = EARNINGS.replace(r#""currency":["USD","USD"],"#, "");
        assert!(matches!(
            from_json::<EarningsResponse>(&payload),
            Err(TacoraError::LengthMismatch {
                column: "currency",
                expected: 2,
                found: 0
            })
        ));
    }

    #[test]
    fn test_describe() {
        let response: EarningsResponse = from_json(EARNINGS).unwrap();
        let report = &response.unpack().unwrap()[1];
        assert_eq!(
            report.describe(&DisplayZone::default()),
            "AAPL FY2024 Q1 reported 2024-02-01 (after close) EPS: - est: 2.1 surprise: - USD"
        );
    }
}
