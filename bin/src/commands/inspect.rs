//! Inspect command implementation.
//!
//! Decodes a payload and prints a short summary: row count, schema version
//! and the date range covered by its time column.

use crate::display::{Family, decode, read_payload};
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tacora_lib::prelude::*;

/// What `inspect` reports about a decoded payload.
#[derive(Debug)]
pub(crate) struct Summary {
    family: &'static str,
    rows: usize,
    version: Option<SchemaVersion>,
    range: Option<DateRange>,
    detail: Option<String>,
}

impl Summary {
    fn write<W: Write>(&self, zone: &DisplayZone, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{:<9}{}", "family:", self.family)?;
        writeln!(writer, "{:<9}{}", "rows:", self.rows)?;
        if let Some(version) = self.version {
            writeln!(writer, "{:<9}{version}", "version:")?;
        }
        if let Some(range) = &self.range {
            writeln!(
                writer,
                "{:<9}{} to {}",
                "range:",
                zone.format(range.start),
                zone.format(range.end)
            )?;
        }
        if let Some(detail) = &self.detail {
            writeln!(writer, "{:<9}{detail}", "detail:")?;
        }
        writeln!(writer, "{:<9}yes", "valid:")
    }
}

fn columnar<T: Response + Columnar>(payload: &str) -> Result<Summary> {
    let response: T = decode(payload)?;
    Ok(Summary {
        family: T::FAMILY,
        rows: response.len(),
        version: Some(response.version()?),
        range: response.date_range().ok(),
        detail: None,
    })
}

/// Decodes `payload` as `family` and summarizes it.
pub(crate) fn summarize(payload: &str, family: Family) -> Result<Summary> {
    match family {
        Family::StockCandles => columnar::<StockCandlesResponse>(payload),
        Family::FundCandles => columnar::<FundCandlesResponse>(payload),
        Family::IndexCandles => columnar::<IndexCandlesResponse>(payload),
        Family::BulkCandles => columnar::<BulkCandlesResponse>(payload),
        Family::StockQuotes => columnar::<StockQuotesResponse>(payload),
        Family::IndexQuotes => columnar::<IndexQuotesResponse>(payload),
        Family::Earnings => columnar::<EarningsResponse>(payload),
        Family::MarketStatus => columnar::<MarketStatusResponse>(payload),
        Family::OptionQuotes => columnar::<OptionQuotesResponse>(payload),
        Family::OptionStrikes => {
            let response: OptionsStrikesResponse = decode(payload)?;
            Ok(Summary {
                family: OptionsStrikesResponse::FAMILY,
                rows: response.strikes.len(),
                version: None,
                range: None,
                detail: Some(format!("updated {}", response.updated)),
            })
        }
        Family::OptionExpirations => {
            let response: OptionsExpirationsResponse = decode(payload)?;
            Ok(Summary {
                family: OptionsExpirationsResponse::FAMILY,
                rows: response.expirations.len(),
                version: None,
                range: None,
                detail: Some(format!("updated {}", response.updated)),
            })
        }
        Family::OptionLookup => {
            let response: OptionLookupResponse = decode(payload)?;
            Ok(Summary {
                family: OptionLookupResponse::FAMILY,
                rows: 1,
                version: None,
                range: None,
                detail: Some(response.option_symbol),
            })
        }
    }
}

/// Print a summary of the payload stored at `path`.
pub(crate) fn inspect<W: Write>(
    path: &Path,
    family: Family,
    zone: &DisplayZone,
    mut writer: W,
) -> Result<()> {
    let payload = read_payload(path)?;
    let summary = summarize(&payload, family)?;
    summary.write(zone, &mut writer)?;
    writer.flush()?;
    Ok(())
}
