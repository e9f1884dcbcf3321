//! Unpack command implementation.
//!
//! Decodes a payload, optionally prunes candle rows to a local date range,
//! and writes either the records or the pruned columnar payload.

use crate::display::{Family, Format, decode, read_payload, write_raw, write_records};
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::Path;
use tacora_lib::prelude::*;
use tracing::info;

/// Output settings for `unpack`.
#[derive(Debug)]
pub(crate) struct UnpackOptions {
    pub(crate) format: Format,
    pub(crate) pretty: bool,
    pub(crate) range: Option<DateRange>,
    pub(crate) zone: DisplayZone,
}

fn emit<T, R, F, W>(response: &T, records: F, options: &UnpackOptions, writer: W) -> Result<()>
where
    T: Response,
    R: Record,
    F: FnOnce() -> tacora_lib::Result<Vec<R>>,
    W: Write + Send,
{
    match options.format.output_format() {
        None => write_raw(response, options.pretty, writer),
        Some(format) => write_records(&records()?, format, &options.zone, options.pretty, writer),
    }
}

fn rows<T, W>(payload: &str, options: &UnpackOptions, writer: W) -> Result<()>
where
    T: Response + Unpack,
    T::Record: Record,
    W: Write + Send,
{
    let response: T = decode(payload)?;
    emit(&response, || response.unpack(), options, writer)
}

fn candles<T, W>(payload: &str, options: &UnpackOptions, writer: W) -> Result<()>
where
    T: Response + Unpack + Prune,
    T::Record: Record,
    W: Write + Send,
{
    let mut response: T = decode(payload)?;
    if let Some(range) = &options.range {
        let removed = response
            .prune_outside_date_range(range)
            .with_context(|| format!("No {} rows in {range}", T::FAMILY))?;
        response
            .validate()
            .with_context(|| format!("Pruned {} payload is invalid", T::FAMILY))?;
        info!(
            family = T::FAMILY,
            removed,
            remaining = response.len(),
            "pruned to {range}"
        );
    }
    emit(&response, || response.unpack(), options, writer)
}

/// Unpack the payload stored at `path` into `writer`.
pub(crate) fn unpack<W: Write + Send>(
    path: &Path,
    family: Family,
    options: &UnpackOptions,
    mut writer: W,
) -> Result<()> {
    if options.range.is_some() && !family.is_time_candles() {
        bail!("--from/--to only apply to stock, fund and index candles, not {family}");
    }
    let payload = read_payload(path)?;

    match family {
        Family::StockCandles => candles::<StockCandlesResponse, _>(&payload, options, &mut writer),
        Family::FundCandles => candles::<FundCandlesResponse, _>(&payload, options, &mut writer),
        Family::IndexCandles => candles::<IndexCandlesResponse, _>(&payload, options, &mut writer),
        Family::BulkCandles => rows::<BulkCandlesResponse, _>(&payload, options, &mut writer),
        Family::StockQuotes => rows::<StockQuotesResponse, _>(&payload, options, &mut writer),
        Family::IndexQuotes => rows::<IndexQuotesResponse, _>(&payload, options, &mut writer),
        Family::Earnings => rows::<EarningsResponse, _>(&payload, options, &mut writer),
        Family::MarketStatus => rows::<MarketStatusResponse, _>(&payload, options, &mut writer),
        Family::OptionQuotes => rows::<OptionQuotesResponse, _>(&payload, options, &mut writer),
        Family::OptionStrikes => {
            let response: OptionsStrikesResponse = decode(&payload)?;
            emit(&response, || response.unpack_in(&options.zone), options, &mut writer)
        }
        Family::OptionExpirations => {
            let response: OptionsExpirationsResponse = decode(&payload)?;
            emit(&response, || response.unpack_in(&options.zone), options, &mut writer)
        }
        Family::OptionLookup => {
            let response: OptionLookupResponse = decode(&payload)?;
            emit(
                &response,
                || Ok(vec![response.parse_symbol()?]),
                options,
                &mut writer,
            )
        }
    }?;

    writer.flush()?;
    Ok(())
}
