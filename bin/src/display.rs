//! Argument types and I/O helpers shared by the tacora commands.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::ValueEnum;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tacora_lib::prelude::*;

/// Data family of an input payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Family {
    StockCandles,
    FundCandles,
    IndexCandles,
    BulkCandles,
    StockQuotes,
    IndexQuotes,
    Earnings,
    MarketStatus,
    OptionStrikes,
    OptionExpirations,
    OptionLookup,
    OptionQuotes,
}

impl Family {
    /// Families with an ascending time column that can be pruned and combined.
    pub(crate) const fn is_time_candles(self) -> bool {
        matches!(
            self,
            Self::StockCandles | Self::FundCandles | Self::IndexCandles
        )
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}

/// Output format for unpacked data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Json,
    Ndjson,
    Text,
    /// The (possibly pruned) columnar payload itself.
    Raw,
}

impl Format {
    /// Record format, or `None` for raw columnar output.
    pub(crate) const fn output_format(self) -> Option<OutputFormat> {
        match self {
            Self::Json => Some(OutputFormat::Json),
            Self::Ndjson => Some(OutputFormat::Ndjson),
            Self::Text => Some(OutputFormat::Text),
            Self::Raw => None,
        }
    }
}

/// Reads a whole payload file.
pub(crate) fn read_payload(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Opens the output file, or stdout when no path is given.
pub(crate) fn output_writer(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Parses a `YYYY-MM-DD` date.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {value} (expected YYYY-MM-DD)"))
}

/// Builds the local-day range covering `from` through `to` in `zone`.
pub(crate) fn date_range(
    zone: &DisplayZone,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<DateRange>> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => {
            let range = zone.day_range(parse_date(from)?, parse_date(to)?)?;
            Ok(Some(range))
        }
        _ => bail!("--from and --to must be given together"),
    }
}

/// Decodes a payload, logging rejections through `tracing`.
pub(crate) fn decode<T: Response>(payload: &str) -> Result<T> {
    Decoder::new()
        .decode(payload)
        .with_context(|| format!("Invalid {} payload", T::FAMILY))
}

/// Writes records in one of the record formats.
pub(crate) fn write_records<R: Record, W: Write + Send>(
    records: &[R],
    format: OutputFormat,
    zone: &DisplayZone,
    pretty: bool,
    writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Json => JsonFormatter::new()
            .with_pretty(pretty)
            .write_records(records, writer)?,
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_records(records, writer)?,
        OutputFormat::Text => TextFormatter::new()
            .with_zone(*zone)
            .write_records(records, writer)?,
    }
    Ok(())
}

/// Writes a response in its columnar wire form.
pub(crate) fn write_raw<T: Response, W: Write>(response: &T, pretty: bool, writer: W) -> Result<()> {
    JsonFormatter::new()
        .with_pretty(pretty)
        .write_columnar(response, writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_payload() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"s":"ok"}}"#).unwrap();

        assert_eq!(read_payload(file.path()).unwrap(), r#"{"s":"ok"}"#);
    }

    #[test]
    fn test_read_missing_payload() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_payload(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_output_writer_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        {
            let mut writer = output_writer(Some(&path)).unwrap();
            writeln!(writer, "[]").unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert!(parse_date("01/02/2024").is_err());
    }

    #[test]
    fn test_date_range() {
        let zone = DisplayZone::utc();
        assert!(date_range(&zone, None, None).unwrap().is_none());

        let range = date_range(&zone, Some("2024-01-02"), Some("2024-01-03"))
            .unwrap()
            .unwrap();
        assert_eq!(range.start.to_rfc3339(), "2024-01-02T00:00:00+00:00");
        assert_eq!(range.end.to_rfc3339(), "2024-01-03T23:59:59+00:00");

        assert!(date_range(&zone, Some("2024-01-02"), None).is_err());
        assert!(date_range(&zone, Some("2024-01-03"), Some("2024-01-02")).is_err());
    }

    #[test]
    fn test_family_display() {
        assert_eq!(Family::StockCandles.to_string(), "stock-candles");
        assert_eq!(Family::OptionQuotes.to_string(), "option-quotes");
        assert!(Family::IndexCandles.is_time_candles());
        assert!(!Family::BulkCandles.is_time_candles());
    }

    #[test]
    fn test_raw_has_no_record_format() {
        assert_eq!(Format::Raw.output_format(), None);
        assert_eq!(Format::Text.output_format(), Some(OutputFormat::Text));
    }
}
