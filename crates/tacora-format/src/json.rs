//! JSON output format.

use std::io::Write;

use serde::Serialize;
use tacora_types::Record;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    /// Only honoured by the array style and by [`JsonFormatter::write_columnar`].
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    /// Writes a whole payload, such as a columnar response, followed by a
    /// newline.
    ///
    /// Compact output keeps the payload's own key order byte for byte.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_columnar<T: Serialize + ?Sized, W: Write>(
        &self,
        payload: &T,
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, payload)?;
        } else {
            serde_json::to_writer(&mut writer, payload)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_records<R: Record, W: Write + Send>(
        &self,
        records: &[R],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => self.write_columnar(records, writer)?,
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use tacora_types::Candle;

    fn create_test_candle() -> Candle {
        let timestamp = Utc.with_ymd_and_hms(2023, 11, 10, 15, 30, 0).unwrap();
        Candle::new(timestamp, 183.78, 183.93, 183.76, 183.8716).with_volume(147185)
    }

    #[test]
    fn test_json_array() {
        let formatter = JsonFormatter::new();
        let candles = vec![create_test_candle()];
        let mut output = Cursor::new(Vec::new());

        formatter.write_records(&candles, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with('['));
        assert!(result.contains("\"c\":183.8716"));
        assert!(result.ends_with("]\n"));
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let candles = vec![create_test_candle(), create_test_candle()];
        let mut output = Cursor::new(Vec::new());

        formatter.write_records(&candles, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("{\"t\":1699630200"));
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_json() {
        let formatter = JsonFormatter::new().with_pretty(true);
        let candles = vec![create_test_candle()];
        let mut output = Cursor::new(Vec::new());

        formatter.write_records(&candles, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains('\n'));
        assert!(result.contains("  "));
    }

    #[test]
    fn test_write_columnar_compact() {
        let mut payload = BTreeMap::new();
        payload.insert("c", vec![1.5, 2.0]);
        payload.insert("o", vec![1.0, 1.5]);
        let mut output = Cursor::new(Vec::new());

        JsonFormatter::new()
            .write_columnar(&payload, &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(result, "{\"c\":[1.5,2.0],\"o\":[1.0,1.5]}\n");
    }
}
