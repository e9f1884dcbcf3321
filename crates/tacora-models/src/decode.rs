//! JSON decoding with mandatory validation.

use std::io::Read;
use std::sync::Arc;

use tacora_types::{Result, TacoraError};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::response::Response;

/// Decodes payloads into validated responses.
///
/// Every failure, whether malformed JSON, a non-`ok` status, an unresolvable
/// schema or a failed check, is reported to the configured sink with the
/// payload's text before the error is returned.
#[derive(Debug, Clone)]
pub struct Decoder {
    sink: Arc<dyn DiagnosticSink>,
}

impl Decoder {
    /// Creates a decoder that logs rejected payloads through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Decodes and validates a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, the status is not `ok`, or
    /// the response fails validation.
    pub fn decode<R: Response>(&self, payload: &str) -> Result<R> {
        let wire = serde_json::from_str::<R::Wire>(payload)
            .map_err(TacoraError::from)
            .inspect_err(|err| self.sink.report(R::FAMILY, payload, err))?;
        self.accept(wire)
    }

    /// Decodes and validates JSON bytes.
    ///
    /// Invalid UTF-8 is rejected rather than replaced; the sink receives a
    /// lossy rendering of the bytes.
    ///
    /// # Errors
    ///
    /// See [`Decoder::decode`].
    pub fn decode_slice<R: Response>(&self, payload: &[u8]) -> Result<R> {
        let wire = serde_json::from_slice::<R::Wire>(payload)
            .map_err(TacoraError::from)
            .inspect_err(|err| {
                self.sink
                    .report(R::FAMILY, &String::from_utf8_lossy(payload), err);
            })?;
        self.accept(wire)
    }

    /// Reads a whole payload from `reader`, then decodes and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, or see [`Decoder::decode`].
    pub fn decode_reader<R: Response, S: Read>(&self, mut reader: S) -> Result<R> {
        let mut payload = String::new();
        reader.read_to_string(&mut payload)?;
        self.decode(&payload)
    }

    /// Converts an already-deserialized wire payload and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire payload is rejected or validation fails.
    pub fn accept<R: Response>(&self, wire: R::Wire) -> Result<R> {
        let response = R::from_wire(wire).map_err(|rejected| {
            self.sink
                .report(R::FAMILY, &format!("{:?}", rejected.wire), &rejected.error);
            rejected.error
        })?;
        if let Err(err) = response.validate() {
            self.sink.report(R::FAMILY, &response.to_string(), &err);
            return Err(err);
        }
        Ok(response)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes and validates a JSON string, logging rejections through `tracing`.
///
/// # Errors
///
/// See [`Decoder::decode`].
pub fn from_json<R: Response>(payload: &str) -> Result<R> {
    Decoder::new().decode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemorySink, NullSink};
    use crate::bulk_candles::BulkCandlesResponse;
    use crate::stock_candles::StockCandlesResponse;
    use std::io::Cursor;

    const VALID: &str = r#"{"s":"ok","t":[1,2],"o":[1.0,2.0],"h":[1.5,2.5],"l":[0.5,1.5],"c":[1.2,2.2],"v":[10,20]}"#;

    fn decoder_with_memory() -> (Decoder, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Decoder::new().with_sink(sink.clone()), sink)
    }

    #[test]
    fn test_decode_valid_reports_nothing() {
        let (decoder, sink) = decoder_with_memory();
        let response: StockCandlesResponse = decoder.decode(VALID).unwrap();

        assert_eq!(response.to_json().unwrap(), VALID);
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn test_decode_malformed_json_reports_payload() {
        let (decoder, sink) = decoder_with_memory();
        let result = decoder.decode::<StockCandlesResponse>(r#"{"s":"ok","t":[1,"#);

        assert!(matches!(result, Err(TacoraError::Json(_))));
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].family, "stock candles");
        assert_eq!(reports[0].raw, r#"{"s":"ok","t":[1,"#);
    }

    #[test]
    fn test_decode_invalid_reports_text_form() {
        let (decoder, sink) = decoder_with_memory();
        let payload = r#"{"s":"ok","t":[2,1],"o":[1,1],"h":[1,1],"l":[1,1],"c":[1,1],"v":[1,1]}"#;
        let result = decoder.decode::<StockCandlesResponse>(payload);

        assert!(matches!(
            result,
            Err(TacoraError::NotAscending { column: "t", index: 1 })
        ));
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].raw.starts_with("stock candles {\"s\":\"ok\",\"t\":[2,1]"));
        assert!(reports[0].message.contains("not ascending"));
    }

    #[test]
    fn test_decode_status_error_reports_wire() {
        let (decoder, sink) = decoder_with_memory();
        let result =
            decoder.decode::<StockCandlesResponse>(r#"{"s":"error","errmsg":"Invalid token"}"#);

        assert!(matches!(result, Err(TacoraError::Status { .. })));
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].raw.contains("Invalid token"));
    }

    #[test]
    fn test_decode_with_null_sink() {
        let decoder = Decoder::new().with_sink(Arc::new(NullSink));
        assert!(decoder.decode::<StockCandlesResponse>("[]").is_err());
    }

    #[test]
    fn test_decode_reader() {
        let (decoder, sink) = decoder_with_memory();
        let response: StockCandlesResponse = decoder.decode_reader(Cursor::new(VALID)).unwrap();

        assert_eq!(response.ohlc.len(), 2);
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn test_decode_slice_ignores_unknown_keys() {
        let payload = br#"{"s":"ok","nextTime":5,"t":[1],"o":[1],"h":[1],"l":[1],"c":[1],"v":[1]}"#;
        let response: StockCandlesResponse = Decoder::new().decode_slice(payload).unwrap();
        assert_eq!(response.volume, vec![1]);
    }

    #[test]
    fn test_decode_slice_rejects_invalid_utf8() {
        let (decoder, sink) = decoder_with_memory();
        let mut payload = br#"{"s":"ok","symbol":["AB"#.to_vec();
        payload.push(0xff);
        payload.extend_from_slice(br#""],"t":[1],"o":[1],"h":[1],"l":[1],"c":[1],"v":[1]}"#);

        let result = decoder.decode_slice::<BulkCandlesResponse>(&payload);

        assert!(matches!(result, Err(TacoraError::Json(_))));
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].family, "bulk stock candles");
    }

    #[test]
    fn test_plain_serde_validates() {
        let payload = r#"{"s":"ok","t":[1],"o":[1],"h":[1],"l":[1],"c":[1],"v":[]}"#;
        assert!(serde_json::from_str::<StockCandlesResponse>(payload).is_err());
    }
}
