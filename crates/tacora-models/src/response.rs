//! The decoded-response abstraction shared by every data family.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tacora_types::{Result, TacoraError};

/// A wire payload that could not be turned into a typed response.
///
/// The payload is handed back so it can be reported before it is dropped.
#[derive(Debug)]
pub struct Rejected<W> {
    /// Why the payload was rejected.
    pub error: TacoraError,
    /// The payload as it was received.
    pub wire: W,
}

impl<W> Rejected<W> {
    pub(crate) const fn new(error: TacoraError, wire: W) -> Self {
        Self { error, wire }
    }
}

/// A typed response decoded from the service's JSON.
///
/// Decoding happens in two steps: the payload is deserialized into
/// [`Response::Wire`], which mirrors the JSON keys, then converted into the
/// typed response, which is validated before it is handed out. Encoding goes
/// through [`Serialize`] with a fixed key order.
pub trait Response: Serialize + fmt::Display + Sized {
    /// Raw deserialization target mirroring the wire keys.
    type Wire: DeserializeOwned + fmt::Debug;

    /// Human-readable family name used in diagnostics.
    const FAMILY: &'static str;

    /// Converts a wire payload into the typed response.
    ///
    /// # Errors
    ///
    /// Returns the payload together with the reason if the status is not `ok`
    /// or the optional columns match no schema version.
    fn from_wire(wire: Self::Wire) -> std::result::Result<Self, Rejected<Self::Wire>>;

    /// Checks every invariant of the response.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    fn validate(&self) -> Result<()>;

    /// Returns true if [`Response::validate`] succeeds.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Encodes the response as compact JSON with `"s":"ok"` first.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Rejects payloads whose `s` field is anything but `ok`.
pub(crate) fn check_status(status: Option<&str>, message: Option<&str>) -> Result<()> {
    match status {
        None | Some("ok") => Ok(()),
        Some(other) => Err(TacoraError::Status {
            status: other.to_string(),
            message: message.unwrap_or_default().to_string(),
        }),
    }
}

/// Writes `FAMILY {json}`, the textual form used by `Display` and diagnostics.
pub(crate) fn write_text<R: Response>(response: &R, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let json = serde_json::to_string(response).map_err(|_| fmt::Error)?;
    write!(f, "{} {json}", R::FAMILY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_ok() {
        assert!(check_status(Some("ok"), None).is_ok());
        assert!(check_status(None, None).is_ok());
    }

    #[test]
    fn test_check_status_error() {
        let err = check_status(Some("error"), Some("Invalid token")).unwrap_err();
        assert_eq!(err.to_string(), "API returned status error: Invalid token");
    }

    #[test]
    fn test_check_status_no_data() {
        assert!(matches!(
            check_status(Some("no_data"), None),
            Err(TacoraError::Status { ref status, ref message }) if status == "no_data" && message.is_empty()
        ));
    }
}
