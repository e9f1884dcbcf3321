//! Row-oriented records produced by unpacking.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::DisplayZone;

/// One row of an unpacked response.
pub trait Record: Serialize {
    /// Renders the record as a single human-readable line in `zone`.
    fn describe(&self, zone: &DisplayZone) -> String;
}

impl Record for DateTime<Utc> {
    fn describe(&self, zone: &DisplayZone) -> String {
        zone.format(*self)
    }
}
