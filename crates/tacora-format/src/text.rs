//! Human-readable text output.

use std::io::Write;

use tacora_types::{DisplayZone, Record};

use crate::{FormatError, Formatter};

/// Writes one [`Record::describe`] line per record.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    zone: DisplayZone,
}

impl TextFormatter {
    /// Creates a formatter rendering times in the default zone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zone times are rendered in.
    #[must_use]
    pub const fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    /// Zone times are rendered in.
    #[must_use]
    pub const fn zone(&self) -> &DisplayZone {
        &self.zone
    }
}

impl Formatter for TextFormatter {
    fn write_records<R: Record, W: Write + Send>(
        &self,
        records: &[R],
        mut writer: W,
    ) -> Result<(), FormatError> {
        for record in records {
            writeln!(writer, "{}", record.describe(&self.zone))?;
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        "txt"
    }
}
