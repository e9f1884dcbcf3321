//! Display and market-calendar time zone.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::{DateRange, Result, TacoraError};

/// Zone used when nothing else is configured.
pub const DEFAULT_ZONE: &str = "America/New_York";

/// Local hour at which option expirations settle.
pub const MARKET_CLOSE_HOUR: u32 = 16;

/// The time zone used to render timestamps and to anchor local calendar dates.
///
/// Timestamps are always stored in UTC; the zone only matters when a date has
/// to be shown to a person or when a bare `YYYY-MM-DD` must become an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone {
    tz: Tz,
}

impl DisplayZone {
    /// Looks up a zone by IANA name.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::UnknownTimeZone`] if the name is not in the tz database.
    pub fn new(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(|tz| Self { tz })
            .map_err(|_| TacoraError::UnknownTimeZone(name.to_string()))
    }

    /// Looks up a zone by name, falling back to UTC when it is unknown.
    #[must_use]
    pub fn or_utc(name: &str) -> Self {
        Self::new(name).unwrap_or_else(|err| {
            warn!(zone = name, %err, "falling back to UTC");
            Self::utc()
        })
    }

    /// The UTC zone.
    #[must_use]
    pub const fn utc() -> Self {
        Self { tz: chrono_tz::UTC }
    }

    /// Reads the zone from the `TZ` environment variable, or the default zone
    /// if it is unset.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var("TZ") {
            Ok(name) if !name.is_empty() => Self::or_utc(&name),
            _ => Self::default(),
        }
    }

    /// Returns the underlying tz database entry.
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.tz
    }

    /// Returns the IANA name of the zone.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Formats an instant in this zone.
    ///
    /// Instants at local midnight are shown as a bare date.
    #[must_use]
    pub fn format(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.tz);
        if local.time() == NaiveTime::MIN {
            local.format("%Y-%m-%d").to_string()
        } else {
            local.format("%Y-%m-%d %H:%M:%S %Z").to_string()
        }
    }

    /// Returns the instant of a local wall-clock time on `date`.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant.
    ///
    /// # Errors
    ///
    /// Returns [`TacoraError::NonexistentLocalTime`] for times skipped by a DST
    /// transition or invalid hour/minute values.
    pub fn at_local(&self, date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
        let naive = date.and_hms_opt(hour, minute, 0).ok_or_else(|| {
            TacoraError::NonexistentLocalTime(format!("{date} {hour:02}:{minute:02}"))
        })?;
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| TacoraError::NonexistentLocalTime(naive.to_string()))
    }

    /// Returns the market close (16:00 local) on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if 16:00 does not exist on that date in this zone.
    pub fn market_close(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        self.at_local(date, MARKET_CLOSE_HOUR, 0)
    }

    /// Returns the range from local midnight on `start` to the last second of
    /// `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn day_range(&self, start: NaiveDate, end: NaiveDate) -> Result<DateRange> {
        let first = self.at_local(start, 0, 0)?;
        let last = self.at_local(end, 23, 59)? + TimeDelta::seconds(59);
        Ok(DateRange::new(first, last)?)
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self {
            tz: chrono_tz::America::New_York,
        }
    }
}

impl std::fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zone() {
        assert_eq!(DisplayZone::default().name(), DEFAULT_ZONE);
        assert_eq!(DisplayZone::new(DEFAULT_ZONE).unwrap(), DisplayZone::default());
    }

    #[test]
    fn test_unknown_zone() {
        assert!(matches!(
            DisplayZone::new("Mars/Olympus_Mons"),
            Err(TacoraError::UnknownTimeZone(_))
        ));
        assert_eq!(DisplayZone::or_utc("Mars/Olympus_Mons"), DisplayZone::utc());
    }

    #[test]
    fn test_format_intraday() {
        let at = Utc.with_ymd_and_hms(2023, 11, 10, 15, 30, 0).unwrap();
        assert_eq!(DisplayZone::default().format(at), "2023-11-10 10:30:00 EST");
        assert_eq!(DisplayZone::utc().format(at), "2023-11-10 15:30:00 UTC");
    }

    #[test]
    fn test_format_midnight_is_date_only() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 5, 0, 0).unwrap();
        assert_eq!(DisplayZone::default().format(at), "2024-01-02");
    }

    #[test]
    fn test_market_close_follows_dst() {
        let zone = DisplayZone::default();
        let winter = NaiveDate::from_ymd_opt(2024, 1, 19).unwrap();
        let summer = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();

        assert_eq!(
            zone.market_close(winter).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 19, 21, 0, 0).unwrap()
        );
        assert_eq!(
            zone.market_close(summer).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 19, 20, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_nonexistent_local_time() {
        let zone = DisplayZone::default();
        let spring_forward = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(matches!(
            zone.at_local(spring_forward, 2, 30),
            Err(TacoraError::NonexistentLocalTime(_))
        ));
    }

    #[test]
    fn test_day_range() {
        let zone = DisplayZone::utc();
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let range = zone.day_range(day, day).unwrap();

        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 59).unwrap());
    }
}
