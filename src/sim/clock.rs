use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// A time zone name that is not in the IANA database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time zone \"{name}\": {reason}")]
pub struct UnknownZone {
    pub name: String,
    pub reason: String,
}

/// Wall clock of the microgrid site.
///
/// The simulation is a function of the site's local time of day. `SiteClock`
/// reads it from a time zone, or returns a fixed instant for reproducible runs.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use microgrid_sim::sim::clock::SiteClock;
///
/// let at = NaiveDate::from_ymd_opt(2026, 1, 10)
///     .unwrap()
///     .and_hms_opt(12, 0, 0)
///     .unwrap();
/// let clock = SiteClock::Fixed(at);
/// assert_eq!(clock.now(), at);
/// assert_eq!(clock.file_stamp(), "20260110_120000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SiteClock {
    /// Current time in the given zone.
    Zone(Tz),
    /// Always the same instant.
    Fixed(NaiveDateTime),
}

impl SiteClock {
    /// Parses an IANA zone name such as `Asia/Kolkata`.
    pub fn in_zone(name: &str) -> Result<Self, UnknownZone> {
        name.parse::<Tz>().map(Self::Zone).map_err(|e| UnknownZone {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Local date and time at the site.
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::Zone(tz) => Utc::now().with_timezone(tz).naive_local(),
            Self::Fixed(at) => *at,
        }
    }

    /// `YYYYMMDD_HHMMSS`, used in download file names.
    pub fn file_stamp(&self) -> String {
        self.now().format("%Y%m%d_%H%M%S").to_string()
    }
}
