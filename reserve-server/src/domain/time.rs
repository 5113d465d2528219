//! Travel date and time handling.
//!
//! Clients send dates as `YYYY-MM-DD` and times as `HH:MM`; both carriers
//! expect compact `YYYYMMDD` and `HHMMSS` strings. These types parse either
//! form once and render the compact form on demand.

use chrono::{NaiveDate, NaiveTime, Timelike};
use std::fmt;

use super::DomainError;

/// A validated travel date.
///
/// # Examples
///
/// ```
/// use reserve_server::domain::TravelDate;
///
/// let date = TravelDate::parse("2025-03-01").unwrap();
/// assert_eq!(date.compact(), "20250301");
/// assert_eq!(TravelDate::parse("20250301").unwrap(), date);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TravelDate(NaiveDate);

impl TravelDate {
    /// Parse `YYYY-MM-DD` or `YYYYMMDD`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        let format = match s.len() {
            10 => "%Y-%m-%d",
            8 => "%Y%m%d",
            _ => return Err(DomainError::InvalidDate(s.to_string())),
        };
        NaiveDate::parse_from_str(s, format)
            .map(Self)
            .map_err(|_| DomainError::InvalidDate(s.to_string()))
    }

    /// The carrier wire form, `YYYYMMDD`.
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

impl fmt::Display for TravelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Earliest departure time for a schedule search.
///
/// Seconds are accepted but carriers only search on minute boundaries,
/// so they are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartureTime(NaiveTime);

impl DepartureTime {
    /// Parse `HH:MM`, `HH:MM:SS`, `HHMM` or `HHMMSS`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        let format = match s.len() {
            5 => "%H:%M",
            8 => "%H:%M:%S",
            4 => "%H%M",
            6 => "%H%M%S",
            _ => return Err(DomainError::InvalidTime(s.to_string())),
        };
        let time = NaiveTime::parse_from_str(s, format)
            .map_err(|_| DomainError::InvalidTime(s.to_string()))?;
        NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidTime(s.to_string()))
    }

    /// The carrier wire form, `HHMMSS`.
    pub fn compact(&self) -> String {
        self.0.format("%H%M%S").to_string()
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Render a carrier `HHMMSS` (or `HHMM`) string as `HH:MM`.
///
/// Malformed input is returned unchanged; carrier records are display-only
/// here and must not fail a whole listing.
pub fn display_hhmm(compact: &str) -> String {
    if compact.len() >= 4 && compact.is_char_boundary(4) && compact[..4].bytes().all(|b| b.is_ascii_digit()) {
        format!("{}:{}", &compact[..2], &compact[2..4])
    } else {
        compact.to_string()
    }
}

/// Render a carrier `YYYYMMDD` string as `MM월 DD일`.
pub fn display_month_day(compact: &str) -> String {
    if compact.len() == 8 && compact.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}월 {}일", &compact[4..6], &compact[6..8])
    } else {
        compact.to_string()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every valid calendar date survives dashed parse and compact render
        #[test]
        fn dashed_and_compact_agree(days in 0i64..3650) {
            let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let date = base + chrono::Duration::days(days);
            let dashed = TravelDate::parse(&date.format("%Y-%m-%d").to_string()).unwrap();
            let compact = TravelDate::parse(&date.format("%Y%m%d").to_string()).unwrap();
            prop_assert_eq!(dashed, compact);
            prop_assert_eq!(dashed.compact(), date.format("%Y%m%d").to_string());
        }

        /// HH:MM always renders to HHMM00
        #[test]
        fn time_compact_has_zero_seconds(h in 0u32..24, m in 0u32..60) {
            let parsed = DepartureTime::parse(&format!("{h:02}:{m:02}")).unwrap();
            prop_assert_eq!(parsed.compact(), format!("{h:02}{m:02}00"));
        }
    }
}
