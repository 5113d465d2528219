//! Canonical train schedule records.
//!
//! Both carriers' schedule rows are mapped into [`TrainRecord`] at the
//! adapter boundary. A record is only valid within the search response that
//! produced it; reserving always re-searches and re-matches by [`TrainKey`].

use std::fmt;

use super::time::{display_hhmm, display_month_day};
use super::TrainType;

/// Identity of a scheduled train within one search context.
///
/// Route and date are implicit in the search that produced the record.
/// The departure time is optional on the client side: when the client
/// supplies it, it must match too.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrainKey {
    pub train_number: String,
    /// Departure time as `HHMMSS`
    pub departure_time: Option<String>,
}

impl TrainKey {
    pub fn new(train_number: impl Into<String>) -> Self {
        Self {
            train_number: train_number.into(),
            departure_time: None,
        }
    }

    pub fn with_departure_time(mut self, hhmmss: impl Into<String>) -> Self {
        self.departure_time = Some(hhmmss.into());
        self
    }

    /// Exact identity comparison against a live record.
    ///
    /// Leading zeros are significant; carriers never reuse a number with a
    /// different padding inside one search result.
    pub fn matches(&self, record: &TrainRecord) -> bool {
        record.train_number == self.train_number
            && self
                .departure_time
                .as_ref()
                .is_none_or(|t| *t == record.dep_time)
    }
}

impl fmt::Display for TrainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.departure_time {
            Some(t) => write!(f, "{} ({})", self.train_number, display_hhmm(t)),
            None => f.write_str(&self.train_number),
        }
    }
}

/// Seat availability for one class, as the carrier reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAvailability {
    pub available: bool,
    /// Carrier status label, e.g. "예약가능" or "매진"
    pub label: String,
}

impl SeatAvailability {
    pub fn new(available: bool, label: impl Into<String>) -> Self {
        Self {
            available,
            label: label.into(),
        }
    }
}

/// A schedule row in carrier-neutral form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRecord {
    pub train_type: TrainType,
    /// Service name, e.g. "SRT" or "KTX-산천"
    pub train_name: String,
    pub train_number: String,
    pub dep_station_name: String,
    pub arr_station_name: String,
    /// `YYYYMMDD`
    pub dep_date: String,
    /// `HHMMSS`
    pub dep_time: String,
    /// `HHMMSS`
    pub arr_time: String,
    pub general: SeatAvailability,
    pub special: SeatAvailability,
}

impl TrainRecord {
    /// Whether any seat class can be booked right now.
    pub fn seat_available(&self) -> bool {
        self.general.available || self.special.available
    }
}

impl fmt::Display for TrainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] {}, {}~{}({}~{}) 특실 {}, 일반실 {}",
            self.train_name,
            self.train_number,
            display_month_day(&self.dep_date),
            self.dep_station_name,
            self.arr_station_name,
            display_hhmm(&self.dep_time),
            display_hhmm(&self.arr_time),
            self.special.label,
            self.general.label,
        )
    }
}
