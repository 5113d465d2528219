//! Search and passenger specifications.

use serde::Serialize;

use super::{DepartureTime, DomainError, SeatClass, TrainType, TravelDate};

/// Largest party a single reservation may hold.
pub const MAX_PASSENGERS: u8 = 9;

/// Passenger category. Only adults are booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassengerCategory {
    Adult,
}

/// A group of passengers of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Passengers {
    pub category: PassengerCategory,
    pub count: u8,
}

impl Passengers {
    /// Adults only, between 1 and [`MAX_PASSENGERS`].
    pub fn adults(count: u8) -> Result<Self, DomainError> {
        if count == 0 || count > MAX_PASSENGERS {
            return Err(DomainError::InvalidPassengerCount(count.to_string()));
        }
        Ok(Self {
            category: PassengerCategory::Adult,
            count,
        })
    }

    /// Parse a client-supplied count; blank means one adult.
    pub fn parse_adults(s: Option<&str>) -> Result<Self, DomainError> {
        match s.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::adults(1),
            Some(raw) => {
                let count = raw
                    .parse::<u8>()
                    .map_err(|_| DomainError::InvalidPassengerCount(raw.to_string()))?;
                Self::adults(count)
            }
        }
    }
}

/// Everything needed to run one schedule search and reserve from it.
///
/// Built per request from client input and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub train_type: TrainType,
    /// Carrier-specific station name, e.g. "수서"
    pub departure: String,
    pub arrival: String,
    pub date: TravelDate,
    pub time: DepartureTime,
    pub seat_class: SeatClass,
    pub passengers: Passengers,
}
