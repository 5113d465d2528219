//! Carrier and seat class selectors.

use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// The carrier a request is addressed to.
///
/// Selects the backend adapter, the credential pair and the record mapping.
/// Branching on this value happens once, at adapter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrainType {
    /// SR Corporation's SRT service (Suseo lines)
    Srt,
    /// Korail's KTX service
    Ktx,
}

impl TrainType {
    /// Both carriers, in listing order.
    pub const ALL: [TrainType; 2] = [TrainType::Srt, TrainType::Ktx];

    /// Parse a train type, accepting any ASCII case.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SRT" => Ok(TrainType::Srt),
            "KTX" => Ok(TrainType::Ktx),
            _ => Err(DomainError::UnknownTrainType(s.to_string())),
        }
    }

    /// The wire name, `"SRT"` or `"KTX"`.
    pub fn as_str(self) -> &'static str {
        match self {
            TrainType::Srt => "SRT",
            TrainType::Ktx => "KTX",
        }
    }
}

impl fmt::Display for TrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Requested seat class. Reservations are made for this class only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeatClass {
    #[default]
    General,
    Special,
}

impl SeatClass {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GENERAL" => Ok(SeatClass::General),
            "SPECIAL" => Ok(SeatClass::Special),
            _ => Err(DomainError::UnknownSeatClass(s.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatClass::General => "GENERAL",
            SeatClass::Special => "SPECIAL",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_train_type() {
        assert_eq!(TrainType::parse("SRT").unwrap(), TrainType::Srt);
        assert_eq!(TrainType::parse("ktx").unwrap(), TrainType::Ktx);
        assert_eq!(TrainType::parse(" Ktx ").unwrap(), TrainType::Ktx);
        assert_eq!(
            TrainType::parse("ITX"),
            Err(DomainError::UnknownTrainType("ITX".into()))
        );
        assert!(TrainType::parse("").is_err());
    }

    #[test]
    fn train_type_display_roundtrip() {
        for t in TrainType::ALL {
            assert_eq!(t.to_string().parse::<TrainType>().unwrap(), t);
        }
    }

    #[test]
    fn parse_seat_class() {
        assert_eq!(SeatClass::parse("GENERAL").unwrap(), SeatClass::General);
        assert_eq!(SeatClass::parse("special").unwrap(), SeatClass::Special);
        assert!(SeatClass::parse("FIRST").is_err());
        assert_eq!(SeatClass::default(), SeatClass::General);
    }
}
