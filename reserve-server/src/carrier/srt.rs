//! SRT carrier client.
//!
//! Records here mirror the SRT booking system's own shapes and names.
//! Nothing outside the SRT adapter should see them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::IgnoredAny;

use crate::domain::{CardDetails, Passengers};

use super::bridge::{Bridge, BridgeConfig, BridgeError, FaultKind};
use super::Login;

/// Seat status label SRT uses for a bookable class.
const AVAILABLE_LABEL: &str = "예약가능";

/// A schedule row from SRT's search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtTrain {
    pub train_code: String,
    pub train_name: String,
    pub train_number: String,
    pub dep_date: String,
    pub dep_time: String,
    pub dep_station_code: String,
    pub dep_station_name: String,
    pub arr_date: String,
    pub arr_time: String,
    pub arr_station_code: String,
    pub arr_station_name: String,
    /// e.g. "예약가능", "매진", "입석+좌석"
    pub general_seat_state: String,
    pub special_seat_state: String,
}

impl SrtTrain {
    pub fn general_seat_available(&self) -> bool {
        self.general_seat_state.contains(AVAILABLE_LABEL)
    }

    pub fn special_seat_available(&self) -> bool {
        self.special_seat_state.contains(AVAILABLE_LABEL)
    }

}

/// A reservation as SRT lists it. Paid and unpaid share one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtReservation {
    pub reservation_number: String,
    pub total_cost: u32,
    pub seat_count: u32,
    pub train_code: String,
    pub train_name: String,
    pub train_number: String,
    pub dep_date: String,
    pub dep_time: String,
    pub dep_station_name: String,
    pub arr_time: String,
    pub arr_station_name: String,
    /// Payment deadline date, `YYYYMMDD`
    pub payment_date: String,
    /// Payment deadline time, `HHMMSS`
    pub payment_time: String,
    pub paid: bool,
}

/// Seat class restriction for a reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SrtSeatType {
    GeneralOnly,
    SpecialOnly,
}

/// Schedule search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrtSearch {
    pub dep: String,
    pub arr: String,
    /// `YYYYMMDD`
    pub date: String,
    /// `HHMMSS`
    pub time: String,
    /// When true SRT drops sold-out trains from the result
    pub available_only: bool,
}

/// Errors reported by the SRT client.
#[derive(Debug, thiserror::Error)]
pub enum SrtError {
    /// Credentials rejected at login
    #[error("login failed: {0}")]
    Login(String),

    /// Operation needs an authenticated session
    #[error("not logged in")]
    NotLoggedIn,

    /// Search matched no schedules
    #[error("no results: {0}")]
    NoResults(String),

    /// No seats left for the requested class
    #[error("sold out: {0}")]
    SoldOut(String),

    /// Any other SRT response error
    #[error("{message}")]
    Response { code: String, message: String },

    #[error(transparent)]
    Transport(BridgeError),
}

impl From<BridgeError> for SrtError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Fault(fault) => match fault.kind {
                FaultKind::Login => SrtError::Login(fault.message),
                FaultKind::NeedLogin => SrtError::NotLoggedIn,
                FaultKind::NoResults => SrtError::NoResults(fault.message),
                FaultKind::SoldOut => SrtError::SoldOut(fault.message),
                FaultKind::Response | FaultKind::Other => {
                    SrtError::Response {
                        code: fault.code,
                        message: fault.message,
                    }
                }
            },
            other => SrtError::Transport(other),
        }
    }
}

/// The operations the service needs from SRT.
#[async_trait]
pub trait SrtApi: Send + Sync {
    async fn search_train(&self, query: &SrtSearch) -> Result<Vec<SrtTrain>, SrtError>;

    async fn reserve(
        &self,
        train: &SrtTrain,
        passengers: &Passengers,
        seat_type: SrtSeatType,
    ) -> Result<SrtReservation, SrtError>;

    /// Every reservation on the account, paid or not.
    async fn get_reservations(&self) -> Result<Vec<SrtReservation>, SrtError>;

    async fn cancel(&self, reservation: &SrtReservation) -> Result<(), SrtError>;

    async fn refund(&self, reservation: &SrtReservation) -> Result<(), SrtError>;

    async fn pay_with_card(
        &self,
        reservation: &SrtReservation,
        card: &CardDetails,
    ) -> Result<(), SrtError>;
}

#[derive(Serialize)]
struct ReserveBody<'a> {
    train: &'a SrtTrain,
    passengers: [&'a Passengers; 1],
    seat_type: SrtSeatType,
}

#[derive(Serialize)]
struct ReservationBody<'a> {
    reservation: &'a SrtReservation,
}

#[derive(Serialize)]
struct PayBody<'a> {
    reservation: &'a SrtReservation,
    number: &'a str,
    password: &'a str,
    validation_number: &'a str,
    expire_date: &'a str,
}

/// SRT client speaking to the SRT bridge.
#[derive(Debug, Clone)]
pub struct HttpSrtClient {
    bridge: Bridge,
}

impl HttpSrtClient {
    pub fn new(config: &BridgeConfig, login: &Login) -> Result<Self, BridgeError> {
        Ok(Self {
            bridge: Bridge::new(config, login)?,
        })
    }
}

#[async_trait]
impl SrtApi for HttpSrtClient {
    async fn search_train(&self, query: &SrtSearch) -> Result<Vec<SrtTrain>, SrtError> {
        Ok(self.bridge.call("search", query).await?)
    }

    async fn reserve(
        &self,
        train: &SrtTrain,
        passengers: &Passengers,
        seat_type: SrtSeatType,
    ) -> Result<SrtReservation, SrtError> {
        let body = ReserveBody {
            train,
            passengers: [passengers],
            seat_type,
        };
        Ok(self.bridge.call("reserve", &body).await?)
    }

    async fn get_reservations(&self) -> Result<Vec<SrtReservation>, SrtError> {
        Ok(self.bridge.call("reservations", &serde_json::json!({})).await?)
    }

    async fn cancel(&self, reservation: &SrtReservation) -> Result<(), SrtError> {
        let _: IgnoredAny = self
            .bridge
            .call("cancel", &ReservationBody { reservation })
            .await?;
        Ok(())
    }

    async fn refund(&self, reservation: &SrtReservation) -> Result<(), SrtError> {
        let _: IgnoredAny = self
            .bridge
            .call("refund", &ReservationBody { reservation })
            .await?;
        Ok(())
    }

    async fn pay_with_card(
        &self,
        reservation: &SrtReservation,
        card: &CardDetails,
    ) -> Result<(), SrtError> {
        let body = PayBody {
            reservation,
            number: &card.number,
            password: &card.password,
            validation_number: &card.validation_number,
            expire_date: &card.expire_date,
        };
        let _: IgnoredAny = self.bridge.call("pay", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::bridge::CarrierFault;

    fn fault(kind: FaultKind, message: &str) -> BridgeError {
        BridgeError::Fault(CarrierFault {
            kind,
            code: "E1".to_string(),
            message: message.to_string(),
        })
    }

    #[test]
    fn seat_state_labels() {
        let train = crate::carrier::fake::srt_train("301", "090000");
        assert!(train.general_seat_available());
        assert!(!train.special_seat_available());

        let sold_out = SrtTrain {
            general_seat_state: "매진".into(),
            ..train
        };
        assert!(!sold_out.general_seat_available());
    }

    #[test]
    fn faults_map_to_srt_errors() {
        assert!(matches!(
            SrtError::from(fault(FaultKind::Login, "bad password")),
            SrtError::Login(m) if m == "bad password"
        ));
        assert!(matches!(
            SrtError::from(fault(FaultKind::NoResults, "조회 결과가 없습니다")),
            SrtError::NoResults(_)
        ));
        assert!(matches!(
            SrtError::from(fault(FaultKind::SoldOut, "No seats remaining for this class")),
            SrtError::SoldOut(m) if m == "No seats remaining for this class"
        ));
        assert!(matches!(
            SrtError::from(fault(FaultKind::Response, "잔여석없음")),
            SrtError::Response { message, .. } if message == "잔여석없음"
        ));
        assert!(matches!(
            SrtError::from(BridgeError::Api { status: 500, message: "x".into() }),
            SrtError::Transport(_)
        ));
    }

    #[test]
    fn search_serializes_available_only() {
        let query = SrtSearch {
            dep: "수서".into(),
            arr: "부산".into(),
            date: "20250301".into(),
            time: "090000".into(),
            available_only: false,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["available_only"], false);
        assert_eq!(
            serde_json::to_value(SrtSeatType::SpecialOnly).unwrap(),
            "SPECIAL_ONLY"
        );
    }
}
