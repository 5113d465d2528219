//! Korail (KTX) carrier client.
//!
//! Korail keeps unpaid holds and paid tickets in separate lists with
//! separate identifiers: holds carry `rsv_id`, tickets carry `pnr_no`.

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::domain::{CardDetails, Passengers};

use super::Login;
use super::bridge::{Bridge, BridgeConfig, BridgeError, FaultKind};

/// Korail seat code meaning "seats remain".
const SEAT_AVAILABLE_CODE: &str = "11";

/// Korail train group code for KTX services.
pub const KTX_TRAIN_TYPE: &str = "100";

/// A schedule row from Korail's search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KorailTrain {
    /// Train group code, "100" for KTX
    pub train_type: String,
    /// e.g. "KTX", "KTX-산천"
    pub train_type_name: String,
    pub train_group: String,
    pub train_no: String,
    pub dep_name: String,
    pub dep_code: String,
    pub dep_date: String,
    pub dep_time: String,
    pub arr_name: String,
    pub arr_code: String,
    pub arr_date: String,
    pub arr_time: String,
    pub run_date: String,
    /// "11" when general seats remain, "13" when sold out
    pub general_seat: String,
    pub special_seat: String,
}

impl KorailTrain {
    pub fn has_general_seat(&self) -> bool {
        self.general_seat == SEAT_AVAILABLE_CODE
    }

    pub fn has_special_seat(&self) -> bool {
        self.special_seat == SEAT_AVAILABLE_CODE
    }
}

/// An unpaid hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KorailReservation {
    pub rsv_id: String,
    pub journey_no: String,
    pub journey_cnt: String,
    pub rsv_chg_no: String,
    pub train_type_name: String,
    pub train_no: String,
    pub dep_name: String,
    pub dep_date: String,
    pub dep_time: String,
    pub arr_name: String,
    pub arr_time: String,
    pub seat_no_count: u32,
    pub price: u32,
    /// Payment deadline, `YYYYMMDD`
    pub buy_limit_date: String,
    /// Payment deadline, `HHMMSS`
    pub buy_limit_time: String,
}

/// A paid, issued ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KorailTicket {
    pub pnr_no: String,
    pub sale_info1: String,
    pub sale_info2: String,
    pub sale_info3: String,
    pub sale_info4: String,
    pub train_type_name: String,
    pub train_no: String,
    pub dep_name: String,
    pub dep_date: String,
    pub dep_time: String,
    pub arr_name: String,
    pub arr_time: String,
    pub car_no: String,
    pub seat_no: String,
    pub seat_no_count: u32,
    pub price: u32,
}

/// Seat class restriction for a reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReserveOption {
    GeneralOnly,
    SpecialOnly,
}

/// Schedule search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KorailSearch {
    pub dep: String,
    pub arr: String,
    /// `YYYYMMDD`
    pub date: String,
    /// `HHMMSS`
    pub time: String,
    pub train_type: String,
    /// When false Korail drops sold-out trains from the result
    pub include_no_seats: bool,
}

/// Errors reported by the Korail client.
#[derive(Debug, thiserror::Error)]
pub enum KorailError {
    /// Credentials rejected at login
    #[error("login failed: {0}")]
    Login(String),

    /// Session missing or expired (P058)
    #[error("need to login")]
    NeedToLogin,

    /// No seats left for the requested class
    #[error("Sold out: {0}")]
    SoldOut(String),

    /// Search matched no schedules
    #[error("no results: {0}")]
    NoResults(String),

    /// Any other Korail message
    #[error("{message} ({code})")]
    Korail { code: String, message: String },

    #[error(transparent)]
    Transport(BridgeError),
}

impl From<BridgeError> for KorailError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Fault(fault) => match fault.kind {
                FaultKind::Login => KorailError::Login(fault.message),
                FaultKind::NeedLogin => KorailError::NeedToLogin,
                FaultKind::SoldOut => KorailError::SoldOut(fault.message),
                FaultKind::NoResults => KorailError::NoResults(fault.message),
                FaultKind::Response | FaultKind::Other => KorailError::Korail {
                    code: fault.code,
                    message: fault.message,
                },
            },
            other => KorailError::Transport(other),
        }
    }
}

/// The operations the service needs from Korail.
#[async_trait]
pub trait KorailApi: Send + Sync {
    async fn search_train(&self, query: &KorailSearch) -> Result<Vec<KorailTrain>, KorailError>;

    async fn reserve(
        &self,
        train: &KorailTrain,
        passengers: &Passengers,
        option: ReserveOption,
    ) -> Result<KorailReservation, KorailError>;

    /// Unpaid holds.
    async fn reservations(&self) -> Result<Vec<KorailReservation>, KorailError>;

    /// Paid tickets.
    async fn tickets(&self) -> Result<Vec<KorailTicket>, KorailError>;

    async fn cancel(&self, reservation: &KorailReservation) -> Result<(), KorailError>;

    async fn refund(&self, ticket: &KorailTicket) -> Result<(), KorailError>;

    async fn pay_with_card(
        &self,
        reservation: &KorailReservation,
        card: &CardDetails,
    ) -> Result<(), KorailError>;
}

#[derive(Serialize)]
struct ReserveBody<'a> {
    train: &'a KorailTrain,
    passengers: [&'a Passengers; 1],
    option: ReserveOption,
}

#[derive(Serialize)]
struct ReservationBody<'a> {
    reservation: &'a KorailReservation,
}

#[derive(Serialize)]
struct TicketBody<'a> {
    ticket: &'a KorailTicket,
}

#[derive(Serialize)]
struct PayBody<'a> {
    reservation: &'a KorailReservation,
    card_number: &'a str,
    card_password: &'a str,
    birthday: &'a str,
    card_expire: &'a str,
}

/// Korail client speaking to the Korail bridge.
#[derive(Debug, Clone)]
pub struct HttpKorailClient {
    bridge: Bridge,
}

impl HttpKorailClient {
    pub fn new(config: &BridgeConfig, login: &Login) -> Result<Self, BridgeError> {
        Ok(Self {
            bridge: Bridge::new(config, login)?,
        })
    }
}

#[async_trait]
impl KorailApi for HttpKorailClient {
    async fn search_train(&self, query: &KorailSearch) -> Result<Vec<KorailTrain>, KorailError> {
        Ok(self.bridge.call("search", query).await?)
    }

    async fn reserve(
        &self,
        train: &KorailTrain,
        passengers: &Passengers,
        option: ReserveOption,
    ) -> Result<KorailReservation, KorailError> {
        let body = ReserveBody {
            train,
            passengers: [passengers],
            option,
        };
        Ok(self.bridge.call("reserve", &body).await?)
    }

    async fn reservations(&self) -> Result<Vec<KorailReservation>, KorailError> {
        Ok(self.bridge.call("reservations", &serde_json::json!({})).await?)
    }

    async fn tickets(&self) -> Result<Vec<KorailTicket>, KorailError> {
        Ok(self.bridge.call("tickets", &serde_json::json!({})).await?)
    }

    async fn cancel(&self, reservation: &KorailReservation) -> Result<(), KorailError> {
        let _: IgnoredAny = self
            .bridge
            .call("cancel", &ReservationBody { reservation })
            .await?;
        Ok(())
    }

    async fn refund(&self, ticket: &KorailTicket) -> Result<(), KorailError> {
        let _: IgnoredAny = self.bridge.call("refund", &TicketBody { ticket }).await?;
        Ok(())
    }

    async fn pay_with_card(
        &self,
        reservation: &KorailReservation,
        card: &CardDetails,
    ) -> Result<(), KorailError> {
        let body = PayBody {
            reservation,
            card_number: &card.number,
            card_password: &card.password,
            birthday: &card.validation_number,
            card_expire: &card.expire_date,
        };
        let _: IgnoredAny = self.bridge.call("pay", &body).await?;
        Ok(())
    }
}
