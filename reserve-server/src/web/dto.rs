//! Data transfer objects for web requests and responses.
//!
//! Request fields are all optional strings; presence and format are
//! checked by the reservation service so every entry point reports
//! missing input the same way. Response shapes are built explicitly
//! from canonical records.

use serde::{Deserialize, Serialize};

use crate::domain::{Booking, TrainRecord, display_hhmm};
use crate::reserve::{BookingReport, CancelInput, PayInput, ReserveInput, SearchInput};

/// A scalar that forms send as text and JSON clients may send typed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }

    /// `true` (any case), or a non-zero number.
    pub fn is_true(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => *n != 0,
            Scalar::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

fn text(value: Option<Scalar>) -> Option<String> {
    value.map(Scalar::into_text)
}

/// Query for `GET /api/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub train_type: Option<String>,
    pub dep: Option<String>,
    pub arr: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`
    pub time: Option<String>,
    pub adults: Option<String>,
}

impl SearchQuery {
    pub fn to_input(&self) -> SearchInput {
        SearchInput {
            train_type: self.train_type.clone(),
            dep: self.dep.clone(),
            arr: self.arr.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            adults: self.adults.clone(),
        }
    }
}

/// Body for `POST /api/reserve` and `POST /api/auto-retry`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReserveForm {
    #[serde(rename = "type")]
    pub train_type: Option<String>,
    pub dep: Option<String>,
    pub arr: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub train_number: Option<Scalar>,
    /// Departure time of the selected train, `HHMMSS` or `HH:MM`
    pub dep_time: Option<String>,
    pub adults: Option<Scalar>,
    pub seat_type: Option<String>,
}

impl From<ReserveForm> for ReserveInput {
    fn from(form: ReserveForm) -> Self {
        ReserveInput {
            train_type: form.train_type,
            dep: form.dep,
            arr: form.arr,
            date: form.date,
            time: form.time,
            train_number: text(form.train_number),
            dep_time: form.dep_time,
            adults: text(form.adults),
            seat_type: form.seat_type,
        }
    }
}

/// Body for `POST /api/cancel`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelForm {
    pub train_type: Option<String>,
    pub pnr_no: Option<Scalar>,
    pub is_ticket: Option<Scalar>,
}

impl From<CancelForm> for CancelInput {
    fn from(form: CancelForm) -> Self {
        CancelInput {
            train_type: form.train_type,
            pnr_no: text(form.pnr_no),
            is_ticket: form.is_ticket.is_some_and(|s| s.is_true()),
        }
    }
}

/// Body for `POST /api/pay`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayForm {
    pub train_type: Option<String>,
    pub pnr_no: Option<Scalar>,
    pub card_number: Option<Scalar>,
    pub card_password: Option<Scalar>,
    pub card_birthday: Option<Scalar>,
    pub card_expire_date: Option<Scalar>,
}

impl From<PayForm> for PayInput {
    fn from(form: PayForm) -> Self {
        PayInput {
            train_type: form.train_type,
            pnr_no: text(form.pnr_no),
            card_number: text(form.card_number),
            card_password: text(form.card_password),
            card_birthday: text(form.card_birthday),
            card_expire_date: text(form.card_expire_date),
        }
    }
}

/// Query for `GET /api/reservations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationsQuery {
    #[serde(rename = "type")]
    pub train_type: Option<String>,
}

/// A train in search results.
#[derive(Debug, Clone, Serialize)]
pub struct TrainResult {
    pub train_type: String,
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
    pub seat_available: bool,
    pub general_seat_available: bool,
    pub special_seat_available: bool,
    pub general_seat_state: String,
    pub special_seat_state: String,
    /// One-line human-readable summary
    pub dump: String,
}

impl TrainResult {
    pub fn from_record(record: &TrainRecord) -> Self {
        Self {
            train_type: record.train_type.to_string(),
            train_name: record.train_name.clone(),
            train_number: record.train_number.clone(),
            dep_station_name: record.dep_station_name.clone(),
            arr_station_name: record.arr_station_name.clone(),
            dep_date: record.dep_date.clone(),
            dep_time: record.dep_time.clone(),
            arr_time: record.arr_time.clone(),
            seat_available: record.seat_available(),
            general_seat_available: record.general.available,
            special_seat_available: record.special.available,
            general_seat_state: record.general.label.clone(),
            special_seat_state: record.special.label.clone(),
            dump: record.to_string(),
        }
    }
}

/// A reservation or ticket.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResult {
    pub train_type: String,
    pub pnr_no: String,
    pub is_ticket: bool,
    pub train_number: String,
    pub train_name: String,
    pub dep_station_name: String,
    pub arr_station_name: String,
    pub dep_date: String,
    pub dep_time: String,
    pub arr_time: String,
    pub seat_count: u32,
    pub total_cost: u32,
    pub paid: bool,
    /// Payment deadline date, unpaid holds only
    pub payment_date: Option<String>,
    /// Payment deadline time, `HH:MM`
    pub payment_time: Option<String>,
    pub dump: String,
}

impl BookingResult {
    pub fn from_booking(booking: &Booking) -> Self {
        let (payment_date, payment_time) = match &booking.payment_deadline {
            Some((date, time)) => (Some(date.clone()), Some(display_hhmm(time))),
            None => (None, None),
        };
        Self {
            train_type: booking.train_type.to_string(),
            pnr_no: booking.pnr_no.clone(),
            is_ticket: booking.is_ticket(),
            train_number: booking.train_number.clone(),
            train_name: booking.train_name.clone(),
            dep_station_name: booking.dep_station_name.clone(),
            arr_station_name: booking.arr_station_name.clone(),
            dep_date: booking.dep_date.clone(),
            dep_time: booking.dep_time.clone(),
            arr_time: booking.arr_time.clone(),
            seat_count: booking.seat_count,
            total_cost: booking.total_cost,
            paid: booking.is_ticket(),
            payment_date,
            payment_time,
            dump: booking.to_string(),
        }
    }
}

/// Response for schedule search. Echoes the query.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub trains: Vec<TrainResult>,
    pub dep: Option<String>,
    pub arr: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub train_type: Option<String>,
    pub adults: Option<String>,
}

impl SearchResponse {
    pub fn new(query: &SearchQuery, trains: &[TrainRecord]) -> Self {
        Self {
            trains: trains.iter().map(TrainResult::from_record).collect(),
            dep: query.dep.clone(),
            arr: query.arr.clone(),
            date: query.date.clone(),
            time: query.time.clone(),
            train_type: query.train_type.clone(),
            adults: query.adults.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub reservation: BookingResult,
}

/// Sold-out answer to a reservation attempt.
#[derive(Debug, Serialize)]
pub struct RetryResponse {
    pub retry: bool,
    pub message: String,
    pub retry_after_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ReservationsResponse {
    pub srt_reservations: Vec<BookingResult>,
    pub ktx_reservations: Vec<BookingResult>,
    pub srt_error: Option<String>,
    pub ktx_error: Option<String>,
}

impl ReservationsResponse {
    pub fn from_report(report: &BookingReport) -> Self {
        Self {
            srt_reservations: report.srt.bookings.iter().map(BookingResult::from_booking).collect(),
            ktx_reservations: report.ktx.bookings.iter().map(BookingResult::from_booking).collect(),
            srt_error: report.srt.error.clone(),
            ktx_error: report.ktx.error.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
}

/// Error body for every endpoint except search.
#[derive(Debug, Serialize)]
pub struct ErrorMessageResponse {
    pub error_message: String,
}

/// Error body for search.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
