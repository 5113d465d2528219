//! Reservation orchestration.
//!
//! Every operation is one independent run against live carrier data:
//! validate input, pick the carrier once, then drive a generic flow over
//! the [`Backend`] contract. Nothing is cached between requests and
//! nothing here retries or sleeps; a sold-out attempt comes back as
//! [`Outcome::Retryable`] for the caller to schedule.
//!
//! Reserve flow: search → match → reserve → notify.
//! Cancel and pay flow: list bookings → match by confirmation number →
//! act on the matched item.

use std::sync::Arc;

use crate::backend::{Backend, KtxAdapter, SoldOutPhrases, SrtAdapter};
use crate::carrier::{Carriers, Credentials, Login};
use crate::domain::{
    Booking, BookingKind, CardDetails, DepartureTime, DomainError, Passengers, SearchCriteria,
    SeatClass, TrainKey, TrainRecord, TrainType, TravelDate,
};
use crate::matcher::{MatchError, find_booking, find_train};
use crate::notify::{Notifier, PushMessage};
use crate::outcome::{Outcome, ValidationFailure};

const TRAIN_NOT_FOUND: &str = "선택한 열차를 찾을 수 없습니다.";
const TRAIN_AMBIGUOUS: &str = "같은 번호의 열차가 여러 편 조회되었습니다. 출발 시각을 함께 지정하세요.";
const CANCEL_FIELDS_MISSING: &str = "취소 요청에 필요한 정보가 누락되었습니다.";
const PAY_FIELDS_MISSING: &str = "결제 요청에 필요한 정보가 누락되었습니다.";

/// Operator accounts and per-carrier sold-out phrases.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub srt_credentials: Option<Credentials>,
    pub ktx_credentials: Option<Credentials>,
    pub srt_phrases: SoldOutPhrases,
    pub ktx_phrases: SoldOutPhrases,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            srt_credentials: None,
            ktx_credentials: None,
            srt_phrases: SoldOutPhrases::srt_default(),
            ktx_phrases: SoldOutPhrases::korail_default(),
        }
    }
}

impl ServiceConfig {
    pub fn with_credentials(mut self, train_type: TrainType, credentials: Option<Credentials>) -> Self {
        match train_type {
            TrainType::Srt => self.srt_credentials = credentials,
            TrainType::Ktx => self.ktx_credentials = credentials,
        }
        self
    }

    pub fn with_phrases(mut self, train_type: TrainType, phrases: SoldOutPhrases) -> Self {
        match train_type {
            TrainType::Srt => self.srt_phrases = phrases,
            TrainType::Ktx => self.ktx_phrases = phrases,
        }
        self
    }

    pub fn credentials(&self, train_type: TrainType) -> Option<&Credentials> {
        match train_type {
            TrainType::Srt => self.srt_credentials.as_ref(),
            TrainType::Ktx => self.ktx_credentials.as_ref(),
        }
    }

    pub fn is_configured(&self, train_type: TrainType) -> bool {
        self.credentials(train_type).is_some()
    }
}

/// Raw schedule search input.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub train_type: Option<String>,
    pub dep: Option<String>,
    pub arr: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub adults: Option<String>,
}

impl SearchInput {
    pub fn validate(&self) -> Result<SearchCriteria, DomainError> {
        let train_type = required(&self.train_type, "type")?;
        let dep = required(&self.dep, "dep")?;
        let arr = required(&self.arr, "arr")?;
        let date = required(&self.date, "date")?;
        let time = required(&self.time, "time")?;

        Ok(SearchCriteria {
            train_type: TrainType::parse(train_type)?,
            departure: dep.to_string(),
            arrival: arr.to_string(),
            date: TravelDate::parse(date)?,
            time: DepartureTime::parse(time)?,
            seat_class: SeatClass::default(),
            passengers: Passengers::parse_adults(self.adults.as_deref())?,
        })
    }
}

/// Raw reservation attempt input.
#[derive(Debug, Clone, Default)]
pub struct ReserveInput {
    pub train_type: Option<String>,
    pub dep: Option<String>,
    pub arr: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub train_number: Option<String>,
    /// Departure time of the selected train, narrows the match when given
    pub dep_time: Option<String>,
    pub adults: Option<String>,
    pub seat_type: Option<String>,
}

/// A validated reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveRequest {
    pub criteria: SearchCriteria,
    pub key: TrainKey,
}

impl ReserveInput {
    /// Required fields are checked before any of them is parsed, so a
    /// missing field is always reported as missing.
    pub fn validate(&self) -> Result<ReserveRequest, DomainError> {
        let dep = required(&self.dep, "dep")?;
        let arr = required(&self.arr, "arr")?;
        let date = required(&self.date, "date")?;
        let time = required(&self.time, "time")?;
        let train_number = required(&self.train_number, "train_number")?;
        let seat_type = required(&self.seat_type, "seat_type")?;
        let train_type = required(&self.train_type, "type")?;

        let criteria = SearchCriteria {
            train_type: TrainType::parse(train_type)?,
            departure: dep.to_string(),
            arrival: arr.to_string(),
            date: TravelDate::parse(date)?,
            time: DepartureTime::parse(time)?,
            seat_class: SeatClass::parse(seat_type)?,
            passengers: Passengers::parse_adults(self.adults.as_deref())?,
        };

        let mut key = TrainKey::new(train_number);
        if let Some(dep_time) = present(&self.dep_time) {
            key = key.with_departure_time(DepartureTime::parse(dep_time)?.compact());
        }

        Ok(ReserveRequest { criteria, key })
    }
}

/// Raw cancel or refund input.
#[derive(Debug, Clone, Default)]
pub struct CancelInput {
    pub train_type: Option<String>,
    pub pnr_no: Option<String>,
    /// True to refund a paid ticket, false to cancel an unpaid hold
    pub is_ticket: bool,
}

/// Raw card payment input.
#[derive(Debug, Clone, Default)]
pub struct PayInput {
    pub train_type: Option<String>,
    pub pnr_no: Option<String>,
    pub card_number: Option<String>,
    pub card_password: Option<String>,
    /// Birth date (YYMMDD) or business registration number
    pub card_birthday: Option<String>,
    pub card_expire_date: Option<String>,
}

impl PayInput {
    fn card(&self) -> Option<CardDetails> {
        Some(CardDetails {
            number: present(&self.card_number)?.to_string(),
            password: present(&self.card_password)?.to_string(),
            validation_number: present(&self.card_birthday)?.to_string(),
            expire_date: present(&self.card_expire_date)?.to_string(),
        })
    }
}

/// Bookings or the failure message for one carrier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierListing {
    pub bookings: Vec<Booking>,
    pub error: Option<String>,
}

/// Bookings across carriers. A failing carrier never hides the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingReport {
    pub srt: CarrierListing,
    pub ktx: CarrierListing,
}

/// Drives search, reserve, list, cancel and pay against the carriers.
#[derive(Clone)]
pub struct ReservationService {
    carriers: Arc<dyn Carriers>,
    config: Arc<ServiceConfig>,
    notifier: Notifier,
}

impl ReservationService {
    pub fn new(carriers: Arc<dyn Carriers>, config: ServiceConfig, notifier: Notifier) -> Self {
        Self {
            carriers,
            config: Arc::new(config),
            notifier,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Live schedule search, sold-out trains included.
    ///
    /// Searching needs no account, so this never logs in.
    pub async fn search(&self, criteria: &SearchCriteria) -> Outcome<Vec<TrainRecord>> {
        let t = criteria.train_type;
        match t {
            TrainType::Srt => match self.srt(&Login::ReadOnly) {
                Ok(backend) => search_with(&backend, criteria).await,
                Err(outcome) => outcome,
            },
            TrainType::Ktx => match self.ktx(&Login::ReadOnly) {
                Ok(backend) => search_with(&backend, criteria).await,
                Err(outcome) => outcome,
            },
        }
    }

    /// One reservation attempt.
    pub async fn reserve(&self, input: &ReserveInput) -> Outcome {
        let request = match input.validate() {
            Ok(request) => request,
            Err(e) => return e.into(),
        };
        let t = request.criteria.train_type;
        let login = match self.account(t) {
            Ok(login) => login,
            Err(failure) => return Outcome::Validation(failure),
        };

        match t {
            TrainType::Srt => match self.srt(&login) {
                Ok(backend) => self.attempt(&backend, &request).await,
                Err(outcome) => outcome,
            },
            TrainType::Ktx => match self.ktx(&login) {
                Ok(backend) => self.attempt(&backend, &request).await,
                Err(outcome) => outcome,
            },
        }
    }

    /// Bookings on both carriers, or only on `only`.
    ///
    /// Carriers are queried one after the other. An unconfigured or
    /// failing carrier reports its error in its own listing.
    pub async fn list_bookings(&self, only: Option<TrainType>) -> BookingReport {
        let mut report = BookingReport::default();
        for t in TrainType::ALL {
            if only.is_some_and(|o| o != t) {
                continue;
            }
            let listing = match self.list_one(t).await {
                Outcome::Success(bookings) => CarrierListing {
                    bookings,
                    error: None,
                },
                failure => CarrierListing {
                    bookings: Vec::new(),
                    error: failure_message(failure),
                },
            };
            match t {
                TrainType::Srt => report.srt = listing,
                TrainType::Ktx => report.ktx = listing,
            }
        }
        report
    }

    /// Cancel a hold, or refund a ticket when `is_ticket` is set.
    pub async fn cancel(&self, input: &CancelInput) -> Outcome<String> {
        let (Some(train_type), Some(pnr_no)) = (present(&input.train_type), present(&input.pnr_no)) else {
            return Outcome::invalid(CANCEL_FIELDS_MISSING);
        };
        let t = match TrainType::parse(train_type) {
            Ok(t) => t,
            Err(e) => return e.into(),
        };
        let login = match self.account(t) {
            Ok(login) => login,
            Err(failure) => return Outcome::Validation(failure),
        };

        match t {
            TrainType::Srt => match self.srt(&login) {
                Ok(backend) => cancel_with(&backend, pnr_no, input.is_ticket).await,
                Err(outcome) => outcome,
            },
            TrainType::Ktx => match self.ktx(&login) {
                Ok(backend) => cancel_with(&backend, pnr_no, input.is_ticket).await,
                Err(outcome) => outcome,
            },
        }
    }

    /// Pay for an unpaid hold by card.
    pub async fn pay(&self, input: &PayInput) -> Outcome<String> {
        let (Some(train_type), Some(pnr_no), Some(card)) =
            (present(&input.train_type), present(&input.pnr_no), input.card())
        else {
            return Outcome::invalid(PAY_FIELDS_MISSING);
        };
        let t = match TrainType::parse(train_type) {
            Ok(t) => t,
            Err(e) => return e.into(),
        };
        let login = match self.account(t) {
            Ok(login) => login,
            Err(failure) => return Outcome::Validation(failure),
        };

        match t {
            TrainType::Srt => match self.srt(&login) {
                Ok(backend) => pay_with(&backend, pnr_no, &card).await,
                Err(outcome) => outcome,
            },
            TrainType::Ktx => match self.ktx(&login) {
                Ok(backend) => pay_with(&backend, pnr_no, &card).await,
                Err(outcome) => outcome,
            },
        }
    }

    async fn list_one(&self, t: TrainType) -> Outcome<Vec<Booking>> {
        let login = match self.account(t) {
            Ok(login) => login,
            Err(failure) => return Outcome::Validation(failure),
        };
        match t {
            TrainType::Srt => match self.srt(&login) {
                Ok(backend) => list_with(&backend).await,
                Err(outcome) => outcome,
            },
            TrainType::Ktx => match self.ktx(&login) {
                Ok(backend) => list_with(&backend).await,
                Err(outcome) => outcome,
            },
        }
    }

    async fn attempt<B: Backend>(&self, backend: &B, request: &ReserveRequest) -> Outcome {
        let t = backend.train_type();
        let trains = match backend.search(&request.criteria).await {
            Ok(trains) => trains,
            Err(e) => return Outcome::from_backend(t, e),
        };

        let train = match find_train(&trains, &request.key, |tr| backend.train_record(tr)) {
            Ok(train) => train,
            Err(MatchError::NotFound) => {
                tracing::info!(train_type = %t, train = %request.key, "selected train not in live results");
                return Outcome::not_found(TRAIN_NOT_FOUND);
            }
            Err(MatchError::Ambiguous(n)) => {
                tracing::info!(train_type = %t, train = %request.key, matches = n, "train key is ambiguous");
                return Outcome::invalid(TRAIN_AMBIGUOUS);
            }
        };
        let record = backend.train_record(train);

        let item = match backend
            .reserve(train, &request.criteria.passengers, request.criteria.seat_class)
            .await
        {
            Ok(item) => item,
            Err(e) => return Outcome::from_backend(t, e),
        };
        let booking = backend.booking(&item);
        tracing::info!(
            train_type = %t,
            train_number = %record.train_number,
            pnr_no = %booking.pnr_no,
            seat_class = %request.criteria.seat_class,
            "reservation succeeded"
        );

        self.notifier.notify_detached(PushMessage::reservation_success(
            &record.dep_station_name,
            &record.arr_station_name,
        ));

        Outcome::Success(booking)
    }

    fn account(&self, t: TrainType) -> Result<Login, ValidationFailure> {
        match self.config.credentials(t) {
            Some(credentials) => Ok(Login::Account(credentials.clone())),
            None => Err(ValidationFailure::Unconfigured(format!(
                "{t} 로그인 정보가 서버에 설정되지 않았습니다."
            ))),
        }
    }

    fn srt<T>(&self, login: &Login) -> Result<SrtAdapter, Outcome<T>> {
        let api = self.carriers.srt(login).map_err(|e| client_failure(TrainType::Srt, e))?;
        Ok(SrtAdapter::new(api, self.config.srt_phrases.clone()))
    }

    fn ktx<T>(&self, login: &Login) -> Result<KtxAdapter, Outcome<T>> {
        let api = self.carriers.korail(login).map_err(|e| client_failure(TrainType::Ktx, e))?;
        Ok(KtxAdapter::new(api, self.config.ktx_phrases.clone()))
    }
}

async fn search_with<B: Backend>(backend: &B, criteria: &SearchCriteria) -> Outcome<Vec<TrainRecord>> {
    match backend.search(criteria).await {
        Ok(trains) => Outcome::Success(trains.iter().map(|t| backend.train_record(t)).collect()),
        Err(e) => Outcome::from_backend(backend.train_type(), e),
    }
}

async fn list_with<B: Backend>(backend: &B) -> Outcome<Vec<Booking>> {
    match backend.list_bookings().await {
        Ok(items) => Outcome::Success(items.iter().map(|i| backend.booking(i)).collect()),
        Err(e) => Outcome::from_backend(backend.train_type(), e),
    }
}

async fn cancel_with<B: Backend>(backend: &B, pnr_no: &str, is_ticket: bool) -> Outcome<String> {
    let t = backend.train_type();
    let items = match backend.list_bookings().await {
        Ok(items) => items,
        Err(e) => return Outcome::from_backend(t, e),
    };
    let kind = if is_ticket {
        BookingKind::Ticket
    } else {
        BookingKind::Hold
    };

    let item = match find_booking(&items, pnr_no, Some(kind), |i| backend.booking(i)) {
        Ok(item) => item,
        Err(MatchError::NotFound) => {
            return Outcome::not_found(format!("취소할 {t} 예매 내역을 찾을 수 없습니다."));
        }
        Err(MatchError::Ambiguous(_)) => {
            return Outcome::invalid(format!("{t} 예매({pnr_no})를 하나로 특정할 수 없습니다."));
        }
    };

    let result = if is_ticket {
        backend.refund(item).await
    } else {
        backend.cancel(item).await
    };
    match result {
        Ok(()) => {
            tracing::info!(train_type = %t, %pnr_no, is_ticket, "booking cancelled");
            Outcome::Success(format!("{t} 예매({pnr_no})가 정상적으로 취소(환불)되었습니다."))
        }
        Err(e) => Outcome::from_backend(t, e),
    }
}

async fn pay_with<B: Backend>(backend: &B, pnr_no: &str, card: &CardDetails) -> Outcome<String> {
    let t = backend.train_type();
    let items = match backend.list_bookings().await {
        Ok(items) => items,
        Err(e) => return Outcome::from_backend(t, e),
    };

    let item = match find_booking(&items, pnr_no, Some(BookingKind::Hold), |i| backend.booking(i)) {
        Ok(item) => item,
        Err(MatchError::NotFound) => {
            return Outcome::not_found(format!("결제할 {t} 예매 내역을 찾을 수 없습니다."));
        }
        Err(MatchError::Ambiguous(_)) => {
            return Outcome::invalid(format!("{t} 예매({pnr_no})를 하나로 특정할 수 없습니다."));
        }
    };

    match backend.pay(item, card).await {
        Ok(()) => {
            tracing::info!(train_type = %t, %pnr_no, "booking paid");
            Outcome::Success(format!("{t} 예매({pnr_no})가 정상적으로 결제되었습니다."))
        }
        Err(e) => Outcome::from_backend(t, e),
    }
}

fn client_failure<T>(t: TrainType, err: crate::carrier::BridgeError) -> Outcome<T> {
    tracing::error!(train_type = %t, error = %err, "could not build carrier client");
    Outcome::Fatal(err.to_string())
}

/// The caller-facing message of a non-success outcome.
fn failure_message<T>(outcome: Outcome<T>) -> Option<String> {
    match outcome {
        Outcome::Success(_) => None,
        Outcome::Retryable { message, .. } => Some(message),
        Outcome::AuthFailure(m) | Outcome::Fatal(m) => Some(m),
        Outcome::Validation(v) => Some(v.message().to_string()),
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, DomainError> {
    present(field).ok_or(DomainError::MissingField(name))
}
