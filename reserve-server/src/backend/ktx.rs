//! KTX adapter.
//!
//! Korail splits unpaid holds and paid tickets into two lists with two
//! identifier schemes. [`KtxItem`] carries whichever one a booking is, so
//! the right carrier operation is chosen by type.

use std::sync::Arc;

use async_trait::async_trait;

use crate::carrier::{
    KTX_TRAIN_TYPE, KorailApi, KorailError, KorailReservation, KorailSearch, KorailTicket,
    KorailTrain, ReserveOption,
};
use crate::domain::{
    Booking, BookingKind, CardDetails, Passengers, SearchCriteria, SeatAvailability, SeatClass,
    TrainRecord, TrainType,
};

use super::{Backend, BackendError, SoldOutPhrases};

const AVAILABLE_LABEL: &str = "예약가능";
const SOLD_OUT_LABEL: &str = "매진";

/// A Korail booking: an unpaid hold or a paid ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KtxItem {
    Hold(KorailReservation),
    Ticket(KorailTicket),
}

fn seat(available: bool) -> SeatAvailability {
    let label = if available { AVAILABLE_LABEL } else { SOLD_OUT_LABEL };
    SeatAvailability::new(available, label)
}

pub fn ktx_train_record(train: &KorailTrain) -> TrainRecord {
    TrainRecord {
        train_type: TrainType::Ktx,
        train_name: train.train_type_name.clone(),
        train_number: train.train_no.clone(),
        dep_station_name: train.dep_name.clone(),
        arr_station_name: train.arr_name.clone(),
        dep_date: train.dep_date.clone(),
        dep_time: train.dep_time.clone(),
        arr_time: train.arr_time.clone(),
        general: seat(train.has_general_seat()),
        special: seat(train.has_special_seat()),
    }
}

pub fn ktx_booking(item: &KtxItem) -> Booking {
    match item {
        KtxItem::Hold(r) => Booking {
            train_type: TrainType::Ktx,
            pnr_no: r.rsv_id.clone(),
            kind: BookingKind::Hold,
            train_name: r.train_type_name.clone(),
            train_number: r.train_no.clone(),
            dep_station_name: r.dep_name.clone(),
            arr_station_name: r.arr_name.clone(),
            dep_date: r.dep_date.clone(),
            dep_time: r.dep_time.clone(),
            arr_time: r.arr_time.clone(),
            seat_count: r.seat_no_count,
            total_cost: r.price,
            payment_deadline: (!r.buy_limit_date.is_empty())
                .then(|| (r.buy_limit_date.clone(), r.buy_limit_time.clone())),
        },
        KtxItem::Ticket(t) => Booking {
            train_type: TrainType::Ktx,
            pnr_no: t.pnr_no.clone(),
            kind: BookingKind::Ticket,
            train_name: t.train_type_name.clone(),
            train_number: t.train_no.clone(),
            dep_station_name: t.dep_name.clone(),
            arr_station_name: t.arr_name.clone(),
            dep_date: t.dep_date.clone(),
            dep_time: t.dep_time.clone(),
            arr_time: t.arr_time.clone(),
            seat_count: t.seat_no_count,
            total_cost: t.price,
            payment_deadline: None,
        },
    }
}

/// [`Backend`] over a Korail client, restricted to KTX services.
pub struct KtxAdapter {
    api: Arc<dyn KorailApi>,
    phrases: SoldOutPhrases,
}

impl KtxAdapter {
    pub fn new(api: Arc<dyn KorailApi>, phrases: SoldOutPhrases) -> Self {
        Self { api, phrases }
    }

    fn classify(&self, err: KorailError) -> BackendError {
        let nominal = match err {
            KorailError::SoldOut(message) => BackendError::SoldOut(message),
            KorailError::Login(message) => BackendError::Auth(message),
            KorailError::NeedToLogin => BackendError::Auth("KTX 로그인이 필요합니다.".to_string()),
            KorailError::NoResults(message) => BackendError::Backend(message),
            KorailError::Korail { message, .. } => BackendError::Backend(message),
            KorailError::Transport(e) => BackendError::Backend(e.to_string()),
        };
        self.phrases.apply(nominal)
    }
}

#[async_trait]
impl Backend for KtxAdapter {
    type Train = KorailTrain;
    type Item = KtxItem;

    fn train_type(&self) -> TrainType {
        TrainType::Ktx
    }

    fn train_record(&self, train: &KorailTrain) -> TrainRecord {
        ktx_train_record(train)
    }

    fn booking(&self, item: &KtxItem) -> Booking {
        ktx_booking(item)
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<KorailTrain>, BackendError> {
        let query = KorailSearch {
            dep: criteria.departure.clone(),
            arr: criteria.arrival.clone(),
            date: criteria.date.compact(),
            time: criteria.time.compact(),
            train_type: KTX_TRAIN_TYPE.to_string(),
            include_no_seats: true,
        };
        match self.api.search_train(&query).await {
            Ok(trains) => Ok(trains),
            Err(KorailError::NoResults(message)) => {
                tracing::info!(%message, "KTX search matched no schedules");
                Ok(Vec::new())
            }
            Err(e) => Err(self.classify(e)),
        }
    }

    async fn reserve(
        &self,
        train: &KorailTrain,
        passengers: &Passengers,
        seat_class: SeatClass,
    ) -> Result<KtxItem, BackendError> {
        let option = match seat_class {
            SeatClass::General => ReserveOption::GeneralOnly,
            SeatClass::Special => ReserveOption::SpecialOnly,
        };
        self.api
            .reserve(train, passengers, option)
            .await
            .map(KtxItem::Hold)
            .map_err(|e| self.classify(e))
    }

    /// Paid tickets first, then unpaid holds.
    async fn list_bookings(&self) -> Result<Vec<KtxItem>, BackendError> {
        let tickets = self.api.tickets().await.map_err(|e| self.classify(e))?;
        let holds = self.api.reservations().await.map_err(|e| self.classify(e))?;
        Ok(tickets
            .into_iter()
            .map(KtxItem::Ticket)
            .chain(holds.into_iter().map(KtxItem::Hold))
            .collect())
    }

    async fn cancel(&self, item: &KtxItem) -> Result<(), BackendError> {
        match item {
            KtxItem::Hold(r) => self.api.cancel(r).await.map_err(|e| self.classify(e)),
            KtxItem::Ticket(_) => Err(BackendError::Validation(
                "결제 완료된 승차권은 취소할 수 없습니다. 환불을 요청하세요.".to_string(),
            )),
        }
    }

    async fn refund(&self, item: &KtxItem) -> Result<(), BackendError> {
        match item {
            KtxItem::Ticket(t) => self.api.refund(t).await.map_err(|e| self.classify(e)),
            KtxItem::Hold(_) => Err(BackendError::Validation(
                "결제되지 않은 예약은 환불할 수 없습니다. 취소를 요청하세요.".to_string(),
            )),
        }
    }

    async fn pay(&self, item: &KtxItem, card: &CardDetails) -> Result<(), BackendError> {
        match item {
            KtxItem::Hold(r) => self
                .api
                .pay_with_card(r, card)
                .await
                .map_err(|e| self.classify(e)),
            KtxItem::Ticket(_) => Err(BackendError::Validation("이미 결제된 예약입니다.".to_string())),
        }
    }
}
