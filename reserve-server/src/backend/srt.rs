//! SRT adapter.

use std::sync::Arc;

use async_trait::async_trait;

use crate::carrier::{SrtApi, SrtError, SrtReservation, SrtSearch, SrtSeatType, SrtTrain};
use crate::domain::{
    Booking, BookingKind, CardDetails, Passengers, SearchCriteria, SeatAvailability, SeatClass,
    TrainRecord, TrainType,
};

use super::{Backend, BackendError, SoldOutPhrases};

pub fn srt_train_record(train: &SrtTrain) -> TrainRecord {
    TrainRecord {
        train_type: TrainType::Srt,
        train_name: train.train_name.clone(),
        train_number: train.train_number.clone(),
        dep_station_name: train.dep_station_name.clone(),
        arr_station_name: train.arr_station_name.clone(),
        dep_date: train.dep_date.clone(),
        dep_time: train.dep_time.clone(),
        arr_time: train.arr_time.clone(),
        general: SeatAvailability::new(train.general_seat_available(), &train.general_seat_state),
        special: SeatAvailability::new(train.special_seat_available(), &train.special_seat_state),
    }
}

pub fn srt_booking(reservation: &SrtReservation) -> Booking {
    let kind = if reservation.paid {
        BookingKind::Ticket
    } else {
        BookingKind::Hold
    };
    let payment_deadline = (!reservation.paid && !reservation.payment_date.is_empty())
        .then(|| (reservation.payment_date.clone(), reservation.payment_time.clone()));
    Booking {
        train_type: TrainType::Srt,
        pnr_no: reservation.reservation_number.clone(),
        kind,
        train_name: reservation.train_name.clone(),
        train_number: reservation.train_number.clone(),
        dep_station_name: reservation.dep_station_name.clone(),
        arr_station_name: reservation.arr_station_name.clone(),
        dep_date: reservation.dep_date.clone(),
        dep_time: reservation.dep_time.clone(),
        arr_time: reservation.arr_time.clone(),
        seat_count: reservation.seat_count,
        total_cost: reservation.total_cost,
        payment_deadline,
    }
}

/// [`Backend`] over an SRT client.
pub struct SrtAdapter {
    api: Arc<dyn SrtApi>,
    phrases: SoldOutPhrases,
}

impl SrtAdapter {
    pub fn new(api: Arc<dyn SrtApi>, phrases: SoldOutPhrases) -> Self {
        Self { api, phrases }
    }

    fn classify(&self, err: SrtError) -> BackendError {
        let nominal = match err {
            SrtError::Login(message) => BackendError::Auth(message),
            SrtError::NotLoggedIn => BackendError::Auth("SRT 로그인이 필요합니다.".to_string()),
            SrtError::SoldOut(message) => BackendError::SoldOut(message),
            SrtError::NoResults(message) => BackendError::Backend(message),
            SrtError::Response { message, .. } => BackendError::Backend(message),
            SrtError::Transport(e) => BackendError::Backend(e.to_string()),
        };
        self.phrases.apply(nominal)
    }
}

#[async_trait]
impl Backend for SrtAdapter {
    type Train = SrtTrain;
    type Item = SrtReservation;

    fn train_type(&self) -> TrainType {
        TrainType::Srt
    }

    fn train_record(&self, train: &SrtTrain) -> TrainRecord {
        srt_train_record(train)
    }

    fn booking(&self, item: &SrtReservation) -> Booking {
        srt_booking(item)
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<SrtTrain>, BackendError> {
        // Sold-out rows stay in: retry loops need to see them
        let query = SrtSearch {
            dep: criteria.departure.clone(),
            arr: criteria.arrival.clone(),
            date: criteria.date.compact(),
            time: criteria.time.compact(),
            available_only: false,
        };
        match self.api.search_train(&query).await {
            Ok(trains) => Ok(trains),
            Err(SrtError::NoResults(message)) => {
                tracing::info!(%message, "SRT search matched no schedules");
                Ok(Vec::new())
            }
            Err(e) => Err(self.classify(e)),
        }
    }

    async fn reserve(
        &self,
        train: &SrtTrain,
        passengers: &Passengers,
        seat_class: SeatClass,
    ) -> Result<SrtReservation, BackendError> {
        let seat_type = match seat_class {
            SeatClass::General => SrtSeatType::GeneralOnly,
            SeatClass::Special => SrtSeatType::SpecialOnly,
        };
        self.api
            .reserve(train, passengers, seat_type)
            .await
            .map_err(|e| self.classify(e))
    }

    async fn list_bookings(&self) -> Result<Vec<SrtReservation>, BackendError> {
        self.api
            .get_reservations()
            .await
            .map_err(|e| self.classify(e))
    }

    async fn cancel(&self, item: &SrtReservation) -> Result<(), BackendError> {
        if item.paid {
            return Err(BackendError::Validation(
                "결제 완료된 승차권은 취소할 수 없습니다. 환불을 요청하세요.".to_string(),
            ));
        }
        self.api.cancel(item).await.map_err(|e| self.classify(e))
    }

    async fn refund(&self, item: &SrtReservation) -> Result<(), BackendError> {
        if !item.paid {
            return Err(BackendError::Validation(
                "결제되지 않은 예약은 환불할 수 없습니다. 취소를 요청하세요.".to_string(),
            ));
        }
        self.api.refund(item).await.map_err(|e| self.classify(e))
    }

    async fn pay(&self, item: &SrtReservation, card: &CardDetails) -> Result<(), BackendError> {
        if item.paid {
            return Err(BackendError::Validation("이미 결제된 예약입니다.".to_string()));
        }
        self.api
            .pay_with_card(item, card)
            .await
            .map_err(|e| self.classify(e))
    }
}
