//! In-memory carriers for tests.
//!
//! Serve scripted schedules and reservations, record every call, and fail
//! the next call of a given operation on demand.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{CardDetails, Passengers, TrainType};

use super::{
    BridgeError, Carriers, KTX_TRAIN_TYPE, KorailApi, KorailError, KorailReservation,
    KorailSearch, KorailTicket, KorailTrain, Login, ReserveOption, SrtApi, SrtError,
    SrtReservation, SrtSearch, SrtSeatType, SrtTrain,
};

pub fn srt_train(number: &str, dep_time: &str) -> SrtTrain {
    SrtTrain {
        train_code: "17".to_string(),
        train_name: "SRT".to_string(),
        train_number: number.to_string(),
        dep_date: "20250301".to_string(),
        dep_time: dep_time.to_string(),
        dep_station_code: "0551".to_string(),
        dep_station_name: "수서".to_string(),
        arr_date: "20250301".to_string(),
        arr_time: "113000".to_string(),
        arr_station_code: "0020".to_string(),
        arr_station_name: "부산".to_string(),
        general_seat_state: "예약가능".to_string(),
        special_seat_state: "매진".to_string(),
    }
}

pub fn srt_reservation(number: &str, paid: bool) -> SrtReservation {
    SrtReservation {
        reservation_number: number.to_string(),
        total_cost: 51900,
        seat_count: 1,
        train_code: "17".to_string(),
        train_name: "SRT".to_string(),
        train_number: "301".to_string(),
        dep_date: "20250301".to_string(),
        dep_time: "090000".to_string(),
        dep_station_name: "수서".to_string(),
        arr_time: "113000".to_string(),
        arr_station_name: "부산".to_string(),
        payment_date: if paid { String::new() } else { "20250228".to_string() },
        payment_time: if paid { String::new() } else { "235900".to_string() },
        paid,
    }
}

pub fn korail_train(number: &str, dep_time: &str) -> KorailTrain {
    KorailTrain {
        train_type: KTX_TRAIN_TYPE.to_string(),
        train_type_name: "KTX".to_string(),
        train_group: "100".to_string(),
        train_no: number.to_string(),
        dep_name: "서울".to_string(),
        dep_code: "0001".to_string(),
        dep_date: "20250301".to_string(),
        dep_time: dep_time.to_string(),
        arr_name: "부산".to_string(),
        arr_code: "0020".to_string(),
        arr_date: "20250301".to_string(),
        arr_time: "114000".to_string(),
        run_date: "20250301".to_string(),
        general_seat: "11".to_string(),
        special_seat: "13".to_string(),
    }
}

pub fn korail_reservation(rsv_id: &str) -> KorailReservation {
    KorailReservation {
        rsv_id: rsv_id.to_string(),
        journey_no: "0001".to_string(),
        journey_cnt: "01".to_string(),
        rsv_chg_no: "00000".to_string(),
        train_type_name: "KTX".to_string(),
        train_no: "101".to_string(),
        dep_name: "서울".to_string(),
        dep_date: "20250301".to_string(),
        dep_time: "080000".to_string(),
        arr_name: "부산".to_string(),
        arr_time: "114000".to_string(),
        seat_no_count: 1,
        price: 59800,
        buy_limit_date: "20250228".to_string(),
        buy_limit_time: "235900".to_string(),
    }
}

pub fn korail_ticket(pnr_no: &str) -> KorailTicket {
    KorailTicket {
        pnr_no: pnr_no.to_string(),
        sale_info1: "01234".to_string(),
        sale_info2: "5678".to_string(),
        sale_info3: "9012".to_string(),
        sale_info4: "34".to_string(),
        train_type_name: "KTX".to_string(),
        train_no: "103".to_string(),
        dep_name: "서울".to_string(),
        dep_date: "20250302".to_string(),
        dep_time: "100000".to_string(),
        arr_name: "부산".to_string(),
        arr_time: "134000".to_string(),
        car_no: "5".to_string(),
        seat_no: "7A".to_string(),
        seat_no_count: 1,
        price: 59800,
    }
}

/// Scripted SRT backend.
#[derive(Default)]
pub struct FakeSrt {
    pub trains: Mutex<Vec<SrtTrain>>,
    pub reservations: Mutex<Vec<SrtReservation>>,
    searches: Mutex<Vec<SrtSearch>>,
    calls: Mutex<Vec<&'static str>>,
    search_error: Mutex<Option<SrtError>>,
    reserve_error: Mutex<Option<SrtError>>,
    list_error: Mutex<Option<SrtError>>,
    action_error: Mutex<Option<SrtError>>,
}

impl FakeSrt {
    pub fn with_trains(trains: Vec<SrtTrain>) -> Self {
        Self {
            trains: Mutex::new(trains),
            ..Self::default()
        }
    }

    pub fn with_reservations(self, reservations: Vec<SrtReservation>) -> Self {
        *self.reservations.lock().unwrap() = reservations;
        self
    }

    pub fn fail_search(&self, err: SrtError) {
        *self.search_error.lock().unwrap() = Some(err);
    }

    pub fn fail_reserve(&self, err: SrtError) {
        *self.reserve_error.lock().unwrap() = Some(err);
    }

    pub fn fail_list(&self, err: SrtError) {
        *self.list_error.lock().unwrap() = Some(err);
    }

    /// Fail the next cancel, refund or pay.
    pub fn fail_action(&self, err: SrtError) {
        *self.action_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_search(&self) -> Option<SrtSearch> {
        self.searches.lock().unwrap().last().cloned()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn action(&self, call: &'static str) -> Result<(), SrtError> {
        self.record(call);
        match self.action_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SrtApi for FakeSrt {
    async fn search_train(&self, query: &SrtSearch) -> Result<Vec<SrtTrain>, SrtError> {
        self.record("search");
        self.searches.lock().unwrap().push(query.clone());
        if let Some(err) = self.search_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.trains.lock().unwrap().clone())
    }

    async fn reserve(
        &self,
        train: &SrtTrain,
        passengers: &Passengers,
        _seat_type: SrtSeatType,
    ) -> Result<SrtReservation, SrtError> {
        self.record("reserve");
        if let Some(err) = self.reserve_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut reservation = srt_reservation(&format!("R{}", train.train_number), false);
        reservation.train_number = train.train_number.clone();
        reservation.dep_time = train.dep_time.clone();
        reservation.seat_count = u32::from(passengers.count);
        self.reservations.lock().unwrap().push(reservation.clone());
        Ok(reservation)
    }

    async fn get_reservations(&self) -> Result<Vec<SrtReservation>, SrtError> {
        self.record("get_reservations");
        if let Some(err) = self.list_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn cancel(&self, _reservation: &SrtReservation) -> Result<(), SrtError> {
        self.action("cancel")
    }

    async fn refund(&self, _reservation: &SrtReservation) -> Result<(), SrtError> {
        self.action("refund")
    }

    async fn pay_with_card(
        &self,
        _reservation: &SrtReservation,
        _card: &CardDetails,
    ) -> Result<(), SrtError> {
        self.action("pay")
    }
}

/// Scripted Korail backend.
#[derive(Default)]
pub struct FakeKorail {
    pub trains: Mutex<Vec<KorailTrain>>,
    pub reservations: Mutex<Vec<KorailReservation>>,
    pub tickets: Mutex<Vec<KorailTicket>>,
    searches: Mutex<Vec<KorailSearch>>,
    calls: Mutex<Vec<&'static str>>,
    search_error: Mutex<Option<KorailError>>,
    reserve_error: Mutex<Option<KorailError>>,
    list_error: Mutex<Option<KorailError>>,
    action_error: Mutex<Option<KorailError>>,
}

impl FakeKorail {
    pub fn with_trains(trains: Vec<KorailTrain>) -> Self {
        Self {
            trains: Mutex::new(trains),
            ..Self::default()
        }
    }

    pub fn with_bookings(
        self,
        reservations: Vec<KorailReservation>,
        tickets: Vec<KorailTicket>,
    ) -> Self {
        *self.reservations.lock().unwrap() = reservations;
        *self.tickets.lock().unwrap() = tickets;
        self
    }

    pub fn fail_search(&self, err: KorailError) {
        *self.search_error.lock().unwrap() = Some(err);
    }

    pub fn fail_reserve(&self, err: KorailError) {
        *self.reserve_error.lock().unwrap() = Some(err);
    }

    /// Fail the next `tickets` or `reservations` call.
    pub fn fail_list(&self, err: KorailError) {
        *self.list_error.lock().unwrap() = Some(err);
    }

    pub fn fail_action(&self, err: KorailError) {
        *self.action_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_search(&self) -> Option<KorailSearch> {
        self.searches.lock().unwrap().last().cloned()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn action(&self, call: &'static str) -> Result<(), KorailError> {
        self.record(call);
        match self.action_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KorailApi for FakeKorail {
    async fn search_train(&self, query: &KorailSearch) -> Result<Vec<KorailTrain>, KorailError> {
        self.record("search");
        self.searches.lock().unwrap().push(query.clone());
        if let Some(err) = self.search_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.trains.lock().unwrap().clone())
    }

    async fn reserve(
        &self,
        train: &KorailTrain,
        passengers: &Passengers,
        _option: ReserveOption,
    ) -> Result<KorailReservation, KorailError> {
        self.record("reserve");
        if let Some(err) = self.reserve_error.lock().unwrap().take() {
            return Err(err);
        }
        let mut reservation = korail_reservation(&format!("K{}", train.train_no));
        reservation.train_no = train.train_no.clone();
        reservation.dep_time = train.dep_time.clone();
        reservation.seat_no_count = u32::from(passengers.count);
        self.reservations.lock().unwrap().push(reservation.clone());
        Ok(reservation)
    }

    async fn reservations(&self) -> Result<Vec<KorailReservation>, KorailError> {
        self.record("reservations");
        if let Some(err) = self.list_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn tickets(&self) -> Result<Vec<KorailTicket>, KorailError> {
        self.record("tickets");
        if let Some(err) = self.list_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.tickets.lock().unwrap().clone())
    }

    async fn cancel(&self, _reservation: &KorailReservation) -> Result<(), KorailError> {
        self.action("cancel")
    }

    async fn refund(&self, _ticket: &KorailTicket) -> Result<(), KorailError> {
        self.action("refund")
    }

    async fn pay_with_card(
        &self,
        _reservation: &KorailReservation,
        _card: &CardDetails,
    ) -> Result<(), KorailError> {
        self.action("pay")
    }
}

/// Hands out the same fakes to every request and records each login.
#[derive(Default)]
pub struct FakeCarriers {
    pub srt: Arc<FakeSrt>,
    pub korail: Arc<FakeKorail>,
    logins: Mutex<Vec<(TrainType, Login)>>,
}

impl FakeCarriers {
    pub fn new(srt: FakeSrt, korail: FakeKorail) -> Self {
        Self {
            srt: Arc::new(srt),
            korail: Arc::new(korail),
            logins: Mutex::new(Vec::new()),
        }
    }

    pub fn logins(&self) -> Vec<(TrainType, Login)> {
        self.logins.lock().unwrap().clone()
    }
}

impl Carriers for FakeCarriers {
    fn srt(&self, login: &Login) -> Result<Arc<dyn SrtApi>, BridgeError> {
        self.logins
            .lock()
            .unwrap()
            .push((TrainType::Srt, login.clone()));
        Ok(self.srt.clone())
    }

    fn korail(&self, login: &Login) -> Result<Arc<dyn KorailApi>, BridgeError> {
        self.logins
            .lock()
            .unwrap()
            .push((TrainType::Ktx, login.clone()));
        Ok(self.korail.clone())
    }
}
