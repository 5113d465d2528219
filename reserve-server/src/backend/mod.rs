//! Backend adapters.
//!
//! One adapter per carrier, each wrapping that carrier's client behind the
//! [`Backend`] contract. Adapters own three carrier-specific concerns:
//! mapping native records to [`TrainRecord`] and [`Booking`], mapping
//! native errors to [`BackendError`], and the sold-out phrase table.
//!
//! Native records travel through the contract as associated types, so a
//! train matched from a fresh search is the exact object handed back to
//! the carrier's reserve call.

mod ktx;
mod phrases;
mod srt;

use async_trait::async_trait;

use crate::domain::{Booking, CardDetails, Passengers, SearchCriteria, SeatClass, TrainRecord, TrainType};

pub use ktx::{KtxAdapter, KtxItem, ktx_booking, ktx_train_record};
pub use phrases::SoldOutPhrases;
pub use srt::{SrtAdapter, srt_booking, srt_train_record};

/// Backend-reported conditions, already sorted into the categories the
/// outcome classifier distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No seats left for the requested class at attempt time
    #[error("{0}")]
    SoldOut(String),

    /// Stored credentials rejected or session missing
    #[error("{0}")]
    Auth(String),

    /// The operation does not apply to the item it was given
    #[error("{0}")]
    Validation(String),

    /// Anything else: network, parse, rate limiting, maintenance
    #[error("{0}")]
    Backend(String),
}

impl BackendError {
    pub fn message(&self) -> &str {
        match self {
            BackendError::SoldOut(m)
            | BackendError::Auth(m)
            | BackendError::Validation(m)
            | BackendError::Backend(m) => m,
        }
    }
}

/// The contract every carrier adapter implements.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Native schedule row
    type Train: Send + Sync;
    /// Native hold or ticket
    type Item: Send + Sync;

    fn train_type(&self) -> TrainType;

    /// Map a native schedule row to its canonical form.
    fn train_record(&self, train: &Self::Train) -> TrainRecord;

    /// Map a native hold or ticket to its canonical form.
    fn booking(&self, item: &Self::Item) -> Booking;

    /// Live schedule search, sold-out trains included.
    ///
    /// A carrier "no matching schedules" answer is an empty result, not
    /// an error.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Self::Train>, BackendError>;

    /// Attempt a booking hold.
    async fn reserve(
        &self,
        train: &Self::Train,
        passengers: &Passengers,
        seat_class: SeatClass,
    ) -> Result<Self::Item, BackendError>;

    /// Every open hold and paid ticket on the account.
    async fn list_bookings(&self) -> Result<Vec<Self::Item>, BackendError>;

    /// Cancel an unpaid hold. Fails with `Validation` on a paid ticket.
    async fn cancel(&self, item: &Self::Item) -> Result<(), BackendError>;

    /// Refund a paid ticket. Fails with `Validation` on an unpaid hold.
    async fn refund(&self, item: &Self::Item) -> Result<(), BackendError>;

    /// Settle an unpaid hold. Fails with `Validation` if already paid.
    async fn pay(&self, item: &Self::Item, card: &CardDetails) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_variant_payload() {
        assert_eq!(BackendError::SoldOut("매진".into()).message(), "매진");
        assert_eq!(BackendError::Backend("timeout".into()).to_string(), "timeout");
    }
}
