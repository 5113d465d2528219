//! Application state for the web layer.

use std::sync::Arc;

use crate::notify::SubscriptionStore;
use crate::reserve::ReservationService;
use crate::stations::StationCatalogue;

/// Shared application state.
///
/// Nothing here changes after startup except the push subscription,
/// which guards itself.
#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<ReservationService>,

    pub stations: Arc<StationCatalogue>,

    /// Served to the frontend for push subscription
    pub vapid_public_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        reservations: ReservationService,
        stations: StationCatalogue,
        vapid_public_key: Option<String>,
    ) -> Self {
        Self {
            reservations: Arc::new(reservations),
            stations: Arc::new(stations),
            vapid_public_key: vapid_public_key.map(Arc::from),
        }
    }

    pub fn subscriptions(&self) -> &SubscriptionStore {
        self.reservations.notifier().store()
    }
}
