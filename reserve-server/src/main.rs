use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use reserve_server::carrier::HttpCarriers;
use reserve_server::config::AppConfig;
use reserve_server::domain::TrainType;
use reserve_server::notify::{Notifier, PushSender, RelayPushSender, SubscriptionStore};
use reserve_server::reserve::ReservationService;
use reserve_server::stations::StationCatalogue;
use reserve_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    for t in TrainType::ALL {
        if !config.service.is_configured(t) {
            tracing::warn!(train_type = %t, "no operator credentials, reservations will be refused");
        }
    }

    let sender: Option<Arc<dyn PushSender>> = match config.relay_config() {
        Some(relay) => Some(Arc::new(
            RelayPushSender::new(relay).expect("Failed to create push relay client"),
        )),
        None => {
            tracing::info!("PUSH_RELAY_URL not set, notifications will only be logged");
            None
        }
    };
    let notifier = Notifier::new(SubscriptionStore::new(), sender);

    let carriers = HttpCarriers::new(config.srt_bridge.clone(), config.ktx_bridge.clone());
    let reservations = ReservationService::new(Arc::new(carriers), config.service.clone(), notifier);

    let state = AppState::new(
        reservations,
        StationCatalogue::new(),
        config.vapid_public_key.clone(),
    );
    let app = create_router(state, &config.static_dir);

    tracing::info!(
        addr = %config.bind_addr,
        srt = config.service.is_configured(TrainType::Srt),
        ktx = config.service.is_configured(TrainType::Ktx),
        static_dir = %config.static_dir,
        "reservation server listening"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
