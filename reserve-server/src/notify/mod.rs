//! Push notifications on successful reservations.
//!
//! The service holds at most one Web Push subscription, set by the
//! frontend and replaced on every subscribe. Delivery is best-effort:
//! nothing here can fail a reservation.

#[cfg(test)]
pub mod fake;
mod relay;
mod store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

pub use relay::{RelayConfig, RelayPushSender};
pub use store::SubscriptionStore;

/// A browser push subscription as the Push API serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    #[serde(default)]
    pub expiration_time: Option<u64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Notification payload, delivered to the service worker as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

impl PushMessage {
    pub fn reservation_success(dep: &str, arr: &str) -> Self {
        Self {
            title: "✅ 예매 성공!".to_string(),
            body: format!("{dep} → {arr} 열차 예매에 성공했습니다."),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The push service no longer knows the endpoint (HTTP 404/410)
    #[error("subscription endpoint is gone")]
    Gone,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push relay error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Delivers one message to one subscription.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> Result<(), PushError>;
}

/// Best-effort success notifications.
#[derive(Clone)]
pub struct Notifier {
    store: SubscriptionStore,
    sender: Option<Arc<dyn PushSender>>,
}

impl Notifier {
    pub fn new(store: SubscriptionStore, sender: Option<Arc<dyn PushSender>>) -> Self {
        Self { store, sender }
    }

    pub fn store(&self) -> &SubscriptionStore {
        &self.store
    }

    /// Send `message` to the current subscription, if any.
    ///
    /// Failures are logged and swallowed. A subscription the push service
    /// reports gone is cleared, unless it was replaced in the meantime.
    pub async fn notify(&self, message: &PushMessage) {
        let Some(subscription) = self.store.get().await else {
            tracing::warn!(title = %message.title, "no push subscription to notify");
            return;
        };
        let Some(sender) = &self.sender else {
            tracing::info!(
                title = %message.title,
                body = %message.body,
                "push relay not configured, notification not sent"
            );
            return;
        };

        match sender.send(&subscription, message).await {
            Ok(()) => tracing::info!(title = %message.title, "push notification sent"),
            Err(PushError::Gone) => {
                tracing::error!(endpoint = %subscription.endpoint, "push subscription expired");
                if self.store.clear_if(&subscription.endpoint).await {
                    tracing::warn!(endpoint = %subscription.endpoint, "cleared push subscription");
                }
            }
            Err(e) => tracing::error!(error = %e, "push notification failed"),
        }
    }

    /// Deliver `message` on a background task. The caller never waits on
    /// the push service.
    pub fn notify_detached(&self, message: PushMessage) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move { notifier.notify(&message).await })
    }
}
