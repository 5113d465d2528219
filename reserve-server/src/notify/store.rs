//! The process-wide push subscription.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::PushSubscription;

/// At most one subscription, shared by every request.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionStore {
    inner: Arc<RwLock<Option<PushSubscription>>>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current subscription.
    pub async fn set(&self, subscription: PushSubscription) {
        let mut guard = self.inner.write().await;
        *guard = Some(subscription);
    }

    pub async fn get(&self) -> Option<PushSubscription> {
        let guard = self.inner.read().await;
        guard.clone()
    }

    /// Clear the subscription only if it still has `endpoint`.
    ///
    /// Returns whether it was cleared. A subscribe that lands while a send
    /// to the old endpoint is in flight must survive that send failing.
    pub async fn clear_if(&self, endpoint: &str) -> bool {
        let mut guard = self.inner.write().await;
        if guard.as_ref().is_some_and(|s| s.endpoint == endpoint) {
            *guard = None;
            true
        } else {
            false
        }
    }
}
