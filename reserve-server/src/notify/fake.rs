//! Recording push sender for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{PushError, PushMessage, PushSender, PushSubscription, SubscriptionKeys};

pub fn subscription(endpoint: &str) -> PushSubscription {
    PushSubscription {
        endpoint: endpoint.to_string(),
        expiration_time: None,
        keys: SubscriptionKeys {
            p256dh: "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM".to_string(),
            auth: "tBHItJI5svbpez7KI4CCXg".to_string(),
        },
    }
}

#[derive(Default)]
pub struct FakePushSender {
    sent: Mutex<Vec<(String, PushMessage)>>,
    next_error: Mutex<Option<PushError>>,
    held: AtomicBool,
    release: Notify,
    attempts: Notify,
}

impl FakePushSender {
    pub fn fail_next(&self, err: PushError) {
        *self.next_error.lock().unwrap() = Some(err);
    }

    /// Make sends block until [`release`](Self::release), like a stalled relay.
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    /// Resolves once a send attempt has finished, successful or not.
    pub async fn attempted(&self) {
        self.attempts.notified().await;
    }

    /// (endpoint, message) pairs in send order.
    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushSender for FakePushSender {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> Result<(), PushError> {
        if self.held.load(Ordering::SeqCst) {
            self.release.notified().await;
        }

        let next_error = self.next_error.lock().unwrap().take();
        let result = match next_error {
            Some(err) => Err(err),
            None => {
                self.sent
                    .lock()
                    .unwrap()
                    .push((subscription.endpoint.clone(), message.clone()));
                Ok(())
            }
        };
        self.attempts.notify_one();
        result
    }
}
