//! Push delivery through an HTTP relay.
//!
//! Web Push encryption and VAPID signing are done by the relay. This
//! sender posts the subscription, the JSON payload and the VAPID claims
//! the relay should sign with.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use super::{PushError, PushMessage, PushSender, PushSubscription};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Push relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    /// URL-safe base64 VAPID public key
    pub vapid_public_key: Option<String>,
    /// `sub` claim, e.g. "mailto:ops@example.com"
    pub admin_email: Option<String>,
    pub timeout_secs: u64,
}

impl RelayConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            vapid_public_key: None,
            admin_email: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_vapid_public_key(mut self, key: Option<String>) -> Self {
        self.vapid_public_key = key;
        self
    }

    pub fn with_admin_email(mut self, email: Option<String>) -> Self {
        self.admin_email = email;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    subscription: &'a PushSubscription,
    /// Serialized [`PushMessage`], delivered verbatim
    data: String,
    vapid_claims: VapidClaims<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vapid_public_key: Option<&'a str>,
}

#[derive(Serialize)]
struct VapidClaims<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
}

/// [`PushSender`] that delegates to a relay.
#[derive(Debug, Clone)]
pub struct RelayPushSender {
    http: reqwest::Client,
    config: RelayConfig,
}

impl RelayPushSender {
    pub fn new(config: RelayConfig) -> Result<Self, PushError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl PushSender for RelayPushSender {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> Result<(), PushError> {
        let data = serde_json::json!({ "title": message.title, "body": message.body }).to_string();
        let request = RelayRequest {
            subscription,
            data,
            vapid_claims: VapidClaims {
                sub: self.config.admin_email.as_deref(),
            },
            vapid_public_key: self.config.vapid_public_key.as_deref(),
        };

        let response = self.http.post(&self.config.url).json(&request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }
}

/// Map a non-2xx relay status. 404 and 410 mean the push service dropped
/// the endpoint.
fn status_error(status: StatusCode, body: String) -> PushError {
    match status {
        StatusCode::GONE | StatusCode::NOT_FOUND => PushError::Gone,
        _ => PushError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}
