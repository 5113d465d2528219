//! HTTP transport to a carrier bridge.
//!
//! The carrier booking systems are reached through a bridge process that
//! owns the carrier session handling. Every operation is a JSON `POST` to
//! `{base_url}/{operation}`; credentials travel as default headers. The
//! bridge reports carrier-level failures as a non-2xx status with a
//! [`CarrierFault`] body.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Login;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ID_HEADER: HeaderName = HeaderName::from_static("x-carrier-id");
const PASSWORD_HEADER: HeaderName = HeaderName::from_static("x-carrier-password");

/// Configuration for one carrier bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BridgeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// The category of a carrier-reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    SoldOut,
    NoResults,
    Login,
    NeedLogin,
    Response,
    #[serde(other)]
    Other,
}

/// A failure the carrier itself reported.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CarrierFault {
    pub kind: FaultKind,
    /// Carrier message code, e.g. "P058"
    #[serde(default)]
    pub code: String,
    pub message: String,
}

/// Errors from the bridge transport.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Non-2xx status without a carrier fault body
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The carrier rejected the operation
    #[error("{}", .0.message)]
    Fault(CarrierFault),

    /// Client could not be constructed
    #[error("invalid bridge configuration: {0}")]
    Config(String),
}

/// JSON client for one carrier bridge.
#[derive(Debug, Clone)]
pub struct Bridge {
    http: reqwest::Client,
    base_url: String,
}

impl Bridge {
    /// Build a client. A read-only login sends no credential headers.
    pub fn new(config: &BridgeConfig, login: &Login) -> Result<Self, BridgeError> {
        let mut headers = HeaderMap::new();

        if let Login::Account(credentials) = login {
            let id = HeaderValue::from_str(&credentials.id)
                .map_err(|_| BridgeError::Config("invalid account id".to_string()))?;
            let mut password = HeaderValue::from_str(&credentials.password)
                .map_err(|_| BridgeError::Config("invalid account password".to_string()))?;
            password.set_sensitive(true);
            headers.insert(ID_HEADER, id);
            headers.insert(PASSWORD_HEADER, password);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Invoke one bridge operation.
    pub async fn call<B, T>(&self, operation: &str, body: &B) -> Result<T, BridgeError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, operation);
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(fault_from_response(status.as_u16(), text));
        }

        // Operations without a result reply with an empty body
        let text = if text.trim().is_empty() { "null".to_string() } else { text };
        serde_json::from_str(&text).map_err(|e| BridgeError::Json {
            message: e.to_string(),
            body: Some(text.chars().take(500).collect()),
        })
    }
}

fn fault_from_response(status: u16, body: String) -> BridgeError {
    if let Ok(fault) = serde_json::from_str::<CarrierFault>(&body) {
        return BridgeError::Fault(fault);
    }
    if status == 401 || status == 403 {
        return BridgeError::Fault(CarrierFault {
            kind: FaultKind::Login,
            code: status.to_string(),
            message: body,
        });
    }
    BridgeError::Api {
        status,
        message: body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::Credentials;

    #[test]
    fn config_builder() {
        let config = BridgeConfig::new("http://localhost:8081/").with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:8081");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = BridgeConfig::new("http://localhost:8081");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn client_creation() {
        let config = BridgeConfig::new("http://localhost:8081");
        assert!(Bridge::new(&config, &Login::ReadOnly).is_ok());
        let login = Login::Account(Credentials::new("user", "pw"));
        assert!(Bridge::new(&config, &login).is_ok());
    }

    #[test]
    fn rejects_credentials_that_cannot_be_headers() {
        let config = BridgeConfig::new("http://localhost:8081");
        let login = Login::Account(Credentials::new("user\n", "pw"));
        assert!(matches!(
            Bridge::new(&config, &login),
            Err(BridgeError::Config(_))
        ));
    }

    #[test]
    fn fault_body_is_parsed() {
        let body = r#"{"kind":"sold_out","code":"ERR211161","message":"잔여석없음"}"#;
        match fault_from_response(400, body.to_string()) {
            BridgeError::Fault(fault) => {
                assert_eq!(fault.kind, FaultKind::SoldOut);
                assert_eq!(fault.code, "ERR211161");
                assert_eq!(fault.message, "잔여석없음");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_fault_kind_is_other() {
        let body = r#"{"kind":"maintenance","message":"점검중"}"#;
        match fault_from_response(503, body.to_string()) {
            BridgeError::Fault(fault) => {
                assert_eq!(fault.kind, FaultKind::Other);
                assert!(fault.code.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bare_unauthorized_is_login_fault() {
        match fault_from_response(401, "denied".to_string()) {
            BridgeError::Fault(fault) => assert_eq!(fault.kind, FaultKind::Login),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            fault_from_response(502, "bad gateway".to_string()),
            BridgeError::Api { status: 502, .. }
        ));
    }
}
