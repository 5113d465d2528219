//! Process configuration.
//!
//! Read once from the environment at startup and immutable afterwards.

use std::net::SocketAddr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::backend::SoldOutPhrases;
use crate::carrier::{BridgeConfig, Credentials};
use crate::domain::TrainType;
use crate::notify::RelayConfig;
use crate::reserve::ServiceConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_SRT_BRIDGE_URL: &str = "http://127.0.0.1:8081";
const DEFAULT_KTX_BRIDGE_URL: &str = "http://127.0.0.1:8082";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

/// Length of an uncompressed P-256 public key.
const VAPID_KEY_LEN: usize = 65;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Built frontend assets
    pub static_dir: String,
    pub srt_bridge: BridgeConfig,
    pub ktx_bridge: BridgeConfig,
    pub service: ServiceConfig,
    pub vapid_public_key: Option<String>,
    pub vapid_admin_email: Option<String>,
    /// Absent means notifications are only logged
    pub push_relay_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let timeout_secs = match var("BACKEND_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    name: "BACKEND_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => DEFAULT_BACKEND_TIMEOUT_SECS,
        };

        let credentials = |id: &str, pw: &str| match (var(id), var(pw)) {
            (Some(id), Some(pw)) => Some(Credentials::new(id, pw)),
            _ => None,
        };

        let mut service = ServiceConfig::default()
            .with_credentials(TrainType::Srt, credentials("SRT_ID", "SRT_PW"))
            .with_credentials(TrainType::Ktx, credentials("KTX_ID", "KTX_PW"));
        if let Some(list) = var("SRT_SOLD_OUT_PHRASES") {
            service = service.with_phrases(TrainType::Srt, SoldOutPhrases::parse_list(&list));
        }
        if let Some(list) = var("KTX_SOLD_OUT_PHRASES") {
            service = service.with_phrases(TrainType::Ktx, SoldOutPhrases::parse_list(&list));
        }

        let vapid_public_key = var("VAPID_PUBLIC_KEY").filter(|key| {
            let valid = is_valid_vapid_key(key);
            if !valid {
                tracing::warn!("VAPID_PUBLIC_KEY is not a URL-safe base64 P-256 public key, ignoring it");
            }
            valid
        });

        Ok(Self {
            bind_addr,
            static_dir: var("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            srt_bridge: BridgeConfig::new(
                var("SRT_BRIDGE_URL").unwrap_or_else(|| DEFAULT_SRT_BRIDGE_URL.to_string()),
            )
            .with_timeout(timeout_secs),
            ktx_bridge: BridgeConfig::new(
                var("KTX_BRIDGE_URL").unwrap_or_else(|| DEFAULT_KTX_BRIDGE_URL.to_string()),
            )
            .with_timeout(timeout_secs),
            service,
            vapid_public_key,
            vapid_admin_email: var("VAPID_ADMIN_EMAIL"),
            push_relay_url: var("PUSH_RELAY_URL"),
        })
    }

    pub fn relay_config(&self) -> Option<RelayConfig> {
        let url = self.push_relay_url.as_ref()?;
        Some(
            RelayConfig::new(url.clone())
                .with_vapid_public_key(self.vapid_public_key.clone())
                .with_admin_email(self.vapid_admin_email.clone()),
        )
    }
}

/// An uncompressed P-256 point: 65 bytes starting with 0x04.
fn is_valid_vapid_key(key: &str) -> bool {
    URL_SAFE_NO_PAD
        .decode(key.trim_end_matches('='))
        .is_ok_and(|bytes| bytes.len() == VAPID_KEY_LEN && bytes[0] == 0x04)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const VALID_KEY: &str =
        "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM";

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.static_dir, "dist");
        assert_eq!(config.srt_bridge.base_url, "http://127.0.0.1:8081");
        assert_eq!(config.ktx_bridge.timeout_secs, 30);
        assert!(!config.service.is_configured(TrainType::Srt));
        assert!(!config.service.is_configured(TrainType::Ktx));
        assert!(config.relay_config().is_none());
    }

    #[test]
    fn credentials_need_both_halves() {
        let config = config(&[
            ("SRT_ID", "010-1234-5678"),
            ("SRT_PW", "secret"),
            ("KTX_ID", "1234567890"),
            ("KTX_PW", "  "),
        ])
        .unwrap();
        assert_eq!(
            config.service.credentials(TrainType::Srt),
            Some(&Credentials::new("010-1234-5678", "secret"))
        );
        assert!(!config.service.is_configured(TrainType::Ktx));
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            config(&[("BIND_ADDR", "localhost")]),
            Err(ConfigError::Invalid { name: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("BACKEND_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid { name: "BACKEND_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn vapid_key_validation() {
        assert!(is_valid_vapid_key(VALID_KEY));
        assert!(!is_valid_vapid_key("not-a-key"));
        assert!(!is_valid_vapid_key("AAAA"));

        let config = config(&[("VAPID_PUBLIC_KEY", "garbage!")]).unwrap();
        assert_eq!(config.vapid_public_key, None);
    }

    #[test]
    fn relay_and_phrases() {
        let config = config(&[
            ("PUSH_RELAY_URL", "http://relay.local/push"),
            ("VAPID_PUBLIC_KEY", VALID_KEY),
            ("VAPID_ADMIN_EMAIL", "mailto:ops@example.com"),
            ("KTX_SOLD_OUT_PHRASES", "좌석없음, 매진"),
            ("BACKEND_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        let relay = config.relay_config().unwrap();
        assert_eq!(relay.url, "http://relay.local/push");
        assert_eq!(relay.vapid_public_key.as_deref(), Some(VALID_KEY));
        assert_eq!(relay.admin_email.as_deref(), Some("mailto:ops@example.com"));
        assert!(config.service.ktx_phrases.matches("좌석없음"));
        assert!(!config.service.ktx_phrases.matches("Sold out"));
        assert_eq!(config.srt_bridge.timeout_secs, 5);
    }
}
