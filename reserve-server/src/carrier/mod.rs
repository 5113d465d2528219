//! Carrier clients.
//!
//! The SRT and Korail booking systems are external services. This module
//! defines the narrow typed interface the service consumes from each
//! ([`SrtApi`], [`KorailApi`]), their native record shapes and errors, and
//! HTTP implementations that reach them through a bridge.
//!
//! Key characteristics of both carriers:
//! - Schedule rows are **ephemeral**: a reservation must be made from a
//!   fresh search, never from a row the client cached
//! - Searching does not need a session; everything else does
//! - Sold-out is a frequent, normal answer to a reservation attempt

mod bridge;
#[cfg(test)]
pub mod fake;
mod korail;
mod srt;

use std::fmt;
use std::sync::Arc;

pub use bridge::{Bridge, BridgeConfig, BridgeError, CarrierFault, FaultKind};
pub use korail::{
    HttpKorailClient, KTX_TRAIN_TYPE, KorailApi, KorailError, KorailReservation, KorailSearch,
    KorailTicket, KorailTrain, ReserveOption,
};
pub use srt::{HttpSrtClient, SrtApi, SrtError, SrtReservation, SrtSearch, SrtSeatType, SrtTrain};

/// An operator account for one carrier.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("password", &"***")
            .finish()
    }
}

/// How a carrier client session is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Login {
    /// No session. Enough for schedule search, and avoids spending login
    /// quota or risking an account lockout.
    ReadOnly,
    /// Authenticated as the operator account
    Account(Credentials),
}

/// Builds carrier clients for a request.
///
/// Each request gets its own client instances; nothing mutable is shared
/// between requests.
pub trait Carriers: Send + Sync {
    fn srt(&self, login: &Login) -> Result<Arc<dyn SrtApi>, BridgeError>;

    fn korail(&self, login: &Login) -> Result<Arc<dyn KorailApi>, BridgeError>;
}

/// Carrier clients backed by the HTTP bridges.
#[derive(Debug, Clone)]
pub struct HttpCarriers {
    srt: BridgeConfig,
    korail: BridgeConfig,
}

impl HttpCarriers {
    pub fn new(srt: BridgeConfig, korail: BridgeConfig) -> Self {
        Self { srt, korail }
    }
}

impl Carriers for HttpCarriers {
    fn srt(&self, login: &Login) -> Result<Arc<dyn SrtApi>, BridgeError> {
        Ok(Arc::new(HttpSrtClient::new(&self.srt, login)?))
    }

    fn korail(&self, login: &Login) -> Result<Arc<dyn KorailApi>, BridgeError> {
        Ok(Arc::new(HttpKorailClient::new(&self.korail, login)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("010-1234-5678", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("010-1234-5678"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn http_carriers_build_clients() {
        let carriers = HttpCarriers::new(
            BridgeConfig::new("http://127.0.0.1:8081"),
            BridgeConfig::new("http://127.0.0.1:8082"),
        );
        assert!(carriers.srt(&Login::ReadOnly).is_ok());
        assert!(
            carriers
                .korail(&Login::Account(Credentials::new("id", "pw")))
                .is_ok()
        );
    }
}
