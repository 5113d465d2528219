//! Outcome taxonomy and classification of backend conditions.
//!
//! Every orchestrated operation ends in exactly one [`Outcome`]. The
//! classifier performs no retries; a sold-out outcome only tells the
//! caller when another attempt is reasonable.

use std::time::Duration;

use crate::backend::BackendError;
use crate::domain::{Booking, DomainError, TrainType};

/// Delay suggested to callers before re-attempting a sold-out train.
pub const RETRY_AFTER: Duration = Duration::from_secs(5);

pub const SOLD_OUT_MESSAGE: &str = "매진. 5초 후 재시도합니다.";

/// Why a request could not be attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Missing or malformed input
    Invalid(String),
    /// The train or booking the client named is not in the live data
    NotFound(String),
    /// The service has no credentials for the carrier
    Unconfigured(String),
}

impl ValidationFailure {
    pub fn message(&self) -> &str {
        match self {
            ValidationFailure::Invalid(m)
            | ValidationFailure::NotFound(m)
            | ValidationFailure::Unconfigured(m) => m,
        }
    }
}

/// Result of one orchestrated attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = Booking> {
    Success(T),
    /// Sold out. The caller may try again after `retry_after`.
    Retryable {
        message: String,
        retry_after: Duration,
    },
    /// Stored credentials were rejected
    AuthFailure(String),
    Validation(ValidationFailure),
    /// Unexpected backend, network or parse failure
    Fatal(String),
}

impl<T> Outcome<T> {
    pub fn sold_out() -> Self {
        Outcome::Retryable {
            message: SOLD_OUT_MESSAGE.to_string(),
            retry_after: RETRY_AFTER,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Outcome::Validation(ValidationFailure::Invalid(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Outcome::Validation(ValidationFailure::NotFound(message.into()))
    }

    pub fn unconfigured(message: impl Into<String>) -> Self {
        Outcome::Validation(ValidationFailure::Unconfigured(message.into()))
    }

    /// Classify a backend condition raised while serving `train_type`.
    ///
    /// Adapters have already promoted phrase-matched messages to
    /// `SoldOut`, so precedence here is only by kind.
    pub fn from_backend(train_type: TrainType, err: BackendError) -> Self {
        match err {
            BackendError::SoldOut(message) => {
                tracing::info!(%train_type, %message, "sold out");
                Outcome::sold_out()
            }
            BackendError::Auth(message) => {
                tracing::warn!(%train_type, %message, "carrier rejected credentials");
                Outcome::AuthFailure(format!("로그인 실패: {message}"))
            }
            BackendError::Validation(message) => Outcome::invalid(message),
            BackendError::Backend(message) => {
                tracing::error!(%train_type, error = %message, "carrier request failed");
                Outcome::Fatal(message)
            }
        }
    }
}

impl<T> From<DomainError> for Outcome<T> {
    fn from(err: DomainError) -> Self {
        Outcome::invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(err: BackendError) -> Outcome<()> {
        Outcome::from_backend(TrainType::Srt, err)
    }

    #[test]
    fn sold_out_is_retryable_with_hint() {
        match classify(BackendError::SoldOut("잔여석없음".into())) {
            Outcome::Retryable {
                message,
                retry_after,
            } => {
                assert!(message.contains("5초 후 재시도"));
                assert_eq!(retry_after, Duration::from_secs(5));
            }
            other => panic!("expected retryable, got {other:?}"),
        }
    }

    #[test]
    fn auth_message_is_prefixed() {
        assert_eq!(
            classify(BackendError::Auth("비밀번호 오류".into())),
            Outcome::AuthFailure("로그인 실패: 비밀번호 오류".into())
        );
    }

    #[test]
    fn other_kinds() {
        assert_eq!(
            classify(BackendError::Validation("이미 결제된 예약입니다.".into())),
            Outcome::invalid("이미 결제된 예약입니다.")
        );
        assert_eq!(
            classify(BackendError::Backend("timeout".into())),
            Outcome::Fatal("timeout".into())
        );
    }

    #[test]
    fn domain_error_is_invalid() {
        let outcome: Outcome = DomainError::MissingField("dep").into();
        assert!(matches!(outcome, Outcome::Validation(ValidationFailure::Invalid(_))));
    }
}
