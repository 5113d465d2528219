//! Domain error types.
//!
//! These errors represent rejected request input. They are distinct from
//! carrier and transport errors, and always map to a 4xx response. Messages
//! are shown to the operator as-is.

/// Domain-level errors for request validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A required request field was absent or blank
    #[error("필수 입력값이 누락되었습니다: {0}")]
    MissingField(&'static str),

    /// The train type is neither SRT nor KTX
    #[error("알 수 없는 열차 종류({0})입니다.")]
    UnknownTrainType(String),

    /// The seat class is neither GENERAL nor SPECIAL
    #[error("알 수 없는 좌석 등급({0})입니다.")]
    UnknownSeatClass(String),

    /// A date that is not `YYYY-MM-DD` or `YYYYMMDD`
    #[error("날짜 형식이 올바르지 않습니다: {0}")]
    InvalidDate(String),

    /// A time that is not `HH:MM` or `HHMMSS`
    #[error("시간 형식이 올바르지 않습니다: {0}")]
    InvalidTime(String),

    /// Passenger count outside the bookable range
    #[error("인원 수가 올바르지 않습니다: {0}")]
    InvalidPassengerCount(String),
}
