//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::domain::{SeatClass, TrainType};
use crate::notify::PushSubscription;
use crate::outcome::{Outcome, ValidationFailure};
use crate::reserve::{CancelInput, PayInput, ReserveInput};

use super::dto::*;
use super::extract::FormOrJson;
use super::state::AppState;

/// Create the application router.
///
/// API routes live under `/api`; anything else is served from
/// `static_dir`, where the built frontend lives.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    let api = Router::new()
        .route("/stations", get(stations))
        .route("/search", get(search))
        .route("/reserve", post(reserve))
        .route("/auto-retry", post(auto_retry))
        .route("/reservations", get(reservations))
        .route("/pay", post(pay))
        .route("/cancel", post(cancel))
        .route("/vapid_public_key", get(vapid_public_key))
        .route("/subscribe", post(subscribe));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Station names per carrier.
async fn stations(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.stations.to_json())
}

/// Live schedule search.
///
/// A search that matches nothing is a normal empty result.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, SearchError> {
    let criteria = query.to_input().validate().map_err(|e| {
        SearchError(AppError::BadRequest {
            message: e.to_string(),
        })
    })?;

    let trains = settle(state.reservations.search(&criteria).await).map_err(SearchError)?;
    Ok(Json(SearchResponse::new(&query, &trains)))
}

/// One reservation attempt.
async fn reserve(
    State(state): State<AppState>,
    FormOrJson(form): FormOrJson<ReserveForm>,
) -> Result<Response, AppError> {
    let input = ReserveInput::from(form);
    reserve_response(state.reservations.reserve(&input).await)
}

/// Re-attempt after a sold-out answer.
///
/// Same contract as reserve, except a missing seat class means general.
async fn auto_retry(
    State(state): State<AppState>,
    FormOrJson(form): FormOrJson<ReserveForm>,
) -> Result<Response, AppError> {
    let mut input = ReserveInput::from(form);
    if input.seat_type.as_deref().is_none_or(|s| s.trim().is_empty()) {
        input.seat_type = Some(SeatClass::General.as_str().to_string());
    }
    reserve_response(state.reservations.reserve(&input).await)
}

fn reserve_response(outcome: Outcome) -> Result<Response, AppError> {
    match outcome {
        Outcome::Retryable {
            message,
            retry_after,
        } => Ok(Json(RetryResponse {
            retry: true,
            message,
            retry_after_secs: retry_after.as_secs(),
        })
        .into_response()),
        other => {
            let booking = settle(other)?;
            Ok(Json(ReserveResponse {
                reservation: BookingResult::from_booking(&booking),
            })
            .into_response())
        }
    }
}

/// Bookings on both carriers, or one with `?type=`.
async fn reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationsQuery>,
) -> Result<Json<ReservationsResponse>, AppError> {
    let only = query
        .train_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(TrainType::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    let report = state.reservations.list_bookings(only).await;
    Ok(Json(ReservationsResponse::from_report(&report)))
}

/// Cancel a hold or refund a ticket.
async fn cancel(
    State(state): State<AppState>,
    FormOrJson(form): FormOrJson<CancelForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = settle(state.reservations.cancel(&CancelInput::from(form)).await)?;
    Ok(Json(MessageResponse { message }))
}

/// Pay for a hold by card.
async fn pay(
    State(state): State<AppState>,
    FormOrJson(form): FormOrJson<PayForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = settle(state.reservations.pay(&PayInput::from(form)).await)?;
    Ok(Json(MessageResponse { message }))
}

/// The VAPID public key the frontend subscribes with.
async fn vapid_public_key(State(state): State<AppState>) -> Response {
    match &state.vapid_public_key {
        Some(key) => key.to_string().into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "VAPID public key not configured.",
        )
            .into_response(),
    }
}

/// Store the push subscription, replacing any previous one.
async fn subscribe(
    State(state): State<AppState>,
    Json(subscription): Json<PushSubscription>,
) -> (StatusCode, Json<SubscribeResponse>) {
    tracing::info!(endpoint = %subscription.endpoint, "push subscription received");
    state.subscriptions().set(subscription).await;
    (StatusCode::CREATED, Json(SubscribeResponse { success: true }))
}

/// Unwrap a success or turn the failure into an [`AppError`].
fn settle<T>(outcome: Outcome<T>) -> Result<T, AppError> {
    match outcome {
        Outcome::Success(value) => Ok(value),
        Outcome::Validation(ValidationFailure::NotFound(message)) => Err(AppError::NotFound { message }),
        Outcome::Validation(failure) => Err(AppError::BadRequest {
            message: failure.message().to_string(),
        }),
        Outcome::AuthFailure(message) => Err(AppError::Unauthorized { message }),
        Outcome::Retryable { message, .. } | Outcome::Fatal(message) => {
            Err(AppError::Internal { message })
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn parts(self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        tracing::debug!(%status, %message, "request failed");

        let body = Json(ErrorMessageResponse {
            error_message: message,
        });
        (status, body).into_response()
    }
}

/// Search failures, reported as `{"error": ...}`.
#[derive(Debug)]
pub struct SearchError(AppError);

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.parts();
        tracing::debug!(%status, %message, "search failed");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
