use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    availability::AvailabilityError, booking::BookingError, claims::ClaimError,
    reviews::ReviewError, venue_admin::VenueAdminError, venue_search::VenueSearchError,
};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

/// Uniform outcome for every handler: validation, authorization, not-found,
/// conflict, or a store failure. Store detail is logged here and never
/// reaches the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not allowed")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "not allowed".to_string()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            ApiError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong, please try again".to_string(),
                )
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<VenueSearchError> for ApiError {
    fn from(err: VenueSearchError) -> Self {
        match err {
            VenueSearchError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<AvailabilityError> for ApiError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Database(e) => ApiError::Database(e),
            AvailabilityError::VenueNotFound => ApiError::NotFound("venue"),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Database(e) => ApiError::Database(e),
            BookingError::InvalidInput(message) => ApiError::Validation(message),
            BookingError::VenueNotFound => ApiError::NotFound("venue"),
            BookingError::ReservationNotFound => ApiError::NotFound("reservation"),
            BookingError::SlotUnavailable => {
                ApiError::Conflict("slot no longer available".to_string())
            }
            BookingError::InvalidTransition(from, to) => {
                ApiError::Conflict(format!("reservation cannot change from {from} to {to}"))
            }
            BookingError::Forbidden => ApiError::Forbidden,
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::Database(e) => ApiError::Database(e),
            ClaimError::VenueNotFound => ApiError::NotFound("venue"),
            ClaimError::ClaimNotFound => ApiError::NotFound("claim"),
            ClaimError::AlreadyClaimed => {
                ApiError::Conflict("venue is already claimed".to_string())
            }
            ClaimError::DuplicateClaim => ApiError::Conflict(
                "you already have a pending claim for this venue".to_string(),
            ),
            ClaimError::AlreadyReviewed => {
                ApiError::Conflict("claim has already been reviewed".to_string())
            }
            ClaimError::Forbidden => ApiError::Forbidden,
        }
    }
}

impl From<VenueAdminError> for ApiError {
    fn from(err: VenueAdminError) -> Self {
        match err {
            VenueAdminError::Database(e) => ApiError::Database(e),
            VenueAdminError::VenueNotFound => ApiError::NotFound("venue"),
            VenueAdminError::InvalidInput(message) => ApiError::Validation(message),
            VenueAdminError::Forbidden => ApiError::Forbidden,
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Database(e) => ApiError::Database(e),
            ReviewError::VenueNotFound => ApiError::NotFound("venue"),
            ReviewError::InvalidInput(message) => ApiError::Validation(message),
            ReviewError::AlreadyReviewed => {
                ApiError::Conflict("you have already reviewed this venue".to_string())
            }
        }
    }
}
