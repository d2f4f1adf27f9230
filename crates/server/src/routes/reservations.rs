//! Routes for booking, listing and transitioning reservations.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::reservation::{Reservation, ReservationStatus};
use serde::{Deserialize, Serialize};
use services::services::booking::{BookingService, CreateReservationRequest};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{Deployment, auth::CurrentUser, error::ApiError};

pub async fn create_reservation(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    axum::Json(payload): axum::Json<CreateReservationRequest>,
) -> Result<ResponseJson<ApiResponse<Reservation>>, ApiError> {
    let reservation = BookingService::create(&deployment.db().pool, &user, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(reservation)))
}

pub async fn list_my_reservations(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Reservation>>>, ApiError> {
    let reservations = BookingService::list_for_user(&deployment.db().pool, &user).await?;
    Ok(ResponseJson(ApiResponse::success(reservations)))
}

pub async fn get_reservation(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(reservation_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Reservation>>, ApiError> {
    let reservation = Reservation::find_by_id(&deployment.db().pool, reservation_id)
        .await?
        // ownership predicate: someone else's reservation reads as not-found
        .filter(|r| r.user_id == user.id)
        .ok_or(ApiError::NotFound("reservation"))?;
    Ok(ResponseJson(ApiResponse::success(reservation)))
}

pub async fn cancel_reservation(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(reservation_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Reservation>>, ApiError> {
    let reservation =
        BookingService::cancel(&deployment.db().pool, &user, reservation_id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        reservation,
        "reservation cancelled",
    )))
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TransitionRequest {
    pub status: ReservationStatus,
}

/// Front-desk transitions: check-in to completed, or marking a no-show.
pub async fn transition_reservation(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(reservation_id): Path<Uuid>,
    axum::Json(payload): axum::Json<TransitionRequest>,
) -> Result<ResponseJson<ApiResponse<Reservation>>, ApiError> {
    let reservation = BookingService::transition(
        &deployment.db().pool,
        &user,
        reservation_id,
        payload.status,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(reservation)))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route(
            "/reservations",
            get(list_my_reservations).post(create_reservation),
        )
        .route("/reservations/{reservation_id}", get(get_reservation))
        .route(
            "/reservations/{reservation_id}/cancel",
            post(cancel_reservation),
        )
        .route(
            "/reservations/{reservation_id}/status",
            post(transition_reservation),
        )
}
