//! Reservation writer.
//!
//! The upstream flow inserted without re-checking capacity, so two concurrent
//! bookings for the last table could both land. That gap is closed here: the
//! capacity guard and the insert are a single statement (see the guarded
//! inserts on the Reservation model), so exactly one of two racing bookings
//! for the final table wins and the other gets [`BookingError::SlotUnavailable`].

use chrono::{Duration, NaiveDate, NaiveTime};
use db::models::{
    reservation::{Reservation, ReservationStatus},
    venue::Venue,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use utils::auth::UserContext;
use uuid::Uuid;

const MIN_DURATION_MINUTES: i64 = 30;
const MAX_DURATION_MINUTES: i64 = 480;
const MAX_PARTY_SIZE: i64 = 20;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    InvalidInput(String),
    #[error("venue not found")]
    VenueNotFound,
    #[error("reservation not found")]
    ReservationNotFound,
    #[error("slot no longer available")]
    SlotUnavailable,
    #[error("reservation cannot change from {0} to {1}")]
    InvalidTransition(ReservationStatus, ReservationStatus),
    #[error("not allowed")]
    Forbidden,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateReservationRequest {
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub party_size: i64,
    pub table_type: Option<String>,
    /// When false the guest insists on a pre-assigned table even without a
    /// type preference.
    pub any_table: Option<bool>,
    pub special_requests: Option<String>,
}

pub struct BookingService;

impl BookingService {
    /// Create a confirmed reservation for `user`. Validation happens before
    /// any store access; the capacity check happens atomically with the
    /// insert.
    pub async fn create(
        pool: &SqlitePool,
        user: &UserContext,
        request: &CreateReservationRequest,
    ) -> Result<Reservation, BookingError> {
        Self::validate(request)?;

        let venue = Venue::find_by_id(pool, request.venue_id)
            .await?
            .ok_or(BookingError::VenueNotFound)?;
        if !venue.is_active {
            return Err(BookingError::VenueNotFound);
        }

        let start_time = request.date.and_time(request.start_time).and_utc();
        let end_time = start_time + Duration::minutes(request.duration_minutes);

        let any_table = request.any_table.unwrap_or(true);
        let wants_specific_table = request.table_type.is_some() || !any_table;

        let id = Uuid::new_v4();
        let inserted = if wants_specific_table {
            Reservation::insert_with_table_if_free(
                pool,
                id,
                venue.id,
                user.id,
                start_time,
                end_time,
                request.party_size,
                request.table_type.as_deref(),
                request.special_requests.as_deref(),
            )
            .await?
        } else {
            Reservation::insert_unassigned_if_capacity(
                pool,
                id,
                venue.id,
                user.id,
                start_time,
                end_time,
                request.party_size,
                request.special_requests.as_deref(),
            )
            .await?
        };

        let reservation = inserted.ok_or(BookingError::SlotUnavailable)?;
        info!(
            reservation_id = %reservation.id,
            venue_id = %venue.id,
            start = %reservation.start_time,
            "reservation confirmed"
        );
        Ok(reservation)
    }

    /// Cancellation by the owning user, from pending or confirmed only.
    pub async fn cancel(
        pool: &SqlitePool,
        user: &UserContext,
        reservation_id: Uuid,
    ) -> Result<Reservation, BookingError> {
        let reservation = Reservation::find_by_id(pool, reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;
        if reservation.user_id != user.id {
            // Ownership predicates report not-found, not forbidden, so a
            // guessing caller learns nothing.
            return Err(BookingError::ReservationNotFound);
        }
        if Reservation::cancel(pool, reservation_id, user.id).await? == 0 {
            return Err(BookingError::InvalidTransition(
                reservation.status,
                ReservationStatus::Cancelled,
            ));
        }
        Reservation::find_by_id(pool, reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound)
    }

    /// Operational transition (check-in to completed, no-show marking) by the
    /// venue owner or an admin.
    pub async fn transition(
        pool: &SqlitePool,
        user: &UserContext,
        reservation_id: Uuid,
        next: ReservationStatus,
    ) -> Result<Reservation, BookingError> {
        let reservation = Reservation::find_by_id(pool, reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound)?;
        let venue = Venue::find_by_id(pool, reservation.venue_id)
            .await?
            .ok_or(BookingError::VenueNotFound)?;

        let is_venue_owner = venue.owner_id == Some(user.id);
        if !user.is_admin() && !is_venue_owner {
            return Err(BookingError::Forbidden);
        }
        if !reservation.status.can_transition_to(next) {
            return Err(BookingError::InvalidTransition(reservation.status, next));
        }

        Reservation::update_status(pool, reservation_id, next).await?;
        Reservation::find_by_id(pool, reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound)
    }

    pub async fn list_for_user(
        pool: &SqlitePool,
        user: &UserContext,
    ) -> Result<Vec<Reservation>, BookingError> {
        Ok(Reservation::find_by_user_id(pool, user.id).await?)
    }

    fn validate(request: &CreateReservationRequest) -> Result<(), BookingError> {
        if request.duration_minutes < MIN_DURATION_MINUTES
            || request.duration_minutes > MAX_DURATION_MINUTES
        {
            return Err(BookingError::InvalidInput(format!(
                "duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
            )));
        }
        if request.party_size < 1 || request.party_size > MAX_PARTY_SIZE {
            return Err(BookingError::InvalidInput(format!(
                "party size must be between 1 and {MAX_PARTY_SIZE}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(duration: i64, party: i64) -> CreateReservationRequest {
        CreateReservationRequest {
            venue_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration_minutes: duration,
            party_size: party,
            table_type: None,
            any_table: Some(true),
            special_requests: None,
        }
    }

    #[test]
    fn rejects_out_of_range_duration() {
        assert!(BookingService::validate(&request(15, 2)).is_err());
        assert!(BookingService::validate(&request(481, 2)).is_err());
        assert!(BookingService::validate(&request(60, 2)).is_ok());
    }

    #[test]
    fn rejects_bad_party_size() {
        assert!(BookingService::validate(&request(60, 0)).is_err());
        assert!(BookingService::validate(&request(60, 21)).is_err());
        assert!(BookingService::validate(&request(60, 20)).is_ok());
    }
}
