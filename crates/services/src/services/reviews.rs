//! Venue reviews and the rating aggregate written back onto the venue.

use db::models::{
    reservation::Reservation,
    review::{CreateReview, Review},
    venue::Venue,
};
use sqlx::SqlitePool;
use thiserror::Error;
use utils::auth::UserContext;
use uuid::Uuid;

const REVIEW_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("venue not found")]
    VenueNotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("you have already reviewed this venue")]
    AlreadyReviewed,
}

pub struct ReviewsService;

impl ReviewsService {
    /// One review per user per venue. A review referencing the user's own
    /// completed reservation at this venue is marked verified. The venue's
    /// aggregate rating is recomputed after the write.
    pub async fn create(
        pool: &SqlitePool,
        user: &UserContext,
        venue_id: Uuid,
        data: &CreateReview,
    ) -> Result<Review, ReviewError> {
        for (label, value) in [
            ("rating", Some(data.rating)),
            ("tables_rating", data.tables_rating),
            ("atmosphere_rating", data.atmosphere_rating),
            ("service_rating", data.service_rating),
            ("value_rating", data.value_rating),
        ] {
            if let Some(value) = value {
                if !(1..=5).contains(&value) {
                    return Err(ReviewError::InvalidInput(format!(
                        "{label} must be between 1 and 5"
                    )));
                }
            }
        }

        let venue = Venue::find_by_id(pool, venue_id)
            .await?
            .ok_or(ReviewError::VenueNotFound)?;
        if Review::exists_for_user(pool, venue_id, user.id).await? {
            return Err(ReviewError::AlreadyReviewed);
        }

        let is_verified = match data.reservation_id {
            Some(reservation_id) => {
                Reservation::has_completed_for_user(pool, venue_id, user.id, reservation_id).await?
            }
            None => false,
        };

        let review =
            Review::create(pool, Uuid::new_v4(), venue_id, user.id, data, is_verified).await?;

        let summary = Review::rating_summary(pool, venue_id).await?;
        Venue::update_rating(pool, venue.id, summary.average, summary.count).await?;

        Ok(review)
    }

    pub async fn list_for_venue(
        pool: &SqlitePool,
        venue_id: Uuid,
    ) -> Result<Vec<Review>, ReviewError> {
        if Venue::find_by_id(pool, venue_id).await?.is_none() {
            return Err(ReviewError::VenueNotFound);
        }
        Ok(Review::find_by_venue_id(pool, venue_id, REVIEW_PAGE_LIMIT).await?)
    }
}
