use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

const REVIEW_COLUMNS: &str =
    "id, venue_id, user_id, reservation_id, rating, tables_rating, atmosphere_rating, \
     service_rating, value_rating, comment, is_verified, created_at, updated_at";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Review {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    pub reservation_id: Option<Uuid>,
    pub rating: i64,
    pub tables_rating: Option<i64>,
    pub atmosphere_rating: Option<i64>,
    pub service_rating: Option<i64>,
    pub value_rating: Option<i64>,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateReview {
    pub rating: i64,
    pub tables_rating: Option<i64>,
    pub atmosphere_rating: Option<i64>,
    pub service_rating: Option<i64>,
    pub value_rating: Option<i64>,
    pub comment: Option<String>,
    pub reservation_id: Option<Uuid>,
}

/// Aggregate read over a venue's reviews, written back onto the venue row.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: i64,
}

impl Review {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        venue_id: Uuid,
        user_id: Uuid,
        data: &CreateReview,
        is_verified: bool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (id, venue_id, user_id, reservation_id, rating, tables_rating, \
                                  atmosphere_rating, service_rating, value_rating, comment, is_verified)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(id)
        .bind(venue_id)
        .bind(user_id)
        .bind(data.reservation_id)
        .bind(data.rating)
        .bind(data.tables_rating)
        .bind(data.atmosphere_rating)
        .bind(data.service_rating)
        .bind(data.value_rating)
        .bind(&data.comment)
        .bind(is_verified)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_venue_id(
        pool: &SqlitePool,
        venue_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews
             WHERE venue_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        ))
        .bind(venue_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn exists_for_user(
        pool: &SqlitePool,
        venue_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE venue_id = $1 AND user_id = $2")
                .bind(venue_id)
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }

    pub async fn rating_summary(
        pool: &SqlitePool,
        venue_id: Uuid,
    ) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT AVG(rating) AS average, COUNT(*) AS count FROM reviews WHERE venue_id = $1",
        )
        .bind(venue_id)
        .fetch_one(pool)
        .await
    }
}
