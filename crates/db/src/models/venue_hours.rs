use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

const HOURS_COLUMNS: &str =
    "id, venue_id, day_of_week, open_time, close_time, is_closed, created_at, updated_at";

/// One row per (venue, weekday). `day_of_week` runs 0-6 with 0 = Sunday.
/// These rows define the legal domain for availability slot generation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct VenueHours {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub day_of_week: i64,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SetVenueHours {
    pub day_of_week: i64,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl VenueHours {
    pub async fn find_by_venue_id(
        pool: &SqlitePool,
        venue_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, VenueHours>(&format!(
            "SELECT {HOURS_COLUMNS} FROM venue_hours WHERE venue_id = $1 ORDER BY day_of_week ASC"
        ))
        .bind(venue_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_for_day(
        pool: &SqlitePool,
        venue_id: Uuid,
        day_of_week: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, VenueHours>(&format!(
            "SELECT {HOURS_COLUMNS} FROM venue_hours WHERE venue_id = $1 AND day_of_week = $2"
        ))
        .bind(venue_id)
        .bind(day_of_week)
        .fetch_optional(pool)
        .await
    }

    pub async fn upsert(
        pool: &SqlitePool,
        venue_id: Uuid,
        data: &SetVenueHours,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, VenueHours>(&format!(
            "INSERT INTO venue_hours (id, venue_id, day_of_week, open_time, close_time, is_closed)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT(venue_id, day_of_week) DO UPDATE SET
                open_time = excluded.open_time,
                close_time = excluded.close_time,
                is_closed = excluded.is_closed,
                updated_at = datetime('now', 'subsec')
             RETURNING {HOURS_COLUMNS}"
        ))
        .bind(id)
        .bind(venue_id)
        .bind(data.day_of_week)
        .bind(data.open_time)
        .bind(data.close_time)
        .bind(data.is_closed)
        .fetch_one(pool)
        .await
    }
}
