use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

const RESERVATION_COLUMNS: &str =
    "id, venue_id, table_id, user_id, start_time, end_time, party_size, status, table_type, \
     any_table, special_requests, confirmed_at, cancelled_at, created_at, updated_at";

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    /// pending -> confirmed -> {completed | cancelled | no_show}; terminal
    /// states have no exits.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed | Self::NoShow)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Reservation {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub table_id: Option<Uuid>,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub party_size: i64,
    pub status: ReservationStatus,
    pub table_type: Option<String>,
    pub any_table: bool,
    pub special_requests: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE user_id = $1
             ORDER BY start_time DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Reservations that count against capacity on a calendar day: start_time
    /// inside [day_start, day_end), cancelled and no-show rows excluded.
    pub async fn find_active_for_venue_day(
        pool: &SqlitePool,
        venue_id: Uuid,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE venue_id = $1
               AND start_time >= $2 AND start_time < $3
               AND status NOT IN ('cancelled', 'no_show')
             ORDER BY start_time ASC"
        ))
        .bind(venue_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_all(pool)
        .await
    }

    /// Guarded insert for a booking with no table preference. The insert only
    /// happens while venue-wide capacity remains for the [start, end) window;
    /// the guard and the insert are one statement, so concurrent bookings for
    /// the last table cannot both pass. Returns None when capacity is gone.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_unassigned_if_capacity(
        pool: &SqlitePool,
        id: Uuid,
        venue_id: Uuid,
        user_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        party_size: i64,
        special_requests: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "INSERT INTO reservations (id, venue_id, table_id, user_id, start_time, end_time, \
                                       party_size, status, table_type, any_table, \
                                       special_requests, confirmed_at)
             SELECT $1, $2, NULL, $3, $4, $5, $6, 'confirmed', NULL, 1, $7, datetime('now', 'subsec')
             WHERE (SELECT COUNT(*) FROM pool_tables p
                     WHERE p.venue_id = $2 AND p.is_available = 1)
                 > (SELECT COUNT(*) FROM reservations r
                     WHERE r.venue_id = $2
                       AND r.status NOT IN ('cancelled', 'no_show')
                       AND r.start_time < $5 AND r.end_time > $4)
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(id)
        .bind(venue_id)
        .bind(user_id)
        .bind(start_time)
        .bind(end_time)
        .bind(party_size)
        .bind(special_requests)
        .fetch_optional(pool)
        .await
    }

    /// Guarded insert that also resolves a specific table. Picks the first
    /// available table (optionally of the requested type) with no overlapping
    /// reservation in [start, end); inserts nothing when none qualifies.
    /// Resolution, guard and insert are a single statement for the same
    /// atomicity reason as above.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_with_table_if_free(
        pool: &SqlitePool,
        id: Uuid,
        venue_id: Uuid,
        user_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        party_size: i64,
        table_type: Option<&str>,
        special_requests: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "INSERT INTO reservations (id, venue_id, table_id, user_id, start_time, end_time, \
                                       party_size, status, table_type, any_table, \
                                       special_requests, confirmed_at)
             SELECT $1, $2,
                    (SELECT p.id FROM pool_tables p
                      WHERE p.venue_id = $2 AND p.is_available = 1
                        AND ($8 IS NULL OR p.table_type = $8)
                        AND NOT EXISTS (
                            SELECT 1 FROM reservations r
                             WHERE r.table_id = p.id
                               AND r.status NOT IN ('cancelled', 'no_show')
                               AND r.start_time < $5 AND r.end_time > $4)
                      ORDER BY p.display_order ASC, p.id ASC
                      LIMIT 1),
                    $3, $4, $5, $6, 'confirmed', $8, 0, $7, datetime('now', 'subsec')
             WHERE (SELECT p.id FROM pool_tables p
                      WHERE p.venue_id = $2 AND p.is_available = 1
                        AND ($8 IS NULL OR p.table_type = $8)
                        AND NOT EXISTS (
                            SELECT 1 FROM reservations r
                             WHERE r.table_id = p.id
                               AND r.status NOT IN ('cancelled', 'no_show')
                               AND r.start_time < $5 AND r.end_time > $4)
                      ORDER BY p.display_order ASC, p.id ASC
                      LIMIT 1) IS NOT NULL
               AND (SELECT COUNT(*) FROM pool_tables p
                     WHERE p.venue_id = $2 AND p.is_available = 1)
                 > (SELECT COUNT(*) FROM reservations r
                     WHERE r.venue_id = $2
                       AND r.status NOT IN ('cancelled', 'no_show')
                       AND r.start_time < $5 AND r.end_time > $4)
             RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(id)
        .bind(venue_id)
        .bind(user_id)
        .bind(start_time)
        .bind(end_time)
        .bind(party_size)
        .bind(special_requests)
        .bind(table_type)
        .fetch_optional(pool)
        .await
    }

    /// Owner-scoped cancellation; only pending and confirmed rows qualify.
    /// Returns the number of rows touched so the caller can tell a stale or
    /// foreign id from a successful cancel.
    pub async fn cancel(pool: &SqlitePool, id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations
             SET status = 'cancelled',
                 cancelled_at = datetime('now', 'subsec'),
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1 AND user_id = $2 AND status IN ('pending', 'confirmed')",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE reservations SET status = $2, updated_at = datetime('now', 'subsec')
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// True when the user has a completed reservation at the venue; reviews
    /// referencing one are marked verified.
    pub async fn has_completed_for_user(
        pool: &SqlitePool,
        venue_id: Uuid,
        user_id: Uuid,
        reservation_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations
             WHERE id = $1 AND venue_id = $2 AND user_id = $3 AND status = 'completed'",
        )
        .bind(reservation_id)
        .bind(venue_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_transitions() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        use ReservationStatus::*;
        for terminal in [Cancelled, Completed, NoShow] {
            assert!(terminal.is_terminal());
            for next in [Pending, Confirmed, Cancelled, Completed, NoShow] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
