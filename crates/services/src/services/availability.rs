//! Table availability for a venue on a calendar date.
//!
//! Slots step every 30 minutes across the venue's open hours; each slot is
//! judged over a 1-hour evaluation window starting at the slot. Generation is
//! start-time-driven: stepping stops once the slot start reaches close time,
//! and the last window is NOT clipped to close time. Kept that way on purpose;
//! clipping would change which late slots report availability.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use db::models::{
    pool_table::PoolTable, reservation::Reservation, venue::Venue, venue_hours::VenueHours,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

const SLOT_STEP_MINUTES: i64 = 30;
const SLOT_WINDOW_MINUTES: i64 = 60;

#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("venue not found")]
    VenueNotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub available: bool,
    pub tables_available: i64,
}

pub struct AvailabilityService;

impl AvailabilityService {
    /// Ordered slots for the venue's open hours on `date`. A venue closed
    /// that weekday (or with no hours row) yields an empty list, not an error.
    pub async fn check(
        pool: &SqlitePool,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, AvailabilityError> {
        if Venue::find_by_id(pool, venue_id).await?.is_none() {
            return Err(AvailabilityError::VenueNotFound);
        }

        let weekday = date.weekday().num_days_from_sunday() as i64;
        let Some(hours) = VenueHours::find_for_day(pool, venue_id, weekday).await? else {
            return Ok(Vec::new());
        };
        if hours.is_closed {
            return Ok(Vec::new());
        }
        let (Some(open), Some(close)) = (hours.open_time, hours.close_time) else {
            return Ok(Vec::new());
        };

        let total_tables = PoolTable::count_available(pool, venue_id).await?;

        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);
        let reservations =
            Reservation::find_active_for_venue_day(pool, venue_id, day_start, day_end).await?;
        let occupied: Vec<(DateTime<Utc>, DateTime<Utc>)> = reservations
            .into_iter()
            .map(|r| (r.start_time, r.end_time))
            .collect();

        Ok(build_slots(date, open, close, total_tables, &occupied))
    }
}

/// The slot walk itself, over already-loaded state. `occupied` holds the
/// [start, end) intervals of reservations that count against capacity.
pub fn build_slots(
    date: NaiveDate,
    open: NaiveTime,
    close: NaiveTime,
    total_tables: i64,
    occupied: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<TimeSlot> {
    let close_at = date.and_time(close).and_utc();
    let mut cursor = date.and_time(open).and_utc();
    let mut slots = Vec::new();

    while cursor < close_at {
        let window_end = cursor + Duration::minutes(SLOT_WINDOW_MINUTES);
        let overlapping = occupied
            .iter()
            .filter(|(res_start, res_end)| cursor < *res_end && window_end > *res_start)
            .count() as i64;
        let tables_available = (total_tables - overlapping).max(0);
        slots.push(TimeSlot {
            start_time: cursor.time(),
            end_time: window_end.time(),
            available: tables_available > 0,
            tables_available,
        });
        cursor += Duration::minutes(SLOT_STEP_MINUTES);
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn interval(start: NaiveTime, end: NaiveTime) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            date().and_time(start).and_utc(),
            date().and_time(end).and_utc(),
        )
    }

    #[test]
    fn empty_day_fills_every_slot() {
        let slots = build_slots(date(), t(10, 0), t(22, 0), 4, &[]);
        // 10:00 through 21:30 inclusive, every 30 minutes
        assert_eq!(slots.len(), 24);
        assert_eq!(slots[0].start_time, t(10, 0));
        assert_eq!(slots.last().unwrap().start_time, t(21, 30));
        assert!(slots.iter().all(|s| s.available && s.tables_available == 4));
    }

    #[test]
    fn slot_windows_are_an_hour_wide() {
        let slots = build_slots(date(), t(10, 0), t(22, 0), 1, &[]);
        assert_eq!(slots[0].end_time, t(11, 0));
        // the final window runs past close; generation is start-time-driven
        assert_eq!(slots.last().unwrap().end_time, t(22, 30));
    }

    #[test]
    fn reservation_blocks_every_overlapping_window() {
        // 14:00-15:30 at a one-table venue: the 1-hour windows starting at
        // 13:30, 14:00, 14:30 and 15:00 all overlap; 12:30 and 15:30 do not.
        let occupied = vec![interval(t(14, 0), t(15, 30))];
        let slots = build_slots(date(), t(10, 0), t(22, 0), 1, &occupied);
        let by_start = |start: NaiveTime| slots.iter().find(|s| s.start_time == start).unwrap();

        for blocked in [t(13, 30), t(14, 0), t(14, 30), t(15, 0)] {
            assert!(!by_start(blocked).available, "{blocked} should be blocked");
            assert_eq!(by_start(blocked).tables_available, 0);
        }
        assert!(by_start(t(12, 30)).available);
        // window end is exclusive: [13:00, 14:00) does not overlap a 14:00 start
        assert!(by_start(t(13, 0)).available);
        assert!(by_start(t(15, 30)).available);
    }

    #[test]
    fn capacity_floors_at_zero() {
        let occupied = vec![
            interval(t(12, 0), t(13, 0)),
            interval(t(12, 0), t(13, 0)),
            interval(t(12, 0), t(13, 0)),
        ];
        let slots = build_slots(date(), t(11, 0), t(14, 0), 2, &occupied);
        let noon = slots.iter().find(|s| s.start_time == t(12, 0)).unwrap();
        assert_eq!(noon.tables_available, 0);
        assert!(!noon.available);
    }

    #[test]
    fn unaligned_close_still_bounds_slot_starts() {
        let slots = build_slots(date(), t(10, 0), t(11, 45), 1, &[]);
        // starts at 10:00, 10:30, 11:00, 11:30 — never at or past 11:45
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.start_time < t(11, 45)));
    }

    #[test]
    fn open_equal_to_close_yields_nothing() {
        let slots = build_slots(date(), t(10, 0), t(10, 0), 3, &[]);
        assert!(slots.is_empty());
    }
}
