use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

const TABLE_COLUMNS: &str =
    "id, venue_id, table_type, cloth_color, hourly_rate, is_available, display_order, \
     created_at, updated_at";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PoolTable {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub table_type: String,
    pub cloth_color: Option<String>,
    pub hourly_rate: Option<f64>,
    pub is_available: bool,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePoolTable {
    pub table_type: String,
    pub cloth_color: Option<String>,
    pub hourly_rate: Option<f64>,
    pub is_available: Option<bool>,
    pub display_order: Option<i64>,
}

impl PoolTable {
    pub async fn find_by_venue_id(
        pool: &SqlitePool,
        venue_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PoolTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM pool_tables
             WHERE venue_id = $1
             ORDER BY display_order ASC, created_at ASC"
        ))
        .bind(venue_id)
        .fetch_all(pool)
        .await
    }

    /// Number of tables bookable at the venue right now. This is the capacity
    /// the availability walk and the reservation guard both count against.
    pub async fn count_available<'e, E>(executor: E, venue_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM pool_tables WHERE venue_id = $1 AND is_available = 1",
        )
        .bind(venue_id)
        .fetch_one(executor)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        venue_id: Uuid,
        data: &CreatePoolTable,
    ) -> Result<Self, sqlx::Error> {
        let is_available = data.is_available.unwrap_or(true);
        let display_order = data.display_order.unwrap_or(0);
        sqlx::query_as::<_, PoolTable>(&format!(
            "INSERT INTO pool_tables (id, venue_id, table_type, cloth_color, hourly_rate, is_available, display_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TABLE_COLUMNS}"
        ))
        .bind(id)
        .bind(venue_id)
        .bind(&data.table_type)
        .bind(&data.cloth_color)
        .bind(data.hourly_rate)
        .bind(is_available)
        .bind(display_order)
        .fetch_one(pool)
        .await
    }

    pub async fn set_availability(
        pool: &SqlitePool,
        id: Uuid,
        is_available: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pool_tables SET is_available = $2, updated_at = datetime('now', 'subsec')
             WHERE id = $1",
        )
        .bind(id)
        .bind(is_available)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
