use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

const CLAIM_COLUMNS: &str =
    "id, venue_id, user_id, business_email, business_phone, proof_note, status, reviewed_by, \
     reviewed_at, created_at, updated_at";

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "claim_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClaimStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// An ownership assertion over a venue. Approval is the only path that sets
/// Venue.is_claimed and Venue.owner_id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Claim {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    pub business_email: String,
    pub business_phone: Option<String>,
    pub proof_note: Option<String>,
    pub status: ClaimStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateClaim {
    pub business_email: String,
    pub business_phone: Option<String>,
    pub proof_note: Option<String>,
}

impl Claim {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        venue_id: Uuid,
        user_id: Uuid,
        data: &CreateClaim,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Claim>(&format!(
            "INSERT INTO claims (id, venue_id, user_id, business_email, business_phone, proof_note)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CLAIM_COLUMNS}"
        ))
        .bind(id)
        .bind(venue_id)
        .bind(user_id)
        .bind(&data.business_email)
        .bind(&data.business_phone)
        .bind(&data.proof_note)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Claim>(&format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Claim>(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_pending(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Claim>(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE status = 'pending' ORDER BY created_at ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn has_open_claim(
        pool: &SqlitePool,
        venue_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM claims
             WHERE venue_id = $1 AND user_id = $2 AND status = 'pending'",
        )
        .bind(venue_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Pending-only status flip; runs inside the approval transaction next to
    /// [`crate::models::venue::Venue::mark_claimed`].
    pub async fn resolve<'e, E>(
        executor: E,
        id: Uuid,
        status: ClaimStatus,
        reviewed_by: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE claims
             SET status = $2,
                 reviewed_by = $3,
                 reviewed_at = datetime('now', 'subsec'),
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(status)
        .bind(reviewed_by)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
