use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A contact inquiry, optionally tied to a venue. Mirrored to the CRM
/// collaborator after insert, fire-and-forget.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Lead {
    pub id: Uuid,
    pub venue_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateLead {
    pub venue_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl Lead {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateLead,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Lead>(
            "INSERT INTO leads (id, venue_id, name, email, phone, message)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, venue_id, name, email, phone, message, created_at",
        )
        .bind(id)
        .bind(data.venue_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.message)
        .fetch_one(pool)
        .await
    }
}
