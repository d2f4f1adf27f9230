use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, QueryBuilder, Sqlite, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

/// All venue columns, in the order the struct declares them.
pub(crate) const VENUE_COLUMNS: &str = "id, slug, name, description, address, city, state, zip, \
     phone, website, latitude, longitude, table_types, amenities, num_tables, is_claimed, \
     owner_id, is_active, rating, review_count, created_at, updated_at";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Venue {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[sqlx(json)]
    pub table_types: Vec<String>,
    #[sqlx(json)]
    pub amenities: Vec<String>,
    pub num_tables: i64,
    pub is_claimed: bool,
    pub owner_id: Option<Uuid>,
    pub is_active: bool,
    pub rating: Option<f64>,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateVenue {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub table_types: Vec<String>,
    pub amenities: Vec<String>,
    pub num_tables: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateVenue {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub table_types: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub num_tables: Option<i64>,
}

/// Sanitized filter set applied by [`Venue::search`]. A `None` field means no
/// filter on that dimension; set filters use overlap semantics (the venue
/// matches when it has at least one of the requested values).
#[derive(Debug, Clone, Default)]
pub struct VenueFilters {
    pub query: Option<String>,
    pub state: Option<String>,
    pub table_types: Vec<String>,
    pub amenities: Vec<String>,
}

impl Venue {
    fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filters: &VenueFilters) {
        qb.push(" WHERE is_active = 1");
        if let Some(state) = &filters.state {
            qb.push(" AND state = ").push_bind(state.clone());
        }
        if let Some(query) = &filters.query {
            let pattern = format!("%{}%", query);
            qb.push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR city LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if !filters.table_types.is_empty() {
            qb.push(" AND EXISTS (SELECT 1 FROM json_each(venues.table_types) WHERE json_each.value IN (");
            let mut separated = qb.separated(", ");
            for value in &filters.table_types {
                separated.push_bind(value.clone());
            }
            qb.push("))");
        }
        if !filters.amenities.is_empty() {
            qb.push(" AND EXISTS (SELECT 1 FROM json_each(venues.amenities) WHERE json_each.value IN (");
            let mut separated = qb.separated(", ");
            for value in &filters.amenities {
                separated.push_bind(value.clone());
            }
            qb.push("))");
        }
    }

    /// One page of matching venues plus the total match count. Claimed venues
    /// sort first, then alphabetically by name.
    pub async fn search(
        pool: &SqlitePool,
        filters: &VenueFilters,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM venues");
        Self::push_filters(&mut count_qb, filters);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {VENUE_COLUMNS} FROM venues"));
        Self::push_filters(&mut qb, filters);
        qb.push(" ORDER BY is_claimed DESC, name COLLATE NOCASE ASC, id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let venues = qb.build_query_as::<Venue>().fetch_all(pool).await?;

        Ok((venues, total))
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Every active venue with coordinates, for application-side distance
    /// computation when the store cannot do it.
    pub async fn find_all_geocoded(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues
             WHERE is_active = 1 AND latitude IS NOT NULL AND longitude IS NOT NULL"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        slug: &str,
        data: &CreateVenue,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Venue>(&format!(
            "INSERT INTO venues (id, slug, name, description, address, city, state, zip, phone, \
             website, latitude, longitude, table_types, amenities, num_tables)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {VENUE_COLUMNS}"
        ))
        .bind(id)
        .bind(slug)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state)
        .bind(&data.zip)
        .bind(&data.phone)
        .bind(&data.website)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(Json(&data.table_types))
        .bind(Json(&data.amenities))
        .bind(data.num_tables)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateVenue,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Venue>(&format!(
            "UPDATE venues SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                state = COALESCE($6, state),
                zip = COALESCE($7, zip),
                phone = COALESCE($8, phone),
                website = COALESCE($9, website),
                latitude = COALESCE($10, latitude),
                longitude = COALESCE($11, longitude),
                table_types = COALESCE($12, table_types),
                amenities = COALESCE($13, amenities),
                num_tables = COALESCE($14, num_tables),
                updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {VENUE_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.state)
        .bind(&data.zip)
        .bind(&data.phone)
        .bind(&data.website)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.table_types.as_ref().map(Json))
        .bind(data.amenities.as_ref().map(Json))
        .bind(data.num_tables)
        .fetch_one(pool)
        .await
    }

    /// Soft delete. Listings filter on is_active, so the row stays behind for
    /// existing reservations and reviews.
    pub async fn deactivate(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE venues SET is_active = 0, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Marks the venue claimed by `owner_id`. Only the claim-approval path
    /// calls this, inside the same transaction that approves the claim.
    pub async fn mark_claimed<'e, E>(
        executor: E,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE venues SET is_claimed = 1, owner_id = $2, updated_at = datetime('now', 'subsec')
             WHERE id = $1",
        )
        .bind(id)
        .bind(owner_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_rating(
        pool: &SqlitePool,
        id: Uuid,
        rating: Option<f64>,
        review_count: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE venues SET rating = $2, review_count = $3, updated_at = datetime('now', 'subsec')
             WHERE id = $1",
        )
        .bind(id)
        .bind(rating)
        .bind(review_count)
        .execute(pool)
        .await?;
        Ok(())
    }
}
