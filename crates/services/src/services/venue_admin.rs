//! Venue management: admin creation, owner edits, tables and hours.

use db::models::{
    pool_table::{CreatePoolTable, PoolTable},
    venue::{CreateVenue, UpdateVenue, Venue},
    venue_hours::{SetVenueHours, VenueHours},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use utils::auth::UserContext;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum VenueAdminError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("venue not found")]
    VenueNotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("not allowed")]
    Forbidden,
}

pub struct VenueAdminService;

impl VenueAdminService {
    pub async fn create(
        pool: &SqlitePool,
        user: &UserContext,
        data: &CreateVenue,
    ) -> Result<Venue, VenueAdminError> {
        if !user.is_admin() {
            return Err(VenueAdminError::Forbidden);
        }
        if data.name.trim().is_empty() {
            return Err(VenueAdminError::InvalidInput("name is required".to_string()));
        }

        let slug = Self::unique_slug(pool, &data.name).await?;
        let venue = Venue::create(pool, Uuid::new_v4(), &slug, data).await?;
        info!(venue_id = %venue.id, slug = %venue.slug, "venue created");
        Ok(venue)
    }

    pub async fn update(
        pool: &SqlitePool,
        user: &UserContext,
        venue_id: Uuid,
        data: &UpdateVenue,
    ) -> Result<Venue, VenueAdminError> {
        Self::authorize_manage(pool, user, venue_id).await?;
        Ok(Venue::update(pool, venue_id, data).await?)
    }

    pub async fn deactivate(
        pool: &SqlitePool,
        user: &UserContext,
        venue_id: Uuid,
    ) -> Result<(), VenueAdminError> {
        if !user.is_admin() {
            return Err(VenueAdminError::Forbidden);
        }
        if Venue::deactivate(pool, venue_id).await? == 0 {
            return Err(VenueAdminError::VenueNotFound);
        }
        Ok(())
    }

    pub async fn add_table(
        pool: &SqlitePool,
        user: &UserContext,
        venue_id: Uuid,
        data: &CreatePoolTable,
    ) -> Result<PoolTable, VenueAdminError> {
        Self::authorize_manage(pool, user, venue_id).await?;
        Ok(PoolTable::create(pool, Uuid::new_v4(), venue_id, data).await?)
    }

    pub async fn set_hours(
        pool: &SqlitePool,
        user: &UserContext,
        venue_id: Uuid,
        entries: &[SetVenueHours],
    ) -> Result<Vec<VenueHours>, VenueAdminError> {
        Self::authorize_manage(pool, user, venue_id).await?;
        for entry in entries {
            if !(0..=6).contains(&entry.day_of_week) {
                return Err(VenueAdminError::InvalidInput(
                    "day_of_week must be between 0 and 6".to_string(),
                ));
            }
            if !entry.is_closed && (entry.open_time.is_none() || entry.close_time.is_none()) {
                return Err(VenueAdminError::InvalidInput(
                    "open days need both open_time and close_time".to_string(),
                ));
            }
        }
        for entry in entries {
            VenueHours::upsert(pool, venue_id, entry).await?;
        }
        Ok(VenueHours::find_by_venue_id(pool, venue_id).await?)
    }

    /// Edits are allowed for admins and the venue's claimed owner.
    async fn authorize_manage(
        pool: &SqlitePool,
        user: &UserContext,
        venue_id: Uuid,
    ) -> Result<Venue, VenueAdminError> {
        let venue = Venue::find_by_id(pool, venue_id)
            .await?
            .ok_or(VenueAdminError::VenueNotFound)?;
        if user.is_admin() || venue.owner_id == Some(user.id) {
            Ok(venue)
        } else {
            Err(VenueAdminError::Forbidden)
        }
    }

    async fn unique_slug(pool: &SqlitePool, name: &str) -> Result<String, VenueAdminError> {
        let base = slugify(name);
        let mut candidate = base.clone();
        let mut n = 1;
        while Venue::find_by_slug(pool, &candidate).await?.is_some() {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        Ok(candidate)
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Rack City Billiards"), "rack-city-billiards");
        assert_eq!(slugify("Eddie's  Pool & Pints!"), "eddie-s-pool-pints");
        assert_eq!(slugify("---"), "");
    }
}
