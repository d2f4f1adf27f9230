//! Venue ownership claims: submission and admin review.

use db::models::{
    claim::{Claim, ClaimStatus, CreateClaim},
    venue::Venue,
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use utils::auth::UserContext;
use uuid::Uuid;

use super::crm_sync::{CrmEvent, CrmSyncService};

#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("venue not found")]
    VenueNotFound,
    #[error("claim not found")]
    ClaimNotFound,
    #[error("venue is already claimed")]
    AlreadyClaimed,
    #[error("you already have a pending claim for this venue")]
    DuplicateClaim,
    #[error("claim has already been reviewed")]
    AlreadyReviewed,
    #[error("not allowed")]
    Forbidden,
}

pub struct ClaimsService;

impl ClaimsService {
    pub async fn submit(
        pool: &SqlitePool,
        events: &CrmSyncService,
        user: &UserContext,
        venue_id: Uuid,
        data: &CreateClaim,
    ) -> Result<Claim, ClaimError> {
        let venue = Venue::find_by_id(pool, venue_id)
            .await?
            .ok_or(ClaimError::VenueNotFound)?;
        if venue.is_claimed {
            return Err(ClaimError::AlreadyClaimed);
        }
        if Claim::has_open_claim(pool, venue_id, user.id).await? {
            return Err(ClaimError::DuplicateClaim);
        }

        let claim = Claim::create(pool, Uuid::new_v4(), venue_id, user.id, data).await?;
        events.enqueue(CrmEvent::ClaimSubmitted {
            claim_id: claim.id,
            venue_id,
            user_id: user.id,
            business_email: claim.business_email.clone(),
        });
        info!(claim_id = %claim.id, venue_id = %venue_id, "claim submitted");
        Ok(claim)
    }

    pub async fn list_for_user(
        pool: &SqlitePool,
        user: &UserContext,
    ) -> Result<Vec<Claim>, ClaimError> {
        Ok(Claim::find_by_user_id(pool, user.id).await?)
    }

    pub async fn list_pending(
        pool: &SqlitePool,
        user: &UserContext,
    ) -> Result<Vec<Claim>, ClaimError> {
        if !user.is_admin() {
            return Err(ClaimError::Forbidden);
        }
        Ok(Claim::find_pending(pool).await?)
    }

    /// Approve a pending claim: flips the claim and marks the venue claimed
    /// in one transaction, then mirrors to the CRM.
    pub async fn approve(
        pool: &SqlitePool,
        events: &CrmSyncService,
        admin: &UserContext,
        claim_id: Uuid,
    ) -> Result<Claim, ClaimError> {
        if !admin.is_admin() {
            return Err(ClaimError::Forbidden);
        }
        let claim = Claim::find_by_id(pool, claim_id)
            .await?
            .ok_or(ClaimError::ClaimNotFound)?;

        let mut tx = pool.begin().await?;
        let resolved = Claim::resolve(&mut *tx, claim_id, ClaimStatus::Approved, admin.id).await?;
        if resolved == 0 {
            tx.rollback().await?;
            return Err(ClaimError::AlreadyReviewed);
        }
        Venue::mark_claimed(&mut *tx, claim.venue_id, claim.user_id).await?;
        tx.commit().await?;

        events.enqueue(CrmEvent::ClaimApproved {
            claim_id,
            venue_id: claim.venue_id,
            owner_id: claim.user_id,
        });
        info!(claim_id = %claim_id, venue_id = %claim.venue_id, "claim approved");

        Claim::find_by_id(pool, claim_id)
            .await?
            .ok_or(ClaimError::ClaimNotFound)
    }

    pub async fn reject(
        pool: &SqlitePool,
        admin: &UserContext,
        claim_id: Uuid,
    ) -> Result<Claim, ClaimError> {
        if !admin.is_admin() {
            return Err(ClaimError::Forbidden);
        }
        if Claim::resolve(pool, claim_id, ClaimStatus::Rejected, admin.id).await? == 0 {
            // either no such claim or it was already reviewed
            return match Claim::find_by_id(pool, claim_id).await? {
                Some(_) => Err(ClaimError::AlreadyReviewed),
                None => Err(ClaimError::ClaimNotFound),
            };
        }
        Claim::find_by_id(pool, claim_id)
            .await?
            .ok_or(ClaimError::ClaimNotFound)
    }
}
