mod common;

use common::{admin, player, seed_hours, seed_tables, seed_venue, test_db, venue_data};
use db::models::{
    claim::CreateClaim,
    reservation::ReservationStatus,
    review::CreateReview,
    venue::Venue,
};
use services::services::{
    booking::{BookingService, CreateReservationRequest},
    claims::{ClaimError, ClaimsService},
    crm_sync::CrmSyncService,
    reviews::{ReviewError, ReviewsService},
};

fn claim_data() -> CreateClaim {
    CreateClaim {
        business_email: "owner@hall.example".to_string(),
        business_phone: Some("+1-512-555-0100".to_string()),
        proof_note: Some("Listed as registered agent".to_string()),
    }
}

fn review_data(rating: i64) -> CreateReview {
    CreateReview {
        rating,
        tables_rating: Some(rating),
        atmosphere_rating: None,
        service_rating: None,
        value_rating: None,
        comment: Some("Solid felt, straight rails.".to_string()),
        reservation_id: None,
    }
}

#[tokio::test]
async fn approving_a_claim_marks_the_venue_claimed() {
    let harness = test_db().await;
    let pool = &harness.db.pool;
    let events = CrmSyncService::disabled();
    let venue = seed_venue(&harness.db, &venue_data("Claimable", "Austin", "TX")).await;

    let claimant = player();
    let claim = ClaimsService::submit(pool, &events, &claimant, venue.id, &claim_data())
        .await
        .unwrap();

    // duplicate pending claim by the same user is rejected
    assert!(matches!(
        ClaimsService::submit(pool, &events, &claimant, venue.id, &claim_data()).await,
        Err(ClaimError::DuplicateClaim)
    ));

    let reviewer = admin();
    ClaimsService::approve(pool, &events, &reviewer, claim.id)
        .await
        .unwrap();

    let venue = Venue::find_by_id(pool, venue.id).await.unwrap().unwrap();
    assert!(venue.is_claimed);
    assert_eq!(venue.owner_id, Some(claimant.id));

    // a reviewed claim cannot be approved twice
    assert!(matches!(
        ClaimsService::approve(pool, &events, &reviewer, claim.id).await,
        Err(ClaimError::AlreadyReviewed)
    ));

    // and a claimed venue accepts no further claims
    assert!(matches!(
        ClaimsService::submit(pool, &events, &player(), venue.id, &claim_data()).await,
        Err(ClaimError::AlreadyClaimed)
    ));
}

#[tokio::test]
async fn non_admins_cannot_review_claims() {
    let harness = test_db().await;
    let pool = &harness.db.pool;
    let events = CrmSyncService::disabled();
    let venue = seed_venue(&harness.db, &venue_data("Guarded", "Austin", "TX")).await;

    let claim = ClaimsService::submit(pool, &events, &player(), venue.id, &claim_data())
        .await
        .unwrap();

    let nobody = player();
    assert!(matches!(
        ClaimsService::approve(pool, &events, &nobody, claim.id).await,
        Err(ClaimError::Forbidden)
    ));
    assert!(matches!(
        ClaimsService::list_pending(pool, &nobody).await,
        Err(ClaimError::Forbidden)
    ));
}

#[tokio::test]
async fn reviews_aggregate_onto_the_venue() {
    let harness = test_db().await;
    let pool = &harness.db.pool;
    let venue = seed_venue(&harness.db, &venue_data("Rated Hall", "Austin", "TX")).await;

    ReviewsService::create(pool, &player(), venue.id, &review_data(5))
        .await
        .unwrap();
    ReviewsService::create(pool, &player(), venue.id, &review_data(3))
        .await
        .unwrap();

    let venue = Venue::find_by_id(pool, venue.id).await.unwrap().unwrap();
    assert_eq!(venue.review_count, 2);
    assert!((venue.rating.unwrap() - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn one_review_per_user_and_rating_bounds() {
    let harness = test_db().await;
    let pool = &harness.db.pool;
    let venue = seed_venue(&harness.db, &venue_data("Once Only", "Austin", "TX")).await;

    let reviewer = player();
    ReviewsService::create(pool, &reviewer, venue.id, &review_data(4))
        .await
        .unwrap();
    assert!(matches!(
        ReviewsService::create(pool, &reviewer, venue.id, &review_data(2)).await,
        Err(ReviewError::AlreadyReviewed)
    ));

    assert!(matches!(
        ReviewsService::create(pool, &player(), venue.id, &review_data(6)).await,
        Err(ReviewError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn review_is_verified_by_a_completed_reservation() {
    let harness = test_db().await;
    let pool = &harness.db.pool;
    let venue = seed_venue(&harness.db, &venue_data("Verified Hall", "Austin", "TX")).await;
    seed_tables(&harness.db, venue.id, 2, "8-ball").await;
    seed_hours(&harness.db, venue.id, 1, "10:00:00", "22:00:00").await;

    let guest = player();
    let reservation = BookingService::create(
        pool,
        &guest,
        &CreateReservationRequest {
            venue_id: venue.id,
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            start_time: "18:00:00".parse().unwrap(),
            duration_minutes: 60,
            party_size: 2,
            table_type: None,
            any_table: Some(true),
            special_requests: None,
        },
    )
    .await
    .unwrap();
    BookingService::transition(pool, &admin(), reservation.id, ReservationStatus::Completed)
        .await
        .unwrap();

    let mut data = review_data(5);
    data.reservation_id = Some(reservation.id);
    let review = ReviewsService::create(pool, &guest, venue.id, &data)
        .await
        .unwrap();
    assert!(review.is_verified);

    // a different user pointing at someone else's reservation stays unverified
    let mut stolen = review_data(4);
    stolen.reservation_id = Some(reservation.id);
    let unverified = ReviewsService::create(pool, &player(), venue.id, &stolen)
        .await
        .unwrap();
    assert!(!unverified.is_verified);
}
