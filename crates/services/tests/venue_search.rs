mod common;

use common::{seed_venue, test_db, venue_data};
use db::models::venue::Venue;
use services::services::{
    geo::GeoService,
    venue_search::{VenueSearchParams, VenueSearchService},
};
use uuid::Uuid;

#[tokio::test]
async fn texas_nine_ball_scenario() {
    let harness = test_db().await;
    let pool = &harness.db.pool;

    // 15 matching Texas venues, a handful that must not match
    for i in 1..=15 {
        let mut data = venue_data(&format!("Billiards {i:02}"), "Austin", "TX");
        data.table_types = vec!["9-ball".to_string(), "8-ball".to_string()];
        let venue = seed_venue(&harness.db, &data).await;
        // two claimed venues must lead the ordering
        if i == 5 || i == 12 {
            Venue::mark_claimed(pool, venue.id, Uuid::new_v4())
                .await
                .unwrap();
        }
    }
    let mut other_state = venue_data("Oklahoma Rack", "Tulsa", "OK");
    other_state.table_types = vec!["9-ball".to_string()];
    seed_venue(&harness.db, &other_state).await;

    let mut wrong_tables = venue_data("Snooker Only", "Dallas", "TX");
    wrong_tables.table_types = vec!["snooker".to_string()];
    seed_venue(&harness.db, &wrong_tables).await;

    let inactive = seed_venue(&harness.db, &{
        let mut data = venue_data("Gone Hall", "Austin", "TX");
        data.table_types = vec!["9-ball".to_string()];
        data
    })
    .await;
    Venue::deactivate(pool, inactive.id).await.unwrap();

    let result = VenueSearchService::search(
        pool,
        &VenueSearchParams {
            state: Some("TX".to_string()),
            table_types: vec!["9-ball".to_string()],
            page: Some(1),
            per_page: Some(12),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(result.total, 15);
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.venues.len(), 12);
    // claimed first, alphabetical within each group
    assert_eq!(result.venues[0].name, "Billiards 05");
    assert_eq!(result.venues[1].name, "Billiards 12");
    assert!(result.venues[0].is_claimed && result.venues[1].is_claimed);
    assert!(result.venues[2..].iter().all(|v| !v.is_claimed));
    for venue in &result.venues {
        assert!(venue.is_active);
        assert_eq!(venue.state, "TX");
        assert!(venue.table_types.iter().any(|t| t == "9-ball"));
    }
}

#[tokio::test]
async fn amenity_overlap_needs_only_one_match() {
    let harness = test_db().await;
    let pool = &harness.db.pool;

    let mut bar_only = venue_data("Corner Pocket", "Austin", "TX");
    bar_only.amenities = vec!["bar".to_string()];
    seed_venue(&harness.db, &bar_only).await;

    let mut nothing = venue_data("Bare Hall", "Austin", "TX");
    nothing.amenities = vec![];
    seed_venue(&harness.db, &nothing).await;

    let result = VenueSearchService::search(
        pool,
        &VenueSearchParams {
            amenities: vec!["bar".to_string(), "wifi".to_string(), "food".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.venues[0].name, "Corner Pocket");
}

#[tokio::test]
async fn free_text_matches_name_or_city() {
    let harness = test_db().await;
    let pool = &harness.db.pool;

    seed_venue(&harness.db, &venue_data("Rack City", "Houston", "TX")).await;
    seed_venue(&harness.db, &venue_data("Side Pocket", "Austin", "TX")).await;
    seed_venue(&harness.db, &venue_data("Chalk It Up", "Dallas", "TX")).await;

    let by_name = VenueSearchService::search(
        pool,
        &VenueSearchParams {
            query: Some("rack".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.total, 1);
    assert_eq!(by_name.venues[0].name, "Rack City");

    let by_city = VenueSearchService::search(
        pool,
        &VenueSearchParams {
            query: Some("AUSTIN".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_city.total, 1);
    assert_eq!(by_city.venues[0].city, "Austin");
}

#[tokio::test]
async fn pages_concatenate_to_the_full_result_set() {
    let harness = test_db().await;
    let pool = &harness.db.pool;

    for i in 1..=11 {
        seed_venue(&harness.db, &venue_data(&format!("Hall {i:02}"), "Reno", "NV")).await;
    }

    let full = VenueSearchService::search(
        pool,
        &VenueSearchParams {
            per_page: Some(50),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(full.total, 11);

    let mut concatenated = Vec::new();
    let mut page = 1;
    loop {
        let result = VenueSearchService::search(
            pool,
            &VenueSearchParams {
                page: Some(page),
                per_page: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(result.total, 11);
        assert_eq!(result.total_pages, 3);
        concatenated.extend(result.venues);
        if page >= result.total_pages {
            break;
        }
        page += 1;
    }

    let full_ids: Vec<Uuid> = full.venues.iter().map(|v| v.id).collect();
    let concat_ids: Vec<Uuid> = concatenated.iter().map(|v| v.id).collect();
    assert_eq!(full_ids, concat_ids);
}

#[tokio::test]
async fn paging_inputs_clamp_instead_of_erroring() {
    let harness = test_db().await;
    let pool = &harness.db.pool;
    seed_venue(&harness.db, &venue_data("Lone Hall", "Boise", "ID")).await;

    let result = VenueSearchService::search(
        pool,
        &VenueSearchParams {
            page: Some(0),
            per_page: Some(500),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(result.page, 1);
    assert_eq!(result.per_page, 50);
    assert_eq!(result.venues.len(), 1);
}

#[tokio::test]
async fn nearby_orders_by_distance_and_respects_radius() {
    let harness = test_db().await;
    let pool = &harness.db.pool;

    let mut downtown = venue_data("Downtown Billiards", "Austin", "TX");
    downtown.latitude = Some(30.2672);
    downtown.longitude = Some(-97.7431);
    seed_venue(&harness.db, &downtown).await;

    let mut round_rock = venue_data("Round Rock Rack", "Round Rock", "TX");
    round_rock.latitude = Some(30.5083);
    round_rock.longitude = Some(-97.6789);
    seed_venue(&harness.db, &round_rock).await;

    let mut houston = venue_data("Houston Hall", "Houston", "TX");
    houston.latitude = Some(29.7604);
    houston.longitude = Some(-95.3698);
    seed_venue(&harness.db, &houston).await;

    // no coordinates: must never appear
    seed_venue(&harness.db, &venue_data("Mystery Hall", "Austin", "TX")).await;

    let nearby = GeoService::nearby(pool, 30.2672, -97.7431, 25.0, 50).await;
    assert_eq!(nearby.len(), 2);
    assert_eq!(nearby[0].venue.name, "Downtown Billiards");
    assert_eq!(nearby[1].venue.name, "Round Rock Rack");
    assert!(nearby[0].distance_miles <= nearby[1].distance_miles);
    assert!(nearby.iter().all(|v| v.distance_miles <= 25.0));

    let capped = GeoService::nearby(pool, 30.2672, -97.7431, 200.0, 2).await;
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[1].venue.name, "Round Rock Rack");
}
