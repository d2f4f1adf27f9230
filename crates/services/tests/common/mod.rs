#![allow(dead_code)]

use db::{
    DBService,
    models::{
        pool_table::{CreatePoolTable, PoolTable},
        venue::{CreateVenue, Venue},
        venue_hours::{SetVenueHours, VenueHours},
    },
};
use tempfile::TempDir;
use utils::auth::{UserContext, UserRole};
use uuid::Uuid;

pub struct TestDb {
    pub db: DBService,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = TempDir::new().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let db = DBService::new(&url).await.expect("test database");
    TestDb { db, _dir: dir }
}

pub fn player() -> UserContext {
    UserContext {
        id: Uuid::new_v4(),
        email: "player@example.com".to_string(),
        role: UserRole::Player,
    }
}

pub fn admin() -> UserContext {
    UserContext {
        id: Uuid::new_v4(),
        email: "admin@example.com".to_string(),
        role: UserRole::Admin,
    }
}

pub fn venue_data(name: &str, city: &str, state: &str) -> CreateVenue {
    CreateVenue {
        name: name.to_string(),
        description: None,
        address: "100 Main St".to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip: "00000".to_string(),
        phone: None,
        website: None,
        latitude: None,
        longitude: None,
        table_types: vec!["8-ball".to_string()],
        amenities: vec![],
        num_tables: 4,
    }
}

pub async fn seed_venue(db: &DBService, data: &CreateVenue) -> Venue {
    let id = Uuid::new_v4();
    let slug = format!(
        "{}-{}",
        data.name.to_lowercase().replace(' ', "-"),
        &id.to_string()[..8]
    );
    Venue::create(&db.pool, id, &slug, data)
        .await
        .expect("seed venue")
}

pub async fn seed_tables(db: &DBService, venue_id: Uuid, count: usize, table_type: &str) {
    for order in 0..count {
        PoolTable::create(
            &db.pool,
            Uuid::new_v4(),
            venue_id,
            &CreatePoolTable {
                table_type: table_type.to_string(),
                cloth_color: None,
                hourly_rate: Some(12.0),
                is_available: Some(true),
                display_order: Some(order as i64),
            },
        )
        .await
        .expect("seed table");
    }
}

pub async fn seed_hours(
    db: &DBService,
    venue_id: Uuid,
    day_of_week: i64,
    open: &str,
    close: &str,
) {
    VenueHours::upsert(
        &db.pool,
        venue_id,
        &SetVenueHours {
            day_of_week,
            open_time: Some(open.parse().expect("open time")),
            close_time: Some(close.parse().expect("close time")),
            is_closed: false,
        },
    )
    .await
    .expect("seed hours");
}

pub async fn seed_closed_day(db: &DBService, venue_id: Uuid, day_of_week: i64) {
    VenueHours::upsert(
        &db.pool,
        venue_id,
        &SetVenueHours {
            day_of_week,
            open_time: None,
            close_time: None,
            is_closed: true,
        },
    )
    .await
    .expect("seed closed day");
}
