//! Routes for the venue directory: search, proximity, detail, availability,
//! and owner/admin management.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::NaiveDate;
use db::models::{
    pool_table::{CreatePoolTable, PoolTable},
    venue::{CreateVenue, UpdateVenue, Venue},
    venue_hours::{SetVenueHours, VenueHours},
};
use serde::Deserialize;
use services::services::{
    availability::{AvailabilityService, TimeSlot},
    geo::{DEFAULT_NEARBY_LIMIT, DEFAULT_RADIUS_MILES, GeoService, VenueWithDistance},
    venue_admin::VenueAdminService,
    venue_search::{VenueSearchParams, VenueSearchResult, VenueSearchService},
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{Deployment, auth::CurrentUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct VenueListQuery {
    pub query: Option<String>,
    pub state: Option<String>,
    /// Comma-separated, e.g. `table_types=9-ball,snooker`.
    pub table_types: Option<String>,
    pub amenities: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub async fn list_venues(
    State(deployment): State<Deployment>,
    Query(query): Query<VenueListQuery>,
) -> Result<ResponseJson<ApiResponse<VenueSearchResult>>, ApiError> {
    let params = VenueSearchParams {
        query: query.query,
        state: query.state,
        table_types: split_csv(query.table_types.as_deref()),
        amenities: split_csv(query.amenities.as_deref()),
        page: query.page,
        per_page: query.per_page,
    };
    let result = VenueSearchService::search(&deployment.db().pool, &params).await?;
    Ok(ResponseJson(ApiResponse::success(result)))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
    pub limit: Option<i64>,
}

pub async fn nearby_venues(
    State(deployment): State<Deployment>,
    Query(query): Query<NearbyQuery>,
) -> ResponseJson<ApiResponse<Vec<VenueWithDistance>>> {
    let venues = GeoService::nearby(
        &deployment.db().pool,
        query.lat,
        query.lng,
        query.radius.unwrap_or(DEFAULT_RADIUS_MILES),
        query.limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
    )
    .await;
    ResponseJson(ApiResponse::success(venues))
}

pub async fn get_venue(
    State(deployment): State<Deployment>,
    Path(venue_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Venue>>, ApiError> {
    let venue = Venue::find_by_id(&deployment.db().pool, venue_id)
        .await?
        .ok_or(ApiError::NotFound("venue"))?;
    Ok(ResponseJson(ApiResponse::success(venue)))
}

pub async fn get_venue_by_slug(
    State(deployment): State<Deployment>,
    Path(slug): Path<String>,
) -> Result<ResponseJson<ApiResponse<Venue>>, ApiError> {
    let venue = Venue::find_by_slug(&deployment.db().pool, &slug)
        .await?
        .ok_or(ApiError::NotFound("venue"))?;
    Ok(ResponseJson(ApiResponse::success(venue)))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

pub async fn get_availability(
    State(deployment): State<Deployment>,
    Path(venue_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<TimeSlot>>>, ApiError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("date must be formatted YYYY-MM-DD".to_string()))?;
    let slots = AvailabilityService::check(&deployment.db().pool, venue_id, date).await?;
    Ok(ResponseJson(ApiResponse::success(slots)))
}

pub async fn list_tables(
    State(deployment): State<Deployment>,
    Path(venue_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<PoolTable>>>, ApiError> {
    let tables = PoolTable::find_by_venue_id(&deployment.db().pool, venue_id).await?;
    Ok(ResponseJson(ApiResponse::success(tables)))
}

pub async fn list_hours(
    State(deployment): State<Deployment>,
    Path(venue_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<VenueHours>>>, ApiError> {
    let hours = VenueHours::find_by_venue_id(&deployment.db().pool, venue_id).await?;
    Ok(ResponseJson(ApiResponse::success(hours)))
}

pub async fn create_venue(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    axum::Json(payload): axum::Json<CreateVenue>,
) -> Result<ResponseJson<ApiResponse<Venue>>, ApiError> {
    let venue = VenueAdminService::create(&deployment.db().pool, &user, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(venue)))
}

pub async fn update_venue(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(venue_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateVenue>,
) -> Result<ResponseJson<ApiResponse<Venue>>, ApiError> {
    let venue =
        VenueAdminService::update(&deployment.db().pool, &user, venue_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(venue)))
}

pub async fn deactivate_venue(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(venue_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    VenueAdminService::deactivate(&deployment.db().pool, &user, venue_id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "venue deactivated",
    )))
}

pub async fn add_table(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(venue_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreatePoolTable>,
) -> Result<ResponseJson<ApiResponse<PoolTable>>, ApiError> {
    let table =
        VenueAdminService::add_table(&deployment.db().pool, &user, venue_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(table)))
}

pub async fn set_hours(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(venue_id): Path<Uuid>,
    axum::Json(payload): axum::Json<Vec<SetVenueHours>>,
) -> Result<ResponseJson<ApiResponse<Vec<VenueHours>>>, ApiError> {
    let hours =
        VenueAdminService::set_hours(&deployment.db().pool, &user, venue_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(hours)))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route("/venues", get(list_venues).post(create_venue))
        .route("/venues/nearby", get(nearby_venues))
        .route("/venues/by-slug/{slug}", get(get_venue_by_slug))
        .route("/venues/{venue_id}", get(get_venue).put(update_venue))
        .route("/venues/{venue_id}/deactivate", post(deactivate_venue))
        .route("/venues/{venue_id}/availability", get(get_availability))
        .route("/venues/{venue_id}/tables", get(list_tables).post(add_table))
        .route("/venues/{venue_id}/hours", get(list_hours).put(set_hours))
}
