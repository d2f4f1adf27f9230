//! Routes for venue reviews.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::review::{CreateReview, Review};
use services::services::reviews::ReviewsService;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{Deployment, auth::CurrentUser, error::ApiError};

pub async fn create_review(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(venue_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateReview>,
) -> Result<ResponseJson<ApiResponse<Review>>, ApiError> {
    let review =
        ReviewsService::create(&deployment.db().pool, &user, venue_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(review)))
}

pub async fn list_reviews(
    State(deployment): State<Deployment>,
    Path(venue_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Review>>>, ApiError> {
    let reviews = ReviewsService::list_for_venue(&deployment.db().pool, venue_id).await?;
    Ok(ResponseJson(ApiResponse::success(reviews)))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new().route(
        "/venues/{venue_id}/reviews",
        get(list_reviews).post(create_review),
    )
}
