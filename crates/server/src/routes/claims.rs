//! Routes for venue ownership claims and their admin review.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::claim::{Claim, CreateClaim};
use services::services::claims::ClaimsService;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{Deployment, auth::CurrentUser, error::ApiError};

pub async fn submit_claim(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(venue_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateClaim>,
) -> Result<ResponseJson<ApiResponse<Claim>>, ApiError> {
    let claim = ClaimsService::submit(
        &deployment.db().pool,
        deployment.events(),
        &user,
        venue_id,
        &payload,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        claim,
        "claim submitted for review",
    )))
}

pub async fn list_my_claims(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Claim>>>, ApiError> {
    let claims = ClaimsService::list_for_user(&deployment.db().pool, &user).await?;
    Ok(ResponseJson(ApiResponse::success(claims)))
}

pub async fn list_pending_claims(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Claim>>>, ApiError> {
    let claims = ClaimsService::list_pending(&deployment.db().pool, &user).await?;
    Ok(ResponseJson(ApiResponse::success(claims)))
}

pub async fn approve_claim(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(claim_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Claim>>, ApiError> {
    let claim = ClaimsService::approve(
        &deployment.db().pool,
        deployment.events(),
        &user,
        claim_id,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(claim)))
}

pub async fn reject_claim(
    State(deployment): State<Deployment>,
    CurrentUser(user): CurrentUser,
    Path(claim_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Claim>>, ApiError> {
    let claim = ClaimsService::reject(&deployment.db().pool, &user, claim_id).await?;
    Ok(ResponseJson(ApiResponse::success(claim)))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route("/venues/{venue_id}/claims", post(submit_claim))
        .route("/claims/mine", get(list_my_claims))
        .route("/claims/pending", get(list_pending_claims))
        .route("/claims/{claim_id}/approve", post(approve_claim))
        .route("/claims/{claim_id}/reject", post(reject_claim))
}
