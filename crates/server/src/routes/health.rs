use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use utils::response::ApiResponse;

use crate::{Deployment, error::ApiError};

pub async fn health(
    State(deployment): State<Deployment>,
) -> Result<ResponseJson<ApiResponse<&'static str>>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(&deployment.db().pool)
        .await?;
    Ok(ResponseJson(ApiResponse::success("ok")))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new().route("/health", get(health))
}
