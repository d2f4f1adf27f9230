//! Route for public contact/lead submission.

use axum::{Router, extract::State, response::Json as ResponseJson, routing::post};
use db::models::{
    lead::{CreateLead, Lead},
    venue::Venue,
};
use services::services::crm_sync::CrmEvent;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{Deployment, error::ApiError};

pub async fn create_lead(
    State(deployment): State<Deployment>,
    axum::Json(payload): axum::Json<CreateLead>,
) -> Result<ResponseJson<ApiResponse<Lead>>, ApiError> {
    if payload.name.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(ApiError::Validation("name and message are required".to_string()));
    }
    if !payload.email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".to_string()));
    }
    if let Some(venue_id) = payload.venue_id {
        if Venue::find_by_id(&deployment.db().pool, venue_id).await?.is_none() {
            return Err(ApiError::NotFound("venue"));
        }
    }

    let lead = Lead::create(&deployment.db().pool, Uuid::new_v4(), &payload).await?;
    deployment.events().enqueue(CrmEvent::LeadCreated {
        lead_id: lead.id,
        venue_id: lead.venue_id,
        email: lead.email.clone(),
    });
    Ok(ResponseJson(ApiResponse::success_with_message(
        lead,
        "thanks, we will be in touch",
    )))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new().route("/leads", post(create_lead))
}
