//! Extracts the caller identity from the auth provider's bearer token.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use utils::auth::{UserContext, verify_token};

use crate::{Deployment, error::ApiError};

/// Required identity: handlers taking this reject unauthenticated callers
/// before touching the store.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserContext);

impl FromRequestParts<Deployment> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        deployment: &Deployment,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;
        let user = verify_token(token, &deployment.config().auth_secret)
            .map_err(|_| ApiError::Unauthorized)?;
        Ok(CurrentUser(user))
    }
}
