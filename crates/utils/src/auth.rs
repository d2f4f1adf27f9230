//! Identity handed to us by the hosted auth provider.
//!
//! Login and session management live upstream; this module only verifies the
//! bearer token the provider issued and extracts the user identity from its
//! claims. Everything downstream receives the identity as an explicit value.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("malformed subject claim")]
    MalformedSubject,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    #[default]
    Player,
    Owner,
    Admin,
}

/// The authenticated caller, as resolved from the auth provider's token.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UserContext {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl UserContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    email: String,
    #[serde(default)]
    role: Option<UserRole>,
    exp: i64,
}

/// Verify an HS256 bearer token and extract the caller identity.
pub fn verify_token(token: &str, secret: &str) -> Result<UserContext, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::MalformedSubject)?;
    Ok(UserContext {
        id,
        email: data.claims.email,
        role: data.claims.role.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn issue(sub: &str, role: Option<UserRole>, secret: &str) -> String {
        let claims = TokenClaims {
            sub: sub.to_string(),
            email: "player@example.com".to_string(),
            role,
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn round_trips_identity() {
        let id = Uuid::new_v4();
        let token = issue(&id.to_string(), Some(UserRole::Admin), "s3cret");
        let user = verify_token(&token, "s3cret").unwrap();
        assert_eq!(user.id, id);
        assert!(user.is_admin());
    }

    #[test]
    fn missing_role_defaults_to_player() {
        let token = issue(&Uuid::new_v4().to_string(), None, "s3cret");
        let user = verify_token(&token, "s3cret").unwrap();
        assert_eq!(user.role, UserRole::Player);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = issue(&Uuid::new_v4().to_string(), None, "s3cret");
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn rejects_non_uuid_subject() {
        let token = issue("not-a-uuid", None, "s3cret");
        assert!(matches!(
            verify_token(&token, "s3cret"),
            Err(AuthError::MalformedSubject)
        ));
    }
}
