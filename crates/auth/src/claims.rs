use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hireboard_core::AccountId;

use crate::Role;

/// Verified identity claims (transport-agnostic).
///
/// This is the payload handed to the core once a bearer credential has been
/// decoded and its signature checked. Immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account the token was issued to.
    pub id: AccountId,

    /// Roles granted to the account at issue time.
    pub roles: Vec<Role>,

    /// Display name snapshot (the account's username).
    #[serde(rename = "userName")]
    pub user_name: String,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token carries no roles")]
    NoRoles,
}

/// Deterministically validate claims.
///
/// Note: this validates the *claims* only. Signature verification lives in
/// [`crate::token`].
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    if claims.roles.is_empty() {
        return Err(TokenValidationError::NoRoles);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(issued_at: DateTime<Utc>, ttl: Duration) -> Claims {
        Claims {
            id: AccountId::new(),
            roles: vec![Role::User],
            user_name: "alice".to_string(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn accepts_token_inside_window() {
        let now = Utc::now();
        let claims = claims_at(now - Duration::minutes(1), Duration::hours(24));
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let claims = claims_at(now - Duration::hours(25), Duration::hours(24));
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_future_issued_at() {
        let now = Utc::now();
        let claims = claims_at(now + Duration::minutes(5), Duration::hours(1));
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let claims = claims_at(now, Duration::zero());
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn rejects_roleless_claims() {
        let now = Utc::now();
        let mut claims = claims_at(now - Duration::minutes(1), Duration::hours(1));
        claims.roles.clear();
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::NoRoles));
    }

    #[test]
    fn wire_format_uses_short_claim_names() {
        let now = Utc::now();
        let claims = claims_at(now, Duration::hours(1));
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["userName"], "alice");
        assert_eq!(value["roles"][0], "USER");
        assert_eq!(value["iat"].as_i64().unwrap(), now.timestamp());
        assert!(value.get("id").is_some());
    }
}
