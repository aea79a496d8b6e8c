//! Bearer credential verification and issuance (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use hireboard_core::AccountId;

use crate::claims::{validate_claims, Claims, TokenValidationError};
use crate::Role;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Turns a bearer credential into verified claims.
///
/// Implementations must reject malformed, unsigned, badly signed, expired and
/// not-yet-valid tokens.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

/// Shared-secret HS256 token service.
#[derive(Clone)]
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Hs256TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Sign a token for an account.
    pub fn issue(
        &self,
        id: AccountId,
        roles: Vec<Role>,
        user_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            id,
            roles,
            user_name: user_name.into(),
            issued_at: now,
            expires_at: now + self.ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }
}

impl TokenVerifier for Hs256TokenService {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-provided clock below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let svc = Hs256TokenService::new(b"test-secret");
        let id = AccountId::new();
        let now = Utc::now();

        let token = svc.issue(id, vec![Role::Organization], "acme", now).unwrap();
        let claims = svc.verify(&token, now).unwrap();

        assert_eq!(claims.id, id);
        assert_eq!(claims.roles, vec![Role::Organization]);
        assert_eq!(claims.user_name, "acme");
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let issuer = Hs256TokenService::new(b"one");
        let verifier = Hs256TokenService::new(b"two");
        let now = Utc::now();

        let token = issuer.issue(AccountId::new(), vec![Role::User], "bob", now).unwrap();
        assert_eq!(verifier.verify(&token, now), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = Hs256TokenService::with_ttl(b"s", Duration::minutes(5));
        let issued = Utc::now() - Duration::hours(1);
        let token = svc.issue(AccountId::new(), vec![Role::User], "bob", issued).unwrap();

        assert_eq!(
            svc.verify(&token, Utc::now()),
            Err(TokenError::Claims(TokenValidationError::Expired))
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = Hs256TokenService::new(b"s");
        assert!(matches!(svc.verify("not.a.jwt", Utc::now()), Err(TokenError::Malformed(_))));
        assert!(matches!(svc.verify("", Utc::now()), Err(TokenError::Malformed(_))));
    }
}
