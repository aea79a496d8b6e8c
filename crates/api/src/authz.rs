//! Route-level access gate.
//!
//! Every protected handler states its [`Policy`] and calls [`require`] before
//! touching a service. Ownership checks that depend on stored state (job
//! author, application's job) stay in the services.

use axum::response::Response;

use hireboard_auth::{authorize, Claims, Policy, Role};
use hireboard_core::DomainError;

use crate::app::errors;

pub const ORGANIZATION_OR_ADMIN: &[Role] = &[Role::Organization, Role::Admin];
pub const USER_OR_ORGANIZATION: &[Role] = &[Role::User, Role::Organization];
pub const ANY_ROLE: &[Role] = &[Role::User, Role::Organization, Role::Admin];
pub const ORGANIZATION: &[Role] = &[Role::Organization];
pub const ADMIN: &[Role] = &[Role::Admin];

pub fn require(claims: &Claims, policy: &Policy<'_>) -> Result<(), Response> {
    authorize(Some(claims), policy).map_err(|e| {
        tracing::debug!(account_id = %claims.id, error = %e, "request denied by policy");
        errors::domain_error(DomainError::from(e))
    })
}
