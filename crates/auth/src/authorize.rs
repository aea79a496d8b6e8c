use thiserror::Error;

use hireboard_core::{AccountId, DomainError};

use crate::{Claims, Role};

/// Access requirements of a single operation.
///
/// - `allowed_roles` empty: any verified identity passes (authentication-only gate).
/// - `target_owner` set: the operation acts on resources of that account; only the
///   account itself or an admin may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy<'a> {
    pub allowed_roles: &'a [Role],
    pub target_owner: Option<AccountId>,
}

impl Policy<'static> {
    pub const fn authenticated() -> Self {
        Self {
            allowed_roles: &[],
            target_owner: None,
        }
    }
}

impl<'a> Policy<'a> {
    pub const fn roles(allowed_roles: &'a [Role]) -> Self {
        Self {
            allowed_roles,
            target_owner: None,
        }
    }

    pub const fn owned_by(self, owner: AccountId) -> Self {
        Self {
            allowed_roles: self.allowed_roles,
            target_owner: Some(owner),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Unauthenticated => DomainError::Unauthenticated,
            AuthzError::Forbidden(reason) => DomainError::Forbidden(reason),
        }
    }
}

/// Decide whether `identity` may perform an operation guarded by `policy`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// `None` means the caller presented no verifiable credential.
pub fn authorize(identity: Option<&Claims>, policy: &Policy<'_>) -> Result<(), AuthzError> {
    let claims = identity.ok_or(AuthzError::Unauthenticated)?;

    let any_role = policy.allowed_roles.is_empty();
    let granted: Vec<Role> = claims
        .roles
        .iter()
        .copied()
        .filter(|r| any_role || policy.allowed_roles.contains(r))
        .collect();

    if !any_role && granted.is_empty() {
        return Err(AuthzError::Forbidden(format!(
            "requires one of: {}",
            policy
                .allowed_roles
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    match policy.target_owner {
        None => Ok(()),
        Some(_) if granted.contains(&Role::Admin) => Ok(()),
        Some(owner) if owner == claims.id => Ok(()),
        Some(_) => Err(AuthzError::Forbidden("No access".to_string())),
    }
}
