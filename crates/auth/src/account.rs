//! Persisted account record, registration rules and the projections handed
//! out to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hireboard_core::{AccountId, DomainError, DomainResult};

use crate::password::validate_password;
use crate::Role;

pub const MIN_USERNAME_LENGTH: usize = 4;

/// Stored account. The only place a password hash lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            created_at: self.created_at,
        }
    }

    pub fn applicant_profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Account as returned to callers (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal applicant identity shown to a job's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Self-registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    /// `USER` when omitted.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Registration {
    /// Check field shapes and resolve the requested role.
    ///
    /// Only `USER` and `ORGANIZATION` can be self-assigned.
    pub fn validate(&self) -> DomainResult<Role> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        validate_password(&self.password).map_err(|e| DomainError::validation(e.to_string()))?;

        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(Role::User),
            Some(raw) => match raw.parse::<Role>() {
                Ok(role @ (Role::User | Role::Organization)) => Ok(role),
                _ => Err(DomainError::validation("Role is invalid")),
            },
        }
    }

    /// Build the stored record once the password has been hashed.
    pub fn into_account(self, role: Role, password_hash: String, now: DateTime<Utc>) -> Account {
        Account {
            id: AccountId::new(),
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password_hash,
            roles: vec![role],
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            created_at: now,
        }
    }
}

/// Partial update of an account's profile fields.
///
/// Absent or blank fields leave the stored value unchanged. Roles and the
/// password are not reachable from here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl AccountPatch {
    pub fn apply(&self, account: &mut Account) -> DomainResult<()> {
        if let Some(username) = provided(&self.username) {
            validate_username(username)?;
            account.username = username.to_string();
        }
        if let Some(email) = provided(&self.email) {
            validate_email(email)?;
            account.email = email.to_string();
        }
        if let Some(first) = provided(&self.first_name) {
            account.first_name = Some(first.to_string());
        }
        if let Some(last) = provided(&self.last_name) {
            account.last_name = Some(last.to_string());
        }
        Ok(())
    }
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank(field: Option<String>) -> Option<String> {
    provided(&field).map(str::to_string)
}

pub fn validate_username(username: &str) -> DomainResult<()> {
    if username.trim().chars().count() < MIN_USERNAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Username must be at least {MIN_USERNAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Shape check only: `local@domain.tld`, no whitespace.
pub fn validate_email(email: &str) -> DomainResult<()> {
    let invalid = || DomainError::validation("Email is invalid");
    let email = email.trim();

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(role: Option<&str>) -> Registration {
        Registration {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "pass1234".into(),
            role: role.map(str::to_string),
            first_name: Some("Alice".into()),
            last_name: None,
        }
    }

    fn account() -> Account {
        registration(None).into_account(Role::User, "hash".into(), Utc::now())
    }

    #[test]
    fn role_defaults_to_user() {
        assert_eq!(registration(None).validate(), Ok(Role::User));
        assert_eq!(registration(Some("")).validate(), Ok(Role::User));
    }

    #[test]
    fn organization_may_self_register() {
        assert_eq!(registration(Some("ORGANIZATION")).validate(), Ok(Role::Organization));
    }

    #[test]
    fn admin_and_unknown_roles_are_invalid() {
        for role in ["ADMIN", "SUPERUSER"] {
            assert_eq!(
                registration(Some(role)).validate(),
                Err(DomainError::validation("Role is invalid"))
            );
        }
    }

    #[test]
    fn field_shapes_are_checked() {
        let mut r = registration(None);
        r.username = "bob".into();
        assert!(matches!(r.validate(), Err(DomainError::Validation(_))));

        let mut r = registration(None);
        r.password = "12345678901".into();
        assert!(matches!(r.validate(), Err(DomainError::Validation(_))));

        for bad in ["", "alice", "alice@", "@example.com", "a b@example.com", "a@b@c.com", "alice@example"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut acc = account();
        let patch = AccountPatch {
            email: Some("new@example.com".into()),
            first_name: Some("  ".into()),
            ..Default::default()
        };
        patch.apply(&mut acc).unwrap();

        assert_eq!(acc.email, "new@example.com");
        assert_eq!(acc.username, "alice");
        assert_eq!(acc.first_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn patch_rejects_bad_email() {
        let mut acc = account();
        let patch = AccountPatch {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert_eq!(patch.apply(&mut acc), Err(DomainError::validation("Email is invalid")));
        assert_eq!(acc.email, "alice@example.com");
    }

    #[test]
    fn view_never_carries_the_hash() {
        let value = serde_json::to_value(account().view()).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["firstName"], "Alice");
        assert_eq!(value["roles"][0], "USER");
    }
}
