use chrono::Utc;
use tracing::{info, warn};

use hireboard_auth::password::{hash_password_with_cost, validate_password, BCRYPT_COST};
use hireboard_auth::{
    verify_password, Account, AccountPatch, AccountView, Hs256TokenService, PasswordError,
    Registration, Role,
};
use hireboard_core::{AccountId, DomainError, DomainResult};

use super::{denied, store_fault};
use crate::store::{constraint, Store, StoreError};

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const EMAIL_TAKEN: &str = "Email is already in use";
pub const ACCOUNT_NOT_FOUND: &str = "User could not be found";

/// Registration, login and account maintenance.
#[derive(Debug, Clone)]
pub struct AccountService<S> {
    store: S,
    tokens: Hs256TokenService,
    password_cost: u32,
}

impl<S: Store> AccountService<S> {
    pub fn new(store: S, tokens: Hs256TokenService) -> Self {
        Self {
            store,
            tokens,
            password_cost: BCRYPT_COST,
        }
    }

    /// Override the bcrypt cost (tests use the minimum).
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub async fn register(&self, request: Registration) -> DomainResult<AccountView> {
        const OP: &str = "accounts.register";

        let role = request.validate().map_err(|e| denied(OP, e))?;
        let password_hash = self.hash(&request.password).await?;
        let account = request.into_account(role, password_hash, Utc::now());

        self.store
            .insert_account(&account)
            .await
            .map_err(|e| uniqueness(OP, e))?;

        info!(account_id = %account.id, role = role.as_str(), "account registered");
        Ok(account.view())
    }

    /// Exchange a username or email plus password for a signed token.
    pub async fn login(&self, login: &str, password: &str) -> DomainResult<String> {
        const OP: &str = "accounts.login";

        let account = self
            .store
            .find_account_by_login(login.trim())
            .await
            .map_err(store_fault(OP))?
            .ok_or_else(|| denied(OP, DomainError::Unauthenticated))?;

        if !self.matches(password, &account).await? {
            return Err(denied(OP, DomainError::Unauthenticated));
        }

        let token = self
            .tokens
            .issue(account.id, account.roles.clone(), account.username.clone(), Utc::now())
            .map_err(|e| {
                tracing::error!(operation = OP, error = %e, "token signing failed");
                DomainError::internal(e.to_string())
            })?;

        info!(account_id = %account.id, "login succeeded");
        Ok(token)
    }

    pub async fn list_accounts(&self) -> DomainResult<Vec<AccountView>> {
        let accounts = self
            .store
            .list_accounts()
            .await
            .map_err(store_fault("accounts.list"))?;
        Ok(accounts.iter().map(Account::view).collect())
    }

    pub async fn get_account(&self, id: AccountId) -> DomainResult<AccountView> {
        Ok(self.load(id, "accounts.get").await?.view())
    }

    pub async fn update_account(&self, id: AccountId, patch: AccountPatch) -> DomainResult<AccountView> {
        const OP: &str = "accounts.update";

        let mut account = self.load(id, OP).await?;
        patch.apply(&mut account).map_err(|e| denied(OP, e))?;

        let updated = self
            .store
            .update_account(&account)
            .await
            .map_err(|e| uniqueness(OP, e))?;
        if !updated {
            return Err(denied(OP, DomainError::not_found(ACCOUNT_NOT_FOUND)));
        }

        info!(account_id = %id, "account updated");
        Ok(account.view())
    }

    pub async fn update_own_details(
        &self,
        actor: AccountId,
        patch: AccountPatch,
    ) -> DomainResult<AccountView> {
        self.update_account(actor, patch).await
    }

    pub async fn change_password(
        &self,
        actor: AccountId,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        const OP: &str = "accounts.change_password";

        let mut account = self.load(actor, OP).await?;
        if !self.matches(old_password, &account).await? {
            return Err(denied(OP, DomainError::Unauthenticated));
        }
        validate_password(new_password)
            .map_err(|e| denied(OP, DomainError::validation(e.to_string())))?;

        account.password_hash = self.hash(new_password).await?;
        let updated = self
            .store
            .update_account(&account)
            .await
            .map_err(store_fault(OP))?;
        if !updated {
            return Err(denied(OP, DomainError::not_found(ACCOUNT_NOT_FOUND)));
        }

        info!(account_id = %actor, "password changed");
        Ok(())
    }

    /// Delete an account and detach it from everything it touched.
    ///
    /// Order: likes, then applications (USER) or jobs (ORGANIZATION), then
    /// the account record itself, so a failure midway leaves the account in
    /// place and the call can be retried.
    pub async fn delete_account(&self, id: AccountId) -> DomainResult<()> {
        const OP: &str = "accounts.delete";

        let account = self.load(id, OP).await?;

        let likes_removed = self
            .store
            .remove_likes_by(id)
            .await
            .map_err(store_fault(OP))?;

        if account.has_role(Role::Organization) {
            let deactivated = self
                .store
                .deactivate_jobs_by(id)
                .await
                .map_err(store_fault(OP))?;
            info!(account_id = %id, deactivated, "jobs deactivated for deleted organization");
        } else {
            let applications = self
                .store
                .list_applications_by_user(id)
                .await
                .map_err(store_fault(OP))?;
            for application in &applications {
                let pulled = self
                    .store
                    .pull_applicant(application.job, application.id)
                    .await
                    .map_err(store_fault(OP))?;
                if !pulled {
                    warn!(
                        application_id = %application.id,
                        job_id = %application.job,
                        "application was not linked to its job"
                    );
                }
            }
            let removed = self
                .store
                .delete_applications_by_user(id)
                .await
                .map_err(store_fault(OP))?;
            info!(account_id = %id, removed, "applications removed for deleted account");
        }

        let deleted = self
            .store
            .delete_account(id)
            .await
            .map_err(store_fault(OP))?;
        if !deleted {
            return Err(denied(OP, DomainError::not_found(ACCOUNT_NOT_FOUND)));
        }

        info!(account_id = %id, likes_removed, "account deleted");
        Ok(())
    }

    async fn load(&self, id: AccountId, operation: &'static str) -> DomainResult<Account> {
        self.store
            .get_account(id)
            .await
            .map_err(store_fault(operation))?
            .ok_or_else(|| denied(operation, DomainError::not_found(ACCOUNT_NOT_FOUND)))
    }

    async fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password_with_cost(password, self.password_cost)
            .await
            .map_err(password_fault)
    }

    async fn matches(&self, password: &str, account: &Account) -> DomainResult<bool> {
        verify_password(password, &account.password_hash)
            .await
            .map_err(password_fault)
    }
}

fn password_fault(err: PasswordError) -> DomainError {
    match err {
        PasswordError::InvalidLength => DomainError::validation(err.to_string()),
        PasswordError::Hashing(detail) => {
            tracing::error!(error = %detail, "password hashing failed");
            DomainError::internal(detail)
        }
    }
}

fn uniqueness(operation: &'static str, err: StoreError) -> DomainError {
    match err {
        StoreError::Duplicate(ref name) if name == constraint::ACCOUNT_USERNAME => {
            denied(operation, DomainError::conflict(USERNAME_TAKEN))
        }
        StoreError::Duplicate(ref name) if name == constraint::ACCOUNT_EMAIL => {
            denied(operation, DomainError::conflict(EMAIL_TAKEN))
        }
        other => store_fault(operation)(other),
    }
}
