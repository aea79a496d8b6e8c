//! Persistent store boundary.
//!
//! Three collections (accounts, jobs, applications) behind async traits. Every
//! method is a single atomic step from the caller's point of view; anything
//! multi-step is sequenced by the services in [`crate::services`].

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use hireboard_applications::{Application, ApplicationStatus};
use hireboard_auth::Account;
use hireboard_core::{AccountId, ApplicationId, DomainError, JobId};
use hireboard_jobs::{Job, JobPatch};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Unique constraint names reported through [`StoreError::Duplicate`].
pub mod constraint {
    pub const ACCOUNT_USERNAME: &str = "accounts_username_key";
    pub const ACCOUNT_EMAIL: &str = "accounts_email_key";
    pub const JOB_TITLE_AUTHOR: &str = "jobs_title_author_key";
    pub const APPLICATION_USER_JOB: &str = "applications_user_job_key";
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("duplicate value violates {0}")]
    Duplicate(String),

    /// The backend could not be reached (pool closed, timeout, lock poisoned).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("store error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::internal(value.to_string())
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Duplicate` on a taken username or email.
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Look up by username or email.
    async fn find_account_by_login(&self, login: &str) -> Result<Option<Account>, StoreError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Accounts among `ids`; missing ids are skipped.
    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError>;

    /// Overwrite profile fields and password hash. Roles and creation time are
    /// kept. Returns `false` if the account does not exist.
    async fn update_account(&self, account: &Account) -> Result<bool, StoreError>;

    async fn delete_account(&self, id: AccountId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fails with `Duplicate` when the author already has a job with this title.
    async fn insert_job(&self, job: &Job) -> Result<(), StoreError>;

    async fn get_job(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    async fn list_active_jobs(&self) -> Result<Vec<Job>, StoreError>;

    async fn list_jobs_by_author(&self, author: AccountId) -> Result<Vec<Job>, StoreError>;

    /// Active jobs whose likers include `account`.
    async fn list_jobs_liked_by(&self, account: AccountId) -> Result<Vec<Job>, StoreError>;

    /// Merge the provided fields of `patch` into the stored job in one step;
    /// fields the patch leaves unset are never written. Returns the updated job,
    /// or `None` if it does not exist. Fails with `Duplicate` on a title clash.
    async fn update_job_details(&self, id: JobId, patch: &JobPatch) -> Result<Option<Job>, StoreError>;

    /// Set `is_active` only if it currently differs. Returns `false` when the
    /// job is missing or already in that state.
    async fn set_job_active(&self, id: JobId, active: bool) -> Result<bool, StoreError>;

    async fn delete_job(&self, id: JobId) -> Result<bool, StoreError>;

    /// Add `account` to the likers and increment the counter, only if the job
    /// is active, not authored by `account` and not already liked by it.
    /// Returns the new count, or `None` if the condition failed.
    async fn add_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError>;

    /// Remove `account` from the likers and decrement the counter, only if the
    /// job is active and liked by it. Returns the new count, or `None`.
    async fn remove_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError>;

    /// Drop `account` from every job's likers, decrementing each counter in the
    /// same update. Returns the number of jobs touched.
    async fn remove_likes_by(&self, account: AccountId) -> Result<u64, StoreError>;

    /// Append to the applicant list of an existing active job. Returns `false`
    /// if the job is missing or inactive.
    async fn push_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError>;

    async fn pull_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError>;

    /// Deactivate every job by `author`. Likes are left alone.
    async fn deactivate_jobs_by(&self, author: AccountId) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Fails with `Duplicate` when the user already applied to the job.
    async fn insert_application(&self, application: &Application) -> Result<(), StoreError>;

    async fn get_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError>;

    async fn list_applications_by_user(&self, user: AccountId) -> Result<Vec<Application>, StoreError>;

    async fn list_applications_by_job(&self, job: JobId) -> Result<Vec<Application>, StoreError>;

    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<bool, StoreError>;

    async fn delete_application(&self, id: ApplicationId) -> Result<bool, StoreError>;

    async fn delete_applications_by_user(&self, user: AccountId) -> Result<u64, StoreError>;

    async fn delete_applications_by_job(&self, job: JobId) -> Result<u64, StoreError>;
}

/// All three collections.
pub trait Store: AccountStore + JobStore + ApplicationStore {}

impl<T> Store for T where T: AccountStore + JobStore + ApplicationStore {}

#[async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        (**self).insert_account(account).await
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        (**self).get_account(id).await
    }

    async fn find_account_by_login(&self, login: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_account_by_login(login).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        (**self).list_accounts().await
    }

    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        (**self).get_accounts(ids).await
    }

    async fn update_account(&self, account: &Account) -> Result<bool, StoreError> {
        (**self).update_account(account).await
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool, StoreError> {
        (**self).delete_account(id).await
    }
}

#[async_trait]
impl<S> JobStore for Arc<S>
where
    S: JobStore + ?Sized,
{
    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        (**self).insert_job(job).await
    }

    async fn get_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        (**self).get_job(id).await
    }

    async fn list_active_jobs(&self) -> Result<Vec<Job>, StoreError> {
        (**self).list_active_jobs().await
    }

    async fn list_jobs_by_author(&self, author: AccountId) -> Result<Vec<Job>, StoreError> {
        (**self).list_jobs_by_author(author).await
    }

    async fn list_jobs_liked_by(&self, account: AccountId) -> Result<Vec<Job>, StoreError> {
        (**self).list_jobs_liked_by(account).await
    }

    async fn update_job_details(&self, id: JobId, patch: &JobPatch) -> Result<Option<Job>, StoreError> {
        (**self).update_job_details(id, patch).await
    }

    async fn set_job_active(&self, id: JobId, active: bool) -> Result<bool, StoreError> {
        (**self).set_job_active(id, active).await
    }

    async fn delete_job(&self, id: JobId) -> Result<bool, StoreError> {
        (**self).delete_job(id).await
    }

    async fn add_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError> {
        (**self).add_like(id, account).await
    }

    async fn remove_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError> {
        (**self).remove_like(id, account).await
    }

    async fn remove_likes_by(&self, account: AccountId) -> Result<u64, StoreError> {
        (**self).remove_likes_by(account).await
    }

    async fn push_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError> {
        (**self).push_applicant(id, application).await
    }

    async fn pull_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError> {
        (**self).pull_applicant(id, application).await
    }

    async fn deactivate_jobs_by(&self, author: AccountId) -> Result<u64, StoreError> {
        (**self).deactivate_jobs_by(author).await
    }
}

#[async_trait]
impl<S> ApplicationStore for Arc<S>
where
    S: ApplicationStore + ?Sized,
{
    async fn insert_application(&self, application: &Application) -> Result<(), StoreError> {
        (**self).insert_application(application).await
    }

    async fn get_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        (**self).get_application(id).await
    }

    async fn list_applications_by_user(&self, user: AccountId) -> Result<Vec<Application>, StoreError> {
        (**self).list_applications_by_user(user).await
    }

    async fn list_applications_by_job(&self, job: JobId) -> Result<Vec<Application>, StoreError> {
        (**self).list_applications_by_job(job).await
    }

    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<bool, StoreError> {
        (**self).set_application_status(id, status).await
    }

    async fn delete_application(&self, id: ApplicationId) -> Result<bool, StoreError> {
        (**self).delete_application(id).await
    }

    async fn delete_applications_by_user(&self, user: AccountId) -> Result<u64, StoreError> {
        (**self).delete_applications_by_user(user).await
    }

    async fn delete_applications_by_job(&self, job: JobId) -> Result<u64, StoreError> {
        (**self).delete_applications_by_job(job).await
    }
}
