use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use hireboard_applications::{Application, ApplicationStatus};
use hireboard_auth::Account;
use hireboard_core::{AccountId, ApplicationId, JobId};
use hireboard_jobs::{Job, JobPatch};

use super::{constraint, AccountStore, ApplicationStore, JobStore, StoreError};

#[derive(Debug, Default)]
struct State {
    // Keyed by time-ordered ids, so iteration follows creation order.
    accounts: BTreeMap<AccountId, Account>,
    jobs: BTreeMap<JobId, Job>,
    applications: BTreeMap<ApplicationId, Application>,

    usernames: HashMap<String, AccountId>,
    emails: HashMap<String, AccountId>,
    job_titles: HashSet<(AccountId, String)>,
    applied: HashSet<(AccountId, JobId)>,
}

/// In-memory store.
///
/// Intended for tests/dev. One lock guards all collections and unique
/// indexes; every trait method runs under a single guard.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

fn duplicate(name: &str) -> StoreError {
    StoreError::Duplicate(name.to_string())
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.usernames.contains_key(&account.username) {
            return Err(duplicate(constraint::ACCOUNT_USERNAME));
        }
        if state.emails.contains_key(&account.email) {
            return Err(duplicate(constraint::ACCOUNT_EMAIL));
        }

        state.usernames.insert(account.username.clone(), account.id);
        state.emails.insert(account.email.clone(), account.id);
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    async fn find_account_by_login(&self, login: &str) -> Result<Option<Account>, StoreError> {
        let state = self.read()?;
        let id = state.usernames.get(login).or_else(|| state.emails.get(login));
        Ok(id.and_then(|id| state.accounts.get(id)).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.read()?.accounts.values().cloned().collect())
    }

    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        let state = self.read()?;
        Ok(ids.iter().filter_map(|id| state.accounts.get(id)).cloned().collect())
    }

    async fn update_account(&self, account: &Account) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let Some(current) = state.accounts.get(&account.id).cloned() else {
            return Ok(false);
        };

        if current.username != account.username && state.usernames.contains_key(&account.username) {
            return Err(duplicate(constraint::ACCOUNT_USERNAME));
        }
        if current.email != account.email && state.emails.contains_key(&account.email) {
            return Err(duplicate(constraint::ACCOUNT_EMAIL));
        }

        state.usernames.remove(&current.username);
        state.emails.remove(&current.email);
        state.usernames.insert(account.username.clone(), account.id);
        state.emails.insert(account.email.clone(), account.id);

        let stored = Account {
            roles: current.roles,
            created_at: current.created_at,
            ..account.clone()
        };
        state.accounts.insert(account.id, stored);
        Ok(true)
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let Some(removed) = state.accounts.remove(&id) else {
            return Ok(false);
        };
        state.usernames.remove(&removed.username);
        state.emails.remove(&removed.email);
        Ok(true)
    }
}

#[async_trait]
impl JobStore for InMemoryStore {
    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let key = (job.author, job.title.clone());
        if state.job_titles.contains(&key) {
            return Err(duplicate(constraint::JOB_TITLE_AUTHOR));
        }
        state.job_titles.insert(key);
        state.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.read()?.jobs.get(&id).cloned())
    }

    async fn list_active_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.read()?.jobs.values().filter(|j| j.is_active).cloned().collect())
    }

    async fn list_jobs_by_author(&self, author: AccountId) -> Result<Vec<Job>, StoreError> {
        Ok(self
            .read()?
            .jobs
            .values()
            .filter(|j| j.author == author)
            .cloned()
            .collect())
    }

    async fn list_jobs_liked_by(&self, account: AccountId) -> Result<Vec<Job>, StoreError> {
        Ok(self
            .read()?
            .jobs
            .values()
            .filter(|j| j.is_active && j.is_liked_by(account))
            .cloned()
            .collect())
    }

    async fn update_job_details(&self, id: JobId, patch: &JobPatch) -> Result<Option<Job>, StoreError> {
        let mut state = self.write()?;
        let Some(mut job) = state.jobs.get(&id).cloned() else {
            return Ok(None);
        };
        let old_title = job.title.clone();
        patch.apply(&mut job);

        if job.title != old_title {
            let key = (job.author, job.title.clone());
            if state.job_titles.contains(&key) {
                return Err(duplicate(constraint::JOB_TITLE_AUTHOR));
            }
            state.job_titles.remove(&(job.author, old_title));
            state.job_titles.insert(key);
        }

        state.jobs.insert(id, job.clone());
        Ok(Some(job))
    }

    async fn set_job_active(&self, id: JobId, active: bool) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.jobs.get_mut(&id) {
            Some(job) if job.is_active != active => {
                job.is_active = active;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_job(&self, id: JobId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let Some(removed) = state.jobs.remove(&id) else {
            return Ok(false);
        };
        state.job_titles.remove(&(removed.author, removed.title));
        Ok(true)
    }

    async fn add_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError> {
        let mut state = self.write()?;
        match state.jobs.get_mut(&id) {
            Some(job) if job.is_active && job.author != account => {
                Ok(job.add_like(account).then_some(job.likes))
            }
            _ => Ok(None),
        }
    }

    async fn remove_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError> {
        let mut state = self.write()?;
        match state.jobs.get_mut(&id) {
            Some(job) if job.is_active => Ok(job.remove_like(account).then_some(job.likes)),
            _ => Ok(None),
        }
    }

    async fn remove_likes_by(&self, account: AccountId) -> Result<u64, StoreError> {
        let mut state = self.write()?;
        let touched = state
            .jobs
            .values_mut()
            .map(|job| job.remove_like(account))
            .filter(|removed| *removed)
            .count();
        Ok(touched as u64)
    }

    async fn push_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.jobs.get_mut(&id) {
            Some(job) if job.is_active => {
                job.applicants.push(application);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn pull_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let Some(job) = state.jobs.get_mut(&id) else {
            return Ok(false);
        };
        let before = job.applicants.len();
        job.applicants.retain(|a| *a != application);
        Ok(job.applicants.len() != before)
    }

    async fn deactivate_jobs_by(&self, author: AccountId) -> Result<u64, StoreError> {
        let mut state = self.write()?;
        let mut touched = 0;
        for job in state.jobs.values_mut().filter(|j| j.author == author && j.is_active) {
            job.is_active = false;
            touched += 1;
        }
        Ok(touched)
    }
}

#[async_trait]
impl ApplicationStore for InMemoryStore {
    async fn insert_application(&self, application: &Application) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let key = (application.user, application.job);
        if state.applied.contains(&key) {
            return Err(duplicate(constraint::APPLICATION_USER_JOB));
        }
        state.applied.insert(key);
        state.applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn get_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(self.read()?.applications.get(&id).cloned())
    }

    async fn list_applications_by_user(&self, user: AccountId) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .read()?
            .applications
            .values()
            .filter(|a| a.user == user)
            .cloned()
            .collect())
    }

    async fn list_applications_by_job(&self, job: JobId) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .read()?
            .applications
            .values()
            .filter(|a| a.job == job)
            .cloned()
            .collect())
    }

    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.applications.get_mut(&id) {
            Some(application) => {
                application.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_application(&self, id: ApplicationId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let Some(removed) = state.applications.remove(&id) else {
            return Ok(false);
        };
        state.applied.remove(&(removed.user, removed.job));
        Ok(true)
    }

    async fn delete_applications_by_user(&self, user: AccountId) -> Result<u64, StoreError> {
        let mut state = self.write()?;
        let before = state.applications.len();
        state.applications.retain(|_, a| a.user != user);
        state.applied.retain(|(u, _)| *u != user);
        Ok((before - state.applications.len()) as u64)
    }

    async fn delete_applications_by_job(&self, job: JobId) -> Result<u64, StoreError> {
        let mut state = self.write()?;
        let before = state.applications.len();
        state.applications.retain(|_, a| a.job != job);
        state.applied.retain(|(_, j)| *j != job);
        Ok((before - state.applications.len()) as u64)
    }
}
