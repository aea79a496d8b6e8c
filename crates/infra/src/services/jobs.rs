use tracing::info;

use hireboard_core::{AccountId, DomainError, DomainResult, JobId};
use hireboard_jobs::{sort_active_first, Job, JobPatch, JobView, NewJob, OwnedJobView};

use super::{denied, store_fault};
use crate::store::{Store, StoreError};

pub const DUPLICATE_TITLE: &str = "An organization cannot create a job with the same title";

/// Job creation, edits, activation, deletion and job reads.
#[derive(Debug, Clone)]
pub struct JobLifecycle<S> {
    store: S,
}

impl<S: Store> JobLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        owner: AccountId,
        owner_name: &str,
        request: NewJob,
    ) -> DomainResult<OwnedJobView> {
        request.validate().map_err(|e| denied("jobs.create", e))?;

        let job = request.into_job(owner, owner_name);
        match self.store.insert_job(&job).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                return Err(denied("jobs.create", DomainError::conflict(DUPLICATE_TITLE)));
            }
            Err(e) => return Err(store_fault("jobs.create")(e)),
        }

        info!(job_id = %job.id, author = %owner, title = %job.title, "job created");
        Ok(OwnedJobView::from(&job))
    }

    pub async fn get(&self, job_id: JobId, viewer: AccountId) -> DomainResult<JobView> {
        let job = self.load(job_id, "jobs.get").await?;
        Ok(JobView::for_viewer(&job, viewer))
    }

    /// Merge the provided fields into the job. Author only.
    ///
    /// Only the fields the patch sets are written.
    pub async fn update(
        &self,
        job_id: JobId,
        actor: AccountId,
        patch: JobPatch,
    ) -> DomainResult<OwnedJobView> {
        let job = self.load(job_id, "jobs.update").await?;
        job.ensure_author(actor, "update")
            .map_err(|e| denied("jobs.update", e))?;

        let job = match self.store.update_job_details(job_id, &patch).await {
            Ok(Some(job)) => job,
            Ok(None) => return Err(denied("jobs.update", not_found(job_id))),
            Err(StoreError::Duplicate(_)) => {
                return Err(denied("jobs.update", DomainError::conflict(DUPLICATE_TITLE)));
            }
            Err(e) => return Err(store_fault("jobs.update")(e)),
        };

        info!(job_id = %job_id, actor = %actor, "job updated");
        Ok(OwnedJobView::from(&job))
    }

    pub async fn activate(&self, job_id: JobId, actor: AccountId) -> DomainResult<()> {
        self.set_active(job_id, actor, true).await
    }

    pub async fn deactivate(&self, job_id: JobId, actor: AccountId) -> DomainResult<()> {
        self.set_active(job_id, actor, false).await
    }

    async fn set_active(&self, job_id: JobId, actor: AccountId, active: bool) -> DomainResult<()> {
        let operation = if active { "jobs.activate" } else { "jobs.deactivate" };

        let job = self.load(job_id, operation).await?;
        let verb = if active { "activate" } else { "deactivate" };
        job.ensure_author(actor, verb).map_err(|e| denied(operation, e))?;
        job.check_activation(active).map_err(|e| denied(operation, e))?;

        let flipped = self
            .store
            .set_job_active(job_id, active)
            .await
            .map_err(store_fault(operation))?;
        if !flipped {
            // Lost a race with a concurrent flip or delete; report the state we now see.
            let current = self.load(job_id, operation).await?;
            current.check_activation(active).map_err(|e| denied(operation, e))?;
            return Err(denied(operation, DomainError::conflict("Job state changed concurrently")));
        }

        info!(job_id = %job_id, actor = %actor, active, "job activation changed");
        Ok(())
    }

    /// Delete a job and its applications. Author only.
    ///
    /// The job row goes before the application sweep; `apply` cannot link to
    /// a missing job.
    pub async fn delete(&self, job_id: JobId, actor: AccountId) -> DomainResult<()> {
        let job = self.load(job_id, "jobs.delete").await?;
        job.ensure_author(actor, "delete")
            .map_err(|e| denied("jobs.delete", e))?;

        let deleted = self
            .store
            .delete_job(job_id)
            .await
            .map_err(store_fault("jobs.delete"))?;
        if !deleted {
            return Err(denied("jobs.delete", not_found(job_id)));
        }
        let removed_applications = self
            .store
            .delete_applications_by_job(job_id)
            .await
            .map_err(store_fault("jobs.delete"))?;

        info!(job_id = %job_id, actor = %actor, removed_applications, "job deleted");
        Ok(())
    }

    /// Active jobs as seen by `viewer`.
    pub async fn list_active(&self, viewer: AccountId) -> DomainResult<Vec<JobView>> {
        let jobs = self
            .store
            .list_active_jobs()
            .await
            .map_err(store_fault("jobs.list_active"))?;
        Ok(jobs.iter().map(|j| JobView::for_viewer(j, viewer)).collect())
    }

    /// Every job by `owner`, active first.
    pub async fn list_by_owner(&self, owner: AccountId) -> DomainResult<Vec<OwnedJobView>> {
        let mut jobs = self
            .store
            .list_jobs_by_author(owner)
            .await
            .map_err(store_fault("jobs.list_by_owner"))?;
        sort_active_first(&mut jobs);
        Ok(jobs.iter().map(OwnedJobView::from).collect())
    }

    /// Active jobs liked by `viewer`.
    pub async fn list_liked(&self, viewer: AccountId) -> DomainResult<Vec<JobView>> {
        let jobs = self
            .store
            .list_jobs_liked_by(viewer)
            .await
            .map_err(store_fault("jobs.list_liked"))?;
        Ok(jobs.iter().map(|j| JobView::for_viewer(j, viewer)).collect())
    }

    async fn load(&self, job_id: JobId, operation: &'static str) -> DomainResult<Job> {
        self.store
            .get_job(job_id)
            .await
            .map_err(store_fault(operation))?
            .ok_or_else(|| denied(operation, not_found(job_id)))
    }
}

fn not_found(job_id: JobId) -> DomainError {
    DomainError::not_found(format!("Job with id {job_id} could not be found"))
}
