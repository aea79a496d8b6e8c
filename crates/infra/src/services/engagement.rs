use tracing::info;

use hireboard_core::{AccountId, DomainError, DomainResult, JobId};
use hireboard_jobs::engagement::{ALREADY_LIKED, NOT_LIKED};
use hireboard_jobs::{Job, LikeOutcome};

use super::{denied, store_fault};
use crate::store::Store;

/// Like/unlike.
///
/// Preconditions are checked against a snapshot for a precise refusal reason;
/// the change itself is the store's conditional update, so two concurrent
/// identical requests cannot both succeed.
#[derive(Debug, Clone)]
pub struct Engagement<S> {
    store: S,
}

impl<S: Store> Engagement<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn like(&self, job_id: JobId, actor: AccountId) -> DomainResult<LikeOutcome> {
        let job = self.load(job_id, "engagement.like").await?;
        job.check_like(actor).map_err(|e| denied("engagement.like", e))?;

        let Some(likes) = self
            .store
            .add_like(job_id, actor)
            .await
            .map_err(store_fault("engagement.like"))?
        else {
            return Err(self.lost_race(job_id, actor, true).await);
        };

        info!(job_id = %job_id, actor = %actor, likes, "job liked");
        Ok(LikeOutcome { likes, is_liked: true })
    }

    pub async fn unlike(&self, job_id: JobId, actor: AccountId) -> DomainResult<LikeOutcome> {
        let job = self.load(job_id, "engagement.unlike").await?;
        job.check_unlike(actor).map_err(|e| denied("engagement.unlike", e))?;

        let Some(likes) = self
            .store
            .remove_like(job_id, actor)
            .await
            .map_err(store_fault("engagement.unlike"))?
        else {
            return Err(self.lost_race(job_id, actor, false).await);
        };

        info!(job_id = %job_id, actor = %actor, likes, "job unliked");
        Ok(LikeOutcome { likes, is_liked: false })
    }

    /// The conditional update refused after the snapshot check passed: some
    /// concurrent request changed the job. Re-read and explain.
    async fn lost_race(&self, job_id: JobId, actor: AccountId, liking: bool) -> DomainError {
        let operation = if liking { "engagement.like" } else { "engagement.unlike" };
        let job = match self.load(job_id, operation).await {
            Ok(job) => job,
            Err(e) => return e,
        };

        let check = if liking { job.check_like(actor) } else { job.check_unlike(actor) };
        let err = check.err().unwrap_or_else(|| {
            DomainError::conflict(if liking { ALREADY_LIKED } else { NOT_LIKED })
        });
        denied(operation, err)
    }

    async fn load(&self, job_id: JobId, operation: &'static str) -> DomainResult<Job> {
        self.store
            .get_job(job_id)
            .await
            .map_err(store_fault(operation))?
            .ok_or_else(|| denied(operation, DomainError::not_found("Job not found")))
    }
}
