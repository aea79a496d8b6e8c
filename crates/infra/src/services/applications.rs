use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use hireboard_applications::{
    ApplicantApplicationView, Application, ApplicationStatus, JobApplicantView, StatusTransition,
    StatusUpdated,
};
use hireboard_auth::{Claims, Role};
use hireboard_core::{AccountId, ApplicationId, DomainError, DomainResult, JobId, Owned};
use hireboard_jobs::Job;

use super::{denied, store_fault};
use crate::store::{Store, StoreError};

pub const JOB_UNAVAILABLE: &str = "Job is not active or does not exist";
pub const ALREADY_APPLIED: &str = "You have already applied for this job";

/// Applying to jobs and reviewing applications.
#[derive(Debug, Clone)]
pub struct ApplicationLifecycle<S> {
    store: S,
}

impl<S: Store> ApplicationLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a pending application and link it to the job.
    ///
    /// The insert and the link are two store writes; if linking fails the
    /// application is removed again.
    pub async fn apply(
        &self,
        job_id: JobId,
        applicant: &Claims,
        cover_letter: &str,
    ) -> DomainResult<ApplicantApplicationView> {
        const OP: &str = "applications.apply";

        let job = self
            .store
            .get_job(job_id)
            .await
            .map_err(store_fault(OP))?
            .filter(|j| j.is_active)
            .ok_or_else(|| denied(OP, DomainError::validation(JOB_UNAVAILABLE)))?;

        if !applicant.has_role(Role::User) {
            return Err(denied(
                OP,
                DomainError::forbidden("Organizations/admins cannot apply for jobs"),
            ));
        }

        let application = Application::submit(applicant.id, job_id, cover_letter, Utc::now())
            .map_err(|e| denied(OP, e))?;

        match self.store.insert_application(&application).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                return Err(denied(OP, DomainError::conflict(ALREADY_APPLIED)));
            }
            Err(e) => return Err(store_fault(OP)(e)),
        }

        let linked = match self.store.push_applicant(job_id, application.id).await {
            Ok(linked) => linked,
            Err(e) => {
                self.unlink_failed(&application).await;
                return Err(store_fault(OP)(e));
            }
        };
        if !linked {
            // Job was deleted or deactivated between the read and the link.
            self.unlink_failed(&application).await;
            return Err(denied(OP, DomainError::validation(JOB_UNAVAILABLE)));
        }

        info!(
            application_id = %application.id,
            job_id = %job_id,
            applicant = %applicant.id,
            "application submitted"
        );
        Ok(ApplicantApplicationView::new(&application, &job, applicant.id))
    }

    async fn unlink_failed(&self, application: &Application) {
        if let Err(e) = self.store.delete_application(application.id).await {
            tracing::error!(
                application_id = %application.id,
                error = %e,
                "failed to remove unlinked application"
            );
        }
    }

    /// Every application by `applicant`, joined with the public job view.
    pub async fn list_for_applicant(
        &self,
        applicant: AccountId,
    ) -> DomainResult<Vec<ApplicantApplicationView>> {
        const OP: &str = "applications.list_for_applicant";

        let applications = self
            .store
            .list_applications_by_user(applicant)
            .await
            .map_err(store_fault(OP))?;

        let mut views = Vec::with_capacity(applications.len());
        for application in &applications {
            match self.store.get_job(application.job).await.map_err(store_fault(OP))? {
                Some(job) => views.push(ApplicantApplicationView::new(application, &job, applicant)),
                None => warn!(
                    application_id = %application.id,
                    job_id = %application.job,
                    "application references a missing job"
                ),
            }
        }
        Ok(views)
    }

    /// Applications to a job, with applicant profiles. Job author only.
    pub async fn list_for_job(
        &self,
        job_id: JobId,
        actor: AccountId,
    ) -> DomainResult<Vec<JobApplicantView>> {
        const OP: &str = "applications.list_for_job";

        let job = self.load_job(job_id, OP).await?;
        if !job.is_owned_by(actor) {
            return Err(denied(
                OP,
                DomainError::forbidden("You are not authorized to view applicants for this job"),
            ));
        }

        let applications = self
            .store
            .list_applications_by_job(job_id)
            .await
            .map_err(store_fault(OP))?;
        let ids: Vec<AccountId> = applications.iter().map(|a| a.user).collect();
        let profiles: HashMap<AccountId, _> = self
            .store
            .get_accounts(&ids)
            .await
            .map_err(store_fault(OP))?
            .into_iter()
            .map(|account| (account.id, account.applicant_profile()))
            .collect();

        Ok(applications
            .iter()
            .filter_map(|application| match profiles.get(&application.user) {
                Some(profile) => Some(JobApplicantView::new(application, profile.clone())),
                None => {
                    warn!(application_id = %application.id, "application references a missing account");
                    None
                }
            })
            .collect())
    }

    /// Set an application's status. Only the author of the application's job
    /// may do this.
    pub async fn update_status(
        &self,
        application_id: ApplicationId,
        actor: AccountId,
        status: &str,
    ) -> DomainResult<StatusUpdated> {
        const OP: &str = "applications.update_status";

        let status: ApplicationStatus = status.parse().map_err(|e| denied(OP, e))?;

        let mut application = self
            .store
            .get_application(application_id)
            .await
            .map_err(store_fault(OP))?
            .ok_or_else(|| denied(OP, DomainError::not_found("Application not found")))?;

        let job = self.load_job(application.job, OP).await?;
        if !job.is_owned_by(actor) {
            return Err(denied(
                OP,
                DomainError::forbidden("You are not authorized to update this application"),
            ));
        }

        let from = application.status;
        let transition = application.set_status(status);
        if transition != StatusTransition::Advance {
            warn!(
                application_id = %application_id,
                from = %from,
                to = %status,
                ?transition,
                "application status set outside the pending -> decided transition"
            );
        }

        let updated = self
            .store
            .set_application_status(application_id, status)
            .await
            .map_err(store_fault(OP))?;
        if !updated {
            return Err(denied(OP, DomainError::not_found("Application not found")));
        }

        info!(application_id = %application_id, actor = %actor, status = %status, "application status updated");
        Ok(StatusUpdated::from(&application))
    }

    async fn load_job(&self, job_id: JobId, operation: &'static str) -> DomainResult<Job> {
        self.store
            .get_job(job_id)
            .await
            .map_err(store_fault(operation))?
            .ok_or_else(|| denied(operation, DomainError::not_found("Job not found")))
    }
}
