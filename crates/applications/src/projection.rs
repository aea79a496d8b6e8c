use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hireboard_auth::ApplicantProfile;
use hireboard_core::{AccountId, ApplicationId, JobId};
use hireboard_jobs::{Job, JobView};

use crate::{Application, ApplicationStatus};

/// An application as its applicant sees it, joined with the public job view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantApplicationView {
    pub id: ApplicationId,
    pub job: JobView,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub applied_at: DateTime<Utc>,
}

impl ApplicantApplicationView {
    pub fn new(application: &Application, job: &Job, viewer: AccountId) -> Self {
        Self {
            id: application.id,
            job: JobView::for_viewer(job, viewer),
            status: application.status,
            cover_letter: application.cover_letter.clone(),
            applied_at: application.applied_at,
        }
    }
}

/// An application as the job's author sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicantView {
    pub id: ApplicationId,
    pub user: ApplicantProfile,
    pub job: JobId,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub applied_at: DateTime<Utc>,
}

impl JobApplicantView {
    pub fn new(application: &Application, applicant: ApplicantProfile) -> Self {
        Self {
            id: application.id,
            user: applicant,
            job: application.job,
            status: application.status,
            cover_letter: application.cover_letter.clone(),
            applied_at: application.applied_at,
        }
    }
}

/// Result of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdated {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub job: JobId,
}

impl From<&Application> for StatusUpdated {
    fn from(application: &Application) -> Self {
        Self {
            id: application.id,
            status: application.status,
            job: application.job,
        }
    }
}
