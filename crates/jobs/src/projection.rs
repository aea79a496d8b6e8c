//! Externally visible shapes of a job.

use serde::{Deserialize, Serialize};

use hireboard_core::{AccountId, JobId};

use crate::Job;

/// Public feed entry. Author id, likers and applicants are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: JobId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub category: String,
    pub author_name: String,
    pub is_active: bool,
    pub likes: u32,
    pub is_liked: bool,
}

impl JobView {
    pub fn for_viewer(job: &Job, viewer: AccountId) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            description: job.description.clone(),
            job_type: job.job_type.clone(),
            category: job.category.clone(),
            author_name: job.author_name.clone(),
            is_active: job.is_active,
            likes: job.likes,
            is_liked: job.is_liked_by(viewer),
        }
    }
}

/// A job as its author sees it: applicant count instead of applicant records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedJobView {
    pub id: JobId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub category: String,
    pub author: AccountId,
    pub author_name: String,
    pub is_active: bool,
    pub likes: u32,
    pub applicant_count: usize,
}

impl From<&Job> for OwnedJobView {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            description: job.description.clone(),
            job_type: job.job_type.clone(),
            category: job.category.clone(),
            author: job.author,
            author_name: job.author_name.clone(),
            is_active: job.is_active,
            likes: job.likes,
            applicant_count: job.applicants.len(),
        }
    }
}

/// Stable sort putting active jobs first.
pub fn sort_active_first(jobs: &mut [Job]) {
    jobs.sort_by_key(|job| !job.is_active);
}
