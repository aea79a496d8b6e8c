use serde::{Deserialize, Serialize};

use hireboard_core::{AccountId, ApplicationId, DomainError, DomainResult, JobId, Owned};

/// A job posting.
///
/// `likes` always equals `liked_by.len()`; only [`Job::add_like`] and
/// [`Job::remove_like`] touch either field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub job_type: String,
    pub category: String,
    /// Immutable after creation.
    pub author: AccountId,
    /// Author username at posting time.
    pub author_name: String,
    pub is_active: bool,
    pub likes: u32,
    pub liked_by: Vec<AccountId>,
    pub applicants: Vec<ApplicationId>,
}

impl Job {
    pub fn is_liked_by(&self, account: AccountId) -> bool {
        self.liked_by.contains(&account)
    }

    /// Authorship check for mutating operations. `action` names the
    /// operation in the refusal ("update", "delete", ...).
    pub fn ensure_author(&self, actor: AccountId, action: &str) -> DomainResult<()> {
        if !self.is_owned_by(actor) {
            return Err(DomainError::forbidden(format!(
                "You are not authorized to {action} this job"
            )));
        }
        Ok(())
    }

    /// Precondition for moving the job into the `active` state.
    pub fn check_activation(&self, active: bool) -> DomainResult<()> {
        match (self.is_active, active) {
            (true, true) => Err(DomainError::conflict("Job is already active")),
            (false, false) => Err(DomainError::conflict("Job is already inactive")),
            _ => Ok(()),
        }
    }

    /// Add a liker. Returns `false` (and changes nothing) if already present.
    pub fn add_like(&mut self, account: AccountId) -> bool {
        if self.is_liked_by(account) {
            return false;
        }
        self.liked_by.push(account);
        self.likes += 1;
        true
    }

    /// Remove a liker. Returns `false` (and changes nothing) if absent.
    pub fn remove_like(&mut self, account: AccountId) -> bool {
        let before = self.liked_by.len();
        self.liked_by.retain(|id| *id != account);
        if self.liked_by.len() == before {
            return false;
        }
        self.likes = self.likes.saturating_sub(1);
        true
    }
}

impl Owned for Job {
    fn owner(&self) -> AccountId {
        self.author
    }
}

/// Request to post a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub category: String,
}

impl NewJob {
    pub fn validate(&self) -> DomainResult<()> {
        required(&self.title, "Title")?;
        required(&self.job_type, "Type")?;
        required(&self.category, "Category")?;
        Ok(())
    }

    /// Build an active job with no likes and no applicants.
    pub fn into_job(self, author: AccountId, author_name: impl Into<String>) -> Job {
        Job {
            id: JobId::new(),
            title: self.title.trim().to_string(),
            description: self.description,
            job_type: self.job_type.trim().to_string(),
            category: self.category.trim().to_string(),
            author,
            author_name: author_name.into(),
            is_active: true,
            likes: 0,
            liked_by: Vec::new(),
            applicants: Vec::new(),
        }
    }
}

fn required(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Partial update of a job's descriptive fields.
///
/// Absent or empty fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub category: Option<String>,
}

impl JobPatch {
    /// The fields this patch actually sets, trimmed the way they are stored.
    /// Blank fields become `None`.
    pub fn normalized(&self) -> JobPatch {
        JobPatch {
            title: provided(&self.title).map(|t| t.trim().to_string()),
            description: provided(&self.description).map(str::to_string),
            job_type: provided(&self.job_type).map(|t| t.trim().to_string()),
            category: provided(&self.category).map(|c| c.trim().to_string()),
        }
    }

    pub fn apply(&self, job: &mut Job) {
        let JobPatch { title, description, job_type, category } = self.normalized();
        if let Some(title) = title {
            job.title = title;
        }
        if let Some(description) = description {
            job.description = description;
        }
        if let Some(job_type) = job_type {
            job.job_type = job_type;
        }
        if let Some(category) = category {
            job.category = category;
        }
    }
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
