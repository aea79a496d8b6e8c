use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hireboard_core::{AccountId, ApplicationId, DomainError, DomainResult, JobId};

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    /// `Accepted` and `Rejected` have no defined successor.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl core::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ApplicationStatus::Pending),
            "ACCEPTED" => Ok(ApplicationStatus::Accepted),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            _ => Err(DomainError::validation("Invalid status")),
        }
    }
}

/// How a status change relates to the state machine.
///
/// Only `Advance` is a defined transition. The others are accepted but
/// callers are expected to log them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// `Pending` to a terminal status.
    Advance,
    /// Target equals the current status.
    Unchanged,
    /// Leaves a terminal status.
    LeavesTerminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: ApplicationId,
    /// The applicant.
    pub user: AccountId,
    pub job: JobId,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub applied_at: DateTime<Utc>,
}

impl Application {
    /// A fresh `Pending` application. The cover letter must not be blank.
    pub fn submit(
        user: AccountId,
        job: JobId,
        cover_letter: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if cover_letter.trim().is_empty() {
            return Err(DomainError::validation("Cover letter is required"));
        }

        Ok(Self {
            id: ApplicationId::new(),
            user,
            job,
            status: ApplicationStatus::Pending,
            cover_letter: cover_letter.to_string(),
            applied_at: now,
        })
    }

    pub fn classify(&self, to: ApplicationStatus) -> StatusTransition {
        if self.status == to {
            StatusTransition::Unchanged
        } else if self.status.is_terminal() {
            StatusTransition::LeavesTerminal
        } else {
            StatusTransition::Advance
        }
    }

    /// Set the status and report what kind of change it was.
    pub fn set_status(&mut self, to: ApplicationStatus) -> StatusTransition {
        let transition = self.classify(to);
        self.status = to;
        transition
    }
}
