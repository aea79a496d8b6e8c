//! Like/unlike decision rules.
//!
//! Liking and unliking are separate operations with their own precondition
//! order. The checks run against a snapshot; the store re-checks membership
//! atomically when applying the change.

use serde::{Deserialize, Serialize};

use hireboard_core::{AccountId, DomainError, DomainResult};

use crate::Job;

pub const ALREADY_LIKED: &str = "You have already liked this job";
pub const NOT_LIKED: &str = "You have not liked this job";
pub const OWN_JOB: &str = "You can't like your own jobs";
pub const LIKE_INACTIVE: &str = "You can't like a job that is inactive";
pub const UNLIKE_INACTIVE: &str = "You can't unlike a job that is inactive";

/// State of the relation after a successful like/unlike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    pub likes: u32,
    pub is_liked: bool,
}

impl Job {
    /// Order: already liked, own job, inactive.
    pub fn check_like(&self, actor: AccountId) -> DomainResult<()> {
        if self.is_liked_by(actor) {
            return Err(DomainError::conflict(ALREADY_LIKED));
        }
        if self.author == actor {
            return Err(DomainError::forbidden(OWN_JOB));
        }
        if !self.is_active {
            return Err(DomainError::conflict(LIKE_INACTIVE));
        }
        Ok(())
    }

    /// Order: own job, inactive, not liked.
    pub fn check_unlike(&self, actor: AccountId) -> DomainResult<()> {
        if self.author == actor {
            return Err(DomainError::forbidden(OWN_JOB));
        }
        if !self.is_active {
            return Err(DomainError::conflict(UNLIKE_INACTIVE));
        }
        if !self.is_liked_by(actor) {
            return Err(DomainError::conflict(NOT_LIKED));
        }
        Ok(())
    }
}
