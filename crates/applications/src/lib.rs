//! Applications domain module.
//!
//! An application links one applicant to one job and carries the review
//! status set by the job's author. Pure domain logic, no IO.

pub mod application;
pub mod projection;

pub use application::{Application, ApplicationStatus, StatusTransition};
pub use projection::{ApplicantApplicationView, JobApplicantView, StatusUpdated};
