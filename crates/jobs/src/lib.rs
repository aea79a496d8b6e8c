//! Jobs domain module.
//!
//! Job postings, their activation state and the like relation, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).
//! Atomicity of the like toggle is the store's job; the rules here decide
//! which outcome a request gets.

pub mod engagement;
pub mod job;
pub mod projection;

pub use engagement::LikeOutcome;
pub use job::{Job, JobPatch, NewJob};
pub use projection::{sort_active_first, JobView, OwnedJobView};
