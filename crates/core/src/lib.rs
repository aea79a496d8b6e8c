//! `hireboard-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Owned;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{AccountId, ApplicationId, JobId};
