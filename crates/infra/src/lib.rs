//! Infrastructure layer: persistent stores and the lifecycle managers that
//! drive them.

pub mod services;
pub mod store;

pub use services::{AccountService, ApplicationLifecycle, Engagement, JobLifecycle};
pub use store::{InMemoryStore, PgStore, Store, StoreError};
