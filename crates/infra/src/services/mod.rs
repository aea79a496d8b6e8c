//! Lifecycle managers.
//!
//! Stateless services holding only a store handle. Each operation receives
//! the acting identity explicitly, runs the domain checks and applies the
//! result through the store's atomic primitives.
//!
//! Logging convention: successful transitions at `info`, business-rule
//! denials at `debug`, store faults at `error`.

pub mod accounts;
pub mod applications;
pub mod engagement;
pub mod jobs;

pub use accounts::AccountService;
pub use applications::ApplicationLifecycle;
pub use engagement::Engagement;
pub use jobs::JobLifecycle;

use hireboard_core::DomainError;

use crate::store::StoreError;

/// Map a store fault to `Internal`, logging the detail.
pub(crate) fn store_fault(operation: &'static str) -> impl Fn(StoreError) -> DomainError {
    move |err| {
        tracing::error!(operation, error = %err, "store operation failed");
        DomainError::from(err)
    }
}

/// Log a business-rule denial and pass it through.
pub(crate) fn denied(operation: &'static str, err: DomainError) -> DomainError {
    tracing::debug!(operation, kind = err.kind().as_str(), reason = %err.public_message(), "operation denied");
    err
}
