//! Process-wide tracing setup shared by the binaries.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize tracing with the format named by `LOG_FORMAT` (JSON unless it
/// says `pretty`).
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
