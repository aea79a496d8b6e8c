//! `hireboard-auth` — identity, credentials and the authorization policy.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod account;
pub mod authorize;
pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use account::{Account, AccountPatch, AccountView, ApplicantProfile, Registration};
pub use authorize::{authorize, AuthzError, Policy};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use password::{hash_password_with_cost, verify_password, PasswordError};
pub use roles::Role;
pub use token::{Hs256TokenService, TokenError, TokenVerifier};
