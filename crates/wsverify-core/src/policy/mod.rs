//! Policy layer (origin and credential matching).
//!
//! Policies are compiled once at startup and then only read.

pub mod credential;
pub mod origin;

pub use credential::CredentialPolicy;
pub use origin::OriginPolicy;
