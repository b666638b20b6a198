//! wsVerify core: connection-admission pipeline for real-time upgrades.
//!
//! Decides, per upgrade attempt, whether to admit or reject based on
//! transport security, origin, a credential header and an optional custom
//! check that may answer synchronously or later. The crate carries no
//! transport or runtime dependencies and performs no global registration;
//! the hosting layer installs the pipeline into its own hook.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Caller-supplied
//! predicates and checks are the only code that may panic, and those panics
//! are not caught.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod pipeline;
pub mod policy;
pub mod request;

/// Shared result type.
pub use error::{Result, VerifyError};
pub use pipeline::{
    AdmissionConfig, AdmissionPipeline, CustomCheck, Responder, UpgradeVerifier, VerifierSlot,
};
pub use policy::{CredentialPolicy, OriginPolicy};
pub use request::{AdmissionDecision, RequestDescriptor};
