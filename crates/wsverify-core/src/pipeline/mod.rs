//! Admission pipeline: fixed gates, custom check, single resolution.

pub mod config;
pub mod engine;
pub mod hook;
pub mod responder;

pub use config::{AdmissionConfig, AdmissionConfigBuilder, CustomCheck};
pub use engine::AdmissionPipeline;
pub use hook::{Completion, UpgradeVerifier, VerifierSlot};
pub use responder::Responder;
