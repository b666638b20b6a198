//! Shared error type across wsVerify crates.
//!
//! Only configuration faults live here. A rejected upgrade is a normal
//! [`AdmissionDecision`](crate::request::AdmissionDecision), not an error.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// No policy container was supplied when building the pipeline.
    #[error("verify policy is required to initialize the admission pipeline")]
    MissingPolicy,
    /// A verifier is already installed and override was not permitted.
    #[error("cannot override existing upgrade verifier without `override`")]
    HookConflict,
    #[error("invalid origin pattern: {0}")]
    InvalidPattern(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl VerifyError {
    /// Stable short label, used in logs and test assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::MissingPolicy => "MISSING_POLICY",
            VerifyError::HookConflict => "HOOK_CONFLICT",
            VerifyError::InvalidPattern(_) => "INVALID_PATTERN",
            VerifyError::BadConfig(_) => "BAD_CONFIG",
            VerifyError::UnsupportedVersion => "UNSUPPORTED_VERSION",
            VerifyError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<regex::Error> for VerifyError {
    fn from(e: regex::Error) -> Self {
        VerifyError::InvalidPattern(e.to_string())
    }
}
