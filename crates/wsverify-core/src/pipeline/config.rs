//! Aggregate admission policy for one running service instance.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, VerifyError};
use crate::policy::{CredentialPolicy, OriginPolicy};
use crate::request::{RequestDescriptor, DEFAULT_CREDENTIAL_HEADER};

use super::responder::Responder;

/// Caller-supplied admission logic that runs after the built-in gates.
///
/// Return `Some(bool)` to decide immediately, or `None` and resolve later
/// through the [`Responder`]. Whatever resolves first wins.
pub trait CustomCheck: Send + Sync {
    fn check(&self, request: &RequestDescriptor, responder: Responder) -> Option<bool>;
}

impl<F> CustomCheck for F
where
    F: Fn(&RequestDescriptor, Responder) -> Option<bool> + Send + Sync,
{
    fn check(&self, request: &RequestDescriptor, responder: Responder) -> Option<bool> {
        self(request, responder)
    }
}

/// Read-only after construction; share it behind `Arc`.
#[derive(Clone, Default)]
pub struct AdmissionConfig {
    pub require_secure_transport: bool,
    pub origin_policy: Option<OriginPolicy>,
    pub credential_policy: Option<CredentialPolicy>,
    /// Lower-cased. `None` means [`DEFAULT_CREDENTIAL_HEADER`].
    pub credential_header: Option<String>,
    pub custom_check: Option<Arc<dyn CustomCheck>>,
    pub allow_policy_override: bool,
}

impl fmt::Debug for AdmissionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionConfig")
            .field("require_secure_transport", &self.require_secure_transport)
            .field("origin_policy", &self.origin_policy)
            .field("credential_policy", &self.credential_policy)
            .field("credential_header", &self.credential_header)
            .field("custom_check", &self.custom_check.as_ref().map(|_| "<function>"))
            .field("allow_policy_override", &self.allow_policy_override)
            .finish()
    }
}

impl AdmissionConfig {
    pub fn builder() -> AdmissionConfigBuilder {
        AdmissionConfigBuilder::default()
    }

    pub fn credential_header_name(&self) -> &str {
        self.credential_header
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_HEADER)
    }
}

#[derive(Default)]
pub struct AdmissionConfigBuilder {
    cfg: AdmissionConfig,
}

impl AdmissionConfigBuilder {
    pub fn require_secure_transport(mut self, on: bool) -> Self {
        self.cfg.require_secure_transport = on;
        self
    }

    pub fn origins(mut self, policy: OriginPolicy) -> Self {
        self.cfg.origin_policy = Some(policy);
        self
    }

    pub fn credential(mut self, policy: CredentialPolicy) -> Self {
        self.cfg.credential_policy = Some(policy);
        self
    }

    pub fn credential_header(mut self, name: impl Into<String>) -> Self {
        self.cfg.credential_header = Some(name.into());
        self
    }

    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(&RequestDescriptor, Responder) -> Option<bool> + Send + Sync + 'static,
    {
        self.check_with(Arc::new(f))
    }

    pub fn check_with(mut self, check: Arc<dyn CustomCheck>) -> Self {
        self.cfg.custom_check = Some(check);
        self
    }

    pub fn allow_override(mut self, on: bool) -> Self {
        self.cfg.allow_policy_override = on;
        self
    }

    pub fn build(mut self) -> Result<AdmissionConfig> {
        if let Some(name) = self.cfg.credential_header.take() {
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return Err(VerifyError::BadConfig(
                    "credential header name must not be empty".into(),
                ));
            }
            self.cfg.credential_header = Some(name);
        }
        Ok(self.cfg)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn header_defaults_to_authorization() {
        let cfg = AdmissionConfig::builder().build().unwrap();
        assert_eq!(cfg.credential_header_name(), "authorization");
    }

    #[test]
    fn header_name_is_normalized() {
        let cfg = AdmissionConfig::builder()
            .credential_header("X-Auth-Token")
            .build()
            .unwrap();
        assert_eq!(cfg.credential_header_name(), "x-auth-token");
    }

    #[test]
    fn empty_header_name_rejected() {
        let err = AdmissionConfig::builder()
            .credential_header("  ")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), "BAD_CONFIG");
    }
}
