//! Shared application state for the wsVerify gateway.
//!
//! Startup compiles the `verify` section into an admission pipeline and
//! installs it into the gateway's verifier slot. Every failure here is a
//! configuration error returned to `main`, never a per-request outcome.

use std::sync::Arc;
use std::time::Duration;

use wsverify_core::error::{Result, VerifyError};
use wsverify_core::pipeline::AdmissionConfigBuilder;
use wsverify_core::{AdmissionPipeline, UpgradeVerifier, VerifierSlot};

use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    verifier: Arc<dyn UpgradeVerifier>,
}

impl AppState {
    /// Build state from YAML-only policy.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        Self::build(cfg, VerifierSlot::new(), |b| b)
    }

    /// Build state, letting code attach predicates or a custom check on top
    /// of the YAML policy, and install into `slot`.
    pub fn build<F>(cfg: GatewayConfig, mut slot: VerifierSlot, customize: F) -> Result<Self>
    where
        F: FnOnce(AdmissionConfigBuilder) -> AdmissionConfigBuilder,
    {
        let policy = match &cfg.verify {
            Some(section) => Some(customize(section.to_builder()?).build()?),
            None => None,
        };

        let pipeline = AdmissionPipeline::new(policy)?;
        tracing::info!(
            require_secure = pipeline.config().require_secure_transport,
            origin_policy = pipeline.config().origin_policy.as_ref().map(|p| p.kind()),
            credential_header = pipeline.config().credential_header_name(),
            custom_check = pipeline.config().custom_check.is_some(),
            "admission pipeline configured"
        );
        pipeline.install(&mut slot)?;

        let verifier = slot
            .get()
            .ok_or_else(|| VerifyError::Internal("verifier slot empty after install".into()))?;

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, verifier }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn verifier(&self) -> Arc<dyn UpgradeVerifier> {
        Arc::clone(&self.inner.verifier)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.inner.cfg.gateway.check_timeout_ms)
    }
}
