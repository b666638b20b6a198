//! Admission pipeline runtime.
//!
//! Gate order is fixed and short-circuits on the first failure:
//! 1) transport security  2) origin  3) credential header  4) custom check.
//!
//! Construct once at startup, then share via clone (the config sits behind
//! `Arc` and is never mutated).

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Result, VerifyError};
use crate::request::{AdmissionDecision, RequestDescriptor};

use super::config::AdmissionConfig;
use super::hook::VerifierSlot;
use super::responder::Responder;

pub const REJECT_STATUS: u16 = 400;
pub const MSG_INSECURE: &str = "Insecure connection";
pub const MSG_ORIGIN: &str = "Origin forbidden";
pub const MSG_FORBIDDEN: &str = "Forbidden";

#[derive(Debug, Clone)]
pub struct AdmissionPipeline {
    config: Arc<AdmissionConfig>,
}

impl AdmissionPipeline {
    /// Fails with [`VerifyError::MissingPolicy`] when no policy is given.
    pub fn new(config: Option<AdmissionConfig>) -> Result<Self> {
        let config = config.ok_or(VerifyError::MissingPolicy)?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Install into `slot`, honoring the config's override flag.
    pub fn install(self, slot: &mut VerifierSlot) -> Result<()> {
        let allow_override = self.config.allow_policy_override;
        slot.install(Arc::new(self), allow_override)
    }

    /// Evaluate one upgrade attempt. `resolve` is called at most once:
    /// exactly once unless the custom check panics or drops its responder.
    pub fn evaluate<F>(&self, request: RequestDescriptor, resolve: F)
    where
        F: FnOnce(AdmissionDecision) + Send + 'static,
    {
        if let Some(rejected) = self.run_gates(&request) {
            resolve(rejected);
            return;
        }

        let Some(check) = &self.config.custom_check else {
            tracing::debug!("upgrade admitted");
            resolve(AdmissionDecision::Admit);
            return;
        };

        let responder = Responder::new(resolve);
        match check.check(&request, responder.clone()) {
            Some(true) => {
                responder.admit();
            }
            Some(false) => {
                responder.reject(REJECT_STATUS, None);
            }
            None => {
                if !responder.is_resolved() {
                    tracing::debug!("custom check deferred");
                }
            }
        }
    }

    /// Run the pipeline and return the decision if it resolved before
    /// this call returns. Deferred checks yield `None`.
    pub fn evaluate_now(&self, request: RequestDescriptor) -> Option<AdmissionDecision> {
        let out = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&out);
        self.evaluate(request, move |d| {
            *sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(d);
        });
        let decision = out.lock().unwrap_or_else(PoisonError::into_inner).take();
        decision
    }

    /// Built-in gates. `Some` means rejected.
    fn run_gates(&self, request: &RequestDescriptor) -> Option<AdmissionDecision> {
        let cfg = &self.config;

        // 1) Transport security
        if cfg.require_secure_transport && !request.is_secure_transport {
            tracing::debug!(gate = "secure", status = REJECT_STATUS, "upgrade rejected");
            return Some(AdmissionDecision::reject(REJECT_STATUS, MSG_INSECURE));
        }

        // 2) Origin
        if let Some(policy) = &cfg.origin_policy {
            if !policy.matches(&request.origin) {
                tracing::debug!(
                    gate = "origin",
                    kind = policy.kind(),
                    origin = %request.origin,
                    status = REJECT_STATUS,
                    "upgrade rejected"
                );
                return Some(AdmissionDecision::reject(REJECT_STATUS, MSG_ORIGIN));
            }
        }

        // 3) Credential header
        if let Some(policy) = &cfg.credential_policy {
            let header = cfg.credential_header_name();
            let ok = match request.header(header) {
                Some(v) if !v.is_empty() => policy.matches(v),
                _ => false,
            };
            if !ok {
                tracing::debug!(
                    gate = "credential",
                    header,
                    kind = policy.kind(),
                    status = REJECT_STATUS,
                    "upgrade rejected"
                );
                return Some(AdmissionDecision::reject(REJECT_STATUS, MSG_FORBIDDEN));
            }
        }

        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::policy::{CredentialPolicy, OriginPolicy};

    fn pipeline(cfg: AdmissionConfig) -> AdmissionPipeline {
        AdmissionPipeline::new(Some(cfg)).unwrap()
    }

    #[test]
    fn missing_policy_is_fatal() {
        let err = AdmissionPipeline::new(None).unwrap_err();
        assert!(matches!(err, VerifyError::MissingPolicy));
    }

    #[test]
    fn empty_policy_admits() {
        let p = pipeline(AdmissionConfig::default());
        let d = p.evaluate_now(RequestDescriptor::new(false, ""));
        assert_eq!(d, Some(AdmissionDecision::Admit));
    }

    #[test]
    fn empty_header_value_is_forbidden_even_for_permissive_predicate() {
        let cfg = AdmissionConfig::builder()
            .credential(CredentialPolicy::predicate(|_| true))
            .build()
            .unwrap();
        let d = pipeline(cfg).evaluate_now(
            RequestDescriptor::new(true, "x").with_header("authorization", ""),
        );
        assert_eq!(d, Some(AdmissionDecision::reject(400, MSG_FORBIDDEN)));
    }

    #[test]
    fn custom_header_name_is_used() {
        let cfg = AdmissionConfig::builder()
            .credential(CredentialPolicy::exact("t"))
            .credential_header("X-Token")
            .build()
            .unwrap();
        let p = pipeline(cfg);

        let wrong = RequestDescriptor::new(true, "").with_header("authorization", "t");
        assert_eq!(
            p.evaluate_now(wrong),
            Some(AdmissionDecision::reject(400, MSG_FORBIDDEN))
        );

        let right = RequestDescriptor::new(true, "").with_header("x-token", "t");
        assert_eq!(p.evaluate_now(right), Some(AdmissionDecision::Admit));
    }

    #[test]
    fn deferred_check_yields_none_now() {
        let cfg = AdmissionConfig::builder()
            .origins(OriginPolicy::exact("o"))
            .check(|_, _| None)
            .build()
            .unwrap();
        assert_eq!(pipeline(cfg).evaluate_now(RequestDescriptor::new(true, "o")), None);
    }
}
