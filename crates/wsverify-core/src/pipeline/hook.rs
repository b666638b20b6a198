//! Upgrade-verifier hook slot.
//!
//! A hosting transport owns one slot and calls whatever verifier sits in it
//! for every upgrade attempt. Replacing an installed verifier requires an
//! explicit override.

use std::sync::Arc;

use crate::error::{Result, VerifyError};
use crate::request::RequestDescriptor;

use super::engine::AdmissionPipeline;

/// Completion shape expected by the hosting layer:
/// `(admitted, status, message)`.
pub type Completion = Box<dyn FnOnce(bool, Option<u16>, Option<String>) + Send>;

pub trait UpgradeVerifier: Send + Sync {
    fn verify(&self, request: RequestDescriptor, done: Completion);
}

impl UpgradeVerifier for AdmissionPipeline {
    fn verify(&self, request: RequestDescriptor, done: Completion) {
        self.evaluate(request, move |decision| {
            let (admitted, status, message) = decision.into_parts();
            done(admitted, status, message);
        });
    }
}

#[derive(Default)]
pub struct VerifierSlot {
    current: Option<Arc<dyn UpgradeVerifier>>,
}

impl VerifierSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot that already carries a verifier (e.g. installed by other glue).
    pub fn with_existing(verifier: Arc<dyn UpgradeVerifier>) -> Self {
        Self {
            current: Some(verifier),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.current.is_some()
    }

    pub fn install(
        &mut self,
        verifier: Arc<dyn UpgradeVerifier>,
        allow_override: bool,
    ) -> Result<()> {
        if self.current.is_some() {
            if !allow_override {
                return Err(VerifyError::HookConflict);
            }
            tracing::warn!("replacing existing upgrade verifier");
        }
        self.current = Some(verifier);
        Ok(())
    }

    pub fn get(&self) -> Option<Arc<dyn UpgradeVerifier>> {
        self.current.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::pipeline::AdmissionConfig;

    struct AlwaysNo;

    impl UpgradeVerifier for AlwaysNo {
        fn verify(&self, _request: RequestDescriptor, done: Completion) {
            done(false, Some(401), None);
        }
    }

    fn pipeline(allow_override: bool) -> AdmissionPipeline {
        let cfg = AdmissionConfig::builder()
            .allow_override(allow_override)
            .build()
            .unwrap();
        AdmissionPipeline::new(Some(cfg)).unwrap()
    }

    #[test]
    fn install_into_empty_slot() {
        let mut slot = VerifierSlot::new();
        pipeline(false).install(&mut slot).unwrap();
        assert!(slot.is_installed());
    }

    #[test]
    fn conflict_without_override() {
        let mut slot = VerifierSlot::with_existing(Arc::new(AlwaysNo));
        let err = pipeline(false).install(&mut slot).unwrap_err();
        assert!(matches!(err, VerifyError::HookConflict));
    }

    #[test]
    fn override_replaces_existing() {
        let mut slot = VerifierSlot::with_existing(Arc::new(AlwaysNo));
        pipeline(true).install(&mut slot).unwrap();

        let out = Arc::new(Mutex::new(None));
        let sink = out.clone();
        slot.get().unwrap().verify(
            RequestDescriptor::default(),
            Box::new(move |ok, status, msg| *sink.lock().unwrap() = Some((ok, status, msg))),
        );
        assert_eq!(*out.lock().unwrap(), Some((true, None, None)));
    }
}
