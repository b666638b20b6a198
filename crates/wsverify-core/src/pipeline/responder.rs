//! Single-resolution cell shared by the custom check's continuations and
//! its return value.

use std::sync::{Arc, Mutex, PoisonError};

use crate::request::AdmissionDecision;

type Resolve = Box<dyn FnOnce(AdmissionDecision) + Send>;

/// Handle a custom check uses to finish an evaluation.
///
/// Cheap to clone and `Send`, so it can move into a spawned task. Only the
/// first `admit`/`reject`/`resolve` takes effect; later calls return `false`
/// and do nothing. If every clone is dropped unresolved, the pending
/// callback is dropped without being called.
#[derive(Clone)]
pub struct Responder {
    slot: Arc<Mutex<Option<Resolve>>>,
}

impl Responder {
    pub(crate) fn new<F>(resolve: F) -> Self
    where
        F: FnOnce(AdmissionDecision) + Send + 'static,
    {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(resolve)))),
        }
    }

    pub fn admit(&self) -> bool {
        self.resolve(AdmissionDecision::Admit)
    }

    pub fn reject(&self, status: u16, message: Option<&str>) -> bool {
        self.resolve(AdmissionDecision::Reject {
            status,
            message: message.map(str::to_string),
        })
    }

    /// Returns `true` if this call produced the final decision.
    pub fn resolve(&self, decision: AdmissionDecision) -> bool {
        // take under the lock, call outside it
        let pending = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match pending {
            Some(f) => {
                f(decision);
                true
            }
            None => {
                tracing::debug!(?decision, "late resolution ignored");
                false
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
