//! Per-request input and output of the admission pipeline.

use std::collections::HashMap;

/// Header consulted by the credential gate when no name is configured.
pub const DEFAULT_CREDENTIAL_HEADER: &str = "authorization";

/// One upgrade attempt, as seen by the pipeline.
///
/// Header names are stored lower-cased; values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub is_secure_transport: bool,
    pub origin: String,
    pub headers: HashMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(is_secure_transport: bool, origin: impl Into<String>) -> Self {
        Self {
            is_secure_transport,
            origin: origin.into(),
            headers: HashMap::new(),
        }
    }

    /// Builder-style header insert. The name is lower-cased.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Final outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    Admit,
    Reject { status: u16, message: Option<String> },
}

impl AdmissionDecision {
    pub(crate) fn reject(status: u16, message: &str) -> Self {
        AdmissionDecision::Reject {
            status,
            message: Some(message.to_string()),
        }
    }

    pub fn is_admit(&self) -> bool {
        matches!(self, AdmissionDecision::Admit)
    }

    /// Completion-callback shape: `(admitted, status, message)`.
    pub fn into_parts(self) -> (bool, Option<u16>, Option<String>) {
        match self {
            AdmissionDecision::Admit => (true, None, None),
            AdmissionDecision::Reject { status, message } => (false, Some(status), message),
        }
    }
}
