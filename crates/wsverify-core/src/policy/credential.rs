//! Credential header matching.
//!
//! Absent or empty header values never reach this module; the pipeline
//! rejects them first.

use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub enum CredentialPolicy {
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    Exact(String),
}

impl fmt::Debug for CredentialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialPolicy::Predicate(_) => write!(f, "Predicate(<function>)"),
            // never print the secret
            CredentialPolicy::Exact(_) => write!(f, "Exact(<redacted>)"),
        }
    }
}

impl CredentialPolicy {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        CredentialPolicy::Predicate(Arc::new(f))
    }

    pub fn exact(secret: impl Into<String>) -> Self {
        CredentialPolicy::Exact(secret.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CredentialPolicy::Predicate(_) => "predicate",
            CredentialPolicy::Exact(_) => "exact",
        }
    }

    /// Case-sensitive, untrimmed comparison for `Exact`.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            CredentialPolicy::Predicate(f) => f(value),
            CredentialPolicy::Exact(s) => s == value,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn exact_is_strict() {
        let p = CredentialPolicy::exact("secret123");
        assert!(p.matches("secret123"));
        assert!(!p.matches("Secret123"));
        assert!(!p.matches(" secret123"));
        assert!(!p.matches("secret123 "));
    }

    #[test]
    fn predicate_sees_raw_value() {
        let p = CredentialPolicy::predicate(|v| v.strip_prefix("Bearer ") == Some("tok"));
        assert!(p.matches("Bearer tok"));
        assert!(!p.matches("tok"));
    }

    #[test]
    fn debug_redacts_secret() {
        let p = CredentialPolicy::exact("hunter2");
        assert!(!format!("{p:?}").contains("hunter2"));
    }
}
