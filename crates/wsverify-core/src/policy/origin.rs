//! Origin policy compilation and matching.
//!
//! Matching is strict: no normalization, no case folding, no wildcard
//! syntax beyond what a compiled pattern itself provides.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::Result;

/// Allowed origins for an upgrade request.
#[derive(Clone)]
pub enum OriginPolicy {
    /// Unanchored regular expression; anchor inside the pattern if needed.
    Pattern(Regex),
    AllowList(HashSet<String>),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    Exact(String),
}

impl fmt::Debug for OriginPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginPolicy::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            OriginPolicy::AllowList(list) => f.debug_tuple("AllowList").field(list).finish(),
            OriginPolicy::Predicate(_) => write!(f, "Predicate(<function>)"),
            OriginPolicy::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
        }
    }
}

impl OriginPolicy {
    /// Compile a pattern policy. Invalid syntax is a configuration error.
    pub fn pattern(raw: &str) -> Result<Self> {
        Ok(OriginPolicy::Pattern(Regex::new(raw)?))
    }

    pub fn allow_list<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OriginPolicy::AllowList(origins.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        OriginPolicy::Predicate(Arc::new(f))
    }

    pub fn exact(origin: impl Into<String>) -> Self {
        OriginPolicy::Exact(origin.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OriginPolicy::Pattern(_) => "pattern",
            OriginPolicy::AllowList(_) => "allow_list",
            OriginPolicy::Predicate(_) => "predicate",
            OriginPolicy::Exact(_) => "exact",
        }
    }

    /// Whether `origin` satisfies this policy.
    ///
    /// A predicate that panics is not caught here.
    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginPolicy::Pattern(re) => re.is_match(origin),
            OriginPolicy::AllowList(list) => list.contains(origin),
            OriginPolicy::Predicate(f) => f(origin),
            OriginPolicy::Exact(s) => s == origin,
        }
    }
}
