use serde::Deserialize;
use wsverify_core::error::{Result, VerifyError};
use wsverify_core::pipeline::AdmissionConfigBuilder;
use wsverify_core::{AdmissionConfig, CredentialPolicy, OriginPolicy};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Absent section is a startup error, reported when the pipeline is built.
    #[serde(default)]
    pub verify: Option<VerifySection>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VerifyError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        if let Some(v) = &self.verify {
            v.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Honor `x-forwarded-proto: https` from a TLS-terminating proxy.
    #[serde(default)]
    pub trust_forwarded_proto: bool,

    /// Upper bound for a custom check that resolves later.
    #[serde(default = "default_check_timeout_ms")]
    pub check_timeout_ms: u64,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ws_path: default_ws_path(),
            trust_forwarded_proto: false,
            check_timeout_ms: default_check_timeout_ms(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !self.ws_path.starts_with('/') {
            return Err(VerifyError::BadConfig(
                "gateway.ws_path must start with '/'".into(),
            ));
        }
        if !(100..=60000).contains(&self.check_timeout_ms) {
            return Err(VerifyError::BadConfig(
                "gateway.check_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(VerifyError::BadConfig(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(VerifyError::BadConfig(
                "gateway.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(VerifyError::BadConfig(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ws_path() -> String {
    "/v1/ws".into()
}
fn default_check_timeout_ms() -> u64 {
    5000
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}

/// Admission policy as written in YAML.
///
/// Predicates and custom checks cannot be expressed here; attach them in
/// code on the builder returned by [`VerifySection::to_builder`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct VerifySection {
    #[serde(default, alias = "requireSecure")]
    pub require_secure_transport: bool,

    #[serde(default)]
    pub allow_origins: Option<OriginSpec>,

    #[serde(default)]
    pub auth: Option<String>,

    #[serde(default)]
    pub auth_header: Option<String>,

    #[serde(default, rename = "override")]
    pub allow_override: bool,
}

/// `"https://a"` | `["https://a", "https://b"]` | `{ pattern: "^https://" }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OriginSpec {
    Exact(String),
    List(Vec<String>),
    Pattern(PatternSpec),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSpec {
    pub pattern: String,
}

impl OriginSpec {
    pub fn compile(&self) -> Result<OriginPolicy> {
        match self {
            OriginSpec::Exact(s) => Ok(OriginPolicy::exact(s.clone())),
            OriginSpec::List(list) => Ok(OriginPolicy::allow_list(list.iter().cloned())),
            OriginSpec::Pattern(p) => OriginPolicy::pattern(&p.pattern),
        }
    }
}

impl VerifySection {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.auth, Some(a) if a.is_empty()) {
            return Err(VerifyError::BadConfig("verify.auth must not be empty".into()));
        }
        if matches!(&self.auth_header, Some(h) if h.trim().is_empty()) {
            return Err(VerifyError::BadConfig(
                "verify.authHeader must not be empty".into(),
            ));
        }
        if let Some(spec) = &self.allow_origins {
            spec.compile()?;
        }
        Ok(())
    }

    pub fn to_builder(&self) -> Result<AdmissionConfigBuilder> {
        let mut b = AdmissionConfig::builder()
            .require_secure_transport(self.require_secure_transport)
            .allow_override(self.allow_override);
        if let Some(spec) = &self.allow_origins {
            b = b.origins(spec.compile()?);
        }
        if let Some(secret) = &self.auth {
            b = b.credential(CredentialPolicy::exact(secret.clone()));
        }
        if let Some(header) = &self.auth_header {
            b = b.credential_header(header.clone());
        }
        Ok(b)
    }
}
