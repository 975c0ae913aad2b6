//! Provider settings and their resolution into a validated configuration.
//!
//! [`ProviderSettings`] holds the raw values exactly as the schema layer
//! hands them over; [`ProviderConfig::resolve`] applies the
//! explicit-over-environment precedence per field, enforces required fields,
//! and validates value domains before any network activity.

use std::str::FromStr;

use crate::env::Environment;
use crate::error::{ProviderError, Result};

pub const PROVIDER_SECRET_ID: &str = "TENCENTCLOUD_SECRET_ID";
pub const PROVIDER_SECRET_KEY: &str = "TENCENTCLOUD_SECRET_KEY";
pub const PROVIDER_SECURITY_TOKEN: &str = "TENCENTCLOUD_SECURITY_TOKEN";
pub const PROVIDER_REGION: &str = "TENCENTCLOUD_REGION";
pub const PROVIDER_PROTOCOL: &str = "TENCENTCLOUD_PROTOCOL";
pub const PROVIDER_DOMAIN: &str = "TENCENTCLOUD_DOMAIN";
pub const PROVIDER_ASSUME_ROLE_ARN: &str = "TENCENTCLOUD_ASSUME_ROLE_ARN";
pub const PROVIDER_ASSUME_ROLE_SESSION_NAME: &str = "TENCENTCLOUD_ASSUME_ROLE_SESSION_NAME";
pub const PROVIDER_ASSUME_ROLE_SESSION_DURATION: &str =
    "TENCENTCLOUD_ASSUME_ROLE_SESSION_DURATION";

/// Allowed session duration range for the AssumeRole call, in seconds.
pub const SESSION_DURATION_RANGE: std::ops::RangeInclusive<i64> = 0..=43200;

/// Scheme used for API requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    /// URL scheme for this protocol.
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl FromStr for Protocol {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "HTTP" => Ok(Protocol::Http),
            "HTTPS" => Ok(Protocol::Https),
            other => Err(ProviderError::Validation(format!(
                "invalid protocol '{}', expected HTTP or HTTPS",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Http => f.write_str("HTTP"),
            Protocol::Https => f.write_str("HTTPS"),
        }
    }
}

/// Raw provider settings as produced by the schema layer, before resolution.
///
/// `assume_role` is a list because the schema models the block as
/// multi-valued with a max-items-1 constraint; resolution collapses it to an
/// optional single block.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
    pub security_token: Option<String>,
    pub region: Option<String>,
    pub protocol: Option<String>,
    pub domain: Option<String>,
    pub assume_role: Vec<AssumeRoleSettings>,
}

/// Raw assume-role block as produced by the schema layer.
#[derive(Debug, Clone, Default)]
pub struct AssumeRoleSettings {
    pub role_arn: Option<String>,
    pub session_name: Option<String>,
    pub session_duration: Option<i64>,
    pub policy: Option<String>,
}

/// Fully resolved and validated provider configuration.
///
/// Created once per run, read-only afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub secret_id: String,
    pub secret_key: String,
    pub security_token: Option<String>,
    pub region: String,
    pub protocol: Protocol,
    pub domain: Option<String>,
    pub assume_role: Option<AssumeRoleConfig>,
}

/// Resolved assume-role block.
#[derive(Debug, Clone, PartialEq)]
pub struct AssumeRoleConfig {
    pub role_arn: String,
    pub session_name: String,
    /// Seconds in [0, 43200]; 0 defers to the environment fallback chain at
    /// request-build time.
    pub session_duration: i64,
    pub policy: Option<String>,
}

impl ProviderConfig {
    /// Resolves raw settings against the environment.
    ///
    /// Explicit values take precedence over their environment variables.
    /// Protocol is validated before any credential resolution so a malformed
    /// value fails fast.
    pub fn resolve(settings: &ProviderSettings, env: &dyn Environment) -> Result<Self> {
        let protocol = match or_env(&settings.protocol, env, PROVIDER_PROTOCOL) {
            Some(raw) => raw.parse()?,
            None => Protocol::default(),
        };

        let secret_id = required(&settings.secret_id, env, PROVIDER_SECRET_ID, "secret_id")?;
        let secret_key = required(&settings.secret_key, env, PROVIDER_SECRET_KEY, "secret_key")?;
        let security_token = or_env(&settings.security_token, env, PROVIDER_SECURITY_TOKEN);
        let region = required(&settings.region, env, PROVIDER_REGION, "region")?;
        let domain = or_env(&settings.domain, env, PROVIDER_DOMAIN);

        let assume_role = match settings.assume_role.as_slice() {
            [] => None,
            [block] => Some(AssumeRoleConfig::resolve(block, env)?),
            more => {
                return Err(ProviderError::Configuration(format!(
                    "assume_role accepts at most one block, got {}",
                    more.len()
                )));
            }
        };

        Ok(Self {
            secret_id,
            secret_key,
            security_token,
            region,
            protocol,
            domain,
            assume_role,
        })
    }
}

impl AssumeRoleConfig {
    fn resolve(settings: &AssumeRoleSettings, env: &dyn Environment) -> Result<Self> {
        let role_arn = required(
            &settings.role_arn,
            env,
            PROVIDER_ASSUME_ROLE_ARN,
            "assume_role.role_arn",
        )?;
        let session_name = required(
            &settings.session_name,
            env,
            PROVIDER_ASSUME_ROLE_SESSION_NAME,
            "assume_role.session_name",
        )?;

        let session_duration = settings.session_duration.ok_or_else(|| {
            ProviderError::Configuration("assume_role.session_duration is required".to_string())
        })?;
        if !SESSION_DURATION_RANGE.contains(&session_duration) {
            return Err(ProviderError::Validation(format!(
                "assume_role.session_duration must be in [{}, {}], got {}",
                SESSION_DURATION_RANGE.start(),
                SESSION_DURATION_RANGE.end(),
                session_duration
            )));
        }

        Ok(Self {
            role_arn,
            session_name,
            session_duration,
            policy: settings.policy.clone(),
        })
    }
}

fn or_env(explicit: &Option<String>, env: &dyn Environment, var: &str) -> Option<String> {
    explicit
        .as_ref()
        .filter(|v| !v.is_empty())
        .cloned()
        .or_else(|| env.var(var))
}

fn required(
    explicit: &Option<String>,
    env: &dyn Environment,
    var: &str,
    field: &str,
) -> Result<String> {
    or_env(explicit, env, var).ok_or_else(|| {
        ProviderError::Configuration(format!(
            "{} is required: set it explicitly or via the {} environment variable",
            field, var
        ))
    })
}
