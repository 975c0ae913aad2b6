//! Pure construction of the AssumeRole wire request.
//!
//! No network I/O happens here; the builder normalizes a resolved
//! [`AssumeRoleConfig`] into the exact request the token exchange sends.

use serde::Serialize;

use crate::config::{AssumeRoleConfig, PROVIDER_ASSUME_ROLE_SESSION_DURATION};
use crate::env::Environment;
use crate::error::{ProviderError, Result};
use crate::sign::percent_encode;

/// API action name, also the key used for the rate-limit pre-flight check.
pub const ASSUME_ROLE_ACTION: &str = "AssumeRole";

/// Session duration applied when neither the block nor the environment
/// supplies a usable value.
pub const DEFAULT_SESSION_DURATION: i64 = 7200;

/// Wire request for the AssumeRole operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub role_session_name: String,
    pub duration_seconds: u64,
    /// URL-encoded; omitted from the request entirely when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

impl AssumeRoleRequest {
    /// Builds a validated request from a resolved assume-role block.
    ///
    /// `role_arn` and `session_name` are re-checked here even though the
    /// schema layer should already enforce them.
    pub fn build(config: &AssumeRoleConfig, env: &dyn Environment) -> Result<Self> {
        if config.role_arn.is_empty() {
            return Err(ProviderError::Validation(
                "assume_role.role_arn must not be empty".to_string(),
            ));
        }
        if config.session_name.is_empty() {
            return Err(ProviderError::Validation(
                "assume_role.session_name must not be empty".to_string(),
            ));
        }

        let duration = effective_duration(config.session_duration, env)?;

        let policy = match config.policy.as_deref() {
            None | Some("") => None,
            Some(p) => Some(percent_encode(p)),
        };

        Ok(Self {
            role_arn: config.role_arn.clone(),
            role_session_name: config.session_name.clone(),
            duration_seconds: duration as u64,
            policy,
        })
    }
}

/// Resolves the effective session duration.
///
/// A configured value of 0 defers to the environment override: present and
/// parsing to a non-zero integer wins, present but unparsable is a hard
/// error, absent or zero falls back to the default.
fn effective_duration(configured: i64, env: &dyn Environment) -> Result<i64> {
    if configured != 0 {
        return Ok(configured);
    }
    match env.var(PROVIDER_ASSUME_ROLE_SESSION_DURATION) {
        None => Ok(DEFAULT_SESSION_DURATION),
        Some(raw) => {
            let parsed: i64 = raw.parse().map_err(|_| {
                ProviderError::Configuration(format!(
                    "{} must be an integer, got '{}'",
                    PROVIDER_ASSUME_ROLE_SESSION_DURATION, raw
                ))
            })?;
            if parsed == 0 {
                Ok(DEFAULT_SESSION_DURATION)
            } else {
                Ok(parsed)
            }
        }
    }
}
