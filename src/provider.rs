//! Provider client assembly: raw settings in, one finished handle out.
//!
//! Configuration resolution runs once per provider instantiation, on a
//! single task. The resulting [`ClientHandle`] is then shared read-only by
//! every resource and data-source operation for the lifetime of the run.

use crate::assume_role::{ASSUME_ROLE_ACTION, AssumeRoleRequest};
use crate::config::{ProviderConfig, ProviderSettings, Protocol};
use crate::credential::Credential;
use crate::env::Environment;
use crate::error::Result;
use crate::ratelimit::ActionRateLimiter;
use crate::sts::{DEFAULT_DOMAIN, StsClient, TokenExchange};

/// Fully configured API client handle.
///
/// Produced exactly once per configuration resolution; immutable afterward.
/// Service-specific clients derive their endpoints and sign their requests
/// from this handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientHandle {
    credential: Credential,
    region: String,
    protocol: Protocol,
    domain: Option<String>,
}

impl ClientHandle {
    /// Credential every downstream request signs with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Endpoint for a named service, e.g. `https://cvm.tencentcloudapi.com`.
    pub fn endpoint(&self, service: &str) -> String {
        format!(
            "{}://{}.{}",
            self.protocol.scheme(),
            service,
            self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
        )
    }
}

/// Resolves settings and assembles the final client handle.
///
/// Single entry point, invoked once per run. Fails on the first error; no
/// partial handle is ever returned. When an assume-role block is present the
/// exchange runs against the real STS endpoint derived from the resolved
/// protocol and domain.
pub async fn configure(
    settings: &ProviderSettings,
    env: &dyn Environment,
    limiter: &ActionRateLimiter,
) -> Result<ClientHandle> {
    let config = ProviderConfig::resolve(settings, env)?;
    let sts = StsClient::new(
        base_credential(&config),
        config.region.clone(),
        config.protocol,
        config.domain.as_deref(),
    )?;
    assemble(&config, env, &sts, limiter).await
}

/// Assembles a handle from an already-resolved configuration and an explicit
/// exchange implementation.
///
/// This is the seam for tests and custom transports; [`configure`] wires it
/// to the real [`StsClient`].
pub async fn assemble<E: TokenExchange>(
    config: &ProviderConfig,
    env: &dyn Environment,
    exchange: &E,
    limiter: &ActionRateLimiter,
) -> Result<ClientHandle> {
    let mut credential = base_credential(config);

    if let Some(ref role) = config.assume_role {
        let request = AssumeRoleRequest::build(role, env)?;
        limiter.check(ASSUME_ROLE_ACTION).await;
        tracing::debug!(role_arn = %request.role_arn, "exchanging base credential via AssumeRole");
        // The temporary credential replaces the base one wholesale; the
        // long-lived credential must not survive past this point.
        credential = exchange.assume_role(&request).await?;
    }

    tracing::debug!(region = %config.region, assumed_role = config.assume_role.is_some(), "provider client configured");
    Ok(ClientHandle {
        credential,
        region: config.region.clone(),
        protocol: config.protocol,
        domain: config.domain.clone(),
    })
}

fn base_credential(config: &ProviderConfig) -> Credential {
    let credential = Credential::new(config.secret_id.clone(), config.secret_key.clone());
    match config.security_token.as_deref() {
        Some(token) => credential.with_token(token),
        None => credential,
    }
}
