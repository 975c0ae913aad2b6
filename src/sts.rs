//! Token exchange against the TencentCloud STS endpoint.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::assume_role::{ASSUME_ROLE_ACTION, AssumeRoleRequest};
use crate::config::Protocol;
use crate::credential::Credential;
use crate::error::{MAX_ERROR_BODY_CHARS, ProviderError, Result, truncate_str};
use crate::sign;

const STS_SERVICE: &str = "sts";
const STS_VERSION: &str = "2018-08-13";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Root domain used when no override is configured.
pub const DEFAULT_DOMAIN: &str = "tencentcloudapi.com";

/// Performs the role-exchange network round-trip.
///
/// The provider assembler is generic over this trait so tests can substitute
/// a deterministic exchange without a live endpoint.
#[allow(async_fn_in_trait)]
pub trait TokenExchange {
    /// Exchanges a role-assumption request for a temporary credential.
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credential>;
}

/// STS client speaking the TencentCloud API 3.0 protocol.
#[derive(Debug, Clone)]
pub struct StsClient {
    http: reqwest::Client,
    credential: Credential,
    region: String,
    endpoint: String,
    host: String,
}

impl StsClient {
    /// Creates a client with the default request timeout.
    pub fn new(
        credential: Credential,
        region: impl Into<String>,
        protocol: Protocol,
        domain: Option<&str>,
    ) -> Result<Self> {
        Self::with_timeout(credential, region, protocol, domain, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    ///
    /// The timeout bounds the exchange round-trip so an unresponsive
    /// endpoint cannot hang provider initialization.
    pub fn with_timeout(
        credential: Credential,
        region: impl Into<String>,
        protocol: Protocol,
        domain: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let host = format!("{}.{}", STS_SERVICE, domain.unwrap_or(DEFAULT_DOMAIN));
        let endpoint = format!("{}://{}", protocol.scheme(), host);
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            credential,
            region: region.into(),
            endpoint,
            host,
        })
    }

    /// Overrides the endpoint URL, e.g. to point at a local test server.
    ///
    /// The signing host is re-derived from the URL authority.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.host = endpoint
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&endpoint)
            .trim_end_matches('/')
            .to_string();
        self.endpoint = endpoint;
        self
    }

    /// Endpoint the client dispatches to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TokenExchange for StsClient {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credential> {
        let payload = serde_json::to_string(request)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time is before Unix epoch")
            .as_secs() as i64;

        let authorization = sign::authorization(
            &self.credential.secret_id,
            &self.credential.secret_key,
            &self.host,
            STS_SERVICE,
            &payload,
            timestamp,
        )?;

        let mut req = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Host", &self.host)
            .header("Authorization", authorization)
            .header("X-TC-Action", ASSUME_ROLE_ACTION)
            .header("X-TC-Version", STS_VERSION)
            .header("X-TC-Region", &self.region)
            .header("X-TC-Timestamp", timestamp.to_string());
        if let Some(token) = self.credential.security_token.as_deref() {
            req = req.header("X-TC-Token", token);
        }

        let response = req.body(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Http(format!(
                "HTTP {} with body: {}",
                status,
                truncate_str(&text, MAX_ERROR_BODY_CHARS)
            )));
        }

        let envelope: ResponseEnvelope<AssumeRoleBody> = serde_json::from_str(&text)?;
        let body = envelope.response;

        // The API reports business errors inside a 200 envelope.
        if let Some(err) = body.error {
            return Err(ProviderError::Api {
                request_id: body.request_id,
                code: err.code,
                message: err.message,
            });
        }

        let creds = body.credentials.ok_or_else(|| {
            ProviderError::Http("AssumeRole response missing Credentials".to_string())
        })?;
        tracing::debug!(request_id = %body.request_id, "AssumeRole exchange succeeded");

        Ok(Credential::new(creds.tmp_secret_id, creds.tmp_secret_key).with_token(creds.token))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseEnvelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssumeRoleBody {
    request_id: String,
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    credentials: Option<TemporaryCredentials>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TemporaryCredentials {
    tmp_secret_id: String,
    tmp_secret_key: String,
    token: String,
}
