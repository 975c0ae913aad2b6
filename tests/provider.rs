//! Assembler behavior against a deterministic mock exchange.

use std::collections::HashMap;
use std::sync::Mutex;

use tencentcloud_provider::{
    ActionRateLimiter, AssumeRoleRequest, AssumeRoleSettings, Credential, Protocol, ProviderConfig,
    ProviderError, ProviderSettings, Result, TokenExchange, assemble, configure,
};

/// Records every request and returns a fixed credential.
struct MockExchange {
    result: Credential,
    calls: Mutex<Vec<AssumeRoleRequest>>,
}

impl MockExchange {
    fn new(result: Credential) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<AssumeRoleRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl TokenExchange for MockExchange {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credential> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(self.result.clone())
    }
}

fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn base_settings() -> ProviderSettings {
    ProviderSettings {
        secret_id: Some("AKIDbase".to_string()),
        secret_key: Some("base-secret".to_string()),
        region: Some("ap-guangzhou".to_string()),
        ..Default::default()
    }
}

fn assume_role_settings(duration: i64) -> ProviderSettings {
    let mut settings = base_settings();
    settings.assume_role = vec![AssumeRoleSettings {
        role_arn: Some("qcs::cam::uin/123456:roleName/test".to_string()),
        session_name: Some("test-session".to_string()),
        session_duration: Some(duration),
        policy: None,
    }];
    settings
}

fn temporary_credential() -> Credential {
    Credential::new("AKIDtmp", "tmp-secret").with_token("tmp-token")
}

#[tokio::test]
async fn base_configuration_skips_exchange() {
    let env = no_env();
    let config = ProviderConfig::resolve(&base_settings(), &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    let handle = assemble(&config, &env, &exchange, &limiter).await.unwrap();

    assert_eq!(
        *handle.credential(),
        Credential::new("AKIDbase", "base-secret")
    );
    assert!(exchange.requests().is_empty(), "no exchange call expected");
    assert_eq!(handle.region(), "ap-guangzhou");
    assert_eq!(handle.protocol(), Protocol::Https);
}

#[tokio::test]
async fn preexisting_security_token_is_kept() {
    let env = no_env();
    let mut settings = base_settings();
    settings.security_token = Some("existing-token".to_string());
    let config = ProviderConfig::resolve(&settings, &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    let handle = assemble(&config, &env, &exchange, &limiter).await.unwrap();

    assert!(handle.credential().is_temporary());
    assert_eq!(
        handle.credential().security_token.as_deref(),
        Some("existing-token")
    );
}

#[tokio::test]
async fn zero_duration_without_override_sends_default() {
    let env = no_env();
    let config = ProviderConfig::resolve(&assume_role_settings(0), &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    assemble(&config, &env, &exchange, &limiter).await.unwrap();

    let requests = exchange.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].duration_seconds, 7200);
}

#[tokio::test]
async fn zero_duration_with_override_sends_override() {
    let env = env(&[("TENCENTCLOUD_ASSUME_ROLE_SESSION_DURATION", "3600")]);
    let config = ProviderConfig::resolve(&assume_role_settings(0), &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    assemble(&config, &env, &exchange, &limiter).await.unwrap();

    assert_eq!(exchange.requests()[0].duration_seconds, 3600);
}

#[tokio::test]
async fn unparsable_override_fails_without_network_call() {
    let env = env(&[("TENCENTCLOUD_ASSUME_ROLE_SESSION_DURATION", "abc")]);
    let config = ProviderConfig::resolve(&assume_role_settings(0), &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    let err = assemble(&config, &env, &exchange, &limiter)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Configuration(_)));
    assert!(exchange.requests().is_empty(), "exchange must not be called");
}

#[tokio::test]
async fn empty_policy_is_not_sent() {
    let env = no_env();
    let mut settings = assume_role_settings(7200);
    settings.assume_role[0].policy = Some(String::new());
    let config = ProviderConfig::resolve(&settings, &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    assemble(&config, &env, &exchange, &limiter).await.unwrap();

    assert!(exchange.requests()[0].policy.is_none());
}

#[tokio::test]
async fn policy_is_sent_url_encoded() {
    let env = no_env();
    let mut settings = assume_role_settings(7200);
    settings.assume_role[0].policy = Some("a b".to_string());
    let config = ProviderConfig::resolve(&settings, &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    assemble(&config, &env, &exchange, &limiter).await.unwrap();

    assert_eq!(exchange.requests()[0].policy.as_deref(), Some("a%20b"));
}

#[tokio::test]
async fn invalid_protocol_fails_before_any_resolution() {
    let env = no_env();
    let settings = ProviderSettings {
        protocol: Some("FTP".to_string()),
        ..Default::default()
    };
    let limiter = ActionRateLimiter::default();

    let err = configure(&settings, &env, &limiter).await.unwrap_err();

    assert!(matches!(err, ProviderError::Validation(_)));
    assert!(err.to_string().contains("FTP"));
}

#[tokio::test]
async fn missing_required_field_fails() {
    let env = no_env();
    let mut settings = base_settings();
    settings.region = None;
    let limiter = ActionRateLimiter::default();

    let err = configure(&settings, &env, &limiter).await.unwrap_err();

    assert!(matches!(err, ProviderError::Configuration(_)));
    assert!(err.to_string().contains("region"));
}

#[tokio::test]
async fn exchange_replaces_credential_wholesale() {
    let env = no_env();
    let config = ProviderConfig::resolve(&assume_role_settings(7200), &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    let handle = assemble(&config, &env, &exchange, &limiter).await.unwrap();

    assert_eq!(*handle.credential(), temporary_credential());
    assert_ne!(handle.credential().secret_id, "AKIDbase");
    assert_ne!(handle.credential().secret_key, "base-secret");
}

#[tokio::test]
async fn identical_configurations_yield_equal_handles() {
    let env = no_env();
    let config = ProviderConfig::resolve(&assume_role_settings(7200), &env).unwrap();
    let exchange = MockExchange::new(temporary_credential());
    let limiter = ActionRateLimiter::default();

    let first = assemble(&config, &env, &exchange, &limiter).await.unwrap();
    let second = assemble(&config, &env, &exchange, &limiter).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(exchange.requests().len(), 2);
    assert_eq!(exchange.requests()[0], exchange.requests()[1]);
}
