use thiserror::Error;

/// Maximum characters to include in error message body for debugging.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur while configuring the provider.
///
/// Every variant is fatal to provider initialization: either a fully
/// credentialed client handle is produced, or none is.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing required setting, unparsable environment override, or a
    /// malformed assume-role block.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A setting value is outside its allowed domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// TencentCloud API returned a business error.
    #[error("API error (RequestId: {request_id}): [{code}] {message}")]
    Api {
        request_id: String,
        code: String,
        message: String,
    },

    /// Unexpected HTTP response (non-JSON error body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP/network layer error from reqwest.
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Signature computation error.
    #[error("signature error: {0}")]
    Signature(String),

    /// Response deserialization error.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ProviderError {
    /// Returns the request ID if this is an API error.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ProviderError::Api { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    /// Returns the error code if this is an API error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            ProviderError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// A specialized Result type for provider configuration.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
