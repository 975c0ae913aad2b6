/// TencentCloud access credential.
///
/// Immutable once constructed; a role exchange produces a new `Credential`
/// rather than mutating one in place. The `Debug` implementation redacts
/// `secret_key` and `security_token` to prevent accidental leakage in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub secret_id: String,
    pub secret_key: String,
    pub security_token: Option<String>,
}

impl Credential {
    /// Creates a long-lived credential without a session token.
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            security_token: None,
        }
    }

    /// Attaches a session token, marking the credential as temporary.
    ///
    /// An empty token leaves the credential long-lived.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.security_token = (!token.is_empty()).then_some(token);
        self
    }

    /// Returns `true` when the credential carries a session token.
    pub fn is_temporary(&self) -> bool {
        self.security_token.is_some()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"****")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "****"),
            )
            .finish()
    }
}
