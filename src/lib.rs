//! Credential resolution and client configuration for a TencentCloud
//! infrastructure provider.
//!
//! This crate turns user-supplied or environment-sourced provider settings
//! into a single ready-to-use [`ClientHandle`]:
//!
//! - explicit values take precedence over `TENCENTCLOUD_*` environment
//!   variables, per field;
//! - an optional `assume_role` block exchanges the long-lived credential for
//!   a temporary one via the STS AssumeRole operation, gated by a per-action
//!   rate limiter;
//! - every validation and configuration error aborts initialization; no
//!   partial handle is ever produced.
//!
//! # Quick Start
//!
//! ```no_run
//! use tencentcloud_provider::{ActionRateLimiter, ProcessEnv, ProviderSettings, configure};
//!
//! # async fn example() -> tencentcloud_provider::Result<()> {
//! let settings = ProviderSettings {
//!     secret_id: Some("your-secret-id".into()),
//!     secret_key: Some("your-secret-key".into()),
//!     region: Some("ap-guangzhou".into()),
//!     ..Default::default()
//! };
//!
//! let limiter = ActionRateLimiter::default();
//! let handle = configure(&settings, &ProcessEnv, &limiter).await?;
//!
//! println!("configured for {}", handle.endpoint("cvm"));
//! # Ok(())
//! # }
//! ```

pub mod assume_role;
pub mod config;
pub mod credential;
pub mod env;
pub mod error;
pub mod provider;
pub mod ratelimit;
pub mod sts;

mod sign;

pub use assume_role::{ASSUME_ROLE_ACTION, AssumeRoleRequest, DEFAULT_SESSION_DURATION};
pub use config::{
    AssumeRoleConfig, AssumeRoleSettings, Protocol, ProviderConfig, ProviderSettings,
};
pub use credential::Credential;
pub use env::{Environment, ProcessEnv};
pub use error::{ProviderError, Result};
pub use provider::{ClientHandle, assemble, configure};
pub use ratelimit::ActionRateLimiter;
pub use sts::{StsClient, TokenExchange};

// Compile-time assertions: key types must be Send + Sync for use across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<ClientHandle>;
    let _ = assert_send_sync::<Credential>;
    let _ = assert_send_sync::<StsClient>;
    let _ = assert_send_sync::<ActionRateLimiter>;
    let _ = assert_send_sync::<ProviderError>;
};
