//! Token providers.
//!
//! The OAUTHBEARER mechanism does not talk to any identity provider itself: it
//! asks a [`TokenCredential`] for a fresh [`AccessToken`] on every exchange.
//! Token issuance, retries and caching are the provider's business.
//!
//! This module ships two small providers:
//!
//! - [`StaticTokenCredential`]: a pre-acquired token (environment variable, secret store, ...)
//! - [`CachingCredential`]: wraps another provider and reuses its tokens until
//!   they are about to expire
//!
//! # Example
//!
//! ```rust
//! use sasl_oauthbearer::{AccessToken, CredentialError, ExchangeContext, TokenCredential, TokenRequestOptions};
//!
//! #[derive(Debug)]
//! struct EnvCredential;
//!
//! impl TokenCredential for EnvCredential {
//!     type Error = CredentialError;
//!
//!     async fn get_token(
//!         &self,
//!         _ctx: &ExchangeContext,
//!         _options: &TokenRequestOptions,
//!     ) -> Result<AccessToken, Self::Error> {
//!         std::env::var("KAFKA_ACCESS_TOKEN")
//!             .map(AccessToken::new)
//!             .map_err(|error| CredentialError::Upstream { source: Box::new(error) })
//!     }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::context::ExchangeContext;

mod cache;
mod fixed;
mod options;
mod token;

pub use self::cache::{CachingCredential, TokenCache};
pub use self::fixed::StaticTokenCredential;
pub use self::options::{DEFAULT_SCOPE, TokenRequestOptions, TokenRequestOptionsBuilder};
pub use self::token::AccessToken;

/// A source of bearer access tokens.
///
/// Implementations must be safe for concurrent use: one mechanism instance
/// may run many exchanges in parallel against the same credential.
pub trait TokenCredential: Send + Sync {
    /// The error returned when no token can be issued.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Requests an access token for the given options.
    ///
    /// Implementations performing I/O should honor the deadline carried by
    /// `ctx`, see [`ExchangeContext::run`].
    fn get_token(
        &self,
        ctx: &ExchangeContext,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = Result<AccessToken, Self::Error>> + Send;
}

impl<C> TokenCredential for Arc<C>
where
    C: TokenCredential,
{
    type Error = C::Error;

    fn get_token(
        &self,
        ctx: &ExchangeContext,
        options: &TokenRequestOptions,
    ) -> impl Future<Output = Result<AccessToken, Self::Error>> + Send {
        C::get_token(self, ctx, options)
    }
}
