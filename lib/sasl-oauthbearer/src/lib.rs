//! # SASL OAUTHBEARER
//!
//! Client side of the SASL OAUTHBEARER mechanism ([RFC 7628]), for messaging
//! clients (Kafka brokers behind Microsoft Entra ID, ...) that authenticate
//! connections with a bearer token issued by an external identity provider.
//!
//! The exchange is a single round trip:
//!
//! 1. [`SaslMechanism::start`] asks the [`TokenCredential`] for a fresh
//!    token and returns the initial response
//!    `n,,\x01auth=Bearer <token>\x01\x01`
//! 2. the driver sends it, then hands the server reply to
//!    [`SaslExchange::next`], which ends the exchange
//!
//! ## Quick Start
//!
//! ```rust
//! use sasl_oauthbearer::{
//!     AccessToken, CachingCredential, ChallengePolicy, ExchangeContext, ExchangeMetadata,
//!     OAuthBearerMechanism, SaslExchange, SaslMechanism, StaticTokenCredential,
//!     TokenRequestOptions,
//! };
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credential = CachingCredential::new(StaticTokenCredential::new(
//!     AccessToken::with_expiry("eyJ0eXAi...", Duration::from_secs(3600)),
//! ));
//!
//! let mechanism = OAuthBearerMechanism::builder(credential)
//!     .with_token_options(
//!         TokenRequestOptions::builder()
//!             .add_scope("api://kafka-cluster/.default")
//!             .build()?,
//!     )
//!     .with_challenge_policy(ChallengePolicy::Strict)
//!     .build()?;
//! assert_eq!(mechanism.name(), "OAUTHBEARER");
//!
//! let ctx = ExchangeContext::new().with_timeout(Duration::from_secs(10));
//! let metadata = ExchangeMetadata::new("broker-1.example.com", 9093);
//!
//! let (mut exchange, initial_response) = mechanism.start(&ctx, Some(&metadata)).await?;
//! // send `initial_response` to the broker...
//! # let _ = initial_response;
//! let step = exchange.next(&ctx, b"").await?;
//! assert!(step.is_done());
//! # Ok(())
//! # }
//! ```
//!
//! ## Server replies
//!
//! By default ([`ChallengePolicy::Ignore`]) any server reply ends the exchange
//! and interpreting a failure is left to the driver. With
//! [`ChallengePolicy::Strict`] a non-empty reply is parsed as an RFC 7628
//! error object and returned as [`SaslError::ServerRejected`].
//!
//! [RFC 7628]: https://datatracker.ietf.org/doc/html/rfc7628

mod context;
mod credential;
mod error;
mod mechanism;
pub mod wire;

pub use self::context::{ExchangeContext, ExchangeMetadata};
pub use self::credential::{
    AccessToken, CachingCredential, DEFAULT_SCOPE, StaticTokenCredential, TokenCache,
    TokenCredential, TokenRequestOptions, TokenRequestOptionsBuilder,
};
pub use self::error::{BoxError, CredentialError, SaslError};
pub use self::mechanism::{
    ChallengePolicy, OAuthBearerMechanism, OAuthBearerMechanismBuilder, SaslExchange,
    SaslMechanism, Step,
};
