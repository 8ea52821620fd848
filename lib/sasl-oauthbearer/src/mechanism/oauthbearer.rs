//! The OAUTHBEARER mechanism (RFC 7628).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::{SaslExchange, SaslMechanism, Step};
use crate::context::{ExchangeContext, ExchangeMetadata};
use crate::credential::{TokenCredential, TokenRequestOptions};
use crate::error::SaslError;
use crate::wire;

/// How the mechanism treats the server reply to the initial response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengePolicy {
    /// Any reply ends the exchange successfully.
    ///
    /// Interpreting a server error is left to the driver.
    #[default]
    Ignore,
    /// An empty reply ends the exchange, anything else is reported as a failure.
    ///
    /// A non-empty reply is parsed as an RFC 7628 error object and surfaced as
    /// [`SaslError::ServerRejected`], or [`SaslError::MalformedChallenge`] if
    /// it cannot be parsed.
    Strict,
}

/// SASL OAUTHBEARER mechanism backed by a [`TokenCredential`].
///
/// Every exchange requests a fresh token and sends it in a single initial
/// response; the exchange ends on the first server reply.
///
/// The mechanism holds no per-exchange state: one instance can be shared by
/// all the connections of a client, and cloning it is cheap.
///
/// # Example
///
/// ```rust
/// use sasl_oauthbearer::{
///     AccessToken, ExchangeContext, ExchangeMetadata, OAuthBearerMechanism, SaslExchange,
///     SaslMechanism, StaticTokenCredential,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credential = StaticTokenCredential::new(AccessToken::new("my-token"));
/// let mechanism = OAuthBearerMechanism::new(credential, None);
///
/// let ctx = ExchangeContext::new();
/// let metadata = ExchangeMetadata::new("broker-1.example.com", 9093);
/// let (mut exchange, initial_response) = mechanism.start(&ctx, Some(&metadata)).await?;
/// assert_eq!(initial_response.as_slice(), b"n,,\x01auth=Bearer my-token\x01\x01");
///
/// // ... send the initial response, then hand over the server reply
/// let step = exchange.next(&ctx, b"").await?;
/// assert!(step.is_done());
/// # Ok(())
/// # }
/// ```
pub struct OAuthBearerMechanism<C> {
    credential: Arc<C>,
    options: Arc<TokenRequestOptions>,
    challenge_policy: ChallengePolicy,
}

impl<C> OAuthBearerMechanism<C>
where
    C: TokenCredential,
{
    /// The mechanism name.
    pub const NAME: &'static str = "OAUTHBEARER";

    /// Creates a mechanism requesting tokens with `options`.
    ///
    /// Without options, tokens are requested for
    /// [`DEFAULT_SCOPE`](crate::DEFAULT_SCOPE) with continuous access
    /// evaluation disabled.
    pub fn new(credential: C, options: Option<TokenRequestOptions>) -> Self {
        Self {
            credential: Arc::new(credential),
            options: Arc::new(options.unwrap_or_default()),
            challenge_policy: ChallengePolicy::default(),
        }
    }

    /// Creates a builder.
    pub fn builder(credential: C) -> OAuthBearerMechanismBuilder<C> {
        OAuthBearerMechanismBuilder {
            credential,
            options: None,
            challenge_policy: ChallengePolicy::default(),
        }
    }

    /// Returns the token provider.
    pub fn credential(&self) -> &C {
        &self.credential
    }

    /// Returns the options sent with every token request.
    pub fn token_options(&self) -> &TokenRequestOptions {
        &self.options
    }

    /// Returns the challenge policy.
    pub fn challenge_policy(&self) -> ChallengePolicy {
        self.challenge_policy
    }

    fn rejection(challenge: &[u8]) -> SaslError {
        match wire::parse_server_error(challenge) {
            Ok(server_error) => SaslError::ServerRejected {
                status: server_error.status,
                scope: server_error.scope,
                openid_configuration: server_error.openid_configuration,
            },
            Err(error) => SaslError::MalformedChallenge {
                reason: error.to_string(),
            },
        }
    }
}

impl<C> Clone for OAuthBearerMechanism<C> {
    fn clone(&self) -> Self {
        Self {
            credential: Arc::clone(&self.credential),
            options: Arc::clone(&self.options),
            challenge_policy: self.challenge_policy,
        }
    }
}

impl<C> fmt::Debug for OAuthBearerMechanism<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthBearerMechanism")
            .field("options", &self.options)
            .field("challenge_policy", &self.challenge_policy)
            .finish_non_exhaustive()
    }
}

impl<C> SaslMechanism for OAuthBearerMechanism<C>
where
    C: TokenCredential,
{
    type Exchange = Self;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn start(
        &self,
        ctx: &ExchangeContext,
        metadata: Option<&ExchangeMetadata>,
    ) -> Result<(Self::Exchange, Zeroizing<Vec<u8>>), SaslError> {
        let Some(metadata) = metadata else {
            warn!("OAUTHBEARER exchange started without metadata");
            return Err(SaslError::MissingMetadata);
        };
        debug!(
            broker = %metadata,
            scopes = ?self.options.scopes(),
            "starting OAUTHBEARER exchange"
        );

        let token = self
            .credential
            .get_token(ctx, &self.options)
            .await
            .map_err(|error| {
                warn!(broker = %metadata, %error, "failed to acquire an access token");
                SaslError::token_acquisition(error)
            })?;
        debug!(
            broker = %metadata,
            expires_in = ?token.time_until_expiry(),
            "access token acquired"
        );

        let response = wire::initial_response(token.secret());
        Ok((self.clone(), response))
    }
}

impl<C> SaslExchange for OAuthBearerMechanism<C>
where
    C: TokenCredential,
{
    async fn next(
        &mut self,
        _ctx: &ExchangeContext,
        challenge: &[u8],
    ) -> Result<Step, SaslError> {
        if !challenge.is_empty() {
            match self.challenge_policy {
                ChallengePolicy::Ignore => {
                    debug!(len = challenge.len(), "ignoring OAUTHBEARER server challenge");
                }
                ChallengePolicy::Strict => {
                    let error = Self::rejection(challenge);
                    warn!(%error, "OAUTHBEARER exchange rejected");
                    return Err(error);
                }
            }
        }

        debug!("OAUTHBEARER exchange done");
        Ok(Step::Done(None))
    }
}

/// Builder for [`OAuthBearerMechanism`].
pub struct OAuthBearerMechanismBuilder<C> {
    credential: C,
    options: Option<TokenRequestOptions>,
    challenge_policy: ChallengePolicy,
}

impl<C> OAuthBearerMechanismBuilder<C>
where
    C: TokenCredential,
{
    /// Sets the token request options.
    #[must_use]
    pub fn with_token_options(mut self, options: TokenRequestOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the challenge policy.
    #[must_use]
    pub fn with_challenge_policy(mut self, challenge_policy: ChallengePolicy) -> Self {
        self.challenge_policy = challenge_policy;
        self
    }

    /// Builds the mechanism.
    ///
    /// # Errors
    ///
    /// Returns [`SaslError::InvalidConfiguration`] if the token options
    /// request no scope or a blank one.
    pub fn build(self) -> Result<OAuthBearerMechanism<C>, SaslError> {
        let options = self.options.unwrap_or_default();
        options.validate()?;

        Ok(OAuthBearerMechanism {
            credential: Arc::new(self.credential),
            options: Arc::new(options),
            challenge_policy: self.challenge_policy,
        })
    }
}

impl<C> fmt::Debug for OAuthBearerMechanismBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthBearerMechanismBuilder")
            .field("options", &self.options)
            .field("challenge_policy", &self.challenge_policy)
            .finish_non_exhaustive()
    }
}
