//! Error types for the OAUTHBEARER exchange and the bundled token providers.

use std::error::Error;

/// A boxed error coming from a token provider.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors that can occur during an OAUTHBEARER exchange.
///
/// Every variant aborts the exchange it was returned from; nothing in this
/// crate retries.
#[derive(Debug, derive_more::Display)]
pub enum SaslError {
    /// The exchange was started without connection metadata.
    #[display("Missing SASL exchange metadata")]
    MissingMetadata,

    /// The token provider failed to issue an access token.
    ///
    /// The provider error is available through [`Error::source`].
    #[display("Failed to acquire an access token: {source}")]
    TokenAcquisitionFailed {
        /// The provider error.
        source: BoxError,
    },

    /// The server answered with an RFC 7628 error object.
    ///
    /// Only returned with [`ChallengePolicy::Strict`](crate::ChallengePolicy::Strict).
    #[display("Server rejected the bearer token: {status}")]
    ServerRejected {
        /// The `status` member of the error object.
        status: String,
        /// The `scope` member, if any.
        scope: Option<String>,
        /// The `openid-configuration` member, if any.
        openid_configuration: Option<String>,
    },

    /// The server challenge is not a valid RFC 7628 error object.
    ///
    /// Only returned with [`ChallengePolicy::Strict`](crate::ChallengePolicy::Strict).
    #[display("Malformed server challenge: {reason}")]
    MalformedChallenge {
        /// Description of the parsing failure.
        reason: String,
    },

    /// Invalid token request configuration.
    #[display("Invalid OAUTHBEARER configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration issue.
        reason: String,
    },
}

impl SaslError {
    pub(crate) fn token_acquisition(error: impl Into<BoxError>) -> Self {
        Self::TokenAcquisitionFailed {
            source: error.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl Error for SaslError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TokenAcquisitionFailed { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Errors returned by the token providers shipped with this crate.
#[derive(Debug, derive_more::Display)]
pub enum CredentialError {
    /// The token has expired and cannot be renewed by this provider.
    #[display("Access token has expired")]
    TokenExpired,

    /// The exchange deadline elapsed before the token was issued.
    #[display("Deadline exceeded while waiting for an access token")]
    DeadlineExceeded,

    /// The wrapped provider failed.
    #[display("Upstream token provider failed: {source}")]
    Upstream {
        /// The wrapped provider error.
        source: BoxError,
    },
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Upstream { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}
