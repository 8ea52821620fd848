//! SASL driver interface.
//!
//! A SASL driver (the messaging client) calls [`SaslMechanism::start`] to get
//! the initial response, sends it to the server, then hands every server
//! challenge to the returned [`SaslExchange`] until it reports [`Step::Done`].

use std::future::Future;

use zeroize::Zeroizing;

use crate::context::{ExchangeContext, ExchangeMetadata};
use crate::error::SaslError;

mod oauthbearer;

pub use self::oauthbearer::{ChallengePolicy, OAuthBearerMechanism, OAuthBearerMechanismBuilder};

/// Outcome of one challenge handled by a [`SaslExchange`].
///
/// [`SaslExchange`] is not specific to OAUTHBEARER: multi-round mechanisms
/// answer intermediate challenges with [`Step::Continue`]. OAUTHBEARER is
/// single-round and only ever reports [`Step::Done`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Step {
    /// Send the response to the server and wait for the next challenge.
    ///
    /// Used by multi-round mechanisms only.
    Continue(Vec<u8>),
    /// The exchange is complete, with an optional final response.
    Done(Option<Vec<u8>>),
}

impl Step {
    /// Returns `true` when the exchange is complete.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Returns the bytes to send to the server, if any.
    pub fn response(&self) -> Option<&[u8]> {
        match self {
            Self::Continue(response) => Some(response.as_slice()),
            Self::Done(response) => response.as_deref(),
        }
    }
}

/// A client-side SASL mechanism.
pub trait SaslMechanism: Send + Sync {
    /// Handles the server challenges once the exchange has started.
    type Exchange: SaslExchange;

    /// Returns the mechanism name advertised to the server.
    fn name(&self) -> &'static str;

    /// Starts an exchange and produces the client initial response.
    ///
    /// `metadata` is mandatory, `None` is rejected with
    /// [`SaslError::MissingMetadata`].
    fn start(
        &self,
        ctx: &ExchangeContext,
        metadata: Option<&ExchangeMetadata>,
    ) -> impl Future<Output = Result<(Self::Exchange, Zeroizing<Vec<u8>>), SaslError>> + Send;
}

/// The continuation of a started SASL exchange.
pub trait SaslExchange: Send {
    /// Handles a server challenge.
    fn next(
        &mut self,
        ctx: &ExchangeContext,
        challenge: &[u8],
    ) -> impl Future<Output = Result<Step, SaslError>> + Send;
}
