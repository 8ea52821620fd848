//! Pre-acquired token provider.

use tracing::warn;

use super::{AccessToken, TokenCredential, TokenRequestOptions};
use crate::context::ExchangeContext;
use crate::error::CredentialError;

/// Serves a token obtained outside of this crate.
///
/// The request options are ignored. Once the token has expired every request
/// fails with [`CredentialError::TokenExpired`].
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    /// Creates a provider serving `token`.
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }
}

impl From<AccessToken> for StaticTokenCredential {
    fn from(token: AccessToken) -> Self {
        Self::new(token)
    }
}

impl TokenCredential for StaticTokenCredential {
    type Error = CredentialError;

    async fn get_token(
        &self,
        _ctx: &ExchangeContext,
        _options: &TokenRequestOptions,
    ) -> Result<AccessToken, Self::Error> {
        if self.token.is_expired() {
            warn!("pre-acquired access token has expired");
            return Err(CredentialError::TokenExpired);
        }
        Ok(self.token.clone())
    }
}
