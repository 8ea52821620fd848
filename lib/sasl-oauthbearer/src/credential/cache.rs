//! Token caching on top of another provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::{AccessToken, TokenCredential, TokenRequestOptions};
use crate::context::ExchangeContext;
use crate::error::CredentialError;

/// Default threshold for token refresh (60 seconds before expiry).
const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(60);

/// Thread-safe cache of access tokens, keyed by request options.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<TokenRequestOptions, AccessToken>>>,
}

impl TokenCache {
    /// Creates a new empty token cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it exists and is not expired.
    pub async fn get(&self, options: &TokenRequestOptions) -> Option<AccessToken> {
        let guard = self.inner.read().await;
        guard.get(options).filter(|t| !t.is_expired()).cloned()
    }

    /// Returns `true` if the token should be refreshed.
    ///
    /// A token should be refreshed if:
    /// - No token is cached for these options
    /// - The token is expired
    /// - The token will expire within the threshold
    pub async fn should_refresh(
        &self,
        options: &TokenRequestOptions,
        threshold: Duration,
    ) -> bool {
        let guard = self.inner.read().await;
        guard
            .get(options)
            .is_none_or(|token| token.should_refresh(threshold))
    }

    /// Stores a token in the cache.
    pub async fn set(&self, options: TokenRequestOptions, token: AccessToken) {
        let mut guard = self.inner.write().await;
        guard.insert(options, token);
    }

    /// Clears all cached tokens.
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        guard.clear();
    }
}

/// Reuses the tokens of another provider until they are about to expire.
///
/// Refreshes are serialized: concurrent requests arriving while a token is
/// being fetched wait for it instead of hitting the upstream provider again.
/// Upstream calls are bounded by the exchange deadline.
#[derive(Debug)]
pub struct CachingCredential<C> {
    inner: C,
    cache: TokenCache,
    refresh_threshold: Duration,
    refresh_lock: Mutex<()>,
}

impl<C> CachingCredential<C>
where
    C: TokenCredential,
{
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: TokenCache::new(),
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Sets the refresh threshold (how long before expiry to refresh).
    #[must_use]
    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Returns the token cache.
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    async fn cached_token(&self, options: &TokenRequestOptions) -> Option<AccessToken> {
        if self
            .cache
            .should_refresh(options, self.refresh_threshold)
            .await
        {
            return None;
        }
        self.cache.get(options).await
    }
}

impl<C> TokenCredential for CachingCredential<C>
where
    C: TokenCredential,
{
    type Error = CredentialError;

    async fn get_token(
        &self,
        ctx: &ExchangeContext,
        options: &TokenRequestOptions,
    ) -> Result<AccessToken, Self::Error> {
        if let Some(token) = self.cached_token(options).await {
            return Ok(token);
        }

        let _refresh = ctx.run(self.refresh_lock.lock()).await?;

        // Another request may have refreshed while we were waiting
        if let Some(token) = self.cached_token(options).await {
            return Ok(token);
        }

        debug!(scopes = ?options.scopes(), "requesting a new access token");
        let token = ctx
            .run(self.inner.get_token(ctx, options))
            .await?
            .map_err(|error| CredentialError::Upstream {
                source: Box::new(error),
            })?;
        debug!(expires_in = ?token.time_until_expiry(), "access token cached");

        self.cache.set(options.clone(), token.clone()).await;
        Ok(token)
    }
}
