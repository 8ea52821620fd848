//! Bearer access token issued by a token provider.

use std::fmt;
use std::time::{Duration, Instant};

use zeroize::{Zeroize, ZeroizeOnDrop};

/// An access token with expiration tracking.
///
/// The token value is cleared from memory on drop and never shown by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken {
    /// The bearer token value.
    token: String,
    /// When the token expires (if known).
    #[zeroize(skip)]
    expires_at: Option<Instant>,
}

impl AccessToken {
    /// Creates a token without known expiry.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    /// Creates a token expiring `expires_in` from now.
    ///
    /// A lifetime too large to be represented yields a token without expiry.
    pub fn with_expiry(token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: Instant::now().checked_add(expires_in),
        }
    }

    /// Creates a token expiring at the given instant.
    pub fn expiring_at(token: impl Into<String>, expires_at: Instant) -> Self {
        Self {
            token: token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Returns the bearer token value.
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Returns the expiry instant, if known.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Checks if the token is expired.
    ///
    /// Returns `false` if the token has no expiration time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }

    /// Checks if the token will expire within the given threshold.
    pub fn should_refresh(&self, threshold: Duration) -> bool {
        self.expires_at.is_some_and(|exp| {
            Instant::now()
                .checked_add(threshold)
                .is_none_or(|limit| limit >= exp)
        })
    }

    /// Returns the time until expiration, if known and not already expired.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_at.and_then(|exp| {
            let now = Instant::now();
            if now >= exp { None } else { Some(exp - now) }
        })
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
