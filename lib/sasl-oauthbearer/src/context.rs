//! Per-exchange inputs supplied by the SASL driver.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::CredentialError;

/// Connection identity for one SASL exchange.
///
/// The mechanism only requires its presence; the fields are used for logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExchangeMetadata {
    host: String,
    port: u16,
}

impl ExchangeMetadata {
    /// Creates metadata for a connection to `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the broker host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the broker port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ExchangeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Execution context of one SASL exchange.
///
/// The mechanism never enforces the deadline itself, it forwards the context
/// to the token provider. Cancellation is done by dropping the exchange future.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeContext {
    deadline: Option<Instant>,
}

impl ExchangeContext {
    /// Creates a context without deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    ///
    /// A timeout too large to be represented (e.g. `Duration::MAX`) means no
    /// deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left before the deadline.
    ///
    /// `None` when there is no deadline, `Some(Duration::ZERO)` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Runs `future` to completion, or fails once the deadline has passed.
    ///
    /// Intended for token providers that want to honor the exchange deadline.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::DeadlineExceeded`] when the deadline elapses first.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, CredentialError>
    where
        F: Future,
    {
        match self.deadline {
            None => Ok(future.await),
            Some(deadline) => tokio::time::timeout_at(deadline.into(), future)
                .await
                .map_err(|_| CredentialError::DeadlineExceeded),
        }
    }
}
