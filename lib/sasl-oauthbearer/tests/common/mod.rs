#![allow(dead_code)]

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rstest::fixture;
use sasl_oauthbearer::{
    AccessToken, ExchangeContext, ExchangeMetadata, TokenCredential, TokenRequestOptions,
};
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub fn metadata() -> ExchangeMetadata {
    init_tracing();
    ExchangeMetadata::new("broker-1.kafka.example.com", 9093)
}

#[fixture]
pub fn ctx() -> ExchangeContext {
    ExchangeContext::new()
}

/// Error returned by [`FakeCredential`] when configured to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeError(pub String);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FakeError {}

/// Thread-safe token provider issuing `token-1`, `token-2`, ... and recording
/// every request.
#[derive(Debug, Default)]
pub struct FakeCredential {
    calls: AtomicUsize,
    requests: Mutex<Vec<TokenRequestOptions>>,
    failure: Option<String>,
    expires_in: Option<Duration>,
    delay: Option<Duration>,
}

impl FakeCredential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn expiring_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TokenRequestOptions> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl TokenCredential for FakeCredential {
    type Error = FakeError;

    async fn get_token(
        &self,
        _ctx: &ExchangeContext,
        options: &TokenRequestOptions,
    ) -> Result<AccessToken, Self::Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests
            .lock()
            .expect("requests lock")
            .push(options.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.failure {
            return Err(FakeError(reason.clone()));
        }

        let token = format!("token-{call}");
        Ok(match self.expires_in {
            Some(expires_in) => AccessToken::with_expiry(token, expires_in),
            None => AccessToken::new(token),
        })
    }
}

pub fn expected_initial_response(token: &str) -> Vec<u8> {
    format!("n,,\x01auth=Bearer {token}\x01\x01").into_bytes()
}
