#![allow(missing_docs)]

use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use sasl_oauthbearer::{
    CachingCredential, CredentialError, ExchangeContext, TokenCredential, TokenRequestOptions,
};
use tokio::task::JoinSet;

mod common;
pub use self::common::*;

fn kafka_options() -> TokenRequestOptions {
    TokenRequestOptions::builder()
        .add_scope("api://kafka-cluster/.default")
        .build()
        .expect("Should build options")
}

#[rstest]
#[tokio::test]
async fn should_reuse_cached_token(ctx: ExchangeContext) -> anyhow::Result<()> {
    init_tracing();
    let credential =
        CachingCredential::new(FakeCredential::new().expiring_in(Duration::from_secs(3600)));
    let options = TokenRequestOptions::default();

    let first = credential.get_token(&ctx, &options).await?;
    let second = credential.get_token(&ctx, &options).await?;

    assert_eq!(first.secret(), "token-1");
    assert_eq!(second.secret(), "token-1");
    assert_eq!(credential.inner().calls(), 1);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_refresh_token_close_to_expiry(ctx: ExchangeContext) -> anyhow::Result<()> {
    let credential =
        CachingCredential::new(FakeCredential::new().expiring_in(Duration::from_secs(30)));
    let options = TokenRequestOptions::default();

    credential.get_token(&ctx, &options).await?;
    let refreshed = credential.get_token(&ctx, &options).await?;

    assert_eq!(refreshed.secret(), "token-2");
    assert_eq!(credential.inner().calls(), 2);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_honor_custom_refresh_threshold(ctx: ExchangeContext) -> anyhow::Result<()> {
    let credential =
        CachingCredential::new(FakeCredential::new().expiring_in(Duration::from_secs(30)))
            .with_refresh_threshold(Duration::from_secs(5));
    let options = TokenRequestOptions::default();

    credential.get_token(&ctx, &options).await?;
    credential.get_token(&ctx, &options).await?;

    assert_eq!(credential.inner().calls(), 1);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_refetch_every_time_with_unbounded_threshold(
    ctx: ExchangeContext,
) -> anyhow::Result<()> {
    let credential =
        CachingCredential::new(FakeCredential::new().expiring_in(Duration::from_secs(3600)))
            .with_refresh_threshold(Duration::MAX);
    let options = TokenRequestOptions::default();

    credential.get_token(&ctx, &options).await?;
    let second = credential.get_token(&ctx, &options).await?;

    assert_eq!(second.secret(), "token-2");
    assert_eq!(credential.inner().calls(), 2);
    Ok(())
}

#[tokio::test]
async fn should_cache_token_with_unbounded_lifetime_and_timeout() -> anyhow::Result<()> {
    let credential = CachingCredential::new(FakeCredential::new().expiring_in(Duration::MAX));
    let ctx = ExchangeContext::new().with_timeout(Duration::MAX);
    let options = TokenRequestOptions::default();

    let first = credential.get_token(&ctx, &options).await?;
    let second = credential.get_token(&ctx, &options).await?;

    assert!(first.expires_at().is_none());
    assert_eq!(second.secret(), "token-1");
    assert_eq!(credential.inner().calls(), 1);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_cache_tokens_per_options(ctx: ExchangeContext) -> anyhow::Result<()> {
    let credential =
        CachingCredential::new(FakeCredential::new().expiring_in(Duration::from_secs(3600)));

    let graph = credential
        .get_token(&ctx, &TokenRequestOptions::default())
        .await?;
    let kafka = credential.get_token(&ctx, &kafka_options()).await?;
    let kafka_again = credential.get_token(&ctx, &kafka_options()).await?;

    assert_eq!(graph.secret(), "token-1");
    assert_eq!(kafka.secret(), "token-2");
    assert_eq!(kafka_again.secret(), "token-2");
    assert_eq!(
        credential.inner().requests(),
        vec![TokenRequestOptions::default(), kafka_options()]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn should_fetch_once_for_concurrent_requests() -> anyhow::Result<()> {
    let credential = Arc::new(CachingCredential::new(
        FakeCredential::new()
            .expiring_in(Duration::from_secs(3600))
            .delayed(Duration::from_millis(200)),
    ));

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let credential = Arc::clone(&credential);
        tasks.spawn(async move {
            let token = credential
                .get_token(&ExchangeContext::new(), &TokenRequestOptions::default())
                .await?;
            Ok::<_, CredentialError>(token.secret().to_string())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        assert_eq!(joined??, "token-1");
    }
    assert_eq!(credential.inner().calls(), 1);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_wrap_upstream_error(ctx: ExchangeContext) {
    let credential = CachingCredential::new(FakeCredential::failing("invalid_client"));

    let error = credential
        .get_token(&ctx, &TokenRequestOptions::default())
        .await
        .expect_err("Should fail");

    insta::assert_snapshot!(error.to_string(), @"Upstream token provider failed: invalid_client");
    let cause = error
        .source()
        .and_then(|source| source.downcast_ref::<FakeError>());
    assert_eq!(cause, Some(&FakeError("invalid_client".to_string())));
    assert!(credential.cache().get(&TokenRequestOptions::default()).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn should_fail_when_deadline_elapses() {
    let credential =
        CachingCredential::new(FakeCredential::new().delayed(Duration::from_secs(30)));
    let ctx = ExchangeContext::new().with_timeout(Duration::from_secs(1));

    let result = credential
        .get_token(&ctx, &TokenRequestOptions::default())
        .await;

    assert!(matches!(result, Err(CredentialError::DeadlineExceeded)));
    assert_eq!(credential.inner().calls(), 1);
}
