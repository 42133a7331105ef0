//! Faucet funding behavior against a mock HTTP faucet

use ledger_harness::retry::RetryPolicy;
use ledger_harness::{FaucetClient, FundingError, TestAccount};
use std::time::{Duration, Instant};

fn short_policy() -> RetryPolicy {
    RetryPolicy {
        base_backoff_ms: 20,
        max_backoff_ms: 40,
        multiplier: 2.0,
        jitter_factor: 0.0,
        overall_timeout: Duration::from_millis(250),
    }
}

#[tokio::test]
async fn funds_account_on_success() {
    let account = TestAccount::generate();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/fund")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "recipient": account.address().as_str(),
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let faucet = FaucetClient::with_policy(server.url(), short_policy());
    faucet.fund(account.address()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn rate_limit_stops_after_a_single_attempt() {
    let account = TestAccount::generate();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/fund")
        .with_status(429)
        .with_body("Too Many Requests")
        .expect(1)
        .create_async()
        .await;

    let faucet = FaucetClient::with_policy(server.url(), short_policy());
    let err = faucet.fund(account.address()).await.unwrap_err();

    assert!(matches!(err, FundingError::RateLimited { .. }));
    // Exactly one request: the rate-limit signal must never be retried
    mock.assert_async().await;
}

#[tokio::test]
async fn transient_errors_retry_then_time_out_within_budget() {
    let account = TestAccount::generate();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/fund")
        .with_status(503)
        .with_body("faucet warming up")
        .expect_at_least(2)
        .create_async()
        .await;

    let faucet = FaucetClient::with_policy(server.url(), short_policy());
    let start = Instant::now();
    let err = faucet.fund(account.address()).await.unwrap_err();

    match err {
        FundingError::Timeout {
            attempts,
            last_error,
        } => {
            assert!(attempts >= 2, "expected multiple attempts, got {attempts}");
            assert!(last_error.contains("503"));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    // Budget is 250 ms; leave generous headroom for slow CI
    assert!(start.elapsed() < Duration::from_secs(5));
    mock.assert_async().await;
}

#[tokio::test]
async fn transport_failure_is_transient() {
    let account = TestAccount::generate();
    // Nothing listens here; every attempt is a connection error
    let faucet = FaucetClient::with_policy("http://127.0.0.1:1", short_policy());
    let err = faucet.fund(account.address()).await.unwrap_err();

    assert!(matches!(err, FundingError::Timeout { .. }));
}
