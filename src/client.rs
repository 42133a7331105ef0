//! Ledger client seam and JSON-RPC implementation
//!
//! [`LedgerClient`] is the harness's view of the ledger: execute a signed
//! transaction, await finality, and query network state. The JSON-RPC
//! implementation is deliberately thin; tests substitute an in-process fake.

use crate::tx::PublishTransaction;
use crate::types::{NetworkState, ResponseOptions, TransactionDigest, TransactionEffectsResult};
use crate::wallet::TestAccount;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

/// Contract with the ledger. Transactions are taken by value: a signed
/// transaction is single-use and must not be resubmitted.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Sign the transaction with the signer's key and execute it, returning
    /// the digest once the network accepts it.
    async fn sign_and_execute_transaction(
        &self,
        transaction: PublishTransaction,
        signer: &TestAccount,
    ) -> Result<TransactionDigest, ClientError>;

    /// Block until the network reports the transaction final, including the
    /// sections selected in `options`.
    async fn wait_for_transaction(
        &self,
        digest: &TransactionDigest,
        options: ResponseOptions,
    ) -> Result<TransactionEffectsResult, ClientError>;

    /// Informational query; not part of the publish path.
    async fn latest_network_state(&self) -> Result<NetworkState, ClientError>;
}

/// JSON-RPC 2.0 client over HTTP.
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ClientError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let envelope: Value = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = envelope.get("error") {
            return Err(ClientError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown rpc error")
                    .to_string(),
            });
        }

        let result = envelope
            .get("result")
            .cloned()
            .ok_or_else(|| ClientError::Malformed("missing result field".to_string()))?;
        serde_json::from_value(result).map_err(|e| ClientError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    digest: TransactionDigest,
}

#[async_trait]
impl LedgerClient for JsonRpcClient {
    async fn sign_and_execute_transaction(
        &self,
        transaction: PublishTransaction,
        signer: &TestAccount,
    ) -> Result<TransactionDigest, ClientError> {
        let tx_bytes = serde_json::to_vec(&transaction)
            .map_err(|e| ClientError::Malformed(format!("unserializable transaction: {e}")))?;
        let signature = signer.sign(&tx_bytes);

        let params = json!([
            BASE64.encode(&tx_bytes),
            BASE64.encode(signature.to_bytes()),
            BASE64.encode(signer.public_key().as_bytes()),
        ]);

        let response: ExecuteResponse = self.call("ledger_executeTransaction", params).await?;
        Ok(response.digest)
    }

    async fn wait_for_transaction(
        &self,
        digest: &TransactionDigest,
        options: ResponseOptions,
    ) -> Result<TransactionEffectsResult, ClientError> {
        self.call("ledger_waitForTransaction", json!([digest, options]))
            .await
    }

    async fn latest_network_state(&self) -> Result<NetworkState, ClientError> {
        self.call("ledger_getLatestSystemState", json!([])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn surfaces_rpc_error_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid signature"}}"#)
            .create_async()
            .await;

        let client = JsonRpcClient::new(server.url());
        let err = client.latest_network_state().await.unwrap_err();

        match err {
            ClientError::Rpc { code, message } => {
                assert_eq!(code, -32602);
                assert!(message.contains("invalid signature"));
            }
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn decodes_network_state_result() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"jsonrpc":"2.0","id":1,"result":{"epoch":7,"activeValidators":["v0","v1"]}}"#,
            )
            .create_async()
            .await;

        let client = JsonRpcClient::new(server.url());
        let state = client.latest_network_state().await.unwrap();

        assert_eq!(state.epoch, 7);
        assert_eq!(state.active_validators, vec!["v0", "v1"]);
    }

    #[tokio::test]
    async fn missing_result_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1}"#)
            .create_async()
            .await;

        let client = JsonRpcClient::new(server.url());
        let err = client.latest_network_state().await.unwrap_err();

        assert!(matches!(err, ClientError::Malformed(_)));
    }
}
