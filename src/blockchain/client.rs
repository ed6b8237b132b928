// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for an Ethereum-compatible node.
//!
//! Accounts are node-managed: the node generates and holds the keys, and
//! unlocks them with a passphrase for `personal_sendTransaction`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::quantity::{decode_balance, decode_counter};
use super::types::*;

/// Calls the gateway makes against the node.
///
/// Implementations must bound every call with a timeout.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Create a node-managed account locked with `passphrase`; returns its address.
    async fn new_account(&self, passphrase: &str) -> Result<String, RpcError>;

    /// Balance of `address` at the latest block.
    async fn balance(&self, address: &str) -> Result<U256, RpcError>;

    /// Raw mempool counters.
    async fn txpool_status(&self) -> Result<TxPoolStatus, RpcError>;

    /// Sign with the node-managed `transfer.from` account and broadcast.
    /// Returns the transaction hash.
    async fn send_transaction(&self, transfer: &Transfer, passphrase: &str)
        -> Result<String, RpcError>;

    /// Current chain head.
    async fn block_number(&self) -> Result<u64, RpcError>;
}

/// HTTP JSON-RPC 2.0 client.
pub struct JsonRpcClient {
    endpoint: Url,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a client whose every request is bounded by `timeout`.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    /// The node endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        tracing::debug!(method, id, "Calling node");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport(format!("{method}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Http {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let body: JsonRpcResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                RpcError::Protocol(format!("undecodable response to {method}: {e}"))
            } else {
                RpcError::Transport(format!("{method}: {e}"))
            }
        })?;

        if let Some(err) = body.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }

        body.result
            .filter(|v| !v.is_null())
            .ok_or_else(|| RpcError::Protocol(format!("{method} returned no result")))
    }

    async fn call_for_string(&self, method: &str, params: Value) -> Result<String, RpcError> {
        match self.call(method, params).await? {
            Value::String(s) if !s.is_empty() => Ok(s),
            other => Err(RpcError::Protocol(format!(
                "{method} returned {other}, expected a non-empty string"
            ))),
        }
    }
}

#[async_trait]
impl ChainRpc for JsonRpcClient {
    async fn new_account(&self, passphrase: &str) -> Result<String, RpcError> {
        self.call_for_string("personal_newAccount", json!([passphrase]))
            .await
    }

    async fn balance(&self, address: &str) -> Result<U256, RpcError> {
        let raw = self
            .call("eth_getBalance", json!([address, LATEST_BLOCK]))
            .await?;
        decode_balance(&raw)
    }

    async fn txpool_status(&self) -> Result<TxPoolStatus, RpcError> {
        let raw = self.call("txpool_status", json!([])).await?;
        serde_json::from_value(raw)
            .map_err(|e| RpcError::Protocol(format!("malformed txpool_status result: {e}")))
    }

    async fn send_transaction(
        &self,
        transfer: &Transfer,
        passphrase: &str,
    ) -> Result<String, RpcError> {
        self.call_for_string(
            "personal_sendTransaction",
            json!([transfer.to_call_object(), passphrase]),
        )
        .await
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        let raw = self.call("eth_blockNumber", json!([])).await?;
        decode_counter(&raw)
    }
}

/// Errors that can occur while talking to the node.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{method} answered with HTTP {status}")]
    Http { method: String, status: u16 },

    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("malformed node response: {0}")]
    Protocol(String),
}

impl RpcError {
    /// True when the node definitely did not act on the request: it answered
    /// with a JSON-RPC error object or a 4xx status. Transport failures,
    /// 5xx answers and undecodable replies leave the outcome unknown.
    pub fn is_rejection(&self) -> bool {
        match self {
            RpcError::Node { .. } => true,
            RpcError::Http { status, .. } => (400..500).contains(status),
            RpcError::Transport(_) | RpcError::Protocol(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{routing::post, Json, Router};

    type Seen = Arc<Mutex<Vec<Value>>>;

    /// Serve a one-route JSON-RPC node on an ephemeral port.
    async fn fake_node<F>(respond: F) -> (Url, Seen)
    where
        F: Fn(&Value) -> Value + Clone + Send + Sync + 'static,
    {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let app = Router::new().route(
            "/",
            post(move |Json(req): Json<Value>| {
                let respond = respond.clone();
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(req.clone());
                    Json(respond(&req))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (Url::parse(&format!("http://{addr}/")).unwrap(), seen)
    }

    fn ok(req: &Value, result: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": req["id"], "result": result})
    }

    fn client(url: Url) -> JsonRpcClient {
        JsonRpcClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn new_account_sends_passphrase_in_envelope() {
        let (url, seen) = fake_node(|req| ok(req, json!("0x00000000000000000000000000000000000000aa"))).await;
        let address = client(url).new_account("secret").await.unwrap();

        assert_eq!(address, "0x00000000000000000000000000000000000000aa");
        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["jsonrpc"], "2.0");
        assert_eq!(requests[0]["method"], "personal_newAccount");
        assert_eq!(requests[0]["params"], json!(["secret"]));
        assert!(requests[0]["id"].is_u64());
    }

    #[tokio::test]
    async fn balance_queries_latest_block() {
        let (url, seen) = fake_node(|req| ok(req, json!("0x10000000000000000"))).await;
        let balance = client(url).balance("0xabc").await.unwrap();

        assert_eq!(balance.to_string(), "18446744073709551616");
        let requests = seen.lock().unwrap();
        assert_eq!(requests[0]["method"], "eth_getBalance");
        assert_eq!(requests[0]["params"], json!(["0xabc", "latest"]));
    }

    #[tokio::test]
    async fn request_ids_increase() {
        let (url, seen) = fake_node(|req| ok(req, json!("0x1"))).await;
        let rpc = client(url);
        rpc.block_number().await.unwrap();
        rpc.block_number().await.unwrap();

        let requests = seen.lock().unwrap();
        let first = requests[0]["id"].as_u64().unwrap();
        let second = requests[1]["id"].as_u64().unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn txpool_status_keeps_raw_fields() {
        let (url, _) = fake_node(|req| ok(req, json!({"pending": "0x2a", "queued": "0x1"}))).await;
        let status = client(url).txpool_status().await.unwrap();
        assert_eq!(status.pending, Some(json!("0x2a")));
        assert_eq!(status.queued, Some(json!("0x1")));
    }

    #[tokio::test]
    async fn send_transaction_passes_call_object_and_passphrase() {
        let (url, seen) = fake_node(|req| ok(req, json!("0xdeadbeef"))).await;
        let transfer = Transfer {
            from: "0xfrom".into(),
            to: "0xto".into(),
            value: U256::from(10u64),
        };
        let hash = client(url)
            .send_transaction(&transfer, "secret")
            .await
            .unwrap();

        assert_eq!(hash, "0xdeadbeef");
        let requests = seen.lock().unwrap();
        assert_eq!(requests[0]["method"], "personal_sendTransaction");
        assert_eq!(
            requests[0]["params"],
            json!([{"from": "0xfrom", "to": "0xto", "value": "0xa"}, "secret"])
        );
    }

    #[tokio::test]
    async fn node_error_object_is_surfaced() {
        let (url, _) = fake_node(|req| {
            json!({"jsonrpc": "2.0", "id": req["id"], "error": {"code": -32000, "message": "could not decrypt key with given password"}})
        })
        .await;

        let err = client(url).new_account("wrong").await.unwrap_err();
        assert!(matches!(err, RpcError::Node { code: -32000, .. }));
    }

    #[test]
    fn only_definite_answers_count_as_rejections() {
        let node = RpcError::Node {
            code: -32000,
            message: "insufficient funds".into(),
        };
        let bad_request = RpcError::Http {
            method: "personal_sendTransaction".into(),
            status: 400,
        };
        let gateway = RpcError::Http {
            method: "personal_sendTransaction".into(),
            status: 502,
        };

        assert!(node.is_rejection());
        assert!(bad_request.is_rejection());
        assert!(!gateway.is_rejection());
        assert!(!RpcError::Transport("operation timed out".into()).is_rejection());
        assert!(!RpcError::Protocol("hash is not a string".into()).is_rejection());
    }

    #[tokio::test]
    async fn missing_result_is_a_protocol_error() {
        let (url, _) = fake_node(|req| json!({"jsonrpc": "2.0", "id": req["id"], "result": null})).await;
        let err = client(url).new_account("secret").await.unwrap_err();
        assert!(matches!(err, RpcError::Protocol(_)));
    }

    #[tokio::test]
    async fn malformed_balance_is_a_protocol_error() {
        let (url, _) = fake_node(|req| ok(req, json!("0xzz"))).await;
        let err = client(url).balance("0xabc").await.unwrap_err();
        assert!(matches!(err, RpcError::Protocol(_)));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/")).unwrap();
        let err = client(url).block_number().await.unwrap_err();
        assert!(matches!(err, RpcError::Transport(_)));
    }
}
