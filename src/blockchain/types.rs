// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC envelopes and node payload types.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::quantity::encode_quantity;

/// Block tag used for every balance query.
pub const LATEST_BLOCK: &str = "latest";

/// Outbound JSON-RPC 2.0 request.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: Value,
    pub id: u64,
}

/// Inbound JSON-RPC 2.0 response. Exactly one of `result`/`error` is set by
/// a well-behaved node.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `txpool_status` result.
///
/// Fields are kept raw; callers decide how strictly to decode them.
#[derive(Debug, Clone, Deserialize)]
pub struct TxPoolStatus {
    /// Executable transactions, hex-encoded by the node.
    #[serde(default)]
    pub pending: Option<Value>,
    /// Transactions waiting on a nonce gap, hex-encoded by the node.
    #[serde(default)]
    pub queued: Option<Value>,
}

/// Value transfer from a node-managed account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub value: U256,
}

impl Transfer {
    /// Transaction object for `personal_sendTransaction`.
    pub fn to_call_object(&self) -> Value {
        serde_json::json!({
            "from": self.from,
            "to": self.to,
            "value": encode_quantity(self.value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transfer_encodes_value_as_hex_quantity() {
        let transfer = Transfer {
            from: "0xaaaa".into(),
            to: "0xbbbb".into(),
            value: U256::from(255u64),
        };
        assert_eq!(
            transfer.to_call_object(),
            json!({"from": "0xaaaa", "to": "0xbbbb", "value": "0xff"})
        );
    }

    #[test]
    fn txpool_status_tolerates_missing_fields() {
        let status: TxPoolStatus = serde_json::from_value(json!({"pending": "0x2a"})).unwrap();
        assert_eq!(status.pending, Some(json!("0x2a")));
        assert!(status.queued.is_none());
    }

    #[test]
    fn request_envelope_shape() {
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_blockNumber",
            params: json!([]),
            id: 7,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"jsonrpc": "2.0", "method": "eth_blockNumber", "params": [], "id": 7})
        );
    }
}
