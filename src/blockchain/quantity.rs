// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoding of node-encoded quantities.
//!
//! Nodes encode integers as `0x`-prefixed hex strings. Some proxies hand back
//! plain JSON numbers or decimal strings instead, so balances accept all three.
//! Nothing here ever falls back to zero: a value that does not decode is an
//! error.

use alloy::primitives::U256;
use serde_json::Value;

use super::RpcError;

/// Decode a hex counter such as the `pending` field of `txpool_status`.
///
/// The `0x` prefix is optional; an empty digit string or anything but hex
/// digits after the prefix is rejected.
pub fn decode_hex_u64(raw: &str) -> Result<u64, RpcError> {
    let digits = strip_hex_prefix(raw.trim());
    if digits.is_empty() {
        return Err(RpcError::Protocol(format!("empty hex quantity {raw:?}")));
    }
    if !is_hex_digits(digits) {
        return Err(RpcError::Protocol(format!("malformed hex quantity {raw:?}")));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| RpcError::Protocol(format!("malformed hex quantity {raw:?}: {e}")))
}

/// Decode a counter that arrives either as a hex string or a JSON integer.
pub fn decode_counter(value: &Value) -> Result<u64, RpcError> {
    match value {
        Value::String(s) => decode_hex_u64(s),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| RpcError::Protocol(format!("counter is not an unsigned integer: {n}"))),
        other => Err(RpcError::Protocol(format!("unexpected counter encoding: {other}"))),
    }
}

/// Decode an account balance magnitude.
///
/// - `"0x..."` strings are hex
/// - other strings must be decimal digits
/// - JSON numbers must be non-negative integers
pub fn decode_balance(value: &Value) -> Result<U256, RpcError> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.starts_with("0x") || s.starts_with("0X") {
                let digits = strip_hex_prefix(s);
                if digits.is_empty() {
                    return Err(RpcError::Protocol(format!("empty hex balance {s:?}")));
                }
                if !is_hex_digits(digits) {
                    return Err(RpcError::Protocol(format!("malformed hex balance {s:?}")));
                }
                U256::from_str_radix(digits, 16)
                    .map_err(|e| RpcError::Protocol(format!("malformed hex balance {s:?}: {e}")))
            } else {
                parse_decimal_u256(s)
                    .ok_or_else(|| RpcError::Protocol(format!("malformed balance {s:?}")))
            }
        }
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| RpcError::Protocol(format!("balance is not an unsigned integer: {n}"))),
        other => Err(RpcError::Protocol(format!("unexpected balance encoding: {other}"))),
    }
}

/// Encode a quantity the way nodes expect it in request params.
pub fn encode_quantity(value: U256) -> String {
    format!("0x{value:x}")
}

/// Parse a plain decimal digit string. Signs, blanks and fractions are rejected.
pub fn parse_decimal_u256(s: &str) -> Option<U256> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(s, 10).ok()
}

fn is_hex_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
