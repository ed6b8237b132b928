// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy shared by the services and the HTTP edge.
//!
//! Services return [`GatewayError`]; handlers convert it into [`ApiError`],
//! which owns the status code and the client-visible message. Upstream and
//! storage details are logged here and never echoed to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::blockchain::RpcError;
use crate::storage::StoreError;

/// Failure of a gateway operation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Client-supplied data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A wallet with this id already exists.
    #[error("duplicated wallet: {0}")]
    DuplicateWallet(String),

    /// No wallet is registered under this id.
    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    /// The node could not be reached or rejected the call.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The ledger store failed or timed out.
    #[error("storage error: {0}")]
    StorageError(String),

    /// The node answered with something we cannot decode.
    #[error("protocol error: {0}")]
    ProtocolError(String),
}

impl From<RpcError> for GatewayError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Protocol(msg) => GatewayError::ProtocolError(msg),
            other => GatewayError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExists(id) => GatewayError::DuplicateWallet(id),
            other => GatewayError::StorageError(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::InvalidInput(msg) => ApiError::bad_request(msg),
            GatewayError::DuplicateWallet(_) => ApiError::bad_request("Duplicated wallet"),
            GatewayError::WalletNotFound(id) => {
                ApiError::bad_request(format!("Cannot find wallet {id}"))
            }
            GatewayError::UpstreamUnavailable(_) => {
                tracing::error!(error = %e, "Node call failed");
                ApiError::internal("Blockchain node unavailable")
            }
            GatewayError::ProtocolError(_) => {
                tracing::error!(error = %e, "Unexpected node response");
                ApiError::internal("Blockchain node unavailable")
            }
            GatewayError::StorageError(_) => {
                tracing::error!(error = %e, "Ledger store failure");
                ApiError::internal("Internal storage error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn client_errors_map_to_bad_request() {
        let dup: ApiError = GatewayError::DuplicateWallet("alice".into()).into();
        assert_eq!(dup.status, StatusCode::BAD_REQUEST);
        assert_eq!(dup.message, "Duplicated wallet");

        let missing: ApiError = GatewayError::WalletNotFound("bob".into()).into();
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
        assert_eq!(missing.message, "Cannot find wallet bob");

        let invalid: ApiError = GatewayError::InvalidInput("Mandatory info missing".into()).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message, "Mandatory info missing");
    }

    #[test]
    fn server_errors_hide_details() {
        let upstream: ApiError =
            GatewayError::UpstreamUnavailable("connect 10.0.0.1:8545 refused".into()).into();
        assert_eq!(upstream.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!upstream.message.contains("10.0.0.1"));

        let storage: ApiError = GatewayError::StorageError("redb commit error".into()).into();
        assert_eq!(storage.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!storage.message.contains("redb"));

        let protocol: ApiError = GatewayError::ProtocolError("bad hex".into()).into();
        assert_eq!(protocol.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn lower_layer_errors_convert() {
        let dup: GatewayError = StoreError::AlreadyExists("alice".into()).into();
        assert!(matches!(dup, GatewayError::DuplicateWallet(id) if id == "alice"));

        let proto: GatewayError = RpcError::Protocol("missing result".into()).into();
        assert!(matches!(proto, GatewayError::ProtocolError(_)));

        let node: GatewayError = RpcError::Node {
            code: -32000,
            message: "account locked".into(),
        }
        .into();
        assert!(matches!(node, GatewayError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }
}
