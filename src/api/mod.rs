// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{extract::Request, http::StatusCode, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{BalanceResponse, InfoResponse, SubmitTransactionRequest, TransactionResponse, WalletCreated},
    state::AppState,
};

pub mod health;
pub mod info;
pub mod transactions;
pub mod wallets;

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route(
            "/wallets/{id}",
            get(wallets::get_balance).post(wallets::create_wallet),
        )
        .route(
            "/transactions",
            get(transactions::get_statement).post(transactions::submit_transaction),
        )
        .route("/info", get(info::get_info))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    let http = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
            )
        }))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::x_request_id());

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(http)
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        wallets::create_wallet,
        wallets::get_balance,
        transactions::submit_transaction,
        transactions::get_statement,
        info::get_info,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            WalletCreated,
            BalanceResponse,
            SubmitTransactionRequest,
            TransactionResponse,
            InfoResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Wallets", description = "Wallet provisioning and balances"),
        (name = "Transactions", description = "Transfer submission and statements"),
        (name = "Network", description = "Node mempool status"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
