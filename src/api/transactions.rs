// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{StatementQuery, SubmitTransactionRequest, TransactionResponse},
    state::AppState,
};

/// Submit a transfer from a wallet.
///
/// The transfer is broadcast through the node before it is recorded; a 201
/// means both happened.
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = SubmitTransactionRequest,
    responses(
        (status = 201, description = "Transfer broadcast and recorded", body = TransactionResponse),
        (status = 400, description = "Invalid JSON, missing fields or unknown sender"),
        (status = 500, description = "Node or store failure")
    )
)]
pub async fn submit_transaction(
    State(state): State<AppState>,
    body: Result<Json<SubmitTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected transaction body");
        ApiError::bad_request("Invalid JSON")
    })?;

    let tx = state.ledger.submit(request).await?;
    Ok((StatusCode::CREATED, Json(tx.into())))
}

/// List the transactions a wallet sent or received, oldest first.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    params(StatementQuery),
    responses(
        (status = 200, description = "Wallet statement", body = [TransactionResponse]),
        (status = 400, description = "Missing walletId"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_statement(
    State(state): State<AppState>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let wallet_id = query.wallet_id.unwrap_or_default();
    let statement = state.ledger.statement(&wallet_id).await?;
    Ok(Json(statement.into_iter().map(Into::into).collect()))
}
