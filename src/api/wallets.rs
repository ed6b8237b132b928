// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet API endpoints.
//!
//! Wallet ids are chosen by the client and travel in the path. Creation binds
//! the id to a fresh node-managed account; reads return the live balance.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{BalanceResponse, WalletCreated},
    state::AppState,
};

/// Provision a wallet under a client-chosen id.
///
/// The node creates the account and keeps its key; the gateway stores only
/// the id → address mapping. Each id can be provisioned once.
#[utoipa::path(
    post,
    path = "/wallets/{id}",
    tag = "Wallets",
    params(("id" = String, Path, description = "Client-chosen wallet id")),
    responses(
        (status = 201, description = "Wallet created", body = WalletCreated),
        (status = 400, description = "Wallet id already taken"),
        (status = 500, description = "Node or store failure")
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<(StatusCode, Json<WalletCreated>), ApiError> {
    let record = state.wallets.create_wallet(&wallet_id, None).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Get the on-chain balance of a wallet.
#[utoipa::path(
    get,
    path = "/wallets/{id}",
    tag = "Wallets",
    params(("id" = String, Path, description = "Wallet id")),
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 400, description = "Unknown wallet"),
        (status = 500, description = "Node or store failure")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.balances.balance(&wallet_id).await?;
    Ok(Json(BalanceResponse { balance }))
}
