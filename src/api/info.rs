// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{error::ApiError, models::InfoResponse, state::AppState};

/// Point-in-time count of pending transactions in the node's pool.
#[utoipa::path(
    get,
    path = "/info",
    tag = "Network",
    responses(
        (status = 200, description = "Mempool snapshot", body = InfoResponse),
        (status = 500, description = "Node unavailable or unexpected reply")
    )
)]
pub async fn get_info(State(state): State<AppState>) -> Result<Json<InfoResponse>, ApiError> {
    let pending_transactions = state.network.pending_count().await?;
    Ok(Json(InfoResponse {
        pending_transactions,
    }))
}
