// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use wallet_gateway::{
    api::router,
    blockchain::JsonRpcClient,
    config::AppConfig,
    custody::SharedPassphrase,
    state::AppState,
    storage::LedgerDatabase,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    tracing::info!(?config, "Starting wallet gateway");

    let store = Arc::new(LedgerDatabase::open(&config.db_path)?);
    tracing::info!(path = %config.db_path.display(), "Ledger store opened");

    let chain = Arc::new(JsonRpcClient::new(config.rpc_url.clone(), config.rpc_timeout)?);
    tracing::info!(node = %chain.endpoint(), timeout = ?config.rpc_timeout, "Node client ready");
    let custody = Arc::new(SharedPassphrase::new(config.wallets_password.clone()));
    let state = AppState::new(store, chain, custody, config.store_timeout);

    // Broadcasts that were never recorded or discarded.
    let unreconciled = state.ledger.unreconciled().await?;
    for intent in &unreconciled {
        tracing::warn!(
            ledger_id = %intent.id,
            from = %intent.from,
            to = %intent.to,
            value = %intent.value,
            since = %intent.created_at,
            "Submission outcome unknown; reconcile against the chain"
        );
    }
    if !unreconciled.is_empty() {
        tracing::warn!(count = unreconciled.len(), "Unreconciled submissions in journal");
    }

    let app = router(state, config.request_timeout);

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Wallet gateway listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("Wallet gateway stopped");
    Ok(())
}

async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
