// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use altoke_server::{
    api::router,
    chain::{BaseClient, NetworkConfig, UsdcTransfer},
    config::{Config, LOG_FORMAT_ENV},
    custody::KeyCipher,
    notify::{EmailNotifier, TracingNotifier, TransactionNotifier},
    rates::HttpRateProvider,
    remit::SendRemittance,
    state::AppState,
    storage::JsonStore,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env().expect("Invalid configuration");

    let mut network = NetworkConfig::for_network(config.network);
    if let Some(rpc_url) = &config.rpc_url {
        network = network.with_rpc_url(rpc_url);
    }

    let store = Arc::new(
        JsonStore::open(config.data_dir.clone()).expect("Failed to open data directory"),
    );

    let chain = Arc::new(
        BaseClient::new(network.clone()).expect("Failed to create chain client"),
    );
    let transfer = Arc::new(
        UsdcTransfer::new(
            network.clone(),
            Duration::from_secs(config.confirmation_timeout_secs),
        )
        .expect("Failed to create transfer client"),
    );

    let notifier: Arc<dyn TransactionNotifier> =
        match (&config.resend_api_key, &config.notify_email) {
            (Some(api_key), Some(to_email)) => Arc::new(EmailNotifier::new(
                api_key,
                to_email,
                network.explorer_url,
            )),
            _ => Arc::new(TracingNotifier),
        };

    let remit = Arc::new(SendRemittance::new(
        store.clone(),
        store.clone(),
        transfer,
        Arc::new(KeyCipher::new()),
        notifier,
        config.master_secret.clone(),
    ));

    let state = AppState {
        remit,
        wallets: store.clone(),
        transactions: store,
        chain,
        rates: Arc::new(HttpRateProvider::new(config.rate_api_url.clone())),
        network: network.clone(),
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(
        %addr,
        network = network.name,
        "Altoke server listening (docs at /docs)"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
