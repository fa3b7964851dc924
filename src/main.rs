use anyhow::{bail, Context, Result};
use axum::serve;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};
use werwolf_selector::core::config::Config;
use werwolf_selector::core::startup::{persist_roster, restore_roster};
use werwolf_selector::core::state::AppState;
use werwolf_selector::core::{routes, tracing_init};
use werwolf_selector::persistence::snapshot::SnapshotStore;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    // Load and validate configuration
    let config = Config::from_file(&config_path)
        .context(format!(
            "Failed to load configuration from '{}'. \
            Copy config.example.toml to config.toml and adjust the values.",
            config_path.display()
        ))?;

    tracing_init::init_tracing(&config.logging);

    // All roster operations run on one control thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = ?config.server.port,
        unix_socket = ?config.server.unix_socket,
        data_file = %config.storage.data_file.display(),
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Werwolf selector starting"
    );

    let store = SnapshotStore::new(config.storage.data_file.clone());
    let roster = restore_roster(&config, &store);
    let state = Arc::new(AppState::new(config.clone(), roster, store));

    let app = routes::build_router(Arc::clone(&state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                )
        );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut servers = Vec::new();

    if let Some(port) = config.server.port {
        let addr = format!("{}:{}", config.server.bind_address, port);
        info!(address = %addr, "Starting TCP listener");

        let listener = TcpListener::bind(&addr).await
            .context(format!("Failed to bind TCP listener to {}", addr))?;

        info!(address = %addr, "TCP listener bound successfully");

        let app = app.clone();
        let shutdown = wait_for_shutdown(shutdown_rx.clone());
        servers.push(tokio::spawn(async move {
            serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
                .context("TCP server error")
        }));
    }

    #[cfg(unix)]
    if let Some(unix_socket) = &config.server.unix_socket {
        info!(path = %unix_socket.display(), "Starting Unix socket listener");

        // Remove a stale socket left by a previous run
        if unix_socket.exists() {
            std::fs::remove_file(unix_socket)
                .context(format!("Failed to remove existing Unix socket: {}", unix_socket.display()))?;
        }

        let listener = tokio::net::UnixListener::bind(unix_socket)
            .context(format!("Failed to bind Unix socket listener to {}", unix_socket.display()))?;

        info!(path = %unix_socket.display(), "Unix socket listener bound successfully");

        let app = app.clone();
        let shutdown = wait_for_shutdown(shutdown_rx.clone());
        servers.push(tokio::spawn(async move {
            serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
                .context("Unix socket server error")
        }));
    }

    if servers.is_empty() {
        error!("No listeners configured");
        bail!("No listeners configured");
    }

    info!("HTTP server(s) started, waiting for shutdown signal");

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    for server in servers {
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Server task failed"),
            Err(e) => error!(error = %e, "Server task panicked"),
        }
    }

    info!("Saving roster before exit");
    if persist_roster(&state).is_ok() {
        info!("Roster saved, goodbye");
    }

    Ok(())
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    // An error means the sender is gone, which only happens on shutdown
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
