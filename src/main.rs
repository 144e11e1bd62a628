use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lamplighter::config::{Cli, Config, default_config_dir, default_config_path};
use lamplighter::handler::AppState;
use lamplighter::light::LightRegistry;
use lamplighter::store::{self, LightStore};
use lamplighter::{router, unpack_error};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // With --config, data (the database file) lives next to the config file.
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("lamplighter.svc starting");

    let cfg = Config::new(&config_path.to_string_lossy()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });
    let light_store = store::open(&cfg, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup light store");
        std::process::exit(1);
    });

    let cancellation_token = CancellationToken::new();
    let sync_task = tokio::spawn(sync_replica(
        light_store.clone(),
        Duration::from_secs(cfg.app.sync_interval_seconds),
        cancellation_token.clone(),
    ));

    let registry = Arc::new(LightRegistry::new(light_store, cfg.app.capacity));
    let app = router::init(
        AppState::new(registry),
        Duration::from_secs(cfg.app.request_timeout_seconds),
    );

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!(capacity = cfg.app.capacity, "lamplighter.svc running on {}", &address);
    let shutdown_token = cancellation_token.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => tracing::info!("ctrl+c signal received, preparing to shutdown"),
                _ = shutdown_token.cancelled() => {}
            }
        })
        .await;

    cancellation_token.cancel();
    if let Err(err) = sync_task.await {
        tracing::warn!(error = %err, "replica sync task did not shut down cleanly");
    }

    if let Err(err) = result {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
    tracing::info!("lamplighter.svc going off, graceful shutdown complete");
}

/// Periodically pushes replica writes upstream until cancelled. A no-op for
/// stores that are not replicas.
async fn sync_replica(store: Arc<dyn LightStore>, every: Duration, token: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = store.sync().await {
                    tracing::warn!(error = %unpack_error(&e), "failed to sync replica");
                }
            }
            _ = token.cancelled() => {
                tracing::info!("replica sync task shutting down");
                break;
            }
        }
    }
}
