mod cli;

use crate::cli::{LogFormat, CLI};
use clap::Parser;
use pinhole_gateway::{App, AppState};
use pinhole_generator::Seed;
use pinhole_storage::{CollisionPolicy, FileStore, StoreSettings};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        data_file = %config.data_file.display(),
        collision_retries = config.collision_retries,
        public_base_url = %config.public_base_url,
        seeded = config.seed.is_some(),
        "starting pinhole"
    );

    let settings = StoreSettings::builder()
        .seed(Seed::from_optional_secret(config.seed.as_deref()))
        .collision_policy(CollisionPolicy::retries(config.collision_retries))
        .build();

    let (store, recovery) = FileStore::open_path(&config.data_file, settings).inspect_err(|e| {
        error!(error = %e, data_file = %config.data_file.display(), "failed to open store");
    })?;

    if !recovery.is_clean() {
        warn!(
            invalid = recovery.invalid_lines.len(),
            recovered = recovery.records,
            "log has corrupt lines, serving the records that could be read"
        );
        for line in &recovery.invalid_lines {
            warn!(line = line.number, reason = %line.reason, content = %line.content, "skipped log line");
        }
    }
    info!(
        records = recovery.records,
        lines = recovery.lines_applied,
        "store opened"
    );

    let store = Arc::new(store);
    let state = AppState::new(store.clone(), config.public_base_url);
    let router = App::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.sync()?;
    info!("server exited");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
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
                error!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received, draining requests");
}
