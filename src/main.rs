use std::sync::Arc;

use anyhow::Context;
use batepapo::{app, store, AppState, Clock, Config, Reaper, SystemClock};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("batepapo=info".parse()?))
        .init();

    let config = Config::from_env()?;

    let store = store::connect(&config.database_url)
        .await
        .with_context(|| format!("opening store at {}", config.database_url))?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reaper = Arc::new(Reaper::new(store.clone(), clock.clone(), config.inactivity_timeout));
    let reaper_task = tokio::spawn(reaper.run(config.reap_interval, shutdown_rx));

    let app = app(AppState::new(store, clock));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    reaper_task.await?;
    tracing::info!("server shut down");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and tells the reaper to stop.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
}
