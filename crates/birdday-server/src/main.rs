mod api;
mod middleware;
mod scheduler;

use std::net::SocketAddr;
use std::sync::Arc;

use birdday_core::{Clock, SystemClock};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limits, AppState},
    middleware::SchedulerAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(birdday_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(config = ?config, "starting birdday-server");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let components = birdday_refresh::build_components(&config, Arc::clone(&clock)).await?;

    let _scheduler = scheduler::build_scheduler(
        Arc::clone(&components.orchestrator),
        Arc::clone(&config),
        clock,
    )
    .await?;

    let auth = SchedulerAuth::from_config(&config)?;
    let state = AppState {
        orchestrator: components.orchestrator,
        config: Arc::clone(&config),
    };
    let app = build_app(state, auth, default_rate_limits());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
