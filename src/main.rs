use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use coursereg::coursereg_config::ServerConfig;
use coursereg::logging::{init_tracing, shutdown_tracer};
use coursereg::metrics::{init_metrics, metrics_router};
use coursereg::router::init_router;
use coursereg::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing()?;
    let metrics_handle = init_metrics()?;

    let server_config = ServerConfig::from_env();
    let state = init_app_state(&server_config).await?;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("Failed to run database migrations")?;

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_router(handle));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://localhost:{}", server_config.port);
    info!(
        "Swagger UI available at http://localhost:{}/swagger-ui",
        server_config.port
    );
    info!(
        "Scalar UI available at http://localhost:{}/scalar",
        server_config.port
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
