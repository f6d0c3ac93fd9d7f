//! Application builder — wires gateway + router into an Axum app.

use std::sync::Arc;

use axum::Router;

use chatrelay_auth::TokenValidator;
use chatrelay_core::config::AppConfig;
use chatrelay_core::error::AppError;
use chatrelay_core::traits::Directory;
use chatrelay_entity::User;
use chatrelay_realtime::ChatGateway;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application from configuration and the
/// users lookup collaborator.
pub fn build_app(config: AppConfig, directory: Arc<dyn Directory<User>>) -> Router {
    let validator = Arc::new(TokenValidator::new(&config.auth));
    let gateway = Arc::new(ChatGateway::new(config.relay.clone(), validator, directory));
    build_router(AppState {
        config: Arc::new(config),
        gateway,
    })
}

/// Runs the ChatRelay server until a shutdown signal arrives.
pub async fn run_server(
    config: AppConfig,
    directory: Arc<dyn Directory<User>>,
) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(config, directory);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ChatRelay listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("ChatRelay shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
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
}
