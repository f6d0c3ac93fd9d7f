//! ChatRelay Server — real-time chat relay over WebSocket.
//!
//! Main entry point that loads configuration, initializes logging, and
//! starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use chatrelay_auth::InMemoryUserDirectory;
use chatrelay_core::config::AppConfig;
use chatrelay_core::error::AppError;
use chatrelay_core::traits::Directory;
use chatrelay_entity::User;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CHATRELAY_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ChatRelay v{}", env!("CARGO_PKG_VERSION"));

    let directory = Arc::new(InMemoryUserDirectory::new());
    seed_users(&directory);

    chatrelay_api::run_server(config, directory as Arc<dyn Directory<User>>).await
}

/// Seeds the in-memory directory standing in for the external users
/// service. Ids are logged so matching tokens can be minted against them.
fn seed_users(directory: &InMemoryUserDirectory) {
    for name in ["alice", "bob", "carol"] {
        let user = User::new(Uuid::new_v4(), name);
        tracing::info!(user_id = %user.id, username = %user.username, "Seeded user");
        directory.insert(user);
    }
}
