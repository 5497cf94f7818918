use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use addressbook::{
    AppState,
    config::{ServerConfig, StorageBackend},
    create_router,
    jwt::{JwtConfig, TokenService},
    repositories::{PgContactRepository, PgUserRepository, run_migrations},
};
use common::database::{DatabaseConfig, health_check, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting address book service");

    let server_config = ServerConfig::from_env()?;
    let jwt_config = JwtConfig::from_env()?;
    let tokens = TokenService::new(&jwt_config);
    let allowed_hosts = server_config.allowed_hosts.clone();

    let app_state = match server_config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool).await?;

            AppState::new(
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgContactRepository::new(pool)),
                tokens,
                allowed_hosts,
            )
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(tokens, allowed_hosts)
        }
    };

    let app = create_router(app_state);

    let address = server_config.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Address book service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
