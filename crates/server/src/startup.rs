use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, StorageBackend, StorageConfig};
use common::utils::logging::init_logging_with_format;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{InMemorySystemRoleRepository, SeaOrmSystemRoleRepository, SystemRoleRepository};

use crate::errors::StartupError;
use crate::routes;
use crate::state::{ServerAuthConfig, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Pick the repository named by `[storage]`; postgres optionally runs migrations first.
async fn build_repository(
    storage: &StorageConfig,
    database: &configs::DatabaseConfig,
) -> Result<Arc<dyn SystemRoleRepository>, StartupError> {
    match storage.backend {
        StorageBackend::Memory => {
            info!(backend = "memory", "system role storage selected");
            Ok(Arc::new(InMemorySystemRoleRepository::new()))
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(database)
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            if storage.run_migrations {
                migration::Migrator::up(&db, None)
                    .await
                    .map_err(|e| StartupError::Storage(format!("migrations failed: {e}")))?;
                info!("migrations applied");
            }
            info!(backend = "postgres", "system role storage selected");
            Ok(Arc::new(SeaOrmSystemRoleRepository::new(db)))
        }
    }
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::Config(e.to_string()))?;
    init_logging_with_format(&cfg.logging.format);

    let repo = build_repository(&cfg.storage, &cfg.database).await?;
    let state = ServerState::with_tracing_log(repo, ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() });
    let app: Router = routes::build_router(state, build_cors());

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, "system role server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
