#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    DatabaseConfig {
        url: std::env::var("DATABASE_URL").unwrap_or_default(),
        max_connections: 10,
        min_connections: 1,
        connect_timeout_secs: 5,
        idle_timeout_secs: 60,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
    }
}

/// Migrated Postgres connection, or `None` when the run has no database.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return None;
    }

    // Run migrations exactly once, with a throwaway connection
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let Ok(db) = connect_with_config(&test_config()).await else { return false };
            let ok = migration::Migrator::up(&db, None).await.is_ok();
            drop(db);
            ok
        })
        .await;
    if !migrated {
        eprintln!("skip: database unavailable or migration failed");
        return None;
    }

    // Return a fresh connection for the current test's runtime
    connect_with_config(&test_config()).await.ok()
}
