use std::{env, time::Duration};

use anyhow::anyhow;
use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

pub use configs::DatabaseConfig;

/// `DATABASE_URL` from the environment (or `.env`), if any.
pub static DATABASE_URL: Lazy<Option<String>> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
});

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let url = DATABASE_URL.as_deref().ok_or_else(|| anyhow!("DATABASE_URL is not set"))?;
    let db = Database::connect(url).await?;
    Ok(db)
}

fn configured_url(cfg: &DatabaseConfig) -> anyhow::Result<&str> {
    let url = cfg.url.trim();
    if url.is_empty() {
        return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
    }
    Ok(url)
}

/// Connect with pool settings from `[database]` in config.toml.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(configured_url(cfg)?);
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(max = cfg.max_connections, min = cfg.min_connections, "database pool ready");
    Ok(db)
}
