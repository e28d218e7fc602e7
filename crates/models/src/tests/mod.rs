use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect;


/// Connect and migrate; `None` when no database is configured for this run.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: DATABASE_URL missing or SKIP_DB_TESTS set");
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}
