pub mod departments;
pub mod groups;
pub mod lessons;
pub mod periods;
pub mod rooms;
pub mod schedules;
pub mod semesters;
pub mod subjects;
pub mod teachers;

#[cfg(test)]
pub(crate) mod test_data;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::AppError;

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if database_url.contains(":memory:") {
        // Each connection to :memory: is a separate database.
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready at {}", database_url);

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn setup_test_db() -> SqlitePool {
    connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test db")
}
